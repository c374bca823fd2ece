//! Magnetometer calibration (hard-iron offset and per-axis scale)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nalgebra::Vector2;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::SensorSample;

/// Per-axis correction for the magnetometer's horizontal plane
///
/// Only X and Y are corrected; Z plays no part in the heading. A profile is
/// validated once at construction and immutable afterwards, so every
/// profile in hand has finite offsets and finite, non-zero scales.
///
/// # Example
/// ```
/// use tdc_compass::CalibrationProfile;
///
/// let profile = CalibrationProfile::new(-3.5, 12.0, 1.02, 0.98).unwrap();
/// assert_eq!(profile.offset_x(), -3.5);
///
/// assert!(CalibrationProfile::new(0.0, 0.0, 0.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    offset: Vector2<f32>,
    scale: Vector2<f32>,
}

impl CalibrationProfile {
    pub fn new(offset_x: f32, offset_y: f32, scale_x: f32, scale_y: f32) -> Result<Self> {
        check_offset("offset_x", offset_x)?;
        check_offset("offset_y", offset_y)?;
        check_scale("scale_x", scale_x)?;
        check_scale("scale_y", scale_y)?;

        Ok(Self {
            offset: Vector2::new(offset_x, offset_y),
            scale: Vector2::new(scale_x, scale_y),
        })
    }

    /// Zero offsets, unit scales
    pub fn identity() -> Self {
        Self {
            offset: Vector2::zeros(),
            scale: Vector2::new(1.0, 1.0),
        }
    }

    /// Load a profile from CSV with an `offset_x,offset_y,scale_x,scale_y`
    /// header and exactly one data row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rows = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize::<ProfileRecord>();

        let record = rows
            .next()
            .ok_or_else(|| invalid("calibration file has no data row".into()))?
            .map_err(|e| invalid(e.to_string()))?;

        if rows.next().is_some() {
            return Err(invalid("calibration file has more than one data row".into()));
        }

        Self::new(
            record.offset_x,
            record.offset_y,
            record.scale_x,
            record.scale_y,
        )
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| invalid(format!("cannot open {}: {}", path.display(), e)))?;
        Self::from_csv_reader(file)
    }

    pub fn offset_x(&self) -> f32 {
        self.offset.x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset.y
    }

    pub fn scale_x(&self) -> f32 {
        self.scale.x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale.y
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    offset_x: f32,
    offset_y: f32,
    scale_x: f32,
    scale_y: f32,
}

fn invalid(reason: String) -> Error {
    Error::InvalidCalibrationProfile(reason)
}

fn check_offset(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(format!("{name} must be finite, got {value}")));
    }
    Ok(())
}

fn check_scale(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value == 0.0 {
        return Err(invalid(format!("{name} must be finite and non-zero, got {value}")));
    }
    Ok(())
}

/// Apply a calibration profile to a magnetometer sample
///
/// `(raw - offset) * scale` per axis, X and Y only. Pure: the same inputs
/// always give the same calibrated pair.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use tdc_compass::{CalibrationProfile, Channel, SensorSample, apply_calibration};
///
/// let profile = CalibrationProfile::new(10.0, 20.0, 0.5, 2.0).unwrap();
/// let sample = SensorSample::new(Channel::Magnetometer, Vector3::new(100.0, 200.0, 300.0));
///
/// let calibrated = apply_calibration(&profile, &sample);
/// assert_eq!(calibrated.x, 45.0);
/// assert_eq!(calibrated.y, 360.0);
/// ```
pub fn apply_calibration(profile: &CalibrationProfile, magnetometer: &SensorSample) -> Vector2<f32> {
    let raw = magnetometer.values().xy();
    (raw - profile.offset).component_mul(&profile.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;
    use nalgebra::Vector3;

    fn mag(x: f32, y: f32, z: f32) -> SensorSample {
        SensorSample::new(Channel::Magnetometer, Vector3::new(x, y, z))
    }

    #[test]
    fn test_identity_is_default() {
        let profile = CalibrationProfile::default();
        assert_eq!(profile, CalibrationProfile::identity());
        assert_eq!(profile.offset_x(), 0.0);
        assert_eq!(profile.offset_y(), 0.0);
        assert_eq!(profile.scale_x(), 1.0);
        assert_eq!(profile.scale_y(), 1.0);
    }

    #[test]
    fn test_identity_passes_xy_through() {
        let calibrated = apply_calibration(&CalibrationProfile::identity(), &mag(12.5, 7.3, -3.1));
        assert_eq!(calibrated, Vector2::new(12.5, 7.3));
    }

    #[test]
    fn test_offset_then_scale() {
        let profile = CalibrationProfile::new(0.1, 0.2, 0.5, 4.0).unwrap();
        let calibrated = apply_calibration(&profile, &mag(1.0, 2.0, 3.0));
        // (1.0-0.1, 2.0-0.2) * (0.5, 4.0) = (0.45, 7.2)
        let expected = Vector2::new(0.45, 7.2);
        assert!((calibrated - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_z_is_ignored() {
        let profile = CalibrationProfile::new(1.0, 1.0, 2.0, 2.0).unwrap();
        let a = apply_calibration(&profile, &mag(3.0, 4.0, -50.0));
        let b = apply_calibration(&profile, &mag(3.0, 4.0, 50.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_calibration_is_repeatable() {
        let profile = CalibrationProfile::new(-2.25, 7.5, 1.1, 0.9).unwrap();
        let sample = mag(33.3, -12.1, 4.0);
        let first = apply_calibration(&profile, &sample);
        for _ in 0..10 {
            assert_eq!(apply_calibration(&profile, &sample), first);
        }
    }

    #[test]
    fn test_zero_scale_rejected() {
        for (sx, sy) in [(0.0, 1.0), (1.0, 0.0), (-0.0, 1.0)] {
            let err = CalibrationProfile::new(0.0, 0.0, sx, sy).unwrap_err();
            assert!(
                matches!(err, Error::InvalidCalibrationProfile(_)),
                "scale ({}, {}) should be rejected, got {:?}",
                sx,
                sy,
                err
            );
            assert!(!err.is_cycle_fault());
        }
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        assert!(CalibrationProfile::new(0.0, 0.0, f32::NAN, 1.0).is_err());
        assert!(CalibrationProfile::new(0.0, 0.0, 1.0, f32::INFINITY).is_err());
        assert!(CalibrationProfile::new(f32::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(CalibrationProfile::new(0.0, f32::NEG_INFINITY, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_negative_scale_allowed() {
        let profile = CalibrationProfile::new(0.0, 0.0, -1.0, 1.0).unwrap();
        let calibrated = apply_calibration(&profile, &mag(2.0, 3.0, 0.0));
        assert_eq!(calibrated, Vector2::new(-2.0, 3.0));
    }

    #[test]
    fn test_profile_from_csv() {
        let csv = "offset_x,offset_y,scale_x,scale_y\n-3.5, 12.0, 1.02, 0.98\n";
        let profile = CalibrationProfile::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(profile.offset_x(), -3.5);
        assert_eq!(profile.offset_y(), 12.0);
        assert_eq!(profile.scale_x(), 1.02);
        assert_eq!(profile.scale_y(), 0.98);
    }

    #[test]
    fn test_profile_from_csv_rejects_bad_files() {
        let cases = [
            "offset_x,offset_y,scale_x,scale_y\n",
            "offset_x,offset_y,scale_x,scale_y\n0,0,0,1\n",
            "offset_x,offset_y,scale_x,scale_y\n0,0,one,1\n",
            "offset_x,offset_y,scale_x,scale_y\n0,0,1,1\n0,0,1,1\n",
        ];
        for csv in cases {
            let err = CalibrationProfile::from_csv_reader(csv.as_bytes()).unwrap_err();
            assert!(
                matches!(err, Error::InvalidCalibrationProfile(_)),
                "{:?} should be rejected, got {:?}",
                csv,
                err
            );
        }
    }

    #[test]
    fn test_profile_from_missing_path() {
        let err = CalibrationProfile::from_csv_path("/no/such/calibration.csv").unwrap_err();
        assert!(matches!(err, Error::InvalidCalibrationProfile(_)));
    }
}
