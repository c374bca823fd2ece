//! Flat-compass heading from the magnetometer's horizontal plane

use crate::calibration::{CalibrationProfile, apply_calibration};
use crate::math::RAD_TO_DEG;
use crate::types::{Heading, SensorSample};

/// Compute the compass heading of a calibrated horizontal field vector
///
/// The heading is the four-quadrant arctangent of `(y, x)` in degrees,
/// shifted by 360° when negative. `(0, 0)` has no direction and yields 0°.
///
/// The device is assumed to lie flat: Z is not consulted and there is no
/// tilt compensation, so the result drifts once the board is pitched or
/// rolled.
///
/// # Arguments
/// * `calibrated_x` - Calibrated magnetometer X
/// * `calibrated_y` - Calibrated magnetometer Y
///
/// # Returns
/// Heading in degrees (range: 0° to <360°)
///
/// # Example
/// ```
/// use tdc_compass::compute_heading;
///
/// assert_eq!(compute_heading(1.0, 0.0).degrees(), 0.0);
/// assert!((compute_heading(0.0, -1.0).degrees() - 270.0).abs() < 0.01);
/// ```
pub fn compute_heading(calibrated_x: f32, calibrated_y: f32) -> Heading {
    if calibrated_x == 0.0 && calibrated_y == 0.0 {
        return Heading::ZERO;
    }

    let mut yaw = calibrated_y.atan2(calibrated_x) * RAD_TO_DEG;
    if yaw < 0.0 {
        yaw += 360.0;
    }

    Heading::from_degrees(yaw)
}

impl Heading {
    /// Calibrate a magnetometer sample and compute its heading
    pub fn from_magnetometer(profile: &CalibrationProfile, magnetometer: &SensorSample) -> Self {
        let calibrated = apply_calibration(profile, magnetometer);
        compute_heading(calibrated.x, calibrated.y)
    }
}
