//! Angle constants and helpers

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Full turn in degrees
pub const FULL_TURN_DEGREES: f32 = 360.0;

/// Wrap an angle in degrees into `[0, 360)`
///
/// `f32` rounding can turn a tiny negative angle into exactly 360.0 after
/// wrapping, so that case folds back to 0.0. Negative zero becomes positive
/// zero and non-finite input yields 0.0.
pub fn normalize_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }

    let wrapped = angle.rem_euclid(FULL_TURN_DEGREES);
    if wrapped >= FULL_TURN_DEGREES {
        return 0.0;
    }

    // -0.0 + 0.0 == +0.0
    wrapped + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_constants() {
        assert!((90.0 * DEG_TO_RAD - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((core::f32::consts::PI * RAD_TO_DEG - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(359.5), 359.5);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-360.0), 0.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
    }

    #[test]
    fn test_normalize_degrees_edge_values() {
        // Rounds to 360.0 under rem_euclid
        let tiny = normalize_degrees(-1e-30);
        assert!((0.0..360.0).contains(&tiny), "got {}", tiny);

        let zero = normalize_degrees(-0.0);
        assert!(zero.is_sign_positive(), "negative zero should fold to +0.0");

        assert_eq!(normalize_degrees(f32::NAN), 0.0);
        assert_eq!(normalize_degrees(f32::INFINITY), 0.0);
        assert_eq!(normalize_degrees(f32::NEG_INFINITY), 0.0);
    }
}
