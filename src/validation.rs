// Validation utilities module
// Provides custom validation functions for coordinate inputs

use validator::ValidationError;

/// Validates that a latitude is finite and within [-90, 90] degrees
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(ValidationError::new("latitude_out_of_range"))
    }
}

/// Validates that a longitude is finite and within [-180, 180] degrees
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if lon.is_finite() && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(ValidationError::new("longitude_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0001).is_err());
        assert!(validate_latitude(-91.0).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(0.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
        assert!(validate_longitude(-200.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(validate_latitude(f64::NAN).is_err());
        assert!(validate_latitude(f64::INFINITY).is_err());
        assert!(validate_longitude(f64::NAN).is_err());
        assert!(validate_longitude(f64::NEG_INFINITY).is_err());
    }
}
