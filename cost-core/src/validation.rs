/// Domain checks for numeric inputs

use crate::error::{CostError, Result};

/// Require a finite value strictly greater than zero
pub fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CostError::InvalidSettings(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(value)
}

/// Require a finite value greater than or equal to zero
pub fn ensure_non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CostError::InvalidSettings(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(value)
}

/// Require a fraction in the half-open interval (0, 1]
pub fn ensure_retained_fraction(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(CostError::InvalidSettings(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )));
    }
    Ok(value)
}

/// Validate a unit price loaded from an external table
pub fn ensure_unit_price(service: &str, attribute: &str, price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(CostError::InvalidConfig(format!(
            "price for {}/{} must be a non-negative number, got {}",
            service, attribute, price
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("x", 1.5).is_ok());
        assert!(ensure_positive("x", 0.0).is_err());
        assert!(ensure_positive("x", -2.0).is_err());
        assert!(ensure_positive("x", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", -0.1).is_err());
        assert!(ensure_non_negative("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_retained_fraction() {
        assert!(ensure_retained_fraction("d", 1.0).is_ok());
        assert!(ensure_retained_fraction("d", 0.3).is_ok());
        assert!(ensure_retained_fraction("d", 0.0).is_err());
        assert!(ensure_retained_fraction("d", 1.01).is_err());
    }

    #[test]
    fn test_ensure_unit_price() {
        assert!(ensure_unit_price("ec2", "t3.micro", 0.0104).is_ok());
        let err = ensure_unit_price("ec2", "t3.micro", -1.0).unwrap_err();
        assert!(matches!(err, CostError::InvalidConfig(_)));
    }
}
