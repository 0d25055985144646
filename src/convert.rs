//! Conversion arithmetic and request input validation.

use crate::error::{FetchError, Result};

/// Applies a rate or unit price to an amount. No rounding here, the
/// presentation layer decides how many decimals to show.
pub fn convert(amount: f64, factor: f64) -> f64 {
    amount * factor
}

/// Amounts must be finite and strictly positive.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FetchError::InvalidInput(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }
    Ok(())
}

/// Currency codes and crypto symbols must be non-empty and letters only.
pub fn validate_code(code: &str) -> Result<()> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FetchError::InvalidInput(format!(
            "currency code or symbol must be alphabetic, got '{code}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_applies_factor() {
        assert_eq!(convert(100.0, 0.92), 92.0);
        assert_eq!(convert(0.5, 45000.0), 22500.0);
    }

    #[test]
    fn test_convert_identity_rate() {
        assert_eq!(convert(123.45, 1.0), 123.45);
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0001).is_ok());
        assert!(validate_amount(1.0).is_ok());

        assert!(matches!(
            validate_amount(0.0),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_amount(-5.0),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_amount(f64::NAN),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_amount(f64::INFINITY),
            Err(FetchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("USD").is_ok());
        assert!(validate_code("eur").is_ok());
        assert!(validate_code("BTC").is_ok());

        assert!(matches!(
            validate_code(""),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_code("US1"),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_code("US-D"),
            Err(FetchError::InvalidInput(_))
        ));
    }
}
