//! Data Transfer Objects for conversion requests and results.

use serde::{Deserialize, Serialize};

use crate::domain::CurrencyCode;
use crate::error::ConvertError;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Amount in major units of the source currency
    pub amount: f64,
    pub source: CurrencyCode,
    pub target: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, source: CurrencyCode, target: CurrencyCode) -> Self {
        Self {
            amount,
            source,
            target,
        }
    }

    /// Checks the amount before anything touches the network.
    pub fn validate(&self) -> Result<(), ConvertError> {
        validate_amount(self.amount).map(|_| ())
    }
}

/// Accepts only positive finite amounts.
pub fn validate_amount(amount: f64) -> Result<f64, ConvertError> {
    if !amount.is_finite() {
        return Err(ConvertError::Validation("Amount must be a number".into()));
    }
    if amount <= 0.0 {
        return Err(ConvertError::Validation("Amount must be positive".into()));
    }
    Ok(amount)
}

/// Parses user input into a valid amount.
pub fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| ConvertError::Validation(format!("Amount must be a number: {:?}", input)))?;
    validate_amount(amount)
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
    pub converted_amount: f64,
    /// Units of target per 1 unit of source
    pub effective_rate: f64,
    /// Converted amount rendered for the target currency
    pub display_amount: String,
    /// Rate line, e.g. `1 USD = 83.0000 INR`
    pub display_rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 10.5 ").unwrap(), 10.5);
    }

    #[test]
    fn test_non_numeric_amount_fails() {
        assert!(matches!(
            parse_amount("ten"),
            Err(ConvertError::Validation(_))
        ));
        assert!(matches!(parse_amount(""), Err(ConvertError::Validation(_))));
    }

    #[test]
    fn test_non_positive_amount_fails() {
        assert!(matches!(parse_amount("0"), Err(ConvertError::Validation(_))));
        assert!(matches!(
            validate_amount(-3.0),
            Err(ConvertError::Validation(_))
        ));
        assert!(matches!(
            validate_amount(f64::INFINITY),
            Err(ConvertError::Validation(_))
        ));
        assert!(matches!(parse_amount("NaN"), Err(ConvertError::Validation(_))));
    }
}
