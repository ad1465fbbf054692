//! Conversion arithmetic.
//!
//! Pure functions: no IO, no state. The controller feeds them the rate set it
//! currently holds.

use fx_format::{format_display, format_rate_line};
use fx_types::{ConversionRequest, ConversionResult, ConvertError, RateSet};

/// Converts `request` using `rates`.
///
/// Same-currency requests never look at `rates`. Otherwise the held rates must
/// be based on the request's source currency.
pub fn convert(
    rates: Option<&RateSet>,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    request.validate()?;

    if request.source == request.target {
        return Ok(build_result(request, request.amount, 1.0));
    }

    let rates = rates.ok_or(ConvertError::NotReady)?;

    if *rates.base_code() != request.source {
        return Err(ConvertError::StaleRates {
            rates_base: rates.base_code().clone(),
            selected: request.source.clone(),
        });
    }

    let rate = rates
        .rate(&request.target)
        .ok_or_else(|| ConvertError::RateUnavailable {
            target: request.target.clone(),
            base: rates.base_code().clone(),
        })?;

    let converted = request.amount * rate;
    if !converted.is_finite() {
        return Err(ConvertError::Validation(
            "Converted amount is out of range".to_string(),
        ));
    }

    Ok(build_result(request, converted, rate))
}

fn build_result(request: &ConversionRequest, converted: f64, rate: f64) -> ConversionResult {
    ConversionResult {
        source: request.source.clone(),
        target: request.target.clone(),
        amount: request.amount,
        converted_amount: converted,
        effective_rate: rate,
        display_amount: format_display(converted, request.target.as_str()),
        display_rate: format_rate_line(request.source.as_str(), request.target.as_str(), rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_types::CurrencyCode;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn usd_rates() -> RateSet {
        RateSet::new(
            code("USD"),
            [(code("EUR"), 0.9), (code("INR"), 83.0), (code("USD"), 1.0)],
        )
        .unwrap()
    }

    fn request(amount: f64, source: &str, target: &str) -> ConversionRequest {
        ConversionRequest::new(amount, code(source), code(target))
    }

    #[test]
    fn test_convert_base_to_target() {
        let rates = usd_rates();
        let result = convert(Some(&rates), &request(10.0, "USD", "INR")).unwrap();

        assert_eq!(result.converted_amount, 830.0);
        assert_eq!(result.effective_rate, 83.0);
        assert_eq!(result.display_amount, "₹830.00");
        assert_eq!(result.display_rate, "1 USD = 83.0000 INR");
    }

    #[test]
    fn test_convert_is_amount_times_rate() {
        let rates = usd_rates();
        for amount in [0.01, 1.0, 7.25, 1234.5, 1e9] {
            let result = convert(Some(&rates), &request(amount, "USD", "EUR")).unwrap();
            assert!((result.converted_amount - amount * 0.9).abs() <= 1e-9 * amount.max(1.0));
        }
    }

    #[test]
    fn test_same_currency_is_identity() {
        for amount in [0.5, 1.0, 3.14159, 1e12] {
            let result = convert(None, &request(amount, "XYZ", "XYZ")).unwrap();
            assert_eq!(result.converted_amount, amount);
            assert_eq!(result.effective_rate, 1.0);
        }
    }

    #[test]
    fn test_invalid_amount_fails_validation() {
        let rates = usd_rates();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = convert(Some(&rates), &request(amount, "USD", "INR"));
            assert!(matches!(result, Err(ConvertError::Validation(_))));
        }
    }

    #[test]
    fn test_overflowing_result_is_rejected() {
        let rates = usd_rates();
        let result = convert(Some(&rates), &request(1e308, "USD", "INR"));
        match result {
            Err(ConvertError::Validation(msg)) => assert!(msg.contains("out of range")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_target_is_rate_unavailable() {
        let rates = usd_rates();
        let result = convert(Some(&rates), &request(1.0, "USD", "GBP"));
        match result {
            Err(ConvertError::RateUnavailable { target, base }) => {
                assert_eq!(target, code("GBP"));
                assert_eq!(base, code("USD"));
            }
            other => panic!("expected RateUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_rates_for_other_base_are_stale() {
        let rates = usd_rates();
        let result = convert(Some(&rates), &request(1.0, "EUR", "INR"));
        assert!(matches!(result, Err(ConvertError::StaleRates { .. })));
    }

    #[test]
    fn test_no_rates_is_not_ready() {
        let result = convert(None, &request(1.0, "USD", "INR"));
        assert!(matches!(result, Err(ConvertError::NotReady)));
    }
}
