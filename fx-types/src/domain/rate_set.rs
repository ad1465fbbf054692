//! Rate snapshot for one base currency.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::currency::CurrencyCode;
use crate::error::FetchError;

/// An immutable snapshot of the rates of one base currency.
///
/// Each entry is the value of 1 unit of `base_code` expressed in that
/// currency. The base itself is implicit: a provider entry for the base is
/// dropped on construction and [`RateSet::rate`] answers exactly `1.0` for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSet {
    base_code: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_date: Option<String>,
    fetched_at: DateTime<Utc>,
}

impl RateSet {
    /// Builds a rate set, rejecting any rate that is not positive and finite.
    pub fn new(
        base_code: CurrencyCode,
        rates: impl IntoIterator<Item = (CurrencyCode, f64)>,
    ) -> Result<Self, FetchError> {
        let mut map = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(FetchError::Data(format!(
                    "Invalid API response structure: rate for {} is {}",
                    code, rate
                )));
            }
            if code != base_code {
                map.insert(code, rate);
            }
        }

        Ok(Self {
            base_code,
            rates: map,
            provider_date: None,
            fetched_at: Utc::now(),
        })
    }

    /// Attaches the provider's own date label, when it reports one.
    pub fn with_provider_date(mut self, date: Option<String>) -> Self {
        self.provider_date = date;
        self
    }

    /// Returns the base currency these rates are expressed against.
    pub fn base_code(&self) -> &CurrencyCode {
        &self.base_code
    }

    /// Returns the rate of 1 base unit in `code`.
    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        if *code == self.base_code {
            return Some(1.0);
        }
        self.rates.get(code).copied()
    }

    /// Returns the explicit (non-base) rates.
    pub fn rates(&self) -> &BTreeMap<CurrencyCode, f64> {
        &self.rates
    }

    /// Returns every code this snapshot can convert into, base included.
    pub fn currencies(&self) -> BTreeSet<CurrencyCode> {
        let mut codes: BTreeSet<CurrencyCode> = self.rates.keys().cloned().collect();
        codes.insert(self.base_code.clone());
        codes
    }

    /// Date label the provider attached to these rates, if any.
    ///
    /// Shown to the user only; staleness never depends on it.
    pub fn provider_date(&self) -> Option<&str> {
        self.provider_date.as_deref()
    }

    /// When this snapshot was built from a provider response.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_base_is_implicit() {
        let rates = usd_rates();
        assert_eq!(rates.rates().len(), 2);
        assert_eq!(rates.rate(&code("USD")), Some(1.0));
        assert_eq!(rates.rate(&code("INR")), Some(83.0));
        assert_eq!(rates.rate(&code("GBP")), None);
    }

    #[test]
    fn test_currencies_include_base() {
        let codes: Vec<String> = usd_rates()
            .currencies()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(codes, vec!["EUR", "INR", "USD"]);
    }

    #[test]
    fn test_base_entry_other_than_one_is_dropped() {
        let rates = RateSet::new(code("EUR"), [(code("EUR"), 1.3), (code("USD"), 1.1)]).unwrap();
        assert_eq!(rates.rate(&code("EUR")), Some(1.0));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let result = RateSet::new(code("USD"), [(code("EUR"), 0.0)]);
        assert!(matches!(result, Err(FetchError::Data(_))));

        let result = RateSet::new(code("USD"), [(code("EUR"), f64::NAN)]);
        assert!(matches!(result, Err(FetchError::Data(_))));
    }

    #[test]
    fn test_provider_date() {
        let rates = usd_rates().with_provider_date(Some("2024-05-01".into()));
        assert_eq!(rates.provider_date(), Some("2024-05-01"));
    }
}
