//! Currency identifiers as reported by the rate provider.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConvertError;

/// A short uppercase currency identifier such as `USD`.
///
/// The format is not validated beyond being non-empty; whether a code is
/// supported is decided by the last fetched [`RateSet`](super::RateSet).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Builds a code from a non-empty literal, e.g. for configuration defaults.
    pub fn from_static(code: &'static str) -> Self {
        debug_assert!(!code.trim().is_empty(), "currency code literal is empty");
        Self(code.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(ConvertError::Validation(
                "Currency code cannot be empty".into(),
            ));
        }
        Ok(Self(code.to_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
