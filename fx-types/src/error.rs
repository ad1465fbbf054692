//! Error types for the currency converter.

use crate::domain::CurrencyCode;

/// Message used when a provider body does not carry a usable `rates` object.
pub const INVALID_RESPONSE: &str = "Invalid API response structure";

/// Rate fetch errors (provider and transport failures).
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Connectivity failure: DNS, refused connection, reset, timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("Rate provider returned HTTP {status}")]
    Transport { status: u16 },

    /// The body did not have the expected shape.
    #[error("{0}")]
    Data(String),
}

impl FetchError {
    /// Creates the standard data error for a malformed provider body.
    pub fn invalid_response() -> Self {
        FetchError::Data(INVALID_RESPONSE.to_string())
    }

    /// Returns true if re-triggering the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Transport { .. })
    }
}

/// Conversion workflow errors, surfaced to the user as a single message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate for {target} is not available against base {base}")]
    RateUnavailable {
        target: CurrencyCode,
        base: CurrencyCode,
    },

    /// Held rates were fetched for a different base than the selected source.
    #[error("Rates are based on {rates_base}, not on the selected source {selected}")]
    StaleRates {
        rates_base: CurrencyCode,
        selected: CurrencyCode,
    },

    #[error("Exchange rates are not loaded yet")]
    NotReady,

    /// A later request replaced this one before its response arrived.
    #[error("Request was superseded by a later one")]
    Superseded,
}

impl ConvertError {
    /// Returns true if re-triggering the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConvertError::Fetch(e) => e.is_retryable(),
            ConvertError::NotReady
            | ConvertError::StaleRates { .. }
            | ConvertError::Superseded => true,
            ConvertError::Validation(_) | ConvertError::RateUnavailable { .. } => false,
        }
    }
}
