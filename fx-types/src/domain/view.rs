//! State published to renderers.

use serde::Serialize;

use super::currency::CurrencyCode;
use crate::dto::ConversionResult;

/// The user's current choice of currencies and amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
}

/// What a renderer should show right now.
///
/// Exactly one of loading, error or result is current at any time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// Nothing in flight and nothing to show.
    Idle,
    /// A rate fetch is in flight; conversion input is disabled.
    Loading { base: CurrencyCode },
    /// A conversion was computed against rates for its source.
    Ready(ConversionResult),
    /// The last action failed; the form stays interactive.
    Failed { message: String, retryable: bool },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}
