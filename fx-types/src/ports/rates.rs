//! Rate repository port.
//!
//! Implementations can be HTTP clients, in-memory fakes, etc.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{CurrencyCode, RateSet};
use crate::error::FetchError;

/// Port trait for exchange rate providers.
///
/// One call issues one request. Implementations do not cache and do not
/// deduplicate concurrent calls; the caller keeps the last good [`RateSet`].
#[async_trait::async_trait]
pub trait RateRepository: Send + Sync + 'static {
    /// Fetches the rates of 1 unit of `base` against every other currency.
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSet, FetchError>;
}

#[async_trait::async_trait]
impl<T: RateRepository + ?Sized> RateRepository for Arc<T> {
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSet, FetchError> {
        (**self).fetch_rates(base).await
    }
}

/// The universe of supported codes: every key of the set plus its base.
pub fn known_currencies(rates: &RateSet) -> BTreeSet<CurrencyCode> {
    rates.currencies()
}
