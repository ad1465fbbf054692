//! Domain models for the currency converter.

pub mod currency;
pub mod rate_set;
pub mod view;

pub use currency::CurrencyCode;
pub use rate_set::RateSet;
pub use view::{Selection, ViewState};
