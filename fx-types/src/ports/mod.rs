//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The controller depends on these traits, not on concrete HTTP clients.

mod rates;

pub use rates::{RateRepository, known_currencies};
