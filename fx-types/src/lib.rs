//! # FX Types
//!
//! Domain types and port traits for the currency converter.
//! This crate has ZERO external IO dependencies - only data structures,
//! conversion rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the workspace:
//! - `domain/` - Pure domain types (CurrencyCode, RateSet, ViewState)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Conversion request and result values crossing the UI boundary
//! - `error/` - Fetch and conversion error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{CurrencyCode, RateSet, Selection, ViewState};
pub use dto::*;
pub use error::{ConvertError, FetchError, INVALID_RESPONSE};
pub use ports::RateRepository;
