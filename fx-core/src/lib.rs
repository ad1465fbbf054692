//! # FX Core
//!
//! Conversion workflow for the currency converter.
//!
//! ## Architecture
//!
//! - `conversion` - Pure conversion arithmetic and result formatting
//! - `controller` - Stateful workflow: bootstrap, staleness, state publication
//!
//! The controller is generic over `R: RateRepository`, allowing the HTTP
//! adapter or an in-memory fake to be injected.

pub mod conversion;
pub mod controller;


pub use conversion::convert;
pub use controller::{ControllerConfig, ConversionController};
