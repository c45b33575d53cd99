//! Core time and error types.
//!
//! This module provides:
//! - `time`: Date wrapper, day count conventions and year-fraction conversion
//! - `error`: Structured error types for pricing and date operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`DayCountConvention`], [`years_between`] from `time`
//! - [`PricingError`], [`DateError`] from `error`

pub mod error;
pub mod time;

pub use error::{DateError, PricingError};
pub use time::{years_between, Date, DayCountConvention};
