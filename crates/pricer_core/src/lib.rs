//! # pricer_core: Foundation Layer for the Trinomial Lattice Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - Error types: `PricingError`, `DateError` (`types::error`)
//! - Time types: `Date`, `DayCountConvention`, `years_between` (`types::time`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! The pricing layers above only ever operate on year fractions; calendar
//! dates enter through a [`types::DayCountConvention`] (ACT/365F by default,
//! see [`types::years_between`]) before a market is built.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{years_between, Date, DayCountConvention};
//!
//! let pricing = Date::from_ymd(2024, 1, 1).unwrap();
//! let maturity = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! let t = years_between(pricing, maturity);
//! assert!((t - 182.0 / 365.0).abs() < 1e-12);
//!
//! let t360 = DayCountConvention::Act360.year_fraction_dates(pricing, maturity);
//! assert!(t360 > t);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for Date and DayCountConvention

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod types;
