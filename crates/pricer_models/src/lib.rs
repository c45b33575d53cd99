//! # Pricer Models (L2: Business Logic)
//!
//! Market, instrument and reference-model definitions consumed by the
//! trinomial lattice engine.
//!
//! This crate provides:
//! - Market snapshot with discrete dividend schedule (`market`)
//! - Vanilla option contracts (`instruments`)
//! - Black-Scholes reference formulas for validation (`analytical`)
//!
//! ## Design Principles
//!
//! - **Validated value objects**: every constructor returns `Result`
//! - **Builder pattern** for the market, with required fields checked at `build()`
//! - **Immutable after construction**: perturbations return new values

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod market;
