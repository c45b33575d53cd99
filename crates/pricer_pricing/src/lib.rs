//! # Pricer Pricing (Layer 3: Lattice Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing values the contracts defined in `pricer_models` on a
//! recombining trinomial lattice:
//! - Lattice construction with discrete dividends on the trunk
//! - Moment-matched, recentred branching probabilities
//! - Reach-probability propagation and pruning
//! - Backward-induction and memoized top-down pricers
//! - Bump-and-revalue Greeks, evaluated in parallel
//! - Convergence, timing and parameter-sweep studies
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::instruments::VanillaOption;
//! use pricer_models::market::{DividendPolicy, Market};
//! use pricer_pricing::lattice::{LatticeEngine, PricingMethod, PricingRequest};
//!
//! let market = Market::builder()
//!     .spot(100.0)
//!     .rate(0.05)
//!     .volatility(0.2)
//!     .maturity(1.0)
//!     .dividend(0.5, DividendPolicy::with_yield(0.02).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let request = PricingRequest::builder()
//!     .market(market)
//!     .option(VanillaOption::american_put(100.0).unwrap())
//!     .steps(200)
//!     .method(PricingMethod::Recursive)
//!     .pruning(1e-7)
//!     .build()
//!     .unwrap();
//!
//! let outcome = LatticeEngine::price(&request).unwrap();
//! assert!(outcome.price > 6.0 && outcome.price < 8.0);
//! assert!(outcome.pruned_count > 0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): `Serialize` for lattices, Greeks and study rows

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
// Allow unknown lints for clippy compatibility across versions
#![allow(unknown_lints)]

pub mod analysis;
pub mod greeks;
pub mod lattice;

// Re-export commonly used items for convenience
pub use greeks::{GreeksConfig, GreeksResult, SensitivityEngine};
pub use lattice::{LatticeEngine, LatticeError, PricingMethod, PricingOutcome, PricingRequest};
