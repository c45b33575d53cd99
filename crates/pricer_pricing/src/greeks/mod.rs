//! Finite-difference Greeks on the trinomial lattice.
//!
//! This module provides:
//! - [`GreeksResult<T>`]: price plus optional sensitivities
//! - [`GreeksConfig`]: bump sizes and which Greeks to compute
//! - [`SensitivityEngine`]: bump-and-revalue driver over [`crate::lattice`]
//! - generic finite-difference operators
//!
//! | Greek | Formula |
//! |-------|---------|
//! | Delta | `(V(S+h) - V(S-h)) / 2h` |
//! | Gamma | `(V(S+h) - 2V(S) + V(S-h)) / h²` |
//! | Vega  | `(V(σ+h) - V(σ-h)) / 2h` |
//! | Rho   | `(V(r+h) - V(r-h)) / 2h` |
//! | Theta | `-(V(T+h) - V(T-h)) / 2h` |
//! | Vanna | four-corner mixed difference in `(S, σ)` |
//! | Vomma | `(V(σ+h) - 2V(σ) + V(σ-h)) / h²` |

mod config;
mod engine;
mod error;
mod finite_difference;
mod result;

pub use config::{GreeksConfig, GreeksConfigBuilder};
pub use engine::{BumpSizes, SensitivityEngine};
pub use error::GreeksError;
pub use finite_difference::{
    central_difference, cross_derivative, cross_difference, finite_or_zero, first_derivative,
    second_derivative, second_difference,
};
pub use result::{Greek, GreeksResult};
