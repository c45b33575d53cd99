//! Studies built on the lattice engine.
//!
//! - [`convergence_study`]: lattice price against Black-Scholes as steps grow
//! - [`tree_error`]: leading-order discretisation error bound
//! - [`speed_study`]: timings of both pricers with and without pruning
//! - [`strike_sweep`], [`volatility_sweep`], [`greeks_by_strike`]: parameter sweeps

mod convergence;
mod error;
mod error_bound;
mod speed;
mod sweep;

pub use convergence::{black_scholes_reference, convergence_study, step_schedule, ConvergencePoint};
pub use error::AnalysisError;
pub use error_bound::tree_error;
pub use speed::{speed_study, SpeedSample};
pub use sweep::{
    default_strikes, default_volatilities, greeks_by_strike, linspace, strike_sweep,
    volatility_sweep, StrikeGreeks, SweepPoint,
};
