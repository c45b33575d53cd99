//! Closed-form reference formulas.
//!
//! - Black-Scholes price and Greeks for European options
//! - Standard normal CDF/PDF
//!
//! These never enter the lattice; they exist to validate it.
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: works for `f32` and `f64`
//! - **Fail fast**: invalid spot, strike, volatility or expiry are rejected

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::{bs_greeks, bs_price, BlackScholes, Greeks};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
