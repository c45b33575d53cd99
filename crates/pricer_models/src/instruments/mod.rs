//! Vanilla option definitions.
//!
//! - [`PayoffType`]: call or put intrinsic value
//! - [`ExerciseStyle`]: European or American
//! - [`VanillaOption`]: strike + payoff + exercise, validated at construction
//! - [`InstrumentError`]: construction failures

pub mod error;
pub mod exercise;
pub mod payoff;
pub mod vanilla;

pub use error::InstrumentError;
pub use exercise::ExerciseStyle;
pub use payoff::PayoffType;
pub use vanilla::VanillaOption;
