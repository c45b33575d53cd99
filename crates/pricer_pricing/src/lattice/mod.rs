//! Recombining trinomial lattice with discrete dividends.
//!
//! The pipeline for one valuation:
//!
//! 1. [`LatticeBuilder`] lays out the trunk and node prices and calibrates a
//!    moment-matched [`Transition`] for every non-terminal node.
//! 2. [`propagate_reach`] optionally fills each node's reach probability.
//! 3. [`prune`] optionally empties nodes below a [`PruningThreshold`].
//! 4. [`BackwardPricer`] or [`RecursivePricer`] values the option.
//!
//! [`LatticeEngine`] runs the whole pipeline for a [`PricingRequest`].

mod backward;
mod builder;
mod engine;
mod error;
mod node;
mod probabilities;
mod pruning;
mod reach;
mod recursive;
mod request;

pub use backward::BackwardPricer;
pub use builder::LatticeBuilder;
pub use engine::LatticeEngine;
pub use error::LatticeError;
pub use node::{Lattice, Level, Node, Transition};
pub use probabilities::{StepCalibrator, MIN_PRICE};
pub use pruning::{prune, PruningThreshold};
pub use reach::propagate_reach;
pub use recursive::{MemoCache, RecursivePricer};
pub use request::{PricingMethod, PricingOutcome, PricingRequest, PricingRequestBuilder, MAX_STEPS};
