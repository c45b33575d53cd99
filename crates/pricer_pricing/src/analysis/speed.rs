//! Timing of both pricers with and without pruning.

use std::time::Duration;

use super::error::AnalysisError;
use crate::lattice::{LatticeEngine, PricingMethod, PricingRequest, PruningThreshold};

/// One timed valuation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpeedSample {
    /// Number of steps.
    pub steps: usize,
    /// Pricer used.
    pub method: PricingMethod,
    /// Whether pruning was applied.
    pub pruned: bool,
    /// Build plus pricing wall time.
    pub elapsed: Duration,
    /// Resulting price.
    pub price: f64,
}

/// Times every combination of step count, method and pruning.
///
/// Samples are ordered by step count, then method, then unpruned before
/// pruned.
///
/// # Errors
/// `AnalysisError::Lattice` if a step count is out of range.
pub fn speed_study(
    request: &PricingRequest,
    steps: &[usize],
    threshold: PruningThreshold,
) -> Result<Vec<SpeedSample>, AnalysisError> {
    let mut samples = Vec::with_capacity(steps.len() * 4);
    for &n in steps {
        let sized = request.with_steps(n)?;
        for method in PricingMethod::ALL {
            for pruning in [None, Some(threshold)] {
                let outcome =
                    LatticeEngine::price(&sized.with_method(method).with_pruning(pruning))?;
                samples.push(SpeedSample {
                    steps: n,
                    method,
                    pruned: pruning.is_some(),
                    elapsed: outcome.elapsed,
                    price: outcome.price,
                });
            }
        }
    }
    Ok(samples)
}
