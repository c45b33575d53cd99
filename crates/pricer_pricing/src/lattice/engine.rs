//! Pricing facade over the lattice pipeline.
//!
//! Runs build → reach → prune → price for one [`PricingRequest`].

use std::time::Instant;

use tracing::info;

use super::backward::BackwardPricer;
use super::builder::LatticeBuilder;
use super::error::LatticeError;
use super::pruning::prune;
use super::reach::propagate_reach;
use super::recursive::RecursivePricer;
use super::request::{PricingMethod, PricingOutcome, PricingRequest};

/// Stateless lattice pricing engine.
///
/// # Examples
/// ```
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::lattice::{LatticeEngine, PricingRequest};
///
/// let request = PricingRequest::builder()
///     .market(Market::new(100.0, 0.05, 0.2, 1.0).unwrap())
///     .option(VanillaOption::european_call(100.0).unwrap())
///     .steps(200)
///     .build()
///     .unwrap();
///
/// let outcome = LatticeEngine::price(&request).unwrap();
/// assert!((outcome.price - 10.4506).abs() < 0.02);
/// assert_eq!(outcome.pruned_count, 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeEngine;

impl LatticeEngine {
    /// Prices a request.
    ///
    /// # Errors
    /// `LatticeError::NonFinitePrice` if the root value is not finite.
    pub fn price(request: &PricingRequest) -> Result<PricingOutcome, LatticeError> {
        let start = Instant::now();
        let mut lattice = LatticeBuilder::new(request.market(), request.steps())?.build();

        if request.needs_reach() {
            propagate_reach(&mut lattice);
        }
        let pruned_count = match request.pruning() {
            Some(threshold) => prune(&mut lattice, threshold),
            None => 0,
        };

        let price = match request.method() {
            PricingMethod::Backward => BackwardPricer.price(&mut lattice, request.option()),
            PricingMethod::Recursive => RecursivePricer::new().price(&mut lattice, request.option()),
        };
        let elapsed = start.elapsed();

        if !price.is_finite() {
            return Err(LatticeError::NonFinitePrice(price));
        }

        info!(
            price,
            steps = request.steps(),
            method = %request.method(),
            pruned = pruned_count,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "lattice priced"
        );

        Ok(PricingOutcome {
            price,
            elapsed,
            method: request.method(),
            steps: request.steps(),
            node_count: lattice.node_count(),
            pruned_count,
            lattice: request.retain_lattice().then_some(lattice),
        })
    }

    /// Prices a request and returns only the value.
    ///
    /// # Errors
    /// See [`LatticeEngine::price`].
    pub fn price_value(request: &PricingRequest) -> Result<f64, LatticeError> {
        Self::price(request).map(|outcome| outcome.price)
    }
}
