//! Pricing request configuration and outcome.
//!
//! A [`PricingRequest`] bundles everything one lattice valuation needs and is
//! validated once at build time, so the engine never sees an invalid step
//! count or threshold.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pricer_models::instruments::VanillaOption;
use pricer_models::market::Market;

use super::error::LatticeError;
use super::node::Lattice;
use super::pruning::PruningThreshold;

/// Maximum number of lattice steps allowed.
///
/// The lattice stores `(N + 1)^2` node slots, so memory grows with the
/// square of the step count: the cap keeps a full lattice under 2 GiB.
pub const MAX_STEPS: usize = 4_000;

/// Lattice valuation method.
///
/// Both methods evaluate the same recursion and agree to within `1e-8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PricingMethod {
    /// Bottom-up dynamic program over levels.
    #[default]
    Backward,

    /// Top-down memoized evaluation from the root.
    Recursive,
}

impl PricingMethod {
    /// Both methods, backward first.
    pub const ALL: [PricingMethod; 2] = [PricingMethod::Backward, PricingMethod::Recursive];

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            PricingMethod::Backward => "backward",
            PricingMethod::Recursive => "recursive",
        }
    }
}

impl fmt::Display for PricingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PricingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backward" | "induction" => Ok(PricingMethod::Backward),
            "recursive" | "memo" => Ok(PricingMethod::Recursive),
            other => Err(format!("unknown pricing method '{other}'")),
        }
    }
}

/// A validated lattice pricing request.
///
/// # Examples
///
/// ```rust
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::lattice::{PricingMethod, PricingRequest};
///
/// let request = PricingRequest::builder()
///     .market(Market::new(100.0, 0.05, 0.2, 1.0).unwrap())
///     .option(VanillaOption::american_put(100.0).unwrap())
///     .steps(300)
///     .method(PricingMethod::Recursive)
///     .pruning(1e-7)
///     .build()
///     .expect("valid request");
///
/// assert_eq!(request.steps(), 300);
/// assert_eq!(request.pruning().map(|t| t.value()), Some(1e-7));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PricingRequest {
    market: Market,
    option: VanillaOption,
    steps: usize,
    method: PricingMethod,
    pruning: Option<PruningThreshold>,
    retain_lattice: bool,
}

impl PricingRequest {
    /// Creates a new request builder.
    #[inline]
    pub fn builder() -> PricingRequestBuilder {
        PricingRequestBuilder::default()
    }

    /// Market inputs.
    #[inline]
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Option contract.
    #[inline]
    pub fn option(&self) -> &VanillaOption {
        &self.option
    }

    /// Number of lattice steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Valuation method.
    #[inline]
    pub fn method(&self) -> PricingMethod {
        self.method
    }

    /// Pruning threshold, if pruning is enabled.
    #[inline]
    pub fn pruning(&self) -> Option<PruningThreshold> {
        self.pruning
    }

    /// Whether the priced lattice is returned in the outcome.
    #[inline]
    pub fn retain_lattice(&self) -> bool {
        self.retain_lattice
    }

    /// Whether reach probabilities must be propagated.
    #[inline]
    pub fn needs_reach(&self) -> bool {
        self.pruning.is_some() || self.retain_lattice
    }

    /// Same request on a different market.
    pub fn with_market(&self, market: Market) -> Self {
        Self {
            market,
            ..self.clone()
        }
    }

    /// Same request with a different step count.
    ///
    /// # Errors
    /// `LatticeError::InvalidStepCount` unless `1 <= steps <= MAX_STEPS`.
    pub fn with_steps(&self, steps: usize) -> Result<Self, LatticeError> {
        validate_steps(steps)?;
        Ok(Self {
            steps,
            ..self.clone()
        })
    }

    /// Same request with a different method.
    pub fn with_method(&self, method: PricingMethod) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    /// Same request with pruning set or cleared.
    pub fn with_pruning(&self, pruning: Option<PruningThreshold>) -> Self {
        Self {
            pruning,
            ..self.clone()
        }
    }

    /// Same request on a different option.
    pub fn with_option(&self, option: VanillaOption) -> Self {
        Self {
            option,
            ..self.clone()
        }
    }

    /// Same request, keeping or dropping the priced lattice.
    pub fn with_retain_lattice(&self, retain_lattice: bool) -> Self {
        Self {
            retain_lattice,
            ..self.clone()
        }
    }
}

fn validate_steps(steps: usize) -> Result<(), LatticeError> {
    if steps == 0 || steps > MAX_STEPS {
        return Err(LatticeError::InvalidStepCount(steps));
    }
    Ok(())
}

/// Builder for [`PricingRequest`].
///
/// `market`, `option` and `steps` are required. The method defaults to
/// [`PricingMethod::Backward`], pruning is off and the lattice is dropped
/// after pricing.
#[derive(Clone, Debug, Default)]
pub struct PricingRequestBuilder {
    market: Option<Market>,
    option: Option<VanillaOption>,
    steps: Option<usize>,
    method: PricingMethod,
    pruning: Option<f64>,
    retain_lattice: bool,
}

impl PricingRequestBuilder {
    /// Sets the market.
    #[inline]
    pub fn market(mut self, market: Market) -> Self {
        self.market = Some(market);
        self
    }

    /// Sets the option.
    #[inline]
    pub fn option(mut self, option: VanillaOption) -> Self {
        self.option = Some(option);
        self
    }

    /// Sets the number of steps in `[1, MAX_STEPS]`.
    #[inline]
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Sets the valuation method.
    #[inline]
    pub fn method(mut self, method: PricingMethod) -> Self {
        self.method = method;
        self
    }

    /// Enables pruning with `threshold` in `[0, 1)`.
    #[inline]
    pub fn pruning(mut self, threshold: f64) -> Self {
        self.pruning = Some(threshold);
        self
    }

    /// Sets or clears the pruning threshold.
    #[inline]
    pub fn maybe_pruning(mut self, threshold: Option<f64>) -> Self {
        self.pruning = threshold;
        self
    }

    /// Keeps the priced lattice in the outcome.
    #[inline]
    pub fn retain_lattice(mut self, retain: bool) -> Self {
        self.retain_lattice = retain;
        self
    }

    /// Builds the request.
    ///
    /// # Errors
    /// - `LatticeError::MissingParameter` if `market`, `option` or `steps` is unset
    /// - `LatticeError::InvalidStepCount` if `steps` is out of range
    /// - `LatticeError::InvalidPruningThreshold` if the threshold is not in `[0, 1)`
    pub fn build(self) -> Result<PricingRequest, LatticeError> {
        let market = self.market.ok_or(LatticeError::MissingParameter("market"))?;
        let option = self.option.ok_or(LatticeError::MissingParameter("option"))?;
        let steps = self.steps.ok_or(LatticeError::MissingParameter("steps"))?;
        validate_steps(steps)?;
        let pruning = self.pruning.map(PruningThreshold::new).transpose()?;

        Ok(PricingRequest {
            market,
            option,
            steps,
            method: self.method,
            pruning,
            retain_lattice: self.retain_lattice,
        })
    }
}

/// Result of one lattice valuation.
#[derive(Clone, Debug)]
pub struct PricingOutcome {
    /// Option value at the root.
    pub price: f64,
    /// Wall time from lattice construction to root value.
    pub elapsed: Duration,
    /// Method used.
    pub method: PricingMethod,
    /// Number of steps.
    pub steps: usize,
    /// Surviving node count after pruning.
    pub node_count: usize,
    /// Nodes removed by pruning.
    pub pruned_count: usize,
    /// The priced lattice when the request asked to keep it.
    pub lattice: Option<Lattice>,
}

impl PricingOutcome {
    /// Elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }
}
