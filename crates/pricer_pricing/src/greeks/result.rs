//! Greeks calculation result type.
//!
//! Provides [`GreeksResult<T>`], holding a price and whichever
//! sensitivities were requested, and [`Greek`], naming each of them.

use std::fmt;

use num_traits::Float;

/// A single sensitivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Greek {
    /// ∂V/∂S.
    Delta,
    /// ∂V/∂σ.
    Vega,
    /// −∂V/∂T.
    Theta,
    /// ∂V/∂r.
    Rho,
    /// ∂²V/∂S².
    Gamma,
    /// ∂²V/∂S∂σ.
    Vanna,
    /// ∂²V/∂σ².
    Vomma,
}

impl Greek {
    /// All Greeks, first-order first.
    pub const ALL: [Greek; 7] = [
        Greek::Delta,
        Greek::Vega,
        Greek::Theta,
        Greek::Rho,
        Greek::Gamma,
        Greek::Vanna,
        Greek::Vomma,
    ];

    /// True for delta, vega, theta and rho.
    #[inline]
    pub fn is_first_order(&self) -> bool {
        matches!(self, Greek::Delta | Greek::Vega | Greek::Theta | Greek::Rho)
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
            Greek::Rho => "rho",
            Greek::Gamma => "gamma",
            Greek::Vanna => "vanna",
            Greek::Vomma => "vomma",
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Greeks calculation result with optional sensitivities.
///
/// # First-Order Greeks
///
/// - `delta`: ∂V/∂S - Sensitivity to spot price
/// - `vega`: ∂V/∂σ - Sensitivity to volatility
/// - `theta`: −∂V/∂T - Time decay
/// - `rho`: ∂V/∂r - Sensitivity to interest rate
///
/// # Second-Order Greeks
///
/// - `gamma`: ∂²V/∂S² - Convexity with respect to spot
/// - `vanna`: ∂²V/∂S∂σ - Cross sensitivity (delta-vol)
/// - `vomma`: ∂²V/∂σ² - Volatility convexity
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::{Greek, GreeksResult};
///
/// let result = GreeksResult::new(10.5).with_delta(0.55).with_vega(25.0);
///
/// assert!(result.has_first_order_greeks());
/// assert!(!result.has_second_order_greeks());
/// assert_eq!(result.get(Greek::Delta), Some(0.55));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksResult<T: Float> {
    /// Present value at the unbumped inputs.
    pub price: T,

    // First-order Greeks
    /// Delta: ∂V/∂S (sensitivity to spot price).
    pub delta: Option<T>,
    /// Vega: ∂V/∂σ (sensitivity to volatility).
    pub vega: Option<T>,
    /// Theta: −∂V/∂T (time decay).
    pub theta: Option<T>,
    /// Rho: ∂V/∂r (sensitivity to interest rate).
    pub rho: Option<T>,

    // Second-order Greeks
    /// Gamma: ∂²V/∂S² (convexity with respect to spot).
    pub gamma: Option<T>,
    /// Vanna: ∂²V/∂S∂σ (cross sensitivity between spot and volatility).
    pub vanna: Option<T>,
    /// Vomma: ∂²V/∂σ² (volatility convexity).
    pub vomma: Option<T>,
}

impl<T: Float> Default for GreeksResult<T> {
    fn default() -> Self {
        Self {
            price: T::zero(),
            delta: None,
            gamma: None,
            vega: None,
            theta: None,
            rho: None,
            vanna: None,
            vomma: None,
        }
    }
}

impl<T: Float> GreeksResult<T> {
    /// Creates a result with only the price; all Greeks are `None`.
    #[inline]
    pub fn new(price: T) -> Self {
        Self {
            price,
            ..Default::default()
        }
    }

    /// Sets the delta and returns self for method chaining.
    #[inline]
    pub fn with_delta(mut self, delta: T) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Sets the gamma and returns self for method chaining.
    #[inline]
    pub fn with_gamma(mut self, gamma: T) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Sets the vega and returns self for method chaining.
    #[inline]
    pub fn with_vega(mut self, vega: T) -> Self {
        self.vega = Some(vega);
        self
    }

    /// Sets the theta and returns self for method chaining.
    #[inline]
    pub fn with_theta(mut self, theta: T) -> Self {
        self.theta = Some(theta);
        self
    }

    /// Sets the rho and returns self for method chaining.
    #[inline]
    pub fn with_rho(mut self, rho: T) -> Self {
        self.rho = Some(rho);
        self
    }

    /// Sets the vanna and returns self for method chaining.
    #[inline]
    pub fn with_vanna(mut self, vanna: T) -> Self {
        self.vanna = Some(vanna);
        self
    }

    /// Sets the vomma and returns self for method chaining.
    #[inline]
    pub fn with_vomma(mut self, vomma: T) -> Self {
        self.vomma = Some(vomma);
        self
    }

    /// Value of one Greek, if computed.
    pub fn get(&self, greek: Greek) -> Option<T> {
        match greek {
            Greek::Delta => self.delta,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
            Greek::Gamma => self.gamma,
            Greek::Vanna => self.vanna,
            Greek::Vomma => self.vomma,
        }
    }

    /// Computed Greeks in [`Greek::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Greek, T)> + '_ {
        Greek::ALL
            .into_iter()
            .filter_map(move |g| self.get(g).map(|v| (g, v)))
    }

    /// Returns true if any first-order Greek is computed.
    #[inline]
    pub fn has_first_order_greeks(&self) -> bool {
        self.delta.is_some() || self.vega.is_some() || self.theta.is_some() || self.rho.is_some()
    }

    /// Returns true if any second-order Greek is computed.
    #[inline]
    pub fn has_second_order_greeks(&self) -> bool {
        self.gamma.is_some() || self.vanna.is_some() || self.vomma.is_some()
    }
}
