//! Discrete dividend model.
//!
//! A dividend paid at time `t` is described by a [`DividendPolicy`] that
//! blends a cash component fixed at the initial spot into a component
//! proportional to the prevailing spot:
//!
//! ```text
//! amount(t, S, S0) = rho * (S0 * exp(-lam (t - t0)) + S * (1 - exp(-lam (t - t0))))
//! ```
//!
//! With `lam = 0` the payment is the fixed cash amount `rho * S0`; as
//! `lam (t - t0)` grows it tends to the proportional payment `rho * S`.

use super::error::MarketError;

/// Default blending speed between the cash and proportional components.
pub const DEFAULT_LAMBDA: f64 = 0.5;

/// Dividend amount rule.
///
/// # Examples
/// ```
/// use pricer_models::market::DividendPolicy;
///
/// // Pure cash dividend: 2% of the initial spot regardless of S.
/// let cash = DividendPolicy::new(0.02, 0.0, 0.0).unwrap();
/// assert!((cash.amount(0.5, 80.0, 100.0) - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividendPolicy {
    rho: f64,
    lam: f64,
    t0: f64,
}

impl DividendPolicy {
    /// Creates a policy after validating its parameters.
    ///
    /// # Errors
    /// `MarketError::InvalidDividendPolicy` if `rho` or `lam` is negative or
    /// non-finite, or `t0` is non-finite.
    pub fn new(rho: f64, lam: f64, t0: f64) -> Result<Self, MarketError> {
        if !rho.is_finite() || rho < 0.0 {
            return Err(MarketError::InvalidDividendPolicy {
                name: "rho",
                value: rho,
            });
        }
        if !lam.is_finite() || lam < 0.0 {
            return Err(MarketError::InvalidDividendPolicy {
                name: "lam",
                value: lam,
            });
        }
        if !t0.is_finite() {
            return Err(MarketError::InvalidDividendPolicy {
                name: "t0",
                value: t0,
            });
        }
        Ok(Self { rho, lam, t0 })
    }

    /// Policy with the default blending speed and `t0 = 0`.
    pub fn with_yield(rho: f64) -> Result<Self, MarketError> {
        Self::new(rho, DEFAULT_LAMBDA, 0.0)
    }

    /// Dividend intensity.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Blending speed from cash to proportional.
    #[inline]
    pub fn lam(&self) -> f64 {
        self.lam
    }

    /// Reference time for the blending.
    #[inline]
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// Amount paid at time `t` when the spot is `spot` and the initial spot
    /// was `initial_spot`.
    #[inline]
    pub fn amount(&self, t: f64, spot: f64, initial_spot: f64) -> f64 {
        let decay = (-self.lam * (t - self.t0)).exp();
        self.rho * (initial_spot * decay + spot * (1.0 - decay))
    }
}

/// A dividend paid at a given time (years from the pricing date).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dividend {
    /// Ex-dividend time in years.
    pub time: f64,
    /// Amount rule.
    pub policy: DividendPolicy,
}

impl Dividend {
    /// Creates a dividend.
    pub fn new(time: f64, policy: DividendPolicy) -> Self {
        Self { time, policy }
    }
}

/// Dividends ordered by time, unique by time.
///
/// The schedule itself only checks ordering and uniqueness; the horizon
/// check against maturity happens when a [`Market`](super::Market) is built.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DividendSchedule {
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// Empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts the dividends by time and rejects duplicates.
    ///
    /// # Errors
    /// `MarketError::DuplicateDividend` if two dividends share a time, or
    /// `MarketError::DividendOutsideHorizon` for a non-finite time.
    pub fn new(mut dividends: Vec<Dividend>) -> Result<Self, MarketError> {
        if let Some(bad) = dividends.iter().find(|d| !d.time.is_finite()) {
            return Err(MarketError::DividendOutsideHorizon {
                time: bad.time,
                maturity: f64::NAN,
            });
        }
        dividends.sort_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(pair) = dividends.windows(2).find(|w| w[0].time == w[1].time) {
            return Err(MarketError::DuplicateDividend { time: pair[0].time });
        }
        Ok(Self { dividends })
    }

    /// Number of dividends.
    #[inline]
    pub fn len(&self) -> usize {
        self.dividends.len()
    }

    /// True when the schedule holds no dividend.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Iterates in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dividend> {
        self.dividends.iter()
    }

    /// Dividends as a slice, in time order.
    pub fn as_slice(&self) -> &[Dividend] {
        &self.dividends
    }

    /// Keeps only the dividends satisfying `keep`.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&Dividend) -> bool) {
        self.dividends.retain(keep);
    }
}

impl<'a> IntoIterator for &'a DividendSchedule {
    type Item = &'a Dividend;
    type IntoIter = std::slice::Iter<'a, Dividend>;

    fn into_iter(self) -> Self::IntoIter {
        self.dividends.iter()
    }
}
