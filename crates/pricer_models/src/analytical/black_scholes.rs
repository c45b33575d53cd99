//! Black-Scholes closed form for European options.
//!
//! Used as the reference value when checking lattice convergence and
//! finite-difference Greeks. It ignores dividends and early exercise.
//!
//! ## Formulas
//!
//! **Call**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! with d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T) and d₂ = d₁ - σ√T.

use num_traits::Float;

use super::distributions::{lit, norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use crate::instruments::PayoffType;

/// Analytical Greeks of a European option.
///
/// `theta` is the calendar-time decay `∂V/∂t = -∂V/∂T`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Greeks<T: Float> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// ∂V/∂σ
    pub vega: T,
    /// -∂V/∂T
    pub theta: T,
    /// ∂V/∂r
    pub rho: T,
    /// ∂²V/∂S∂σ
    pub vanna: T,
    /// ∂²V/∂σ²
    pub vomma: T,
}

/// Black-Scholes model for a given spot, rate and volatility.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K e^{-rT}
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// assert!((call - 10.4506).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or non-finite
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or non-finite
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, AnalyticalError> {
        if !spot.is_finite() || spot <= T::zero() {
            return Err(AnalyticalError::InvalidSpot {
                spot: spot.to_f64().unwrap_or(f64::NAN),
            });
        }
        if !volatility.is_finite() || volatility <= T::zero() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// d₁ and d₂ for a strike and expiry (`expiry > 0`).
    #[inline]
    pub fn d1_d2(&self, strike: T, expiry: T) -> (T, T) {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate + lit::<T>(0.5) * self.volatility * self.volatility) * expiry;
        let d1 = ((self.spot / strike).ln() + drift) / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// European call price. At or past expiry this is the intrinsic value.
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() {
            return PayoffType::Call.evaluate(self.spot, strike);
        }
        let (d1, d2) = self.d1_d2(strike, expiry);
        let df = (-self.rate * expiry).exp();
        self.spot * norm_cdf(d1) - strike * df * norm_cdf(d2)
    }

    /// European put price. At or past expiry this is the intrinsic value.
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() {
            return PayoffType::Put.evaluate(self.spot, strike);
        }
        let (d1, d2) = self.d1_d2(strike, expiry);
        let df = (-self.rate * expiry).exp();
        strike * df * norm_cdf(-d2) - self.spot * norm_cdf(-d1)
    }

    /// Price for either payoff type.
    #[inline]
    pub fn price(&self, strike: T, expiry: T, payoff: PayoffType) -> T {
        match payoff {
            PayoffType::Call => self.price_call(strike, expiry),
            PayoffType::Put => self.price_put(strike, expiry),
        }
    }

    /// Closed-form Greeks (`expiry > 0`).
    pub fn greeks(&self, strike: T, expiry: T, payoff: PayoffType) -> Greeks<T> {
        let (d1, d2) = self.d1_d2(strike, expiry);
        let sqrt_t = expiry.sqrt();
        let df = (-self.rate * expiry).exp();
        let pdf_d1 = norm_pdf(d1);
        let sigma = self.volatility;

        let gamma = pdf_d1 / (self.spot * sigma * sqrt_t);
        let vega = self.spot * pdf_d1 * sqrt_t;
        let decay = -self.spot * pdf_d1 * sigma / (lit::<T>(2.0) * sqrt_t);
        let vanna = -pdf_d1 * d2 / sigma;
        let vomma = vega * d1 * d2 / sigma;

        let (delta, theta, rho) = match payoff {
            PayoffType::Call => (
                norm_cdf(d1),
                decay - self.rate * strike * df * norm_cdf(d2),
                strike * expiry * df * norm_cdf(d2),
            ),
            PayoffType::Put => (
                norm_cdf(d1) - T::one(),
                decay + self.rate * strike * df * norm_cdf(-d2),
                -strike * expiry * df * norm_cdf(-d2),
            ),
        };

        Greeks {
            delta,
            gamma,
            vega,
            theta,
            rho,
            vanna,
            vomma,
        }
    }
}

fn validate_contract(strike: f64, expiry: f64) -> Result<(), AnalyticalError> {
    if !strike.is_finite() || strike <= 0.0 {
        return Err(AnalyticalError::InvalidStrike { strike });
    }
    if !expiry.is_finite() || expiry < 0.0 {
        return Err(AnalyticalError::InvalidExpiry { expiry });
    }
    Ok(())
}

/// One-shot Black-Scholes price.
///
/// # Errors
/// Any invalid spot, strike, volatility or expiry.
///
/// # Examples
/// ```
/// use pricer_models::analytical::bs_price;
///
/// let call = bs_price(100.0, 100.0, 0.10, 0.2, 1.0, true).unwrap();
/// assert!((call - 13.2697).abs() < 1e-3);
/// ```
pub fn bs_price(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    is_call: bool,
) -> Result<f64, AnalyticalError> {
    validate_contract(strike, expiry)?;
    let payoff = if is_call { PayoffType::Call } else { PayoffType::Put };
    Ok(BlackScholes::new(spot, rate, volatility)?.price(strike, expiry, payoff))
}

/// One-shot Black-Scholes Greeks.
///
/// # Errors
/// Any invalid spot, strike or volatility, or a non-positive expiry.
pub fn bs_greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    is_call: bool,
) -> Result<Greeks<f64>, AnalyticalError> {
    validate_contract(strike, expiry)?;
    if expiry == 0.0 {
        return Err(AnalyticalError::InvalidExpiry { expiry });
    }
    let payoff = if is_call { PayoffType::Call } else { PayoffType::Put };
    Ok(BlackScholes::new(spot, rate, volatility)?.greeks(strike, expiry, payoff))
}
