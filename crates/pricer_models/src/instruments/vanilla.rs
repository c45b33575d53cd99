//! Vanilla option contract.

use super::error::InstrumentError;
use super::exercise::ExerciseStyle;
use super::payoff::PayoffType;

/// Single-underlying vanilla option: strike, payoff and exercise style.
///
/// Expiry is a market property (the lattice horizon), so the contract only
/// carries what the payoff needs.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ExerciseStyle, PayoffType, VanillaOption};
///
/// let put = VanillaOption::new(110.0, PayoffType::Put, ExerciseStyle::American).unwrap();
/// assert_eq!(put.payoff(100.0), 10.0);
/// assert!(put.is_american());
///
/// assert!(VanillaOption::new(0.0, PayoffType::Call, ExerciseStyle::European).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaOption {
    strike: f64,
    payoff_type: PayoffType,
    exercise: ExerciseStyle,
}

impl VanillaOption {
    /// Creates an option.
    ///
    /// # Errors
    /// `InstrumentError::InvalidStrike` if `strike` is not positive and finite.
    pub fn new(
        strike: f64,
        payoff_type: PayoffType,
        exercise: ExerciseStyle,
    ) -> Result<Self, InstrumentError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        Ok(Self {
            strike,
            payoff_type,
            exercise,
        })
    }

    /// European call.
    pub fn european_call(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(strike, PayoffType::Call, ExerciseStyle::European)
    }

    /// European put.
    pub fn european_put(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(strike, PayoffType::Put, ExerciseStyle::European)
    }

    /// American call.
    pub fn american_call(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(strike, PayoffType::Call, ExerciseStyle::American)
    }

    /// American put.
    pub fn american_put(strike: f64) -> Result<Self, InstrumentError> {
        Self::new(strike, PayoffType::Put, ExerciseStyle::American)
    }

    /// Intrinsic value at `spot`.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        self.payoff_type.evaluate(spot, self.strike)
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Call or put.
    #[inline]
    pub fn payoff_type(&self) -> PayoffType {
        self.payoff_type
    }

    /// Exercise style.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// True for a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.payoff_type.is_call()
    }

    /// True when early exercise is allowed.
    #[inline]
    pub fn is_american(&self) -> bool {
        self.exercise.is_american()
    }

    /// Same contract with another strike.
    ///
    /// # Errors
    /// `InstrumentError::InvalidStrike` if `strike` is not positive and finite.
    pub fn with_strike(&self, strike: f64) -> Result<Self, InstrumentError> {
        Self::new(strike, self.payoff_type, self.exercise)
    }

    /// Same contract with another exercise style.
    pub fn with_exercise(&self, exercise: ExerciseStyle) -> Self {
        Self { exercise, ..*self }
    }
}
