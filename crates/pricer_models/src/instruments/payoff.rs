//! Vanilla payoff types.

use num_traits::Float;
use std::fmt;
use std::str::FromStr;

use super::error::InstrumentError;

/// Call or put.
///
/// # Examples
/// ```
/// use pricer_models::instruments::PayoffType;
///
/// assert_eq!(PayoffType::Call.evaluate(110.0_f64, 100.0), 10.0);
/// assert_eq!(PayoffType::Put.evaluate(110.0_f64, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PayoffType {
    /// max(S - K, 0)
    Call,
    /// max(K - S, 0)
    Put,
}

impl PayoffType {
    /// Intrinsic value at spot `spot` for strike `strike`.
    #[inline]
    pub fn evaluate<T: Float>(&self, spot: T, strike: T) -> T {
        let intrinsic = match self {
            PayoffType::Call => spot - strike,
            PayoffType::Put => strike - spot,
        };
        intrinsic.max(T::zero())
    }

    /// True for a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, PayoffType::Call)
    }

    /// True for a put.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, PayoffType::Put)
    }
}

impl fmt::Display for PayoffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayoffType::Call => "call",
            PayoffType::Put => "put",
        })
    }
}

impl FromStr for PayoffType {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(PayoffType::Call),
            "put" | "p" => Ok(PayoffType::Put),
            other => Err(InstrumentError::InvalidParameter {
                message: format!("unknown payoff '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_payoff() {
        assert_eq!(PayoffType::Call.evaluate(110.0_f64, 100.0), 10.0);
        assert_eq!(PayoffType::Call.evaluate(90.0_f64, 100.0), 0.0);
        assert_eq!(PayoffType::Call.evaluate(100.0_f64, 100.0), 0.0);
    }

    #[test]
    fn test_put_payoff() {
        assert_eq!(PayoffType::Put.evaluate(90.0_f64, 100.0), 10.0);
        assert_eq!(PayoffType::Put.evaluate(110.0_f64, 100.0), 0.0);
    }

    #[test]
    fn test_payoff_f32() {
        assert_eq!(PayoffType::Put.evaluate(1.5_f32, 2.0), 0.5);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Call".parse::<PayoffType>().unwrap(), PayoffType::Call);
        assert_eq!(" p ".parse::<PayoffType>().unwrap(), PayoffType::Put);
        assert!("straddle".parse::<PayoffType>().is_err());
        assert_eq!(PayoffType::Put.to_string(), "put");
    }
}
