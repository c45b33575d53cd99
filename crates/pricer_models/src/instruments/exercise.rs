//! Exercise style.

use std::fmt;
use std::str::FromStr;

use super::error::InstrumentError;

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExerciseStyle {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any lattice date up to expiry.
    American,
}

impl ExerciseStyle {
    /// True for European exercise.
    #[inline]
    pub fn is_european(&self) -> bool {
        matches!(self, ExerciseStyle::European)
    }

    /// True for American exercise.
    #[inline]
    pub fn is_american(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExerciseStyle::European => "european",
            ExerciseStyle::American => "american",
        })
    }
}

impl FromStr for ExerciseStyle {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" | "eu" | "e" => Ok(ExerciseStyle::European),
            "american" | "us" | "a" => Ok(ExerciseStyle::American),
            other => Err(InstrumentError::InvalidParameter {
                message: format!("unknown exercise style '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(ExerciseStyle::European.is_european());
        assert!(!ExerciseStyle::European.is_american());
        assert!(ExerciseStyle::American.is_american());
        assert_eq!(ExerciseStyle::default(), ExerciseStyle::European);
    }

    #[test]
    fn test_parse_round_trip() {
        for style in [ExerciseStyle::European, ExerciseStyle::American] {
            assert_eq!(style.to_string().parse::<ExerciseStyle>().unwrap(), style);
        }
        assert!("bermudan".parse::<ExerciseStyle>().is_err());
    }
}
