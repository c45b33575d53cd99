//! Dates and year-fraction conversion.
//!
//! The lattice works in year fractions measured from the pricing date.
//! Callers holding calendar dates (maturity, ex-dividend dates) convert
//! them here first.
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{years_between, Date};
//!
//! let pricing = Date::from_ymd(2024, 1, 1).unwrap();
//! let ex_div = Date::from_ymd(2024, 4, 1).unwrap();
//!
//! let t = years_between(pricing, ex_div);
//! assert!((t - 91.0 / 365.0).abs() < 1e-12);
//! assert!(years_between(ex_div, pricing) < 0.0);
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Calendar date wrapper around `chrono::NaiveDate`.
///
/// Serialises as an ISO 8601 string (`YYYY-MM-DD`).
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = Date::from_ymd(2024, 6, 25).unwrap();
/// assert_eq!(later - date, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date from year, month and day.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDate` for impossible dates such as 2023-02-29.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`).
    ///
    /// # Errors
    /// Returns `DateError::ParseError` if the string is not a valid date.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", s, e)))
    }

    /// Returns the underlying `NaiveDate`.
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day-of-month component (1-31).
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Signed number of calendar days from `rhs` to `self`.
impl Sub for Date {
    type Output = i64;

    fn sub(self, rhs: Self) -> Self::Output {
        (self.0 - rhs.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count convention used to turn a date interval into a year fraction.
///
/// All conventions return a signed fraction: reversing the dates flips the sign.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual days / 365.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ACT/365F", alias = "ACT/365"))]
    Act365Fixed,

    /// Actual/360: actual days / 360.
    #[cfg_attr(feature = "serde", serde(rename = "ACT/360"))]
    Act360,

    /// 30/360 US bond basis.
    #[cfg_attr(feature = "serde", serde(rename = "30/360"))]
    Thirty360,
}

impl DayCountConvention {
    /// Market name of the convention.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Signed year fraction from `start` to `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// let end = Date::from_ymd(2024, 7, 1).unwrap();
    ///
    /// let act360 = DayCountConvention::Act360.year_fraction_dates(start, end);
    /// assert!((act360 - 182.0 / 360.0).abs() < 1e-12);
    ///
    /// let thirty = DayCountConvention::Thirty360.year_fraction_dates(start, end);
    /// assert!((thirty - 0.5).abs() < 1e-12);
    /// ```
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act365Fixed => years_between(start, end),
            DayCountConvention::Act360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (a, b, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };
                sign * thirty_360_days(a.into_inner(), b.into_inner()) as f64 / 360.0
            }
        }
    }
}

fn thirty_360_days(start: NaiveDate, end: NaiveDate) -> i32 {
    let d1 = start.day().min(30);
    let d2 = if end.day() == 31 && d1 == 30 { 30 } else { end.day() };
    360 * (end.year() - start.year())
        + 30 * (end.month() as i32 - start.month() as i32)
        + (d2 as i32 - d1 as i32)
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Case-insensitive; accepts `ACT/365F`, `ACT/365`, `ACT/360`, `30/360`
    /// with or without separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '_'], "").as_str() {
            "ACT365F" | "ACT365" | "ACT365FIXED" | "A365" => Ok(DayCountConvention::Act365Fixed),
            "ACT360" | "A360" => Ok(DayCountConvention::Act360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signed ACT/365F year fraction from `from` to `to`.
///
/// Negative when `to` precedes `from`. This is the default conversion for
/// maturities and ex-dividend dates.
#[inline]
pub fn years_between(from: Date, to: Date) -> f64 {
    (to - from) as f64 / 365.0
}
