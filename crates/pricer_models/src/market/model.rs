//! Validated market snapshot for one valuation.

use pricer_core::types::{Date, DayCountConvention};

use super::dividend::{Dividend, DividendPolicy, DividendSchedule};
use super::error::MarketError;

/// Spot, rate, volatility, horizon and discrete dividends.
///
/// Built through [`MarketBuilder`] and read-only afterwards. Perturbed
/// copies for sensitivities come from the `with_*` methods, each of which
/// re-validates.
///
/// # Examples
/// ```
/// use pricer_models::market::{DividendPolicy, Market};
///
/// let market = Market::builder()
///     .spot(100.0)
///     .rate(0.05)
///     .volatility(0.2)
///     .maturity(1.0)
///     .dividend(0.5, DividendPolicy::new(0.02, 0.0, 0.0).unwrap())
///     .build()
///     .unwrap();
///
/// assert!(market.has_dividend_between(0.49, 0.51));
/// assert!((market.dividend_on_step(0.49, 0.51, 95.0) - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Market {
    spot: f64,
    rate: f64,
    volatility: f64,
    maturity: f64,
    dividends: DividendSchedule,
}

impl Market {
    /// Starts a builder.
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }

    /// Market without dividends.
    ///
    /// # Errors
    /// See [`MarketBuilder::build`].
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Result<Self, MarketError> {
        Self::builder()
            .spot(spot)
            .rate(rate)
            .volatility(volatility)
            .maturity(maturity)
            .build()
    }

    /// Market whose dividends are paid at `ex_dividend_times` and all follow
    /// `DividendPolicy::new(rho, lam, 0.0)`.
    ///
    /// # Errors
    /// Any policy or market validation failure.
    pub fn with_ex_dividend_times(
        spot: f64,
        rate: f64,
        volatility: f64,
        maturity: f64,
        ex_dividend_times: &[f64],
        rho: f64,
        lam: f64,
    ) -> Result<Self, MarketError> {
        let policy = DividendPolicy::new(rho, lam, 0.0)?;
        ex_dividend_times
            .iter()
            .fold(
                Self::builder()
                    .spot(spot)
                    .rate(rate)
                    .volatility(volatility)
                    .maturity(maturity),
                |b, &t| b.dividend(t, policy),
            )
            .build()
    }

    /// Market described with calendar dates.
    ///
    /// Maturity and ex-dividend dates are converted to year fractions from
    /// `pricing_date` under `day_count`. An ex-dividend date on or before the
    /// pricing date, or on or after maturity, is rejected like any other
    /// dividend outside `(0, T)`.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::{Date, DayCountConvention};
    /// use pricer_models::market::{DividendPolicy, Market};
    ///
    /// let pricing = Date::from_ymd(2024, 1, 2).unwrap();
    /// let maturity = Date::from_ymd(2025, 1, 1).unwrap();
    /// let ex_div = Date::from_ymd(2024, 6, 1).unwrap();
    ///
    /// let policy = DividendPolicy::with_yield(0.02).unwrap();
    /// let act365 = DayCountConvention::Act365Fixed;
    /// let market =
    ///     Market::from_dates(100.0, 0.03, 0.25, pricing, maturity, act365, &[(ex_div, policy)])
    ///         .unwrap();
    /// assert!((market.maturity() - 365.0 / 365.0).abs() < 1e-12);
    /// assert_eq!(market.dividends().len(), 1);
    /// ```
    pub fn from_dates(
        spot: f64,
        rate: f64,
        volatility: f64,
        pricing_date: Date,
        maturity_date: Date,
        day_count: DayCountConvention,
        dividends: &[(Date, DividendPolicy)],
    ) -> Result<Self, MarketError> {
        let years = |date: Date| day_count.year_fraction_dates(pricing_date, date);
        dividends
            .iter()
            .fold(
                Self::builder()
                    .spot(spot)
                    .rate(rate)
                    .volatility(volatility)
                    .maturity(years(maturity_date)),
                |b, (date, policy)| b.dividend(years(*date), *policy),
            )
            .build()
    }

    /// Initial spot `S0`.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Continuously compounded risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Horizon `T` in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Dividend schedule.
    #[inline]
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// True when no dividend is scheduled.
    #[inline]
    pub fn is_dividend_free(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Forward of the initial spot over `dt`, ignoring dividends.
    #[inline]
    pub fn forward_price(&self, dt: f64) -> f64 {
        self.spot * (self.rate * dt).exp()
    }

    /// Total dividend paid during the step `(t_i, t_ip1]` by a spot at `spot`.
    ///
    /// A dividend belongs to the step when
    /// `t_i + tol < t_div <= t_ip1 + tol` with `tol = (t_ip1 - t_i) / 1000`.
    /// The first step has no lower tolerance and owns every dividend in
    /// `(0, t_1 + tol]`. Consecutive steps partition time, so a dividend
    /// sitting on a grid point is counted once, in the step that ends there.
    pub fn dividend_on_step(&self, t_i: f64, t_ip1: f64, spot: f64) -> f64 {
        self.step_dividends(t_i, t_ip1)
            .map(|d| d.policy.amount(d.time, spot, self.spot))
            .sum()
    }

    /// True when at least one dividend belongs to the step `(t_i, t_ip1]`.
    pub fn has_dividend_between(&self, t_i: f64, t_ip1: f64) -> bool {
        self.step_dividends(t_i, t_ip1).next().is_some()
    }

    fn step_dividends(&self, t_i: f64, t_ip1: f64) -> impl Iterator<Item = &Dividend> {
        let tol = (t_ip1 - t_i) / 1000.0;
        self.dividends
            .iter()
            .filter(move |d| (t_i <= 0.0 || t_i + tol < d.time) && d.time <= t_ip1 + tol)
    }

    /// Copy with a different spot.
    ///
    /// # Errors
    /// `MarketError::InvalidSpot` if `spot` is not positive and finite.
    pub fn with_spot(&self, spot: f64) -> Result<Self, MarketError> {
        Self { spot, ..self.clone() }.validated()
    }

    /// Copy with a different rate.
    ///
    /// # Errors
    /// `MarketError::InvalidRate` if `rate` is not finite.
    pub fn with_rate(&self, rate: f64) -> Result<Self, MarketError> {
        Self { rate, ..self.clone() }.validated()
    }

    /// Copy with a different volatility.
    ///
    /// # Errors
    /// `MarketError::InvalidVolatility` if `volatility` is not positive and finite.
    pub fn with_volatility(&self, volatility: f64) -> Result<Self, MarketError> {
        Self {
            volatility,
            ..self.clone()
        }
        .validated()
    }

    /// Copy with a different horizon.
    ///
    /// Dividends at or after the new maturity are dropped: a dividend is
    /// never applied at or beyond `T`.
    ///
    /// # Errors
    /// `MarketError::InvalidMaturity` if `maturity` is not positive and finite.
    pub fn with_maturity(&self, maturity: f64) -> Result<Self, MarketError> {
        let mut bumped = Self {
            maturity,
            ..self.clone()
        };
        if maturity.is_finite() {
            bumped.dividends.retain(|d| d.time < maturity);
        }
        bumped.validated()
    }

    fn validated(self) -> Result<Self, MarketError> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(MarketError::InvalidSpot { spot: self.spot });
        }
        if !self.rate.is_finite() {
            return Err(MarketError::InvalidRate { rate: self.rate });
        }
        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(MarketError::InvalidVolatility {
                volatility: self.volatility,
            });
        }
        if !self.maturity.is_finite() || self.maturity <= 0.0 {
            return Err(MarketError::InvalidMaturity {
                maturity: self.maturity,
            });
        }
        if let Some(d) = self
            .dividends
            .iter()
            .find(|d| d.time <= 0.0 || d.time >= self.maturity)
        {
            return Err(MarketError::DividendOutsideHorizon {
                time: d.time,
                maturity: self.maturity,
            });
        }
        Ok(self)
    }
}

/// Builder for [`Market`].
///
/// `spot`, `volatility` and `maturity` are required; `rate` defaults to 0.
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    spot: Option<f64>,
    rate: f64,
    volatility: Option<f64>,
    maturity: Option<f64>,
    dividends: Vec<Dividend>,
}

impl MarketBuilder {
    /// Sets the initial spot.
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the risk-free rate.
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the volatility.
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the horizon in years.
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Adds a dividend at `time` years.
    pub fn dividend(mut self, time: f64, policy: DividendPolicy) -> Self {
        self.dividends.push(Dividend::new(time, policy));
        self
    }

    /// Adds every dividend of `schedule`.
    pub fn dividends(mut self, schedule: &DividendSchedule) -> Self {
        self.dividends.extend(schedule.iter().copied());
        self
    }

    /// Validates and builds the market.
    ///
    /// # Errors
    /// - `MissingParameter` if spot, volatility or maturity was not set
    /// - `InvalidSpot`, `InvalidRate`, `InvalidVolatility`, `InvalidMaturity`
    ///   for out-of-domain values
    /// - `DuplicateDividend` for two dividends at the same time
    /// - `DividendOutsideHorizon` for a dividend not strictly inside `(0, T)`
    pub fn build(self) -> Result<Market, MarketError> {
        let spot = self.spot.ok_or(MarketError::MissingParameter("spot"))?;
        let volatility = self
            .volatility
            .ok_or(MarketError::MissingParameter("volatility"))?;
        let maturity = self
            .maturity
            .ok_or(MarketError::MissingParameter("maturity"))?;
        Market {
            spot,
            rate: self.rate,
            volatility,
            maturity,
            dividends: DividendSchedule::new(self.dividends)?,
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cash(rho: f64) -> DividendPolicy {
        DividendPolicy::new(rho, 0.0, 0.0).unwrap()
    }

    fn base() -> MarketBuilder {
        Market::builder()
            .spot(100.0)
            .rate(0.05)
            .volatility(0.2)
            .maturity(1.0)
    }

    #[test]
    fn test_build_validates_each_parameter() {
        assert_eq!(
            base().spot(0.0).build(),
            Err(MarketError::InvalidSpot { spot: 0.0 })
        );
        assert_eq!(
            base().rate(f64::NAN).build().map_err(|e| e.to_string()).unwrap_err(),
            "Invalid rate: r = NaN (must be finite)"
        );
        assert_eq!(
            base().volatility(-0.2).build(),
            Err(MarketError::InvalidVolatility { volatility: -0.2 })
        );
        assert_eq!(
            base().maturity(0.0).build(),
            Err(MarketError::InvalidMaturity { maturity: 0.0 })
        );
        assert_eq!(
            Market::builder().spot(100.0).maturity(1.0).build(),
            Err(MarketError::MissingParameter("volatility"))
        );
    }

    #[test]
    fn test_negative_rate_is_accepted() {
        let market = base().rate(-0.01).build().unwrap();
        assert_eq!(market.rate(), -0.01);
    }

    #[test]
    fn test_dividend_must_be_inside_open_horizon() {
        for t in [0.0, 1.0, 1.2, -0.1] {
            assert!(matches!(
                base().dividend(t, cash(0.01)).build(),
                Err(MarketError::DividendOutsideHorizon { .. })
            ));
        }
        assert!(base().dividend(0.999, cash(0.01)).build().is_ok());
    }

    #[test]
    fn test_step_ownership_partitions_time() {
        let market = base().dividend(0.5, cash(0.02)).build().unwrap();
        let n = 200;
        let dt = 1.0 / n as f64;
        let owners: Vec<usize> = (0..n)
            .filter(|&i| market.has_dividend_between(i as f64 * dt, (i + 1) as f64 * dt))
            .collect();
        // 0.5 sits on the grid point between steps 99 and 100: only the step
        // ending there owns it.
        assert_eq!(owners, vec![99]);
    }

    #[test]
    fn test_first_step_owns_dividends_near_origin() {
        let market = base().dividend(5e-5, cash(0.02)).build().unwrap();
        let dt = 0.1;
        assert!(market.has_dividend_between(0.0, dt));
        assert_relative_eq!(market.dividend_on_step(0.0, dt, 100.0), 2.0, epsilon = 1e-12);
        assert!((1..10).all(|i| !market.has_dividend_between(i as f64 * dt, (i + 1) as f64 * dt)));

        // One step over the whole horizon still sees it.
        assert!(market.has_dividend_between(0.0, 1.0));
    }

    #[test]
    fn test_dividend_on_step_sums_policies() {
        let market = base()
            .dividend(0.30, cash(0.01))
            .dividend(0.31, DividendPolicy::new(0.02, 1.0, 0.0).unwrap())
            .build()
            .unwrap();
        let s = 90.0;
        let blended = DividendPolicy::new(0.02, 1.0, 0.0).unwrap().amount(0.31, s, 100.0);
        assert_relative_eq!(
            market.dividend_on_step(0.25, 0.35, s),
            1.0 + blended,
            epsilon = 1e-12
        );
        assert_eq!(market.dividend_on_step(0.35, 0.45, s), 0.0);
    }

    #[test]
    fn test_with_maturity_drops_dividends_at_or_after_horizon() {
        let market = base()
            .dividend(0.2, cash(0.01))
            .dividend(0.9, cash(0.01))
            .build()
            .unwrap();
        let shorter = market.with_maturity(0.9).unwrap();
        assert_eq!(shorter.dividends().len(), 1);
        assert_eq!(market.dividends().len(), 2);
        assert!(market.with_maturity(-1.0).is_err());
    }

    #[test]
    fn test_perturbations_revalidate() {
        let market = base().build().unwrap();
        assert_eq!(market.with_spot(101.0).unwrap().spot(), 101.0);
        assert_eq!(market.with_rate(0.06).unwrap().rate(), 0.06);
        assert_eq!(market.with_volatility(0.25).unwrap().volatility(), 0.25);
        assert!(market.with_volatility(0.0).is_err());
        assert!(market.with_spot(f64::INFINITY).is_err());
    }

    #[test]
    fn test_with_ex_dividend_times() {
        let market =
            Market::with_ex_dividend_times(100.0, 0.05, 0.2, 1.0, &[0.75, 0.25], 0.01, 0.5).unwrap();
        let times: Vec<f64> = market.dividends().iter().map(|d| d.time).collect();
        assert_eq!(times, vec![0.25, 0.75]);
        assert!(Market::with_ex_dividend_times(100.0, 0.05, 0.2, 1.0, &[0.5, 0.5], 0.01, 0.5).is_err());
    }

    #[test]
    fn test_from_dates_rejects_ex_date_before_pricing() {
        let pricing = Date::from_ymd(2024, 3, 1).unwrap();
        let maturity = Date::from_ymd(2024, 9, 1).unwrap();
        let past = Date::from_ymd(2024, 2, 1).unwrap();
        let act365 = DayCountConvention::Act365Fixed;
        let result =
            Market::from_dates(100.0, 0.02, 0.3, pricing, maturity, act365, &[(past, cash(0.01))]);
        assert!(matches!(result, Err(MarketError::DividendOutsideHorizon { .. })));

        let market = Market::from_dates(100.0, 0.02, 0.3, pricing, maturity, act365, &[]).unwrap();
        assert_relative_eq!(market.maturity(), 184.0 / 365.0);
    }

    #[test]
    fn test_from_dates_uses_day_count() {
        let pricing = Date::from_ymd(2024, 1, 31).unwrap();
        let maturity = Date::from_ymd(2024, 7, 31).unwrap();
        let ex_div = Date::from_ymd(2024, 3, 31).unwrap();
        let dividends = [(ex_div, cash(0.01))];

        let act360 = Market::from_dates(
            100.0, 0.02, 0.3, pricing, maturity, DayCountConvention::Act360, &dividends,
        )
        .unwrap();
        assert_relative_eq!(act360.maturity(), 182.0 / 360.0);

        let thirty = Market::from_dates(
            100.0, 0.02, 0.3, pricing, maturity, DayCountConvention::Thirty360, &dividends,
        )
        .unwrap();
        assert_relative_eq!(thirty.maturity(), 0.5);
        assert_relative_eq!(thirty.dividends().as_slice()[0].time, 60.0 / 360.0);
    }

    #[test]
    fn test_forward_price() {
        let market = base().build().unwrap();
        assert_relative_eq!(market.forward_price(1.0), 100.0 * 0.05_f64.exp());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn each_dividend_owned_by_exactly_one_step(
                t_div in 0.002f64..0.998,
                steps in 1usize..400,
            ) {
                let market = base().dividend(t_div, cash(0.01)).build().unwrap();
                let dt = market.maturity() / steps as f64;
                let owners = (0..steps)
                    .filter(|&i| market.has_dividend_between(i as f64 * dt, (i + 1) as f64 * dt))
                    .count();
                prop_assert_eq!(owners, 1);
            }
        }
    }
}
