//! Bump sizes and selection for finite-difference Greeks.

use super::error::GreeksError;

/// Configuration for bump-and-revalue Greeks.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `spot_bump_relative` | 0.01 | Spot bump as a fraction of S0 |
/// | `vol_bump_absolute` | 0.005 | Absolute volatility bump |
/// | `rate_bump_absolute` | 1e-4 | Absolute rate bump (1bp) |
/// | `time_bump_years` | 1/365 | Maturity bump (one calendar day) |
/// | `first_order` | true | Compute delta, vega, theta, rho |
/// | `second_order` | true | Compute gamma, vanna, vomma |
/// | `parallel` | true | Revalue scenarios on the rayon pool |
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::GreeksConfig;
///
/// let config = GreeksConfig::builder()
///     .spot_bump_relative(0.02)
///     .second_order(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.spot_bump_relative, 0.02);
/// assert!(!config.second_order);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreeksConfig {
    /// Relative spot bump; the absolute bump is `S0 * spot_bump_relative`.
    pub spot_bump_relative: f64,
    /// Absolute volatility bump.
    pub vol_bump_absolute: f64,
    /// Absolute rate bump.
    pub rate_bump_absolute: f64,
    /// Maturity bump in years.
    pub time_bump_years: f64,
    /// Compute first-order Greeks.
    pub first_order: bool,
    /// Compute second-order Greeks.
    pub second_order: bool,
    /// Revalue scenarios in parallel.
    pub parallel: bool,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            spot_bump_relative: 0.01,
            vol_bump_absolute: 0.005,
            rate_bump_absolute: 1e-4,
            time_bump_years: 1.0 / 365.0,
            first_order: true,
            second_order: true,
            parallel: true,
        }
    }
}

impl GreeksConfig {
    /// Creates a builder starting from the defaults.
    #[inline]
    pub fn builder() -> GreeksConfigBuilder {
        GreeksConfigBuilder::default()
    }

    /// Validates the bump sizes.
    ///
    /// # Errors
    /// `GreeksError::InvalidConfig` if any bump is not positive and finite,
    /// or the spot bump exceeds 100%.
    pub fn validate(&self) -> Result<(), GreeksError> {
        let checks = [
            ("spot_bump_relative", self.spot_bump_relative),
            ("vol_bump_absolute", self.vol_bump_absolute),
            ("rate_bump_absolute", self.rate_bump_absolute),
            ("time_bump_years", self.time_bump_years),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(GreeksError::InvalidConfig { name, value });
            }
        }
        if self.spot_bump_relative > 1.0 {
            return Err(GreeksError::InvalidConfig {
                name: "spot_bump_relative",
                value: self.spot_bump_relative,
            });
        }
        Ok(())
    }
}

/// Builder for [`GreeksConfig`].
#[derive(Clone, Debug, Default)]
pub struct GreeksConfigBuilder {
    config: GreeksConfig,
}

impl GreeksConfigBuilder {
    /// Sets the relative spot bump.
    #[inline]
    pub fn spot_bump_relative(mut self, bump: f64) -> Self {
        self.config.spot_bump_relative = bump;
        self
    }

    /// Sets the absolute volatility bump.
    #[inline]
    pub fn vol_bump_absolute(mut self, bump: f64) -> Self {
        self.config.vol_bump_absolute = bump;
        self
    }

    /// Sets the absolute rate bump.
    #[inline]
    pub fn rate_bump_absolute(mut self, bump: f64) -> Self {
        self.config.rate_bump_absolute = bump;
        self
    }

    /// Sets the maturity bump in years.
    #[inline]
    pub fn time_bump_years(mut self, bump: f64) -> Self {
        self.config.time_bump_years = bump;
        self
    }

    /// Enables or disables first-order Greeks.
    #[inline]
    pub fn first_order(mut self, enabled: bool) -> Self {
        self.config.first_order = enabled;
        self
    }

    /// Enables or disables second-order Greeks.
    #[inline]
    pub fn second_order(mut self, enabled: bool) -> Self {
        self.config.second_order = enabled;
        self
    }

    /// Enables or disables parallel revaluation.
    #[inline]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// See [`GreeksConfig::validate`].
    pub fn build(self) -> Result<GreeksConfig, GreeksError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
