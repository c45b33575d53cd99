//! CLI configuration management
//!
//! Settings are resolved from, highest priority first:
//! 1. Command-line flags ([`Overrides`])
//! 2. Environment variables prefixed `TRINOMIAL_` (`__` separates sections,
//!    e.g. `TRINOMIAL_LATTICE__STEPS=500`)
//! 3. The TOML configuration file (optional)
//! 4. Built-in defaults

use std::path::Path;

use clap::Args;
use config::{Config, Environment, File, Source};
use pricer_core::types::{Date, DayCountConvention};
use pricer_models::instruments::{ExerciseStyle, PayoffType, VanillaOption};
use pricer_models::market::{DividendPolicy, Market, DEFAULT_LAMBDA};
use pricer_pricing::greeks::GreeksConfig;
use pricer_pricing::lattice::{PricingMethod, PricingRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::OutputFormat;
use crate::{CliError, Result};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TRINOMIAL";

/// Fully merged CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Market data.
    pub market: MarketSection,
    /// Contract.
    pub option: OptionSection,
    /// Lattice settings.
    pub lattice: LatticeSection,
    /// Finite-difference bumps and selection.
    pub greeks: GreeksConfig,
    /// Output settings.
    pub output: OutputSection,
}

/// `[market]` table.
///
/// `maturity` is in years. When `maturity_date` is set it takes precedence
/// and `pricing_date` becomes mandatory; dates are then turned into year
/// fractions from `pricing_date` under `day_count` (ACT/365F by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    /// Initial spot `S0`.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Black-Scholes volatility.
    pub volatility: f64,
    /// Maturity in years.
    pub maturity: f64,
    /// Valuation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_date: Option<Date>,
    /// Expiry date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<Date>,
    /// Convention for date-based times.
    pub day_count: DayCountConvention,
    /// Discrete dividends.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dividends: Vec<DividendEntry>,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
            pricing_date: None,
            maturity_date: None,
            day_count: DayCountConvention::default(),
            dividends: Vec::new(),
        }
    }
}

/// One `[[market.dividends]]` entry, timed either in years or by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEntry {
    /// Ex-dividend time in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    /// Ex-dividend date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    /// Dividend intensity.
    pub rho: f64,
    /// Blending speed from cash to proportional.
    #[serde(default = "default_lambda")]
    pub lam: f64,
    /// Reference time of the blend.
    #[serde(default)]
    pub t0: f64,
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

/// `[option]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSection {
    /// Call or put.
    pub payoff: PayoffType,
    /// European or American.
    pub exercise: ExerciseStyle,
    /// Strike.
    pub strike: f64,
}

impl Default for OptionSection {
    fn default() -> Self {
        Self {
            payoff: PayoffType::Call,
            exercise: ExerciseStyle::European,
            strike: 100.0,
        }
    }
}

/// `[lattice]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeSection {
    /// Number of time steps.
    pub steps: usize,
    /// Pricer.
    pub method: PricingMethod,
    /// Reach-probability pruning threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruning: Option<f64>,
}

impl Default for LatticeSection {
    fn default() -> Self {
        Self {
            steps: 200,
            method: PricingMethod::Backward,
            pruning: None,
        }
    }
}

/// `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Result format.
    pub format: OutputFormat,
}

/// Flags shared by every command; each one overrides its configured value.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Initial spot price
    #[arg(long)]
    pub spot: Option<f64>,

    /// Risk-free rate (continuously compounded)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Volatility
    #[arg(long)]
    pub volatility: Option<f64>,

    /// Maturity in years
    #[arg(long)]
    pub maturity: Option<f64>,

    /// Day count for date inputs (ACT/365F, ACT/360, 30/360)
    #[arg(long)]
    pub day_count: Option<DayCountConvention>,

    /// Strike
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Payoff (call, put)
    #[arg(long)]
    pub payoff: Option<PayoffType>,

    /// Exercise style (european, american)
    #[arg(long)]
    pub exercise: Option<ExerciseStyle>,

    /// Number of lattice steps
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Pricing method (backward, recursive)
    #[arg(short, long)]
    pub method: Option<PricingMethod>,

    /// Reach-probability pruning threshold
    #[arg(long)]
    pub pruning: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl CliConfig {
    /// Loads `path` (skipped when absent) and `TRINOMIAL_*` variables.
    ///
    /// # Errors
    /// `CliError::Config` if a source is malformed or a value has the wrong type.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), exists = path.exists(), "loading configuration");
        Self::from_sources(File::from(path).required(false), environment())
    }

    /// Merges a file-like source with an environment source.
    pub(crate) fn from_sources<S>(file: S, env: Environment) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder().add_source(file).add_source(env).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Applies command-line overrides.
    pub fn merge_with_cli(&mut self, cli: &Overrides) {
        if let Some(spot) = cli.spot {
            self.market.spot = spot;
        }
        if let Some(rate) = cli.rate {
            self.market.rate = rate;
        }
        if let Some(volatility) = cli.volatility {
            self.market.volatility = volatility;
        }
        if let Some(maturity) = cli.maturity {
            self.market.maturity = maturity;
            self.market.maturity_date = None;
        }
        if let Some(day_count) = cli.day_count {
            self.market.day_count = day_count;
        }
        if let Some(strike) = cli.strike {
            self.option.strike = strike;
        }
        if let Some(payoff) = cli.payoff {
            self.option.payoff = payoff;
        }
        if let Some(exercise) = cli.exercise {
            self.option.exercise = exercise;
        }
        if let Some(steps) = cli.steps {
            self.lattice.steps = steps;
        }
        if let Some(method) = cli.method {
            self.lattice.method = method;
        }
        if let Some(pruning) = cli.pruning {
            self.lattice.pruning = Some(pruning);
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
    }

    fn years_to(&self, date: Date, what: &str) -> Result<f64> {
        let pricing_date = self.market.pricing_date.ok_or_else(|| {
            CliError::InvalidArgument(format!("{what} given as a date requires market.pricing_date"))
        })?;
        Ok(self.market.day_count.year_fraction_dates(pricing_date, date))
    }

    /// Builds the market, converting dates to year fractions.
    ///
    /// # Errors
    /// `CliError::InvalidArgument` for a date without `pricing_date` or a
    /// dividend with neither `time` nor `date`; `CliError::Market` for
    /// rejected parameters.
    pub fn market(&self) -> Result<Market> {
        let m = &self.market;
        let maturity = match m.maturity_date {
            Some(date) => self.years_to(date, "maturity")?,
            None => m.maturity,
        };

        let mut builder = Market::builder()
            .spot(m.spot)
            .rate(m.rate)
            .volatility(m.volatility)
            .maturity(maturity);
        for entry in &m.dividends {
            let time = match (entry.time, entry.date) {
                (Some(t), _) => t,
                (None, Some(date)) => self.years_to(date, "dividend")?,
                (None, None) => {
                    return Err(CliError::InvalidArgument(
                        "dividend needs a time or a date".to_string(),
                    ))
                }
            };
            builder = builder.dividend(time, DividendPolicy::new(entry.rho, entry.lam, entry.t0)?);
        }
        Ok(builder.build()?)
    }

    /// Builds the option.
    pub fn option(&self) -> Result<VanillaOption> {
        let o = &self.option;
        Ok(VanillaOption::new(o.strike, o.payoff, o.exercise)?)
    }

    /// Builds the pricing request.
    pub fn request(&self) -> Result<PricingRequest> {
        Ok(PricingRequest::builder()
            .market(self.market()?)
            .option(self.option()?)
            .steps(self.lattice.steps)
            .method(self.lattice.method)
            .maybe_pruning(self.lattice.pruning)
            .build()?)
    }

    /// Validated Greeks settings.
    pub fn greeks_config(&self) -> Result<GreeksConfig> {
        self.greeks.validate()?;
        Ok(self.greeks.clone())
    }

    /// TOML rendering of the resolved configuration.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
