//! Sweep command implementation
//!
//! Reprices the configured option across strikes or volatilities and
//! compares with Black-Scholes.

use clap::ValueEnum;
use pricer_pricing::analysis::{
    default_strikes, default_volatilities, linspace, strike_sweep, volatility_sweep, SweepPoint,
};
use serde::Serialize;

use crate::config::CliConfig;
use crate::output::{print_json, OutputFormat, Table};
use crate::Result;

/// Swept parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepParameter {
    /// Strike, around the spot.
    #[default]
    Strike,
    /// Volatility.
    Volatility,
}

/// Grid selection for a sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepGrid {
    /// What to sweep.
    pub over: SweepParameter,
    /// Number of points; the default grid when `None`.
    pub points: Option<usize>,
}

impl SweepGrid {
    fn values(&self, spot: f64) -> Vec<f64> {
        match (self.over, self.points) {
            (SweepParameter::Strike, None) => default_strikes(spot),
            (SweepParameter::Strike, Some(n)) => linspace(0.9 * spot, 1.1 * spot, n),
            (SweepParameter::Volatility, None) => default_volatilities(),
            (SweepParameter::Volatility, Some(n)) => linspace(0.05, 0.5, n),
        }
    }
}

/// Computes the sweep without printing it.
pub fn compute(config: &CliConfig, grid: SweepGrid) -> Result<Vec<SweepPoint>> {
    let request = config.request()?;
    let values = grid.values(request.market().spot());
    let rows = match grid.over {
        SweepParameter::Strike => strike_sweep(&request, &values)?,
        SweepParameter::Volatility => volatility_sweep(&request, &values)?,
    };
    Ok(rows)
}

/// Run the sweep command
pub fn run(config: &CliConfig, grid: SweepGrid) -> Result<()> {
    let rows = compute(config, grid)?;
    match config.output.format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            let label = match grid.over {
                SweepParameter::Strike => "strike",
                SweepParameter::Volatility => "volatility",
            };
            let mut table = Table::new([label, "tree", "black-scholes", "difference"]);
            for row in &rows {
                table.row([
                    format!("{:.4}", row.parameter),
                    format!("{:.6}", row.tree),
                    format!("{:.6}", row.black_scholes),
                    format!("{:+.2e}", row.difference),
                ]);
            }
            print!("{table}");
        }
    }
    Ok(())
}
