//! Convergence command implementation
//!
//! Tabulates lattice prices against Black-Scholes for a growing number of
//! steps, together with the theoretical error bound.

use pricer_pricing::analysis::{convergence_study, step_schedule, tree_error, ConvergencePoint};
use serde::Serialize;

use crate::config::CliConfig;
use crate::output::{print_json, OutputFormat, Table};
use crate::{CliError, Result};

/// One printed convergence row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConvergenceRow {
    /// Study point.
    #[serde(flatten)]
    pub point: ConvergencePoint,
    /// Theoretical bound at this step count.
    pub error_bound: f64,
}

/// Computes the convergence rows without printing them.
pub fn compute(config: &CliConfig, max_steps: usize, stride: usize) -> Result<Vec<ConvergenceRow>> {
    if max_steps == 0 {
        return Err(CliError::InvalidArgument("--max-steps must be positive".to_string()));
    }
    let request = config.request()?;
    let market = request.market();
    let steps = step_schedule(max_steps, stride);
    let points = convergence_study(&request, &steps)?;
    Ok(points
        .into_iter()
        .map(|point| ConvergenceRow {
            point,
            error_bound: tree_error(
                market.spot(),
                market.volatility(),
                market.rate(),
                market.maturity(),
                point.steps,
            ),
        })
        .collect())
}

/// Run the convergence command
pub fn run(config: &CliConfig, max_steps: usize, stride: usize) -> Result<()> {
    let rows = compute(config, max_steps, stride)?;
    match config.output.format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            let mut table = Table::new(["steps", "tree", "black-scholes", "error", "n·error", "bound"]);
            for row in &rows {
                let p = &row.point;
                table.row([
                    p.steps.to_string(),
                    format!("{:.6}", p.tree),
                    format!("{:.6}", p.black_scholes),
                    format!("{:+.2e}", p.error()),
                    format!("{:+.4}", p.scaled_error),
                    format!("{:.2e}", row.error_bound),
                ]);
            }
            print!("{table}");
        }
    }
    Ok(())
}
