//! Price command implementation
//!
//! Prices one request and optionally writes the priced lattice as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use pricer_pricing::analysis::{black_scholes_reference, tree_error};
use pricer_pricing::lattice::{LatticeEngine, PricingMethod, PricingOutcome};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::output::{cell, print_json, OutputFormat, Table};
use crate::Result;

/// Printed result of the price command.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// Lattice price.
    pub price: f64,
    /// Build plus pricing time.
    pub elapsed_ms: f64,
    /// Pricer used.
    pub method: PricingMethod,
    /// Number of steps.
    pub steps: usize,
    /// Live nodes after pruning.
    pub node_count: usize,
    /// Pruned nodes.
    pub pruned_count: usize,
    /// Black-Scholes price, for European options on dividend-free markets.
    pub black_scholes: Option<f64>,
    /// Leading-order discretisation error for an at-the-money option.
    pub error_bound: f64,
}

impl PriceReport {
    fn new(outcome: &PricingOutcome, black_scholes: Option<f64>, error_bound: f64) -> Self {
        Self {
            price: outcome.price,
            elapsed_ms: outcome.elapsed_ms(),
            method: outcome.method,
            steps: outcome.steps,
            node_count: outcome.node_count,
            pruned_count: outcome.pruned_count,
            black_scholes,
            error_bound,
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new(["quantity", "value"]);
        table
            .row(["price".to_string(), format!("{:.6}", self.price)])
            .row(["method".to_string(), self.method.to_string()])
            .row(["steps".to_string(), self.steps.to_string()])
            .row(["nodes".to_string(), self.node_count.to_string()])
            .row(["pruned".to_string(), self.pruned_count.to_string()])
            .row(["elapsed (ms)".to_string(), format!("{:.3}", self.elapsed_ms)])
            .row(["error bound".to_string(), format!("{:.2e}", self.error_bound)]);
        if self.black_scholes.is_some() {
            table
                .row(["black-scholes".to_string(), cell(self.black_scholes, 6)])
                .row([
                    "difference".to_string(),
                    cell(self.black_scholes.map(|bs| self.price - bs), 6),
                ]);
        }
        table
    }
}

/// Run the price command
pub fn run(config: &CliConfig, dump_lattice: Option<&Path>) -> Result<()> {
    let request = config.request()?.with_retain_lattice(dump_lattice.is_some());
    let outcome = LatticeEngine::price(&request)?;

    // Only defined for European options without dividends.
    let black_scholes = black_scholes_reference(&request).ok();
    let market = request.market();
    let error_bound = tree_error(
        market.spot(),
        market.volatility(),
        market.rate(),
        market.maturity(),
        request.steps(),
    );
    let report = PriceReport::new(&outcome, black_scholes, error_bound);

    match config.output.format {
        OutputFormat::Table => print!("{}", report.table()),
        OutputFormat::Json => print_json(&report)?,
    }

    if let Some(path) = dump_lattice {
        match &outcome.lattice {
            Some(lattice) => {
                let writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(writer, lattice)?;
                info!(path = %path.display(), nodes = lattice.node_count(), "lattice written");
            }
            None => warn!("engine returned no lattice; nothing written"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_lattice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lattice.json");
        let mut config = CliConfig::default();
        config.lattice.steps = 5;
        config.output.format = OutputFormat::Json;

        run(&config, Some(path.as_path())).unwrap();

        let dumped: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        let levels = dumped["levels"].as_array().unwrap();
        assert_eq!(levels.len(), 6);
        assert!(dumped["trunk"].as_array().is_some());
    }

    #[test]
    fn test_report_table_includes_reference_for_european() {
        let config = CliConfig::default();
        let request = config.request().unwrap();
        let outcome = LatticeEngine::price(&request).unwrap();
        let report = PriceReport::new(&outcome, black_scholes_reference(&request).ok(), 0.0);

        let text = report.table().to_string();
        assert!(text.contains("black-scholes"));
        assert!(report.black_scholes.is_some());
        assert!((report.price - report.black_scholes.unwrap()).abs() < 0.02);
    }
}
