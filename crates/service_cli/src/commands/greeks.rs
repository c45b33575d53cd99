//! Greeks command implementation
//!
//! Finite-difference Greeks for one or both pricers, with closed-form
//! Black-Scholes Greeks alongside when they apply.

use std::time::Instant;

use pricer_models::analytical::{bs_greeks, Greeks};
use pricer_pricing::greeks::{Greek, GreeksResult, SensitivityEngine};
use pricer_pricing::lattice::{PricingMethod, PricingRequest};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{cell, print_json, OutputFormat, Table};
use crate::Result;

/// Greeks from one pricer.
#[derive(Debug, Clone, Serialize)]
pub struct MethodGreeks {
    /// Pricer used for every revaluation.
    pub method: PricingMethod,
    /// Wall time of all revaluations.
    pub elapsed_ms: f64,
    /// Price and sensitivities.
    pub greeks: GreeksResult<f64>,
}

/// Printed result of the greeks command.
#[derive(Debug, Clone, Serialize)]
pub struct GreeksReport {
    /// One entry per pricer.
    pub lattice: Vec<MethodGreeks>,
    /// Closed form, for European options on dividend-free markets.
    pub black_scholes: Option<Greeks<f64>>,
}

fn closed_form(request: &PricingRequest) -> Result<Option<Greeks<f64>>> {
    let market = request.market();
    let option = request.option();
    if option.is_american() || !market.is_dividend_free() {
        return Ok(None);
    }
    Ok(Some(bs_greeks(
        market.spot(),
        option.strike(),
        market.rate(),
        market.volatility(),
        market.maturity(),
        option.is_call(),
    )?))
}

fn closed_form_value(greeks: &Greeks<f64>, greek: Greek) -> f64 {
    match greek {
        Greek::Delta => greeks.delta,
        Greek::Vega => greeks.vega,
        Greek::Theta => greeks.theta,
        Greek::Rho => greeks.rho,
        Greek::Gamma => greeks.gamma,
        Greek::Vanna => greeks.vanna,
        Greek::Vomma => greeks.vomma,
    }
}

impl GreeksReport {
    fn table(&self) -> Table {
        let mut headers = vec!["greek".to_string()];
        headers.extend(self.lattice.iter().map(|m| m.method.to_string()));
        if self.black_scholes.is_some() {
            headers.push("black-scholes".to_string());
        }
        let mut table = Table::new(headers);

        let mut price_row = vec!["price".to_string()];
        price_row.extend(self.lattice.iter().map(|m| format!("{:.6}", m.greeks.price)));
        table.row(price_row);

        for greek in Greek::ALL {
            if self.lattice.iter().all(|m| m.greeks.get(greek).is_none()) {
                continue;
            }
            let mut row = vec![greek.name().to_string()];
            row.extend(self.lattice.iter().map(|m| cell(m.greeks.get(greek), 6)));
            if let Some(bs) = &self.black_scholes {
                row.push(format!("{:.6}", closed_form_value(bs, greek)));
            }
            table.row(row);
        }

        let mut time_row = vec!["elapsed (ms)".to_string()];
        time_row.extend(self.lattice.iter().map(|m| format!("{:.1}", m.elapsed_ms)));
        table.row(time_row);
        table
    }
}

/// Computes the report without printing it.
pub fn compute(config: &CliConfig, both: bool) -> Result<GreeksReport> {
    let request = config.request()?;
    let engine = SensitivityEngine::new(config.greeks_config()?);
    let methods: Vec<PricingMethod> = if both {
        PricingMethod::ALL.to_vec()
    } else {
        vec![request.method()]
    };

    let mut lattice = Vec::with_capacity(methods.len());
    for method in methods {
        let start = Instant::now();
        let greeks = engine.compute(&request.with_method(method))?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        info!(%method, price = greeks.price, elapsed_ms, "greeks computed");
        lattice.push(MethodGreeks {
            method,
            elapsed_ms,
            greeks,
        });
    }

    Ok(GreeksReport {
        lattice,
        black_scholes: closed_form(&request)?,
    })
}

/// Run the greeks command
pub fn run(config: &CliConfig, both: bool) -> Result<()> {
    let report = compute(config, both)?;
    match config.output.format {
        OutputFormat::Table => print!("{}", report.table()),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_models::instruments::ExerciseStyle;

    fn config() -> CliConfig {
        let mut config = CliConfig::default();
        config.lattice.steps = 60;
        config.greeks.second_order = false;
        config
    }

    #[test]
    fn test_both_methods_agree() {
        let report = compute(&config(), true).unwrap();
        assert_eq!(report.lattice.len(), 2);
        let (a, b) = (&report.lattice[0].greeks, &report.lattice[1].greeks);
        assert!((a.price - b.price).abs() < 1e-8);
        assert!((a.delta.unwrap() - b.delta.unwrap()).abs() < 1e-6);

        let bs = report.black_scholes.unwrap();
        assert!((a.delta.unwrap() - bs.delta).abs() < 0.02);

        let text = report.table().to_string();
        assert!(text.contains("recursive") && text.contains("black-scholes"));
        assert!(!text.contains("gamma"));
    }

    #[test]
    fn test_no_closed_form_for_american() {
        let mut config = config();
        config.option.exercise = ExerciseStyle::American;
        let report = compute(&config, false).unwrap();
        assert_eq!(report.lattice.len(), 1);
        assert!(report.black_scholes.is_none());
    }
}
