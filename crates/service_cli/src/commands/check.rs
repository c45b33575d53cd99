//! Check command implementation
//!
//! Prints the resolved configuration and confirms it yields a valid
//! pricing request.

use tracing::info;

use crate::config::CliConfig;
use crate::output::{print_json, OutputFormat};
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig) -> Result<()> {
    let request = config.request()?;
    config.greeks_config()?;
    info!(
        maturity = request.market().maturity(),
        dividends = request.market().dividends().len(),
        steps = request.steps(),
        "configuration valid"
    );

    match config.output.format {
        OutputFormat::Table => print!("{}", config.to_toml()?),
        OutputFormat::Json => print_json(config)?,
    }
    Ok(())
}
