//! Trinomial CLI - Command Line Operations for Lattice Pricing
//!
//! This is the operational entry point for the trinomial lattice pricer.
//!
//! # Commands
//!
//! - `trinomial price` - Price one option, optionally dumping the lattice
//! - `trinomial greeks` - Finite-difference Greeks for one or both pricers
//! - `trinomial convergence` - Lattice against Black-Scholes as steps grow
//! - `trinomial sweep` - Strike or volatility sweep against Black-Scholes
//! - `trinomial check` - Print the resolved configuration
//!
//! # Configuration
//!
//! Values come from `trinomial.toml` (or `--config`), then `TRINOMIAL_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::sweep::{SweepGrid, SweepParameter};
use config::{CliConfig, Overrides};

/// Trinomial lattice option pricer
#[derive(Parser, Debug)]
#[command(name = "trinomial")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "trinomial.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price one option on the lattice
    Price {
        #[command(flatten)]
        overrides: Overrides,

        /// Write the priced lattice as JSON to this file
        #[arg(long, value_name = "FILE")]
        dump_lattice: Option<PathBuf>,
    },

    /// Compute finite-difference Greeks
    Greeks {
        #[command(flatten)]
        overrides: Overrides,

        /// Compute with both pricers instead of the configured one
        #[arg(long)]
        both: bool,
    },

    /// Tabulate convergence to Black-Scholes
    Convergence {
        #[command(flatten)]
        overrides: Overrides,

        /// Largest step count
        #[arg(long, default_value = "500")]
        max_steps: usize,

        /// Step increment between rows
        #[arg(long, default_value = "25")]
        stride: usize,
    },

    /// Sweep strike or volatility against Black-Scholes
    Sweep {
        #[command(flatten)]
        overrides: Overrides,

        /// Parameter to sweep
        #[arg(long, value_enum, default_value_t = SweepParameter::Strike)]
        over: SweepParameter,

        /// Number of grid points (default grid when omitted)
        #[arg(long)]
        points: Option<usize>,
    },

    /// Check and print the resolved configuration
    Check {
        #[command(flatten)]
        overrides: Overrides,
    },
}

impl Commands {
    fn overrides(&self) -> &Overrides {
        match self {
            Commands::Price { overrides, .. }
            | Commands::Greeks { overrides, .. }
            | Commands::Convergence { overrides, .. }
            | Commands::Sweep { overrides, .. }
            | Commands::Check { overrides } => overrides,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(path: &Path, overrides: &Overrides) -> anyhow::Result<CliConfig> {
    let mut config = CliConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    config.merge_with_cli(overrides);
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = resolve_config(&cli.config, cli.command.overrides())?;
    debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Price { dump_lattice, .. } => {
            commands::price::run(&config, dump_lattice.as_deref())?
        }
        Commands::Greeks { both, .. } => commands::greeks::run(&config, both)?,
        Commands::Convergence {
            max_steps, stride, ..
        } => commands::convergence::run(&config, max_steps, stride)?,
        Commands::Sweep { over, points, .. } => {
            commands::sweep::run(&config, SweepGrid { over, points })?
        }
        Commands::Check { .. } => commands::check::run(&config)?,
    }
    Ok(())
}
