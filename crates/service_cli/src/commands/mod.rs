//! CLI command implementations
//!
//! Each submodule implements one `trinomial` subcommand on a resolved
//! [`CliConfig`](crate::config::CliConfig).

pub mod check;
pub mod convergence;
pub mod greeks;
pub mod price;
pub mod sweep;
