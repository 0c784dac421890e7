//! ynab-mcp - MCP server for the YNAB API
//!
//! Usage:
//!   ynab-mcp                     Serve over stdio (for MCP clients)
//!   ynab-mcp --logging           Also log each tool call to stderr
//!   ynab-mcp --mcp-port 3001     Serve streamable HTTP at /mcp
//!
//! Requires YNAB_API_KEY in the environment or a .env file.

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use ynab_core::config::log_level_directive;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first: LOG_LEVEL may come from .env
    let config = commands::load_config(cli.env_file.as_deref());
    let configured = match &config {
        Ok(config) => config.tracing_directive(),
        Err(_) => log_level_directive(std::env::var("LOG_LEVEL").ok().as_deref()),
    };

    // Set up logging on stderr; stdout carries the MCP protocol
    // Priority: RUST_LOG env var > --verbose flag > LOG_LEVEL > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_directive(cli.verbose, configured))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let config = config.context("Failed to load configuration")?;

    commands::cmd_serve(&config, cli.logging, &cli.host, cli.mcp_port).await
}

/// Filter directive used when RUST_LOG is unset
pub(crate) fn default_directive(verbose: bool, configured: &'static str) -> &'static str {
    if verbose {
        "debug"
    } else {
        configured
    }
}
