//! Server command implementation
//!
//! Stdout belongs to the MCP stdio transport, so nothing here prints;
//! progress goes through tracing to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ynab_core::Config;
use ynab_server::{serve_stdio, start_mcp_server, YnabMcpServer};

/// Load configuration from an explicit file, or from the environment after
/// reading `./.env` if one exists
pub fn load_config(env_file: Option<&Path>) -> ynab_core::Result<Config> {
    match env_file {
        Some(path) => Config::from_env_file(path),
        None => {
            Config::load_dotenv();
            Config::from_env()
        }
    }
}

pub async fn cmd_serve(
    config: &Config,
    logging: bool,
    host: &str,
    mcp_port: Option<u16>,
) -> Result<()> {
    let server = YnabMcpServer::from_config(config, logging)
        .context("Failed to initialize YNAB client")?;

    match config.default_budget_id.as_deref() {
        Some(id) => info!("Default budget: {}", id),
        None => warn!("DEFAULT_BUDGET_ID not set; 'default' resolves to the last-used budget"),
    }
    if server.call_logging_enabled() {
        info!("Tool call logging enabled");
    }

    match mcp_port {
        Some(port) => start_mcp_server(server, host, port).await,
        None => serve_stdio(server).await,
    }
}
