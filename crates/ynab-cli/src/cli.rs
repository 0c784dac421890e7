//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::Parser;

/// ynab-mcp - YNAB budgeting tools for LLMs over MCP
#[derive(Parser, Debug)]
#[command(name = "ynab-mcp")]
#[command(about = "MCP server exposing the YNAB API as tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log every tool call to stderr
    ///
    /// Each call writes one line before the tool runs:
    /// TOOL_CALL: name(arg="value", ...)
    #[arg(long)]
    pub logging: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Port for the streamable HTTP transport
    ///
    /// When set, serves MCP at http://HOST:PORT/mcp instead of stdio.
    /// Example: --mcp-port 3001
    #[arg(long)]
    pub mcp_port: Option<u16>,

    /// Host to bind when serving over HTTP
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Read configuration from this file instead of ./.env
    ///
    /// Variables already set in the environment are used for keys the
    /// file does not define.
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}
