//! Process configuration
//!
//! Read once at startup. A `.env` file in the working directory is loaded
//! first (if present), then the process environment.
//!
//! Environment variables:
//! - `YNAB_API_KEY`: Personal access token (required)
//! - `DEFAULT_BUDGET_ID`: Budget used when a tool is called with `budget_id = "default"`
//! - `LOG_LEVEL`: Log level used when `RUST_LOG` is unset (DEBUG, INFO, WARNING, ERROR)
//! - `MCP_SERVER_NAME`: Name reported to MCP clients (default: "YNAB MCP Server")
//! - `YNAB_API_URL`: API base URL (default: https://api.ynab.com/v1)
//! - `YNAB_TIMEOUT_SECS`: Upstream request timeout in seconds (default: 30)

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default YNAB API base URL
pub const DEFAULT_API_URL: &str = "https://api.ynab.com/v1";

/// Default MCP server name
pub const DEFAULT_SERVER_NAME: &str = "YNAB MCP Server";

/// Default upstream request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    /// YNAB personal access token
    pub api_key: String,
    /// Budget substituted for the "default" sentinel
    pub default_budget_id: Option<String>,
    /// Raw LOG_LEVEL value
    pub log_level: Option<String>,
    /// Name reported in the MCP handshake
    pub server_name: String,
    /// API base URL
    pub api_url: String,
    /// Upstream request timeout
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("default_budget_id", &self.default_budget_id)
            .field("log_level", &self.log_level)
            .field("server_name", &self.server_name)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load `.env` from the working directory into the process environment.
    ///
    /// Missing files are ignored; existing environment variables win.
    pub fn load_dotenv() {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a `.env`-style file, falling back to the
    /// process environment for keys the file does not set
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                Error::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            vars.insert(key, value);
        }

        Self::from_lookup(|key| vars.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("YNAB_API_KEY").ok_or_else(|| {
            Error::Config("YNAB_API_KEY environment variable is not set".to_string())
        })?;

        let timeout_secs = match get("YNAB_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("YNAB_TIMEOUT_SECS must be a whole number, got {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            default_budget_id: get("DEFAULT_BUDGET_ID"),
            log_level: get("LOG_LEVEL"),
            server_name: get("MCP_SERVER_NAME").unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            api_url: get("YNAB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Tracing filter directive for the configured LOG_LEVEL
    pub fn tracing_directive(&self) -> &'static str {
        log_level_directive(self.log_level.as_deref())
    }
}

/// Map a LOG_LEVEL value onto a tracing filter directive.
///
/// Accepts both tracing names and the conventional WARNING/CRITICAL spellings.
pub fn log_level_directive(level: Option<&str>) -> &'static str {
    match level.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("warn") | Some("warning") => "warn",
        Some("error") | Some("critical") | Some("fatal") => "error",
        _ => "info",
    }
}
