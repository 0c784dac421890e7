//! CLI tests

use std::io::Write;

use clap::Parser;

use crate::cli::Cli;
use crate::commands;
use crate::default_directive;

// ========== Argument Parsing Tests ==========

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["ynab-mcp"]).unwrap();
    assert!(!cli.logging);
    assert!(!cli.verbose);
    assert_eq!(cli.mcp_port, None);
    assert_eq!(cli.host, "127.0.0.1");
    assert!(cli.env_file.is_none());
}

#[test]
fn test_all_flags() {
    let cli = Cli::try_parse_from([
        "ynab-mcp",
        "--logging",
        "-v",
        "--mcp-port",
        "3001",
        "--host",
        "0.0.0.0",
        "--env-file",
        "/tmp/ynab.env",
    ])
    .unwrap();

    assert!(cli.logging);
    assert!(cli.verbose);
    assert_eq!(cli.mcp_port, Some(3001));
    assert_eq!(cli.host, "0.0.0.0");
    assert_eq!(cli.env_file.unwrap().to_str(), Some("/tmp/ynab.env"));
}

#[test]
fn test_rejects_subcommands_and_bad_port() {
    assert!(Cli::try_parse_from(["ynab-mcp", "serve"]).is_err());
    assert!(Cli::try_parse_from(["ynab-mcp", "--mcp-port", "not-a-port"]).is_err());
}

// ========== Logging Filter Tests ==========

#[test]
fn test_verbose_overrides_log_level() {
    assert_eq!(default_directive(true, "error"), "debug");
    assert_eq!(default_directive(false, "warn"), "warn");
}

#[test]
fn test_log_level_from_env_file_sets_directive() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "YNAB_API_KEY=file-key").unwrap();
    writeln!(file, "LOG_LEVEL=WARNING").unwrap();

    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(default_directive(false, config.tracing_directive()), "warn");
}

// ========== Configuration Tests ==========

#[test]
fn test_load_config_from_env_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "YNAB_API_KEY=file-key").unwrap();
    writeln!(file, "DEFAULT_BUDGET_ID=budget-1").unwrap();
    writeln!(file, "MCP_SERVER_NAME=Household").unwrap();

    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.api_key, "file-key");
    assert_eq!(config.default_budget_id.as_deref(), Some("budget-1"));
    assert_eq!(config.server_name, "Household");
}

#[test]
fn test_load_config_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.env");
    assert!(commands::load_config(Some(&missing)).is_err());
}
