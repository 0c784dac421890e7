//! YNAB Core Library
//!
//! Shared functionality for the YNAB MCP server:
//! - Process configuration from the environment and `.env`
//! - Upstream API models (money in milliunits, passed through unchanged)
//! - Pluggable upstream clients (reqwest over the YNAB v1 API, in-memory mock)
//! - Budget ID resolution for the `"default"` sentinel
//! - Tool implementations for budgets, accounts, transactions, categories,
//!   payees and the authenticated user

pub mod budget;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tools;

/// Test utilities including mock YNAB HTTP server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{BudgetResolver, DEFAULT_BUDGET, LAST_USED_BUDGET};
pub use client::{ClientProvider, MockYnab, UpstreamCall, YnabApi, YnabClient};
pub use config::Config;
pub use error::{Error, Result};
pub use tools::{envelope, ToolContext};
