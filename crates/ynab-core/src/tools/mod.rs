//! MCP tool implementations for the YNAB API
//!
//! Each tool is a plain async function taking a [`ToolContext`] and a params
//! struct, making one upstream call and reshaping the response into a view
//! struct. The MCP server wraps these; tests call them directly.
//!
//! Upstream response parsing happens once per entity, in the `From` impls of
//! the view types (`AccountView`, `TransactionView`, `CategoryView`, ...).

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod payees;
pub mod transactions;
pub mod user;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::budget::{BudgetResolver, DEFAULT_BUDGET};
use crate::client::{ClientProvider, YnabApi};
use crate::error::Result;

/// Shared dependencies of every tool
#[derive(Clone)]
pub struct ToolContext {
    clients: ClientProvider,
    budgets: BudgetResolver,
}

impl ToolContext {
    pub fn new(clients: ClientProvider, budgets: BudgetResolver) -> Self {
        Self { clients, budgets }
    }

    /// The shared upstream client
    pub fn api(&self) -> Arc<dyn YnabApi> {
        self.clients.client()
    }

    /// Resolve a tool's `budget_id` argument
    pub fn budget_id(&self, requested: &str) -> String {
        self.budgets.resolve(requested)
    }
}

/// Convert a tool result into the response mapping.
///
/// Success serializes the view; any failure becomes exactly
/// `{"error": "<message>"}` and is logged at error level.
pub fn envelope<T: Serialize>(tool: &str, result: Result<T>) -> Value {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                error!("{} failed to serialize result: {}", tool, e);
                json!({ "error": e.to_string() })
            }
        },
        Err(e) => {
            error!("{} failed: {}", tool, e);
            if e.is_unauthorized() {
                warn!("YNAB rejected the API key; check YNAB_API_KEY");
            }
            json!({ "error": e.to_string() })
        }
    }
}

/// serde default for `budget_id` parameters
pub(crate) fn default_budget_id() -> String {
    DEFAULT_BUDGET.to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::client::MockYnab;

    /// A context over a fresh mock, plus the mock for assertions
    pub fn mock_context(default_budget_id: Option<&str>) -> (ToolContext, Arc<MockYnab>) {
        let mock = Arc::new(MockYnab::new());
        let context = ToolContext::new(
            ClientProvider::new(mock.clone()),
            BudgetResolver::new(default_budget_id.map(str::to_string)),
        );
        (context, mock)
    }
}
