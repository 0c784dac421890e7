//! Budget ID resolution
//!
//! Tools accept `budget_id = "default"` and resolve it locally before any
//! upstream call: the configured `DEFAULT_BUDGET_ID` if set, otherwise the
//! API's own `last-used` alias.

use crate::config::Config;

/// Sentinel accepted by every tool's `budget_id` parameter
pub const DEFAULT_BUDGET: &str = "default";

/// YNAB alias for the most recently used budget
pub const LAST_USED_BUDGET: &str = "last-used";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetResolver {
    default_budget_id: Option<String>,
}

impl BudgetResolver {
    pub fn new(default_budget_id: Option<String>) -> Self {
        Self {
            default_budget_id: default_budget_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_budget_id.clone())
    }

    /// The configured default budget, if any
    pub fn default_budget_id(&self) -> Option<&str> {
        self.default_budget_id.as_deref()
    }

    /// Resolve the "default" sentinel; any other id passes through unchanged
    pub fn resolve(&self, budget_id: &str) -> String {
        if budget_id == DEFAULT_BUDGET {
            self.default_budget_id
                .clone()
                .unwrap_or_else(|| LAST_USED_BUDGET.to_string())
        } else {
            budget_id.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_without_configured_budget() {
        let resolver = BudgetResolver::new(None);
        assert_eq!(resolver.resolve("default"), "last-used");
    }

    #[test]
    fn test_default_with_configured_budget() {
        let resolver = BudgetResolver::new(Some("budget-abc".to_string()));
        assert_eq!(resolver.resolve("default"), "budget-abc");
    }

    #[test]
    fn test_empty_configured_budget_is_ignored() {
        let resolver = BudgetResolver::new(Some(String::new()));
        assert_eq!(resolver.default_budget_id(), None);
        assert_eq!(resolver.resolve("default"), "last-used");
    }

    #[test]
    fn test_other_ids_pass_through() {
        let resolver = BudgetResolver::new(Some("budget-abc".to_string()));
        for id in ["last-used", "7c8d6b1e-0000-4000-8000-000000000001", "Default", "x"] {
            assert_eq!(resolver.resolve(id), id);
        }
    }
}
