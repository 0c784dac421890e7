//! Budget tools

use serde::{Deserialize, Serialize};

use super::accounts::{AccountSummary, AccountView};
use super::categories::CategoryGroupView;
use super::payees::PayeeView;
use super::ToolContext;
use crate::error::Result;
use crate::models::{BudgetSummary, CurrencyFormat, DateFormat, MonthSummary};

// =============================================================================
// get_budgets
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBudgetsParams {
    #[schemars(description = "Include account information for each budget")]
    #[serde(default)]
    pub include_accounts: bool,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetSummaryView {
    pub id: String,
    pub name: String,
    pub last_modified_on: Option<String>,
    pub date_format: Option<String>,
    pub currency_format: Option<CurrencyFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<AccountSummary>>,
}

impl From<BudgetSummary> for BudgetSummaryView {
    fn from(budget: BudgetSummary) -> Self {
        Self {
            id: budget.id,
            name: budget.name,
            last_modified_on: budget.last_modified_on.map(|t| t.to_rfc3339()),
            date_format: budget.date_format.map(|f| f.format),
            currency_format: budget.currency_format,
            accounts: budget
                .accounts
                .filter(|accounts| !accounts.is_empty())
                .map(|accounts| accounts.into_iter().map(AccountSummary::from).collect()),
        }
    }
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetsResult {
    pub budgets: Vec<BudgetSummaryView>,
    /// ID of the user's default budget, if one is set
    pub default_budget: Option<String>,
}

pub async fn get_budgets(ctx: &ToolContext, params: GetBudgetsParams) -> Result<BudgetsResult> {
    let response = ctx.api().get_budgets(params.include_accounts).await?;

    let budgets = response
        .budgets
        .into_iter()
        .map(|mut budget| {
            if !params.include_accounts {
                budget.accounts = None;
            }
            BudgetSummaryView::from(budget)
        })
        .collect();

    Ok(BudgetsResult {
        budgets,
        default_budget: response.default_budget.map(|b| b.id),
    })
}

// =============================================================================
// get_budget_by_id
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBudgetByIdParams {
    #[schemars(description = "The budget ID, 'last-used', or 'default'")]
    pub budget_id: String,

    #[schemars(description = "The starting server knowledge for delta requests")]
    pub last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetDetailView {
    pub id: String,
    pub name: String,
    pub last_modified_on: Option<String>,
    pub server_knowledge: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<AccountView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_groups: Option<Vec<CategoryGroupView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payees: Option<Vec<PayeeView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<MonthSummary>>,
}

fn non_empty<T, U: From<T>>(items: Option<Vec<T>>) -> Option<Vec<U>> {
    items
        .filter(|items| !items.is_empty())
        .map(|items| items.into_iter().map(U::from).collect())
}

pub async fn get_budget_by_id(
    ctx: &ToolContext,
    params: GetBudgetByIdParams,
) -> Result<BudgetDetailView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx
        .api()
        .get_budget_by_id(&budget_id, params.last_knowledge_of_server)
        .await?;

    let budget = response.budget;
    let category_groups = budget.grouped_categories();

    Ok(BudgetDetailView {
        id: budget.id,
        name: budget.name,
        last_modified_on: budget.last_modified_on.map(|t| t.to_rfc3339()),
        server_knowledge: response.server_knowledge,
        accounts: non_empty(budget.accounts),
        category_groups: non_empty(category_groups),
        payees: non_empty(budget.payees),
        months: budget.months.filter(|months| !months.is_empty()),
    })
}

// =============================================================================
// get_budget_settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBudgetSettingsParams {
    #[schemars(description = "The budget ID, 'last-used', or 'default'")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetSettingsView {
    pub date_format: Option<DateFormat>,
    pub currency_format: Option<CurrencyFormat>,
}

pub async fn get_budget_settings(
    ctx: &ToolContext,
    params: GetBudgetSettingsParams,
) -> Result<BudgetSettingsView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let settings = ctx.api().get_budget_settings(&budget_id).await?;

    Ok(BudgetSettingsView {
        date_format: settings.date_format,
        currency_format: settings.currency_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::mock_context;

    #[tokio::test]
    async fn test_get_budgets_without_accounts() {
        let (ctx, mock) = mock_context(None);
        let result = get_budgets(&ctx, GetBudgetsParams::default()).await.unwrap();

        assert_eq!(result.budgets.len(), 1);
        assert_eq!(result.default_budget.as_deref(), Some("budget-1"));
        assert!(result.budgets[0].accounts.is_none());
        assert_eq!(result.budgets[0].date_format.as_deref(), Some("MM/DD/YYYY"));
        // Budget listing never takes a budget id
        assert_eq!(mock.last_call().unwrap().budget_id, None);

        let value = serde_json::to_value(&result).unwrap();
        assert!(value["budgets"][0].get("accounts").is_none());
    }

    #[tokio::test]
    async fn test_get_budgets_with_accounts() {
        let (ctx, _) = mock_context(None);
        let result = get_budgets(
            &ctx,
            GetBudgetsParams {
                include_accounts: true,
            },
        )
        .await
        .unwrap();

        let accounts = result.budgets[0].accounts.as_ref().unwrap();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].account_type, "checking");
    }

    #[tokio::test]
    async fn test_get_budget_by_id_groups_categories() {
        let (ctx, mock) = mock_context(Some("budget-1"));
        let detail = get_budget_by_id(
            &ctx,
            GetBudgetByIdParams {
                budget_id: "default".into(),
                last_knowledge_of_server: Some(10),
            },
        )
        .await
        .unwrap();

        assert_eq!(mock.last_call().unwrap().budget_id.as_deref(), Some("budget-1"));
        assert_eq!(detail.server_knowledge, 11);

        let groups = detail.category_groups.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].categories.len(), 2);
        assert_eq!(groups[1].categories[0].name, "Inflow: Ready to Assign");
        assert!(detail.months.is_some());
        assert_eq!(detail.accounts.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_budget_settings() {
        let (ctx, _) = mock_context(None);
        let settings = get_budget_settings(
            &ctx,
            GetBudgetSettingsParams {
                budget_id: "budget-1".into(),
            },
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["date_format"]["format"], "MM/DD/YYYY");
        assert_eq!(value["currency_format"]["iso_code"], "USD");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_as_error() {
        let (ctx, mock) = mock_context(None);
        mock.fail_next(500, "internal_server_error", "Boom");
        assert!(get_budgets(&ctx, GetBudgetsParams::default()).await.is_err());
    }
}
