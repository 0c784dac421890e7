//! Budget tools

use rmcp::{
    handler::server::wrapper::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};

use ynab_core::tools::budgets::{
    self, GetBudgetByIdParams, GetBudgetSettingsParams, GetBudgetsParams,
};

use super::YnabMcpServer;

#[tool_router(router = budget_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(
        description = "List all budgets the user has access to, with the configured default budget id."
    )]
    pub(crate) async fn get_budgets(
        &self,
        Parameters(params): Parameters<GetBudgetsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_budgets", &params);
        let result = budgets::get_budgets(self.tools(), params).await;
        self.respond("get_budgets", result)
    }

    #[tool(
        description = "Get a single budget with its accounts, category groups, payees and months. Supports delta requests via last_knowledge_of_server."
    )]
    pub(crate) async fn get_budget_by_id(
        &self,
        Parameters(params): Parameters<GetBudgetByIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_budget_by_id", &params);
        let result = budgets::get_budget_by_id(self.tools(), params).await;
        self.respond("get_budget_by_id", result)
    }

    #[tool(description = "Get a budget's date and currency format settings.")]
    pub(crate) async fn get_budget_settings(
        &self,
        Parameters(params): Parameters<GetBudgetSettingsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_budget_settings", &params);
        let result = budgets::get_budget_settings(self.tools(), params).await;
        self.respond("get_budget_settings", result)
    }
}
