//! Payee tools

use rmcp::{
    handler::server::wrapper::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};

use ynab_core::tools::payees::{
    self, BudgetOnlyParams, GetPayeesParams, PayeeIdParams, PayeeLocationIdParams,
    SearchPayeesParams, UpdatePayeeParams,
};

use super::YnabMcpServer;

#[tool_router(router = payee_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(description = "List all payees in a budget.")]
    pub(crate) async fn get_payees(
        &self,
        Parameters(params): Parameters<GetPayeesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_payees", &params);
        let result = payees::get_payees(self.tools(), params).await;
        self.respond("get_payees", result)
    }

    #[tool(description = "Get a single payee by id.")]
    pub(crate) async fn get_payee_by_id(
        &self,
        Parameters(params): Parameters<PayeeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_payee_by_id", &params);
        let result = payees::get_payee_by_id(self.tools(), params).await;
        self.respond("get_payee_by_id", result)
    }

    #[tool(description = "Rename a payee.")]
    pub(crate) async fn update_payee(
        &self,
        Parameters(params): Parameters<UpdatePayeeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("update_payee", &params);
        let result = payees::update_payee(self.tools(), params).await;
        self.respond("update_payee", result)
    }

    #[tool(description = "List all payee locations in a budget.")]
    pub(crate) async fn get_payee_locations(
        &self,
        Parameters(params): Parameters<BudgetOnlyParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_payee_locations", &params);
        let result = payees::get_payee_locations(self.tools(), params).await;
        self.respond("get_payee_locations", result)
    }

    #[tool(description = "Get a single payee location by id.")]
    pub(crate) async fn get_payee_location_by_id(
        &self,
        Parameters(params): Parameters<PayeeLocationIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_payee_location_by_id", &params);
        let result = payees::get_payee_location_by_id(self.tools(), params).await;
        self.respond("get_payee_location_by_id", result)
    }

    #[tool(description = "List the locations recorded for one payee.")]
    pub(crate) async fn get_payee_locations_by_payee(
        &self,
        Parameters(params): Parameters<PayeeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_payee_locations_by_payee", &params);
        let result = payees::get_payee_locations_by_payee(self.tools(), params).await;
        self.respond("get_payee_locations_by_payee", result)
    }

    #[tool(description = "Find payees whose name contains the search term (case-insensitive).")]
    pub(crate) async fn search_payees(
        &self,
        Parameters(params): Parameters<SearchPayeesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("search_payees", &params);
        let result = payees::search_payees(self.tools(), params).await;
        self.respond("search_payees", result)
    }
}
