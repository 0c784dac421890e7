//! Category tools

use rmcp::{
    handler::server::wrapper::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};

use ynab_core::tools::categories::{
    self, CategoryBalanceParams, CategoryIdParams, GetCategoriesParams, MonthCategoryParams,
    UpdateCategoryParams, UpdateMonthCategoryParams,
};

use super::YnabMcpServer;

#[tool_router(router = category_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(
        description = "List category groups with their categories, including budgeted, activity and balance in milliunits."
    )]
    pub(crate) async fn get_categories(
        &self,
        Parameters(params): Parameters<GetCategoriesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_categories", &params);
        let result = categories::get_categories(self.tools(), params).await;
        self.respond("get_categories", result)
    }

    #[tool(description = "Get a single category by id for the current month.")]
    pub(crate) async fn get_category_by_id(
        &self,
        Parameters(params): Parameters<CategoryIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_category_by_id", &params);
        let result = categories::get_category_by_id(self.tools(), params).await;
        self.respond("get_category_by_id", result)
    }

    #[tool(
        description = "Get a category for a specific month (YYYY-MM-01 or 'current')."
    )]
    pub(crate) async fn get_month_category(
        &self,
        Parameters(params): Parameters<MonthCategoryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_month_category", &params);
        let result = categories::get_month_category(self.tools(), params).await;
        self.respond("get_month_category", result)
    }

    #[tool(description = "Update a category's name, note or hidden flag.")]
    pub(crate) async fn update_category(
        &self,
        Parameters(params): Parameters<UpdateCategoryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("update_category", &params);
        let result = categories::update_category(self.tools(), params).await;
        self.respond("update_category", result)
    }

    #[tool(
        description = "Set the budgeted amount (milliunits) for a category in a month."
    )]
    pub(crate) async fn update_month_category(
        &self,
        Parameters(params): Parameters<UpdateMonthCategoryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("update_month_category", &params);
        let result = categories::update_month_category(self.tools(), params).await;
        self.respond("update_month_category", result)
    }

    #[tool(
        description = "Get a category's budgeted, activity and available balance for a month, in milliunits and formatted."
    )]
    pub(crate) async fn get_category_balance(
        &self,
        Parameters(params): Parameters<CategoryBalanceParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_category_balance", &params);
        let result = categories::get_category_balance(self.tools(), params).await;
        self.respond("get_category_balance", result)
    }
}
