//! Account tools

use rmcp::{
    handler::server::wrapper::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};

use ynab_core::tools::accounts::{self, AccountIdParams, CreateAccountParams, GetAccountsParams};

use super::YnabMcpServer;

#[tool_router(router = account_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(
        description = "List accounts in a budget. Closed and deleted accounts are omitted unless requested. Balances are in milliunits."
    )]
    pub(crate) async fn get_accounts(
        &self,
        Parameters(params): Parameters<GetAccountsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_accounts", &params);
        let result = accounts::get_accounts(self.tools(), params).await;
        self.respond("get_accounts", result)
    }

    #[tool(description = "Get a single account by id.")]
    pub(crate) async fn get_account_by_id(
        &self,
        Parameters(params): Parameters<AccountIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_account_by_id", &params);
        let result = accounts::get_account_by_id(self.tools(), params).await;
        self.respond("get_account_by_id", result)
    }

    #[tool(
        description = "Create an account. Type is one of checking, savings, creditCard, cash, lineOfCredit, otherAsset, otherLiability, payPal, merchantAccount, investmentAccount, mortgage. Balance is in milliunits."
    )]
    pub(crate) async fn create_account(
        &self,
        Parameters(params): Parameters<CreateAccountParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("create_account", &params);
        let result = accounts::create_account(self.tools(), params).await;
        self.respond("create_account", result)
    }

    #[tool(
        description = "Get an account's balance, cleared balance and uncleared balance, in milliunits and formatted."
    )]
    pub(crate) async fn get_account_balance(
        &self,
        Parameters(params): Parameters<AccountIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_account_balance", &params);
        let result = accounts::get_account_balance(self.tools(), params).await;
        self.respond("get_account_balance", result)
    }
}
