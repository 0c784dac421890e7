//! Transaction tools

use rmcp::{
    handler::server::wrapper::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};

use ynab_core::tools::transactions::{
    self, CreateTransactionParams, GetTransactionsParams, ImportTransactionsParams,
    TransactionIdParams, UpdateTransactionParams,
};

use super::YnabMcpServer;

#[tool_router(router = transaction_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(
        description = "List transactions in a budget, optionally since a date (YYYY-MM-DD) or filtered to 'uncategorized' or 'unapproved'."
    )]
    pub(crate) async fn get_transactions(
        &self,
        Parameters(params): Parameters<GetTransactionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_transactions", &params);
        let result = transactions::get_transactions(self.tools(), params).await;
        self.respond("get_transactions", result)
    }

    #[tool(description = "Get a single transaction by id, including subtransactions.")]
    pub(crate) async fn get_transaction_by_id(
        &self,
        Parameters(params): Parameters<TransactionIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("get_transaction_by_id", &params);
        let result = transactions::get_transaction_by_id(self.tools(), params).await;
        self.respond("get_transaction_by_id", result)
    }

    #[tool(
        description = "Create a transaction. Amount is in milliunits (negative for outflow, e.g. -25000 = -$25.00). Date is YYYY-MM-DD."
    )]
    pub(crate) async fn create_transaction(
        &self,
        Parameters(params): Parameters<CreateTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("create_transaction", &params);
        let result = transactions::create_transaction(self.tools(), params).await;
        self.respond("create_transaction", result)
    }

    #[tool(description = "Update a transaction. Only the fields provided are changed.")]
    pub(crate) async fn update_transaction(
        &self,
        Parameters(params): Parameters<UpdateTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("update_transaction", &params);
        let result = transactions::update_transaction(self.tools(), params).await;
        self.respond("update_transaction", result)
    }

    #[tool(description = "Delete a transaction by id.")]
    pub(crate) async fn delete_transaction(
        &self,
        Parameters(params): Parameters<TransactionIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("delete_transaction", &params);
        let result = transactions::delete_transaction(self.tools(), params).await;
        self.respond("delete_transaction", result)
    }

    #[tool(
        description = "Import available transactions from all linked accounts. Returns the ids of imported transactions."
    )]
    pub(crate) async fn import_transactions(
        &self,
        Parameters(params): Parameters<ImportTransactionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.log_call("import_transactions", &params);
        let result = transactions::import_transactions(self.tools(), params).await;
        self.respond("import_transactions", result)
    }
}
