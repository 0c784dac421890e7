//! User tools

use rmcp::{model::CallToolResult, tool, tool_router, ErrorData as McpError};
use serde_json::json;

use ynab_core::tools::user;

use super::YnabMcpServer;

#[tool_router(router = user_tools, vis = "pub(crate)")]
impl YnabMcpServer {
    #[tool(description = "Get the id of the user the API key belongs to.")]
    pub(crate) async fn get_user(&self) -> Result<CallToolResult, McpError> {
        self.log_call("get_user", &json!({}));
        let result = user::get_user(self.tools()).await;
        self.respond("get_user", result)
    }

    #[tool(description = "Check that the configured API key is valid with one authenticated request.")]
    pub(crate) async fn verify_api_key(&self) -> Result<CallToolResult, McpError> {
        self.log_call("verify_api_key", &json!({}));
        let result = user::verify_api_key(self.tools()).await;
        self.respond("verify_api_key", result)
    }
}
