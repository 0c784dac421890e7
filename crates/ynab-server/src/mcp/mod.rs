//! MCP (Model Context Protocol) server for YNAB
//!
//! # Architecture
//!
//! Tools are grouped by domain, one `#[tool_router]` block per file. Each
//! block produces its own router; [`YnabMcpServer::register_all`] sums them
//! into the router the server dispatches through. Tool methods are thin: log
//! the call, run the matching `ynab_core::tools` function, wrap the envelope.
//!
//! # Example
//!
//! ```bash
//! # stdio, as launched by an MCP client
//! ynab-mcp --logging
//!
//! # streamable HTTP on the local network
//! ynab-mcp --mcp-port 3001
//! ```
//!
//! # Available Tools
//!
//! - budgets: `get_budgets`, `get_budget_by_id`, `get_budget_settings`
//! - accounts: `get_accounts`, `get_account_by_id`, `create_account`, `get_account_balance`
//! - transactions: `get_transactions`, `get_transaction_by_id`, `create_transaction`,
//!   `update_transaction`, `delete_transaction`, `import_transactions`
//! - categories: `get_categories`, `get_category_by_id`, `get_month_category`,
//!   `update_category`, `update_month_category`, `get_category_balance`
//! - payees: `get_payees`, `get_payee_by_id`, `update_payee`, `get_payee_locations`,
//!   `get_payee_location_by_id`, `get_payee_locations_by_payee`, `search_payees`
//! - user: `get_user`, `verify_api_key`

mod accounts;
mod budgets;
mod categories;
mod payees;
mod transactions;
mod user;

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool_handler, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use ynab_core::{envelope, BudgetResolver, ClientProvider, Config, ToolContext};

use crate::call_log::CallLogger;

/// YNAB MCP server state
#[derive(Clone)]
pub struct YnabMcpServer {
    /// Upstream client and budget resolver shared by every tool
    tools: Arc<ToolContext>,
    /// `TOOL_CALL:` line writer
    call_log: Arc<CallLogger>,
    /// Name reported in the MCP handshake
    server_name: String,
    /// Combined router for all tool domains
    tool_router: ToolRouter<Self>,
}

impl YnabMcpServer {
    pub fn new(tools: ToolContext, call_log: CallLogger, server_name: impl Into<String>) -> Self {
        Self {
            tools: Arc::new(tools),
            call_log: Arc::new(call_log),
            server_name: server_name.into(),
            tool_router: Self::register_all(),
        }
    }

    /// Build the upstream client from configuration.
    ///
    /// Fails when the API key is missing, before any tool is served.
    pub fn from_config(config: &Config, logging: bool) -> ynab_core::Result<Self> {
        let clients = ClientProvider::from_config(config)?;
        let budgets = BudgetResolver::from_config(config);
        Ok(Self::new(
            ToolContext::new(clients, budgets),
            CallLogger::new(logging),
            config.server_name.clone(),
        ))
    }

    /// Combine every domain's tool router
    pub fn register_all() -> ToolRouter<Self> {
        let mut router = ToolRouter::new();

        router += Self::budget_tools();
        info!("budget tools registered");
        router += Self::account_tools();
        info!("account tools registered");
        router += Self::transaction_tools();
        info!("transaction tools registered");
        router += Self::category_tools();
        info!("category tools registered");
        router += Self::payee_tools();
        info!("payee tools registered");
        router += Self::user_tools();
        info!("user tools registered");

        router
    }

    /// Names of all registered tools, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Whether `TOOL_CALL:` lines are written
    pub fn call_logging_enabled(&self) -> bool {
        self.call_log.is_enabled()
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub(crate) fn tools(&self) -> &ToolContext {
        &self.tools
    }

    /// Record the call before the tool runs
    pub(crate) fn log_call<P: Serialize + ?Sized>(&self, tool: &str, params: &P) {
        debug!("Calling tool {}", tool);
        self.call_log.log(tool, params);
    }

    /// Wrap a tool result as MCP text content.
    ///
    /// Upstream failures are data, not protocol errors: the client sees
    /// `{"error": "..."}` and the session stays usable.
    pub(crate) fn respond<T: Serialize>(
        &self,
        tool: &str,
        result: ynab_core::Result<T>,
    ) -> Result<CallToolResult, McpError> {
        let value = envelope(tool, result);
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&value).unwrap_or_default(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for YnabMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("YNAB".to_string()),
                website_url: Some("https://api.ynab.com".to_string()),
                icons: None,
            },
            instructions: Some(
                "Tools for the YNAB budgeting API. Money amounts are milliunits \
                 (1000 = 1.00 in the budget's currency). Pass budget_id 'default' \
                 to use the configured budget or 'last-used' for the most recent one. \
                 Failed calls return {\"error\": \"...\"}."
                    .to_string(),
            ),
        }
    }
}

/// Serve over stdin/stdout until the client disconnects
pub async fn serve_stdio(server: YnabMcpServer) -> anyhow::Result<()> {
    info!("Starting MCP server '{}' on stdio", server.server_name());

    let running = server.serve(rmcp::transport::stdio()).await?;
    let reason = running.waiting().await?;

    info!("MCP server stopped: {:?}", reason);
    Ok(())
}

/// Serve streamable HTTP at `http://host:port/mcp`
pub async fn start_mcp_server(server: YnabMcpServer, host: &str, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http());
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
