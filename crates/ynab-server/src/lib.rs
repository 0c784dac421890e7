//! YNAB MCP Server
//!
//! Exposes the YNAB API to LLMs as MCP tools. Each tool is a thin adapter:
//! resolve the budget id, make one upstream call, reshape the response.
//! Failures come back as `{"error": "<message>"}` instead of protocol errors,
//! so the client can read them and the server keeps serving.
//!
//! Transports:
//! - stdio (default, what desktop MCP clients launch)
//! - streamable HTTP at `/mcp` when a port is given

pub mod call_log;
pub mod mcp;

pub use call_log::CallLogger;
pub use mcp::{serve_stdio, start_mcp_server, YnabMcpServer};
