//! MCP server exposing the domain checker's tool surface over stdio.
//!
//! `tools/call` requests are forwarded untouched, name and raw argument
//! object, to [`ToolSurface::call`](domain_checker_lib::ToolSurface::call).
//! Argument validation and unknown tool names are handled there, so both come
//! back as `isError` results instead of protocol errors. Stdout carries the
//! protocol, so logs go to stderr.

use domain_checker_lib::{
    resolve_check_config, tool_definitions, DomainChecker, ToolResponse, ToolSurface,
};
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "domain-checker";

#[derive(Clone)]
pub struct DomainCheckerServer {
    surface: Arc<ToolSurface>,
}

impl DomainCheckerServer {
    pub fn new(surface: ToolSurface) -> Self {
        Self {
            surface: Arc::new(surface),
        }
    }

    /// Run any tool name, known or not, through the surface.
    async fn handle_call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);
        into_call_result(self.surface.call(name, &arguments).await)
    }
}

/// The surface's operations as MCP tool descriptors.
fn tools() -> Vec<Tool> {
    tool_definitions()
        .into_iter()
        .map(|def| {
            let schema = match def.input_schema {
                Value::Object(map) => map,
                _ => JsonObject::new(),
            };
            Tool::new(def.name, def.description, Arc::new(schema))
        })
        .collect()
}

fn into_call_result(response: ToolResponse) -> CallToolResult {
    let content = vec![Content::text(response.text)];
    if response.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn server_implementation() -> Implementation {
    let mut implementation = Implementation::from_build_env();
    implementation.name = SERVER_NAME.to_string();
    implementation.version = env!("CARGO_PKG_VERSION").to_string();
    implementation
}

impl ServerHandler for DomainCheckerServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.instructions = Some(
            "Checks domain availability over WHOIS. Use check_domain or check_with_pricing for one \
             domain, check_multiple_tlds to try a name across suffixes, and bulk_check for a list. \
             Availability is heuristic; treat results as estimates."
                .into(),
        );
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = server_implementation();
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.handle_call(&request.name, request.arguments).await)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = resolve_check_config(None)?;
    tracing::info!(
        timeout = ?config.timeout,
        tlds = config.default_tlds.len(),
        "Starting domain-checker MCP server"
    );

    let server = DomainCheckerServer::new(ToolSurface::new(DomainChecker::with_config(config)));
    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to start MCP server"))?;

    service.waiting().await?;
    Ok(())
}
