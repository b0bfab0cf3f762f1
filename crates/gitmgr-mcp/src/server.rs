//! MCP server loop.
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! Requests are handled to completion, one at a time.

use std::io::{BufRead, Write};

use serde_json::{Value, json};

use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    METHOD_NOT_FOUND, PARSE_ERROR, SERVER_NAME, ToolCallParams, ToolResult,
};
use crate::registry::{ToolContext, ToolRegistry};
use crate::{Error, Result};

/// MCP server exposing the git tools.
pub struct McpServer {
    registry: ToolRegistry,
    context: ToolContext,
}

impl McpServer {
    #[must_use]
    pub const fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self { registry, context }
    }

    /// Serve until `input` reaches end of file.
    ///
    /// # Errors
    /// Fails only on transport errors; request failures become responses.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        tracing::info!(server = SERVER_NAME, "listening on stdio");

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(request = %line, "received message");

            if let Some(response) = self.handle_message(&line) {
                serde_json::to_writer(&mut output, &response)?;
                writeln!(output)?;
                output.flush()?;
            }
        }

        tracing::info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    #[must_use]
    pub fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification");
            return None;
        };
        let id = Some(id);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            method => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!(tools = self.registry.len(), "initialize");
        Self::to_response(id, serde_json::to_value(InitializeResult::current()))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        Self::to_response(
            id,
            serde_json::to_value(self.registry.definitions()).map(|tools| json!({ "tools": tools })),
        )
    }

    fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"));
            }
        };
        let Some(tool) = self.registry.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        };

        let result = match tool.call(&self.context, params.arguments) {
            Ok(value) => ToolResult::success(value),
            Err(Error::Tool(e)) => ToolResult::failure(&e),
            Err(e) => {
                tracing::error!(tool = tool.name, error = %e, "tool failed internally");
                return JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}"));
            }
        };
        Self::to_response(id, result.and_then(serde_json::to_value))
    }

    fn to_response(id: Option<Value>, result: serde_json::Result<Value>) -> JsonRpcResponse {
        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}")),
        }
    }
}
