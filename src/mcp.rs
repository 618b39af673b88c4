//! MCP Protocol Handler
//!
//! Implements JSON-RPC 2.0 over stdio for Model Context Protocol.
//! Reference: https://modelcontextprotocol.io/specification
//!
//! Requests are handled one at a time. A writer task owns stdout so tool
//! handlers can interleave progress notifications with responses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::tools::{error_body, Progress, ToolCallError, ToolRegistry};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

/// MCP Error Codes
pub mod error_codes {
    // JSON-RPC standard errors
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;

    // MCP custom errors (-32000 to -32099)
    pub const TOOL_NOT_FOUND: i32 = -32000;
}

/// Wrap a tool's JSON output as MCP text content
fn tool_result(body: &Value, is_error: bool) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": body.to_string()
        }],
        "isError": is_error
    })
}

/// MCP Server
pub struct McpServer {
    tools: ToolRegistry,
}

impl McpServer {
    /// Create new MCP server. The browser is not launched until a tool needs it.
    pub fn new(config: Config) -> Self {
        Self::with_registry(ToolRegistry::from_config(&config))
    }

    pub fn with_registry(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the MCP server (stdio mode)
    pub async fn run(&self) -> anyhow::Result<()> {
        let (outbound, mut outbox) = mpsc::unbounded_channel::<String>();
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(message) = outbox.recv().await {
                debug!("→ {}", message);
                stdout.write_all(message.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut line = String::new();

        info!("MCP server ready, waiting for requests...");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("Client disconnected (EOF)");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("← {}", trimmed);

            let response = match serde_json::from_str::<McpRequest>(trimmed) {
                Ok(request) => self.handle_request(request, &outbound).await,
                Err(e) => {
                    error!("Parse error: {}", e);
                    Some(McpResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                outbound.send(serde_json::to_string(&response)?)?;
            }
        }

        drop(outbound);
        writer.await??;
        Ok(())
    }

    /// Handle a single MCP request. Notifications get no response.
    pub async fn handle_request(
        &self,
        request: McpRequest,
        outbound: &UnboundedSender<String>,
    ) -> Option<McpResponse> {
        let Some(id) = request.id else {
            if request.jsonrpc != "2.0" {
                warn!("Ignoring non-2.0 notification {}", request.method);
            } else if request.method.starts_with("notifications/") {
                debug!("Received {}", request.method);
            } else {
                warn!("Ignoring notification for unknown method {}", request.method);
            }
            return None;
        };
        let id = Some(id);

        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                "Only JSON-RPC 2.0 is supported",
            ));
        }

        let response = match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(id),
            "shutdown" => {
                info!("Shutdown requested");
                McpResponse::success(id, json!({}))
            }

            // Tools
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params, outbound).await,

            // Ping
            "ping" => McpResponse::success(id, json!({})),

            // Unknown
            method => {
                warn!("Unknown method: {}", method);
                McpResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                )
            }
        };
        Some(response)
    }

    /// Handle initialize
    fn handle_initialize(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {
                        "listChanged": false
                    }
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handle tools/list
    fn handle_tools_list(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(id, json!({ "tools": self.tools.list_definitions() }))
    }

    /// Handle tools/call
    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Value,
        outbound: &UnboundedSender<String>,
    ) -> McpResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return McpResponse::error(id, error_codes::INVALID_PARAMS, "Missing 'name' parameter");
        };

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };
        let token = params.pointer("/_meta/progressToken").cloned();
        let progress = Progress::new(token, outbound.clone());

        match self.tools.call(name, arguments, &progress).await {
            Ok(body) => McpResponse::success(id, tool_result(&body, false)),
            Err(ToolCallError::NotFound(name)) => McpResponse::error(
                id,
                error_codes::TOOL_NOT_FOUND,
                format!("Tool not found: {}", name),
            ),
            Err(ToolCallError::InvalidParams(message)) => {
                McpResponse::error(id, error_codes::INVALID_PARAMS, message)
            }
            Err(ToolCallError::Scraper(e)) => {
                McpResponse::success(id, tool_result(&error_body(&e), true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serialization() {
        let ok = serde_json::to_value(McpResponse::success(Some(json!(1)), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "result": {}, "id": 1}));

        let err = serde_json::to_value(McpResponse::error(
            Some(json!("a")),
            error_codes::METHOD_NOT_FOUND,
            "Method not found: x",
        ))
        .unwrap();
        assert_eq!(err["error"]["code"], -32601);
        assert!(err.get("result").is_none());
        assert!(err["error"].get("data").is_none());
    }

    #[test]
    fn test_tool_result_wraps_text() {
        let wrapped = tool_result(&json!({"status": "success"}), false);
        assert_eq!(wrapped["content"][0]["type"], "text");
        assert_eq!(wrapped["content"][0]["text"], r#"{"status":"success"}"#);
        assert_eq!(wrapped["isError"], false);
    }

    #[test]
    fn test_request_defaults() {
        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(req.id.is_none());
        assert!(req.params.is_null());
    }
}
