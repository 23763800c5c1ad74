//! Line-delimited JSON-RPC 2.0 server over stdio.
//!
//! Each line on the input is one request; each response is written as one
//! line on the output. Routed methods:
//! - `initialize` -- server info and capabilities
//! - `ping` -- empty result
//! - `notifications/*` -- acknowledged silently
//! - `tools/list` -- the tool specs from [`GatewayTools`]
//! - `tools/call` -- runs a tool on its own task
//!
//! Tool calls run concurrently. Their responses are written as they complete,
//! so they may come back in a different order than they were sent.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use shellgate_error::ErrorExt;
use shellgate_error::StatusCode;
use snafu::ResultExt;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::error::server_error;
use crate::tools::GatewayTools;

/// Protocol revision reported when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const SERVER_NAME: &str = "shellgate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    /// Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self::failure_with_data(id, code, message, None)
    }

    fn failure_with_data(
        id: Value,
        code: i64,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
            id,
        }
    }
}

// Standard JSON-RPC error codes.
const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

// Application-specific error codes.
const TOOL_NOT_FOUND: i64 = -32000;

pub struct McpServer {
    tools: GatewayTools,
}

impl McpServer {
    pub fn new(tools: GatewayTools) -> Self {
        Self { tools }
    }

    /// Serves requests until `input` reaches EOF and every in-flight tool
    /// call has been answered.
    pub async fn run(
        self,
        input: impl AsyncBufRead + Unpin,
        mut output: impl AsyncWrite + Unpin,
    ) -> Result<()> {
        let mut lines = input.lines();
        let mut in_flight: JoinSet<JsonRpcResponse> = JoinSet::new();
        let mut input_open = true;

        info!("stdio server started");
        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line.context(server_error::ReadRequestSnafu)? {
                        Some(line) => {
                            if let Some(response) = self.dispatch(line.trim(), &mut in_flight) {
                                write_response(&mut output, &response).await?;
                            }
                        }
                        None => {
                            debug!(pending = in_flight.len(), "input closed");
                            input_open = false;
                        }
                    }
                }
                Some(joined) = in_flight.join_next() => {
                    match joined {
                        Ok(response) => write_response(&mut output, &response).await?,
                        Err(e) => warn!("Tool call task failed: {e}"),
                    }
                }
                else => break,
            }
        }

        info!("stdio server stopped");
        Ok(())
    }

    /// Answers synchronous methods directly; tool calls are spawned onto
    /// `in_flight` and answered when they finish.
    fn dispatch(
        &self,
        line: &str,
        in_flight: &mut JoinSet<JsonRpcResponse>,
    ) -> Option<JsonRpcResponse> {
        if line.is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Unparseable request: {e}");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    "Parse error",
                ));
            }
        };

        let JsonRpcRequest {
            method, params, id, ..
        } = request;
        let Some(id) = id else {
            debug!(method = %method, "notification");
            return None;
        };

        match method.as_str() {
            "initialize" => Some(handle_initialize(id, params.as_ref())),
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            "tools/list" => Some(JsonRpcResponse::success(
                id,
                json!({ "tools": self.tools.specs() }),
            )),
            "tools/call" => {
                let tools = self.tools.clone();
                in_flight.spawn(async move { handle_tools_call(&tools, id, params).await });
                None
            }
            other => Some(JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }
}

fn handle_initialize(id: Value, params: Option<&Value>) -> JsonRpcResponse {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

/// Params must contain `{ "name": String, "arguments"?: Object }`.
async fn handle_tools_call(
    tools: &GatewayTools,
    id: Value,
    params: Option<Value>,
) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params for tools/call");
    };
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::failure(
            id,
            INVALID_PARAMS,
            "Missing 'name' in tools/call params",
        );
    };
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    debug!(tool = name, "tools/call");
    match tools.call(name, arguments).await {
        Ok(text) => JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text,
                }]
            }),
        ),
        Err(e) => {
            let status = e.status_code();
            if status.should_log_error() {
                error!(tool = name, "{e}");
            } else {
                warn!(tool = name, "{e}");
            }
            let code = match status {
                StatusCode::ToolNotFound => TOOL_NOT_FOUND,
                StatusCode::InvalidArguments => INVALID_PARAMS,
                _ => INTERNAL_ERROR,
            };
            let data = json!({
                "status": status.to_string(),
                "retryable": e.is_retryable(),
            });
            JsonRpcResponse::failure_with_data(id, code, e.output_msg(), Some(data))
        }
    }
}

async fn write_response(
    output: &mut (impl AsyncWrite + Unpin),
    response: &JsonRpcResponse,
) -> Result<()> {
    let mut line = serde_json::to_string(response).context(server_error::EncodeResponseSnafu)?;
    line.push('\n');
    output
        .write_all(line.as_bytes())
        .await
        .context(server_error::WriteResponseSnafu)?;
    output
        .flush()
        .await
        .context(server_error::WriteResponseSnafu)?;
    Ok(())
}

#[cfg(test)]
#[path = "mcp_server.test.rs"]
mod tests;
