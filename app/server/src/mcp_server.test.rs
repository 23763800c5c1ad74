use std::sync::Arc;
use std::time::Duration;

use shellgate_shell::ExecutionSupervisor;
use shellgate_shell::ProcessRunner;
use tempfile::TempDir;

use super::*;
use crate::restart::ExitAction;
use crate::restart::RESTART_CONFIRMATION;
use crate::restart::RestartSignal;
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct NoExit;

impl ExitAction for NoExit {
    fn exit(&self, _code: i32) {}
}

fn tools() -> GatewayTools {
    GatewayTools::new(
        ExecutionSupervisor::new(
            ProcessRunner::new(Duration::from_secs(1)),
            Duration::from_millis(10),
            Duration::from_millis(500),
        ),
        RestartSignal::with_action(Duration::from_millis(10), 87, Arc::new(NoExit)),
        30,
    )
}

/// Feeds `input` to a fresh server and returns every response line.
async fn run_server(input: &str) -> Vec<Value> {
    let server = McpServer::new(tools());
    let mut output = Vec::new();
    server
        .run(input.as_bytes(), &mut output)
        .await
        .expect("server run");
    String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response is json"))
        .collect()
}

fn request(id: i64, method: &str, params: Value) -> String {
    let mut line = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
        .to_string();
    line.push('\n');
    line
}

fn call(id: i64, tool: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": tool, "arguments": arguments}))
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
}

#[tokio::test]
async fn test_initialize() {
    let responses = run_server(&request(1, "initialize", json!({}))).await;
    assert_eq!(responses.len(), 1);
    let result = &responses[0]["result"];
    assert_eq!(responses[0]["id"], json!(1));
    assert_eq!(result["serverInfo"]["name"], json!("shellgate"));
    assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
    assert_eq!(result["capabilities"]["tools"], json!({}));
}

#[tokio::test]
async fn test_initialize_echoes_client_protocol_version() {
    let responses = run_server(&request(
        1,
        "initialize",
        json!({"protocolVersion": "2025-03-26"}),
    ))
    .await;
    assert_eq!(
        responses[0]["result"]["protocolVersion"],
        json!("2025-03-26")
    );
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let input = "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\n";
    assert!(run_server(input).await.is_empty());
}

#[tokio::test]
async fn test_parse_error() {
    let responses = run_server("this is not json\n").await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], json!(-32700));
    assert_eq!(responses[0]["id"], Value::Null);
}

#[tokio::test]
async fn test_unknown_method() {
    let responses = run_server(&request(4, "resources/list", json!({}))).await;
    assert_eq!(responses[0]["error"]["code"], json!(-32601));
    assert_eq!(
        responses[0]["error"]["message"],
        json!("Method not found: resources/list")
    );
}

#[tokio::test]
async fn test_ping() {
    let responses = run_server(&request(9, "ping", Value::Null)).await;
    assert_eq!(responses[0]["result"], json!({}));
}

#[tokio::test]
async fn test_tools_list() {
    let responses = run_server(&request(2, "tools/list", json!({}))).await;
    let tools = responses[0]["result"]["tools"]
        .as_array()
        .expect("tools array");
    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["bash_safe", "file_edit", "request_restart"]);
    assert_eq!(tools[0]["inputSchema"]["type"], json!("object"));
}

#[tokio::test]
async fn test_blocked_command_through_call() {
    let responses = run_server(&call(3, "bash_safe", json!({"command": "zsh"}))).await;
    let result: Value = serde_json::from_str(tool_text(&responses[0])).expect("json");
    assert_eq!(
        result,
        json!({
            "output": "",
            "warning": "Blocked: 'zsh' would start an interactive Z-shell.",
            "returncode": null
        })
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_through_call() {
    let responses = run_server(&call(
        3,
        "bash_safe",
        json!({"command": "echo hi; exit 4", "timeout": 10}),
    ))
    .await;
    let result: Value = serde_json::from_str(tool_text(&responses[0])).expect("json");
    assert_eq!(
        result,
        json!({"output": "hi", "warning": null, "returncode": 4})
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_slow_call_does_not_block_later_requests() {
    let input = [
        call(1, "bash_safe", json!({"command": "sleep 0.5; echo slow"})),
        call(2, "bash_safe", json!({"command": "echo fast"})),
        request(3, "ping", json!({})),
    ]
    .concat();

    let responses = run_server(&input).await;
    let ids: Vec<i64> = responses
        .iter()
        .map(|r| r["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids.last(), Some(&1));
    assert!(tool_text(&responses[2]).contains("slow"));
}

#[tokio::test]
async fn test_file_edit_through_call() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("f.txt").to_string_lossy().into_owned();

    let responses = run_server(&call(
        5,
        "file_edit",
        json!({"filepath": path, "content": "hello"}),
    ))
    .await;
    assert_eq!(
        tool_text(&responses[0]),
        format!("Successfully wrote to '{path}'.")
    );

    let responses = run_server(&call(6, "file_edit", json!({"filepath": path}))).await;
    assert_eq!(tool_text(&responses[0]), "hello");
}

#[tokio::test]
async fn test_request_restart_through_call() {
    let responses = run_server(&call(7, "request_restart", json!({}))).await;
    assert_eq!(tool_text(&responses[0]), RESTART_CONFIRMATION);
}

#[tokio::test]
async fn test_unknown_tool() {
    let responses = run_server(&call(8, "format_disk", json!({}))).await;
    assert_eq!(responses[0]["error"]["code"], json!(-32000));
    assert_eq!(
        responses[0]["error"]["data"],
        json!({"status": "ToolNotFound", "retryable": false})
    );
    assert_eq!(responses[0]["id"], json!(8));
}

#[tokio::test]
async fn test_invalid_arguments() {
    let responses = run_server(&call(8, "bash_safe", json!({"timeout": "soon"}))).await;
    assert_eq!(responses[0]["error"]["code"], json!(-32602));
    assert_eq!(responses[0]["error"]["data"]["status"], json!("InvalidArguments"));
}

#[tokio::test]
async fn test_missing_params() {
    let responses = run_server(&request(8, "tools/call", Value::Null)).await;
    assert_eq!(responses[0]["error"]["code"], json!(-32602));
    assert!(responses[0]["error"].get("data").is_none());
}

#[tokio::test]
async fn test_empty_input_exits_cleanly() {
    assert!(run_server("").await.is_empty());
}
