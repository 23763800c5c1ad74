use std::sync::Arc;
use std::sync::atomic::AtomicI32;
use std::time::Duration;

use shellgate_shell::ProcessRunner;
use tempfile::TempDir;

use super::*;
use crate::restart::ExitAction;
use crate::restart::RESTART_CONFIRMATION;
use pretty_assertions::assert_eq;

#[derive(Debug, Default)]
struct NoExit {
    code: AtomicI32,
}

impl ExitAction for NoExit {
    fn exit(&self, code: i32) {
        self.code.store(code, std::sync::atomic::Ordering::SeqCst);
    }
}

fn tools() -> GatewayTools {
    GatewayTools::new(
        ExecutionSupervisor::new(
            ProcessRunner::new(Duration::from_secs(1)),
            Duration::from_millis(10),
            Duration::from_millis(500),
        ),
        RestartSignal::with_action(Duration::from_millis(10), 87, Arc::new(NoExit::default())),
        60,
    )
}

#[test]
fn test_specs_list_three_tools() {
    let names: Vec<&str> = tools().specs().iter().map(|spec| spec.name).collect();
    assert_eq!(names, vec![EXECUTE_TOOL, FILE_EDIT_TOOL, RESTART_TOOL]);
}

#[test]
fn test_execute_schema_advertises_default_timeout() {
    let specs = tools().specs();
    assert_eq!(
        specs[0].input_schema["properties"]["timeout"]["default"],
        json!(60)
    );
    assert_eq!(specs[0].input_schema["required"], json!(["command"]));
}

#[tokio::test]
async fn test_execute_rejects_blocked_command() {
    let text = tools()
        .call(EXECUTE_TOOL, json!({"command": "python"}))
        .await
        .expect("call");
    let result: ExecutionResult = serde_json::from_str(&text).expect("json");
    assert_eq!(result.returncode, None);
    assert_eq!(
        result.warning.as_deref(),
        Some("Blocked: 'python' would start an interactive Python REPL.")
    );
}

#[tokio::test]
async fn test_execute_rejects_non_positive_timeout() {
    let text = tools()
        .call(EXECUTE_TOOL, json!({"command": "echo hi", "timeout": 0}))
        .await
        .expect("call");
    let result: ExecutionResult = serde_json::from_str(&text).expect("json");
    assert_eq!(
        result,
        ExecutionResult::rejected("Timeout must be positive seconds.")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_uses_default_timeout() {
    let text = tools()
        .call(EXECUTE_TOOL, json!({"command": "echo hi"}))
        .await
        .expect("call");
    let value: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        value,
        json!({"output": "hi", "warning": null, "returncode": 0})
    );
}

#[tokio::test]
async fn test_file_edit_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("a.txt").to_string_lossy().into_owned();
    let tools = tools();

    let reply = tools
        .call(FILE_EDIT_TOOL, json!({"filepath": path, "content": "body"}))
        .await
        .expect("write");
    assert_eq!(reply, format!("Successfully wrote to '{path}'."));

    let reply = tools
        .call(FILE_EDIT_TOOL, json!({"filepath": path, "content": null}))
        .await
        .expect("read");
    assert_eq!(reply, "body");
}

#[tokio::test]
async fn test_restart_returns_confirmation() {
    let tools = tools();
    let reply = tools.call(RESTART_TOOL, json!({})).await.expect("call");
    assert_eq!(reply, RESTART_CONFIRMATION);
}

#[tokio::test]
async fn test_unknown_tool() {
    let err = tools()
        .call("rm_rf", json!({}))
        .await
        .expect_err("unknown tool");
    assert_eq!(err.status_code(), StatusCode::ToolNotFound);
    assert_eq!(err.to_string(), "Unknown tool: rm_rf");
}

#[tokio::test]
async fn test_missing_required_argument() {
    let err = tools()
        .call(EXECUTE_TOOL, json!({"timeout": 5}))
        .await
        .expect_err("missing command");
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);

    let err = tools()
        .call(FILE_EDIT_TOOL, json!({"content": "x"}))
        .await
        .expect_err("missing filepath");
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);
}
