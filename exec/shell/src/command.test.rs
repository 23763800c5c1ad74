use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_rejected_result_has_no_returncode() {
    let result = ExecutionResult::rejected("Blocked: nope");
    assert_eq!(result.output, "");
    assert_eq!(result.warning.as_deref(), Some("Blocked: nope"));
    assert_eq!(result.returncode, None);
}

#[test]
fn test_result_serializes_nulls() {
    let result = ExecutionResult::rejected("x");
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({"output": "", "warning": "x", "returncode": null})
    );
}

#[test]
fn test_request_timeout_is_optional() {
    let req: ExecRequest = serde_json::from_str(r#"{"command": "ls"}"#).expect("parse");
    assert_eq!(req.command, "ls");
    assert_eq!(req.timeout, None);

    let req: ExecRequest =
        serde_json::from_str(r#"{"command": "ls", "timeout": 5}"#).expect("parse");
    assert_eq!(req.timeout, Some(5));
}
