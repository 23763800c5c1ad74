use std::fmt;

use super::*;

/// An error that relies on every default of the trait.
#[derive(Debug)]
struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("opaque failure")
    }
}

impl Error for Opaque {}

impl ErrorExt for Opaque {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A message tagged with a fixed status code.
#[derive(Debug)]
struct Tagged(&'static str, StatusCode);

impl fmt::Display for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for Tagged {}

impl ErrorExt for Tagged {
    fn status_code(&self) -> StatusCode {
        self.1
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_defaults_to_unknown() {
    assert_eq!(Opaque.status_code(), StatusCode::Unknown);
    assert!(!Opaque.is_retryable());
    assert_eq!(Opaque.output_msg(), "Internal error: 1000");
}

#[test]
fn test_internal_details_are_not_exposed() {
    let err = Tagged("pump thread panicked at pump.rs:42", StatusCode::Internal);
    assert_eq!(err.output_msg(), "Internal error: 1001");
    assert!(err.is_retryable());
}

#[test]
fn test_caller_facing_errors_keep_their_message() {
    let err = Tagged("Failed to spawn command: No such file", StatusCode::ProcessSpawn);
    assert_eq!(err.output_msg(), "Failed to spawn command: No such file");
    assert!(!err.is_retryable());

    let err = Tagged("Unknown tool: rm_rf", StatusCode::ToolNotFound);
    assert_eq!(err.output_msg(), err.to_string());
}

#[test]
fn test_as_any_downcast() {
    let err = Tagged("x", StatusCode::FileNotFound);
    let dyn_err: &dyn ErrorExt = &err;
    assert!(dyn_err.as_any().downcast_ref::<Tagged>().is_some());
    assert!(dyn_err.as_any().downcast_ref::<Opaque>().is_none());
}
