//! Request and result types for a single command execution.

use serde::Deserialize;
use serde::Serialize;

/// Arguments of an execution request as received from the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRequest {
    /// The shell command to execute.
    pub command: String,
    /// Timeout in seconds. The configured default applies when absent.
    #[serde(default)]
    pub timeout: Option<i64>,
}

/// Outcome of one execution request.
///
/// `returncode` is `None` only when the command was rejected before a
/// process was spawned; `-1` means the status could not be determined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Combined stdout/stderr, trimmed.
    pub output: String,
    /// Rejection, timeout or prompt warning.
    pub warning: Option<String>,
    /// Process exit status.
    pub returncode: Option<i32>,
}

impl ExecutionResult {
    /// A result for a request refused before spawning.
    pub fn rejected(warning: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            warning: Some(warning.into()),
            returncode: None,
        }
    }
}

#[cfg(test)]
#[path = "command.test.rs"]
mod tests;
