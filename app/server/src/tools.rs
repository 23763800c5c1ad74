//! The three tools exposed to the host.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use shellgate_config::GatewayConfig;
use shellgate_error::ErrorExt;
use shellgate_error::Location;
use shellgate_error::StatusCode;
use shellgate_shell::ExecRequest;
use shellgate_shell::ExecutionResult;
use shellgate_shell::ExecutionSupervisor;
use snafu::ResultExt;
use snafu::Snafu;

use crate::file_edit;
use crate::restart::RestartSignal;

pub const EXECUTE_TOOL: &str = "bash_safe";
pub const FILE_EDIT_TOOL: &str = "file_edit";
pub const RESTART_TOOL: &str = "request_restart";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ToolError {
    #[snafu(display("Unknown tool: {name}"))]
    UnknownTool {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid arguments for {tool}: {source}"))]
    InvalidArguments {
        tool: &'static str,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to encode {tool} result: {source}"))]
    EncodeResult {
        tool: &'static str,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownTool { .. } => StatusCode::ToolNotFound,
            Self::InvalidArguments { .. } => StatusCode::InvalidArguments,
            Self::EncodeResult { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Tool metadata advertised through `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct FileEditArgs {
    filepath: String,
    #[serde(default)]
    content: Option<String>,
}

/// Tool implementations shared by every request.
#[derive(Debug, Clone)]
pub struct GatewayTools {
    supervisor: ExecutionSupervisor,
    restart: RestartSignal,
    default_timeout_secs: i64,
}

impl GatewayTools {
    pub fn new(
        supervisor: ExecutionSupervisor,
        restart: RestartSignal,
        default_timeout_secs: i64,
    ) -> Self {
        Self {
            supervisor,
            restart,
            default_timeout_secs,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            ExecutionSupervisor::from_config(config),
            RestartSignal::from_config(config),
            config.default_timeout_secs,
        )
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec {
                name: EXECUTE_TOOL,
                description: "Run a non-interactive shell command with a timeout. \
                              Returns combined stdout/stderr, a warning and the exit code.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "command": {
                            "type": "string",
                            "description": "Command line passed to the platform shell"
                        },
                        "timeout": {
                            "type": "integer",
                            "description": "Timeout in seconds",
                            "default": self.default_timeout_secs
                        }
                    },
                    "required": ["command"]
                }),
            },
            ToolSpec {
                name: FILE_EDIT_TOOL,
                description: "Read a file, or overwrite it when content is given.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "filepath": { "type": "string" },
                        "content": { "type": ["string", "null"] }
                    },
                    "required": ["filepath"]
                }),
            },
            ToolSpec {
                name: RESTART_TOOL,
                description: "Restart this worker process. It comes back within a second.",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    /// Runs `command`, falling back to the configured timeout.
    pub async fn execute(&self, command: &str, timeout: Option<i64>) -> ExecutionResult {
        let timeout = timeout.unwrap_or(self.default_timeout_secs);
        self.supervisor.run(command, timeout).await
    }

    pub async fn file_edit(&self, filepath: &str, content: Option<&str>) -> String {
        file_edit::file_edit(filepath, content).await
    }

    pub fn request_restart(&self) -> String {
        self.restart.request()
    }

    /// Dispatches a call by tool name and returns the text payload.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        match name {
            EXECUTE_TOOL => {
                let request: ExecRequest = serde_json::from_value(arguments)
                    .context(tool_error::InvalidArgumentsSnafu { tool: EXECUTE_TOOL })?;
                let result = self.execute(&request.command, request.timeout).await;
                serde_json::to_string(&result)
                    .context(tool_error::EncodeResultSnafu { tool: EXECUTE_TOOL })
            }
            FILE_EDIT_TOOL => {
                let args: FileEditArgs = serde_json::from_value(arguments)
                    .context(tool_error::InvalidArgumentsSnafu {
                        tool: FILE_EDIT_TOOL,
                    })?;
                Ok(self.file_edit(&args.filepath, args.content.as_deref()).await)
            }
            RESTART_TOOL => Ok(self.request_restart()),
            other => tool_error::UnknownToolSnafu { name: other }.fail(),
        }
    }
}

#[cfg(test)]
#[path = "tools.test.rs"]
mod tests;
