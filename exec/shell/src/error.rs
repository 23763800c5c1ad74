//! Error types for process spawning.

use shellgate_error::ErrorExt;
use shellgate_error::Location;
use shellgate_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ShellError {
    /// The combined output pipe could not be created.
    #[snafu(display("Failed to create output pipe: {source}"))]
    Pipe {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// The platform shell could not be started.
    #[snafu(display("Failed to spawn command: {source}"))]
    Spawn {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ShellError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Pipe { .. } => StatusCode::IoError,
            Self::Spawn { .. } => StatusCode::ProcessSpawn,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
