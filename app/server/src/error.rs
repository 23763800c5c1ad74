//! Errors raised by the stdio server and its bootstrap.

use std::path::PathBuf;

use shellgate_error::ErrorExt;
use shellgate_error::Location;
use shellgate_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ServerError {
    #[snafu(display("Failed to open log file {}: {source}", path.display()))]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to read request: {source}"))]
    ReadRequest {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to write response: {source}"))]
    WriteResponse {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to encode response: {source}"))]
    EncodeResponse {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LogFile { .. } => StatusCode::ConfigFileError,
            Self::ReadRequest { .. } | Self::WriteResponse { .. } => StatusCode::IoError,
            Self::EncodeResponse { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
