//! Error types for configuration loading.

use shellgate_error::ErrorExt;
use shellgate_error::StatusCode;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file is missing.
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// The configuration file is not valid TOML for [`crate::GatewayConfig`].
    #[error("Invalid TOML in {file}: {error}")]
    InvalidToml {
        /// The file path.
        file: String,
        /// The parser message.
        error: String,
    },

    /// A value is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::FileNotFound(_) => StatusCode::FileNotFound,
            Self::InvalidToml { .. } => StatusCode::ConfigFileError,
            Self::InvalidValue { .. } => StatusCode::InvalidConfig,
            Self::Io(_) => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
