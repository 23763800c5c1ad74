//! Status codes shared by every shellgate error.
//!
//! A code has five digits, `CC_NNN`: a two-digit category followed by a
//! number within that category. The category is derived from the value, so
//! adding a code only means picking a free number in the right range.

use strum::Display;
use strum::EnumIter;

/// Broad grouping of status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// 01_xxx, failures the caller cannot act on.
    Common,
    /// 02_xxx, bad requests.
    Input,
    /// 03_xxx
    IO,
    /// 06_xxx, child process lifecycle.
    Process,
    /// 10_xxx
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(i32)]
pub enum StatusCode {
    Unknown = 1_000,
    /// A bug or an invariant violation.
    Internal = 1_001,

    InvalidArguments = 2_000,
    /// A tool call named a tool that is not registered.
    ToolNotFound = 2_001,

    IoError = 3_000,
    FileNotFound = 3_001,

    /// The platform shell could not be started.
    ProcessSpawn = 6_000,

    InvalidConfig = 10_000,
    /// The config file is missing or unreadable.
    ConfigFileError = 10_001,
}

impl StatusCode {
    pub const fn category(self) -> StatusCategory {
        match self as i32 / 1_000 {
            1 => StatusCategory::Common,
            2 => StatusCategory::Input,
            3 => StatusCategory::IO,
            6 => StatusCategory::Process,
            _ => StatusCategory::Config,
        }
    }

    /// Whether the same request may succeed if tried again.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Whether the failure deserves an `error!` line rather than a warning.
    pub const fn should_log_error(self) -> bool {
        matches!(self, Self::Unknown | Self::Internal | Self::ProcessSpawn)
    }
}

#[cfg(test)]
#[path = "status_code.test.rs"]
mod tests;
