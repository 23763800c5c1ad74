//! The resolved worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::error::Result;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "shellgate.toml";

/// Exit status that asks the supervising process for a respawn.
pub const DEFAULT_RESTART_EXIT_CODE: i32 = 87;

/// Worker configuration.
///
/// # Example
///
/// ```toml
/// default_timeout_secs = 120
/// kill_grace_secs = 3
/// log_file = "/var/log/shellgate.log"
/// log_level = "info"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Timeout applied when a caller omits one.
    pub default_timeout_secs: i64,
    /// Liveness poll interval while a command runs.
    pub poll_interval_ms: u64,
    /// How long a soft interrupt gets before the tree is force-killed.
    pub kill_grace_secs: u64,
    /// Upper bound on waiting for the output pump after the child exits.
    pub drain_timeout_ms: u64,
    /// Delay between acknowledging a restart and exiting.
    pub restart_delay_ms: u64,
    /// Exit status reserved for "restart me".
    pub restart_exit_code: i32,
    /// Append-only log file.
    pub log_file: PathBuf,
    /// `tracing` filter directive for the log file.
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 60,
            poll_interval_ms: 50,
            kill_grace_secs: 5,
            drain_timeout_ms: 2_000,
            restart_delay_ms: 200,
            restart_exit_code: DEFAULT_RESTART_EXIT_CODE,
            log_file: PathBuf::from("shellgate.log"),
            log_level: "debug".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    /// Rejects values that would make the worker misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_timeout_secs",
                reason: format!("must be positive, got {}", self.default_timeout_secs),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.restart_exit_code == 0 {
            return Err(ConfigError::InvalidValue {
                field: "restart_exit_code",
                reason: "0 is the normal success status".to_string(),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
