//! Environment variable overrides for [`GatewayConfig`].

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::config::GatewayConfig;

pub const ENV_DEFAULT_TIMEOUT: &str = "SHELLGATE_DEFAULT_TIMEOUT";
pub const ENV_POLL_INTERVAL_MS: &str = "SHELLGATE_POLL_INTERVAL_MS";
pub const ENV_KILL_GRACE_SECS: &str = "SHELLGATE_KILL_GRACE_SECS";
pub const ENV_DRAIN_TIMEOUT_MS: &str = "SHELLGATE_DRAIN_TIMEOUT_MS";
pub const ENV_RESTART_DELAY_MS: &str = "SHELLGATE_RESTART_DELAY_MS";
pub const ENV_RESTART_EXIT_CODE: &str = "SHELLGATE_RESTART_EXIT_CODE";
pub const ENV_LOG_FILE: &str = "SHELLGATE_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "SHELLGATE_LOG_LEVEL";

/// Applies `SHELLGATE_*` variables on top of an existing configuration.
#[derive(Debug, Default)]
pub struct EnvLoader;

impl EnvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Overwrites every field whose variable is set and parses.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(val) = self.get_parsed::<i64>(ENV_DEFAULT_TIMEOUT) {
            config.default_timeout_secs = val;
            debug!(env = ENV_DEFAULT_TIMEOUT, value = val, "loaded");
        }
        if let Some(val) = self.get_parsed::<u64>(ENV_POLL_INTERVAL_MS) {
            config.poll_interval_ms = val;
            debug!(env = ENV_POLL_INTERVAL_MS, value = val, "loaded");
        }
        if let Some(val) = self.get_parsed::<u64>(ENV_KILL_GRACE_SECS) {
            config.kill_grace_secs = val;
            debug!(env = ENV_KILL_GRACE_SECS, value = val, "loaded");
        }
        if let Some(val) = self.get_parsed::<u64>(ENV_DRAIN_TIMEOUT_MS) {
            config.drain_timeout_ms = val;
            debug!(env = ENV_DRAIN_TIMEOUT_MS, value = val, "loaded");
        }
        if let Some(val) = self.get_parsed::<u64>(ENV_RESTART_DELAY_MS) {
            config.restart_delay_ms = val;
            debug!(env = ENV_RESTART_DELAY_MS, value = val, "loaded");
        }
        if let Some(val) = self.get_parsed::<i32>(ENV_RESTART_EXIT_CODE) {
            config.restart_exit_code = val;
            debug!(env = ENV_RESTART_EXIT_CODE, value = val, "loaded");
        }
        if let Some(path) = self.get_path(ENV_LOG_FILE) {
            debug!(env = ENV_LOG_FILE, path = %path.display(), "loaded");
            config.log_file = path;
        }
        if let Some(level) = self.get_string(ENV_LOG_LEVEL) {
            debug!(env = ENV_LOG_LEVEL, value = %level, "loaded");
            config.log_level = level;
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Returns `None` if the variable is unset or does not parse.
    /// A value that is set but unparseable is logged and ignored.
    fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_string(key).and_then(|s| match s.trim().parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, value = %s, "Failed to parse env var, ignoring");
                None
            }
        })
    }

    fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_string(key).map(PathBuf::from)
    }
}

#[cfg(test)]
#[path = "env_loader.test.rs"]
mod tests;
