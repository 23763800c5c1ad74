//! Deferred self-termination with the reserved restart status.
//!
//! The confirmation is returned first and the exit happens on a detached
//! task after a short delay, so the reply can reach the host before the
//! worker goes away.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use shellgate_config::GatewayConfig;
use tracing::debug;
use tracing::info;

use crate::logging;

/// Reply sent before the worker exits.
pub const RESTART_CONFIRMATION: &str = "Restart requested – worker will be back in a second.";

/// What happens when the restart delay elapses.
pub trait ExitAction: Send + Sync + std::fmt::Debug {
    fn exit(&self, code: i32);
}

/// Flushes logs and stdio, then exits the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ExitAction for ProcessExit {
    fn exit(&self, code: i32) {
        info!(code, "exiting for restart");
        logging::shutdown_logging();
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        std::process::exit(code);
    }
}

#[derive(Debug, Clone)]
pub struct RestartSignal {
    delay: Duration,
    exit_code: i32,
    action: Arc<dyn ExitAction>,
    requested: Arc<AtomicBool>,
}

impl RestartSignal {
    pub fn new(delay: Duration, exit_code: i32) -> Self {
        Self::with_action(delay, exit_code, Arc::new(ProcessExit))
    }

    pub fn with_action(delay: Duration, exit_code: i32, action: Arc<dyn ExitAction>) -> Self {
        Self {
            delay,
            exit_code,
            action,
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.restart_delay(), config.restart_exit_code)
    }

    /// Schedules the exit and returns the confirmation immediately.
    ///
    /// Must be called from within a tokio runtime. Repeated requests while
    /// one is pending return the same confirmation without scheduling again.
    pub fn request(&self) -> String {
        if self.requested.swap(true, Ordering::SeqCst) {
            debug!("restart already pending");
            return RESTART_CONFIRMATION.to_string();
        }

        info!(
            delay = ?self.delay,
            code = self.exit_code,
            "restart requested"
        );
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let code = self.exit_code;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.exit(code);
        });

        RESTART_CONFIRMATION.to_string()
    }
}

#[cfg(test)]
#[path = "restart.test.rs"]
mod tests;
