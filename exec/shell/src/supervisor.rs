//! Orchestrates one command execution end to end.
//!
//! Flow for [`ExecutionSupervisor::run`]:
//! 1. Reject non-positive timeouts and interactive commands without spawning.
//! 2. Spawn the command in its own process group and start the output pump.
//! 3. Poll liveness on a fixed interval until exit or timeout.
//! 4. On timeout, terminate the whole tree and reap it.
//! 5. Drain remaining output, trim it and run the prompt heuristic.

use std::time::Duration;
use std::time::Instant;

use shellgate_config::GatewayConfig;
use shellgate_error::ErrorExt;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::classifier;
use crate::classifier::Verdict;
use crate::command::ExecutionResult;
use crate::process::ProcessHandle;
use crate::process::ProcessRunner;
use crate::process::ProcessState;
use crate::process::UNKNOWN_EXIT_CODE;
use crate::pump::OutputBuffer;
use crate::pump::OutputPump;

/// Warning for a timeout that is zero or negative.
pub const TIMEOUT_NOT_POSITIVE: &str = "Timeout must be positive seconds.";

/// How the monitoring loop ended.
enum Outcome {
    Exited(Option<i32>),
    TimedOut { code: Option<i32>, warning: String },
}

/// Runs commands with a timeout and returns their captured output.
///
/// Holds no per-call state, so one supervisor can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ExecutionSupervisor {
    runner: ProcessRunner,
    poll_interval: Duration,
    drain_timeout: Duration,
}

impl ExecutionSupervisor {
    pub fn new(runner: ProcessRunner, poll_interval: Duration, drain_timeout: Duration) -> Self {
        Self {
            runner,
            poll_interval,
            drain_timeout,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            ProcessRunner::new(config.kill_grace()),
            config.poll_interval(),
            config.drain_timeout(),
        )
    }

    /// Executes `command` with a timeout in seconds.
    ///
    /// Never fails: rejections, spawn failures and timeouts are reported
    /// through [`ExecutionResult::warning`].
    pub async fn run(&self, command: &str, timeout_secs: i64) -> ExecutionResult {
        if timeout_secs <= 0 {
            error!("{TIMEOUT_NOT_POSITIVE} Got {timeout_secs} for: {command}");
            return ExecutionResult::rejected(TIMEOUT_NOT_POSITIVE);
        }

        if let Verdict::Blocked(reason) = classifier::preflight(command) {
            let warning = format!("Blocked: {reason}");
            warn!("{warning}");
            return ExecutionResult::rejected(warning);
        }

        info!("EXEC {command}");

        let mut handle = match self.runner.spawn(command) {
            Ok(handle) => handle,
            Err(e) => {
                if e.status_code().should_log_error() {
                    error!("{e}");
                } else {
                    warn!("{e}");
                }
                return ExecutionResult {
                    output: String::new(),
                    warning: Some(e.to_string()),
                    returncode: Some(UNKNOWN_EXIT_CODE),
                };
            }
        };

        let buffer = OutputBuffer::new();
        let pump = handle
            .take_output()
            .map(|reader| OutputPump::start(reader, buffer.clone()));

        let outcome = self.monitor(&mut handle, timeout_secs).await;

        if let Some(pump) = pump {
            if !pump.finish(self.drain_timeout).await {
                warn!(
                    pid = handle.pid(),
                    "Output still open after {:?}; returning what was captured",
                    self.drain_timeout
                );
            }
        }

        let output = buffer.text().trim().to_string();
        let (code, timeout_warning) = match outcome {
            Outcome::Exited(code) => (code, None),
            Outcome::TimedOut { code, warning } => (code, Some(warning)),
        };

        let warning = match timeout_warning {
            Some(warning) => Some(warning),
            None => match classifier::postflight(&output) {
                Verdict::Warned(reason) => {
                    warn!("{reason}");
                    Some(reason)
                }
                Verdict::Clear | Verdict::Blocked(_) => None,
            },
        };

        let returncode = code.unwrap_or(UNKNOWN_EXIT_CODE);
        debug!(returncode, "command finished");
        ExecutionResult {
            output,
            warning,
            returncode: Some(returncode),
        }
    }

    async fn monitor(&self, handle: &mut ProcessHandle, timeout_secs: i64) -> Outcome {
        let limit = Duration::from_secs(timeout_secs.unsigned_abs());
        let started = Instant::now();

        loop {
            if let ProcessState::Exited(code) = self.runner.poll(handle) {
                return Outcome::Exited(code);
            }

            if started.elapsed() > limit {
                let warning = format!("Process exceeded {timeout_secs}s - terminating.");
                warn!(pid = handle.pid(), "{warning}");
                self.runner.terminate_tree(handle).await;
                let code = self.runner.wait(handle).await;
                return Outcome::TimedOut { code, warning };
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
#[path = "supervisor.test.rs"]
mod tests;
