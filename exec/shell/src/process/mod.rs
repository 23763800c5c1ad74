//! Spawning commands in their own process group and tearing the group down.
//!
//! Each command runs under the platform shell as the leader of a new process
//! group, with stdout and stderr joined onto one pipe and stdin closed.
//! Termination always addresses the whole group so grandchildren die with
//! the command.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixProcessGroup as PlatformProcessGroup;
#[cfg(windows)]
pub use windows::WindowsProcessGroup as PlatformProcessGroup;

use std::io::PipeReader;
use std::process::ExitStatus;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use snafu::ResultExt;
use tokio::process::Child;
use tokio::process::Command;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::error::shell_error;

/// Return code reported when a terminal status cannot be determined.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Minimum time to wait for a killed process to be reaped.
const REAP_TIMEOUT_FLOOR: Duration = Duration::from_secs(1);

/// Platform capability for process-group control.
pub trait ProcessGroup: Send + Sync + std::fmt::Debug {
    /// Builds a shell invocation of `command` that leads a new process group.
    fn shell_command(&self, command: &str) -> Command;

    /// Politely asks the group led by `pid` to stop.
    ///
    /// Returns false when no soft interrupt could be delivered, in which case
    /// the caller escalates immediately.
    fn soft_interrupt(&self, pid: u32) -> bool;

    /// Kills every process in the group led by `pid`. Failures are ignored.
    fn hard_kill_tree(&self, pid: u32);
}

/// Liveness of a spawned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    /// Exited; `None` when the status could not be read.
    Exited(Option<i32>),
}

/// A running command and the read end of its combined output.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    output: Option<PipeReader>,
}

impl ProcessHandle {
    /// OS process id, which is also the process group id.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Takes the combined stdout/stderr stream. Returns `None` on later calls.
    pub fn take_output(&mut self) -> Option<PipeReader> {
        self.output.take()
    }
}

/// Spawns and terminates command process trees.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    group: Arc<dyn ProcessGroup>,
    kill_grace: Duration,
}

impl ProcessRunner {
    /// A runner for the current platform.
    pub fn new(kill_grace: Duration) -> Self {
        Self::with_group(Arc::new(PlatformProcessGroup), kill_grace)
    }

    pub fn with_group(group: Arc<dyn ProcessGroup>, kill_grace: Duration) -> Self {
        Self { group, kill_grace }
    }

    /// Starts `command` under the platform shell.
    pub fn spawn(&self, command: &str) -> Result<ProcessHandle> {
        let (reader, writer) = std::io::pipe().context(shell_error::PipeSnafu)?;
        let stderr_writer = writer.try_clone().context(shell_error::PipeSnafu)?;

        let mut cmd = self.group.shell_command(command);
        cmd.stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer)
            .kill_on_drop(true);

        let child = cmd.spawn().context(shell_error::SpawnSnafu)?;
        // Our copies of the write end live in `cmd`; the reader only sees
        // EOF once they are closed.
        drop(cmd);

        let pid = child.id();
        debug!(pid, "spawned command");
        Ok(ProcessHandle {
            child,
            pid,
            output: Some(reader),
        })
    }

    /// Non-blocking liveness check.
    pub fn poll(&self, handle: &mut ProcessHandle) -> ProcessState {
        match handle.child.try_wait() {
            Ok(Some(status)) => ProcessState::Exited(exit_code(status)),
            Ok(None) => ProcessState::Running,
            Err(e) => {
                warn!(pid = handle.pid, "Failed to query process status: {e}");
                ProcessState::Exited(None)
            }
        }
    }

    /// Stops the whole tree: soft interrupt, grace window, then hard kill.
    ///
    /// The hard kill is sent even when the leader exits within the grace
    /// window, since descendants may ignore the soft interrupt. Safe to call
    /// on a process that has already exited.
    pub async fn terminate_tree(&self, handle: &mut ProcessHandle) {
        let Some(pid) = handle.pid else {
            return;
        };

        if self.group.soft_interrupt(pid) {
            match tokio::time::timeout(self.kill_grace, handle.child.wait()).await {
                Ok(_) => debug!(pid, "group leader stopped after soft interrupt"),
                Err(_) => debug!(pid, grace = ?self.kill_grace, "soft interrupt ignored"),
            }
        }

        debug!(pid, "force killing process tree");
        self.group.hard_kill_tree(pid);
        // Covers the direct child when the group kill could not be delivered.
        let _ = handle.child.start_kill();
    }

    /// Reaps the process, bounded by the kill grace window.
    ///
    /// Returns `None` if the status is unavailable or the wait timed out.
    pub async fn wait(&self, handle: &mut ProcessHandle) -> Option<i32> {
        let limit = self.kill_grace.max(REAP_TIMEOUT_FLOOR);
        match tokio::time::timeout(limit, handle.child.wait()).await {
            Ok(Ok(status)) => exit_code(status),
            Ok(Err(e)) => {
                warn!(pid = handle.pid, "Failed to wait for process: {e}");
                None
            }
            Err(_) => {
                warn!(pid = handle.pid, "Process was not reaped within {limit:?}");
                None
            }
        }
    }
}

/// Maps an exit status to a return code; signal deaths become `-signal`.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.code().or_else(|| status.signal().map(|signal| -signal))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code()
}

#[cfg(test)]
#[path = "mod.test.rs"]
mod tests;
