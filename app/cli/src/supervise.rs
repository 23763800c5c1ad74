//! Respawn loop around the worker process.
//!
//! The worker exits with the reserved restart status to ask for a fresh
//! copy of itself. Any other status ends the loop and becomes ours.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::process::Command;
use tracing::info;
use tracing::warn;

/// Exit status reported when the worker died without one.
const SIGNALLED_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone)]
pub struct WorkerSupervisor {
    program: PathBuf,
    args: Vec<OsString>,
    restart_exit_code: i32,
}

impl WorkerSupervisor {
    pub fn new(program: PathBuf, args: Vec<OsString>, restart_exit_code: i32) -> Self {
        Self {
            program,
            args,
            restart_exit_code,
        }
    }

    /// Runs workers until one exits with something other than the restart
    /// status, and returns that status.
    pub async fn run(&self) -> anyhow::Result<i32> {
        let mut generation: u64 = 0;
        loop {
            generation += 1;
            let status = self.run_worker(generation).await?;
            match status.code() {
                Some(code) if code == self.restart_exit_code => {
                    info!(generation, "worker requested restart");
                }
                Some(code) => {
                    info!(generation, code, "worker exited");
                    return Ok(code);
                }
                None => {
                    warn!(generation, "worker terminated without an exit code: {status}");
                    return Ok(SIGNALLED_EXIT_CODE);
                }
            }
        }
    }

    async fn run_worker(&self, generation: u64) -> anyhow::Result<ExitStatus> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn worker {}", self.program.display()))?;
        info!(generation, pid = child.id(), "worker started");

        let stdout = child
            .stdout
            .take()
            .map(|out| tokio::spawn(forward_lines(out, tokio::io::stdout())));
        let stderr = child
            .stderr
            .take()
            .map(|err| tokio::spawn(forward_lines(err, tokio::io::stderr())));

        let status = child.wait().await.context("failed to wait for worker")?;
        for task in [stdout, stderr].into_iter().flatten() {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to forward worker output: {e}"),
                Err(e) => warn!("Worker output task failed: {e}"),
            }
        }
        Ok(status)
    }
}

/// Copies `reader` to `writer` one line at a time, flushing each line.
///
/// Bytes are forwarded untouched, so non-UTF-8 output survives.
async fn forward_lines<R, W>(reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
}

#[cfg(test)]
#[path = "supervise.test.rs"]
mod tests;
