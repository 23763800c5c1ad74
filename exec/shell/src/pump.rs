//! Concurrent draining of a command's combined output.
//!
//! The pump reads line by line on a blocking thread so the pipe never fills
//! up while the supervisor is polling. Every line is appended to a shared
//! [`OutputBuffer`] and logged at debug level as it arrives.

use std::io::BufRead;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Read;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;
use tracing::warn;

/// Ordered, append-only record of output lines. Clones share storage.
///
/// Lines keep their terminators, so [`OutputBuffer::text`] reproduces the
/// stream exactly.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    /// Concatenation of every line received so far.
    pub fn text(&self) -> String {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .concat()
    }
}

/// A background reader attached to one output stream.
#[derive(Debug)]
pub struct OutputPump {
    task: JoinHandle<()>,
}

impl OutputPump {
    /// Starts draining `reader` into `buffer`.
    pub fn start<R>(reader: R, buffer: OutputBuffer) -> Self
    where
        R: Read + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(move || drain(reader, &buffer));
        Self { task }
    }

    /// Waits up to `limit` for the stream to reach end-of-file.
    ///
    /// Returns false if the stream is still open, e.g. because a descendant
    /// that left the process group kept the write end.
    ///
    /// A blocked read cannot be cancelled, so in that case the reader keeps
    /// its blocking-pool thread until the last writer closes the pipe. Lines
    /// it reads afterwards still land in the shared buffer but are no longer
    /// reported to anyone.
    pub async fn finish(self, limit: Duration) -> bool {
        match tokio::time::timeout(limit, self.task).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("Output pump failed: {e}");
                true
            }
            Err(_) => false,
        }
    }
}

/// Reads `reader` to end-of-file, one line at a time.
///
/// Invalid UTF-8 is replaced rather than rejected. A read error ends the
/// stream.
pub fn drain<R: Read>(reader: R, buffer: &OutputBuffer) {
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&raw).into_owned();
                debug!("{}", line.trim_end_matches(['\r', '\n']));
                buffer.push(line);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Failed to read command output: {e}");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "pump.test.rs"]
mod tests;
