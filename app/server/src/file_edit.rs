//! Whole-file read/write passthrough.
//!
//! Failures are reported in the returned string and never propagate to the
//! transport.

use std::io::ErrorKind;

use tracing::info;
use tracing::warn;

/// Reads `filepath` when `content` is `None`, otherwise overwrites it.
pub async fn file_edit(filepath: &str, content: Option<&str>) -> String {
    match content {
        None => read_file(filepath).await,
        Some(content) => write_file(filepath, content).await,
    }
}

/// Anything that is not a readable regular file, directories included, is
/// reported as missing.
async fn read_file(filepath: &str) -> String {
    let is_file = tokio::fs::metadata(filepath)
        .await
        .is_ok_and(|meta| meta.is_file());
    if !is_file {
        return format!("Error: File '{filepath}' does not exist.");
    }

    match tokio::fs::read_to_string(filepath).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            format!("Error: File '{filepath}' does not exist.")
        }
        Err(e) => {
            warn!(path = filepath, "file_edit read failed: {e}");
            format!("Exception: {e}")
        }
    }
}

async fn write_file(filepath: &str, content: &str) -> String {
    match tokio::fs::write(filepath, content).await {
        Ok(()) => {
            info!(path = filepath, bytes = content.len(), "file_edit wrote file");
            format!("Successfully wrote to '{filepath}'.")
        }
        Err(e) => {
            warn!(path = filepath, "file_edit write failed: {e}");
            format!("Exception: {e}")
        }
    }
}

#[cfg(test)]
#[path = "file_edit.test.rs"]
mod tests;
