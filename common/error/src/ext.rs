//! Extension trait shared by every error type in the workspace.

use std::any::Any;
use std::error::Error;

use crate::StatusCategory;
use crate::StatusCode;

/// Classification hooks layered on top of [`std::error::Error`].
pub trait ErrorExt: Error {
    /// Returns the status code of this error.
    fn status_code(&self) -> StatusCode {
        StatusCode::Unknown
    }

    /// Returns the error as [`Any`] so callers can downcast.
    fn as_any(&self) -> &dyn Any;

    /// Whether retrying the failed operation may succeed.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Message safe to surface to an external caller.
    ///
    /// Internal failures only expose their numeric code; everything else
    /// shows the display text.
    fn output_msg(&self) -> String {
        let code = self.status_code();
        match code.category() {
            StatusCategory::Common => format!("Internal error: {}", code as i32),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
