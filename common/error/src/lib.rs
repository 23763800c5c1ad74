//! Shared error classification for the shellgate crates.
//!
//! Every crate-level error enum implements [`ErrorExt`] so callers can map a
//! failure onto a [`StatusCode`] without matching on foreign error types.

mod ext;
mod status_code;

pub use ext::ErrorExt;
pub use snafu::Location;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
