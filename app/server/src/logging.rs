//! Durable log bootstrap.
//!
//! All diagnostics go to an append-only file through a non-blocking writer.
//! Nothing is ever written to stdout, which carries the protocol.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::sync::PoisonError;

use shellgate_config::GatewayConfig;
use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Result;
use crate::error::server_error;

/// Keeps the background writer alive until [`shutdown_logging`].
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Installs the global file subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this again
/// after a successful install is a no-op, as is calling it when another
/// global subscriber is already set.
pub fn init_logging(config: &GatewayConfig) -> Result<()> {
    let mut slot = LOG_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Ok(());
    }

    let path = &config.log_file;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context(server_error::LogFileSnafu { path: path.clone() })?;
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options
        .open(path)
        .context(server_error::LogFileSnafu { path: path.clone() })?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        return Ok(());
    }

    *slot = Some(guard);
    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(())
}

/// Flushes buffered log lines and stops the writer thread.
///
/// Later events are dropped; call only right before exiting.
pub fn shutdown_logging() {
    let guard = LOG_GUARD
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    drop(guard);
}
