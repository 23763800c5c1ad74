//! Configuration for the shellgate worker.
//!
//! Values are resolved in layers: built-in defaults, then an optional
//! `shellgate.toml`, then `SHELLGATE_*` environment variables. CLI flags are
//! applied last by the binary.

pub mod config;
pub mod env_loader;
pub mod error;
pub mod loader;

pub use config::DEFAULT_CONFIG_FILE;
pub use config::GatewayConfig;
pub use env_loader::EnvLoader;
pub use error::ConfigError;
pub use error::Result;
pub use loader::load_config;
