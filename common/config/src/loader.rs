//! Resolves the layered configuration.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::config::GatewayConfig;
use crate::env_loader::EnvLoader;
use crate::error::ConfigError;
use crate::error::Result;

/// Loads defaults, the TOML file and environment overrides, then validates.
///
/// An explicit `path` must exist. Without one, `shellgate.toml` in the
/// current directory is used when present.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig> {
    let mut config = match resolve_file(path)? {
        Some(file) => read_toml(&file)?,
        None => GatewayConfig::default(),
    };
    EnvLoader::new().apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn resolve_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(p) if p.is_file() => Ok(Some(p.to_path_buf())),
        Some(p) => Err(ConfigError::FileNotFound(p.display().to_string())),
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            Ok(candidate.is_file().then_some(candidate))
        }
    }
}

fn read_toml(file: &Path) -> Result<GatewayConfig> {
    let text = std::fs::read_to_string(file)?;
    let config = toml::from_str(&text).map_err(|e| ConfigError::InvalidToml {
        file: file.display().to_string(),
        error: e.to_string(),
    })?;
    debug!(file = %file.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
#[path = "loader.test.rs"]
mod tests;
