//! Configuration loading.
//!
//! A missing config file is expected (defaults apply). A file that exists but
//! fails to parse is an error: silently falling back to defaults would hide
//! typos in user configuration.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::types::MirrorConfig;
use crate::errors::ConfigError;

/// Load configuration from the given path, falling back to defaults when the
/// file does not exist.
pub fn load(path: &Path) -> Result<MirrorConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_not_found",
                path = %path.display()
            );
            return Ok(MirrorConfig::default());
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config: MirrorConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("'{}': {}", path.display(), e),
        })?;

    info!(event = "core.config.loaded", path = %path.display());
    Ok(config)
}

/// Persist configuration to the given path, creating parent directories.
pub fn save(config: &MirrorConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::ConfigParseError {
            message: e.to_string(),
        })?;
    fs::write(path, content)?;

    info!(event = "core.config.saved", path = %path.display());
    Ok(())
}
