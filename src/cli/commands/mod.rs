//! CLI command implementations.

pub mod indicators;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};
use barstream_config::{load_config, AppConfig};
use std::path::Path;
use tracing::warn;

/// Load the configuration file, falling back to defaults when it is absent.
pub(crate) fn load_app_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    load_config(path).with_context(|| format!("Failed to load config from {}", path.display()))
}
