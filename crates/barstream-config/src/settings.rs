//! Configuration structures.

use barstream_core::error::BarstreamError;
use barstream_core::traits::StrategyConfig;
use barstream_engine::ManagerConfig;
use barstream_strategies::ConfluenceConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: ManagerConfig,
    #[serde(default)]
    pub strategy: ConfluenceConfig,
}

impl AppConfig {
    /// Check the parts that are not validated when the manager is built.
    pub fn validate(&self) -> Result<(), BarstreamError> {
        self.strategy.validate()?;
        self.engine.history.validate()?;
        if self.engine.indicators.is_empty() {
            return Err(BarstreamError::Config(
                "no indicators configured under [engine.indicators]".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, BarstreamError> {
        toml::to_string_pretty(self).map_err(|e| BarstreamError::Config(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    /// Channel capacity between the feed task and the engine
    pub feed_buffer: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "barstream".to_string(),
            feed_buffer: 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
