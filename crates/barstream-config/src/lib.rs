//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LogFormat, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables override the file, e.g.
/// `BARSTREAM__ENGINE__HISTORY__ORDERING=reject`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("BARSTREAM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use barstream_engine::{IndicatorKind, OrderingPolicy};

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "barstream-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_config_file() {
        let path = write_temp(
            "load",
            r#"
            [app]
            name = "replay-test"

            [logging]
            level = "debug"
            format = "json"

            [engine.history]
            ordering = "reject"

            [engine.indicators.rsi]
            kind = "rsi"
            params = { period = 9 }

            [strategy]
            rsi_overbought = 75.0
            "#,
        );

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.app.name, "replay-test");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.engine.history.ordering, OrderingPolicy::Reject);
        assert_eq!(config.engine.indicators.len(), 1);
        assert_eq!(config.engine.indicators["rsi"].kind, IndicatorKind::Rsi);
        assert_eq!(config.engine.indicators["rsi"].params.period, Some(9));
        assert_eq!(config.strategy.rsi_overbought, 75.0);
        assert_eq!(config.strategy.rsi_oversold, 30.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_config(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let path = write_temp("empty", "");
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config, AppConfig::default());
    }
}
