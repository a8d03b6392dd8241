//! Validate configuration command.

use anyhow::Result;
use barstream_engine::IndicatorManager;
use std::path::Path;

use super::load_app_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = load_app_config(config_path)?;
    let checked = config
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|_| IndicatorManager::from_config(&config.engine).map_err(Into::into));

    let manager = match checked {
        Ok(manager) => manager,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e);
        }
    };

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Log level: {}", config.logging.level);
    println!("Ordering policy: {:?}", config.engine.history.ordering);
    match config.engine.aggregation {
        Some(tf) => println!("Tick aggregation: {}", tf),
        None => println!("Tick aggregation: off"),
    }
    println!();
    println!("Indicators:");
    for name in manager.indicator_names() {
        let (label, min_history) = manager.describe(name)?;
        let reading = manager.get_reading(name)?;
        println!(
            "  {:<12} {:<16} feed={:<4} min_history={:<4} enabled={}",
            name,
            label,
            reading.feed.to_string(),
            min_history,
            reading.enabled
        );
    }
    println!(
        "History retention: {} bars, {} ticks",
        manager.bar_history().retention(),
        manager.tick_history().retention()
    );

    Ok(())
}
