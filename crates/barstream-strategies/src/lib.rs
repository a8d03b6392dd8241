//! Strategies consuming the indicator snapshot.
//!
//! - Confluence: long entries when trend, VWAP, EMA, RSI and higher-timeframe
//!   filters all agree

mod confluence;

pub use confluence::{ConfluenceConfig, ConfluenceStrategy, IndicatorNames};
