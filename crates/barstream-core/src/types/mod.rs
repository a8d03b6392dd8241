//! Core data types for the indicator engine.

mod history;
mod ohlcv;
mod signal;
mod snapshot;
mod timeframe;
mod value;

pub use history::{History, Window};
pub use ohlcv::{Bar, Observation, Tick, Timestamped};
pub use signal::{Signal, SignalType};
pub use snapshot::Snapshot;
pub use timeframe::Timeframe;
pub use value::{BandValue, Direction, Feed, IndicatorValue, Reading, TrendValue};
