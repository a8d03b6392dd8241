//! Market data sources for the indicator engine.
//!
//! Historical bars or ticks are read from CSV and replayed, one observation
//! at a time, over a channel.

mod csv_source;
mod feed;

pub use csv_source::CsvDataSource;
pub use feed::spawn_feed;

use barstream_core::error::DataError;
use barstream_core::types::{Feed, Observation};

/// Load observations of the given feed from a CSV file.
pub async fn load_csv(path: &str, feed: Feed) -> Result<Vec<Observation>, DataError> {
    let source = CsvDataSource::new(path)?;
    source.load_observations(feed)
}
