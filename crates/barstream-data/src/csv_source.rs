//! CSV data source.

use std::io::Read;
use std::path::Path;

use barstream_core::error::DataError;
use barstream_core::types::{Bar, Feed, Observation, Tick};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// CSV bar record.
#[derive(Debug, Deserialize)]
struct BarRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// CSV tick record.
#[derive(Debug, Deserialize)]
struct TickRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Price", alias = "price", alias = "ltp", alias = "LTP")]
    price: f64,
    #[serde(
        alias = "Volume",
        alias = "volume",
        alias = "quantity",
        alias = "qty",
        default
    )]
    volume: f64,
}

/// CSV data source for historical bars or ticks.
pub struct CsvDataSource {
    path: String,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: &str) -> Result<Self, DataError> {
        if !Path::new(path).exists() {
            return Err(DataError::NoDataAvailable(path.to_string()));
        }
        Ok(Self {
            path: path.to_string(),
        })
    }

    /// Load bars, sorted by timestamp.
    pub fn load_bars(&self) -> Result<Vec<Bar>, DataError> {
        let reader = std::fs::File::open(&self.path)?;
        read_bars(reader)
    }

    /// Load ticks, sorted by timestamp.
    pub fn load_ticks(&self) -> Result<Vec<Tick>, DataError> {
        let reader = std::fs::File::open(&self.path)?;
        read_ticks(reader)
    }

    /// Load the file as a serial feed of `feed` observations.
    pub fn load_observations(&self, feed: Feed) -> Result<Vec<Observation>, DataError> {
        let observations: Vec<Observation> = match feed {
            Feed::Bar => self.load_bars()?.into_iter().map(Observation::from).collect(),
            Feed::Tick => self.load_ticks()?.into_iter().map(Observation::from).collect(),
        };
        if observations.is_empty() {
            return Err(DataError::NoDataAvailable(self.path.clone()));
        }
        debug!("Loaded {} {} observations from {}", observations.len(), feed, self.path);
        Ok(observations)
    }
}

fn read_records<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize()
        .map(|result| result.map_err(|e| DataError::ParseError(e.to_string())))
        .collect()
}

fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut bars = read_records::<_, BarRecord>(reader)?
        .into_iter()
        .map(|r| {
            Ok(Bar::new(
                parse_timestamp(&r.date)?,
                r.open,
                r.high,
                r.low,
                r.close,
                r.volume,
            ))
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    // Stable, so equal timestamps keep file order
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn read_ticks<R: Read>(reader: R) -> Result<Vec<Tick>, DataError> {
    let mut ticks = read_records::<_, TickRecord>(reader)?
        .into_iter()
        .map(|r| Ok(Tick::new(parse_timestamp(&r.date)?, r.price, r.volume)))
        .collect::<Result<Vec<_>, DataError>>()?;

    ticks.sort_by_key(|t| t.timestamp);
    Ok(ticks)
}

/// Parse various timestamp formats into Unix milliseconds (UTC).
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in date_formats {
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp: milliseconds if more than 10 digits, else seconds
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
