//! Market observations: OHLCV bars and individual ticks.

use serde::{Deserialize, Serialize};

/// Anything carrying a feed timestamp (Unix milliseconds).
pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

/// OHLCV bar. Immutable once appended to a history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Open a bar from a single trade; all four prices start at `price`.
    pub fn from_trade(timestamp: i64, price: f64, volume: f64) -> Self {
        Self::new(timestamp, price, price, price, price, volume)
    }

    /// Fold another trade into the bar.
    pub fn absorb(&mut self, price: f64, volume: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += volume;
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the true range against the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

impl Timestamped for Bar {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// A single trade event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Trade price
    pub price: f64,
    /// Traded quantity
    pub volume: f64,
}

impl Tick {
    /// Create a new tick.
    pub fn new(timestamp: i64, price: f64, volume: f64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }
}

impl Timestamped for Tick {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// One event from the market-data feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Observation {
    Bar(Bar),
    Tick(Tick),
}

impl Observation {
    /// Latest traded price carried by the observation.
    pub fn price(&self) -> f64 {
        match self {
            Observation::Bar(bar) => bar.close,
            Observation::Tick(tick) => tick.price,
        }
    }
}

impl Timestamped for Observation {
    fn timestamp(&self) -> i64 {
        match self {
            Observation::Bar(bar) => bar.timestamp,
            Observation::Tick(tick) => tick.timestamp,
        }
    }
}

impl From<Bar> for Observation {
    fn from(bar: Bar) -> Self {
        Observation::Bar(bar)
    }
}

impl From<Tick> for Observation {
    fn from(tick: Tick) -> Self {
        Observation::Tick(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.true_range(None) - 15.0).abs() < 0.001);
        // Gap below the previous close widens the range
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_bar_absorb_trades() {
        let mut bar = Bar::from_trade(0, 100.0, 5.0);
        bar.absorb(102.0, 1.0);
        bar.absorb(99.0, 2.0);
        bar.absorb(101.0, 3.0);

        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 102.0);
        assert_eq!(bar.low, 99.0);
        assert_eq!(bar.close, 101.0);
        assert_eq!(bar.volume, 11.0);
    }

    #[test]
    fn test_observation_serde_tag() {
        let obs: Observation = Tick::new(5, 10.0, 2.0).into();
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"type\":\"tick\""));

        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp(), 5);
        assert_eq!(back.price(), 10.0);
    }
}
