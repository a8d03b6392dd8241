//! Tick to bar aggregation.

use barstream_core::types::{Bar, Tick, Timeframe};

/// Buckets ticks into bars of a fixed timeframe.
///
/// A bar is timestamped with the start of its bucket and closed when the
/// first tick of a later bucket arrives. Ticks that fall into an earlier
/// bucket than the forming bar are folded into the forming bar.
#[derive(Debug, Clone)]
pub struct BarAggregator {
    timeframe: Timeframe,
    current: Option<Bar>,
}

impl BarAggregator {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            current: None,
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Bar still being formed.
    pub fn current_bar(&self) -> Option<&Bar> {
        self.current.as_ref()
    }

    /// Add a tick; returns the bar it closed, if any.
    pub fn push(&mut self, tick: &Tick) -> Option<Bar> {
        let bucket = self.timeframe.bucket_start(tick.timestamp);

        if let Some(bar) = self.current.as_mut() {
            if bucket <= bar.timestamp {
                bar.absorb(tick.price, tick.volume);
                return None;
            }
        }
        self.current
            .replace(Bar::from_trade(bucket, tick.price, tick.volume))
    }

    /// Close the forming bar without waiting for the next bucket.
    pub fn flush(&mut self) -> Option<Bar> {
        self.current.take()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
