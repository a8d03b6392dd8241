//! Volume-weighted indicators.

use barstream_core::error::IndicatorError;
use barstream_core::traits::Indicator;
use barstream_core::types::{Bar, IndicatorValue, Tick, Window};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// When the VWAP accumulators start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionReset {
    /// At every calendar-day boundary, shifted by the session's UTC offset
    #[default]
    Daily,
    /// Never; the VWAP is cumulative over the whole feed
    Never,
}

/// Which bar price a bar-fed VWAP weights by volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[default]
    Close,
    /// (high + low + close) / 3
    Typical,
}

impl PriceSource {
    fn price(&self, bar: &Bar) -> f64 {
        match self {
            PriceSource::Close => bar.close,
            PriceSource::Typical => bar.typical_price(),
        }
    }
}

/// Session Volume Weighted Average Price.
///
/// Accumulates Σ(price × volume) and Σvolume over the observations it is
/// invoked on and resets them when a new session starts. It consumes only
/// the newest observation of each window, so observations arriving while
/// the indicator is disabled are not part of the average. A late observation
/// from an earlier session is ignored. Works on both bars and ticks.
#[derive(Debug, Clone)]
pub struct Vwap {
    reset: SessionReset,
    utc_offset_minutes: i32,
    price_source: PriceSource,
    sum_pv: f64,
    sum_volume: f64,
    session: Option<i64>,
}

impl Vwap {
    /// VWAP that resets at UTC midnight.
    pub fn new() -> Self {
        Self::with_session(SessionReset::Daily, 0)
    }

    /// VWAP with an explicit reset policy; `utc_offset_minutes` shifts the
    /// daily boundary to the exchange's local midnight.
    pub fn with_session(reset: SessionReset, utc_offset_minutes: i32) -> Self {
        Self {
            reset,
            utc_offset_minutes,
            price_source: PriceSource::default(),
            sum_pv: 0.0,
            sum_volume: 0.0,
            session: None,
        }
    }

    /// Choose the bar price used when fed bars.
    pub fn with_price_source(mut self, price_source: PriceSource) -> Self {
        self.price_source = price_source;
        self
    }

    fn session_of(&self, timestamp: i64) -> i64 {
        match self.reset {
            SessionReset::Daily => {
                let local = timestamp + i64::from(self.utc_offset_minutes) * 60_000;
                local.div_euclid(MILLIS_PER_DAY)
            }
            SessionReset::Never => 0,
        }
    }

    fn accumulate(&mut self, timestamp: i64, price: f64, volume: f64) -> IndicatorValue {
        let session = self.session_of(timestamp);
        match self.session {
            // Late observation from a finished session
            Some(current) if session < current => return self.value(),
            Some(current) if session == current => {}
            _ => {
                self.sum_pv = 0.0;
                self.sum_volume = 0.0;
                self.session = Some(session);
            }
        }

        if price.is_finite() && volume.is_finite() && volume >= 0.0 {
            self.sum_pv += price * volume;
            self.sum_volume += volume;
        }
        self.value()
    }

    /// Current session average.
    ///
    /// Fails with [`IndicatorError::UndefinedResult`] while no volume has traded.
    pub fn average(&self) -> Result<f64, IndicatorError> {
        if self.sum_volume > 0.0 {
            Ok(self.sum_pv / self.sum_volume)
        } else {
            Err(IndicatorError::UndefinedResult(
                "no volume traded in the current session".to_string(),
            ))
        }
    }

    fn value(&self) -> IndicatorValue {
        self.average()
            .map(IndicatorValue::scalar)
            .unwrap_or(IndicatorValue::NotAvailable)
    }

    fn clear(&mut self) {
        self.sum_pv = 0.0;
        self.sum_volume = 0.0;
        self.session = None;
    }
}

impl Default for Vwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator<Bar> for Vwap {
    fn name(&self) -> &str {
        "VWAP"
    }

    fn min_history(&self) -> usize {
        1
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        match window.last() {
            Some(bar) => {
                let price = self.price_source.price(bar);
                self.accumulate(bar.timestamp, price, bar.volume)
            }
            None => IndicatorValue::NotAvailable,
        }
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Indicator<Tick> for Vwap {
    fn name(&self) -> &str {
        "VWAP"
    }

    fn min_history(&self) -> usize {
        1
    }

    fn calculate(&mut self, window: Window<'_, Tick>) -> IndicatorValue {
        match window.last() {
            Some(tick) => self.accumulate(tick.timestamp, tick.price, tick.volume),
            None => IndicatorValue::NotAvailable,
        }
    }

    fn reset(&mut self) {
        self.clear();
    }
}
