//! Trend-following indicators.

use barstream_core::error::IndicatorError;
use barstream_core::traits::Indicator;
use barstream_core::types::{Bar, Direction, IndicatorValue, Window};

use crate::{require_period, require_positive};

/// Supertrend.
///
/// ATR bands around the typical price that only ratchet in the direction of
/// the trend; the trend flips when a close crosses the opposite band. The
/// ratchet is replayed over the whole window on every call, starting in an
/// up-trend, so the result depends only on the window.
#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
}

impl Supertrend {
    /// Create a new Supertrend with ATR `period` and band `multiplier`.
    ///
    /// Common parameters are (10, 3.0).
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        Ok(Self {
            period: require_period(period, "Supertrend")?,
            multiplier: require_positive(multiplier, "multiplier")?,
        })
    }
}

impl Indicator<Bar> for Supertrend {
    fn name(&self) -> &str {
        "Supertrend"
    }

    fn min_history(&self) -> usize {
        self.period + 1
    }

    fn lookback(&self) -> usize {
        self.period * 3 + 1
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        if self.validate_window(&window).is_err() {
            return IndicatorValue::NotAvailable;
        }
        let window = window.suffix(self.lookback());

        // tr[j] is the true range of bar j + 1
        let tr = window.true_ranges();
        let period_f64 = self.period as f64;
        let mut tr_sum: f64 = tr[..self.period - 1].iter().sum();

        let mut state: Option<(f64, f64, Direction)> = None;
        let mut prev_close = 0.0;

        for end in self.period..window.len() {
            let Some(bar) = window.get(end) else {
                break;
            };
            tr_sum += tr[end - 1];
            if end > self.period {
                tr_sum -= tr[end - 1 - self.period];
            }
            let atr = tr_sum / period_f64;
            let mid = bar.typical_price();
            let basic_upper = mid + self.multiplier * atr;
            let basic_lower = mid - self.multiplier * atr;

            let next = match state {
                None => (basic_upper, basic_lower, Direction::Up),
                Some((upper, lower, direction)) => {
                    let upper = if basic_upper < upper || prev_close > upper {
                        basic_upper
                    } else {
                        upper
                    };
                    let lower = if basic_lower > lower || prev_close < lower {
                        basic_lower
                    } else {
                        lower
                    };
                    let direction = match direction {
                        Direction::Up if bar.close < lower => Direction::Down,
                        Direction::Down if bar.close > upper => Direction::Up,
                        d => d,
                    };
                    (upper, lower, direction)
                }
            };

            state = Some(next);
            prev_close = bar.close;
        }

        match state {
            Some((_, lower, Direction::Up)) => IndicatorValue::trend(lower, Direction::Up),
            Some((upper, _, Direction::Down)) => IndicatorValue::trend(upper, Direction::Down),
            None => IndicatorValue::NotAvailable,
        }
    }
}
