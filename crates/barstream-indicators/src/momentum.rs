//! Momentum indicators.

use barstream_core::error::IndicatorError;
use barstream_core::traits::Indicator;
use barstream_core::types::{Bar, IndicatorValue, Window};

use crate::require_period;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
///
/// Boundary values: no losses over the smoothing window gives 100, a
/// completely flat window gives 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    label: String,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period(period, "RSI")?;
        Ok(Self {
            period,
            label: format!("RSI_{}", period),
        })
    }

    /// Average gain and loss using Wilder's smoothing method.
    ///
    /// Seeded with the simple mean of the first `period` changes, then
    /// `avg = (prev_avg * (period-1) + value) / period`.
    fn wilder_averages(changes: &[f64], period: usize) -> Option<(f64, f64)> {
        if changes.len() < period {
            return None;
        }
        let period_f64 = period as f64;
        let gain = |c: &f64| c.max(0.0);
        let loss = |c: &f64| (-c).max(0.0);

        let mut avg_gain = changes[..period].iter().map(gain).sum::<f64>() / period_f64;
        let mut avg_loss = changes[..period].iter().map(loss).sum::<f64>() / period_f64;

        for change in &changes[period..] {
            avg_gain = (avg_gain * (period_f64 - 1.0) + gain(change)) / period_f64;
            avg_loss = (avg_loss * (period_f64 - 1.0) + loss(change)) / period_f64;
        }

        Some((avg_gain, avg_loss))
    }
}

impl Indicator<Bar> for Rsi {
    fn name(&self) -> &str {
        &self.label
    }

    fn min_history(&self) -> usize {
        self.period + 1 // Need period+1 closes for period changes
    }

    fn lookback(&self) -> usize {
        self.period * 2 + 1
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        if self.validate_window(&window).is_err() {
            return IndicatorValue::NotAvailable;
        }

        let closes = window.suffix(self.lookback()).closes();
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        let Some((avg_gain, avg_loss)) = Self::wilder_averages(&changes, self.period) else {
            return IndicatorValue::NotAvailable;
        };

        let rsi = if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        IndicatorValue::scalar(rsi)
    }
}
