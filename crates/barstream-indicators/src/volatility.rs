//! Volatility indicators.

use barstream_core::error::IndicatorError;
use barstream_core::traits::Indicator;
use barstream_core::types::{Bar, IndicatorValue, Window};

use crate::{require_period, require_positive};

/// Average True Range (ATR).
///
/// Simple mean of the last `period` true ranges.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    label: String,
}

impl Atr {
    /// Create a new ATR indicator.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period(period, "ATR")?;
        Ok(Self {
            period,
            label: format!("ATR_{}", period),
        })
    }

    /// Rolling-mean ATR ending at the newest bar of `window`.
    pub(crate) fn mean_true_range(window: &Window<'_, Bar>, period: usize) -> Option<f64> {
        let tr = window.suffix(period + 1).true_ranges();
        (tr.len() == period).then(|| tr.iter().sum::<f64>() / period as f64)
    }
}

impl Indicator<Bar> for Atr {
    fn name(&self) -> &str {
        &self.label
    }

    fn min_history(&self) -> usize {
        self.period + 1
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        match Self::mean_true_range(&window, self.period) {
            Some(atr) => IndicatorValue::scalar(atr),
            None => IndicatorValue::NotAvailable,
        }
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of population standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
    label: String,
}

impl BollingerBands {
    /// Create Bollinger Bands with custom parameters.
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self, IndicatorError> {
        let period = require_period(period, "Bollinger")?;
        let std_dev_multiplier = require_positive(std_dev_multiplier, "std_dev")?;
        Ok(Self {
            period,
            std_dev_multiplier,
            label: format!("BB_{}_{}", period, std_dev_multiplier),
        })
    }
}

impl Indicator<Bar> for BollingerBands {
    fn name(&self) -> &str {
        &self.label
    }

    fn min_history(&self) -> usize {
        self.period
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        if self.validate_window(&window).is_err() {
            return IndicatorValue::NotAvailable;
        }

        let closes = window.suffix(self.period).closes();
        let period_f64 = self.period as f64;
        let mean: f64 = closes.iter().sum::<f64>() / period_f64;

        // A flat window has zero variance; the bands collapse onto the mean
        let flat = closes.iter().all(|c| *c == closes[0]);
        let std_dev = if flat {
            0.0
        } else {
            let variance: f64 =
                closes.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            variance.max(0.0).sqrt()
        };

        let width = self.std_dev_multiplier * std_dev;
        IndicatorValue::bands(mean + width, mean, mean - width)
    }
}
