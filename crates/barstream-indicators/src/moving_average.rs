//! Moving average indicators.

use barstream_core::error::IndicatorError;
use barstream_core::traits::Indicator;
use barstream_core::types::{Bar, IndicatorValue, Window};

use crate::require_period;

/// Simple Moving Average (SMA) of closes.
///
/// Calculates the arithmetic mean of the last N closes.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    label: String,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period(period, "SMA")?;
        Ok(Self {
            period,
            label: format!("SMA_{}", period),
        })
    }
}

impl Indicator<Bar> for Sma {
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
        let sum: f64 = window.suffix(self.period).iter().map(|b| b.close).sum();
        IndicatorValue::scalar(sum / self.period as f64)
    }
}

/// Exponential Moving Average (EMA) of closes.
///
/// Gives more weight to recent prices using an exponential decay. The
/// recursion is seeded with the oldest close in the window and runs over
/// up to twice the period, so early values converge quickly without
/// retaining unbounded history.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    label: String,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::labelled(period, format!("EMA_{}", period))
    }

    /// EMA used as a higher-timeframe trend filter.
    pub fn htf_trend(period: usize) -> Result<Self, IndicatorError> {
        Self::labelled(period, format!("HTF_Trend_{}", period))
    }

    fn labelled(period: usize, label: String) -> Result<Self, IndicatorError> {
        let period = require_period(period, "EMA")?;
        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            label,
        })
    }

    /// Run the EMA recursion over `closes`, seeded with the first value.
    pub fn smooth(closes: impl IntoIterator<Item = f64>, multiplier: f64) -> Option<f64> {
        let mut iter = closes.into_iter();
        let mut ema = iter.next()?;
        let one_minus_mult = 1.0 - multiplier;
        for price in iter {
            ema = price * multiplier + ema * one_minus_mult;
        }
        Some(ema)
    }
}

impl Indicator<Bar> for Ema {
    fn name(&self) -> &str {
        &self.label
    }

    fn min_history(&self) -> usize {
        self.period
    }

    fn lookback(&self) -> usize {
        self.period * 2
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        if self.validate_window(&window).is_err() {
            return IndicatorValue::NotAvailable;
        }
        let closes = window.suffix(self.lookback()).iter().map(|b| b.close);
        match Self::smooth(closes, self.multiplier) {
            Some(ema) => IndicatorValue::scalar(ema),
            None => IndicatorValue::NotAvailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 60_000, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_sma() {
        let mut sma = Sma::new(3).unwrap();
        let data = bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let value = sma.calculate(Window::from_slice(&data));
        assert!((value.as_scalar().unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let mut sma = Sma::new(5).unwrap();
        let data = bars(&[1.0, 2.0, 3.0]);

        assert_eq!(
            sma.calculate(Window::from_slice(&data)),
            IndicatorValue::NotAvailable
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            Sma::new(0),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(Ema::new(0).is_err());
    }

    #[test]
    fn test_ema() {
        let mut ema = Ema::new(3).unwrap();
        let data = bars(&[1.0, 2.0, 3.0, 4.0]);

        // mult = 2/(3+1) = 0.5, seeded with 1.0:
        // 2*0.5 + 1*0.5 = 1.5; 3*0.5 + 1.5*0.5 = 2.25; 4*0.5 + 2.25*0.5 = 3.125
        let value = ema.calculate(Window::from_slice(&data));
        assert!((value.as_scalar().unwrap() - 3.125).abs() < 1e-10);
    }

    #[test]
    fn test_ema_uses_at_most_twice_the_period() {
        let mut ema = Ema::new(2).unwrap();
        let long = bars(&[50.0, 60.0, 1.0, 2.0, 3.0, 4.0]);
        let short = bars(&[1.0, 2.0, 3.0, 4.0]);

        let a = ema.calculate(Window::from_slice(&long));
        let b = ema.calculate(Window::from_slice(&short));
        assert_eq!(a, b);
        assert_eq!(ema.lookback(), 4);
    }

    #[test]
    fn test_ema_labels() {
        assert_eq!(Ema::new(9).unwrap().name(), "EMA_9");
        assert_eq!(Ema::htf_trend(20).unwrap().name(), "HTF_Trend_20");
    }

    #[test]
    fn test_constant_series_ema_is_constant() {
        let mut ema = Ema::new(5).unwrap();
        let data = bars(&[7.0; 10]);

        let value = ema.calculate(Window::from_slice(&data));
        assert!((value.as_scalar().unwrap() - 7.0).abs() < 1e-10);
    }
}
