//! Technical indicators over windowed bar and tick history.
//!
//! This crate provides implementations of the indicators the engine can host:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI)
//! - Volatility indicators (ATR, Bollinger Bands)
//! - Trend indicators (Supertrend)
//! - Volume indicators (session VWAP, bar- or tick-fed)
//!
//! Every indicator implements [`barstream_core::Indicator`] and computes its
//! latest value from the window the caller hands it.

pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::Rsi;
pub use moving_average::{Ema, Sma};
pub use trend::Supertrend;
pub use volatility::{Atr, BollingerBands};
pub use volume::{PriceSource, SessionReset, Vwap};

use barstream_core::error::IndicatorError;

/// Largest accepted period. Lookbacks of up to `3 * period + 1` must fit in `usize`.
pub const MAX_PERIOD: usize = 1_000_000;

/// Reject a zero or oversized period.
pub(crate) fn require_period(period: usize, what: &str) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be greater than 0",
            what
        )));
    }
    if period > MAX_PERIOD {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be at most {}, got {}",
            what, MAX_PERIOD, period
        )));
    }
    Ok(period)
}


/// Reject non-positive or non-finite multipliers.
pub(crate) fn require_positive(value: f64, what: &str) -> Result<f64, IndicatorError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} must be a positive number, got {}",
            what, value
        )));
    }
    Ok(value)
}
