//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::{Bar, Feed, IndicatorValue, Tick, Window};

/// Uniform calculation contract for one technical indicator.
///
/// `T` is the observation type the indicator is driven by: [`Bar`] for
/// bar-driven indicators, [`Tick`] for tick-driven ones. Readiness is
/// separate from calculation so the caller can gate every indicator the
/// same way during warm-up.
pub trait Indicator<T>: Send + Sync {
    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Minimum number of observations before the first calculation.
    fn min_history(&self) -> usize;

    /// Preferred window length. Never smaller than [`Indicator::min_history`].
    ///
    /// Indicators with smoothing or ratcheting state ask for more history
    /// than they strictly need so the value settles.
    fn lookback(&self) -> usize {
        self.min_history()
    }

    /// Check if `history_len` observations are enough to calculate.
    fn is_ready(&self, history_len: usize) -> bool {
        history_len >= self.min_history()
    }

    /// Calculate the latest value from the newest observations.
    ///
    /// `window` holds between `min_history()` and `lookback()` observations,
    /// oldest first. Insufficient data and numerically undefined results
    /// yield [`IndicatorValue::NotAvailable`]; this never fails.
    fn calculate(&mut self, window: Window<'_, T>) -> IndicatorValue;

    /// Drop any state carried between calculations.
    fn reset(&mut self) {}

    /// Validate that the window is long enough.
    fn validate_window(&self, window: &Window<'_, T>) -> Result<(), IndicatorError> {
        if window.len() < self.min_history() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_history(),
                available: window.len(),
            });
        }
        Ok(())
    }
}

/// An indicator of either variant, as stored by the manager.
pub enum DynIndicator {
    Bar(Box<dyn Indicator<Bar>>),
    Tick(Box<dyn Indicator<Tick>>),
}

impl DynIndicator {
    /// Box a bar-driven indicator.
    pub fn bar(indicator: impl Indicator<Bar> + 'static) -> Self {
        DynIndicator::Bar(Box::new(indicator))
    }

    /// Box a tick-driven indicator.
    pub fn tick(indicator: impl Indicator<Tick> + 'static) -> Self {
        DynIndicator::Tick(Box::new(indicator))
    }

    /// Stream driving this indicator.
    pub fn feed(&self) -> Feed {
        match self {
            DynIndicator::Bar(_) => Feed::Bar,
            DynIndicator::Tick(_) => Feed::Tick,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DynIndicator::Bar(i) => i.name(),
            DynIndicator::Tick(i) => i.name(),
        }
    }

    pub fn min_history(&self) -> usize {
        match self {
            DynIndicator::Bar(i) => i.min_history(),
            DynIndicator::Tick(i) => i.min_history(),
        }
    }

    /// Window length the manager slices for this indicator.
    pub fn window_len(&self) -> usize {
        let lookback = match self {
            DynIndicator::Bar(i) => i.lookback(),
            DynIndicator::Tick(i) => i.lookback(),
        };
        lookback.max(self.min_history())
    }

    pub fn reset(&mut self) {
        match self {
            DynIndicator::Bar(i) => i.reset(),
            DynIndicator::Tick(i) => i.reset(),
        }
    }
}

impl std::fmt::Debug for DynIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynIndicator")
            .field("name", &self.name())
            .field("feed", &self.feed())
            .field("min_history", &self.min_history())
            .finish()
    }
}
