//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{Observation, Signal, Snapshot};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Consumer of the indicator snapshot.
///
/// Strategies never see how an indicator is computed; they read the
/// latest snapshot after each processed observation and may emit a signal.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// React to the snapshot produced for `observation`.
    ///
    /// `bars_available` is the number of bars processed so far.
    fn on_snapshot(
        &mut self,
        snapshot: &Snapshot,
        observation: &Observation,
        bars_available: usize,
    ) -> Option<Signal>;

    /// Reset the strategy state.
    fn reset(&mut self);

    /// Number of completed bars needed before signals are generated.
    fn warmup_period(&self) -> usize;

    /// Check if the strategy is warmed up (has enough data).
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }
}
