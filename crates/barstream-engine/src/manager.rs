//! The indicator manager: registration, update cycle and snapshot.

use std::collections::BTreeMap;

use barstream_core::error::EngineError;
use barstream_core::traits::{DynIndicator, Indicator};
use barstream_core::types::{
    Bar, Feed, History, IndicatorValue, Observation, Reading, Snapshot, Tick, Timeframe,
    Timestamped,
};
use tracing::{debug, trace, warn};

use crate::aggregator::BarAggregator;
use crate::config::{HistorySettings, ManagerConfig, OrderingPolicy};
use crate::factory::build_indicator;

/// A registered indicator and its runtime state.
#[derive(Debug)]
struct Entry {
    indicator: DynIndicator,
    enabled: bool,
}

/// Owns the registered indicators, the bar and tick histories and the
/// latest-value snapshot.
///
/// Each observation runs one update cycle: append to the matching history,
/// recompute every enabled indicator of that feed that is ready, then
/// publish. The snapshot is updated in place, so reading it is O(1).
/// Retention of each history follows the longest window any registered
/// indicator of that feed needs.
#[derive(Debug)]
pub struct IndicatorManager {
    entries: BTreeMap<String, Entry>,
    bars: History<Bar>,
    ticks: History<Tick>,
    snapshot: Snapshot,
    settings: HistorySettings,
    aggregator: Option<BarAggregator>,
    last_timestamp: Option<i64>,
    bars_seen: usize,
}

impl IndicatorManager {
    /// Create an empty manager with default history settings.
    pub fn new() -> Self {
        Self::with_settings(HistorySettings::default())
    }

    pub fn with_settings(settings: HistorySettings) -> Self {
        Self {
            entries: BTreeMap::new(),
            bars: History::with_retention(settings.retention_slack),
            ticks: History::with_retention(settings.retention_slack),
            snapshot: Snapshot::new(),
            settings,
            aggregator: None,
            last_timestamp: None,
            bars_seen: 0,
        }
    }

    /// Also aggregate incoming ticks into bars of `timeframe`.
    pub fn with_aggregation(mut self, timeframe: Timeframe) -> Self {
        self.aggregator = Some(BarAggregator::new(timeframe));
        self
    }

    /// Build a manager and register every configured indicator.
    ///
    /// Fails on invalid history settings or on the first invalid indicator.
    pub fn from_config(config: &ManagerConfig) -> Result<Self, EngineError> {
        config.history.validate()?;
        let mut manager = Self::with_settings(config.history);
        if let Some(timeframe) = config.aggregation {
            manager = manager.with_aggregation(timeframe);
        }

        for (name, spec) in &config.indicators {
            let indicator = build_indicator(name, spec)?;
            manager.register(name.clone(), indicator, spec.enabled)?;
        }

        debug!(
            "Indicator manager built with {} indicators ({} enabled)",
            manager.len(),
            manager.enabled_indicators().len()
        );
        Ok(manager)
    }

    /// Register `indicator` under `name`.
    ///
    /// Fails with [`EngineError::DuplicateName`] when the name is taken; the
    /// existing registration is left untouched.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        indicator: DynIndicator,
        enabled: bool,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::InvalidParameter {
                name,
                reason: "indicator name must not be empty".to_string(),
            });
        }
        if self.entries.contains_key(&name) {
            return Err(EngineError::DuplicateName(name));
        }

        debug!(
            "Registering indicator '{}' ({}, {} feed, min history {}, enabled {})",
            name,
            indicator.name(),
            indicator.feed(),
            indicator.min_history(),
            enabled
        );

        self.snapshot
            .set(name.clone(), Reading::pending(indicator.feed(), enabled));
        self.entries.insert(name, Entry { indicator, enabled });
        self.refresh_retention();
        Ok(())
    }

    /// Unregister `name` and drop its snapshot entry.
    pub fn remove_indicator(&mut self, name: &str) -> Result<(), EngineError> {
        if self.entries.remove(name).is_none() {
            return Err(EngineError::UnknownIndicator(name.to_string()));
        }
        self.snapshot.remove(name);
        self.refresh_retention();
        debug!("Removed indicator '{}'", name);
        Ok(())
    }

    /// Process one observation from the feed.
    ///
    /// Under [`OrderingPolicy::Reject`] an observation older than the
    /// previous one fails with [`EngineError::FeedOrderingViolation`] and
    /// leaves the manager unchanged.
    pub fn on_new_observation(
        &mut self,
        observation: impl Into<Observation>,
    ) -> Result<(), EngineError> {
        let observation = observation.into();
        let timestamp = observation.timestamp();

        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                match self.settings.ordering {
                    OrderingPolicy::Reject => {
                        return Err(EngineError::FeedOrderingViolation {
                            last,
                            received: timestamp,
                        });
                    }
                    OrderingPolicy::Accept => {
                        warn!(
                            "Out-of-order observation accepted: {} after {}",
                            timestamp, last
                        );
                    }
                }
            }
        }
        self.last_timestamp = Some(timestamp);

        match observation {
            Observation::Bar(bar) => self.apply_bar(bar),
            Observation::Tick(tick) => {
                let closed = self.aggregator.as_mut().and_then(|agg| agg.push(&tick));
                if let Some(bar) = closed {
                    self.apply_bar(bar);
                }
                self.ticks.append(tick);
                self.recompute(Feed::Tick, timestamp);
            }
        }

        self.snapshot.advance(timestamp);
        trace!(
            "Cycle {} at {}: {} bars, {} ticks",
            self.snapshot.sequence,
            timestamp,
            self.bars.len(),
            self.ticks.len()
        );
        Ok(())
    }

    /// Close the bar being aggregated and run the bar indicators on it.
    pub fn flush(&mut self) -> Option<Bar> {
        let bar = self.aggregator.as_mut().and_then(BarAggregator::flush)?;
        self.apply_bar(bar);
        Some(bar)
    }

    fn apply_bar(&mut self, bar: Bar) {
        let timestamp = bar.timestamp;
        self.bars.append(bar);
        self.bars_seen += 1;
        self.recompute(Feed::Bar, timestamp);
    }

    /// Recompute every enabled, ready indicator driven by `feed`.
    fn recompute(&mut self, feed: Feed, timestamp: i64) {
        let Self {
            entries,
            bars,
            ticks,
            snapshot,
            ..
        } = self;

        for (name, entry) in entries.iter_mut() {
            if !entry.enabled || entry.indicator.feed() != feed {
                continue;
            }
            let window_len = entry.indicator.window_len();
            let value = match &mut entry.indicator {
                DynIndicator::Bar(indicator) => evaluate(&mut **indicator, bars, window_len),
                DynIndicator::Tick(indicator) => evaluate(&mut **indicator, ticks, window_len),
            };

            if let (Some(value), Some(reading)) = (value, snapshot.reading_mut(name)) {
                reading.value = value;
                reading.updated_at = Some(timestamp);
            }
        }
    }

    /// Keep each history as long as the longest window of its feed.
    fn refresh_retention(&mut self) {
        let longest = |feed: Feed| {
            self.entries
                .values()
                .filter(|e| e.indicator.feed() == feed)
                .map(|e| e.indicator.window_len())
                .max()
                .unwrap_or(1)
        };
        let slack = self.settings.retention_slack;
        let bar_retention = longest(Feed::Bar).saturating_add(slack);
        let tick_retention = longest(Feed::Tick).saturating_add(slack);

        self.bars.set_retention(bar_retention);
        self.ticks.set_retention(tick_retention);
    }

    /// Latest value of every registered indicator.
    pub fn get_latest_bar_data(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Latest value of `name`.
    pub fn get_indicator_value(&self, name: &str) -> Result<IndicatorValue, EngineError> {
        self.get_reading(name).map(|r| r.value)
    }

    /// Latest reading of `name`, including its freshness.
    pub fn get_reading(&self, name: &str) -> Result<&Reading, EngineError> {
        self.snapshot
            .get(name)
            .ok_or_else(|| EngineError::UnknownIndicator(name.to_string()))
    }

    /// Resume recomputing `name` from the next observation.
    pub fn enable_indicator(&mut self, name: &str) -> Result<(), EngineError> {
        self.set_enabled(name, true)
    }

    /// Stop recomputing `name`. Its last value stays in the snapshot,
    /// marked stale.
    pub fn disable_indicator(&mut self, name: &str) -> Result<(), EngineError> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), EngineError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownIndicator(name.to_string()))?;
        entry.enabled = enabled;
        if let Some(reading) = self.snapshot.reading_mut(name) {
            reading.enabled = enabled;
        }
        debug!(
            "Indicator '{}' {}",
            name,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Check whether `name` is registered and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries.get(name).map(|e| e.enabled).unwrap_or(false)
    }

    /// Names of the enabled indicators, sorted.
    pub fn enabled_indicators(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of all registered indicators, sorted.
    pub fn indicator_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Label and minimum history of `name`.
    pub fn describe(&self, name: &str) -> Result<(&str, usize), EngineError> {
        self.entries
            .get(name)
            .map(|e| (e.indicator.name(), e.indicator.min_history()))
            .ok_or_else(|| EngineError::UnknownIndicator(name.to_string()))
    }

    /// Check if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered indicators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if at least `n` bars have been processed since the last reset.
    pub fn has_enough_history(&self, n: usize) -> bool {
        self.bars_seen >= n
    }

    /// Bars processed since the last reset, including evicted ones.
    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    pub fn bar_history(&self) -> &History<Bar> {
        &self.bars
    }

    pub fn tick_history(&self) -> &History<Tick> {
        &self.ticks
    }

    /// Bar currently being aggregated from ticks.
    pub fn current_bar(&self) -> Option<&Bar> {
        self.aggregator.as_ref().and_then(BarAggregator::current_bar)
    }

    /// Forget all observations and computed values.
    ///
    /// Registrations and enabled flags are kept; every reading goes back to
    /// `NotAvailable`.
    pub fn reset(&mut self) {
        self.bars.clear();
        self.ticks.clear();
        if let Some(agg) = self.aggregator.as_mut() {
            agg.reset();
        }
        self.last_timestamp = None;
        self.bars_seen = 0;

        let mut snapshot = Snapshot::new();
        for (name, entry) in self.entries.iter_mut() {
            entry.indicator.reset();
            snapshot.set(
                name.clone(),
                Reading::pending(entry.indicator.feed(), entry.enabled),
            );
        }
        self.snapshot = snapshot;
        debug!("Indicator manager reset");
    }
}

impl Default for IndicatorManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one indicator against the newest part of `history`.
///
/// Returns `None` when the indicator is not ready, so the cached value is kept.
fn evaluate<T: Timestamped>(
    indicator: &mut dyn Indicator<T>,
    history: &History<T>,
    window_len: usize,
) -> Option<IndicatorValue> {
    if !indicator.is_ready(history.len()) {
        return None;
    }
    let window = history.window(window_len.min(history.len())).ok()?;
    Some(indicator.calculate(window))
}
