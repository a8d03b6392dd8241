//! Aggregated latest-value map handed to strategies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{IndicatorValue, Reading};

/// Latest reading of every registered indicator.
///
/// Maintained incrementally by the manager; strategies only ever see it
/// between update cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of observations processed so far
    pub sequence: u64,
    /// Timestamp of the last processed observation
    pub timestamp: Option<i64>,
    readings: BTreeMap<String, Reading>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reading for `name`, if registered.
    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.readings.get(name)
    }

    /// Value for `name`; unregistered names read as `NotAvailable`.
    pub fn value(&self, name: &str) -> IndicatorValue {
        self.readings
            .get(name)
            .map(|r| r.value)
            .unwrap_or(IndicatorValue::NotAvailable)
    }

    /// Scalar value for `name`, if present.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.value(name).as_scalar()
    }

    /// Check if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.readings.contains_key(name)
    }

    /// Iterate readings ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Reading)> {
        self.readings.iter()
    }

    /// Number of registered indicators.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Insert or replace the reading for `name`.
    pub fn set(&mut self, name: impl Into<String>, reading: Reading) {
        self.readings.insert(name.into(), reading);
    }

    /// Mutable access to an existing reading.
    pub fn reading_mut(&mut self, name: &str) -> Option<&mut Reading> {
        self.readings.get_mut(name)
    }

    /// Remove the reading for `name`.
    pub fn remove(&mut self, name: &str) -> Option<Reading> {
        self.readings.remove(name)
    }

    /// Record which observation the snapshot now reflects.
    pub fn advance(&mut self, timestamp: i64) {
        self.sequence += 1;
        self.timestamp = Some(timestamp);
    }
}
