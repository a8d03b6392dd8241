//! Trading signals emitted by strategies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of action a strategy requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    /// Open a long position
    Buy,
    /// Close an open long position
    CloseLong,
}

/// A strategy decision derived from an indicator snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,
    /// Price of the observation that triggered the signal
    pub price: f64,
    /// Timestamp of the observation that triggered the signal
    pub timestamp: i64,
    pub strategy_name: String,
    pub reason: String,
    /// Indicator values the decision was based on
    pub indicators: BTreeMap<String, f64>,
}
