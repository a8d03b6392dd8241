//! Manager configuration: which indicators to build and how history is kept.

use barstream_core::error::EngineError;
use barstream_core::types::{Feed, Timeframe};
use barstream_indicators::{PriceSource, SessionReset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Everything the manager needs at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// History retention and ordering
    pub history: HistorySettings,
    /// Aggregate ticks into bars of this timeframe
    pub aggregation: Option<Timeframe>,
    /// Indicators keyed by the name they are published under
    pub indicators: BTreeMap<String, IndicatorSpec>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        let mut indicators = BTreeMap::new();
        indicators.insert("supertrend".to_string(), IndicatorSpec::new(IndicatorKind::Supertrend));
        indicators.insert("vwap".to_string(), IndicatorSpec::new(IndicatorKind::Vwap));
        indicators.insert("ema_fast".to_string(), IndicatorSpec::new(IndicatorKind::Ema));
        indicators.insert(
            "ema_slow".to_string(),
            IndicatorSpec::new(IndicatorKind::Ema).with_period(21),
        );
        indicators.insert("rsi".to_string(), IndicatorSpec::new(IndicatorKind::Rsi));
        indicators.insert("htf_trend".to_string(), IndicatorSpec::new(IndicatorKind::HtfTrend));
        indicators.insert("atr".to_string(), IndicatorSpec::new(IndicatorKind::Atr));

        Self {
            history: HistorySettings::default(),
            aggregation: None,
            indicators,
        }
    }
}

impl ManagerConfig {
    /// Configuration with no indicators.
    pub fn empty() -> Self {
        Self {
            indicators: BTreeMap::new(),
            ..Self::default()
        }
    }
}

/// History retention and feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Observations kept beyond the longest indicator window
    pub retention_slack: usize,
    /// What to do with an observation older than the previous one
    pub ordering: OrderingPolicy,
}

impl HistorySettings {
    /// Largest accepted `retention_slack`.
    pub const MAX_RETENTION_SLACK: usize = 1_000_000;

    /// Reject a slack that would let a history grow without practical bound.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.retention_slack > Self::MAX_RETENTION_SLACK {
            return Err(EngineError::InvalidParameter {
                name: "history.retention_slack".to_string(),
                reason: format!(
                    "must be at most {}, got {}",
                    Self::MAX_RETENTION_SLACK,
                    self.retention_slack
                ),
            });
        }
        Ok(())
    }
}

/// Handling of observations whose timestamp goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Append anyway and log a warning
    #[default]
    Accept,
    /// Drop the observation and return `FeedOrderingViolation`
    Reject,
}

/// Supported indicator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    /// EMA used as a higher-timeframe trend filter
    HtfTrend,
    Rsi,
    Atr,
    Bollinger,
    Supertrend,
    Vwap,
}

impl IndicatorKind {
    pub fn all() -> &'static [IndicatorKind] {
        &[
            IndicatorKind::Sma,
            IndicatorKind::Ema,
            IndicatorKind::HtfTrend,
            IndicatorKind::Rsi,
            IndicatorKind::Atr,
            IndicatorKind::Bollinger,
            IndicatorKind::Supertrend,
            IndicatorKind::Vwap,
        ]
    }

    /// Config key of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::HtfTrend => "htf_trend",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Atr => "atr",
            IndicatorKind::Bollinger => "bollinger",
            IndicatorKind::Supertrend => "supertrend",
            IndicatorKind::Vwap => "vwap",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "Simple moving average of closes",
            IndicatorKind::Ema => "Exponential moving average of closes",
            IndicatorKind::HtfTrend => "Slow EMA used as a higher-timeframe trend filter",
            IndicatorKind::Rsi => "Relative strength index with Wilder smoothing",
            IndicatorKind::Atr => "Average true range",
            IndicatorKind::Bollinger => "Bollinger Bands (population standard deviation)",
            IndicatorKind::Supertrend => "ATR band trend line with direction",
            IndicatorKind::Vwap => "Session volume weighted average price",
        }
    }

    /// Parameter names the kind accepts.
    pub fn recognised_params(&self) -> &'static [&'static str] {
        match self {
            IndicatorKind::Sma
            | IndicatorKind::Ema
            | IndicatorKind::HtfTrend
            | IndicatorKind::Rsi
            | IndicatorKind::Atr => &["period"],
            IndicatorKind::Bollinger => &["period", "std_dev"],
            IndicatorKind::Supertrend => &["period", "multiplier"],
            IndicatorKind::Vwap => &["feed", "price_source", "session", "session_offset_minutes"],
        }
    }

    /// Period used when none is configured.
    pub fn default_period(&self) -> Option<usize> {
        match self {
            IndicatorKind::Sma => Some(20),
            IndicatorKind::Ema => Some(9),
            IndicatorKind::HtfTrend => Some(20),
            IndicatorKind::Rsi => Some(14),
            IndicatorKind::Atr => Some(10),
            IndicatorKind::Bollinger => Some(20),
            IndicatorKind::Supertrend => Some(10),
            IndicatorKind::Vwap => None,
        }
    }

    /// Band or ATR multiplier used when none is configured.
    pub fn default_multiplier(&self) -> Option<f64> {
        match self {
            IndicatorKind::Bollinger => Some(2.0),
            IndicatorKind::Supertrend => Some(3.0),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub params: IndicatorParams,
}

fn default_enabled() -> bool {
    true
}

impl IndicatorSpec {
    /// Enabled indicator of `kind` with default parameters.
    pub fn new(kind: IndicatorKind) -> Self {
        Self {
            kind,
            enabled: true,
            params: IndicatorParams::default(),
        }
    }

    pub fn with_period(mut self, period: i64) -> Self {
        self.params.period = Some(period);
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.params.multiplier = Some(multiplier);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Indicator parameters. Which ones apply depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_source: Option<PriceSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionReset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_offset_minutes: Option<i32>,
}

impl IndicatorParams {
    /// Names of the parameters that are set.
    pub fn provided(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.period.is_some() {
            names.push("period");
        }
        if self.multiplier.is_some() {
            names.push("multiplier");
        }
        if self.std_dev.is_some() {
            names.push("std_dev");
        }
        if self.feed.is_some() {
            names.push("feed");
        }
        if self.price_source.is_some() {
            names.push("price_source");
        }
        if self.session.is_some() {
            names.push("session");
        }
        if self.session_offset_minutes.is_some() {
            names.push("session_offset_minutes");
        }
        names
    }
}
