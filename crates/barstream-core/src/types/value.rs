//! Indicator output values and per-indicator readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper/middle/lower output of a band indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Trend direction flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Trend line plus direction, as produced by Supertrend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendValue {
    pub line: f64,
    pub direction: Direction,
}

/// Latest output of one indicator.
///
/// `NotAvailable` is an explicit state, never a numeric placeholder: warm-up,
/// disabled-before-first-run and numerically undefined results all map here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IndicatorValue {
    #[default]
    NotAvailable,
    Scalar(f64),
    Bands(BandValue),
    Trend(TrendValue),
}

impl IndicatorValue {
    /// Scalar value, or `NotAvailable` if `value` is NaN or infinite.
    pub fn scalar(value: f64) -> Self {
        if value.is_finite() {
            IndicatorValue::Scalar(value)
        } else {
            IndicatorValue::NotAvailable
        }
    }

    /// Band value, or `NotAvailable` if any band is not finite.
    pub fn bands(upper: f64, middle: f64, lower: f64) -> Self {
        if upper.is_finite() && middle.is_finite() && lower.is_finite() {
            IndicatorValue::Bands(BandValue {
                upper,
                middle,
                lower,
            })
        } else {
            IndicatorValue::NotAvailable
        }
    }

    /// Trend value, or `NotAvailable` if the line is not finite.
    pub fn trend(line: f64, direction: Direction) -> Self {
        if line.is_finite() {
            IndicatorValue::Trend(TrendValue { line, direction })
        } else {
            IndicatorValue::NotAvailable
        }
    }

    /// Check if a concrete value is present.
    pub fn is_available(&self) -> bool {
        !matches!(self, IndicatorValue::NotAvailable)
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            IndicatorValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bands(&self) -> Option<BandValue> {
        match self {
            IndicatorValue::Bands(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_trend(&self) -> Option<TrendValue> {
        match self {
            IndicatorValue::Trend(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::NotAvailable => write!(f, "n/a"),
            IndicatorValue::Scalar(v) => write!(f, "{:.4}", v),
            IndicatorValue::Bands(b) => write!(
                f,
                "upper={:.4} middle={:.4} lower={:.4}",
                b.upper, b.middle, b.lower
            ),
            IndicatorValue::Trend(t) => write!(f, "{:.4} ({:?})", t.line, t.direction),
        }
    }
}

/// Which observation stream drives an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    #[default]
    Bar,
    Tick,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Bar => write!(f, "bar"),
            Feed::Tick => write!(f, "tick"),
        }
    }
}

/// Cached value of one registered indicator as published in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Last computed value (`NotAvailable` until the first successful run)
    pub value: IndicatorValue,
    /// Timestamp of the observation the value was computed from
    pub updated_at: Option<i64>,
    /// Whether the indicator is currently being recomputed
    pub enabled: bool,
    /// Stream driving the indicator
    pub feed: Feed,
}

impl Reading {
    /// Reading for a freshly registered indicator.
    pub fn pending(feed: Feed, enabled: bool) -> Self {
        Self {
            value: IndicatorValue::NotAvailable,
            updated_at: None,
            enabled,
            feed,
        }
    }

    /// Value is present and still being maintained.
    pub fn is_fresh(&self) -> bool {
        self.enabled && self.value.is_available()
    }

    /// Value is frozen because the indicator is disabled.
    pub fn is_stale(&self) -> bool {
        !self.enabled
    }
}
