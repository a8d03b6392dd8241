//! Confluence Strategy.
//!
//! Goes long when every active filter agrees:
//! - Supertrend direction is up
//! - Price is above VWAP
//! - Fast EMA is above slow EMA
//! - RSI is strictly between oversold and overbought
//! - Price is above the higher-timeframe trend
//!
//! Exits when the Supertrend flips down while long.

use std::collections::BTreeMap;

use barstream_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{Direction, IndicatorValue, Observation, Signal, SignalType, Snapshot, Timestamped},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot names the strategy reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorNames {
    pub supertrend: String,
    pub vwap: String,
    pub ema_fast: String,
    pub ema_slow: String,
    pub rsi: String,
    pub htf_trend: String,
}

impl Default for IndicatorNames {
    fn default() -> Self {
        Self {
            supertrend: "supertrend".to_string(),
            vwap: "vwap".to_string(),
            ema_fast: "ema_fast".to_string(),
            ema_slow: "ema_slow".to_string(),
            rsi: "rsi".to_string(),
            htf_trend: "htf_trend".to_string(),
        }
    }
}

/// Configuration for the confluence strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    pub use_supertrend: bool,
    pub use_vwap: bool,
    pub use_ema_crossover: bool,
    pub use_rsi_filter: bool,
    pub use_htf_filter: bool,
    /// Entries are blocked at or above this RSI
    pub rsi_overbought: f64,
    /// Entries are blocked at or below this RSI
    pub rsi_oversold: f64,
    /// Bars required before any signal
    pub warmup_bars: usize,
    pub indicators: IndicatorNames,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            use_supertrend: true,
            use_vwap: true,
            use_ema_crossover: true,
            use_rsi_filter: true,
            use_htf_filter: true,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            // max(ATR 10, RSI 14, slow EMA 21, 20)
            warmup_bars: 21,
            indicators: IndicatorNames::default(),
        }
    }
}

impl StrategyConfig for ConfluenceConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.rsi_overbought <= self.rsi_oversold {
            return Err(StrategyError::InvalidConfig(
                "RSI overbought must be greater than oversold".into(),
            ));
        }
        if self.rsi_overbought > 100.0 || self.rsi_oversold < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one entry filter.
enum Check {
    /// Filter switched off, or its indicator is unregistered or disabled
    Skipped,
    Passed(f64),
    Failed(&'static str),
}

/// Confluence Strategy.
#[derive(Debug)]
pub struct ConfluenceStrategy {
    config: ConfluenceConfig,
    in_position: bool,
    signals_generated: usize,
}

impl ConfluenceStrategy {
    /// Create a new confluence strategy.
    pub fn new(config: ConfluenceConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config,
            in_position: false,
            signals_generated: 0,
        })
    }

    pub fn config(&self) -> &ConfluenceConfig {
        &self.config
    }

    /// Check if the strategy currently holds a long position.
    pub fn in_position(&self) -> bool {
        self.in_position
    }

    pub fn signals_generated(&self) -> usize {
        self.signals_generated
    }

    /// Value of `name` when it is registered and enabled in the manager.
    fn active(snapshot: &Snapshot, name: &str) -> Option<IndicatorValue> {
        snapshot.get(name).filter(|r| r.enabled).map(|r| r.value)
    }

    fn check_supertrend(&self, snapshot: &Snapshot) -> Check {
        if !self.config.use_supertrend {
            return Check::Skipped;
        }
        match Self::active(snapshot, &self.config.indicators.supertrend) {
            None => Check::Skipped,
            Some(value) => match value.as_trend() {
                Some(t) if t.direction == Direction::Up => Check::Passed(t.line),
                Some(_) => Check::Failed("supertrend down"),
                None => Check::Failed("supertrend not available"),
            },
        }
    }

    fn check_vwap(&self, snapshot: &Snapshot, price: f64) -> Check {
        if !self.config.use_vwap {
            return Check::Skipped;
        }
        match Self::active(snapshot, &self.config.indicators.vwap) {
            None => Check::Skipped,
            Some(value) => match value.as_scalar() {
                Some(vwap) if price > vwap => Check::Passed(vwap),
                Some(_) => Check::Failed("price at or below VWAP"),
                None => Check::Failed("VWAP not available"),
            },
        }
    }

    fn check_ema(&self, snapshot: &Snapshot) -> Check {
        if !self.config.use_ema_crossover {
            return Check::Skipped;
        }
        let names = &self.config.indicators;
        match (
            Self::active(snapshot, &names.ema_fast),
            Self::active(snapshot, &names.ema_slow),
        ) {
            (Some(fast), Some(slow)) => match (fast.as_scalar(), slow.as_scalar()) {
                (Some(f), Some(s)) if f > s => Check::Passed(f - s),
                (Some(_), Some(_)) => Check::Failed("fast EMA at or below slow EMA"),
                _ => Check::Failed("EMA not available"),
            },
            _ => Check::Skipped,
        }
    }

    fn check_rsi(&self, snapshot: &Snapshot) -> Check {
        if !self.config.use_rsi_filter {
            return Check::Skipped;
        }
        match Self::active(snapshot, &self.config.indicators.rsi) {
            None => Check::Skipped,
            Some(value) => match value.as_scalar() {
                Some(rsi) if self.config.rsi_oversold < rsi && rsi < self.config.rsi_overbought => {
                    Check::Passed(rsi)
                }
                Some(_) => Check::Failed("RSI outside entry band"),
                None => Check::Failed("RSI not available"),
            },
        }
    }

    fn check_htf(&self, snapshot: &Snapshot, price: f64) -> Check {
        if !self.config.use_htf_filter {
            return Check::Skipped;
        }
        match Self::active(snapshot, &self.config.indicators.htf_trend) {
            None => Check::Skipped,
            Some(value) => match value.as_scalar() {
                Some(trend) if price > trend => Check::Passed(trend),
                Some(_) => Check::Failed("price at or below HTF trend"),
                None => Check::Failed("HTF trend not available"),
            },
        }
    }

    fn create_signal(
        &mut self,
        signal_type: SignalType,
        observation: &Observation,
        reason: &str,
        indicators: BTreeMap<String, f64>,
    ) -> Signal {
        self.signals_generated += 1;
        Signal {
            signal_type,
            price: observation.price(),
            timestamp: observation.timestamp(),
            strategy_name: self.name().to_string(),
            reason: reason.to_string(),
            indicators,
        }
    }
}

impl Strategy for ConfluenceStrategy {
    fn name(&self) -> &str {
        "Confluence"
    }

    fn on_snapshot(
        &mut self,
        snapshot: &Snapshot,
        observation: &Observation,
        bars_available: usize,
    ) -> Option<Signal> {
        if !self.is_warmed_up(bars_available) {
            return None;
        }
        let price = observation.price();

        if self.in_position {
            let flipped = Self::active(snapshot, &self.config.indicators.supertrend)
                .and_then(|v| v.as_trend())
                .map(|t| t.direction == Direction::Down)
                .unwrap_or(false);
            if flipped {
                self.in_position = false;
                return Some(self.create_signal(
                    SignalType::CloseLong,
                    observation,
                    "Supertrend flipped down",
                    BTreeMap::new(),
                ));
            }
            return None;
        }

        let names = self.config.indicators.clone();
        let checks = [
            (names.supertrend, self.check_supertrend(snapshot)),
            (names.vwap, self.check_vwap(snapshot, price)),
            ("ema_spread".to_string(), self.check_ema(snapshot)),
            (names.rsi, self.check_rsi(snapshot)),
            (names.htf_trend, self.check_htf(snapshot, price)),
        ];

        let mut indicators = BTreeMap::new();
        for (name, check) in checks {
            match check {
                Check::Skipped => {}
                Check::Passed(value) => {
                    indicators.insert(name, value);
                }
                Check::Failed(reason) => {
                    debug!("Entry blocked at {}: {}", observation.timestamp(), reason);
                    return None;
                }
            }
        }

        self.in_position = true;
        Some(self.create_signal(
            SignalType::Buy,
            observation,
            "All entry filters agree",
            indicators,
        ))
    }

    fn reset(&mut self) {
        self.in_position = false;
        self.signals_generated = 0;
    }

    fn warmup_period(&self) -> usize {
        self.config.warmup_bars
    }
}
