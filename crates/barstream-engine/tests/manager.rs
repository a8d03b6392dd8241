//! Update-cycle behaviour of the indicator manager through its public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use barstream_core::error::EngineError;
use barstream_core::traits::{DynIndicator, Indicator};
use barstream_core::types::{Bar, Direction, Feed, IndicatorValue, Tick, Window};
use barstream_engine::{
    HistorySettings, IndicatorKind, IndicatorManager, IndicatorSpec, ManagerConfig,
    OrderingPolicy,
};
use barstream_indicators::{BollingerBands, Rsi, Sma, Supertrend, Vwap};

fn bar(ts: i64, close: f64) -> Bar {
    Bar::new(ts * 60_000, close, close + 1.0, close - 1.0, close, 100.0)
}

/// Sums the closes of its window and records every window length it sees.
struct Recorder {
    min: usize,
    calls: Arc<AtomicUsize>,
    lengths: Arc<Mutex<Vec<usize>>>,
}

impl Recorder {
    fn new(min: usize) -> (Self, Arc<AtomicUsize>, Arc<Mutex<Vec<usize>>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let lengths = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                min,
                calls: calls.clone(),
                lengths: lengths.clone(),
            },
            calls,
            lengths,
        )
    }
}

impl Indicator<Bar> for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn min_history(&self) -> usize {
        self.min
    }

    fn calculate(&mut self, window: Window<'_, Bar>) -> IndicatorValue {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lengths.lock().unwrap().push(window.len());
        IndicatorValue::scalar(window.iter().map(|b| b.close).sum())
    }
}

#[test]
fn test_end_to_end_warmup_then_disable() {
    let mut manager = IndicatorManager::new();
    let (recorder, calls, _) = Recorder::new(3);
    manager
        .register("recorder", DynIndicator::bar(recorder), true)
        .unwrap();

    manager.on_new_observation(bar(1, 1.0)).unwrap();
    manager.on_new_observation(bar(2, 2.0)).unwrap();
    assert_eq!(
        manager.get_latest_bar_data().value("recorder"),
        IndicatorValue::NotAvailable
    );
    // Never invoked before it is ready
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    manager.on_new_observation(bar(3, 3.0)).unwrap();
    let computed = manager.get_latest_bar_data().value("recorder");
    assert_eq!(computed.as_scalar(), Some(6.0));

    manager.disable_indicator("recorder").unwrap();
    manager.on_new_observation(bar(4, 4.0)).unwrap();

    let snapshot = manager.get_latest_bar_data();
    assert_eq!(snapshot.value("recorder"), computed);
    let reading = snapshot.get("recorder").unwrap();
    assert!(reading.is_stale());
    assert!(!reading.is_fresh());
    assert_eq!(reading.updated_at, Some(3 * 60_000));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disabled_value_frozen_then_updates_once_on_reenable() {
    let mut manager = IndicatorManager::new();
    let (recorder, calls, _) = Recorder::new(2);
    manager
        .register("recorder", DynIndicator::bar(recorder), true)
        .unwrap();

    for i in 1..=2 {
        manager.on_new_observation(bar(i, i as f64)).unwrap();
    }
    let frozen = manager.get_indicator_value("recorder").unwrap();
    assert_eq!(frozen.as_scalar(), Some(3.0));

    manager.disable_indicator("recorder").unwrap();
    for i in 3..=10 {
        manager.on_new_observation(bar(i, i as f64)).unwrap();
        assert_eq!(manager.get_indicator_value("recorder").unwrap(), frozen);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    manager.enable_indicator("recorder").unwrap();
    manager.on_new_observation(bar(11, 11.0)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    // Uses the then-current window: closes 10 and 11
    assert_eq!(
        manager.get_indicator_value("recorder").unwrap().as_scalar(),
        Some(21.0)
    );
    assert!(manager.get_reading("recorder").unwrap().is_fresh());
}

#[test]
fn test_each_indicator_gets_its_own_window() {
    let mut manager = IndicatorManager::new();
    let (short, _, short_lengths) = Recorder::new(2);
    let (long, _, long_lengths) = Recorder::new(5);
    manager.register("short", DynIndicator::bar(short), true).unwrap();
    manager.register("long", DynIndicator::bar(long), true).unwrap();

    for i in 0..6 {
        manager.on_new_observation(bar(i, 1.0)).unwrap();
    }

    assert!(short_lengths.lock().unwrap().iter().all(|&n| n == 2));
    assert_eq!(*long_lengths.lock().unwrap(), vec![5, 5]);
    assert_eq!(manager.bar_history().len(), 5);
}

#[test]
fn test_duplicate_name_keeps_first_registration() {
    let mut manager = IndicatorManager::new();
    manager
        .register("trend", DynIndicator::bar(Sma::new(1).unwrap()), true)
        .unwrap();

    let result = manager.register("trend", DynIndicator::bar(Sma::new(50).unwrap()), true);
    assert_eq!(result, Err(EngineError::DuplicateName("trend".to_string())));

    manager.on_new_observation(bar(0, 42.0)).unwrap();
    assert_eq!(
        manager.get_indicator_value("trend").unwrap().as_scalar(),
        Some(42.0)
    );
    assert_eq!(manager.describe("trend").unwrap(), ("SMA_1", 1));
}

#[test]
fn test_unknown_indicator_is_deterministic() {
    let mut manager = IndicatorManager::new();
    let expected = Err(EngineError::UnknownIndicator("missing".to_string()));

    assert_eq!(manager.get_indicator_value("missing"), expected);
    manager
        .register("sma", DynIndicator::bar(Sma::new(1).unwrap()), true)
        .unwrap();
    manager.on_new_observation(bar(0, 1.0)).unwrap();
    assert_eq!(manager.get_indicator_value("missing"), expected);

    assert!(manager.enable_indicator("missing").is_err());
    assert!(manager.disable_indicator("missing").is_err());
    assert!(manager.remove_indicator("missing").is_err());
}

#[test]
fn test_rsi_boundary_through_manager() {
    let mut manager = IndicatorManager::new();
    manager
        .register("rsi", DynIndicator::bar(Rsi::new(5).unwrap()), true)
        .unwrap();

    for i in 0..12 {
        manager.on_new_observation(bar(i, 100.0 + i as f64)).unwrap();
    }
    let rsi = manager.get_indicator_value("rsi").unwrap().as_scalar().unwrap();
    assert!((rsi - 100.0).abs() < 1e-10);
}

#[test]
fn test_vwap_equal_volume_bars() {
    let mut manager = IndicatorManager::new();
    manager
        .register("vwap", DynIndicator::bar(Vwap::new()), true)
        .unwrap();

    manager
        .on_new_observation(Bar::new(0, 10.0, 10.0, 10.0, 10.0, 100.0))
        .unwrap();
    manager
        .on_new_observation(Bar::new(60_000, 20.0, 20.0, 20.0, 20.0, 100.0))
        .unwrap();

    assert_eq!(
        manager.get_indicator_value("vwap").unwrap().as_scalar(),
        Some(15.0)
    );
}

#[test]
fn test_bollinger_zero_variance_through_manager() {
    let mut manager = IndicatorManager::new();
    manager
        .register("bb", DynIndicator::bar(BollingerBands::new(20, 2.0).unwrap()), true)
        .unwrap();

    for i in 0..20 {
        manager.on_new_observation(bar(i, 50.0)).unwrap();
    }

    let bands = manager.get_indicator_value("bb").unwrap().as_bands().unwrap();
    assert_eq!(bands.upper, bands.middle);
    assert_eq!(bands.middle, bands.lower);
}

#[test]
fn test_not_available_does_not_stop_other_indicators() {
    let mut manager = IndicatorManager::new();
    // Zero volume leaves VWAP undefined
    manager
        .register("vwap", DynIndicator::bar(Vwap::new()), true)
        .unwrap();
    manager
        .register("sma", DynIndicator::bar(Sma::new(1).unwrap()), true)
        .unwrap();

    manager
        .on_new_observation(Bar::new(0, 7.0, 7.0, 7.0, 7.0, 0.0))
        .unwrap();

    assert_eq!(
        manager.get_indicator_value("vwap").unwrap(),
        IndicatorValue::NotAvailable
    );
    assert_eq!(manager.get_indicator_value("sma").unwrap().as_scalar(), Some(7.0));
}

#[test]
fn test_ordering_reject_leaves_state_untouched() {
    let settings = HistorySettings {
        retention_slack: 0,
        ordering: OrderingPolicy::Reject,
    };
    let mut manager = IndicatorManager::with_settings(settings);
    manager
        .register("sma", DynIndicator::bar(Sma::new(1).unwrap()), true)
        .unwrap();

    manager.on_new_observation(bar(5, 10.0)).unwrap();
    let before = manager.get_latest_bar_data().clone();

    let err = manager.on_new_observation(bar(4, 99.0)).unwrap_err();
    assert_eq!(
        err,
        EngineError::FeedOrderingViolation {
            last: 5 * 60_000,
            received: 4 * 60_000,
        }
    );
    assert_eq!(manager.get_latest_bar_data(), &before);
    assert_eq!(manager.bars_seen(), 1);
}

#[test]
fn test_ordering_accept_appends() {
    let mut manager = IndicatorManager::new();
    manager
        .register("sma", DynIndicator::bar(Sma::new(1).unwrap()), true)
        .unwrap();

    manager.on_new_observation(bar(5, 10.0)).unwrap();
    manager.on_new_observation(bar(4, 99.0)).unwrap();

    assert_eq!(manager.get_indicator_value("sma").unwrap().as_scalar(), Some(99.0));
    assert_eq!(manager.get_latest_bar_data().sequence, 2);
}

#[test]
fn test_tick_and_bar_feeds_are_separate() {
    let mut manager = IndicatorManager::new();
    manager
        .register("vwap", DynIndicator::tick(Vwap::new()), true)
        .unwrap();
    manager
        .register("sma", DynIndicator::bar(Sma::new(2).unwrap()), true)
        .unwrap();

    manager.on_new_observation(Tick::new(1, 10.0, 1.0)).unwrap();
    manager.on_new_observation(Tick::new(2, 20.0, 1.0)).unwrap();

    let snapshot = manager.get_latest_bar_data();
    assert_eq!(snapshot.scalar("vwap"), Some(15.0));
    assert_eq!(snapshot.get("vwap").unwrap().feed, Feed::Tick);
    assert_eq!(snapshot.value("sma"), IndicatorValue::NotAvailable);
    assert_eq!(manager.tick_history().len(), 1);
    assert!(manager.bar_history().is_empty());
}

#[test]
fn test_from_config_default_set() {
    let manager = IndicatorManager::from_config(&ManagerConfig::default()).unwrap();

    assert!(manager.contains("supertrend"));
    assert!(manager.contains("vwap"));
    assert_eq!(manager.enabled_indicators().len(), manager.len());
    // EMA 21 asks for the longest window: 2 * 21 bars
    assert_eq!(manager.bar_history().retention(), 42);
}

#[test]
fn test_from_config_invalid_parameter() {
    let mut config = ManagerConfig::empty();
    config.indicators.insert(
        "bad_rsi".to_string(),
        IndicatorSpec::new(IndicatorKind::Rsi).with_period(0),
    );

    match IndicatorManager::from_config(&config) {
        Err(EngineError::InvalidParameter { name, .. }) => assert_eq!(name, "bad_rsi"),
        other => panic!("expected InvalidParameter, got {:?}", other.map(|m| m.len())),
    }
}

#[test]
fn test_from_config_oversized_period() {
    let mut config = ManagerConfig::empty();
    config.indicators.insert(
        "st".to_string(),
        IndicatorSpec::new(IndicatorKind::Supertrend).with_period(i64::MAX),
    );

    match IndicatorManager::from_config(&config) {
        Err(EngineError::InvalidParameter { name, .. }) => assert_eq!(name, "st"),
        other => panic!("expected InvalidParameter, got {:?}", other.map(|m| m.len())),
    }
}

#[test]
fn test_from_config_oversized_retention_slack() {
    let mut config = ManagerConfig::default();
    config.history.retention_slack = 1 << 40;

    match IndicatorManager::from_config(&config) {
        Err(EngineError::InvalidParameter { name, .. }) => {
            assert_eq!(name, "history.retention_slack")
        }
        other => panic!("expected InvalidParameter, got {:?}", other.map(|m| m.len())),
    }
}

#[test]
fn test_from_config_disabled_indicator() {
    let mut config = ManagerConfig::empty();
    config.indicators.insert(
        "st".to_string(),
        IndicatorSpec::new(IndicatorKind::Supertrend)
            .with_period(3)
            .disabled(),
    );
    let mut manager = IndicatorManager::from_config(&config).unwrap();

    for i in 0..20 {
        manager.on_new_observation(bar(i, 100.0 + i as f64)).unwrap();
    }
    assert_eq!(
        manager.get_indicator_value("st").unwrap(),
        IndicatorValue::NotAvailable
    );

    manager.enable_indicator("st").unwrap();
    manager.on_new_observation(bar(20, 120.0)).unwrap();
    let trend = manager.get_indicator_value("st").unwrap().as_trend().unwrap();
    assert_eq!(trend.direction, Direction::Up);
}

#[test]
fn test_supertrend_registered_directly() {
    let mut manager = IndicatorManager::new();
    manager
        .register(
            "supertrend",
            DynIndicator::bar(Supertrend::new(3, 1.0).unwrap()),
            true,
        )
        .unwrap();

    for (i, c) in [100.0, 101.0, 102.0, 103.0, 104.0, 95.0, 90.0, 85.0]
        .iter()
        .enumerate()
    {
        manager.on_new_observation(bar(i as i64, *c)).unwrap();
    }

    let trend = manager
        .get_indicator_value("supertrend")
        .unwrap()
        .as_trend()
        .unwrap();
    assert_eq!(trend.direction, Direction::Down);
}
