//! Building boxed indicators from configuration.

use barstream_core::error::{EngineError, IndicatorError};
use barstream_core::traits::DynIndicator;
use barstream_core::types::Feed;
use barstream_indicators::{
    Atr, BollingerBands, Ema, Rsi, Sma, Supertrend, Vwap, MAX_PERIOD,
};
use serde::{Deserialize, Serialize};

use crate::config::{IndicatorKind, IndicatorSpec};

/// Largest accepted VWAP session offset, in minutes.
const MAX_SESSION_OFFSET_MINUTES: i32 = 24 * 60;

/// Information about a supported indicator kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorInfo {
    pub kind: IndicatorKind,
    pub description: String,
    pub params: Vec<String>,
    pub default_period: Option<usize>,
    pub default_multiplier: Option<f64>,
}

/// Every supported indicator kind with its defaults.
pub fn catalogue() -> Vec<IndicatorInfo> {
    IndicatorKind::all()
        .iter()
        .map(|kind| IndicatorInfo {
            kind: *kind,
            description: kind.description().to_string(),
            params: kind.recognised_params().iter().map(|p| p.to_string()).collect(),
            default_period: kind.default_period(),
            default_multiplier: kind.default_multiplier(),
        })
        .collect()
}

/// Create the indicator described by `spec`, registered as `name`.
///
/// Every parameter is validated here so configuration errors surface at
/// registration rather than on first use.
pub fn build_indicator(name: &str, spec: &IndicatorSpec) -> Result<DynIndicator, EngineError> {
    let kind = spec.kind;
    let params = &spec.params;

    let recognised = kind.recognised_params();
    if let Some(unknown) = params.provided().into_iter().find(|p| !recognised.contains(p)) {
        return Err(invalid(
            name,
            format!("parameter '{}' is not recognised by {}", unknown, kind),
        ));
    }

    let period = || resolve_period(name, kind, params.period);
    let wrap = |err: IndicatorError| EngineError::invalid_parameter(name, err);

    let indicator = match kind {
        IndicatorKind::Sma => DynIndicator::bar(Sma::new(period()?).map_err(wrap)?),
        IndicatorKind::Ema => DynIndicator::bar(Ema::new(period()?).map_err(wrap)?),
        IndicatorKind::HtfTrend => DynIndicator::bar(Ema::htf_trend(period()?).map_err(wrap)?),
        IndicatorKind::Rsi => DynIndicator::bar(Rsi::new(period()?).map_err(wrap)?),
        IndicatorKind::Atr => DynIndicator::bar(Atr::new(period()?).map_err(wrap)?),
        IndicatorKind::Bollinger => {
            let std_dev = params.std_dev.or(kind.default_multiplier()).unwrap_or(2.0);
            DynIndicator::bar(BollingerBands::new(period()?, std_dev).map_err(wrap)?)
        }
        IndicatorKind::Supertrend => {
            let multiplier = params.multiplier.or(kind.default_multiplier()).unwrap_or(3.0);
            DynIndicator::bar(Supertrend::new(period()?, multiplier).map_err(wrap)?)
        }
        IndicatorKind::Vwap => {
            let offset = params.session_offset_minutes.unwrap_or(0);
            if offset <= -MAX_SESSION_OFFSET_MINUTES || offset >= MAX_SESSION_OFFSET_MINUTES {
                return Err(invalid(
                    name,
                    format!("session_offset_minutes must be within ±1439, got {}", offset),
                ));
            }
            let vwap = Vwap::with_session(params.session.unwrap_or_default(), offset)
                .with_price_source(params.price_source.unwrap_or_default());
            match params.feed.unwrap_or(Feed::Tick) {
                Feed::Tick => DynIndicator::tick(vwap),
                Feed::Bar => DynIndicator::bar(vwap),
            }
        }
    };

    Ok(indicator)
}

fn resolve_period(
    name: &str,
    kind: IndicatorKind,
    period: Option<i64>,
) -> Result<usize, EngineError> {
    let Some(p) = period else {
        return kind
            .default_period()
            .ok_or_else(|| invalid(name, format!("{} takes no period", kind)));
    };
    if p <= 0 {
        return Err(invalid(
            name,
            format!("period must be greater than 0, got {}", p),
        ));
    }
    match usize::try_from(p) {
        Ok(p) if p <= MAX_PERIOD => Ok(p),
        _ => Err(invalid(
            name,
            format!("period must be at most {}, got {}", MAX_PERIOD, p),
        )),
    }
}

fn invalid(name: &str, reason: String) -> EngineError {
    EngineError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorParams;
    use barstream_indicators::{PriceSource, SessionReset};

    #[test]
    fn test_build_defaults() {
        for kind in IndicatorKind::all() {
            let indicator = build_indicator("x", &IndicatorSpec::new(*kind));
            assert!(indicator.is_ok(), "{} failed to build", kind);
        }
    }

    #[test]
    fn test_default_labels_and_feeds() {
        let st = build_indicator("st", &IndicatorSpec::new(IndicatorKind::Supertrend)).unwrap();
        assert_eq!(st.name(), "Supertrend");
        assert_eq!(st.min_history(), 11);

        let rsi = build_indicator("rsi", &IndicatorSpec::new(IndicatorKind::Rsi)).unwrap();
        assert_eq!(rsi.name(), "RSI_14");

        let htf = build_indicator("htf", &IndicatorSpec::new(IndicatorKind::HtfTrend)).unwrap();
        assert_eq!(htf.name(), "HTF_Trend_20");

        let vwap = build_indicator("vwap", &IndicatorSpec::new(IndicatorKind::Vwap)).unwrap();
        assert_eq!(vwap.feed(), Feed::Tick);
    }

    #[test]
    fn test_vwap_bar_feed() {
        let spec = IndicatorSpec {
            kind: IndicatorKind::Vwap,
            enabled: true,
            params: IndicatorParams {
                feed: Some(Feed::Bar),
                price_source: Some(PriceSource::Typical),
                session: Some(SessionReset::Never),
                ..Default::default()
            },
        };

        assert_eq!(build_indicator("vwap", &spec).unwrap().feed(), Feed::Bar);
    }

    #[test]
    fn test_non_positive_period_rejected() {
        for period in [0, -5] {
            let spec = IndicatorSpec::new(IndicatorKind::Rsi).with_period(period);
            match build_indicator("rsi", &spec) {
                Err(EngineError::InvalidParameter { name, .. }) => assert_eq!(name, "rsi"),
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_oversized_period_rejected() {
        for kind in [IndicatorKind::Supertrend, IndicatorKind::Rsi, IndicatorKind::Ema] {
            for period in [i64::MAX, MAX_PERIOD as i64 + 1] {
                let spec = IndicatorSpec::new(kind).with_period(period);
                match build_indicator("big", &spec) {
                    Err(EngineError::InvalidParameter { name, reason }) => {
                        assert_eq!(name, "big");
                        assert!(reason.contains("at most"), "{}", reason);
                    }
                    other => panic!("expected InvalidParameter, got {:?}", other),
                }
            }
        }

        let spec = IndicatorSpec::new(IndicatorKind::Supertrend).with_period(MAX_PERIOD as i64);
        assert!(build_indicator("st", &spec).is_ok());
    }

    #[test]
    fn test_bad_multiplier_rejected() {
        let spec = IndicatorSpec::new(IndicatorKind::Supertrend).with_multiplier(-1.0);
        assert!(matches!(
            build_indicator("st", &spec),
            Err(EngineError::InvalidParameter { .. })
        ));

        let mut bb = IndicatorSpec::new(IndicatorKind::Bollinger);
        bb.params.std_dev = Some(f64::INFINITY);
        assert!(build_indicator("bb", &bb).is_err());
    }

    #[test]
    fn test_unrecognised_param_rejected() {
        let spec = IndicatorSpec::new(IndicatorKind::Rsi).with_multiplier(2.0);
        let err = build_indicator("rsi", &spec).unwrap_err();
        assert!(err.to_string().contains("multiplier"));

        let vwap = IndicatorSpec::new(IndicatorKind::Vwap).with_period(10);
        assert!(build_indicator("vwap", &vwap).is_err());
    }

    #[test]
    fn test_session_offset_bounds() {
        let mut spec = IndicatorSpec::new(IndicatorKind::Vwap);
        spec.params.session_offset_minutes = Some(330);
        assert!(build_indicator("vwap", &spec).is_ok());

        spec.params.session_offset_minutes = Some(1440);
        assert!(build_indicator("vwap", &spec).is_err());
    }

    #[test]
    fn test_catalogue_lists_every_kind() {
        let info = catalogue();
        assert_eq!(info.len(), IndicatorKind::all().len());

        let st = info
            .iter()
            .find(|i| i.kind == IndicatorKind::Supertrend)
            .unwrap();
        assert_eq!(st.default_period, Some(10));
        assert_eq!(st.default_multiplier, Some(3.0));
    }
}
