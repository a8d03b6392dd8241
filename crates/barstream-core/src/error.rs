//! Error types for the indicator engine.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum BarstreamError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),
}

/// Errors raised by the history store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Fewer observations stored than requested. Expected during warm-up.
    #[error("Insufficient data: requested {requested} observations, have {available}")]
    InsufficientData { requested: usize, available: usize },
}

/// Indicator construction and calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Undefined result: {0}")]
    UndefinedResult(String),
}

/// Errors raised by the indicator manager.
///
/// Every variant is fatal to the offending call only; the manager state is
/// left exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Indicator already registered: {0}")]
    DuplicateName(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid parameter for indicator '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Out-of-order observation: timestamp {received} is earlier than {last}")]
    FeedOrderingViolation { last: i64, received: i64 },
}

impl EngineError {
    /// Wrap an indicator construction error with the name it was registered under.
    pub fn invalid_parameter(name: &str, err: IndicatorError) -> Self {
        let reason = match err {
            IndicatorError::InvalidParameter(reason) => reason,
            other => other.to_string(),
        };
        EngineError::InvalidParameter {
            name: name.to_string(),
            reason,
        }
    }
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available: {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for engine operations.
pub type BarstreamResult<T> = Result<T, BarstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_keeps_reason() {
        let err = EngineError::invalid_parameter(
            "rsi",
            IndicatorError::InvalidParameter("period must be positive".into()),
        );
        assert_eq!(
            err.to_string(),
            "Invalid parameter for indicator 'rsi': period must be positive"
        );
    }

    #[test]
    fn test_engine_error_converts() {
        let err: BarstreamError = EngineError::UnknownIndicator("vwap".into()).into();
        assert!(matches!(err, BarstreamError::Engine(EngineError::UnknownIndicator(_))));
    }
}
