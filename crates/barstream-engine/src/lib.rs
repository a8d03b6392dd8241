//! Indicator manager for streaming bar and tick data.
//!
//! This crate provides:
//! - [`IndicatorManager`]: registration, per-observation update cycle and
//!   the incrementally maintained snapshot
//! - [`SharedIndicatorManager`]: the same behind a read/write lock
//! - [`BarAggregator`]: tick to bar bucketing
//! - Configuration types and the factory that turns them into indicators

pub mod aggregator;
pub mod config;
pub mod factory;
pub mod manager;
pub mod shared;

pub use aggregator::BarAggregator;
pub use config::{
    HistorySettings, IndicatorKind, IndicatorParams, IndicatorSpec, ManagerConfig,
    OrderingPolicy,
};
pub use factory::{build_indicator, catalogue, IndicatorInfo};
pub use manager::IndicatorManager;
pub use shared::SharedIndicatorManager;
