//! Core types and traits for the indicator engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market observation types (Bar, Tick, Observation)
//! - The bounded history store and its windowed views
//! - Indicator values, readings and the aggregated snapshot
//! - Core traits for indicators and strategies

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BarstreamError, BarstreamResult};
pub use traits::*;
pub use types::*;
