//! Core traits for the indicator engine.

mod indicator;
mod strategy;

pub use indicator::{DynIndicator, Indicator};
pub use strategy::{Strategy, StrategyConfig};
