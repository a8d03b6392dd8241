//! Logging setup and snapshot reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{format_timestamp, render_snapshot};
