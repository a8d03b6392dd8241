//! CLI definitions.

pub mod commands;

use barstream_core::types::Timeframe;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "barstream")]
#[command(author, version, about = "Streaming technical indicator engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "BARSTREAM_CONFIG")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a CSV file through the indicator manager and strategy
    Replay(ReplayArgs),
    /// List supported indicator kinds
    Indicators,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Treat the file as ticks (timestamp, price, volume) instead of bars
    #[arg(long)]
    pub ticks: bool,

    /// Aggregate ticks into bars of this timeframe (1m, 5m, 15m, 30m, 1h, 4h, 1d),
    /// overriding the configuration
    #[arg(long)]
    pub aggregate: Option<Timeframe>,

    /// Print the snapshot every N observations (0 = only at the end)
    #[arg(long, default_value = "0")]
    pub every: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
