//! Replay command implementation.

use anyhow::{Context, Result};
use barstream_core::error::EngineError;
use barstream_core::traits::Strategy;
use barstream_core::types::{Feed, Signal, Snapshot};
use barstream_data::{load_csv, spawn_feed};
use barstream_engine::IndicatorManager;
use barstream_monitor::{format_timestamp, render_snapshot};
use barstream_strategies::ConfluenceStrategy;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use super::load_app_config;
use crate::cli::{OutputFormat, ReplayArgs};

/// Everything a replay produced, for JSON output.
#[derive(Debug, Serialize)]
struct ReplayReport {
    observations: usize,
    skipped: usize,
    bars: usize,
    signals: Vec<Signal>,
    snapshots: Vec<Snapshot>,
    snapshot: Snapshot,
}

pub async fn run(args: ReplayArgs, config_path: &Path) -> Result<()> {
    let mut config = load_app_config(config_path)?;
    if let Some(timeframe) = args.aggregate {
        config.engine.aggregation = Some(timeframe);
    }
    config.validate()?;

    let feed = if args.ticks { Feed::Tick } else { Feed::Bar };
    let data_path = args
        .data
        .to_str()
        .context("Data path is not valid UTF-8")?;
    let observations = load_csv(data_path, feed)
        .await
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    info!(
        "Replaying {} {} observations from {}",
        observations.len(),
        feed,
        args.data.display()
    );

    let mut manager =
        IndicatorManager::from_config(&config.engine).context("Failed to build indicator manager")?;
    let mut strategy = ConfluenceStrategy::new(config.strategy.clone())?;
    let text = args.output == OutputFormat::Text;

    let (mut rx, feed_task) = spawn_feed(observations, config.app.feed_buffer);
    let mut report = ReplayReport {
        observations: 0,
        skipped: 0,
        bars: 0,
        signals: Vec::new(),
        snapshots: Vec::new(),
        snapshot: Snapshot::new(),
    };

    while let Some(observation) = rx.recv().await {
        match manager.on_new_observation(observation) {
            Ok(()) => {}
            Err(e @ EngineError::FeedOrderingViolation { .. }) => {
                warn!("Skipping observation: {}", e);
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        report.observations += 1;

        let snapshot = manager.get_latest_bar_data();
        if let Some(signal) = strategy.on_snapshot(snapshot, &observation, manager.bars_seen()) {
            if text {
                print_signal(&signal);
            }
            report.signals.push(signal);
        }

        if args.every > 0 && report.observations % args.every == 0 {
            if text {
                println!("{}", render_snapshot(snapshot));
            } else {
                report.snapshots.push(snapshot.clone());
            }
        }
    }

    let delivered = feed_task.await.context("Feed task failed")?;
    if let Some(bar) = manager.flush() {
        info!("Closed final aggregated bar at {}", format_timestamp(bar.timestamp));
    }
    report.bars = manager.bars_seen();
    report.snapshot = manager.get_latest_bar_data().clone();
    info!(
        "Replay finished: {} delivered, {} processed, {} skipped, {} signals",
        delivered,
        report.observations,
        report.skipped,
        report.signals.len()
    );

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", render_snapshot(&report.snapshot));
            println!(
                "Processed {} observations ({} bars), {} skipped, {} signals",
                report.observations,
                report.bars,
                report.skipped,
                report.signals.len()
            );
        }
    }

    Ok(())
}

fn print_signal(signal: &Signal) {
    println!(
        "{}  {:?} @ {:.2}  [{}] {}",
        format_timestamp(signal.timestamp),
        signal.signal_type,
        signal.price,
        signal.strategy_name,
        signal.reason
    );
}
