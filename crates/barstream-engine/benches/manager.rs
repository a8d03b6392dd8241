//! Benchmarks for the manager update cycle.

use barstream_core::types::{Bar, Tick};
use barstream_engine::{IndicatorManager, ManagerConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_bars(size: usize) -> Vec<Bar> {
    (0..size)
        .map(|i| {
            let c = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 60_000, c, c + 0.5, c - 0.5, c, 1000.0)
        })
        .collect()
}

fn benchmark_bar_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ManagerCycle");

    for size in [1000, 10000].iter() {
        let bars = generate_bars(*size);

        group.bench_with_input(BenchmarkId::new("default_set", size), &bars, |b, bars| {
            b.iter(|| {
                let mut manager = IndicatorManager::from_config(&ManagerConfig::default()).unwrap();
                for bar in bars {
                    manager.on_new_observation(*bar).unwrap();
                }
                black_box(manager.get_latest_bar_data().sequence)
            })
        });
    }

    group.finish();
}

fn benchmark_tick_aggregation(c: &mut Criterion) {
    let ticks: Vec<Tick> = (0..10_000)
        .map(|i| Tick::new(i * 1_000, 100.0 + (i as f64 * 0.01).sin(), 5.0))
        .collect();

    let mut config = ManagerConfig::default();
    config.aggregation = Some(barstream_core::types::Timeframe::Minute1);

    c.bench_function("ManagerCycle/ticks_10000_aggregated", |b| {
        b.iter(|| {
            let mut manager = IndicatorManager::from_config(&config).unwrap();
            for tick in &ticks {
                manager.on_new_observation(*tick).unwrap();
            }
            black_box(manager.bars_seen())
        })
    });
}

criterion_group!(benches, benchmark_bar_cycle, benchmark_tick_aggregation);
criterion_main!(benches);
