//! Criterion benchmarks for CryptoScalp hot paths.
//!
//! Benchmarks:
//! 1. Per-bar pipeline replay (rolling stats + RSI + evaluator)
//! 2. Individual indicator updates
//! 3. Multi-symbol scan on the rayon pool

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

use cryptoscalp_core::data::SyntheticBars;
use cryptoscalp_core::domain::PriceBar;
use cryptoscalp_core::indicators::{RollingStats, RsiEngine, StdDevMode};
use cryptoscalp_core::{MarketScanner, SignalConfig, SignalPipeline};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<PriceBar> {
    SyntheticBars::default().generate(n)
}

fn make_batches(bars: usize, symbols: usize) -> HashMap<String, Vec<PriceBar>> {
    (0..symbols)
        .map(|i| {
            let symbol = format!("SYM{i}-USD");
            let bars = SyntheticBars::for_symbol(&symbol).generate(bars);
            (symbol, bars)
        })
        .collect()
}

// ── 1. Pipeline Replay ───────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_replay");

    // One day, one week, one month of 15-minute bars.
    for &bar_count in &[96, 672, 2880] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("default_config", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    let mut pipeline = SignalPipeline::new(SignalConfig::default())
                        .expect("default config is valid");
                    pipeline.replay(black_box(&bars))
                });
            },
        );
    }

    let bars = make_bars(2880);
    let wide = SignalConfig {
        bollinger_window: 200,
        rsi_period: 50,
        ..SignalConfig::default()
    };
    group.bench_function("window_200_2880_bars", |b| {
        b.iter(|| {
            let mut pipeline = SignalPipeline::new(wide.clone()).expect("config is valid");
            pipeline.replay(black_box(&bars))
        });
    });

    group.finish();
}

// ── 2. Indicator Updates ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_update");
    let closes: Vec<f64> = make_bars(2880).iter().map(|b| b.close).collect();

    for &window in &[20, 100] {
        group.bench_with_input(
            BenchmarkId::new("rolling_stats", window),
            &window,
            |b, &w| {
                b.iter(|| {
                    let mut stats = RollingStats::new(w, StdDevMode::Sample);
                    for &c in &closes {
                        black_box(stats.update(c));
                    }
                });
            },
        );
    }

    group.bench_function("rsi_14", |b| {
        b.iter(|| {
            let mut rsi = RsiEngine::new(14);
            for &c in &closes {
                black_box(rsi.update(c));
            }
        });
    });

    group.finish();
}

// ── 3. Multi-Symbol Scan ─────────────────────────────────────────────

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_scan");

    for &symbols in &[1, 8, 32] {
        let batches = make_batches(2880, symbols);
        group.bench_with_input(BenchmarkId::new("symbols", symbols), &symbols, |b, _| {
            b.iter(|| {
                let mut scanner =
                    MarketScanner::new(SignalConfig::default()).expect("default config is valid");
                scanner.scan_batches(black_box(batches.clone()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_indicators, bench_scanner);
criterion_main!(benches);
