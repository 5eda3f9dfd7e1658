//! End-to-end tests from bar files to exported signals.
//!
//! Tests:
//! 1. Synthetic bars survive a CSV file round-trip and replay identically
//! 2. Yahoo-style exports load and run through the pipeline
//! 3. Unsorted files are rejected by the pipeline, not silently reordered
//! 4. Scanner over several synthetic symbols, with CSV and JSON export

use std::collections::HashMap;
use std::io::Write;

use cryptoscalp_core::data::{read_bars_csv, write_bars_csv, DataError, SyntheticBars};
use cryptoscalp_core::export::{signals_to_csv, SignalReport};
use cryptoscalp_core::{
    MarketScanner, PipelineError, SeriesError, Signal, SignalConfig, SignalPipeline,
};

// ── 1. CSV round-trip ────────────────────────────────────────────────

#[test]
fn synthetic_bars_roundtrip_through_file() {
    let bars = SyntheticBars::for_symbol("BTC-USD").generate(300);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btc.csv");

    let file = std::fs::File::create(&path).unwrap();
    write_bars_csv(file, &bars).unwrap();
    let loaded = read_bars_csv(&path).unwrap();
    assert_eq!(loaded.len(), bars.len());

    // Prices are written with six decimals; signals must still agree.
    let config = SignalConfig::default();
    let original = SignalPipeline::new(config.clone())
        .unwrap()
        .replay(&bars)
        .unwrap();
    let reloaded = SignalPipeline::new(config).unwrap().replay(&loaded).unwrap();
    for (a, b) in original.iter().zip(&reloaded) {
        assert_eq!(a.timestamp, b.timestamp);
        assert_eq!(a.signal, b.signal);
        assert!((a.close - b.close).abs() < 1e-5);
    }
}

#[test]
fn missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_bars_csv(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(DataError::Open { .. })));
}

// ── 2. Yahoo layout ──────────────────────────────────────────────────

#[test]
fn yahoo_export_runs_through_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Datetime,Open,High,Low,Close,Adj Close,Volume").unwrap();
    for i in 0..40 {
        let close = 42_000.0 + (i as f64 * 0.7).sin() * 300.0;
        writeln!(
            file,
            "2024-03-01 {:02}:{:02}:00+00:00,{close},{},{},{close},{close},1000",
            i / 4,
            (i % 4) * 15,
            close + 50.0,
            close - 50.0
        )
        .unwrap();
    }
    file.flush().unwrap();

    let bars = read_bars_csv(file.path()).unwrap();
    assert_eq!(bars.len(), 40);

    let rows = SignalPipeline::new(SignalConfig::default())
        .unwrap()
        .replay(&bars)
        .unwrap();
    assert_eq!(rows.len(), 40);
    assert!(rows[18].mean.is_none());
    assert!(rows[19].is_ready());
}

// ── 3. Unsorted input ────────────────────────────────────────────────

#[test]
fn unsorted_file_is_rejected_by_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "timestamp,open,high,low,close,volume\n\
         2024-01-02,2,2,2,2,0\n\
         2024-01-01,1,1,1,1,0\n"
    )
    .unwrap();
    file.flush().unwrap();

    let bars = read_bars_csv(file.path()).unwrap();
    let err = SignalPipeline::new(SignalConfig::default())
        .unwrap()
        .replay(&bars)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Series(SeriesError::NonMonotonicInput { .. })
    ));
}

// ── 4. Scanner and export ────────────────────────────────────────────

#[test]
fn scanner_exports_each_symbol() {
    let symbols = ["BTC-USD", "ETH-USD", "SOL-USD"];
    let batches: HashMap<String, _> = symbols
        .iter()
        .map(|s| (s.to_string(), SyntheticBars::for_symbol(s).generate(500)))
        .collect();

    let config = SignalConfig::default();
    let mut scanner = MarketScanner::new(config.clone()).unwrap();
    let results = scanner.scan_batches(batches).unwrap();
    assert_eq!(results.len(), 3);

    for symbol in symbols {
        let rows = results[symbol].as_ref().unwrap();
        assert_eq!(rows.len(), 500);

        let csv = signals_to_csv(rows).unwrap();
        assert_eq!(csv.lines().count(), 501);

        let report = SignalReport::new(symbol, &config, rows.clone());
        let parsed = SignalReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed.rows.len(), 500);
        assert_eq!(parsed.symbol, symbol);

        let summary = scanner.feed(symbol).unwrap().summary();
        let longs = rows.iter().filter(|r| r.signal == Signal::Long).count();
        let shorts = rows.iter().filter(|r| r.signal == Signal::Short).count();
        assert_eq!(summary.long_signals, longs);
        assert_eq!(summary.short_signals, shorts);
        assert_eq!(summary.bars, 500);
    }
}
