//! CryptoScalp Core — mean-reversion signal detection over streaming price bars.
//!
//! This crate contains the signal pipeline and its plumbing:
//! - Domain types (price bars, the append-only series, signals)
//! - Streaming indicators: rolling mean/stddev, Bollinger Bands, Wilder RSI
//! - The Bollinger + RSI evaluator producing Long / Short / Neutral
//! - Per-asset pipeline and a multi-asset scanner
//! - CSV and synthetic bar sources, CSV/JSON export
//!
//! Bars for one asset are processed strictly in arrival order; every
//! indicator recurrence is path-dependent.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod export;
pub mod indicators;
pub mod strategy;

pub use config::{ConfigError, SignalConfig};
pub use domain::{MarketCondition, PriceBar, PriceSeries, SeriesError, Signal};
pub use engine::{AssetFeed, MarketScanner, PipelineError, ScanSummary, SignalPipeline, SignalRow};
pub use strategy::SignalEvaluator;
