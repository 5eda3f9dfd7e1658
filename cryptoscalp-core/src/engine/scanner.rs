//! Multi-asset scanning: one feed (series + pipeline) per symbol.
//!
//! Feeds share nothing, so whole batches for different symbols can be
//! replayed in parallel. Inside a feed, bars are still processed one at a
//! time in order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::config::SignalConfig;
use crate::domain::{MarketCondition, PriceBar, PriceSeries, Signal};

use super::pipeline::{PipelineError, SignalPipeline, SignalRow};

/// Bar history plus indicator state for a single symbol.
#[derive(Debug, Clone)]
pub struct AssetFeed {
    symbol: String,
    series: PriceSeries,
    pipeline: SignalPipeline,
    retention: Option<usize>,
    latest: Option<SignalRow>,
    long_signals: usize,
    short_signals: usize,
}

impl AssetFeed {
    pub fn new(symbol: impl Into<String>, config: SignalConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            symbol: symbol.into(),
            series: PriceSeries::new(),
            pipeline: SignalPipeline::new(config)?,
            retention: None,
            latest: None,
            long_signals: 0,
            short_signals: 0,
        })
    }

    /// Keep at most `bars` bars of history in the series.
    pub fn with_retention(mut self, bars: usize) -> Self {
        self.retention = Some(bars);
        self
    }

    /// Push one bar through the pipeline and record it in the series.
    pub fn ingest(&mut self, bar: PriceBar) -> Result<SignalRow, PipelineError> {
        let row = self.pipeline.on_bar(&bar)?;
        self.series.push(bar)?;
        if let Some(keep) = self.retention {
            self.series.retain_last(keep);
        }

        match row.signal {
            Signal::Long => self.long_signals += 1,
            Signal::Short => self.short_signals += 1,
            Signal::Neutral => {}
        }
        self.latest = Some(row.clone());
        Ok(row)
    }

    /// Ingest a batch in order, stopping at the first rejected bar.
    pub fn ingest_all(
        &mut self,
        bars: impl IntoIterator<Item = PriceBar>,
    ) -> Result<Vec<SignalRow>, PipelineError> {
        bars.into_iter().map(|bar| self.ingest(bar)).collect()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn pipeline(&self) -> &SignalPipeline {
        &self.pipeline
    }

    pub fn latest(&self) -> Option<&SignalRow> {
        self.latest.as_ref()
    }

    /// Dashboard read-out for the most recent bar.
    pub fn summary(&self) -> ScanSummary {
        let latest = self.latest.as_ref();
        let last_rsi = latest.and_then(|r| r.rsi);
        ScanSummary {
            symbol: self.symbol.clone(),
            bars: self.pipeline.bars_seen(),
            last_close: latest.map(|r| r.close),
            last_rsi,
            condition: last_rsi
                .map(|rsi| self.pipeline.evaluator().classify(rsi))
                .unwrap_or_default(),
            band_width: latest.and_then(SignalRow::band_width),
            last_signal: latest.map(|r| r.signal).unwrap_or_default(),
            long_signals: self.long_signals,
            short_signals: self.short_signals,
        }
    }
}

/// Snapshot of one feed, as shown on the scanner dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub symbol: String,
    pub bars: usize,
    pub last_close: Option<f64>,
    pub last_rsi: Option<f64>,
    pub condition: MarketCondition,
    pub band_width: Option<f64>,
    pub last_signal: Signal,
    pub long_signals: usize,
    pub short_signals: usize,
}

/// Collection of per-symbol feeds sharing one configuration.
#[derive(Debug, Clone)]
pub struct MarketScanner {
    config: SignalConfig,
    retention: Option<usize>,
    feeds: BTreeMap<String, AssetFeed>,
}

impl MarketScanner {
    pub fn new(config: SignalConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            retention: None,
            feeds: BTreeMap::new(),
        })
    }

    /// Retention applied to every feed created from now on.
    pub fn with_retention(mut self, bars: usize) -> Self {
        self.retention = Some(bars);
        self
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    fn feed_mut(&mut self, symbol: &str) -> Result<&mut AssetFeed, PipelineError> {
        match self.feeds.entry(symbol.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut feed = AssetFeed::new(symbol, self.config.clone())?;
                if let Some(keep) = self.retention {
                    feed = feed.with_retention(keep);
                }
                Ok(entry.insert(feed))
            }
        }
    }

    /// Push one bar for `symbol`, creating its feed on first use.
    pub fn ingest(&mut self, symbol: &str, bar: PriceBar) -> Result<SignalRow, PipelineError> {
        self.feed_mut(symbol)?.ingest(bar)
    }

    /// Replay one batch per symbol, symbols in parallel.
    ///
    /// Each symbol's result is independent: a rejected bar stops only that
    /// symbol's batch.
    pub fn scan_batches(
        &mut self,
        mut batches: HashMap<String, Vec<PriceBar>>,
    ) -> Result<BTreeMap<String, Result<Vec<SignalRow>, PipelineError>>, PipelineError> {
        for symbol in batches.keys() {
            self.feed_mut(symbol)?;
        }

        let work: Vec<(&mut AssetFeed, Vec<PriceBar>)> = self
            .feeds
            .iter_mut()
            .filter_map(|(symbol, feed)| batches.remove(symbol).map(|bars| (feed, bars)))
            .collect();

        let results: BTreeMap<String, Result<Vec<SignalRow>, PipelineError>> = work
            .into_par_iter()
            .map(|(feed, bars)| {
                let result = feed.ingest_all(bars);
                (feed.symbol().to_string(), result)
            })
            .collect();

        info!(
            symbols = results.len(),
            failed = results.values().filter(|r| r.is_err()).count(),
            "scan complete"
        );
        Ok(results)
    }

    pub fn feed(&self, symbol: &str) -> Option<&AssetFeed> {
        self.feeds.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.feeds.keys().map(String::as_str)
    }

    /// Summaries for every feed, ordered by symbol.
    pub fn summaries(&self) -> Vec<ScanSummary> {
        self.feeds.values().map(AssetFeed::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}
