//! Per-asset signal pipeline: the "next bar arrives" boundary.
//!
//! One pipeline owns one `RollingStats` and one `RsiEngine`. Bars are pushed
//! in timestamp order through `on_bar`; each call returns the bar's full
//! output row. Rejected bars leave every piece of state untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, SignalConfig};
use crate::domain::{check_order, PriceBar, SeriesError, Signal};
use crate::indicators::{BollingerBands, BollingerReading, RollingStats, RsiEngine};
use crate::strategy::SignalEvaluator;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("non-finite close {close} at {timestamp}")]
    InvalidPrice {
        timestamp: DateTime<Utc>,
        close: f64,
    },
}

/// Output for one bar. Indicator fields are `None` during warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub mean: Option<f64>,
    pub rsi: Option<f64>,
    pub signal: Signal,
}

impl SignalRow {
    /// Band width, once the bands are ready.
    pub fn band_width(&self) -> Option<f64> {
        Some(self.upper? - self.lower?)
    }

    pub fn is_ready(&self) -> bool {
        self.mean.is_some() && self.rsi.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SignalPipeline {
    config: SignalConfig,
    stats: RollingStats,
    bands: BollingerBands,
    rsi: RsiEngine,
    evaluator: SignalEvaluator,
    last_timestamp: Option<DateTime<Utc>>,
    bars_seen: usize,
}

impl SignalPipeline {
    /// Build a pipeline, failing fast on an invalid configuration.
    pub fn new(config: SignalConfig) -> Result<Self, PipelineError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected signal configuration");
            return Err(e.into());
        }

        Ok(Self {
            stats: RollingStats::new(config.bollinger_window, config.stddev_mode),
            bands: BollingerBands::new(config.bollinger_k),
            rsi: RsiEngine::new(config.rsi_period),
            evaluator: SignalEvaluator::new(config.rsi_oversold, config.rsi_overbought),
            last_timestamp: None,
            bars_seen: 0,
            config,
        })
    }

    /// Process the next bar.
    pub fn on_bar(&mut self, bar: &PriceBar) -> Result<SignalRow, PipelineError> {
        if let Err(e) = check_order(self.last_timestamp, bar.timestamp) {
            warn!(error = %e, "rejected out-of-order bar");
            return Err(e.into());
        }
        if !bar.close.is_finite() {
            warn!(timestamp = %bar.timestamp, close = bar.close, "rejected non-finite close");
            return Err(PipelineError::InvalidPrice {
                timestamp: bar.timestamp,
                close: bar.close,
            });
        }

        self.last_timestamp = Some(bar.timestamp);
        self.bars_seen += 1;

        let bands: Option<BollingerReading> = self
            .stats
            .update(bar.close)
            .map(|stats| self.bands.compute(&stats));
        let rsi = self.rsi.update(bar.close);
        let signal = self.evaluator.evaluate(bar.close, bands.as_ref(), rsi);

        if self.bars_seen == self.config.warmup_bars() + 1 {
            debug!(bars = self.bars_seen, "indicators warmed up");
        }
        if signal.is_actionable() {
            debug!(
                timestamp = %bar.timestamp,
                close = bar.close,
                rsi = ?rsi,
                %signal,
                "signal fired"
            );
        } else {
            trace!(timestamp = %bar.timestamp, close = bar.close, "bar processed");
        }

        Ok(SignalRow {
            timestamp: bar.timestamp,
            close: bar.close,
            upper: bands.map(|b| b.upper),
            lower: bands.map(|b| b.lower),
            mean: bands.map(|b| b.mean),
            rsi,
            signal,
        })
    }

    /// Replay a batch in order, stopping at the first rejected bar.
    pub fn replay(&mut self, bars: &[PriceBar]) -> Result<Vec<SignalRow>, PipelineError> {
        bars.iter().map(|bar| self.on_bar(bar)).collect()
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &SignalEvaluator {
        &self.evaluator
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    /// True once both the bands and the RSI produce values.
    pub fn is_warm(&self) -> bool {
        self.stats.is_ready() && self.rsi.is_ready()
    }

    /// Drop all indicator state, keeping the configuration.
    pub fn reset(&mut self) {
        self.stats.reset();
        self.rsi.reset();
        self.last_timestamp = None;
        self.bars_seen = 0;
    }
}
