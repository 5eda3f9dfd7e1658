//! Mean-reversion rule fusing Bollinger Bands and RSI.
//!
//! - Long:  close < lower band AND rsi < oversold
//! - Short: close > upper band AND rsi > overbought
//! - Neutral otherwise
//!
//! All comparisons are strict: a close sitting exactly on a band, or an RSI
//! exactly on a threshold, does not satisfy that leg. Both legs are required.
//! Each bar is judged on its own; there is no hysteresis between bars.

use crate::domain::{MarketCondition, Signal};
use crate::indicators::BollingerReading;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvaluator {
    oversold: f64,
    overbought: f64,
}

impl SignalEvaluator {
    /// Thresholds are expected to be validated (`oversold < overbought`) by
    /// `SignalConfig::validate`.
    pub fn new(oversold: f64, overbought: f64) -> Self {
        Self {
            oversold,
            overbought,
        }
    }

    pub fn oversold(&self) -> f64 {
        self.oversold
    }

    pub fn overbought(&self) -> f64 {
        self.overbought
    }

    /// Classify one bar. Missing bands or RSI (warm-up) is "no opinion".
    pub fn evaluate(
        &self,
        close: f64,
        bands: Option<&BollingerReading>,
        rsi: Option<f64>,
    ) -> Signal {
        let (Some(bands), Some(rsi)) = (bands, rsi) else {
            return Signal::Neutral;
        };

        if close < bands.lower && rsi < self.oversold {
            Signal::Long
        } else if close > bands.upper && rsi > self.overbought {
            Signal::Short
        } else {
            Signal::Neutral
        }
    }

    /// RSI-only market condition.
    pub fn classify(&self, rsi: f64) -> MarketCondition {
        if rsi > self.overbought {
            MarketCondition::Overbought
        } else if rsi < self.oversold {
            MarketCondition::Oversold
        } else {
            MarketCondition::Neutral
        }
    }
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self::new(30.0, 70.0)
    }
}
