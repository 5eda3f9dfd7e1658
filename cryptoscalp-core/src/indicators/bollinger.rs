//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! - Middle: rolling mean of closes
//! - Upper: mean + k * stddev
//! - Lower: mean - k * stddev
//!
//! Stateless: all window state lives in `RollingStats`.

use serde::{Deserialize, Serialize};

use super::rolling::StatsReading;

/// Bands for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub mean: f64,
    pub stddev: f64,
    pub upper: f64,
    pub lower: f64,
}

impl BollingerReading {
    /// Distance between the bands.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Position of `close` inside the bands: 0.0 at the lower band, 1.0 at
    /// the upper band. `None` when the bands have collapsed.
    pub fn percent_b(&self, close: f64) -> Option<f64> {
        let width = self.width();
        if width > 0.0 {
            Some((close - self.lower) / width)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    multiplier: f64,
}

impl BollingerBands {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn compute(&self, stats: &StatsReading) -> BollingerReading {
        bollinger_bands(stats, self.multiplier)
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(2.0)
    }
}

pub fn bollinger_bands(stats: &StatsReading, multiplier: f64) -> BollingerReading {
    let offset = multiplier * stats.stddev;
    BollingerReading {
        mean: stats.mean,
        stddev: stats.stddev,
        upper: stats.mean + offset,
        lower: stats.mean - offset,
    }
}
