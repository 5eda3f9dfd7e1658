//! Rolling mean and standard deviation over a fixed window of closes.
//!
//! The window is a ring buffer of the last N closes. Each update evicts the
//! oldest close once the buffer is full and recomputes both statistics over
//! the current contents (mean first, then squared deviations from it).
//! Readings are withheld until N closes have been seen.
//!
//! Both passes work on offsets from the oldest close in the window, so a
//! constant run yields exactly `mean == close` and `stddev == 0` even when
//! the price has no exact binary representation.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Divisor used for the variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevMode {
    /// Divide by N - 1.
    #[default]
    Sample,
    /// Divide by N.
    Population,
}

/// Mean and standard deviation of a full window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsReading {
    pub mean: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone)]
pub struct RollingStats {
    window: usize,
    mode: StdDevMode,
    closes: VecDeque<f64>,
}

impl RollingStats {
    /// `window` must be at least 1; `SignalConfig::validate` guards this
    /// before a pipeline is ever built.
    pub fn new(window: usize, mode: StdDevMode) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            window,
            mode,
            closes: VecDeque::with_capacity(window),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<StatsReading> {
        if self.closes.len() == self.window {
            self.closes.pop_front();
        }
        self.closes.push_back(close);
        self.current()
    }

    /// Reading over the current window, or `None` while it is still filling.
    pub fn current(&self) -> Option<StatsReading> {
        if !self.is_ready() {
            return None;
        }

        let n = self.closes.len() as f64;
        let base = self.closes.front().copied()?;
        let mean_offset = self.closes.iter().map(|x| x - base).sum::<f64>() / n;
        let mean = base + mean_offset;
        let sum_sq: f64 = self
            .closes
            .iter()
            .map(|x| {
                let diff = (x - base) - mean_offset;
                diff * diff
            })
            .sum();

        let divisor = match self.mode {
            StdDevMode::Sample => n - 1.0,
            StdDevMode::Population => n,
        };
        // Sample mode over a single close has no spread.
        let stddev = if divisor > 0.0 {
            (sum_sq / divisor).sqrt()
        } else {
            0.0
        };

        Some(StatsReading { mean, stddev })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn mode(&self) -> StdDevMode {
        self.mode
    }

    /// Number of closes currently held, `min(window, seen)`.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.closes.len() == self.window
    }

    pub fn reset(&mut self) {
        self.closes.clear();
    }
}
