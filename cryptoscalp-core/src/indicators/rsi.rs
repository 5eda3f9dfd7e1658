//! Relative Strength Index (RSI), updated one close at a time.
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Seed: simple mean of the first `period` gains/losses.
//! Edge cases: avg_loss == 0 → RSI = 100; both zero → RSI = 50.
//!
//! The recurrence is path-dependent, so closes must arrive in order and are
//! never recomputed in batch.

#[derive(Debug, Clone)]
pub struct RsiEngine {
    period: usize,
    previous_close: Option<f64>,
    deltas_seen: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl RsiEngine {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            previous_close: None,
            deltas_seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    /// Feed the next close. Returns `None` until `period` deltas have been seen.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let previous = self.previous_close.replace(close)?;

        let delta = close - previous;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        let period = self.period as f64;

        self.deltas_seen += 1;
        if self.deltas_seen <= self.period {
            // Seed phase: accumulate sums, divide once the window is complete.
            self.avg_gain += gain;
            self.avg_loss += loss;
            if self.deltas_seen < self.period {
                return None;
            }
            self.avg_gain /= period;
            self.avg_loss /= period;
        } else {
            self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
            self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
        }

        Some(rsi_from_averages(self.avg_gain, self.avg_loss))
    }

    /// Latest RSI, or `None` while seeding.
    pub fn current(&self) -> Option<f64> {
        self.is_ready()
            .then(|| rsi_from_averages(self.avg_gain, self.avg_loss))
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn is_ready(&self) -> bool {
        self.deltas_seen >= self.period
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
