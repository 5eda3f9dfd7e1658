//! PriceSeries — append-only, strictly time-ordered bar history.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::bar::PriceBar;

/// Errors raised when a bar cannot be appended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("non-monotonic input: bar at {received} does not follow previous bar at {previous}")]
    NonMonotonicInput {
        previous: DateTime<Utc>,
        received: DateTime<Utc>,
    },
}

/// Reject `next` unless it is strictly later than `previous`.
///
/// Shared by the series and the pipeline so both enforce the same ordering rule.
pub fn check_order(
    previous: Option<DateTime<Utc>>,
    next: DateTime<Utc>,
) -> Result<(), SeriesError> {
    match previous {
        Some(prev) if next <= prev => Err(SeriesError::NonMonotonicInput {
            previous: prev,
            received: next,
        }),
        _ => Ok(()),
    }
}

/// Ordered bar history for one asset.
///
/// Bars can only be appended, and only in strictly increasing timestamp order.
/// Retention is the caller's call: `retain_last` drops old bars but the
/// ordering guard keeps the last accepted timestamp.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bars: Vec::with_capacity(capacity),
            last_timestamp: None,
        }
    }

    /// Append a bar. Out-of-order or duplicate timestamps are rejected and the
    /// series is left unchanged.
    pub fn push(&mut self, bar: PriceBar) -> Result<(), SeriesError> {
        check_order(self.last_timestamp, bar.timestamp)?;
        self.last_timestamp = Some(bar.timestamp);
        self.bars.push(bar);
        Ok(())
    }

    /// Keep only the most recent `n` bars.
    pub fn retain_last(&mut self, n: usize) {
        if self.bars.len() > n {
            let excess = self.bars.len() - n;
            self.bars.drain(..excess);
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
