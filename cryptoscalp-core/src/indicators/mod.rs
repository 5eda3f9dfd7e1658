//! Streaming indicator implementations.
//!
//! Each indicator is fed one close at a time and reports `None` until it has
//! seen enough history. `BollingerBands` is the exception: it is a pure
//! function of a `RollingStats` reading and carries no window of its own.

pub mod bollinger;
pub mod rolling;
pub mod rsi;

pub use bollinger::{bollinger_bands, BollingerBands, BollingerReading};
pub use rolling::{RollingStats, StatsReading, StdDevMode};
pub use rsi::{rsi_from_averages, RsiEngine};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
