//! Serializable signal configuration.
//!
//! Every field has a default, so a TOML file only needs to name what it
//! changes:
//!
//! ```toml
//! bollinger_window = 20
//! bollinger_k = 2.0
//! rsi_period = 14
//! rsi_oversold = 25.0
//! rsi_overbought = 75.0
//! stddev_mode = "sample"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::indicators::StdDevMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters for one Bollinger + RSI pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Number of closes in the Bollinger window.
    pub bollinger_window: usize,
    /// Band width in standard deviations.
    pub bollinger_k: f64,
    /// RSI lookback in deltas.
    pub rsi_period: usize,
    /// RSI strictly below this is oversold.
    pub rsi_oversold: f64,
    /// RSI strictly above this is overbought.
    pub rsi_overbought: f64,
    pub stddev_mode: StdDevMode,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            bollinger_window: 20,
            bollinger_k: 2.0,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stddev_mode: StdDevMode::Sample,
        }
    }
}

impl SignalConfig {
    /// Check every parameter. Nothing is clamped: the first violation is
    /// reported and the config is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidConfiguration(msg));

        if self.bollinger_window == 0 {
            return invalid("bollinger_window must be > 0".into());
        }
        if self.rsi_period == 0 {
            return invalid("rsi_period must be > 0".into());
        }
        if !self.bollinger_k.is_finite() || self.bollinger_k < 0.0 {
            return invalid(format!(
                "bollinger_k must be a finite, non-negative number (got {})",
                self.bollinger_k
            ));
        }
        for (name, value) in [
            ("rsi_oversold", self.rsi_oversold),
            ("rsi_overbought", self.rsi_overbought),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return invalid(format!("{name} must be within [0, 100] (got {value})"));
            }
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return invalid(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of leading bars for which at least one indicator is not ready.
    ///
    /// Bands need `bollinger_window` closes; RSI needs `rsi_period` deltas,
    /// i.e. `rsi_period + 1` closes.
    pub fn warmup_bars(&self) -> usize {
        self.bollinger_window
            .saturating_sub(1)
            .max(self.rsi_period)
    }

    /// Deterministic BLAKE3 hash of the configuration, for tagging exports.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("SignalConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
