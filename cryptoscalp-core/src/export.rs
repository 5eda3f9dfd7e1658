//! Export of signal rows — CSV for spreadsheets and charting, JSON for
//! round-trip consumers.
//!
//! JSON reports carry a `schema_version`; unknown versions are rejected on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SignalConfig;
use crate::engine::SignalRow;

/// Current schema version for JSON reports.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
}

/// Signal rows for one symbol, tagged with the config that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub schema_version: u32,
    pub symbol: String,
    pub config: SignalConfig,
    pub config_fingerprint: String,
    pub rows: Vec<SignalRow>,
}

impl SignalReport {
    pub fn new(symbol: impl Into<String>, config: &SignalConfig, rows: Vec<SignalRow>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.into(),
            config: config.clone(),
            config_fingerprint: config.fingerprint(),
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let report: Self = serde_json::from_str(json)?;
        if report.schema_version > SCHEMA_VERSION {
            return Err(ExportError::UnsupportedSchema {
                found: report.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(report)
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Render rows as CSV. Not-ready indicator cells are left empty.
///
/// Columns: timestamp, close, upper, lower, mean, rsi, signal
pub fn signals_to_csv(rows: &[SignalRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["timestamp", "close", "upper", "lower", "mean", "rsi", "signal"])?;
    for row in rows {
        wtr.write_record([
            row.timestamp.to_rfc3339(),
            format!("{:.6}", row.close),
            fmt_opt(row.upper),
            fmt_opt(row.lower),
            fmt_opt(row.mean),
            fmt_opt(row.rsi),
            row.signal.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
