//! Signal and market-condition classifications emitted per bar.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean-reversion call for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    Long,
    Short,
    #[default]
    Neutral,
}

impl Signal {
    pub fn is_actionable(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

/// RSI-only read of the market, independent of the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarketCondition {
    Overbought,
    Oversold,
    #[default]
    Neutral,
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Overbought => "OVERBOUGHT (Sell Zone)",
            Self::Oversold => "OVERSOLD (Buy Zone)",
            Self::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}
