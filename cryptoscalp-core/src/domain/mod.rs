//! Domain types: bars, the append-only series, and signal classifications.

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::PriceBar;
pub use series::{check_order, PriceSeries, SeriesError};
pub use signal::{MarketCondition, Signal};
