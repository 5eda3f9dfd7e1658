//! Bar sources: CSV files and a seeded synthetic generator.

pub mod csv_source;
pub mod synthetic;

pub use csv_source::{parse_timestamp, read_bars_csv, read_bars_from_reader, write_bars_csv, DataError};
pub use synthetic::SyntheticBars;
