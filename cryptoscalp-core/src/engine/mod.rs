//! Bar-by-bar processing: the per-asset pipeline and the multi-asset scanner.

pub mod pipeline;
pub mod scanner;

pub use pipeline::{PipelineError, SignalPipeline, SignalRow};
pub use scanner::{AssetFeed, MarketScanner, ScanSummary};
