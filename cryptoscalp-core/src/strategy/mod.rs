//! Signal rules applied on top of the indicator readings.

pub mod evaluator;

pub use evaluator::SignalEvaluator;
