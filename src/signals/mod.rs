//! Price signal evaluation.

pub mod engine;

pub use engine::{SignalEngine, SignalReport};
