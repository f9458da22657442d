//! Shared data models spanning the detector and signal layers.

pub mod alert;
pub mod signal;
pub mod source;

pub use alert::{Alert, Excerpt};
pub use signal::{CrossState, RsiZone, SignalAlert, SignalAlertKind, SignalReading};
pub use source::Source;
