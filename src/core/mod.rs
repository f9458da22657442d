//! Core application primitives

pub mod heartbeat;
pub mod runtime;

pub use heartbeat::*;
pub use runtime::*;
