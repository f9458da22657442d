//! Technical indicators computed over closing prices.

pub mod momentum;
pub mod trend;

pub use momentum::calculate_rsi;
pub use trend::{calculate_sma, check_ma_cross};
