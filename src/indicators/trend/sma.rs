//! SMA (Simple Moving Average) indicator

use crate::models::CrossState;

/// Mean of the trailing `period` closes
pub fn calculate_sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Compare the fast SMA against the slow SMA on the latest close
pub fn check_ma_cross(closes: &[f64], fast_period: usize, slow_period: usize) -> Option<CrossState> {
    let fast = calculate_sma(closes, fast_period)?;
    let slow = calculate_sma(closes, slow_period)?;
    Some(CrossState::classify(fast, slow))
}
