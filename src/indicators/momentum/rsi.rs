//! RSI (Relative Strength Index) indicator

/// Calculate the final RSI value using Wilder smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// The averages are seeded with the plain mean of the first `period` deltas,
/// then each later delta is folded in as `(avg * (period - 1) + x) / period`.
/// When the average loss is zero RS is taken as 0, so a series with no losses
/// at all reports 0 rather than 100. A flat or strictly rising series therefore
/// classifies as oversold and raises an oversold alert on every run.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let (seed, rest) = deltas.split_at(period);

    let mut avg_gain = seed.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
    let mut avg_loss = seed.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;

    let smoothing = (period - 1) as f64;
    for delta in rest {
        avg_gain = (avg_gain * smoothing + delta.max(0.0)) / period as f64;
        avg_loss = (avg_loss * smoothing + (-delta).max(0.0)) / period as f64;
    }

    let rs = if avg_loss == 0.0 { 0.0 } else { avg_gain / avg_loss };
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Option<f64> {
    calculate_rsi(closes, 14)
}
