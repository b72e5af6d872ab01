use data_engine::{sanitize_volume, Candle, Point};
use tracing::debug;

pub const DEFAULT_VOLUME_MA_PERIOD: usize = 20;

/// Simple trailing mean of volume. The first point sits at index
/// `period - 1`; nothing is emitted for shorter history. Unusable volumes
/// count as zero.
pub fn calculate_volume_ma(candles: &[Candle], period: usize) -> Vec<Point> {
    if period == 0 || candles.len() < period {
        debug!(len = candles.len(), period, "not enough candles for volume MA");
        return Vec::new();
    }

    candles
        .windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|c| sanitize_volume(c.volume)).sum();
            Point::new(window[period - 1].time, sum / period as f64)
        })
        .collect()
}

/// Mean volume of the up-to-`period` bars ending at `idx`.
pub(crate) fn trailing_mean_volume(candles: &[Candle], idx: usize, period: usize) -> f64 {
    let len = period.min(idx + 1);
    if len == 0 {
        return 0.0;
    }
    let start = idx + 1 - len;
    candles[start..=idx]
        .iter()
        .map(|c| sanitize_volume(c.volume))
        .sum::<f64>() / len as f64
}
