//! Moving averages over an already-derived line series.
//!
//! Gap points (`value == None`) are skipped; the output only ever contains
//! points that had a full window of real samples behind them.

use data_engine::Point;

fn samples(points: &[Point]) -> Vec<(i64, f64)> {
    points
        .iter()
        .filter_map(|p| p.value.map(|v| (p.time, v)))
        .collect()
}

/// Exponential moving average, seeded with the simple mean of the first
/// `period` samples and smoothed with `k = 2 / (period + 1)`.
///
/// The first point carries the time of sample `period - 1`.
pub fn calculate_ema_series(points: &[Point], period: usize) -> Vec<Point> {
    let samples = samples(points);
    if period == 0 || samples.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = samples[..period].iter().map(|(_, v)| v).sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(samples.len() - period + 1);
    out.push(Point::new(samples[period - 1].0, seed));

    let mut prev = seed;
    for &(time, value) in &samples[period..] {
        prev = value * k + prev * (1.0 - k);
        out.push(Point::new(time, prev));
    }

    out
}

/// Linear-weighted moving average, weights `1..=period` with the most recent
/// sample heaviest, divided by `period * (period + 1) / 2`.
pub fn calculate_wma_series(points: &[Point], period: usize) -> Vec<Point> {
    let samples = samples(points);
    if period == 0 || samples.len() < period {
        return Vec::new();
    }

    let divisor = (period * (period + 1)) as f64 / 2.0;

    samples
        .windows(period)
        .map(|window| {
            let weighted: f64 = window
                .iter()
                .enumerate()
                .map(|(j, (_, v))| v * (j + 1) as f64)
                .sum();
            let time = window[period - 1].0;
            Point::new(time, weighted / divisor)
        })
        .collect()
}
