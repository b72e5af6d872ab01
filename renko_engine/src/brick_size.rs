use data_engine::Candle;
use tracing::debug;

pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Share of the close-price range used when there is too little history for an ATR.
pub const RANGE_FALLBACK_FRACTION: f64 = 0.02;

const NICE_STEPS: [f64; 4] = [1.0, 2.5, 5.0, 10.0];

/// `max(high − low, |high − prev close|, |low − prev close|)` for every bar
/// after the first.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect()
}

/// Mean of the last `period` true ranges.
pub fn average_true_range(candles: &[Candle], period: usize) -> Option<f64> {
    let ranges = true_ranges(candles);
    if period == 0 || ranges.len() < period {
        return None;
    }
    Some(ranges[ranges.len() - period..].iter().sum::<f64>() / period as f64)
}

/// Snap to the nearest of 1, 2.5, 5 or 10 times the value's order of magnitude.
pub fn nice_brick_size(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }

    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = NICE_STEPS
        .iter()
        .copied()
        .min_by(|a, b| (a - normalized).abs().total_cmp(&(b - normalized).abs()))?;

    Some(step * magnitude)
}

/// Brick size derived from the ATR, or from 2% of the close range when the
/// ATR is unavailable or zero. `None` when prices never move.
pub fn auto_brick_size(candles: &[Candle], atr_period: usize) -> Option<f64> {
    let raw = match average_true_range(candles, atr_period).filter(|atr| *atr > 0.0) {
        Some(atr) => atr,
        None => {
            let (min, max) = candles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.close), hi.max(c.close))
            });
            debug!(len = candles.len(), atr_period, "ATR unavailable, sizing bricks from close range");
            (max - min) * RANGE_FALLBACK_FRACTION
        }
    };

    nice_brick_size(raw)
}
