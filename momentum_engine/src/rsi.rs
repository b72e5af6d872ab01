use data_engine::{Candle, Point};
use tracing::debug;

/// Relative strength substituted when the average loss is zero.
pub const RS_WHEN_NO_LOSS: f64 = 100.0;

/// Relative Strength Index over closes, Wilder smoothing.
///
/// Average gain/loss are seeded with the simple mean of the first `period`
/// close-to-close changes, then follow `avg = (avg * (period - 1) + new) / period`.
/// The first point is stamped with the candle that completes the seed window,
/// so the output has `candles.len() - period` points.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Vec<Point> {
    if period == 0 || candles.len() < period + 1 {
        debug!(len = candles.len(), period, "not enough candles for RSI");
        return Vec::new();
    }

    let p = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for w in candles[..=period].windows(2) {
        let (gain, loss) = gain_loss(w[1].close - w[0].close);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= p;
    avg_loss /= p;

    let mut out = Vec::with_capacity(candles.len() - period);
    out.push(Point::new(candles[period].time, rsi_value(avg_gain, avg_loss)));

    for i in (period + 1)..candles.len() {
        let (gain, loss) = gain_loss(candles[i].close - candles[i - 1].close);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out.push(Point::new(candles[i].time, rsi_value(avg_gain, avg_loss)));
    }

    out
}

fn gain_loss(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        RS_WHEN_NO_LOSS
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
