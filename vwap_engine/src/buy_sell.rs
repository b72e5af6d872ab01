//! Approximate aggressor-side VWAPs.
//!
//! Without tick data the buy and sell volume of a bar are guessed from its
//! direction: the winning side gets the full bar volume and the losing side
//! [`OPPOSING_SIDE_FACTOR`] of it. The factor is an undocumented heuristic
//! kept for parity with existing charts, not a derived quantity.

use data_engine::{is_bullish, Candle, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::session::{sanitize_volume, ResetMode, SessionTracker, VwapAccumulator};

pub const OPPOSING_SIDE_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuySellVwapConfig {
    pub reset_daily: bool,
}

impl Default for BuySellVwapConfig {
    fn default() -> Self {
        Self { reset_daily: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySellVwapOutput {
    pub buy: Vec<Point>,
    pub sell: Vec<Point>,
}

/// Buy and sell volume of a bar, explicit fields first.
pub fn attribute_volume(candle: &Candle) -> (f64, f64) {
    let volume = sanitize_volume(candle.volume);
    let (buy_guess, sell_guess) = if is_bullish(candle) {
        (volume, volume * OPPOSING_SIDE_FACTOR)
    } else {
        (volume * OPPOSING_SIDE_FACTOR, volume)
    };

    (
        candle.buy_volume.map(sanitize_volume).unwrap_or(buy_guess),
        candle.sell_volume.map(sanitize_volume).unwrap_or(sell_guess),
    )
}

/// One side's running VWAP.
#[derive(Debug, Default)]
struct SideLine {
    acc: VwapAccumulator,
    last: Option<f64>,
    points: Vec<Point>,
}

impl SideLine {
    fn push(&mut self, time: i64, price: f64, volume: f64) {
        if volume > 0.0 {
            self.acc.add(price, volume);
            self.last = self.acc.vwap();
        }
        // zero attributed volume repeats the last value, if any
        if let Some(value) = self.last {
            self.points.push(Point::new(time, value));
        }
    }
}

pub fn calculate_buy_sell_vwap(candles: &[Candle], config: &BuySellVwapConfig) -> BuySellVwapOutput {
    if candles.is_empty() {
        debug!("no candles for buy/sell VWAP");
        return BuySellVwapOutput::default();
    }

    let mode = if config.reset_daily {
        ResetMode::CalendarDay
    } else {
        ResetMode::Never
    };
    let mut tracker = SessionTracker::new(mode);
    let mut buy = SideLine::default();
    let mut sell = SideLine::default();

    for candle in candles {
        if tracker.is_new_session(candle.time) {
            trace!(time = candle.time, "buy/sell VWAP session reset");
            buy.acc.reset();
            sell.acc.reset();
        }

        let (buy_volume, sell_volume) = attribute_volume(candle);
        buy.push(candle.time, candle.buy_vwap.unwrap_or(candle.high), buy_volume);
        sell.push(candle.time, candle.sell_vwap.unwrap_or(candle.low), sell_volume);
    }

    BuySellVwapOutput {
        buy: buy.points,
        sell: sell.points,
    }
}
