use serde::Serialize;
use std::fmt;

use crate::data_engine::Candle;

/// Direction of a single candle body.
///
/// A doji (`close == open`) counts as bullish, matching how volume bars and
/// buy/sell attribution color an unchanged bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    Bullish,
    Bearish,
}

impl CandleDirection {
    pub fn of(candle: &Candle) -> Self {
        if candle.close >= candle.open {
            CandleDirection::Bullish
        } else {
            CandleDirection::Bearish
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandleDirection::Bullish => "bullish",
            CandleDirection::Bearish => "bearish",
        }
    }
}

impl fmt::Display for CandleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_bullish(candle: &Candle) -> bool {
    CandleDirection::of(candle) == CandleDirection::Bullish
}

/// Strictly red: `close < open`.
pub fn is_red(candle: &Candle) -> bool {
    candle.close < candle.open
}

/// Stable sort by `time`, for callers that cannot guarantee ordered input.
pub fn sort_candles(candles: &mut [Candle]) {
    candles.sort_by_key(|c| c.time);
}
