//! Per-day chart annotations: first bearish candle and opening-range breaks.

pub mod annotation;
pub mod first_red_candle;
pub mod range_breakout;

pub use crate::annotation::{
    DayLevel, DayPatternOutput, Marker, MarkerPosition, MarkerShape, BEARISH_COLOR, BULLISH_COLOR,
};
pub use crate::first_red_candle::{detect_first_red_candles, FIRST_RED_TEXT};
pub use crate::range_breakout::{detect_range_breakouts, RangeBreakoutConfig, BREAKDOWN_TEXT, BREAKOUT_TEXT};
