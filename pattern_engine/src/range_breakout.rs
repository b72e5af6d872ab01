use data_engine::{group_candles_by_day, is_after_time, is_in_time_window, sort_candles, Candle};
use serde::Deserialize;
use tracing::debug;

use crate::annotation::{DayLevel, DayPatternOutput, Marker};

pub const BREAKOUT_TEXT: &str = "Breakout";
pub const BREAKDOWN_TEXT: &str = "Breakdown";

/// Opening window, `[start, end)` in exchange-local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeBreakoutConfig {
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

impl Default for RangeBreakoutConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            start_minute: 30,
            end_hour: 10,
            end_minute: 0,
        }
    }
}

impl RangeBreakoutConfig {
    fn in_window(&self, ts: i64) -> bool {
        is_in_time_window(ts, self.start_hour, self.start_minute, self.end_hour, self.end_minute)
    }

    fn after_window(&self, ts: i64) -> bool {
        is_after_time(ts, self.end_hour, self.end_minute)
    }
}

/// Opening-range levels per day with the first breakout above and the first
/// breakdown below, each found independently among bars after the window.
///
/// A day is skipped when its window or post-window segment is empty, or when
/// the segment starts and ends on the same timestamp.
pub fn detect_range_breakouts(candles: &[Candle], config: &RangeBreakoutConfig) -> DayPatternOutput {
    let mut out = DayPatternOutput::default();

    for (date, mut bars) in group_candles_by_day(candles) {
        sort_candles(&mut bars);

        let range: Vec<&Candle> = bars.iter().filter(|c| config.in_window(c.time)).collect();
        let post: Vec<&Candle> = bars.iter().filter(|c| config.after_window(c.time)).collect();

        let (Some(first_post), Some(last_post)) = (post.first(), post.last()) else {
            debug!(%date, "no bars after opening range");
            continue;
        };
        if range.is_empty() {
            debug!(%date, "opening range window is empty");
            continue;
        }
        if first_post.time == last_post.time {
            debug!(%date, time = first_post.time, "post-range segment has zero length");
            continue;
        }

        let high = range.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = range.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        if let Some(bar) = post.iter().find(|c| c.close > high) {
            out.markers.push(Marker::bullish(bar.time, BREAKOUT_TEXT));
        }
        if let Some(bar) = post.iter().find(|c| c.close < low) {
            out.markers.push(Marker::bearish(bar.time, BREAKDOWN_TEXT));
        }

        out.levels.push(DayLevel {
            high,
            low,
            date,
            start_time: first_post.time,
            end_time: last_post.time,
        });
    }

    out.markers.sort_by_key(|m| m.time);
    out
}
