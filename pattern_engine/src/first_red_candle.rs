use data_engine::{group_candles_by_day, is_market_hours, is_red, sort_candles, Candle};
use tracing::debug;

use crate::annotation::{DayLevel, DayPatternOutput, Marker};

pub const FIRST_RED_TEXT: &str = "First Red";

/// Per trading day, the first market-hours candle with `close < open`.
///
/// Its high/low become a level running to the day's last market-hours bar.
/// Days without a red candle produce nothing.
pub fn detect_first_red_candles(candles: &[Candle]) -> DayPatternOutput {
    let mut out = DayPatternOutput::default();

    for (date, bars) in group_candles_by_day(candles) {
        let mut session: Vec<Candle> = bars.into_iter().filter(|c| is_market_hours(c.time)).collect();
        sort_candles(&mut session);

        let (Some(red), Some(last)) = (session.iter().find(|c| is_red(c)), session.last()) else {
            debug!(%date, "no red candle in session");
            continue;
        };

        out.levels.push(DayLevel {
            high: red.high,
            low: red.low,
            date,
            start_time: red.time,
            end_time: last.time,
        });
        out.markers.push(Marker::bearish(red.time, FIRST_RED_TEXT));
    }

    out.markers.sort_by_key(|m| m.time);
    out
}
