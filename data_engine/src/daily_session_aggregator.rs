use indexmap::IndexMap;
use tracing::warn;

use crate::data_engine::Candle;
use crate::session_type::date_key;

/// Candles bucketed by `YYYY-MM-DD`, days in first-seen order.
pub type DayBuckets = IndexMap<String, Vec<Candle>>;

/// Group candles by calendar day.
///
/// Each candle is appended to its day's bucket in input order; callers that
/// cannot guarantee sorted input must still sort within a day. Candles whose
/// timestamp has no calendar date are dropped.
pub fn group_candles_by_day(candles: &[Candle]) -> DayBuckets {
    let mut days: DayBuckets = IndexMap::new();

    for candle in candles {
        let Some(key) = date_key(candle.time) else {
            warn!(time = candle.time, "dropping candle with unrepresentable timestamp");
            continue;
        };
        days.entry(key).or_default().push(*candle);
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 1_705_276_800;

    fn bar(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close, close, close, 1.0)
    }

    #[test]
    fn preserves_first_seen_day_order() {
        let candles = vec![
            bar(DAY + 86_400 + 60, 2.0),
            bar(DAY + 60, 1.0),
            bar(DAY + 86_400 + 120, 3.0),
        ];
        let days = group_candles_by_day(&candles);

        let keys: Vec<&str> = days.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024-01-16", "2024-01-15"]);
        let closes: Vec<f64> = days["2024-01-16"].iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![2.0, 3.0]);
    }

    #[test]
    fn empty_input_has_no_days() {
        assert!(group_candles_by_day(&[]).is_empty());
    }
}
