use data_engine::{trading_date, Candle, Point};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::price_source::PriceSource;
use crate::session::{sanitize_volume, ResetMode, SessionTracker, VwapAccumulator};

/// Where anchored accumulation begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Anchor {
    /// First candle at or after `time`.
    Timestamp { time: i64 },
    /// Candle with the dataset's highest high.
    HighestHigh,
    /// Candle with the dataset's lowest low.
    LowestLow,
    /// First candle of the calendar day of the last candle.
    #[default]
    SessionStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchoredVwapConfig {
    pub anchor: Anchor,
    pub source: PriceSource,
    pub reset_daily: bool,
}

impl Default for AnchoredVwapConfig {
    fn default() -> Self {
        Self {
            anchor: Anchor::SessionStart,
            source: PriceSource::Hlc3,
            reset_daily: false,
        }
    }
}

/// Index of the anchor candle, `None` when the anchor matches nothing.
pub fn find_anchor_index(candles: &[Candle], anchor: Anchor) -> Option<usize> {
    match anchor {
        Anchor::Timestamp { time } => candles.iter().position(|c| c.time >= time),
        Anchor::HighestHigh => extreme_index(candles, |c| c.high, |a, b| a > b),
        Anchor::LowestLow => extreme_index(candles, |c| c.low, |a, b| a < b),
        Anchor::SessionStart => {
            let last_day = trading_date(candles.last()?.time)?;
            candles
                .iter()
                .position(|c| trading_date(c.time) == Some(last_day))
        }
    }
}

/// First index whose value beats every earlier one. NaNs never win.
fn extreme_index(
    candles: &[Candle],
    value: impl Fn(&Candle) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candle) in candles.iter().enumerate() {
        let v = value(candle);
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// VWAP accumulated from the anchor onwards; earlier points are gaps.
/// An anchor that matches nothing falls back to the start of the data.
pub fn calculate_anchored_vwap(candles: &[Candle], config: &AnchoredVwapConfig) -> Vec<Point> {
    if candles.is_empty() {
        debug!("no candles for anchored VWAP");
        return Vec::new();
    }

    let anchor_idx = find_anchor_index(candles, config.anchor).unwrap_or(0);
    debug!(anchor_idx, anchor = ?config.anchor, "anchored VWAP anchor resolved");

    let mode = if config.reset_daily {
        ResetMode::CalendarDay
    } else {
        ResetMode::Never
    };
    let mut tracker = SessionTracker::new(mode);
    let mut acc = VwapAccumulator::default();

    let mut out: Vec<Point> = candles[..anchor_idx].iter().map(|c| Point::gap(c.time)).collect();
    out.reserve(candles.len() - anchor_idx);

    for candle in &candles[anchor_idx..] {
        if tracker.is_new_session(candle.time) {
            trace!(time = candle.time, "anchored VWAP session reset");
            acc.reset();
        }
        let price = config.source.extract(candle);
        acc.add(price, sanitize_volume(candle.volume));
        out.push(Point::new(candle.time, acc.vwap().unwrap_or(price)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 1_705_276_800;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(DAY + 33_300, 100.0, 101.0, 99.0, 100.0, 10.0),
            Candle::new(DAY + 33_600, 100.0, 110.0, 98.0, 104.0, 10.0),
            Candle::new(DAY + 33_900, 104.0, 105.0, 90.0, 95.0, 10.0),
            Candle::new(DAY + 86_400 + 33_300, 95.0, 97.0, 93.0, 96.0, 10.0),
            Candle::new(DAY + 86_400 + 33_600, 96.0, 99.0, 95.0, 98.0, 30.0),
        ]
    }

    #[test]
    fn finds_each_anchor_kind() {
        let data = candles();
        assert_eq!(find_anchor_index(&data, Anchor::HighestHigh), Some(1));
        assert_eq!(find_anchor_index(&data, Anchor::LowestLow), Some(2));
        assert_eq!(find_anchor_index(&data, Anchor::SessionStart), Some(3));
        assert_eq!(find_anchor_index(&data, Anchor::Timestamp { time: DAY + 33_500 }), Some(1));
        assert_eq!(find_anchor_index(&data, Anchor::Timestamp { time: DAY + 10 * 86_400 }), None);
    }

    #[test]
    fn points_before_anchor_are_gaps() {
        let config = AnchoredVwapConfig {
            anchor: Anchor::SessionStart,
            source: PriceSource::Close,
            ..Default::default()
        };
        let out = calculate_anchored_vwap(&candles(), &config);

        assert_eq!(out.len(), 5);
        assert!(out[..3].iter().all(|p| p.value.is_none()));
        assert_eq!(out[3].value, Some(96.0));
        assert_eq!(out[4].value, Some((960.0 + 2_940.0) / 40.0));
    }

    #[test]
    fn unmatched_anchor_starts_at_beginning() {
        let config = AnchoredVwapConfig {
            anchor: Anchor::Timestamp { time: DAY + 10 * 86_400 },
            source: PriceSource::Close,
            ..Default::default()
        };
        let out = calculate_anchored_vwap(&candles(), &config);
        assert_eq!(out[0].value, Some(100.0));
        assert!(out.iter().all(|p| p.value.is_some()));
    }

    #[test]
    fn honours_daily_reset_after_anchor() {
        let config = AnchoredVwapConfig {
            anchor: Anchor::HighestHigh,
            source: PriceSource::Close,
            reset_daily: true,
        };
        let out = calculate_anchored_vwap(&candles(), &config);
        assert!(out[0].value.is_none());
        assert_eq!(out[1].value, Some(104.0));
        assert_eq!(out[3].value, Some(96.0));
    }

    #[test]
    fn anchor_parses_from_json() {
        let config: AnchoredVwapConfig =
            serde_json::from_str(r#"{"anchor":{"type":"timestamp","time":42}}"#).unwrap();
        assert_eq!(config.anchor, Anchor::Timestamp { time: 42 });

        let config: AnchoredVwapConfig = serde_json::from_str(r#"{"anchor":{"type":"lowestLow"}}"#).unwrap();
        assert_eq!(config.anchor, Anchor::LowestLow);
    }
}
