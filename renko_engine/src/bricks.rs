//! Close-driven Renko construction.
//!
//! Bricks carry synthetic timestamps `base_time + brick_index`, not the time
//! of the candle that produced them, so any number of bricks from one candle
//! still form a strictly increasing series.

use data_engine::{Candle, CsvRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brick_size::{auto_brick_size, DEFAULT_ATR_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenkoBrick {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl RenkoBrick {
    fn new(time: i64, open: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
        }
    }

    pub fn direction(&self) -> BrickDirection {
        if self.close >= self.open {
            BrickDirection::Up
        } else {
            BrickDirection::Down
        }
    }
}

impl CsvRecord for RenkoBrick {
    fn headers() -> &'static [&'static str] {
        &["time", "open", "high", "low", "close"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.time.to_string(),
            format!("{:.6}", self.open),
            format!("{:.6}", self.high),
            format!("{:.6}", self.low),
            format!("{:.6}", self.close),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenkoConfig {
    /// Fixed brick size; derived from the ATR when absent.
    pub brick_size: Option<f64>,
    pub atr_period: usize,
    /// First synthetic timestamp; the first candle's time when absent.
    pub base_time: Option<i64>,
}

impl Default for RenkoConfig {
    fn default() -> Self {
        Self {
            brick_size: None,
            atr_period: DEFAULT_ATR_PERIOD,
            base_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenkoOutput {
    /// Size actually used, `None` when none could be resolved.
    pub brick_size: Option<f64>,
    pub bricks: Vec<RenkoBrick>,
}

/// Slack, in brick units, absorbed when converting a price move into a brick
/// count. `1.2 - 1.0` is not exactly two bricks of `0.1` in binary.
const BRICK_EPSILON: f64 = 1e-9;

/// Largest close-price range, in bricks, a size may span. Smaller sizes are
/// rejected rather than emitting an unbounded number of bricks.
pub const MAX_BRICK_SPAN: f64 = 100_000.0;

/// Bricks are tracked by integer level; the brick price is always
/// `level * size`, never a running sum.
struct RenkoBuilder {
    size: f64,
    level: i64,
    direction: Option<BrickDirection>,
    base_time: i64,
    bricks: Vec<RenkoBrick>,
}

impl RenkoBuilder {
    fn new(size: f64, first_close: f64, base_time: i64) -> Self {
        Self {
            size,
            level: (first_close / size + BRICK_EPSILON).floor() as i64,
            direction: None,
            base_time,
            bricks: Vec::new(),
        }
    }

    fn price(&self, level: i64) -> f64 {
        level as f64 * self.size
    }

    fn emit(&mut self, from: i64, to: i64) {
        let time = self.base_time + self.bricks.len() as i64;
        self.bricks.push(RenkoBrick::new(time, self.price(from), self.price(to)));
    }

    fn step_up(&mut self, count: i64) {
        for _ in 0..count {
            self.emit(self.level, self.level + 1);
            self.level += 1;
        }
        self.direction = Some(BrickDirection::Up);
    }

    fn step_down(&mut self, count: i64) {
        for _ in 0..count {
            self.emit(self.level, self.level - 1);
            self.level -= 1;
        }
        self.direction = Some(BrickDirection::Down);
    }

    fn feed(&mut self, close: f64) {
        let moved = close / self.size - self.level as f64;
        let up = (moved + BRICK_EPSILON).floor() as i64;
        let down = (-moved + BRICK_EPSILON).floor() as i64;

        match self.direction {
            None if up >= 1 => self.step_up(up),
            None if down >= 1 => self.step_down(down),
            Some(BrickDirection::Up) if up >= 1 => self.step_up(up),
            Some(BrickDirection::Up) if down >= 2 => {
                // reversal bricks start from the bottom of the last up brick
                self.level -= 1;
                self.step_down(down - 1);
            }
            Some(BrickDirection::Down) if down >= 1 => self.step_down(down),
            Some(BrickDirection::Down) if up >= 2 => {
                self.level += 1;
                self.step_up(up - 1);
            }
            _ => {}
        }
    }
}

fn close_range(candles: &[Candle]) -> f64 {
    let (min, max) = candles
        .iter()
        .filter(|c| c.close.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c.close), hi.max(c.close)));
    if max >= min {
        max - min
    } else {
        0.0
    }
}

fn usable_size(size: f64, candles: &[Candle]) -> Option<f64> {
    if !size.is_finite() || size <= 0.0 {
        return None;
    }
    let span = close_range(candles) / size;
    if span > MAX_BRICK_SPAN {
        debug!(size, span, max = MAX_BRICK_SPAN, "brick size too small for the price range");
        return None;
    }
    Some(size)
}

/// Build Renko bricks from candle closes.
///
/// Non-empty input always yields at least one brick: when price never moves a
/// full brick, a single brick from the first close to the last close is
/// returned. That brick exists so charts have something to draw; it does not
/// follow Renko rules. The same brick is returned when the size is unusable:
/// non-positive, non-finite, or more than [`MAX_BRICK_SPAN`] bricks across
/// the close range.
pub fn calculate_renko(candles: &[Candle], config: &RenkoConfig) -> RenkoOutput {
    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        debug!("no candles for Renko");
        return RenkoOutput::default();
    };

    let base_time = config.base_time.unwrap_or(first.time);
    let size = match config.brick_size {
        Some(size) => usable_size(size, candles),
        None => auto_brick_size(candles, config.atr_period).and_then(|size| usable_size(size, candles)),
    };

    let origin = candles.iter().map(|c| c.close).find(|c| c.is_finite());
    let mut bricks = match (size, origin) {
        (Some(size), Some(origin)) => {
            let mut builder = RenkoBuilder::new(size, origin, base_time);
            for candle in candles.iter().filter(|c| c.close.is_finite()) {
                builder.feed(candle.close);
            }
            builder.bricks
        }
        _ => {
            debug!(requested = ?config.brick_size, "no usable brick size");
            Vec::new()
        }
    };

    if bricks.is_empty() {
        debug!(len = candles.len(), "price never moved a full brick, emitting summary brick");
        bricks.push(RenkoBrick::new(base_time, first.close, last.close));
    }

    RenkoOutput {
        brick_size: size,
        bricks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(values: &[f64]) -> Vec<Candle> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(1_000 + i as i64 * 60, c, c, c, c, 1.0))
            .collect()
    }

    fn fixed(size: f64) -> RenkoConfig {
        RenkoConfig {
            brick_size: Some(size),
            ..Default::default()
        }
    }

    #[test]
    fn builds_up_bricks_from_aligned_price() {
        let out = calculate_renko(&closes(&[103.0, 125.0]), &fixed(10.0));

        assert_eq!(out.brick_size, Some(10.0));
        assert_eq!(out.bricks.len(), 2);
        assert_eq!(out.bricks[0], RenkoBrick::new(1_000, 100.0, 110.0));
        assert_eq!(out.bricks[1], RenkoBrick::new(1_001, 110.0, 120.0));
    }

    #[test]
    fn half_reversal_is_ignored() {
        let out = calculate_renko(&closes(&[100.0, 120.0, 105.0]), &fixed(10.0));
        assert_eq!(out.bricks.len(), 2);
        assert!(out.bricks.iter().all(|b| b.direction() == BrickDirection::Up));
    }

    #[test]
    fn double_brick_drop_reverses_once() {
        let out = calculate_renko(&closes(&[100.0, 120.0, 100.0]), &fixed(10.0));

        assert_eq!(out.bricks.len(), 3);
        let last = out.bricks[2];
        assert_eq!(last.direction(), BrickDirection::Down);
        assert_eq!((last.open, last.close), (110.0, 100.0));
    }

    #[test]
    fn downtrend_continues_and_reverses_up() {
        let out = calculate_renko(&closes(&[100.0, 70.0, 60.0, 75.0, 85.0]), &fixed(10.0));
        let dirs: Vec<BrickDirection> = out.bricks.iter().map(|b| b.direction()).collect();

        use BrickDirection::*;
        // 100->70: three down; 60: one more; 75 is only 1.5 bricks up; 85 reverses
        assert_eq!(dirs, vec![Down, Down, Down, Down, Up]);
        assert_eq!((out.bricks[4].open, out.bricks[4].close), (70.0, 80.0));
    }

    #[test]
    fn timestamps_strictly_increase() {
        let values: Vec<f64> = (0..300)
            .map(|i| 1_000.0 + ((i * 37) % 101) as f64 * 3.0 - ((i * 13) % 17) as f64 * 7.0)
            .collect();
        let out = calculate_renko(&closes(&values), &RenkoConfig::default());

        assert!(!out.bricks.is_empty());
        assert!(out.bricks.windows(2).all(|w| w[1].time > w[0].time));
    }

    #[test]
    fn quiet_market_yields_summary_brick() {
        let out = calculate_renko(&closes(&[100.0, 103.0, 98.5, 101.0]), &fixed(10.0));
        assert_eq!(out.bricks, vec![RenkoBrick::new(1_000, 100.0, 101.0)]);

        let flat = calculate_renko(&closes(&[50.0, 50.0]), &RenkoConfig::default());
        assert_eq!(flat.brick_size, None);
        assert_eq!(flat.bricks.len(), 1);
    }

    #[test]
    fn rejects_bad_sizes_without_looping() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let out = calculate_renko(&closes(&[100.0, 200.0]), &fixed(size));
            assert_eq!(out.brick_size, None);
            assert_eq!(out.bricks.len(), 1);
        }
    }

    fn assert_brick(brick: &RenkoBrick, open: f64, close: f64) {
        assert!(
            (brick.open - open).abs() < 1e-9 && (brick.close - close).abs() < 1e-9,
            "expected {open}->{close}, got {brick:?}"
        );
    }

    #[test]
    fn decimal_size_counts_exact_moves() {
        let out = calculate_renko(&closes(&[1.0, 1.2]), &fixed(0.1));
        assert_eq!(out.bricks.len(), 2);
        assert_brick(&out.bricks[0], 1.0, 1.1);
        assert_brick(&out.bricks[1], 1.1, 1.2);

        let out = calculate_renko(&closes(&[100.0, 100.1]), &fixed(0.05));
        assert_eq!(out.bricks.len(), 2);
        assert_brick(&out.bricks[1], 100.05, 100.1);

        // level stays exact over a long walk
        let walk: Vec<f64> = (0..=300).map(|i| 1.0 + i as f64 * 0.1).collect();
        let out = calculate_renko(&closes(&walk), &fixed(0.1));
        assert_eq!(out.bricks.len(), 300);
        assert_brick(&out.bricks[299], 30.9, 31.0);
    }

    #[test]
    fn decimal_size_reversal_thresholds() {
        let shallow = calculate_renko(&closes(&[1.0, 1.2, 1.05]), &fixed(0.1));
        assert_eq!(shallow.bricks.len(), 2);

        let deep = calculate_renko(&closes(&[1.0, 1.2, 1.0]), &fixed(0.1));
        assert_eq!(deep.bricks.len(), 3);
        assert_eq!(deep.bricks[2].direction(), BrickDirection::Down);
        assert_brick(&deep.bricks[2], 1.1, 1.0);

        let shallow = calculate_renko(&closes(&[100.0, 100.1, 100.025]), &fixed(0.05));
        assert_eq!(shallow.bricks.len(), 2);

        let deep = calculate_renko(&closes(&[100.0, 100.1, 100.0]), &fixed(0.05));
        assert_eq!(deep.bricks.len(), 3);
        assert_brick(&deep.bricks[2], 100.05, 100.0);

        let up = calculate_renko(&closes(&[100.0, 99.9, 100.0]), &fixed(0.05));
        let dirs: Vec<BrickDirection> = up.bricks.iter().map(|b| b.direction()).collect();
        assert_eq!(dirs, vec![BrickDirection::Down, BrickDirection::Down, BrickDirection::Up]);
    }

    #[test]
    fn tiny_size_is_rejected() {
        let out = calculate_renko(&closes(&[100.0, 1_100.0]), &fixed(1e-9));
        assert_eq!(out.brick_size, None);
        assert_eq!(out.bricks.len(), 1);

        // at the limit the bricks are still built
        let out = calculate_renko(&closes(&[0.0, 10.0]), &fixed(10.0 / MAX_BRICK_SPAN));
        assert_eq!(out.bricks.len(), MAX_BRICK_SPAN as usize);
    }

    #[test]
    fn non_finite_closes_are_skipped() {
        let out = calculate_renko(&closes(&[f64::NAN, 100.0, 120.0, f64::INFINITY]), &fixed(10.0));
        assert_eq!(out.brick_size, Some(10.0));
        assert_eq!(out.bricks.len(), 2);
        assert_brick(&out.bricks[1], 110.0, 120.0);
    }

    #[test]
    fn base_time_override() {
        let config = RenkoConfig {
            brick_size: Some(10.0),
            base_time: Some(0),
            ..Default::default()
        };
        let out = calculate_renko(&closes(&[100.0, 130.0]), &config);
        let times: Vec<i64> = out.bricks.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![0, 1, 2]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(calculate_renko(&[], &RenkoConfig::default()).bricks.is_empty());
    }
}
