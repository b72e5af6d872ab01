use data_engine::{Candle, Exchange, Point};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::price_source::PriceSource;
use crate::session::{sanitize_volume, ResetMode, SessionTracker, VwapAccumulator};

/// Standard session VWAP configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VwapConfig {
    pub source: PriceSource,
    /// Start over at every session boundary.
    pub reset_daily: bool,
    /// Place the boundary at the exchange's market open instead of midnight,
    /// so evening commodity sessions stay in one piece. Only consulted when
    /// `reset_daily` is set.
    pub reset_at_market_open: bool,
    pub exchange: Exchange,
    /// Equal-weight mode: every bar counts as volume 1.
    pub ignore_volume: bool,
}

impl Default for VwapConfig {
    fn default() -> Self {
        Self {
            source: PriceSource::Hlc3,
            reset_daily: true,
            reset_at_market_open: false,
            exchange: Exchange::Nse,
            ignore_volume: false,
        }
    }
}

impl VwapConfig {
    pub fn reset_mode(&self) -> ResetMode {
        match (self.reset_daily, self.reset_at_market_open) {
            (false, _) => ResetMode::Never,
            (true, false) => ResetMode::CalendarDay,
            (true, true) => ResetMode::MarketOpen(self.exchange.market_open_minutes()),
        }
    }

    fn weight(&self, candle: &Candle) -> f64 {
        if self.ignore_volume {
            1.0
        } else {
            sanitize_volume(candle.volume)
        }
    }
}

/// One VWAP point per candle.
///
/// While the session has no volume yet the bar's own price stands in; a
/// zero-volume bar later in the session leaves the sums untouched and so
/// repeats the prior VWAP.
pub fn calculate_vwap(candles: &[Candle], config: &VwapConfig) -> Vec<Point> {
    if candles.is_empty() {
        debug!("no candles for VWAP");
        return Vec::new();
    }

    let mut tracker = SessionTracker::new(config.reset_mode());
    let mut acc = VwapAccumulator::default();

    candles
        .iter()
        .map(|candle| {
            if tracker.is_new_session(candle.time) {
                trace!(time = candle.time, "VWAP session reset");
                acc.reset();
            }

            let price = config.source.extract(candle);
            acc.add(price, config.weight(candle));
            Point::new(candle.time, acc.vwap().unwrap_or(price))
        })
        .collect()
}

pub fn calculate_vwap_latest(candles: &[Candle], config: &VwapConfig) -> Option<f64> {
    calculate_vwap(candles, config).last().and_then(|p| p.value)
}
