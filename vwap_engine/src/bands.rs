use data_engine::{Candle, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::price_source::PriceSource;
use crate::session::{sanitize_volume, ResetMode, SessionTracker, VwapAccumulator};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VwapBandsConfig {
    pub source: PriceSource,
    pub reset_daily: bool,
    /// Width of the outer band in standard deviations.
    pub multiplier: f64,
}

impl Default for VwapBandsConfig {
    fn default() -> Self {
        Self {
            source: PriceSource::Hlc3,
            reset_daily: true,
            multiplier: 2.0,
        }
    }
}

/// VWAP with a ±1σ inner band and a ±multiplier·σ outer band.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VwapBandsOutput {
    pub vwap: Vec<Point>,
    pub upper_1sd: Vec<Point>,
    pub lower_1sd: Vec<Point>,
    pub upper_band: Vec<Point>,
    pub lower_band: Vec<Point>,
}

pub fn calculate_vwap_bands(candles: &[Candle], config: &VwapBandsConfig) -> VwapBandsOutput {
    if candles.is_empty() {
        debug!("no candles for VWAP bands");
        return VwapBandsOutput::default();
    }

    let mode = if config.reset_daily {
        ResetMode::CalendarDay
    } else {
        ResetMode::Never
    };
    let mut tracker = SessionTracker::new(mode);
    let mut acc = VwapAccumulator::default();
    let mut out = VwapBandsOutput::default();

    for candle in candles {
        if tracker.is_new_session(candle.time) {
            trace!(time = candle.time, "VWAP bands session reset");
            acc.reset();
        }

        let price = config.source.extract(candle);
        acc.add(price, sanitize_volume(candle.volume));

        let vwap = acc.vwap().unwrap_or(price);
        let sd = acc.std_dev().unwrap_or(0.0);
        let wide = sd * config.multiplier;
        let t = candle.time;

        out.vwap.push(Point::new(t, vwap));
        out.upper_1sd.push(Point::new(t, vwap + sd));
        out.lower_1sd.push(Point::new(t, vwap - sd));
        out.upper_band.push(Point::new(t, vwap + wide));
        out.lower_band.push(Point::new(t, vwap - wide));
    }

    out
}
