//! Hilenga-Milenga: RSI with an EMA and a WMA of the RSI line.

use data_engine::{Candle, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::rsi::calculate_rsi;
use crate::smoothing::{calculate_ema_series, calculate_wma_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HilengaMilengaConfig {
    pub rsi_length: usize,
    pub ema_length: usize,
    pub wma_length: usize,
}

impl Default for HilengaMilengaConfig {
    fn default() -> Self {
        Self {
            rsi_length: 9,
            ema_length: 3,
            wma_length: 21,
        }
    }
}

impl HilengaMilengaConfig {
    /// Fewest candles that produce any output.
    pub fn min_candles(&self) -> usize {
        self.rsi_length.max(self.wma_length) + 1
    }
}

/// The three lines. `ema[i]` lines up with `rsi[i + ema_offset]`, and
/// likewise for `wma`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HilengaMilengaOutput {
    pub rsi: Vec<Point>,
    pub ema: Vec<Point>,
    pub wma: Vec<Point>,
    #[serde(skip)]
    pub ema_offset: usize,
    #[serde(skip)]
    pub wma_offset: usize,
}

/// One RSI bar with whichever smoothed values exist at that bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumRow {
    pub time: i64,
    pub rsi: Option<f64>,
    pub ema: Option<f64>,
    pub wma: Option<f64>,
}

impl HilengaMilengaOutput {
    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// Merge the three lines into one row per RSI point.
    pub fn aligned_rows(&self) -> Vec<MomentumRow> {
        let at = |line: &[Point], offset: usize, i: usize| {
            i.checked_sub(offset)
                .and_then(|j| line.get(j))
                .and_then(|p| p.value)
        };

        self.rsi
            .iter()
            .enumerate()
            .map(|(i, p)| MomentumRow {
                time: p.time,
                rsi: p.value,
                ema: at(&self.ema, self.ema_offset, i),
                wma: at(&self.wma, self.wma_offset, i),
            })
            .collect()
    }

    pub fn latest(&self) -> Option<MomentumSnapshot> {
        let last = self.rsi.last()?;
        let rsi = last.value?;
        Some(MomentumSnapshot {
            time: last.time,
            rsi,
            ema: self.ema.last().and_then(|p| p.value),
            wma: self.wma.last().and_then(|p| p.value),
            signal: MomentumSignal::from_rsi(rsi),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumSignal {
    Bullish,
    Bearish,
}

impl MomentumSignal {
    /// Bullish strictly above the 50 midline.
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > 50.0 {
            MomentumSignal::Bullish
        } else {
            MomentumSignal::Bearish
        }
    }
}

impl fmt::Display for MomentumSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentumSignal::Bullish => f.write_str("bullish"),
            MomentumSignal::Bearish => f.write_str("bearish"),
        }
    }
}

/// Last values of each line, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumSnapshot {
    pub time: i64,
    pub rsi: f64,
    pub ema: Option<f64>,
    pub wma: Option<f64>,
    pub signal: MomentumSignal,
}

pub fn calculate_hilenga_milenga(candles: &[Candle], config: &HilengaMilengaConfig) -> HilengaMilengaOutput {
    if config.rsi_length == 0 || config.ema_length == 0 || config.wma_length == 0 {
        debug!(?config, "zero-length period, nothing to compute");
        return HilengaMilengaOutput::default();
    }
    if candles.len() < config.min_candles() {
        debug!(len = candles.len(), need = config.min_candles(), "not enough candles for Hilenga-Milenga");
        return HilengaMilengaOutput::default();
    }

    let rsi = calculate_rsi(candles, config.rsi_length);
    let ema = calculate_ema_series(&rsi, config.ema_length);
    let wma = calculate_wma_series(&rsi, config.wma_length);

    HilengaMilengaOutput {
        rsi,
        ema,
        wma,
        ema_offset: config.ema_length - 1,
        wma_offset: config.wma_length - 1,
    }
}

pub fn calculate_hilenga_milenga_latest(
    candles: &[Candle],
    config: &HilengaMilengaConfig,
) -> Option<MomentumSnapshot> {
    calculate_hilenga_milenga(candles, config).latest()
}
