//! Volume bars highlighted when volume spikes against its recent average.

use data_engine::{is_bullish, sanitize_volume, Candle, CsvRecord, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::volume_bars::VolumeBar;
use crate::volume_ma::{calculate_volume_ma, trailing_mean_volume, DEFAULT_VOLUME_MA_PERIOD};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhancedVolumeColors {
    pub normal_up: String,
    pub normal_down: String,
    pub high_up: String,
    pub high_down: String,
}

impl Default for EnhancedVolumeColors {
    fn default() -> Self {
        Self {
            normal_up: "#26a69a80".to_string(),
            normal_down: "#ef535080".to_string(),
            high_up: "#00e676".to_string(),
            high_down: "#ff1744".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhancedVolumeConfig {
    pub ma_period: usize,
    /// `volume / average` at or above this marks a high-volume bar.
    pub threshold: f64,
    pub colors: EnhancedVolumeColors,
}

impl Default for EnhancedVolumeConfig {
    fn default() -> Self {
        Self {
            ma_period: DEFAULT_VOLUME_MA_PERIOD,
            threshold: 1.5,
            colors: EnhancedVolumeColors::default(),
        }
    }
}

/// Per-bar relative volume, for tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAnalysis {
    pub time: i64,
    pub volume: f64,
    pub avg_volume: f64,
    pub relative_volume: f64,
    pub percent_above_average: f64,
    pub is_high_volume: bool,
}

impl CsvRecord for VolumeAnalysis {
    fn headers() -> &'static [&'static str] {
        &["time", "volume", "avg_volume", "relative_volume", "percent_above_average", "is_high_volume"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.time.to_string(),
            format!("{:.6}", self.volume),
            format!("{:.6}", self.avg_volume),
            format!("{:.6}", self.relative_volume),
            format!("{:.2}", self.percent_above_average),
            self.is_high_volume.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedVolumeOutput {
    pub bars: Vec<VolumeBar>,
    pub ma: Vec<Point>,
    pub analysis: Vec<VolumeAnalysis>,
}

/// Colors every bar by direction and by whether it is a volume spike.
///
/// The average for bar `i` is the trailing mean over up to `ma_period` bars,
/// so early bars are judged against the history they have. A zero average
/// gives a relative volume of 0 and never flags a spike.
pub fn calculate_enhanced_volume(candles: &[Candle], config: &EnhancedVolumeConfig) -> EnhancedVolumeOutput {
    if candles.is_empty() || config.ma_period == 0 {
        debug!(len = candles.len(), period = config.ma_period, "nothing to analyse for enhanced volume");
        return EnhancedVolumeOutput::default();
    }

    let colors = &config.colors;
    let mut bars = Vec::with_capacity(candles.len());
    let mut analysis = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        let volume = sanitize_volume(candle.volume);
        let avg_volume = trailing_mean_volume(candles, i, config.ma_period);
        let relative_volume = if avg_volume > 0.0 {
            volume / avg_volume
        } else {
            0.0
        };
        let is_high_volume = avg_volume > 0.0 && relative_volume >= config.threshold;
        let percent_above_average = if avg_volume > 0.0 {
            (relative_volume - 1.0) * 100.0
        } else {
            0.0
        };

        let color = match (is_high_volume, is_bullish(candle)) {
            (true, true) => &colors.high_up,
            (true, false) => &colors.high_down,
            (false, true) => &colors.normal_up,
            (false, false) => &colors.normal_down,
        };

        bars.push(VolumeBar {
            time: candle.time,
            value: volume,
            color: color.clone(),
        });
        analysis.push(VolumeAnalysis {
            time: candle.time,
            volume,
            avg_volume,
            relative_volume,
            percent_above_average,
            is_high_volume,
        });
    }

    EnhancedVolumeOutput {
        bars,
        ma: calculate_volume_ma(candles, config.ma_period),
        analysis,
    }
}
