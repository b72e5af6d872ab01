use data_engine::{is_bullish, sanitize_volume, Candle, CsvRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeColors {
    pub up: String,
    pub down: String,
}

impl Default for VolumeColors {
    fn default() -> Self {
        Self {
            up: "#26a69a".to_string(),
            down: "#ef5350".to_string(),
        }
    }
}

impl VolumeColors {
    pub fn for_candle(&self, candle: &Candle) -> &str {
        if is_bullish(candle) {
            &self.up
        } else {
            &self.down
        }
    }
}

/// A histogram bar as a charting library expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeBar {
    pub time: i64,
    pub value: f64,
    pub color: String,
}

impl CsvRecord for VolumeBar {
    fn headers() -> &'static [&'static str] {
        &["time", "value", "color"]
    }

    fn record(&self) -> Vec<String> {
        vec![self.time.to_string(), format!("{:.6}", self.value), self.color.clone()]
    }
}

/// Volume per candle, colored by `close >= open`. Negative or non-finite
/// volumes are drawn as zero.
pub fn calculate_volume_bars(candles: &[Candle], colors: &VolumeColors) -> Vec<VolumeBar> {
    candles
        .iter()
        .map(|c| VolumeBar {
            time: c.time,
            value: sanitize_volume(c.volume),
            color: colors.for_candle(c).to_string(),
        })
        .collect()
}
