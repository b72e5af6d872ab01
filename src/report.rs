use std::fs;
use std::path::{Path, PathBuf};

use data_engine::{write_csv, Candle, DataError, Point};
use momentum_engine::{calculate_hilenga_milenga, HilengaMilengaConfig, HilengaMilengaOutput};
use pattern_engine::{detect_first_red_candles, detect_range_breakouts, DayPatternOutput, RangeBreakoutConfig};
use renko_engine::{calculate_renko, RenkoConfig, RenkoOutput};
use serde::{Deserialize, Serialize};
use tracing::info;
use volume_engine::{calculate_enhanced_volume, EnhancedVolumeConfig, EnhancedVolumeOutput};
use vwap_engine::{
    calculate_anchored_vwap, calculate_buy_sell_vwap, calculate_vwap, calculate_vwap_bands, AnchoredVwapConfig,
    BuySellVwapConfig, BuySellVwapOutput, VwapBandsConfig, VwapBandsOutput, VwapConfig,
};

/// Per-engine settings read from the optional JSON run file. Missing sections
/// take each engine's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    pub momentum: HilengaMilengaConfig,
    pub vwap: VwapConfig,
    pub vwap_bands: VwapBandsConfig,
    pub buy_sell_vwap: BuySellVwapConfig,
    pub anchored_vwap: AnchoredVwapConfig,
    pub volume: EnhancedVolumeConfig,
    pub renko: RenkoConfig,
    pub range_breakout: RangeBreakoutConfig,
    /// Directory for per-series CSV files; nothing is written when absent.
    pub csv_out: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReport {
    pub candle_count: usize,
    pub momentum: HilengaMilengaOutput,
    pub vwap: Vec<Point>,
    pub vwap_bands: VwapBandsOutput,
    pub buy_sell_vwap: BuySellVwapOutput,
    pub anchored_vwap: Vec<Point>,
    pub volume: EnhancedVolumeOutput,
    pub renko: RenkoOutput,
    pub first_red_candle: DayPatternOutput,
    pub range_breakout: DayPatternOutput,
}

impl IndicatorReport {
    /// Run every engine over the same candles.
    pub fn build(candles: &[Candle], config: &RunConfig) -> Self {
        Self {
            candle_count: candles.len(),
            momentum: calculate_hilenga_milenga(candles, &config.momentum),
            vwap: calculate_vwap(candles, &config.vwap),
            vwap_bands: calculate_vwap_bands(candles, &config.vwap_bands),
            buy_sell_vwap: calculate_buy_sell_vwap(candles, &config.buy_sell_vwap),
            anchored_vwap: calculate_anchored_vwap(candles, &config.anchored_vwap),
            volume: calculate_enhanced_volume(candles, &config.volume),
            renko: calculate_renko(candles, &config.renko),
            first_red_candle: detect_first_red_candles(candles),
            range_breakout: detect_range_breakouts(candles, &config.range_breakout),
        }
    }

    pub fn write_csv_files(&self, dir: &Path) -> Result<(), DataError> {
        fs::create_dir_all(dir)?;
        write_csv(&self.momentum.rsi, dir.join("rsi.csv"))?;
        write_csv(&self.momentum.ema, dir.join("rsi_ema.csv"))?;
        write_csv(&self.momentum.wma, dir.join("rsi_wma.csv"))?;
        write_csv(&self.vwap, dir.join("vwap.csv"))?;
        write_csv(&self.vwap_bands.upper_band, dir.join("vwap_upper_band.csv"))?;
        write_csv(&self.vwap_bands.lower_band, dir.join("vwap_lower_band.csv"))?;
        write_csv(&self.anchored_vwap, dir.join("anchored_vwap.csv"))?;
        write_csv(&self.volume.bars, dir.join("volume_bars.csv"))?;
        write_csv(&self.volume.analysis, dir.join("volume_analysis.csv"))?;
        write_csv(&self.renko.bricks, dir.join("renko.csv"))?;
        write_csv(&self.first_red_candle.levels, dir.join("first_red_levels.csv"))?;
        write_csv(&self.range_breakout.levels, dir.join("range_levels.csv"))?;
        info!(dir = %dir.display(), "wrote indicator CSV files");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vwap_engine::PriceSource;

    #[test]
    fn partial_run_config_keeps_defaults() {
        let config: RunConfig = serde_json::from_str(
            r#"{"momentum":{"rsiLength":14},"renko":{"brickSize":5.0},"rangeBreakout":{"endHour":10,"endMinute":15}}"#,
        )
        .unwrap();

        assert_eq!(config.momentum.rsi_length, 14);
        assert_eq!(config.momentum.ema_length, 3);
        assert_eq!(config.renko.brick_size, Some(5.0));
        assert_eq!(config.range_breakout.start_hour, 9);
        assert_eq!(config.range_breakout.end_minute, 15);
        assert!(config.vwap.reset_daily);
        assert!(config.csv_out.is_none());
    }

    #[test]
    fn price_source_aliases_in_run_config() {
        let config: RunConfig = serde_json::from_str(
            r#"{"vwap":{"source":"HLC3"},"vwapBands":{"source":"typical"},"anchoredVwap":{"source":"Close"}}"#,
        )
        .unwrap();

        assert_eq!(config.vwap.source, PriceSource::Hlc3);
        assert_eq!(config.vwap_bands.source, PriceSource::Hlc3);
        assert_eq!(config.anchored_vwap.source, PriceSource::Close);
    }

    #[test]
    fn report_covers_every_engine() {
        // 2024-01-15 09:15, one-minute bars
        let start = 1_705_310_100;
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
                Candle::new(start + i * 60, c - 0.5, c + 1.0, c - 1.0, c, 1_000.0 + i as f64)
            })
            .collect();

        let report = IndicatorReport::build(&candles, &RunConfig::default());

        assert_eq!(report.candle_count, 60);
        assert_eq!(report.vwap.len(), 60);
        assert_eq!(report.volume.bars.len(), 60);
        assert!(!report.momentum.rsi.is_empty());
        assert!(!report.renko.bricks.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        for key in ["momentum", "vwapBands", "buySellVwap", "anchoredVwap", "firstRedCandle", "rangeBreakout"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
