use data_engine::CsvRecord;
use serde::Serialize;

/// A horizontal high/low pair drawn across part of one trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLevel {
    pub high: f64,
    pub low: f64,
    pub date: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl CsvRecord for DayLevel {
    fn headers() -> &'static [&'static str] {
        &["date", "high", "low", "start_time", "end_time"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            format!("{:.6}", self.high),
            format!("{:.6}", self.low),
            self.start_time.to_string(),
            self.end_time.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

pub const BULLISH_COLOR: &str = "#26a69a";
pub const BEARISH_COLOR: &str = "#ef5350";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub time: i64,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

impl Marker {
    pub fn bearish(time: i64, text: &str) -> Self {
        Self {
            time,
            position: MarkerPosition::AboveBar,
            color: BEARISH_COLOR.to_string(),
            shape: MarkerShape::ArrowDown,
            text: text.to_string(),
        }
    }

    pub fn bullish(time: i64, text: &str) -> Self {
        Self {
            time,
            position: MarkerPosition::BelowBar,
            color: BULLISH_COLOR.to_string(),
            shape: MarkerShape::ArrowUp,
            text: text.to_string(),
        }
    }
}

/// Levels plus markers, one level per qualifying day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayPatternOutput {
    pub levels: Vec<DayLevel>,
    /// Sorted by time.
    pub markers: Vec<Marker>,
}
