use data_engine::Candle;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which price of a bar feeds the VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum PriceSource {
    Open,
    High,
    Low,
    Close,
    /// (High + Low) / 2
    Hl2,
    /// (High + Low + Close) / 3
    #[default]
    Hlc3,
    /// (Open + High + Low + Close) / 4
    Ohlc4,
}

impl PriceSource {
    pub fn extract(&self, candle: &Candle) -> f64 {
        match self {
            PriceSource::Open => candle.open,
            PriceSource::High => candle.high,
            PriceSource::Low => candle.low,
            PriceSource::Close => candle.close,
            PriceSource::Hl2 => (candle.high + candle.low) / 2.0,
            PriceSource::Hlc3 => (candle.high + candle.low + candle.close) / 3.0,
            PriceSource::Ohlc4 => (candle.open + candle.high + candle.low + candle.close) / 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriceSourceError(pub String);

impl fmt::Display for ParsePriceSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown price source '{}'", self.0)
    }
}

impl std::error::Error for ParsePriceSourceError {}

impl FromStr for PriceSource {
    type Err = ParsePriceSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PriceSource::Open),
            "high" => Ok(PriceSource::High),
            "low" => Ok(PriceSource::Low),
            "close" => Ok(PriceSource::Close),
            "hl2" => Ok(PriceSource::Hl2),
            "hlc3" | "typical" => Ok(PriceSource::Hlc3),
            "ohlc4" => Ok(PriceSource::Ohlc4),
            _ => Err(ParsePriceSourceError(s.to_string())),
        }
    }
}

impl TryFrom<String> for PriceSource {
    type Error = ParsePriceSourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
