use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::error::DataError;

pub trait CsvRecord: std::fmt::Debug {
    fn headers() -> &'static [&'static str];
    fn record(&self) -> Vec<String>;
}

/// One OHLCV bar.
///
/// `time` is seconds since epoch, interpreted as if UTC equals local exchange
/// time (see [`crate::session_type`]). The order-flow fields are optional and
/// only consulted by the buy/sell VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_vwap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_vwap: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            ..Default::default()
        }
    }
}

/// Negative, NaN or infinite volumes contribute nothing.
pub fn sanitize_volume(volume: f64) -> f64 {
    if volume.is_finite() && volume > 0.0 {
        volume
    } else {
        0.0
    }
}

impl CsvRecord for Candle {
    fn headers() -> &'static [&'static str] {
        &["time", "open", "high", "low", "close", "volume"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.time.to_string(),
            format!("{:.6}", self.open),
            format!("{:.6}", self.high),
            format!("{:.6}", self.low),
            format!("{:.6}", self.close),
            format!("{:.6}", self.volume),
        ]
    }
}

/// The universal output unit for line series. `None` marks "no data yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub time: i64,
    pub value: Option<f64>,
}

impl Point {
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value: Some(value),
        }
    }

    pub fn gap(time: i64) -> Self {
        Self { time, value: None }
    }
}

impl CsvRecord for Point {
    fn headers() -> &'static [&'static str] {
        &["time", "value"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.time.to_string(),
            self.value.map(|v| format!("{:.6}", v)).unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Default)]
pub struct DataEngine;

impl DataEngine {
    pub fn new() -> Self {
        DataEngine
    }

    /// Load candles from a broker export.
    ///
    /// Two layouts are accepted, comma or tab separated, with a header row:
    /// - `date, time, open, high, low, close, volume[, ...]`
    /// - `time, open, high, low, close, volume` where `time` is unix seconds
    pub fn fetch_from_csv(&self, path: &Path) -> Result<Vec<Candle>, DataError> {
        let mut delimiter = b',';
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(File::open(path)?);

        // A single column on the header row means the file is not comma separated.
        if let Some(Ok(record)) = rdr.records().next() {
            if record.len() < 2 {
                delimiter = b'\t';
            }
        }

        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(File::open(path)?);

        let mut candles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            // header row is line 1
            let row = idx + 2;
            let record = result?;
            if record.iter().all(|field| field.is_empty()) {
                warn!(row, "skipping empty row");
                continue;
            }
            candles.push(parse_record(&record, row)?);
        }

        info!(rows = candles.len(), path = %path.display(), "loaded candles");
        Ok(candles)
    }
}

fn parse_record(record: &StringRecord, row: usize) -> Result<Candle, DataError> {
    // Unix layout has an integer in the first column and exactly six fields.
    if record.len() == 6 {
        if let Ok(time) = record[0].parse::<i64>() {
            return Ok(Candle::new(
                time,
                parse_number(record, 1, "open", row)?,
                parse_number(record, 2, "high", row)?,
                parse_number(record, 3, "low", row)?,
                parse_number(record, 4, "close", row)?,
                parse_number(record, 5, "volume", row)?,
            ));
        }
    }

    if record.len() < 7 {
        return Err(DataError::MissingColumns {
            row,
            expected: 7,
            found: record.len(),
        });
    }

    let raw_ts = format!("{}T{}", &record[0], &record[1]);
    let time = parse_ts_to_naive(&raw_ts)
        .map(|ndt| ndt.and_utc().timestamp())
        .ok_or(DataError::InvalidTimestamp { row, value: raw_ts })?;

    Ok(Candle::new(
        time,
        parse_number(record, 2, "open", row)?,
        parse_number(record, 3, "high", row)?,
        parse_number(record, 4, "low", row)?,
        parse_number(record, 5, "close", row)?,
        parse_number(record, 6, "volume", row)?,
    ))
}

fn parse_number(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, DataError> {
    let raw = &record[idx];
    raw.parse::<f64>().map_err(|_| DataError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}

pub fn write_csv<T: CsvRecord, P: AsRef<Path>>(records: &[T], out_path: P) -> Result<(), DataError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(out_path)?;

    writer.write_record(T::headers())?;
    for record in records {
        writer.write_record(record.record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a broker date-time string. The wall-clock value is returned as is,
/// so calling `.and_utc()` on it yields a timestamp in the crate's convention.
pub fn parse_ts_to_naive(ts: &str) -> Option<NaiveDateTime> {
    let s = ts.trim().trim_end_matches('T');

    let date_fmts = ["%Y-%m-%d", "%Y.%m.%d"];
    for f in &date_fmts {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    let fmts = [
        "%Y.%m.%dT%H:%M:%S",
        "%Y.%m.%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for f in &fmts {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("data_engine_{}_{}.csv", name, std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_broker_timestamps() {
        let dt = parse_ts_to_naive("2024.01.15T09:15:00").unwrap();
        assert_eq!(dt.and_utc().timestamp(), 1_705_310_100);

        let dt = parse_ts_to_naive("2024-01-15 09:15").unwrap();
        assert_eq!(dt.and_utc().timestamp(), 1_705_310_100);

        assert!(parse_ts_to_naive("yesterday").is_none());
    }

    #[test]
    fn loads_date_time_layout() {
        let path = temp_csv(
            "broker",
            "DATE,TIME,OPEN,HIGH,LOW,CLOSE,TICKVOL,VOL,SPREAD\n\
             2024.01.15,09:15:00,100,101,99,100.5,1200,0,2\n\
             2024.01.15,09:20:00,100.5,102,100,101.5,900,0,2\n",
        );
        let candles = DataEngine::new().fetch_from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_705_310_100);
        assert_eq!(candles[1].time - candles[0].time, 300);
        assert_eq!(candles[1].volume, 900.0);
        assert!(candles[0].buy_volume.is_none());
    }

    #[test]
    fn loads_unix_layout() {
        let path = temp_csv("unix", "time,open,high,low,close,volume\n1705310100,1,2,0.5,1.5,10\n");
        let candles = DataEngine::new().fetch_from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(candles, vec![Candle::new(1_705_310_100, 1.0, 2.0, 0.5, 1.5, 10.0)]);
    }

    #[test]
    fn reports_bad_numbers_with_row() {
        let path = temp_csv("bad", "time,open,high,low,close,volume\n1705310100,x,2,0.5,1.5,10\n");
        let err = DataEngine::new().fetch_from_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err {
            DataError::InvalidNumber { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "open");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_volumes_are_zeroed() {
        assert_eq!(sanitize_volume(-5.0), 0.0);
        assert_eq!(sanitize_volume(f64::NAN), 0.0);
        assert_eq!(sanitize_volume(f64::INFINITY), 0.0);
        assert_eq!(sanitize_volume(7.0), 7.0);
    }

    #[test]
    fn point_serializes_gap_as_null() {
        let json = serde_json::to_string(&Point::gap(5)).unwrap();
        assert_eq!(json, r#"{"time":5,"value":null}"#);
        assert_eq!(Point::new(5, 1.5).record(), vec!["5".to_string(), "1.500000".to_string()]);
    }

    #[test]
    fn candle_deserializes_without_volume() {
        let candle: Candle = serde_json::from_str(r#"{"time":1,"open":1,"high":2,"low":0.5,"close":1.5}"#).unwrap();
        assert_eq!(candle.volume, 0.0);

        let candle: Candle =
            serde_json::from_str(r#"{"time":1,"open":1,"high":2,"low":0.5,"close":1.5,"volume":3,"buyVolume":2}"#)
                .unwrap();
        assert_eq!(candle.buy_volume, Some(2.0));
    }
}
