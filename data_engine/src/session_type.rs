//! Time-of-day and session classification.
//!
//! Timestamps throughout the workspace are seconds since epoch, interpreted as
//! if UTC equals local exchange time: the upstream market-data API already
//! biases its bar times into IST, so the UTC hour/minute of a timestamp *is*
//! the exchange wall clock. Never apply a timezone offset on top of this, or
//! sessions are shifted twice.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Regular market open, 09:15.
pub const MARKET_OPEN_MINUTES: u32 = 9 * 60 + 15;
/// Regular market close, 15:30.
pub const MARKET_CLOSE_MINUTES: u32 = 15 * 60 + 30;

/// Exchange segment, used to find where a trading session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Exchange {
    #[default]
    Nse,
    Bse,
    Nfo,
    Bfo,
    NseIndex,
    BseIndex,
    Mcx,
    Cds,
    Bcd,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
            Exchange::Nfo => "NFO",
            Exchange::Bfo => "BFO",
            Exchange::NseIndex => "NSE_INDEX",
            Exchange::BseIndex => "BSE_INDEX",
            Exchange::Mcx => "MCX",
            Exchange::Cds => "CDS",
            Exchange::Bcd => "BCD",
        }
    }

    /// Minutes after midnight at which this segment's session opens.
    pub const fn market_open_minutes(&self) -> u32 {
        match self {
            Exchange::Nse
            | Exchange::Bse
            | Exchange::Nfo
            | Exchange::Bfo
            | Exchange::NseIndex
            | Exchange::BseIndex => MARKET_OPEN_MINUTES,
            Exchange::Mcx | Exchange::Cds | Exchange::Bcd => 9 * 60,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExchangeError(pub String);

impl fmt::Display for ParseExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exchange '{}'", self.0)
    }
}

impl std::error::Error for ParseExchangeError {}

impl FromStr for Exchange {
    type Err = ParseExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NSE" => Ok(Exchange::Nse),
            "BSE" => Ok(Exchange::Bse),
            "NFO" => Ok(Exchange::Nfo),
            "BFO" => Ok(Exchange::Bfo),
            "NSE_INDEX" => Ok(Exchange::NseIndex),
            "BSE_INDEX" => Ok(Exchange::BseIndex),
            "MCX" => Ok(Exchange::Mcx),
            "CDS" => Ok(Exchange::Cds),
            "BCD" => Ok(Exchange::Bcd),
            _ => Err(ParseExchangeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Exchange {
    type Error = ParseExchangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Wall-clock date-time of a timestamp. `None` when chrono cannot represent it.
pub fn local_datetime(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc())
}

pub fn minutes_of_day(ts: i64) -> Option<u32> {
    local_datetime(ts).map(|dt| dt.hour() * 60 + dt.minute())
}

/// True iff the time of day falls in [09:15, 15:30], both ends inclusive.
pub fn is_market_hours(ts: i64) -> bool {
    minutes_of_day(ts)
        .map(|m| (MARKET_OPEN_MINUTES..=MARKET_CLOSE_MINUTES).contains(&m))
        .unwrap_or(false)
}

/// True iff the time of day falls in the half-open window [start, end).
pub fn is_in_time_window(ts: i64, start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> bool {
    let start = start_h * 60 + start_m;
    let end = end_h * 60 + end_m;
    minutes_of_day(ts)
        .map(|m| m >= start && m < end)
        .unwrap_or(false)
}

pub fn is_after_time(ts: i64, h: u32, m: u32) -> bool {
    minutes_of_day(ts)
        .map(|mins| mins >= h * 60 + m)
        .unwrap_or(false)
}

/// Calendar date of a timestamp.
pub fn trading_date(ts: i64) -> Option<NaiveDate> {
    local_datetime(ts).map(|dt| dt.date())
}

/// `YYYY-MM-DD` key of a timestamp's calendar date.
pub fn date_key(ts: i64) -> Option<String> {
    trading_date(ts).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Trading day a bar belongs to when sessions start at `open_minutes` rather
/// than midnight: a bar before the open is attributed to the previous day.
pub fn session_date(ts: i64, open_minutes: u32) -> Option<NaiveDate> {
    trading_date(ts.saturating_sub(i64::from(open_minutes) * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15 00:00:00
    const DAY: i64 = 1_705_276_800;

    fn at(h: i64, m: i64) -> i64 {
        DAY + h * 3600 + m * 60
    }

    #[test]
    fn market_hours_are_inclusive() {
        assert!(!is_market_hours(at(9, 14)));
        assert!(is_market_hours(at(9, 15)));
        assert!(is_market_hours(at(12, 0)));
        assert!(is_market_hours(at(15, 30)));
        assert!(!is_market_hours(at(15, 31)));
    }

    #[test]
    fn time_window_is_half_open() {
        assert!(!is_in_time_window(at(9, 29), 9, 30, 10, 0));
        assert!(is_in_time_window(at(9, 30), 9, 30, 10, 0));
        assert!(is_in_time_window(at(9, 55), 9, 30, 10, 0));
        assert!(!is_in_time_window(at(10, 0), 9, 30, 10, 0));
    }

    #[test]
    fn after_time_includes_boundary() {
        assert!(is_after_time(at(10, 0), 10, 0));
        assert!(!is_after_time(at(9, 59), 10, 0));
    }

    #[test]
    fn date_key_uses_wall_clock() {
        assert_eq!(date_key(at(23, 59)).as_deref(), Some("2024-01-15"));
        assert_eq!(date_key(at(24, 0)).as_deref(), Some("2024-01-16"));
    }

    #[test]
    fn session_date_shifts_pre_open_bars() {
        let open = Exchange::Mcx.market_open_minutes();
        assert_eq!(session_date(at(8, 55), open), trading_date(at(-1, 0)));
        assert_eq!(session_date(at(9, 0), open), trading_date(at(9, 0)));
        assert_eq!(session_date(at(23, 30), open), trading_date(at(9, 0)));
    }

    #[test]
    fn exchange_table_and_parsing() {
        assert_eq!(Exchange::Nse.market_open_minutes(), 555);
        assert_eq!(Exchange::BseIndex.market_open_minutes(), 555);
        assert_eq!(Exchange::Mcx.market_open_minutes(), 540);
        assert_eq!(Exchange::Cds.market_open_minutes(), 540);
        assert_eq!("mcx".parse::<Exchange>(), Ok(Exchange::Mcx));
        assert_eq!("nse-index".parse::<Exchange>(), Ok(Exchange::NseIndex));
        assert!("LSE".parse::<Exchange>().is_err());

        let parsed: Exchange = serde_json::from_str("\"BCD\"").unwrap();
        assert_eq!(parsed, Exchange::Bcd);
    }

    #[test]
    fn unrepresentable_timestamps_fall_outside_every_window() {
        assert!(!is_market_hours(i64::MAX));
        assert!(date_key(i64::MAX).is_none());
    }
}
