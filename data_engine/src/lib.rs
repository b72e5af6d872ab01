pub mod candle_type;
pub mod daily_session_aggregator;
pub mod data_engine;
pub mod error;
pub mod session_type;

pub use crate::candle_type::{is_bullish, is_red, sort_candles, CandleDirection};
pub use crate::daily_session_aggregator::{group_candles_by_day, DayBuckets};
pub use crate::data_engine::{parse_ts_to_naive, sanitize_volume, write_csv, Candle, CsvRecord, DataEngine, Point};
pub use crate::error::DataError;
pub use crate::session_type::{
    date_key, is_after_time, is_in_time_window, is_market_hours, minutes_of_day, session_date,
    trading_date, Exchange,
};
