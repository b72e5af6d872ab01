use thiserror::Error;

/// All errors generated while loading candles or exporting series.
///
/// The indicator engines themselves never fail: insufficient data yields an
/// empty series. Only the I/O edges of the workspace return this type.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: invalid number in column '{column}': {value}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: unrecognised timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}
