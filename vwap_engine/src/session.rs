//! Cumulative aggregation with session resets, shared by every VWAP variant.

use chrono::NaiveDate;
pub use data_engine::sanitize_volume;
use data_engine::{session_date, trading_date};

/// When a running VWAP starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Never,
    /// On every calendar-date change.
    CalendarDay,
    /// When the session date, counted from this many minutes after midnight, changes.
    MarketOpen(u32),
}

/// Detects session-boundary crossings between consecutive bars.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    mode: ResetMode,
    current: Option<Option<NaiveDate>>,
}

impl SessionTracker {
    pub fn new(mode: ResetMode) -> Self {
        Self {
            mode,
            current: None,
        }
    }

    /// True when `ts` opens a different session than the previous bar.
    /// The very first bar is never a crossing: accumulators start empty.
    pub fn is_new_session(&mut self, ts: i64) -> bool {
        let key = match self.mode {
            ResetMode::Never => return false,
            ResetMode::CalendarDay => trading_date(ts),
            ResetMode::MarketOpen(open_minutes) => session_date(ts, open_minutes),
        };

        match self.current.replace(key) {
            Some(previous) => previous != key,
            None => false,
        }
    }
}

/// Running sums of price×volume, volume and price²×volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VwapAccumulator {
    price_volume: f64,
    volume: f64,
    price_sq_volume: f64,
}

impl VwapAccumulator {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add(&mut self, price: f64, volume: f64) {
        self.price_volume += price * volume;
        self.volume += volume;
        self.price_sq_volume += price * price * volume;
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// `None` until some volume has been accumulated.
    pub fn vwap(&self) -> Option<f64> {
        (self.volume > 0.0).then(|| self.price_volume / self.volume)
    }

    /// Volume-weighted standard deviation, `sqrt(E[P²] − VWAP²)`. The
    /// variance is clamped at zero against floating-point drift.
    pub fn std_dev(&self) -> Option<f64> {
        let vwap = self.vwap()?;
        let variance = (self.price_sq_volume / self.volume - vwap * vwap).max(0.0);
        Some(variance.sqrt())
    }
}
