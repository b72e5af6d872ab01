//! VWAP family: session VWAP, aggressor-side VWAPs, anchored VWAP and
//! standard-deviation bands. Every variant runs the same cumulative
//! price×volume / volume aggregation, reset at session boundaries.

pub mod anchored;
pub mod bands;
pub mod buy_sell;
pub mod price_source;
pub mod session;
pub mod vwap;

pub use crate::anchored::{calculate_anchored_vwap, find_anchor_index, Anchor, AnchoredVwapConfig};
pub use crate::bands::{calculate_vwap_bands, VwapBandsConfig, VwapBandsOutput};
pub use crate::buy_sell::{
    attribute_volume, calculate_buy_sell_vwap, BuySellVwapConfig, BuySellVwapOutput, OPPOSING_SIDE_FACTOR,
};
pub use crate::price_source::PriceSource;
pub use crate::session::{ResetMode, SessionTracker, VwapAccumulator};
pub use crate::vwap::{calculate_vwap, calculate_vwap_latest, VwapConfig};
