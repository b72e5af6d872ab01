pub mod hilenga_milenga;
pub mod rsi;
pub mod smoothing;

pub use crate::hilenga_milenga::{
    calculate_hilenga_milenga, calculate_hilenga_milenga_latest, HilengaMilengaConfig, HilengaMilengaOutput,
    MomentumRow, MomentumSignal, MomentumSnapshot,
};
pub use crate::rsi::calculate_rsi;
pub use crate::smoothing::{calculate_ema_series, calculate_wma_series};
