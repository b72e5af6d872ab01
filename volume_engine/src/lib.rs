pub mod enhanced;
pub mod volume_bars;
pub mod volume_ma;

pub use crate::enhanced::{
    calculate_enhanced_volume, EnhancedVolumeColors, EnhancedVolumeConfig, EnhancedVolumeOutput, VolumeAnalysis,
};
pub use crate::volume_bars::{calculate_volume_bars, VolumeBar, VolumeColors};
pub use crate::volume_ma::{calculate_volume_ma, DEFAULT_VOLUME_MA_PERIOD};
