pub mod brick_size;
pub mod bricks;

pub use crate::brick_size::{
    auto_brick_size, average_true_range, nice_brick_size, true_ranges, DEFAULT_ATR_PERIOD, RANGE_FALLBACK_FRACTION,
};
pub use crate::bricks::{calculate_renko, BrickDirection, RenkoBrick, RenkoConfig, RenkoOutput, MAX_BRICK_SPAN};
