//! Global constants for cgm-model

/// Default number of interpolated samples per sparkline
pub const DEFAULT_NUM_SAMPLES: usize = 20;

/// Default maximum number of undo checkpoints
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Normalized value used when every value in a plot is the same
pub const DEGENERATE_RANGE_VALUE: f32 = 0.5;

/// Name shown for an empty light selection
pub const NO_LIGHT: &str = "( no light )";
