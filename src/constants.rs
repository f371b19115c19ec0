//! Default tuning constants for the monitoring pipeline

/// Nose tip index in the MediaPipe face-mesh landmark layout
pub const DEFAULT_NOSE_INDEX: usize = 1;

/// Number of recent offset samples averaged for smoothing
pub const DEFAULT_SMOOTHING_FRAMES: usize = 7;

/// Smoothed percentages at or below this are reported as zero
pub const DEFAULT_DEADZONE_PERCENT: u8 = 5;

/// Baseline capture window in seconds
pub const DEFAULT_CALIBRATION_SECS: f64 = 3.0;

/// Fraction of a frame dimension that maps to a 100% deviation
pub const DEFAULT_SENSITIVITY: f64 = 0.4;

/// Horizontal deviation percentage above which the head counts as turned
pub const DEFAULT_TURN_THRESHOLD_PERCENT: u8 = 17;

/// Vertical deviation percentage above which the head counts as nodding
pub const DEFAULT_NOD_THRESHOLD_PERCENT: u8 = 9;

/// Seconds of continuous deviation per logged violation
pub const DEFAULT_DEVIATION_INTERVAL_SECS: f64 = 2.0;

/// Trailing window over which violations are counted, in seconds
pub const DEFAULT_WARNING_WINDOW_SECS: f64 = 60.0;

/// Windowed violation count that raises the warning
pub const DEFAULT_WARNING_COUNT: usize = 3;
