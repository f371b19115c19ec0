//! Configuration management for the attention monitor

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_CALIBRATION_SECS, DEFAULT_DEADZONE_PERCENT, DEFAULT_DEVIATION_INTERVAL_SECS,
    DEFAULT_NOD_THRESHOLD_PERCENT, DEFAULT_NOSE_INDEX, DEFAULT_SENSITIVITY, DEFAULT_SMOOTHING_FRAMES,
    DEFAULT_TURN_THRESHOLD_PERCENT, DEFAULT_WARNING_COUNT, DEFAULT_WARNING_WINDOW_SECS,
};
use crate::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Landmark layout parameters
    pub landmarks: LandmarkConfig,

    /// Calibration parameters
    pub calibration: CalibrationConfig,

    /// Smoothing parameters
    pub smoothing: SmoothingConfig,

    /// Deviation classification parameters
    pub deviation: DeviationConfig,

    /// Violation debouncing and warning aggregation parameters
    pub warning: WarningConfig,
}

/// Landmark layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Index of the nose tip in the provider's landmark layout
    pub nose_index: usize,
}

/// Calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Baseline capture window in seconds
    pub duration_secs: f64,
}

/// Smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of recent offset samples averaged per channel
    pub window_frames: usize,
}

/// Deviation classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviationConfig {
    /// Fraction of a frame dimension that maps to a 100% deviation (0.0-1.0)
    pub sensitivity: f64,

    /// Smoothed percentages at or below this are reported as zero
    pub deadzone_percent: u8,

    /// Horizontal percentage above which the head counts as turned
    pub turn_threshold_percent: u8,

    /// Vertical percentage above which the head counts as nodding
    pub nod_threshold_percent: u8,
}

/// Violation debouncing and warning aggregation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningConfig {
    /// Seconds of continuous deviation per logged violation
    pub deviation_interval_secs: f64,

    /// Trailing window over which violations are counted, in seconds
    pub window_secs: f64,

    /// Windowed violation count that raises the warning
    pub count_threshold: usize,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            nose_index: DEFAULT_NOSE_INDEX,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_CALIBRATION_SECS,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_frames: DEFAULT_SMOOTHING_FRAMES,
        }
    }
}

impl Default for DeviationConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            deadzone_percent: DEFAULT_DEADZONE_PERCENT,
            turn_threshold_percent: DEFAULT_TURN_THRESHOLD_PERCENT,
            nod_threshold_percent: DEFAULT_NOD_THRESHOLD_PERCENT,
        }
    }
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            deviation_interval_secs: DEFAULT_DEVIATION_INTERVAL_SECS,
            window_secs: DEFAULT_WARNING_WINDOW_SECS,
            count_threshold: DEFAULT_WARNING_COUNT,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.calibration.duration_secs <= 0.0 {
            return Err(Error::Config(
                "Calibration duration must be greater than 0".to_string(),
            ));
        }
        if self.smoothing.window_frames == 0 {
            return Err(Error::Config(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        if !(self.deviation.sensitivity > 0.0 && self.deviation.sensitivity <= 1.0) {
            return Err(Error::Config(
                "Sensitivity must be between 0.0 (exclusive) and 1.0".to_string(),
            ));
        }
        if self.deviation.deadzone_percent > 100 {
            return Err(Error::Config("Deadzone must be between 0 and 100".to_string()));
        }
        if self.deviation.turn_threshold_percent > 100 || self.deviation.nod_threshold_percent > 100 {
            return Err(Error::Config(
                "Deviation thresholds must be between 0 and 100".to_string(),
            ));
        }
        if self.warning.deviation_interval_secs <= 0.0 {
            return Err(Error::Config(
                "Deviation interval must be greater than 0".to_string(),
            ));
        }
        if self.warning.window_secs <= 0.0 {
            return Err(Error::Config("Warning window must be greater than 0".to_string()));
        }
        if self.warning.count_threshold == 0 {
            return Err(Error::Config(
                "Warning count threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Attention Monitor Configuration

# Landmark layout (MediaPipe face-mesh indices by default)
landmarks:
  nose_index: 1

# Baseline capture
calibration:
  duration_secs: 3.0

# Offset smoothing
smoothing:
  window_frames: 7

# Deviation classification
deviation:
  sensitivity: 0.4
  deadzone_percent: 5
  turn_threshold_percent: 17
  nod_threshold_percent: 9

# Violation debouncing and warning aggregation
warning:
  deviation_interval_secs: 2.0
  window_secs: 60.0
  count_threshold: 3
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().expect("defaults must validate");
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).expect("example config must parse");
        parsed.validate().expect("example config must validate");
        assert_eq!(parsed.smoothing.window_frames, DEFAULT_SMOOTHING_FRAMES);
        assert_eq!(parsed.warning.count_threshold, DEFAULT_WARNING_COUNT);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let parsed: Config = serde_yaml::from_str("deviation:\n  sensitivity: 0.25\n").expect("partial config");
        assert_eq!(parsed.deviation.sensitivity, 0.25);
        assert_eq!(parsed.deviation.turn_threshold_percent, DEFAULT_TURN_THRESHOLD_PERCENT);
        assert_eq!(parsed.calibration.duration_secs, DEFAULT_CALIBRATION_SECS);
    }
}
