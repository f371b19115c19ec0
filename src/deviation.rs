//! Deviation classification against the calibration baseline.
//!
//! Smoothed signed offsets are split into four directional percentage
//! magnitudes relative to the frame size and a sensitivity fraction. Only
//! the direction matching the offset's sign can be non-zero, so at most
//! one of {right, left} and one of {up, down} is ever set. Percentages at
//! or below the deadzone are floored to zero before the turn/nod
//! thresholds are applied.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Direction of the dominant deviation, for logs and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Right => write!(f, "right"),
            Direction::Left => write!(f, "left"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Four directional percentages, each clamped to [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviationReading {
    pub right: u8,
    pub left: u8,
    pub up: u8,
    pub down: u8,
}

/// Classified deviation for one tick
#[derive(Debug, Clone, Copy)]
pub struct Assessment {
    /// The four clamped directional percentages
    pub reading: DeviationReading,
    /// Horizontal deviation beyond the turn threshold
    pub is_turning: bool,
    /// Vertical deviation beyond the nod threshold
    pub is_nodding: bool,
    /// Dominant direction; `Some` exactly when deviating
    pub direction: Option<Direction>,
}

impl Assessment {
    #[must_use]
    pub fn is_deviating(&self) -> bool {
        self.is_turning || self.is_nodding
    }
}

/// Converts smoothed offsets into directional percentages and classifies them
#[derive(Debug, Clone)]
pub struct DeviationClassifier {
    sensitivity: f64,
    deadzone_percent: u8,
    turn_threshold_percent: u8,
    nod_threshold_percent: u8,
}

impl DeviationClassifier {
    pub fn new(sensitivity: f64, deadzone_percent: u8, turn_threshold_percent: u8, nod_threshold_percent: u8) -> Self {
        assert!(
            sensitivity > 0.0 && sensitivity <= 1.0,
            "Sensitivity must be in (0, 1]"
        );
        Self {
            sensitivity,
            deadzone_percent,
            turn_threshold_percent,
            nod_threshold_percent,
        }
    }

    /// Classify smoothed offsets against the current frame dimensions.
    ///
    /// `dx` is positive toward the right edge, `dy` positive toward the
    /// bottom edge, both in pixels.
    pub fn classify(&self, dx: f64, dy: f64, width: u32, height: u32) -> Result<Assessment> {
        if width == 0 || height == 0 {
            return Err(Error::Geometry(format!(
                "frame dimensions must be positive, got {width}x{height}"
            )));
        }

        let reading = DeviationReading {
            right: self.percent(dx, f64::from(width)),
            left: self.percent(-dx, f64::from(width)),
            up: self.percent(-dy, f64::from(height)),
            down: self.percent(dy, f64::from(height)),
        };

        let is_turning =
            reading.right > self.turn_threshold_percent || reading.left > self.turn_threshold_percent;
        let is_nodding =
            reading.up > self.nod_threshold_percent || reading.down > self.nod_threshold_percent;

        // Turning outranks nodding for the label; within a pair the larger
        // magnitude wins (only one can be non-zero anyway).
        let direction = if is_turning {
            Some(if reading.right > reading.left {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if is_nodding {
            Some(if reading.up > reading.down {
                Direction::Up
            } else {
                Direction::Down
            })
        } else {
            None
        };

        Ok(Assessment {
            reading,
            is_turning,
            is_nodding,
            direction,
        })
    }

    /// Percentage of the sensitivity range covered by a signed offset,
    /// rounded, clamped to [0, 100], deadzone floored to zero
    fn percent(&self, offset: f64, dimension: f64) -> u8 {
        let raw = (offset / (dimension * self.sensitivity)) * 100.0;
        let clamped = raw.round().clamp(0.0, 100.0) as u8;
        if clamped <= self.deadzone_percent {
            0
        } else {
            clamped
        }
    }
}
