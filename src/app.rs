//! Replay application: drives the monitor from a recorded session script.
//!
//! Frame acquisition and landmark detection live outside this crate; a
//! session script stands in for that provider, carrying timestamped
//! landmark frames (or face-absent ticks) plus the times at which the
//! operator triggered calibration.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Deserialize;

use crate::{
    config::Config,
    deviation::Direction,
    landmarks::{LandmarkFrame, Point},
    monitor::{FrameInput, Monitor},
    Error, Result,
};

/// A recorded monitoring session: timestamped frames plus calibration triggers
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    /// Times (seconds from session start) at which calibration is started
    #[serde(default)]
    pub calibrate_at: Vec<f64>,

    /// Timestamped frames in playback order
    pub frames: Vec<FrameRecord>,
}

/// One recorded tick
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Seconds from session start
    pub at: f64,

    /// Landmarks for this tick; omitted when no face was detected
    #[serde(default)]
    pub face: Option<FaceRecord>,

    /// More than one face visible this tick
    #[serde(default)]
    pub multi_face: bool,
}

/// Landmarks plus frame dimensions for one tick
#[derive(Debug, Clone, Deserialize)]
pub struct FaceRecord {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Normalized (x, y) landmark points
    pub points: Vec<(f32, f32)>,
}

impl SessionScript {
    /// Load a session script from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a session script from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Replay(format!("failed to parse session script: {e}")))?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        for record in &self.frames {
            if !record.at.is_finite() || record.at < 0.0 {
                return Err(Error::Replay(format!("invalid frame timestamp {}", record.at)));
            }
        }
        for pair in self.frames.windows(2) {
            if pair[1].at < pair[0].at {
                return Err(Error::Replay(format!(
                    "frame timestamps must be non-decreasing ({} after {})",
                    pair[1].at, pair[0].at
                )));
            }
        }
        for &at in &self.calibrate_at {
            if !at.is_finite() || at < 0.0 {
                return Err(Error::Replay(format!("invalid calibration trigger time {at}")));
            }
        }
        Ok(())
    }
}

impl FaceRecord {
    fn to_frame(&self) -> LandmarkFrame {
        LandmarkFrame {
            points: self.points.iter().map(|&(x, y)| Point { x, y }).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Outcome of replaying a session
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    /// Frames processed
    pub ticks: usize,
    /// Emitted violations as (session time, direction)
    pub violations: Vec<(f64, Direction)>,
    /// Highest windowed violation count observed
    pub peak_violation_count: usize,
    /// Whether the warning was raised at any point
    pub warning_raised: bool,
    /// Ticks with no face while tracking
    pub face_absent_ticks: usize,
    /// Calibration windows that closed without a sample
    pub calibration_failures: usize,
}

/// Replays a session script through a monitor
pub struct ReplayApp {
    monitor: Monitor,
    script: SessionScript,
}

impl ReplayApp {
    pub fn new(config: &Config, script: SessionScript) -> Result<Self> {
        Ok(Self {
            monitor: Monitor::new(config)?,
            script,
        })
    }

    /// Run the full script and collect a summary
    pub fn run(&mut self) -> Result<ReplaySummary> {
        info!("Replaying {} frames", self.script.frames.len());
        let base = Instant::now();
        let mut summary = ReplaySummary::default();

        let mut triggers = self.script.calibrate_at.clone();
        triggers.sort_by(|a, b| a.total_cmp(b));
        let mut triggers = triggers.into_iter().peekable();

        for record in &self.script.frames {
            let now = base + Duration::from_secs_f64(record.at);
            while triggers.peek().is_some_and(|&t| t <= record.at) {
                triggers.next();
                self.monitor.start_calibration(now);
            }

            let frame = record.face.as_ref().map(FaceRecord::to_frame);
            let input = FrameInput {
                landmarks: frame.as_ref(),
                multi_face_present: record.multi_face,
            };
            let output = self.monitor.tick(input, now)?;

            summary.ticks += 1;
            if output.face_absent {
                summary.face_absent_ticks += 1;
            }
            if output.calibration_failed {
                summary.calibration_failures += 1;
            }
            if let Some(event) = output.violation {
                summary.violations.push((record.at, event.direction));
            }
            summary.peak_violation_count = summary.peak_violation_count.max(output.violation_count);
            if output.is_warning {
                summary.warning_raised = true;
            }

            debug!(
                "t={:.2}s state={:?} deviating={} violations={} warning={}",
                record.at,
                output.state,
                output.assessment.is_some_and(|a| a.is_deviating()),
                output.violation_count,
                output.is_warning,
            );
        }

        Ok(summary)
    }
}
