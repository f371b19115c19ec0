//! The deviation monitor: a single tick-driven entity owning calibration,
//! smoothing, classification, debouncing, and warning aggregation.
//!
//! One landmark frame is processed end-to-end per tick; all buffers belong
//! to the monitor instance and are only mutated inside its own tick.
//! Timestamps are supplied by the caller from a single clock that never
//! moves backward within a session.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::{
    calibration::{Baseline, CalibrationOutcome, Calibrator},
    config::Config,
    debounce::{ViolationDebouncer, ViolationEvent},
    deviation::{Assessment, DeviationClassifier},
    landmarks::LandmarkFrame,
    smoothing::OffsetSmoother,
    warning::WarningWindow,
    Result,
};

/// Monitor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No baseline; the pipeline is gated until calibration runs
    Uncalibrated,
    /// The baseline capture window is open
    Calibrating,
    /// A baseline is active; deviations are classified and aggregated
    Tracking,
}

/// Lifecycle phase with the baseline bound to the only state that has one
#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Calibrating,
    Tracking(Baseline),
}

/// Per-tick input from the external landmark provider
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput<'a> {
    /// Landmarks for this tick, or `None` when no face was detected
    pub landmarks: Option<&'a LandmarkFrame>,
    /// True when a separate detector saw more than one face
    pub multi_face_present: bool,
}

/// Per-tick output for rendering and logging collaborators
#[derive(Debug, Clone, Copy)]
pub struct MonitorOutput {
    pub state: MonitorState,
    /// Time left in the calibration window; `None` outside Calibrating
    pub calibration_remaining: Option<Duration>,
    /// True on the single tick where a calibration window closed empty
    pub calibration_failed: bool,
    /// Classified deviation; `None` outside Tracking or while the face is absent
    pub assessment: Option<Assessment>,
    /// Violation emitted this tick, if any
    pub violation: Option<ViolationEvent>,
    /// True while the windowed violation count is at or above the threshold
    pub is_warning: bool,
    /// Current windowed violation count
    pub violation_count: usize,
    /// True when no landmarks arrived this tick while a baseline is active
    pub face_absent: bool,
    /// Passthrough of the multi-face signal
    pub multi_face_present: bool,
}

/// Head-deviation monitor for one proctoring session
pub struct Monitor {
    nose_index: usize,
    phase: Phase,
    calibrator: Calibrator,
    smoother: OffsetSmoother,
    classifier: DeviationClassifier,
    debouncer: ViolationDebouncer,
    warnings: WarningWindow,
    absent_since: Option<Instant>,
    multi_face_seen: bool,
    warning_active: bool,
}

impl Monitor {
    /// Create a monitor from a validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            nose_index: config.landmarks.nose_index,
            phase: Phase::Idle,
            calibrator: Calibrator::new(Duration::from_secs_f64(config.calibration.duration_secs)),
            smoother: OffsetSmoother::new(config.smoothing.window_frames),
            classifier: DeviationClassifier::new(
                config.deviation.sensitivity,
                config.deviation.deadzone_percent,
                config.deviation.turn_threshold_percent,
                config.deviation.nod_threshold_percent,
            ),
            debouncer: ViolationDebouncer::new(Duration::from_secs_f64(
                config.warning.deviation_interval_secs,
            )),
            warnings: WarningWindow::new(
                Duration::from_secs_f64(config.warning.window_secs),
                config.warning.count_threshold,
            ),
            absent_since: None,
            multi_face_seen: false,
            warning_active: false,
        })
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> MonitorState {
        match self.phase {
            Phase::Idle => MonitorState::Uncalibrated,
            Phase::Calibrating => MonitorState::Calibrating,
            Phase::Tracking(_) => MonitorState::Tracking,
        }
    }

    /// Baseline of the active tracking phase, if any
    #[must_use]
    pub fn baseline(&self) -> Option<Baseline> {
        match self.phase {
            Phase::Tracking(baseline) => Some(baseline),
            _ => None,
        }
    }

    /// Open a new calibration window, discarding the active baseline and
    /// all buffered history. Valid in every state; an in-flight violation
    /// interval does not carry over.
    pub fn start_calibration(&mut self, now: Instant) {
        info!("Starting calibration");
        self.clear_buffers();
        self.calibrator.start(now);
        self.phase = Phase::Calibrating;
    }

    /// Return to Uncalibrated, clearing all buffers
    pub fn reset(&mut self) {
        self.clear_buffers();
        self.calibrator.cancel();
        self.phase = Phase::Idle;
    }

    fn clear_buffers(&mut self) {
        self.smoother.reset();
        self.debouncer.reset();
        self.warnings.clear();
        self.absent_since = None;
        self.warning_active = false;
    }

    /// Process one landmark frame.
    ///
    /// Errors only on input contract violations (bad geometry, malformed
    /// landmark indices); face absence and calibration failure are state,
    /// not errors.
    pub fn tick(&mut self, input: FrameInput<'_>, now: Instant) -> Result<MonitorOutput> {
        if input.multi_face_present && !self.multi_face_seen {
            warn!("More than one face in frame");
        }
        self.multi_face_seen = input.multi_face_present;

        match self.phase {
            Phase::Idle => Ok(self.output(input)),
            Phase::Calibrating => self.tick_calibrating(input, now),
            Phase::Tracking(baseline) => self.tick_tracking(baseline, input, now),
        }
    }

    fn tick_calibrating(&mut self, input: FrameInput<'_>, now: Instant) -> Result<MonitorOutput> {
        match self.calibrator.poll(now) {
            CalibrationOutcome::Pending => {
                if let Some(frame) = input.landmarks {
                    frame.validate()?;
                    self.calibrator.sample(frame.nose_x(self.nose_index)?, frame.face_center_y());
                }
                let mut out = self.output(input);
                out.calibration_remaining = Some(self.calibrator.remaining(now));
                Ok(out)
            }
            CalibrationOutcome::Complete(baseline) => {
                info!(
                    "Calibration complete: nose_x={:.1}px, face_center_y={:.1}px",
                    baseline.nose_x, baseline.face_center_y
                );
                self.phase = Phase::Tracking(baseline);
                // Tracking picks up on the next tick; this frame was not sampled
                Ok(self.output(input))
            }
            CalibrationOutcome::Failed => {
                warn!("Calibration failed: no face seen during the capture window");
                self.phase = Phase::Idle;
                let mut out = self.output(input);
                out.calibration_failed = true;
                Ok(out)
            }
        }
    }

    fn tick_tracking(
        &mut self,
        baseline: Baseline,
        input: FrameInput<'_>,
        now: Instant,
    ) -> Result<MonitorOutput> {
        let Some(frame) = input.landmarks else {
            // Freeze: smoothing and debounce state stay untouched until the
            // face returns, so a dropped frame cannot reset progress.
            if self.absent_since.is_none() {
                warn!("Face lost while tracking");
                self.absent_since = Some(now);
            }
            let mut out = self.output(input);
            out.face_absent = true;
            out.is_warning = self.check_warning(now);
            out.violation_count = self.warnings.count();
            return Ok(out);
        };

        frame.validate()?;
        let nose_x = frame.nose_x(self.nose_index)?;
        let face_center_y = frame.face_center_y();

        if let Some(absent_since) = self.absent_since.take() {
            info!("Face reacquired after {:.1}s", now.duration_since(absent_since).as_secs_f64());
            // The gap contributes nothing to an in-flight deviation interval
            self.debouncer.defer(now.duration_since(absent_since));
        }

        let dx = nose_x - baseline.nose_x;
        let dy = face_center_y - baseline.face_center_y;
        let (dx_smooth, dy_smooth) = self.smoother.apply(dx, dy);
        let assessment = self
            .classifier
            .classify(dx_smooth, dy_smooth, frame.width, frame.height)?;

        let violation = self.debouncer.update(assessment.direction, now);
        if let Some(event) = violation {
            self.warnings.record(event.at);
            info!("Violation #{} detected: looking {}", self.warnings.count(), event.direction);
        }

        let is_warning = self.check_warning(now);

        let mut out = self.output(input);
        out.assessment = Some(assessment);
        out.violation = violation;
        out.is_warning = is_warning;
        out.violation_count = self.warnings.count();
        Ok(out)
    }

    fn check_warning(&mut self, now: Instant) -> bool {
        let is_warning = self.warnings.is_warning(now);
        if is_warning && !self.warning_active {
            warn!("Warning raised: {} violations in window", self.warnings.count());
        }
        self.warning_active = is_warning;
        is_warning
    }

    fn output(&self, input: FrameInput<'_>) -> MonitorOutput {
        MonitorOutput {
            state: self.state(),
            calibration_remaining: None,
            calibration_failed: false,
            assessment: None,
            violation: None,
            is_warning: self.warning_active,
            violation_count: self.warnings.count(),
            face_absent: false,
            multi_face_present: input.multi_face_present,
        }
    }
}
