//! Baseline capture over a fixed calibration window.
//!
//! While the window is open every present-face sample is recorded; ticks
//! without a face are skipped, never zero-filled. When the window closes
//! the baseline is the arithmetic mean of the captured samples. A window
//! that closes without a single sample fails explicitly instead of
//! producing a zero baseline.

use std::time::{Duration, Instant};

/// Reference head position captured during calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Reference horizontal nose position in pixels
    pub nose_x: f64,
    /// Reference vertical face-center position in pixels
    pub face_center_y: f64,
}

/// Result of polling an open calibration window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// The window is still open (or none is)
    Pending,
    /// The window closed with samples; the baseline is ready
    Complete(Baseline),
    /// The window closed without a single sample
    Failed,
}

/// Accumulates head-position samples for the duration of the capture window.
///
/// The sample buffer is unbounded for the window's duration: every sample
/// counts toward the mean, none are decimated.
#[derive(Debug)]
pub struct Calibrator {
    duration: Duration,
    started_at: Option<Instant>,
    nose_samples: Vec<f64>,
    center_samples: Vec<f64>,
}

impl Calibrator {
    pub fn new(duration: Duration) -> Self {
        assert!(!duration.is_zero(), "Calibration duration must be positive");
        Self {
            duration,
            started_at: None,
            nose_samples: Vec::new(),
            center_samples: Vec::new(),
        }
    }

    /// Open a new window at `now`, discarding any previous samples
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.nose_samples.clear();
        self.center_samples.clear();
    }

    /// Abandon the window without producing a baseline
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.nose_samples.clear();
        self.center_samples.clear();
    }

    /// True while a window is open
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time left before the window closes
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self.duration.saturating_sub(now.duration_since(start)),
            None => Duration::ZERO,
        }
    }

    /// Record one present-face sample
    pub fn sample(&mut self, nose_x: f64, face_center_y: f64) {
        self.nose_samples.push(nose_x);
        self.center_samples.push(face_center_y);
    }

    /// Close the window once its duration has elapsed.
    ///
    /// A sample landing exactly at the window boundary is still inside it;
    /// the window closes on the first poll strictly after the duration.
    pub fn poll(&mut self, now: Instant) -> CalibrationOutcome {
        let Some(start) = self.started_at else {
            return CalibrationOutcome::Pending;
        };
        if now.duration_since(start) <= self.duration {
            return CalibrationOutcome::Pending;
        }

        self.started_at = None;
        if self.nose_samples.is_empty() {
            return CalibrationOutcome::Failed;
        }
        let baseline = Baseline {
            nose_x: mean(&self.nose_samples),
            face_center_y: mean(&self.center_samples),
        };
        self.nose_samples.clear();
        self.center_samples.clear();
        CalibrationOutcome::Complete(baseline)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_baseline_is_mean_of_samples() {
        let mut calibrator = Calibrator::new(secs(3.0));
        let t0 = Instant::now();
        calibrator.start(t0);

        calibrator.sample(300.0, 200.0);
        calibrator.sample(320.0, 220.0);
        calibrator.sample(340.0, 240.0);

        assert_eq!(calibrator.poll(t0 + secs(2.0)), CalibrationOutcome::Pending);
        match calibrator.poll(t0 + secs(3.1)) {
            CalibrationOutcome::Complete(baseline) => {
                assert!((baseline.nose_x - 320.0).abs() < 1e-9);
                assert!((baseline.face_center_y - 220.0).abs() < 1e-9);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert!(!calibrator.is_active());
    }

    #[test]
    fn test_single_sample_baseline() {
        let mut calibrator = Calibrator::new(secs(1.0));
        let t0 = Instant::now();
        calibrator.start(t0);
        calibrator.sample(123.0, 456.0);

        match calibrator.poll(t0 + secs(1.5)) {
            CalibrationOutcome::Complete(baseline) => {
                assert_eq!(baseline.nose_x, 123.0);
                assert_eq!(baseline.face_center_y, 456.0);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_window_fails() {
        let mut calibrator = Calibrator::new(secs(3.0));
        let t0 = Instant::now();
        calibrator.start(t0);

        // Face absent the whole window: no samples recorded
        assert_eq!(calibrator.poll(t0 + secs(3.5)), CalibrationOutcome::Failed);
        assert!(!calibrator.is_active());
    }

    #[test]
    fn test_restart_discards_samples() {
        let mut calibrator = Calibrator::new(secs(3.0));
        let t0 = Instant::now();
        calibrator.start(t0);
        calibrator.sample(1000.0, 1000.0);

        calibrator.start(t0 + secs(1.0));
        calibrator.sample(100.0, 100.0);

        match calibrator.poll(t0 + secs(4.5)) {
            CalibrationOutcome::Complete(baseline) => {
                assert_eq!(baseline.nose_x, 100.0);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut calibrator = Calibrator::new(secs(3.0));
        let t0 = Instant::now();
        calibrator.start(t0);
        assert_eq!(calibrator.remaining(t0 + secs(1.0)), secs(2.0));
        assert_eq!(calibrator.remaining(t0 + secs(5.0)), Duration::ZERO);
    }

    #[test]
    fn test_inactive_polls_pending() {
        let mut calibrator = Calibrator::new(secs(3.0));
        assert_eq!(calibrator.poll(Instant::now()), CalibrationOutcome::Pending);
    }
}
