//! Attention monitoring library for exam-proctoring sessions.
//!
//! This library watches a subject's head orientation across a live stream
//! of per-frame facial landmark positions and decides whether the subject
//! has been looking away from a calibrated reference position for too
//! long, escalating to a warning after repeated violations.
//!
//! The pipeline, run once per frame:
//! 1. Calibration captures a baseline head position over a fixed window
//! 2. Signed offsets from the baseline are smoothed over a trailing window
//! 3. Smoothed offsets become four directional percentages with a deadzone
//! 4. A sustained deviation is debounced into rate-limited violation events
//! 5. Violations are counted over a sliding window to raise the warning
//!
//! Frame acquisition and landmark detection are external collaborators:
//! the monitor consumes normalized landmark coordinates plus wall-clock
//! time and produces numeric readings and state signals.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//! use attention_monitor::config::Config;
//! use attention_monitor::landmarks::{LandmarkFrame, Point};
//! use attention_monitor::monitor::{FrameInput, Monitor, MonitorState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut monitor = Monitor::new(&config)?;
//!
//! let start = Instant::now();
//! monitor.start_calibration(start);
//!
//! // Feed frames from the landmark provider; here a face dead center
//! let frame = LandmarkFrame::new(
//!     vec![Point { x: 0.5, y: 0.3 }, Point { x: 0.5, y: 0.5 }, Point { x: 0.5, y: 0.7 }],
//!     640,
//!     480,
//! )?;
//! let input = FrameInput { landmarks: Some(&frame), multi_face_present: false };
//!
//! // Hold position through the calibration window
//! for i in 0..100 {
//!     monitor.tick(input, start + Duration::from_millis(i * 33))?;
//! }
//! let output = monitor.tick(input, start + Duration::from_secs(4))?;
//! assert_eq!(output.state, MonitorState::Tracking);
//! assert!(!output.is_warning);
//! # Ok(())
//! # }
//! ```

/// Per-tick landmark input and pixel-space geometry accessors
pub mod landmarks;

/// Baseline capture over a fixed calibration window
pub mod calibration;

/// Trailing-window smoothing for raw offset samples
pub mod smoothing;

/// Deviation classification against the calibration baseline
pub mod deviation;

/// Debouncing of the continuous deviation condition into discrete events
pub mod debounce;

/// Sliding-window aggregation of violation events
pub mod warning;

/// The tick-driven monitor entity owning the whole pipeline
pub mod monitor;

/// Session replay application
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
