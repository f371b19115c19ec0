//! Trailing-window smoothing for raw offset samples.
//!
//! A bounded moving average suppresses per-frame detection jitter before
//! the deviation classifier sees the offsets. The window holds at most a
//! fixed number of recent samples; the mean is taken over whatever is
//! buffered, so a partially filled window is never zero-padded.

use std::collections::VecDeque;

/// Bounded trailing-window moving average over one channel
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl SmoothingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Smoothing window capacity must be greater than 0");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a raw sample, evicting the oldest beyond capacity
    pub fn push(&mut self, raw: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(raw);
    }

    /// Mean of the currently buffered samples; 0 when empty
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Paired smoother for the signed horizontal/vertical offsets
#[derive(Debug, Clone)]
pub struct OffsetSmoother {
    dx: SmoothingWindow,
    dy: SmoothingWindow,
}

impl OffsetSmoother {
    pub fn new(window: usize) -> Self {
        Self {
            dx: SmoothingWindow::new(window),
            dy: SmoothingWindow::new(window),
        }
    }

    /// Push raw offsets and return the smoothed pair
    pub fn apply(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        self.dx.push(dx);
        self.dy.push(dy);
        (self.dx.value(), self.dy.value())
    }

    /// Drop all buffered samples
    pub fn reset(&mut self) {
        self.dx.clear();
        self.dy.clear();
    }
}
