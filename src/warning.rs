//! Sliding-window aggregation of violation events.
//!
//! Violation timestamps arrive in non-decreasing order from the tick loop,
//! so eviction only ever inspects the oldest end of the queue. The warning
//! holds while the windowed count stays at or above the threshold.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Counts violation events over a trailing time window
#[derive(Debug)]
pub struct WarningWindow {
    window: Duration,
    threshold: usize,
    events: VecDeque<Instant>,
}

impl WarningWindow {
    pub fn new(window: Duration, threshold: usize) -> Self {
        assert!(!window.is_zero(), "Warning window must be positive");
        assert!(threshold > 0, "Warning count threshold must be greater than 0");
        Self {
            window,
            threshold,
            events: VecDeque::new(),
        }
    }

    /// Record one event; callers supply timestamps in non-decreasing order
    pub fn record(&mut self, at: Instant) {
        self.events.push_back(at);
    }

    /// Drop leading events strictly older than the trailing window
    pub fn evict(&mut self, now: Instant) {
        while let Some(&oldest) = self.events.front() {
            if now.duration_since(oldest) > self.window {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Evict, then report whether the windowed count reaches the threshold
    pub fn is_warning(&mut self, now: Instant) -> bool {
        self.evict(now);
        self.events.len() >= self.threshold
    }

    /// Current windowed event count
    #[must_use]
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Drop all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
