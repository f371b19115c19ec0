//! Rate limiting of the continuous deviation condition into discrete events.
//!
//! A head held off-baseline is deviating on every frame; logging a
//! violation per frame would overcount at frame rate. The debouncer emits
//! at most one event per interval of continuous deviation and fully resets
//! when the head returns to neutral, so an interrupted deviation carries
//! no credit into the next one.

use std::time::{Duration, Instant};

use crate::deviation::Direction;

/// A debounced record that a deviation persisted for another full interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationEvent {
    /// When the event was emitted (not backdated to the interval boundary)
    pub at: Instant,
    /// Dominant direction at emission time
    pub direction: Direction,
}

/// Converts a continuously-true deviation condition into periodic events
#[derive(Debug)]
pub struct ViolationDebouncer {
    interval: Duration,
    deviation_start: Option<Instant>,
    violations_logged: u32,
}

impl ViolationDebouncer {
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Deviation interval must be positive");
        Self {
            interval,
            deviation_start: None,
            violations_logged: 0,
        }
    }

    /// Advance one tick. `deviation` is the dominant direction when the
    /// subject is deviating, `None` otherwise.
    pub fn update(&mut self, deviation: Option<Direction>, now: Instant) -> Option<ViolationEvent> {
        let Some(direction) = deviation else {
            self.deviation_start = None;
            self.violations_logged = 0;
            return None;
        };

        let start = *self.deviation_start.get_or_insert(now);
        let elapsed = now.duration_since(start);
        let completed = (elapsed.as_micros() / self.interval.as_micros()) as u32;
        if completed > self.violations_logged {
            self.violations_logged = completed;
            return Some(ViolationEvent { at: now, direction });
        }
        None
    }

    /// Shift an in-flight deviation start forward so that `gap` contributes
    /// nothing to the elapsed interval (used across face-absent stretches)
    pub fn defer(&mut self, gap: Duration) {
        if let Some(start) = &mut self.deviation_start {
            *start += gap;
        }
    }

    /// Discard any in-flight deviation tracking
    pub fn reset(&mut self) {
        self.deviation_start = None;
        self.violations_logged = 0;
    }
}
