// Coalesces bursts of events (window resizes) into one action after a quiet period.
// Visual: dragging the window edge doesn't reshuffle the particles every frame;
// they regenerate once, shortly after you let go.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, last_event: None }
    }

    /// Record an event; restarts the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// True exactly once, the first time it's polled after the quiet period.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(t) if now.saturating_duration_since(t) >= self.quiet => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}
