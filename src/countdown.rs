// Launch countdown.
// Visual: four big zero-padded numbers (days / hours / minutes / seconds) that
// tick down once per second and freeze at 00 00 00 00 after launch.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

const SECS_PER_MIN: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MIN;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Whole units left until the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    /// Time left from `now` until `target`, floored per unit; zero once reached.
    pub fn until(target: SystemTime, now: SystemTime) -> Self {
        let Ok(left) = target.duration_since(now) else { return Self::default() };
        let secs = left.as_secs();
        Self {
            days: secs / SECS_PER_DAY,
            hours: (secs % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (secs % SECS_PER_HOUR) / SECS_PER_MIN,
            seconds: secs % SECS_PER_MIN,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Display strings, at least two digits each.
    pub fn padded(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|v| format!("{v:02}"))
    }
}

/// Parse an RFC 3339 instant; a missing offset is read as UTC.
pub fn parse_target(text: &str) -> Result<SystemTime, Error> {
    humantime::parse_rfc3339_weak(text)
        .map_err(|e| Error::Config(format!("launch target {text:?}: {e}")))
}

/// Countdown display slots, refreshed at most once per wall-clock second.
#[derive(Debug)]
pub struct Countdown {
    target: SystemTime,
    slots: [String; 4],
    last_second: Option<u64>,
}

impl Countdown {
    pub fn new(target: SystemTime) -> Self {
        Self { target, slots: Remaining::default().padded(), last_second: None }
    }

    /// Recompute the slots if a new second has started. Returns whether they were rewritten.
    pub fn refresh(&mut self, now: SystemTime) -> bool {
        let second = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        if self.last_second == Some(second) {
            return false;
        }
        self.last_second = Some(second);
        self.slots = Remaining::until(self.target, now).padded();
        true
    }

    pub fn slots(&self) -> &[String; 4] {
        &self.slots
    }
}
