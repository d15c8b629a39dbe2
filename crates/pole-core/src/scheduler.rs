//! Variable-cadence tick scheduling decoupled from the wall clock.

use crate::constants::{display_frame, DEFAULT_DISPLAY_HZ, IDLE_FRAME_MULTIPLIER};
use instant::Instant;
use std::cell::Cell;
use std::time::Duration;

/// Monotonic time source measured from an arbitrary session start.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock advanced by hand, for deterministic replays and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Decides when a full tick is due: every display frame while editing,
/// every third frame otherwise.
#[derive(Clone, Debug)]
pub struct TickScheduler {
    frame: Duration,
    last_tick: Duration,
}

impl TickScheduler {
    pub fn from_display_hz(display_hz: f32, now: Duration) -> Self {
        let frame = if display_hz.is_finite() {
            display_frame(display_hz)
        } else {
            None
        };
        let frame = match frame {
            Some(f) => f,
            None => {
                log::warn!(
                    "[scheduler] unusable display frequency {}, assuming {} Hz",
                    display_hz,
                    DEFAULT_DISPLAY_HZ
                );
                Duration::from_secs_f64(1.0 / DEFAULT_DISPLAY_HZ as f64)
            }
        };
        Self {
            frame,
            last_tick: now,
        }
    }

    #[inline]
    pub fn interval(&self, edit_mode: bool) -> Duration {
        if edit_mode {
            self.frame
        } else {
            self.frame.saturating_mul(IDLE_FRAME_MULTIPLIER)
        }
    }

    /// True when more than one interval has passed since the last tick; the
    /// tick is then considered started at `now`.
    pub fn poll(&mut self, now: Duration, edit_mode: bool) -> bool {
        if now.saturating_sub(self.last_tick) > self.interval(edit_mode) {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}
