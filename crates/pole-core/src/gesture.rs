//! Trigger gesture classification.
//!
//! A single press stream feeds two gestures: a quick second press snaps the
//! marker, anything else is a hold that may become a drag. The detector keeps
//! the timing of the previous press and whether it already completed a
//! double-tap, so three quick presses read as double-tap then hold rather
//! than two overlapping double-taps.

use crate::constants::{DOUBLE_TAP_MAX_MS, DOUBLE_TAP_MIN_MS};
use crate::pose::DeviceId;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    DoubleTap { device: DeviceId },
    PressStart { device: DeviceId },
    PressEnd { device: DeviceId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TapPhase {
    /// No press seen this session.
    Fresh,
    /// Last press opened a tap window.
    Pressed { at: Duration },
    /// Last press closed a double-tap and cannot pair with the next one.
    DoubleTapped { at: Duration },
}

#[derive(Clone, Debug)]
pub struct GestureDetector {
    phase: TapPhase,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self {
            phase: TapPhase::Fresh,
        }
    }
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a trigger press at `now`. The press always restarts the tap
    /// window, whichever device it came from.
    pub fn press(&mut self, device: DeviceId, now: Duration) -> Gesture {
        let gesture = match self.phase {
            TapPhase::Pressed { at } if in_double_tap_window(now.saturating_sub(at)) => {
                self.phase = TapPhase::DoubleTapped { at: now };
                Gesture::DoubleTap { device }
            }
            _ => {
                self.phase = TapPhase::Pressed { at: now };
                Gesture::PressStart { device }
            }
        };
        log::trace!("[gesture] device {} -> {:?}", device, gesture);
        gesture
    }

    /// A release only ends a hold when it comes from the device being dragged.
    pub fn release(&self, device: DeviceId, dragging: Option<DeviceId>) -> Option<Gesture> {
        (dragging == Some(device)).then_some(Gesture::PressEnd { device })
    }

    pub fn last_press(&self) -> Option<Duration> {
        match self.phase {
            TapPhase::Fresh => None,
            TapPhase::Pressed { at } | TapPhase::DoubleTapped { at } => Some(at),
        }
    }

    pub fn last_was_double_tap(&self) -> bool {
        matches!(self.phase, TapPhase::DoubleTapped { .. })
    }
}

#[inline]
fn in_double_tap_window(gap: Duration) -> bool {
    let ms = gap.as_millis();
    ms > DOUBLE_TAP_MIN_MS && ms < DOUBLE_TAP_MAX_MS
}
