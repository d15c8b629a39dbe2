//! Edit-mode interaction state machine.
//!
//! `Idle` accepts no controller input. `Editing` accepts gestures and pulses
//! the marker. `Dragging` is editing with one controller holding the marker;
//! the drag lives inside the mode so a dragging device cannot exist outside it.

use crate::config::MarkerConfig;
use crate::pose::{is_device_in_range, DeviceId, PoseSet};
use glam::Vec3;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub device: DeviceId,
    /// Controller position when the hold started.
    pub anchor: Vec3,
    /// Latest tracked controller position.
    pub current: Vec3,
}

impl DragState {
    /// Planar marker offset for the drag so far. Height is never dragged.
    pub fn offset(&self, drag_scale: f32) -> Vec3 {
        let mut o = (self.anchor - self.current) * drag_scale;
        o.y = 0.0;
        o
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Mode {
    #[default]
    Idle,
    Editing,
    Dragging(DragState),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("edit mode is off")]
    NotEditing,
    #[error("device {0} is already dragging")]
    AlreadyDragging(DeviceId),
    #[error("device {0} has no valid pose")]
    PoseInvalid(DeviceId),
    #[error("device id {0} is out of range")]
    DeviceOutOfRange(DeviceId),
}

/// Inputs for re-deriving marker height on a snap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorReference {
    /// Floor height reported by the boundary calibration.
    pub floor_height: f32,
    /// Height of the snapping controller in the standing frame.
    pub standing_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    mode: Mode,
    edit_started: Option<Duration>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_editing(&self) -> bool {
        !matches!(self.mode, Mode::Idle)
    }

    pub fn drag(&self) -> Option<&DragState> {
        match &self.mode {
            Mode::Dragging(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn dragging_device(&self) -> Option<DeviceId> {
        self.drag().map(|d| d.device)
    }

    /// Start editing and restart the pulse clock. No-op when already editing.
    pub fn enter_edit(&mut self, now: Duration) -> bool {
        if self.is_editing() {
            return false;
        }
        self.mode = Mode::Editing;
        self.edit_started = Some(now);
        true
    }

    /// Leave edit mode, discarding any uncommitted drag.
    pub fn exit_edit(&mut self) -> Option<DragState> {
        let cancelled = self.drag().copied();
        self.mode = Mode::Idle;
        self.edit_started = None;
        cancelled
    }

    /// Time spent in edit mode, driving the alpha pulse.
    pub fn edit_elapsed(&self, now: Duration) -> Option<Duration> {
        self.edit_started.map(|t| now.saturating_sub(t))
    }

    pub fn begin_drag(&mut self, device: DeviceId, raw: &PoseSet) -> Result<(), InteractionError> {
        match self.mode {
            Mode::Idle => return Err(InteractionError::NotEditing),
            Mode::Dragging(d) => return Err(InteractionError::AlreadyDragging(d.device)),
            Mode::Editing => {}
        }
        let anchor = raw
            .position(device)
            .ok_or(InteractionError::PoseInvalid(device))?;
        self.mode = Mode::Dragging(DragState {
            device,
            anchor,
            current: anchor,
        });
        Ok(())
    }

    /// Track the dragging controller and return the live offset. An untracked
    /// controller keeps its last known position for this tick.
    pub fn update_drag(&mut self, raw: &PoseSet, drag_scale: f32) -> Vec3 {
        match &mut self.mode {
            Mode::Dragging(d) => {
                if let Some(p) = raw.position(d.device) {
                    d.current = p;
                }
                d.offset(drag_scale)
            }
            _ => Vec3::ZERO,
        }
    }

    /// Release by `device`: fold the planar drag into the config position.
    /// Returns the applied offset, or `None` when `device` was not dragging.
    pub fn end_drag(&mut self, device: DeviceId, config: &mut MarkerConfig) -> Option<Vec3> {
        let drag = *self.drag().filter(|d| d.device == device)?;
        let delta = drag.anchor - drag.current;
        config.pos_x -= delta.x * config.drag_scale;
        config.pos_z -= delta.z * config.drag_scale;
        self.mode = Mode::Editing;
        Some(drag.offset(config.drag_scale))
    }

    /// Drop an active drag without committing it.
    pub fn cancel_drag(&mut self) -> Option<DragState> {
        let drag = self.drag().copied()?;
        self.mode = Mode::Editing;
        Some(drag)
    }
}

/// Resolve the controller a snap targets, rejecting slots that cannot exist.
pub fn snap_target(device: DeviceId, raw: &PoseSet) -> Result<Vec3, InteractionError> {
    if !is_device_in_range(device) {
        return Err(InteractionError::DeviceOutOfRange(device));
    }
    raw.position(device)
        .ok_or(InteractionError::PoseInvalid(device))
}

/// Move the marker onto a controller's raw-frame position.
///
/// With a floor reference the base height becomes the floor, corrected by how
/// far the raw and standing origins have drifted apart at the controller.
/// Without one the height is left as is.
pub fn snap_to(config: &mut MarkerConfig, raw: Vec3, floor: Option<FloorReference>) {
    config.pos_x = raw.x;
    config.pos_z = raw.z;
    if let Some(f) = floor {
        config.pos_y = f.floor_height - (f.standing_y - raw.y);
    }
}
