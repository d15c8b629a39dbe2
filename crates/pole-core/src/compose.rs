//! Marker transform composition.
//!
//! Each tick the pole is turned to face the viewer around the vertical axis,
//! pulled toward them by half its diameter (a curved overlay is tangent to
//! its anchor point rather than centred on it), shifted by any live drag and
//! faded by viewer distance. Edit mode replaces the distance fade with a
//! pulsing alpha.

use crate::config::MarkerConfig;
use crate::constants::{EDIT_PULSE_FLOOR, EDIT_PULSE_SPAN, FADE_CUTOFF, TEXTURE_ASPECT};
use glam::{Affine3A, Quat, Vec3};
use std::f32::consts::PI;
use std::time::Duration;

/// Values derived from the config that only change when the config does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerGeometry {
    /// Horizontal scale is the circumference: the texture is a flat strip
    /// wrapped into a cylinder.
    pub scale: Vec3,
    /// Pole centre; the overlay anchor sits half a height above the base.
    pub translation: Vec3,
}

impl MarkerGeometry {
    pub fn from_config(config: &MarkerConfig) -> Self {
        let circumference = config.diameter * PI;
        Self {
            scale: Vec3::new(
                circumference,
                config.height * TEXTURE_ASPECT,
                circumference,
            ),
            translation: Vec3::new(
                config.pos_x,
                config.pos_y + config.height / 2.0,
                config.pos_z,
            ),
        }
    }

    /// Fold a committed drag into the cached anchor without touching height.
    pub fn commit_planar(&mut self, config: &MarkerConfig) {
        self.translation.x = config.pos_x;
        self.translation.z = config.pos_z;
    }
}

/// Placement of the marker for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerTransform {
    /// Viewer bearing; the overlay is rotated by its negation.
    pub angle: f32,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl MarkerTransform {
    /// `T * R_y(-angle) * S`
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(-self.angle),
            self.translation,
        )
    }

    /// 3x4 row-major layout (last column is translation) used by overlay APIs.
    pub fn row_major_3x4(&self) -> [[f32; 4]; 3] {
        let a = self.to_affine();
        let (x, y, z) = (a.matrix3.x_axis, a.matrix3.y_axis, a.matrix3.z_axis);
        let t = a.translation;
        [
            [x.x, y.x, z.x, t.x],
            [x.y, y.y, z.y, t.y],
            [x.z, y.z, z.z, t.z],
        ]
    }
}

pub struct ComposeInput<'a> {
    pub config: &'a MarkerConfig,
    pub geometry: &'a MarkerGeometry,
    /// Viewer position in the raw frame, `None` when the headset is untracked.
    pub head: Option<Vec3>,
    /// Uncommitted drag, zero when not dragging.
    pub drag_offset: Vec3,
    /// Time since edit mode was entered, `None` outside edit mode.
    pub edit_elapsed: Option<Duration>,
}

/// What to push to the overlay this tick. `None` fields keep the previous value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Composed {
    pub alpha: Option<f32>,
    pub transform: Option<MarkerTransform>,
}

/// Quintic smoothstep: 0 at `edge0`, 1 at `edge1`, zero slope at both ends.
pub fn smootherstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * t * (t * (6.0 * t - 15.0) + 10.0)
}

/// 1 when nearer than `near`, 0 beyond `far`.
#[inline]
pub fn fade_factor(near: f32, far: f32, distance: f32) -> f32 {
    1.0 - smootherstep(near, far, distance)
}

/// Alpha multiplier that pulses once a second while editing.
pub fn edit_pulse(elapsed: Duration) -> f32 {
    let phase = elapsed.as_secs_f64() * std::f64::consts::PI;
    EDIT_PULSE_FLOOR + EDIT_PULSE_SPAN * phase.cos().abs() as f32
}

pub fn compose(input: &ComposeInput<'_>) -> Composed {
    let config = input.config;
    let mut out = Composed {
        alpha: input
            .edit_elapsed
            .map(|t| config.transparency * edit_pulse(t)),
        transform: None,
    };

    let Some(head) = input.head else {
        log::trace!("[compose] headset untracked, keeping last transform");
        return out;
    };
    let base = input.geometry.translation;
    let to_viewer = Vec3::new(head.x - base.x, 0.0, head.z - base.z);
    if to_viewer.x == 0.0 && to_viewer.z == 0.0 {
        return out;
    }

    if input.edit_elapsed.is_none() {
        let fade = fade_factor(config.fade_near, config.fade_far, to_viewer.length());
        out.alpha = Some(config.transparency * fade);
        if fade < FADE_CUTOFF {
            return out;
        }
    }

    let angle = to_viewer.x.atan2(to_viewer.z);
    if !angle.is_normal() {
        log::trace!("[compose] degenerate facing angle {}", angle);
        return out;
    }

    let nudge = to_viewer.normalize() * (config.diameter / 2.0);
    out.transform = Some(MarkerTransform {
        angle,
        scale: input.geometry.scale,
        translation: base - nudge - input.drag_offset,
    });
    out
}
