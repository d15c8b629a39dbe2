//! Marker configuration snapshot and the persisted-settings seam.
//!
//! `MarkerConfig` mirrors the user-editable settings file field for field, so
//! the same type is what gets loaded, validated, edited by the interaction
//! state machine and written back.

use crate::constants::{
    COORDINATE_LIMIT, DIAMETER_MAX, DIAMETER_MIN, HEIGHT_MAX, HEIGHT_MIN,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MarkerConfig {
    pub always_on_top: bool,
    pub ask_autostart: bool,
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
    pub transparency: f32, // 0 invisible, 1 solid
    pub fade_near: f32,    // fully visible closer than this
    pub fade_far: f32,     // invisible further than this
    pub pos_x: f32,
    pub pos_y: f32,
    pub pos_z: f32,
    pub height: f32,
    pub diameter: f32,
    pub drag_scale: f32, // position change per metre of controller drag
    #[serde(rename = "FILENAME_IMG_POLE")]
    pub texture_path: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            always_on_top: false,
            ask_autostart: true,
            color_r: 255,
            color_g: 255,
            color_b: 255,
            transparency: 0.3,
            fade_near: 0.8,
            fade_far: 1.5,
            pos_x: 0.0,
            pos_y: 0.0,
            pos_z: 0.0,
            height: 3.0,
            diameter: 0.045,
            drag_scale: 0.5,
            texture_path: "Assets/texture.png".to_string(),
        }
    }
}

impl MarkerConfig {
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.pos_x, self.pos_y, self.pos_z)
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec3) {
        self.pos_x = pos.x;
        self.pos_y = pos.y;
        self.pos_z = pos.z;
    }

    /// Tint as normalised RGB in \[0, 1\].
    pub fn color_rgb(&self) -> [f32; 3] {
        [
            self.color_r as f32 / 255.0,
            self.color_g as f32 / 255.0,
            self.color_b as f32 / 255.0,
        ]
    }

    /// Clamp user-supplied values into the ranges the overlay can display.
    pub fn validate(&mut self) {
        let clamp_coord = |v: f32| v.clamp(-COORDINATE_LIMIT, COORDINATE_LIMIT);
        self.pos_x = clamp_coord(self.pos_x);
        self.pos_y = clamp_coord(self.pos_y);
        self.pos_z = clamp_coord(self.pos_z);
        self.height = self.height.clamp(HEIGHT_MIN, HEIGHT_MAX);
        self.diameter = self.diameter.clamp(DIAMETER_MIN, DIAMETER_MAX);
        self.transparency = self.transparency.clamp(0.0, 1.0);
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Persisted settings collaborator. Reload and edit-mode exit go through it.
pub trait ConfigStore {
    fn load(&mut self) -> Result<MarkerConfig, ConfigError>;
    fn save(&mut self, config: &MarkerConfig) -> Result<(), ConfigError>;
}
