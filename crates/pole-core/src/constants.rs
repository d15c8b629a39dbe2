use std::time::Duration;

// Shared tuning constants for the pole marker and its controller interaction.

// Gesture timing (whole milliseconds between consecutive trigger presses)
pub const DOUBLE_TAP_MIN_MS: u128 = 100; // faster than this is contact bounce, not a second tap
pub const DOUBLE_TAP_MAX_MS: u128 = 400; // slower than this starts a new hold instead

// Overlay geometry
pub const TEXTURE_ASPECT: f32 = 0.5; // width / height of the pole texture
pub const OVERLAY_CURVATURE: f32 = 1.0; // fully wrapped cylinder
pub const ALWAYS_ON_TOP_SORT_ORDER: u32 = u32::MAX;

// Visibility
pub const FADE_CUTOFF: f32 = 0.001; // fade factors below this skip the transform update
pub const EDIT_PULSE_FLOOR: f32 = 0.1; // minimum alpha fraction while pulsing in edit mode
pub const EDIT_PULSE_SPAN: f32 = 0.9;

// Scheduling
pub const IDLE_FRAME_MULTIPLIER: u32 = 3; // outside edit mode, tick every third display frame
pub const DEFAULT_DISPLAY_HZ: f32 = 90.0;

// Tracking runtime
pub const MAX_TRACKED_DEVICES: usize = 64;
pub const TRIGGER_BUTTON_ID: u32 = 33;

// Overlay identity
pub const APPLICATION_KEY: &str = "dev.poleoverlay";
pub const OVERLAY_KEY: &str = "dev.poleoverlay.pole";
pub const OVERLAY_NAME: &str = "PoleOverlay";
pub const SETTINGS_FILENAME: &str = "settings.json";

// Settings limits
pub const COORDINATE_LIMIT: f32 = 100.0;
pub const HEIGHT_MIN: f32 = 0.5;
pub const HEIGHT_MAX: f32 = 100.0;
pub const DIAMETER_MIN: f32 = 0.01;
pub const DIAMETER_MAX: f32 = 1.0;

/// Length of one display frame, or `None` when the rate is not positive or
/// the frame would not fit in a `Duration`.
#[inline]
pub fn display_frame(display_hz: f32) -> Option<Duration> {
    if display_hz.is_nan() || display_hz <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / display_hz as f64).ok()
}
