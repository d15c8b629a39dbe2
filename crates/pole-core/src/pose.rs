use crate::constants::MAX_TRACKED_DEVICES;
use glam::Vec3;

/// Index of a tracked device slot in the runtime's device table.
pub type DeviceId = u32;

/// Slot 0 is always the head-mounted display.
pub const HMD_DEVICE: DeviceId = 0;

/// Coordinate origin a pose is expressed in.
///
/// `Raw` follows recentering and space-drag adjustments; `Standing` is
/// calibrated to the play area. The two can disagree vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingFrame {
    Raw,
    Standing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoseSample {
    pub position: Vec3,
    pub valid: bool,
}

impl PoseSample {
    pub const INVALID: Self = Self {
        position: Vec3::ZERO,
        valid: false,
    };

    #[inline]
    pub fn tracked(position: Vec3) -> Self {
        Self {
            position,
            valid: true,
        }
    }
}

/// One tick's worth of poses, one slot per possible device.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseSet {
    samples: [PoseSample; MAX_TRACKED_DEVICES],
}

impl Default for PoseSet {
    fn default() -> Self {
        Self {
            samples: [PoseSample::INVALID; MAX_TRACKED_DEVICES],
        }
    }
}

impl PoseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a slot. Out-of-range device ids are ignored.
    pub fn set(&mut self, device: DeviceId, sample: PoseSample) {
        if let Some(s) = self.samples.get_mut(device as usize) {
            *s = sample;
        }
    }

    pub fn sample(&self, device: DeviceId) -> PoseSample {
        self.samples
            .get(device as usize)
            .copied()
            .unwrap_or(PoseSample::INVALID)
    }

    /// Position of `device` if it is in range and tracked this tick.
    #[inline]
    pub fn position(&self, device: DeviceId) -> Option<Vec3> {
        let s = self.sample(device);
        s.valid.then_some(s.position)
    }

    #[inline]
    pub fn head(&self) -> Option<Vec3> {
        self.position(HMD_DEVICE)
    }
}

/// Supplies device poses. May be queried several times per tick with
/// different frames.
pub trait PoseSource {
    fn poses(&mut self, frame: TrackingFrame) -> PoseSet;
}

#[inline]
pub fn is_device_in_range(device: DeviceId) -> bool {
    (device as usize) < MAX_TRACKED_DEVICES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_has_no_valid_poses() {
        let set = PoseSet::new();
        assert!(set.head().is_none());
        assert!(set.position(5).is_none());
    }

    #[test]
    fn out_of_range_slots_read_as_invalid() {
        let mut set = PoseSet::new();
        set.set(MAX_TRACKED_DEVICES as DeviceId, PoseSample::tracked(Vec3::ONE));
        assert!(set.position(MAX_TRACKED_DEVICES as DeviceId).is_none());
        assert!(!is_device_in_range(MAX_TRACKED_DEVICES as DeviceId));
    }

    #[test]
    fn invalid_flag_hides_position() {
        let mut set = PoseSet::new();
        set.set(
            2,
            PoseSample {
                position: Vec3::new(1.0, 2.0, 3.0),
                valid: false,
            },
        );
        assert!(set.position(2).is_none());
        set.set(2, PoseSample::tracked(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(set.position(2), Some(Vec3::new(1.0, 2.0, 3.0)));
    }
}
