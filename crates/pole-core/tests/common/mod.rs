// Deterministic stand-ins for the tracking runtime and settings store.

#![allow(dead_code)]

use glam::{Affine3A, Vec3};
use pole_core::constants::{MAX_TRACKED_DEVICES, TRIGGER_BUTTON_ID};
use pole_core::{
    BoundaryQuad, CalibrationSource, CalibrationState, ConfigError, ConfigStore, EventSource,
    HostEvent, MarkerConfig, OverlayError, OverlayHandle, OverlaySink, PoseSample, PoseSet,
    PoseSource, TrackingFrame, HMD_DEVICE,
};
use std::collections::VecDeque;

pub const LEFT: u32 = 1;
pub const RIGHT: u32 = 2;

pub struct FakeHost {
    pub raw: PoseSet,
    /// Standing frame = raw frame shifted by this amount.
    pub standing_offset: Vec3,
    pub events: VecDeque<HostEvent>,
    pub calibration: CalibrationState,
    pub floor: Option<f32>,
    pub dashboard: bool,
    pub fail_alpha: bool,
    pub alphas: Vec<f32>,
    pub transforms: Vec<Affine3A>,
    pub shows: usize,
}

impl FakeHost {
    pub fn new() -> Self {
        let mut host = Self {
            raw: PoseSet::new(),
            standing_offset: Vec3::ZERO,
            events: VecDeque::new(),
            calibration: CalibrationState::Ok,
            floor: Some(0.0),
            dashboard: false,
            fail_alpha: false,
            alphas: Vec::new(),
            transforms: Vec::new(),
            shows: 0,
        };
        host.set_head(Vec3::new(1.0, 1.7, 0.5));
        host
    }

    pub fn set_head(&mut self, pos: Vec3) {
        self.raw.set(HMD_DEVICE, PoseSample::tracked(pos));
    }

    pub fn set_device(&mut self, device: u32, pos: Vec3) {
        self.raw.set(device, PoseSample::tracked(pos));
    }

    pub fn lose_device(&mut self, device: u32) {
        self.raw.set(device, PoseSample::INVALID);
    }

    pub fn press(&mut self, device: u32) {
        self.events.push_back(HostEvent::ButtonPress {
            device,
            button: TRIGGER_BUTTON_ID,
        });
    }

    pub fn release(&mut self, device: u32) {
        self.events.push_back(HostEvent::ButtonUnpress {
            device,
            button: TRIGGER_BUTTON_ID,
        });
    }
}

impl PoseSource for FakeHost {
    fn poses(&mut self, frame: TrackingFrame) -> PoseSet {
        match frame {
            TrackingFrame::Raw => self.raw.clone(),
            TrackingFrame::Standing => {
                let mut set = PoseSet::new();
                for device in 0..MAX_TRACKED_DEVICES as u32 {
                    let mut s = self.raw.sample(device);
                    s.position += self.standing_offset;
                    set.set(device, s);
                }
                set
            }
        }
    }
}

impl EventSource for FakeHost {
    fn poll_next_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

impl CalibrationSource for FakeHost {
    fn calibration_state(&mut self) -> CalibrationState {
        self.calibration
    }

    fn boundary_quad(&mut self) -> Option<BoundaryQuad> {
        self.floor.map(|y| BoundaryQuad {
            corners: [
                Vec3::new(-1.0, y, -1.0),
                Vec3::new(1.0, y, -1.0),
                Vec3::new(1.0, y, 1.0),
                Vec3::new(-1.0, y, 1.0),
            ],
        })
    }
}

impl OverlaySink for FakeHost {
    fn set_transform(
        &mut self,
        _: OverlayHandle,
        frame: TrackingFrame,
        transform: &Affine3A,
    ) -> Result<(), OverlayError> {
        assert_eq!(frame, TrackingFrame::Raw);
        self.transforms.push(*transform);
        Ok(())
    }

    fn set_alpha(&mut self, _: OverlayHandle, alpha: f32) -> Result<(), OverlayError> {
        if self.fail_alpha {
            return Err(OverlayError {
                call: "set_alpha",
                code: 3,
            });
        }
        self.alphas.push(alpha);
        Ok(())
    }

    fn set_color(&mut self, _: OverlayHandle, _: [f32; 3]) -> Result<(), OverlayError> {
        Ok(())
    }

    fn set_curvature(&mut self, _: OverlayHandle, _: f32) -> Result<(), OverlayError> {
        Ok(())
    }

    fn set_sort_order(&mut self, _: OverlayHandle, _: u32) -> Result<(), OverlayError> {
        Ok(())
    }

    fn show(&mut self, _: OverlayHandle) -> Result<(), OverlayError> {
        self.shows += 1;
        Ok(())
    }

    fn is_dashboard_visible(&mut self) -> bool {
        self.dashboard
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub stored: Option<MarkerConfig>,
    pub saves: usize,
    pub fail_load: bool,
}

impl ConfigStore for MemoryStore {
    fn load(&mut self) -> Result<MarkerConfig, ConfigError> {
        if self.fail_load {
            return Err(ConfigError::Malformed {
                path: "memory".into(),
                message: "unexpected end of input".into(),
            });
        }
        Ok(self.stored.clone().unwrap_or_default())
    }

    fn save(&mut self, config: &MarkerConfig) -> Result<(), ConfigError> {
        self.saves += 1;
        self.stored = Some(config.clone());
        Ok(())
    }
}
