//! Scripted stand-in for a VR tracking runtime.
//!
//! The headset circles the pole while a single controller follows a timed
//! script of trigger presses and moves. Everything is a pure function of the
//! time passed to [`SimulatedHost::advance`], so replays are deterministic.

use glam::{Affine3A, Vec3};
use pole_core::constants::TRIGGER_BUTTON_ID;
use pole_core::{
    BoundaryQuad, CalibrationSource, CalibrationState, Command, DeviceId, EventSource, HostEvent,
    OverlayError, OverlayHandle, OverlaySink, PoseSample, PoseSet, PoseSource, TrackingFrame,
    HMD_DEVICE,
};
use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::Duration;
use thiserror::Error;

pub const CONTROLLER: DeviceId = 1;

const HEAD_HEIGHT: f32 = 1.7;
const ORBIT_RADIUS: f32 = 1.1;
const ORBIT_PERIOD: Duration = Duration::from_secs(12);
/// Runtime error codes echoed back by rejected overlay calls.
const ERROR_UNKNOWN_OVERLAY: i32 = 10;
const ERROR_KEY_IN_USE: i32 = 13;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("tracking runtime refused to start: {0}")]
    Init(String),
    #[error("overlay {key} could not be created")]
    CreateOverlay {
        key: String,
        #[source]
        source: OverlayError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Command(Command),
    Event(HostEvent),
    Press,
    Release,
    /// Glide the controller to a new raw position.
    MoveController { to: Vec3, over: Duration },
}

/// A step and the session time it fires at.
pub type ScriptEntry = (Duration, Step);

/// Enter edit mode, double-tap to snap, hold-drag, save, then quit.
pub fn demo_script() -> Vec<ScriptEntry> {
    let ms = Duration::from_millis;
    vec![
        (ms(500), Step::Command(Command::ToggleEdit)),
        (ms(1000), Step::Press),
        (ms(1100), Step::Release),
        (ms(1300), Step::Press),
        (ms(1400), Step::Release),
        (ms(2500), Step::Press),
        (
            ms(2600),
            Step::MoveController {
                to: Vec3::new(0.8, 1.0, -0.1),
                over: ms(1000),
            },
        ),
        (ms(4000), Step::Release),
        (ms(5000), Step::Command(Command::ToggleEdit)),
        (ms(6000), Step::Event(HostEvent::ChaperoneSettingsChanged)),
        (ms(8000), Step::Event(HostEvent::Quit)),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    start: Duration,
    over: Duration,
    from: Vec3,
    to: Vec3,
}

impl Glide {
    fn at(&self, now: Duration) -> Vec3 {
        if self.over.is_zero() {
            return self.to;
        }
        let t = now.saturating_sub(self.start).as_secs_f32() / self.over.as_secs_f32();
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, t)
    }
}

/// What the runtime would currently be drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayState {
    pub alpha: f32,
    pub color: [f32; 3],
    pub curvature: f32,
    pub sort_order: u32,
    pub visible: bool,
    pub transform: Option<Affine3A>,
}

pub struct SimulatedHost {
    display_hz: f32,
    now: Duration,
    script: VecDeque<ScriptEntry>,
    events: VecDeque<HostEvent>,
    commands: VecDeque<Command>,
    controller: Vec3,
    glide: Option<Glide>,
    /// Standing-frame poses sit this far from raw ones.
    standing_offset: Vec3,
    floor_height: f32,
    calibration: CalibrationState,
    overlay: Option<(String, OverlayHandle)>,
    next_handle: u64,
    state: OverlayState,
}

impl SimulatedHost {
    pub fn init(display_hz: f32, script: Vec<ScriptEntry>) -> Result<Self, HostError> {
        if !display_hz.is_finite() || display_hz <= 0.0 {
            return Err(HostError::Init(format!(
                "headset reports a display frequency of {} Hz",
                display_hz
            )));
        }
        let mut script: Vec<_> = script;
        script.sort_by_key(|(at, _)| *at);
        log::info!(
            "[sim] runtime up at {} Hz with {} scripted steps",
            display_hz,
            script.len()
        );
        Ok(Self {
            display_hz,
            now: Duration::ZERO,
            script: script.into(),
            events: VecDeque::new(),
            commands: VecDeque::new(),
            controller: Vec3::new(0.4, 1.0, -0.3),
            glide: None,
            standing_offset: Vec3::new(0.0, 0.04, 0.0),
            floor_height: -0.02,
            calibration: CalibrationState::Ok,
            overlay: None,
            next_handle: 1,
            state: OverlayState::default(),
        })
    }

    pub fn display_frequency(&self) -> f32 {
        self.display_hz
    }

    pub fn overlay_state(&self) -> &OverlayState {
        &self.state
    }

    #[cfg(test)]
    pub fn controller_position(&self) -> Vec3 {
        self.controller
    }

    /// Report the boundary as unusable so snaps keep the configured height.
    pub fn set_calibration(&mut self, state: CalibrationState) {
        self.calibration = state;
    }

    pub fn create_overlay(&mut self, key: &str, name: &str) -> Result<OverlayHandle, HostError> {
        if let Some((existing, _)) = &self.overlay {
            if existing == key {
                return Err(HostError::CreateOverlay {
                    key: key.to_string(),
                    source: OverlayError {
                        call: "create_overlay",
                        code: ERROR_KEY_IN_USE,
                    },
                });
            }
        }
        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        self.overlay = Some((key.to_string(), handle));
        self.state = OverlayState::default();
        log::info!("[sim] created overlay {} ({}) as {:?}", key, name, handle);
        Ok(handle)
    }

    pub fn destroy_overlay(&mut self, handle: OverlayHandle) -> Result<(), OverlayError> {
        self.check(handle, "destroy_overlay")?;
        self.overlay = None;
        self.state.visible = false;
        log::info!("[sim] destroyed overlay {:?}", handle);
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.events.clear();
        self.commands.clear();
        log::info!("[sim] runtime shut down at {:.2}s", self.now.as_secs_f32());
    }

    /// Move simulated time forward and fire every script step that is due.
    pub fn advance(&mut self, now: Duration) {
        self.now = now;
        while self.script.front().is_some_and(|(at, _)| *at <= now) {
            let Some((at, step)) = self.script.pop_front() else {
                break;
            };
            self.fire(at, step);
        }
        if let Some(glide) = self.glide {
            self.controller = glide.at(now);
            if now >= glide.start + glide.over {
                self.glide = None;
            }
        }
    }

    fn fire(&mut self, at: Duration, step: Step) {
        log::debug!("[sim] {:.3}s {:?}", at.as_secs_f32(), step);
        match step {
            Step::Command(c) => self.commands.push_back(c),
            Step::Event(e) => self.events.push_back(e),
            Step::Press => self.events.push_back(HostEvent::ButtonPress {
                device: CONTROLLER,
                button: TRIGGER_BUTTON_ID,
            }),
            Step::Release => self.events.push_back(HostEvent::ButtonUnpress {
                device: CONTROLLER,
                button: TRIGGER_BUTTON_ID,
            }),
            Step::MoveController { to, over } => {
                self.glide = Some(Glide {
                    start: at,
                    over,
                    from: self.controller,
                    to,
                });
            }
        }
    }

    /// Next keyboard-style command, if the script issued one.
    pub fn take_command(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub fn is_finished(&self) -> bool {
        self.script.is_empty() && self.events.is_empty() && self.commands.is_empty()
    }

    fn head(&self) -> Vec3 {
        let phase = (self.now.as_secs_f32() / ORBIT_PERIOD.as_secs_f32()).fract() * TAU;
        Vec3::new(
            ORBIT_RADIUS * phase.sin(),
            HEAD_HEIGHT,
            ORBIT_RADIUS * phase.cos(),
        )
    }

    fn check(&self, handle: OverlayHandle, call: &'static str) -> Result<(), OverlayError> {
        match self.overlay {
            Some((_, h)) if h == handle => Ok(()),
            _ => Err(OverlayError {
                call,
                code: ERROR_UNKNOWN_OVERLAY,
            }),
        }
    }
}

impl PoseSource for SimulatedHost {
    fn poses(&mut self, frame: TrackingFrame) -> PoseSet {
        let offset = match frame {
            TrackingFrame::Raw => Vec3::ZERO,
            TrackingFrame::Standing => self.standing_offset,
        };
        let mut set = PoseSet::new();
        set.set(HMD_DEVICE, PoseSample::tracked(self.head() + offset));
        set.set(CONTROLLER, PoseSample::tracked(self.controller + offset));
        set
    }
}

impl EventSource for SimulatedHost {
    fn poll_next_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

impl CalibrationSource for SimulatedHost {
    fn calibration_state(&mut self) -> CalibrationState {
        self.calibration
    }

    fn boundary_quad(&mut self) -> Option<BoundaryQuad> {
        let y = self.floor_height;
        Some(BoundaryQuad {
            corners: [
                Vec3::new(-1.5, y, -1.0),
                Vec3::new(1.5, y, -1.0),
                Vec3::new(1.5, y, 1.0),
                Vec3::new(-1.5, y, 1.0),
            ],
        })
    }
}

impl OverlaySink for SimulatedHost {
    fn set_transform(
        &mut self,
        handle: OverlayHandle,
        frame: TrackingFrame,
        transform: &Affine3A,
    ) -> Result<(), OverlayError> {
        self.check(handle, "set_transform")?;
        if frame != TrackingFrame::Raw {
            log::trace!("[sim] transform in {:?} frame", frame);
        }
        self.state.transform = Some(*transform);
        Ok(())
    }

    fn set_alpha(&mut self, handle: OverlayHandle, alpha: f32) -> Result<(), OverlayError> {
        self.check(handle, "set_alpha")?;
        self.state.alpha = alpha;
        Ok(())
    }

    fn set_color(&mut self, handle: OverlayHandle, rgb: [f32; 3]) -> Result<(), OverlayError> {
        self.check(handle, "set_color")?;
        self.state.color = rgb;
        Ok(())
    }

    fn set_curvature(&mut self, handle: OverlayHandle, amount: f32) -> Result<(), OverlayError> {
        self.check(handle, "set_curvature")?;
        self.state.curvature = amount;
        Ok(())
    }

    fn set_sort_order(&mut self, handle: OverlayHandle, order: u32) -> Result<(), OverlayError> {
        self.check(handle, "set_sort_order")?;
        self.state.sort_order = order;
        Ok(())
    }

    fn show(&mut self, handle: OverlayHandle) -> Result<(), OverlayError> {
        self.check(handle, "show")?;
        self.state.visible = true;
        Ok(())
    }

    fn is_dashboard_visible(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn rejects_unusable_display_frequency() {
        assert!(matches!(
            SimulatedHost::init(0.0, Vec::new()),
            Err(HostError::Init(_))
        ));
    }

    #[test]
    fn script_steps_fire_in_time_order() {
        let script = vec![
            (ms(200), Step::Event(HostEvent::Quit)),
            (ms(100), Step::Command(Command::ToggleEdit)),
            (ms(100), Step::Press),
        ];
        let mut host = SimulatedHost::init(90.0, script).unwrap();
        host.advance(ms(50));
        assert_eq!(host.take_command(), None);
        host.advance(ms(150));
        assert_eq!(host.take_command(), Some(Command::ToggleEdit));
        assert!(matches!(
            host.poll_next_event(),
            Some(HostEvent::ButtonPress { device: CONTROLLER, .. })
        ));
        assert_eq!(host.poll_next_event(), None);
        host.advance(ms(250));
        assert_eq!(host.poll_next_event(), Some(HostEvent::Quit));
        assert!(host.is_finished());
    }

    #[test]
    fn controller_glides_then_rests() {
        let to = Vec3::new(1.0, 1.0, 1.0);
        let mut host = SimulatedHost::init(
            90.0,
            vec![(ms(0), Step::MoveController { to, over: ms(1000) })],
        )
        .unwrap();
        let from = host.controller_position();
        host.advance(ms(0));
        host.advance(ms(500));
        assert!(host.controller_position().distance(from.lerp(to, 0.5)) < 1e-5);
        host.advance(ms(1000));
        assert_eq!(host.controller_position(), to);
        host.advance(ms(2000));
        assert_eq!(host.controller_position(), to);
    }

    #[test]
    fn standing_frame_is_offset() {
        let mut host = SimulatedHost::init(90.0, Vec::new()).unwrap();
        let raw = host.poses(TrackingFrame::Raw);
        let standing = host.poses(TrackingFrame::Standing);
        let dy = standing.position(CONTROLLER).unwrap().y - raw.position(CONTROLLER).unwrap().y;
        assert!((dy - 0.04).abs() < 1e-6);
        let orbit = (ORBIT_RADIUS.powi(2) + HEAD_HEIGHT.powi(2)).sqrt();
        assert!((raw.head().unwrap().length() - orbit).abs() < 1e-5);
    }

    #[test]
    fn overlay_calls_need_a_live_handle() {
        let mut host = SimulatedHost::init(90.0, Vec::new()).unwrap();
        let h = host.create_overlay("k", "n").unwrap();
        assert!(host.create_overlay("k", "n").is_err());
        assert!(host.show(h).is_ok());
        assert!(host.overlay_state().visible);
        host.destroy_overlay(h).unwrap();
        assert_eq!(host.set_alpha(h, 0.5).unwrap_err().code, ERROR_UNKNOWN_OVERLAY);
    }
}
