//! One marker, one interaction, threaded explicitly through every tick.
//!
//! `SessionState` owns the config snapshot, the cached geometry, the gesture
//! detector and the interaction state machine. The host is passed in per call
//! so the whole pipeline runs against in-memory fakes in tests.

use crate::calibration::{resolve_floor_height, CalibrationSource};
use crate::compose::{compose, ComposeInput, Composed, MarkerGeometry, MarkerTransform};
use crate::config::{ConfigStore, MarkerConfig};
use crate::events::{dispatch, Command, Dispatch, EventSource, HostEvent};
use crate::gesture::{Gesture, GestureDetector};
use crate::interaction::{snap_target, snap_to, FloorReference, InteractionError, InteractionState};
use crate::overlay::{apply_marker_config, report, OverlayHandle, OverlaySink};
use crate::pose::{DeviceId, PoseSource, TrackingFrame};
use std::time::Duration;

/// Everything the session needs from the tracking runtime.
pub trait TrackingHost: PoseSource + EventSource + CalibrationSource + OverlaySink {}

impl<T> TrackingHost for T where
    T: PoseSource + EventSource + CalibrationSource + OverlaySink + ?Sized
{
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub events: usize,
    pub composed: Composed,
}

pub struct SessionState {
    config: MarkerConfig,
    geometry: MarkerGeometry,
    interaction: InteractionState,
    gestures: GestureDetector,
    overlay: OverlayHandle,
    last_transform: Option<MarkerTransform>,
    running: bool,
}

impl SessionState {
    pub fn new(config: MarkerConfig, overlay: OverlayHandle) -> Self {
        Self {
            geometry: MarkerGeometry::from_config(&config),
            config,
            interaction: InteractionState::new(),
            gestures: GestureDetector::new(),
            overlay,
            last_transform: None,
            running: true,
        }
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    pub fn geometry(&self) -> &MarkerGeometry {
        &self.geometry
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn gestures(&self) -> &GestureDetector {
        &self.gestures
    }

    pub fn overlay(&self) -> OverlayHandle {
        self.overlay
    }

    /// Last transform pushed to the overlay.
    pub fn last_transform(&self) -> Option<MarkerTransform> {
        self.last_transform
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_editing(&self) -> bool {
        self.interaction.is_editing()
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Rebuild cached geometry and push the static overlay settings.
    pub fn configure_overlay<H>(&mut self, sink: &mut H)
    where
        H: OverlaySink + ?Sized,
    {
        self.geometry = MarkerGeometry::from_config(&self.config);
        apply_marker_config(sink, self.overlay, &self.config);
    }

    /// Replace the config from the store. A failed load keeps the current one.
    pub fn reload<H, S>(&mut self, sink: &mut H, store: &mut S)
    where
        H: OverlaySink + ?Sized,
        S: ConfigStore + ?Sized,
    {
        match store.load() {
            Ok(config) => self.config = config,
            Err(e) => log::warn!("[config] reload failed, keeping current settings: {}", e),
        }
        self.configure_overlay(sink);
    }

    pub fn command<H, S>(&mut self, command: Command, host: &mut H, store: &mut S, now: Duration)
    where
        H: TrackingHost + ?Sized,
        S: ConfigStore + ?Sized,
    {
        match command {
            Command::ToggleEdit if self.is_editing() => self.exit_edit(host, store),
            Command::ToggleEdit => {
                self.interaction.enter_edit(now);
                log::info!("[edit] edit mode activated");
            }
            Command::Reload => {
                log::info!("[config] reloading");
                self.reload(host, store);
            }
            Command::Quit => self.stop(),
        }
    }

    fn exit_edit<H, S>(&mut self, host: &mut H, store: &mut S)
    where
        H: TrackingHost + ?Sized,
        S: ConfigStore + ?Sized,
    {
        if let Some(drag) = self.interaction.exit_edit() {
            log::info!("[drag] device {} drag discarded", drag.device);
        }
        log::info!("[edit] edit mode deactivated, saving settings");
        if let Err(e) = store.save(&self.config) {
            log::warn!("[config] save failed: {}", e);
        }
        self.configure_overlay(host);
    }

    pub fn handle_event<H, S>(&mut self, event: HostEvent, host: &mut H, store: &mut S, now: Duration)
    where
        H: TrackingHost + ?Sized,
        S: ConfigStore + ?Sized,
    {
        match dispatch(&event) {
            Dispatch::Quit => {
                log::info!("[events] quit requested by host");
                self.stop();
            }
            Dispatch::Reload => {
                log::info!("[events] overlay reload requested");
                self.reload(host, store);
            }
            Dispatch::TriggerPress(device) => self.on_press(device, host, now),
            Dispatch::TriggerRelease(device) => self.on_release(device),
            Dispatch::Ignore => {}
        }
    }

    fn on_press<H>(&mut self, device: DeviceId, host: &mut H, now: Duration)
    where
        H: TrackingHost + ?Sized,
    {
        // Input meant for the dashboard or sent outside edit mode must not
        // touch the tap timing either.
        if !self.is_editing() || host.is_dashboard_visible() {
            return;
        }
        match self.gestures.press(device, now) {
            // A snap may land while another press is dragging; both proceed.
            Gesture::DoubleTap { device } => self.snap(device, host),
            Gesture::PressStart { device } => {
                let raw = host.poses(TrackingFrame::Raw);
                match self.interaction.begin_drag(device, &raw) {
                    Ok(()) => log::info!("[drag] device {} grabbed the pole", device),
                    Err(InteractionError::AlreadyDragging(d)) => {
                        log::debug!("[drag] ignoring device {}, device {} is dragging", device, d)
                    }
                    Err(e) => log::warn!("[drag] cannot start dragging: {}", e),
                }
            }
            Gesture::PressEnd { .. } => {}
        }
    }

    fn on_release(&mut self, device: DeviceId) {
        if !self.is_editing() {
            // Nothing is committed outside edit mode.
            self.interaction.cancel_drag();
            return;
        }
        let dragging = self.interaction.dragging_device();
        let Some(Gesture::PressEnd { device }) = self.gestures.release(device, dragging) else {
            return;
        };
        if let Some(applied) = self.interaction.end_drag(device, &mut self.config) {
            self.geometry.commit_planar(&self.config);
            log::info!(
                "[drag] device {} moved the pole by ({:.3}, {:.3})",
                device,
                -applied.x,
                -applied.z
            );
        }
    }

    fn snap<H>(&mut self, device: DeviceId, host: &mut H)
    where
        H: TrackingHost + ?Sized,
    {
        let raw = host.poses(TrackingFrame::Raw);
        let target = match snap_target(device, &raw) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[snap] cannot snap to controller: {}", e);
                return;
            }
        };
        let floor = match resolve_floor_height(host) {
            Ok(floor_height) => {
                log::info!("[snap] floor height {:.3}", floor_height);
                host.poses(TrackingFrame::Standing)
                    .position(device)
                    .map(|standing| FloorReference {
                        floor_height,
                        standing_y: standing.y,
                    })
            }
            Err(e) => {
                log::info!("[snap] keeping pole height: {}", e);
                None
            }
        };
        snap_to(&mut self.config, target, floor);
        log::info!(
            "[snap] pole moved to ({:.3}, {:.3}, {:.3})",
            self.config.pos_x,
            self.config.pos_y,
            self.config.pos_z
        );
        self.configure_overlay(host);
    }

    /// One full tick: drain events, then place and fade the marker.
    pub fn tick<H, S>(&mut self, host: &mut H, store: &mut S, now: Duration) -> TickSummary
    where
        H: TrackingHost + ?Sized,
        S: ConfigStore + ?Sized,
    {
        let mut summary = TickSummary::default();
        while let Some(event) = host.poll_next_event() {
            summary.events += 1;
            self.handle_event(event, host, store, now);
        }
        if !self.running {
            return summary;
        }

        let raw = host.poses(TrackingFrame::Raw);
        let drag_offset = self.interaction.update_drag(&raw, self.config.drag_scale);
        let composed = compose(&ComposeInput {
            config: &self.config,
            geometry: &self.geometry,
            head: raw.head(),
            drag_offset,
            edit_elapsed: self.interaction.edit_elapsed(now),
        });
        if let Some(alpha) = composed.alpha {
            report(host.set_alpha(self.overlay, alpha));
        }
        if let Some(t) = composed.transform {
            report(host.set_transform(self.overlay, TrackingFrame::Raw, &t.to_affine()));
            self.last_transform = Some(t);
        }
        summary.composed = composed;
        summary
    }
}
