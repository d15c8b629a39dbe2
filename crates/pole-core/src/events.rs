//! Host events, user commands and how they map onto session actions.

use crate::constants::TRIGGER_BUTTON_ID;
use crate::pose::DeviceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Quit,
    ReloadOverlays,
    ButtonPress { device: DeviceId, button: u32 },
    ButtonUnpress { device: DeviceId, button: u32 },
    ChaperoneSettingsChanged,
    ChaperoneUniverseChanged,
    ImageLoaded,
    Other(u32),
}

/// Non-blocking event queue, drained until empty once per tick.
pub trait EventSource {
    fn poll_next_event(&mut self) -> Option<HostEvent>;
}

/// Explicit user commands (keyboard plumbing lives outside the core).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleEdit,
    Reload,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Quit,
    Reload,
    TriggerPress(DeviceId),
    TriggerRelease(DeviceId),
    Ignore,
}

pub fn dispatch(event: &HostEvent) -> Dispatch {
    match *event {
        HostEvent::Quit => Dispatch::Quit,
        HostEvent::ReloadOverlays => Dispatch::Reload,
        HostEvent::ButtonPress { device, button } if button == TRIGGER_BUTTON_ID => {
            Dispatch::TriggerPress(device)
        }
        HostEvent::ButtonUnpress { device, button } if button == TRIGGER_BUTTON_ID => {
            Dispatch::TriggerRelease(device)
        }
        // Reserved for hiding the pole when the boundary is hidden.
        HostEvent::ChaperoneSettingsChanged | HostEvent::ChaperoneUniverseChanged => {
            log::debug!("[events] {:?} (no-op)", event);
            Dispatch::Ignore
        }
        HostEvent::ImageLoaded => {
            log::debug!("[events] overlay image loaded");
            Dispatch::Ignore
        }
        _ => Dispatch::Ignore,
    }
}
