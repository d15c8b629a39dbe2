use crate::config::MarkerConfig;
use crate::constants::{ALWAYS_ON_TOP_SORT_ORDER, OVERLAY_CURVATURE};
use crate::pose::TrackingFrame;
use glam::Affine3A;
use thiserror::Error;

/// Host handle of the displayed marker overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("overlay call {call} failed with code {code}")]
pub struct OverlayError {
    pub call: &'static str,
    pub code: i32,
}

/// Fire-and-forget overlay commands. A rejected call is reported, never retried.
pub trait OverlaySink {
    fn set_transform(
        &mut self,
        handle: OverlayHandle,
        frame: TrackingFrame,
        transform: &Affine3A,
    ) -> Result<(), OverlayError>;
    fn set_alpha(&mut self, handle: OverlayHandle, alpha: f32) -> Result<(), OverlayError>;
    fn set_color(&mut self, handle: OverlayHandle, rgb: [f32; 3]) -> Result<(), OverlayError>;
    fn set_curvature(&mut self, handle: OverlayHandle, amount: f32) -> Result<(), OverlayError>;
    fn set_sort_order(&mut self, handle: OverlayHandle, order: u32) -> Result<(), OverlayError>;
    fn show(&mut self, handle: OverlayHandle) -> Result<(), OverlayError>;
    /// While the host dashboard is open controller input belongs to it.
    fn is_dashboard_visible(&mut self) -> bool;
}

/// Log a failed sink call and carry on; the next tick reissues fresh values.
#[inline]
pub fn report(result: Result<(), OverlayError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[overlay] {}", e);
            false
        }
    }
}

/// Push the static parts of the marker config to the overlay and show it.
/// Every call is attempted even if an earlier one fails.
pub fn apply_marker_config<S>(sink: &mut S, handle: OverlayHandle, config: &MarkerConfig) -> bool
where
    S: OverlaySink + ?Sized,
{
    let mut ok = report(sink.set_alpha(handle, config.transparency));
    ok &= report(sink.set_color(handle, config.color_rgb()));
    ok &= report(sink.set_curvature(handle, OVERLAY_CURVATURE));
    if config.always_on_top {
        ok &= report(sink.set_sort_order(handle, ALWAYS_ON_TOP_SORT_ORDER));
    }
    ok &= report(sink.show(handle));
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail: Option<&'static str>,
    }

    impl Recorder {
        fn record(&mut self, call: &'static str) -> Result<(), OverlayError> {
            self.calls.push(call);
            if self.fail == Some(call) {
                Err(OverlayError { call, code: 10 })
            } else {
                Ok(())
            }
        }
    }

    impl OverlaySink for Recorder {
        fn set_transform(
            &mut self,
            _: OverlayHandle,
            _: TrackingFrame,
            _: &Affine3A,
        ) -> Result<(), OverlayError> {
            self.record("set_transform")
        }
        fn set_alpha(&mut self, _: OverlayHandle, _: f32) -> Result<(), OverlayError> {
            self.record("set_alpha")
        }
        fn set_color(&mut self, _: OverlayHandle, _: [f32; 3]) -> Result<(), OverlayError> {
            self.record("set_color")
        }
        fn set_curvature(&mut self, _: OverlayHandle, _: f32) -> Result<(), OverlayError> {
            self.record("set_curvature")
        }
        fn set_sort_order(&mut self, _: OverlayHandle, _: u32) -> Result<(), OverlayError> {
            self.record("set_sort_order")
        }
        fn show(&mut self, _: OverlayHandle) -> Result<(), OverlayError> {
            self.record("show")
        }
        fn is_dashboard_visible(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn sort_order_only_when_always_on_top() {
        let mut r = Recorder::default();
        assert!(apply_marker_config(&mut r, OverlayHandle(1), &MarkerConfig::default()));
        assert_eq!(r.calls, ["set_alpha", "set_color", "set_curvature", "show"]);

        let mut r = Recorder::default();
        let config = MarkerConfig {
            always_on_top: true,
            ..MarkerConfig::default()
        };
        apply_marker_config(&mut r, OverlayHandle(1), &config);
        assert!(r.calls.contains(&"set_sort_order"));
    }

    #[test]
    fn failure_does_not_stop_remaining_calls() {
        let mut r = Recorder {
            fail: Some("set_color"),
            ..Recorder::default()
        };
        assert!(!apply_marker_config(&mut r, OverlayHandle(7), &MarkerConfig::default()));
        assert_eq!(r.calls.last(), Some(&"show"));
    }
}
