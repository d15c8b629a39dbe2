//! Floor height lookup from the runtime's boundary calibration.
//!
//! The marker stays usable without a calibrated boundary, so failures are
//! returned as values for the caller to log rather than treated as fatal.

use glam::Vec3;
use thiserror::Error;

/// Boundary calibration status, numbered the way tracking runtimes report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum CalibrationState {
    Ok = 1,
    Warning = 100,
    WarningBaseStationMayHaveMoved = 101,
    WarningBaseStationRemoved = 102,
    WarningSeatedBoundsInvalid = 103,
    Error = 200,
    ErrorBaseStationUninitialized = 201,
    ErrorBaseStationConflict = 202,
    ErrorPlayAreaInvalid = 203,
    ErrorCollisionBoundsInvalid = 204,
}

impl CalibrationState {
    /// Nominal, or a warning that still leaves the standing boundary intact.
    pub fn allows_floor_height(self) -> bool {
        self == Self::Ok || (self >= Self::Warning && self < Self::WarningSeatedBoundsInvalid)
    }
}

/// Play-area rectangle corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryQuad {
    pub corners: [Vec3; 4],
}

pub trait CalibrationSource {
    fn calibration_state(&mut self) -> CalibrationState;
    fn boundary_quad(&mut self) -> Option<BoundaryQuad>;
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum FloorHeightError {
    #[error("boundary calibration is {0:?}")]
    CalibrationInvalid(CalibrationState),
    #[error("play area boundary is unavailable")]
    BoundaryUnavailable,
}

/// Floor height in the raw frame, taken from the first boundary corner.
pub fn resolve_floor_height<C>(source: &mut C) -> Result<f32, FloorHeightError>
where
    C: CalibrationSource + ?Sized,
{
    let state = source.calibration_state();
    if !state.allows_floor_height() {
        return Err(FloorHeightError::CalibrationInvalid(state));
    }
    let quad = source
        .boundary_quad()
        .ok_or(FloorHeightError::BoundaryUnavailable)?;
    Ok(quad.corners[0].y)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        state: CalibrationState,
        quad: Option<BoundaryQuad>,
    }

    impl CalibrationSource for Fixed {
        fn calibration_state(&mut self) -> CalibrationState {
            self.state
        }
        fn boundary_quad(&mut self) -> Option<BoundaryQuad> {
            self.quad
        }
    }

    fn quad_at(y: f32) -> BoundaryQuad {
        BoundaryQuad {
            corners: [
                Vec3::new(-1.0, y, -1.0),
                Vec3::new(1.0, y + 0.5, -1.0),
                Vec3::new(1.0, y, 1.0),
                Vec3::new(-1.0, y, 1.0),
            ],
        }
    }

    #[test]
    fn accepted_states() {
        use CalibrationState as S;
        for s in [
            S::Ok,
            S::Warning,
            S::WarningBaseStationMayHaveMoved,
            S::WarningBaseStationRemoved,
        ] {
            assert!(s.allows_floor_height(), "{s:?} should be accepted");
        }
        for s in [
            S::WarningSeatedBoundsInvalid,
            S::Error,
            S::ErrorBaseStationUninitialized,
            S::ErrorBaseStationConflict,
            S::ErrorPlayAreaInvalid,
            S::ErrorCollisionBoundsInvalid,
        ] {
            assert!(!s.allows_floor_height(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn height_comes_from_first_corner() {
        let mut src = Fixed {
            state: CalibrationState::Ok,
            quad: Some(quad_at(-0.25)),
        };
        assert_eq!(resolve_floor_height(&mut src), Ok(-0.25));
    }

    #[test]
    fn invalid_calibration_fails_soft() {
        let mut src = Fixed {
            state: CalibrationState::WarningSeatedBoundsInvalid,
            quad: Some(quad_at(0.0)),
        };
        assert_eq!(
            resolve_floor_height(&mut src),
            Err(FloorHeightError::CalibrationInvalid(
                CalibrationState::WarningSeatedBoundsInvalid
            ))
        );
    }

    #[test]
    fn missing_quad_fails_soft() {
        let mut src = Fixed {
            state: CalibrationState::Warning,
            quad: None,
        };
        assert_eq!(
            resolve_floor_height(&mut src),
            Err(FloorHeightError::BoundaryUnavailable)
        );
    }
}
