//! Error types used by the crate.

use thiserror::Error;

/// Error returned when an animation cannot be created.
///
/// Misuse of an already created animator (for example, continuing an animation that is not paused) is not
/// reported through this type. Such calls are logged and ignored.
#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    /// Fly-to path cannot be calculated for the given cameras and viewport.
    #[error("cannot calculate fly-to path: {0}")]
    DegenerateFlight(String),
    /// Control points of a timing curve are outside of the allowed range.
    #[error("invalid timing curve control points: ({0}, {1}), ({2}, {3})")]
    InvalidTimingCurve(f64, f64, f64, f64),
    /// Spring damping ratio must be a finite positive number.
    #[error("invalid damping ratio: {0}")]
    InvalidDampingRatio(f64),
    /// Deceleration factor must be in the `(0, 1)` range.
    #[error("invalid deceleration factor: {0}")]
    InvalidDecelerationFactor(f64),
    /// Gesture velocity has a non-finite component.
    #[error("invalid gesture velocity: ({0}, {1})")]
    InvalidVelocity(f64, f64),
    /// Velocity at which a deceleration stops must be a finite positive number.
    #[error("invalid stop velocity: {0}")]
    InvalidStopVelocity(f64),
    /// Animation duration or velocity is not a finite non-negative value.
    #[error("invalid animation duration: {0}")]
    InvalidDuration(String),
}
