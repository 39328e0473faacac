use std::any::Any;
use std::rc::Rc;

use mapcam_types::cartesian::{Point2d, Vector2d};
use web_time::Instant;

use crate::animator::{
    AnimatingPosition, AnimationCompletion, AnimationContext, AnimationOwner, AnimationType,
    AnimatorCore, AnimatorState, CameraAnimator, StatusSignal,
};
use crate::clock::Clock;
use crate::engine::MapEngine;
use crate::error::CameraError;

/// Velocity in points per second below which the deceleration stops.
pub const DEFAULT_STOP_VELOCITY: f64 = 20.0;

pub(crate) fn validate_stop_velocity(stop_velocity: f64) -> Result<(), CameraError> {
    if stop_velocity.is_finite() && stop_velocity > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidStopVelocity(stop_velocity))
    }
}

/// Callback of [`GestureDecelerationCameraAnimator`]. Receives the location where the deceleration
/// started, the current simulated location and the map to move.
pub type LocationChangeHandler = Box<dyn FnMut(Point2d, Point2d, &mut dyn MapEngine)>;

/// Animator that continues a gesture by inertia.
///
/// The animator simulates a point moving over the screen with the velocity of the gesture. The velocity
/// is multiplied by the deceleration factor once per millisecond, and the animation ends when both
/// velocity components drop below the stop velocity.
///
/// On every update the handler receives the original location together with the current one, rather
/// than the step since the previous update, so that small rounding errors do not add up.
pub struct GestureDecelerationCameraAnimator {
    core: AnimatorCore,
    clock: Rc<dyn Clock>,
    start_location: Point2d,
    current_location: Point2d,
    velocity: Vector2d,
    deceleration_factor: f64,
    stop_velocity: f64,
    previous_update: Option<Instant>,
    handler: LocationChangeHandler,
}

impl GestureDecelerationCameraAnimator {
    /// Creates a new animator.
    ///
    /// `deceleration_factor` must be in the `(0, 1)` range. Both velocity components must be finite.
    /// `stop_velocity` is in points per second and must be finite and positive.
    pub fn new(
        location: Point2d,
        velocity: Vector2d,
        deceleration_factor: f64,
        stop_velocity: f64,
        owner: AnimationOwner,
        context: &AnimationContext,
        handler: impl FnMut(Point2d, Point2d, &mut dyn MapEngine) + 'static,
    ) -> Result<Self, CameraError> {
        if !(deceleration_factor > 0.0 && deceleration_factor < 1.0) {
            return Err(CameraError::InvalidDecelerationFactor(deceleration_factor));
        }
        if !(velocity.x.is_finite() && velocity.y.is_finite()) {
            return Err(CameraError::InvalidVelocity(velocity.x, velocity.y));
        }
        validate_stop_velocity(stop_velocity)?;

        Ok(Self {
            core: AnimatorCore::new(owner, AnimationType::DECELERATION, context),
            clock: context.clock().clone(),
            start_location: location,
            current_location: location,
            velocity,
            deceleration_factor,
            stop_velocity,
            previous_update: None,
            handler: Box::new(handler),
        })
    }

    /// Current velocity in points per second.
    pub fn velocity(&self) -> Vector2d {
        self.velocity
    }

    /// Current simulated location.
    pub fn current_location(&self) -> Point2d {
        self.current_location
    }

    fn is_slow(&self) -> bool {
        self.velocity.x.abs() < self.stop_velocity && self.velocity.y.abs() < self.stop_velocity
    }
}

impl CameraAnimator for GestureDecelerationCameraAnimator {
    fn owner(&self) -> &AnimationOwner {
        self.core.owner()
    }

    fn animation_type(&self) -> &AnimationType {
        self.core.animation_type()
    }

    fn state(&self) -> AnimatorState {
        self.core.state()
    }

    fn start(&mut self, _engine: &mut dyn MapEngine) {
        if self.core.state() != AnimatorState::Initial {
            return;
        }

        if self.is_slow() {
            self.core.finish(AnimatingPosition::End);
            return;
        }

        self.previous_update = Some(self.clock.now());
        self.core.set_running();
    }

    fn stop(&mut self) {
        self.core.finish(AnimatingPosition::Current);
    }

    fn add_completion(&mut self, completion: AnimationCompletion) {
        self.core.add_completion(completion);
    }

    fn update(&mut self, engine: &mut dyn MapEngine) {
        if self.core.state() != AnimatorState::Running {
            return;
        }

        let now = self.clock.now();
        let elapsed = self
            .previous_update
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or_default();
        self.previous_update = Some(now);

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.velocity *= self.deceleration_factor.powf(elapsed_ms);
        self.current_location += self.velocity * elapsed.as_secs_f64();

        (self.handler)(self.start_location, self.current_location, engine);

        if self.is_slow() {
            self.core.finish(AnimatingPosition::End);
        }
    }

    fn status_signal(&mut self) -> &mut StatusSignal {
        self.core.signal()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for GestureDecelerationCameraAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDecelerationCameraAnimator")
            .field("start_location", &self.start_location)
            .field("current_location", &self.current_location)
            .field("velocity", &self.velocity)
            .field("deceleration_factor", &self.deceleration_factor)
            .field("stop_velocity", &self.stop_velocity)
            .finish_non_exhaustive()
    }
}
