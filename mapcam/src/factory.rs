use std::time::Duration;

use mapcam_types::cartesian::{Point2d, Vector2d};

use crate::animator::{
    AnimationContext, AnimationOwner, AnimationType, BasicCameraAnimator,
    FlyToCameraAnimator, GestureDecelerationCameraAnimator, SimpleCameraAnimator,
};
use crate::camera::{CameraOptions, CameraTransition};
use crate::engine::MapEngine;
use crate::error::CameraError;
use crate::timing::{TimingCurve, TimingParameters};

/// Creates animators that share the same [`AnimationContext`].
#[derive(Debug, Clone, Default)]
pub struct CameraAnimatorsFactory {
    context: AnimationContext,
}

impl CameraAnimatorsFactory {
    /// Creates a new factory.
    pub fn new(context: AnimationContext) -> Self {
        Self { context }
    }

    /// Context given to the created animators.
    pub fn context(&self) -> &AnimationContext {
        &self.context
    }

    /// Creates a [`FlyToCameraAnimator`] from the current camera of `engine`.
    pub fn make_fly_to_animator(
        &self,
        engine: &dyn MapEngine,
        to: &CameraOptions,
        duration: Option<Duration>,
        velocity: Option<f64>,
        curve: TimingCurve,
        owner: AnimationOwner,
    ) -> Result<FlyToCameraAnimator, CameraError> {
        FlyToCameraAnimator::new(engine, to, duration, velocity, curve, owner, &self.context)
    }

    /// Creates a [`BasicCameraAnimator`].
    pub fn make_basic_camera_animator(
        &self,
        duration: Duration,
        timing: TimingParameters,
        owner: AnimationOwner,
        animation_type: AnimationType,
        animations: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> BasicCameraAnimator {
        BasicCameraAnimator::new(
            duration,
            timing,
            owner,
            animation_type,
            &self.context,
            animations,
        )
    }

    /// Creates a [`GestureDecelerationCameraAnimator`].
    pub fn make_gesture_deceleration_animator(
        &self,
        location: Point2d,
        velocity: Vector2d,
        deceleration_factor: f64,
        stop_velocity: f64,
        owner: AnimationOwner,
        handler: impl FnMut(Point2d, Point2d, &mut dyn MapEngine) + 'static,
    ) -> Result<GestureDecelerationCameraAnimator, CameraError> {
        GestureDecelerationCameraAnimator::new(
            location,
            velocity,
            deceleration_factor,
            stop_velocity,
            owner,
            &self.context,
            handler,
        )
    }

    /// Creates a [`SimpleCameraAnimator`].
    pub fn make_simple_camera_animator(
        &self,
        from: CameraOptions,
        to: CameraOptions,
        duration: Duration,
        curve: TimingCurve,
        owner: AnimationOwner,
    ) -> SimpleCameraAnimator {
        SimpleCameraAnimator::new(
            from,
            to,
            duration,
            curve,
            owner,
            AnimationType::UNSPECIFIED,
            &self.context,
        )
    }
}
