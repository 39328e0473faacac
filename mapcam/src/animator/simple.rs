use std::any::Any;
use std::time::Duration;

use crate::animator::{
    AnimatingPosition, AnimationCompletion, AnimationContext, AnimationOwner, AnimationType,
    AnimatorCore, AnimatorState, CameraAnimator, StatusSignal, Timeline,
};
use crate::camera::CameraOptions;
use crate::engine::MapEngine;
use crate::interpolation::{CameraOptionsInterpolator, Interpolator};
use crate::timing::TimingCurve;

/// Animator with cubic bezier easing, delayed start and a target that can be changed while the animation
/// runs.
///
/// Unlike [`BasicCameraAnimator`](super::BasicCameraAnimator), the start camera is given explicitly and
/// the animator interpolates directly between `from` and `to` on every update, so moving `to` makes the
/// camera follow the new target. The animator cannot be paused.
pub struct SimpleCameraAnimator {
    core: AnimatorCore,
    timeline: Timeline,
    from: CameraOptions,
    to: CameraOptions,
    curve: TimingCurve,
    interpolator: CameraOptionsInterpolator,
}

impl SimpleCameraAnimator {
    /// Creates a new animator in the initial state.
    pub fn new(
        from: CameraOptions,
        to: CameraOptions,
        duration: Duration,
        curve: TimingCurve,
        owner: AnimationOwner,
        animation_type: AnimationType,
        context: &AnimationContext,
    ) -> Self {
        Self {
            core: AnimatorCore::new(owner, animation_type, context),
            timeline: Timeline::new(duration, context),
            from,
            to,
            curve,
            interpolator: CameraOptionsInterpolator::default(),
        }
    }

    /// Start camera.
    pub fn from(&self) -> &CameraOptions {
        &self.from
    }

    /// Target camera.
    pub fn to(&self) -> &CameraOptions {
        &self.to
    }

    /// Changes the target camera. Can be called while the animation is running.
    ///
    /// The new target should have the same set of fields as the old one, since fields that are `None` in
    /// either `from` or `to` are not animated. For best results the change should be small compared to
    /// the distance between `from` and `to`.
    pub fn set_to(&mut self, to: CameraOptions) {
        if !self.to.has_same_fields(&to) {
            log::warn!("Animator updated with differing non-None target properties");
        }

        self.to = to;
    }

    /// Duration of the animation.
    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }
}

impl CameraAnimator for SimpleCameraAnimator {
    fn owner(&self) -> &AnimationOwner {
        self.core.owner()
    }

    fn animation_type(&self) -> &AnimationType {
        self.core.animation_type()
    }

    fn state(&self) -> AnimatorState {
        self.core.state()
    }

    fn start(&mut self, engine: &mut dyn MapEngine) {
        self.start_after_delay(Duration::ZERO, engine);
    }

    /// The animator becomes running immediately regardless of `delay`, but does not change the camera
    /// until the delay is over.
    fn start_after_delay(&mut self, delay: Duration, _engine: &mut dyn MapEngine) {
        if self.core.state() == AnimatorState::Initial {
            self.timeline.resume(delay);
            self.core.set_running();
        }
    }

    fn stop(&mut self) {
        self.core.finish(AnimatingPosition::Current);
    }

    fn add_completion(&mut self, completion: AnimationCompletion) {
        self.core.add_completion(completion);
    }

    fn update(&mut self, engine: &mut dyn MapEngine) {
        if self.core.state() != AnimatorState::Running || self.timeline.is_waiting() {
            return;
        }

        let ratio = self.timeline.ratio();
        if ratio >= 1.0 {
            engine.set_camera(&self.to);
            self.core.finish(AnimatingPosition::End);
            return;
        }

        let fraction = self.curve.solve(ratio);
        let camera = self.interpolator.interpolate(&self.from, &self.to, fraction);
        engine.set_camera(&camera);
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
