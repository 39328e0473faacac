use std::any::Any;
use std::time::Duration;

use crate::animator::{
    AnimatingPosition, AnimationCompletion, AnimationContext, AnimationOwner, AnimationType,
    AnimatorCore, AnimatorState, CameraAnimator, StatusSignal, Timeline,
};
use crate::camera::CameraOptions;
use crate::engine::MapEngine;
use crate::error::CameraError;
use crate::interpolation::FlyToInterpolator;
use crate::timing::TimingCurve;

/// Animator that moves the camera along the "optimal path" calculated by [`FlyToInterpolator`], zooming
/// out in the middle of long flights.
///
/// The animator cannot be paused.
pub struct FlyToCameraAnimator {
    core: AnimatorCore,
    timeline: Timeline,
    interpolator: FlyToInterpolator,
    curve: TimingCurve,
    final_camera: CameraOptions,
}

impl FlyToCameraAnimator {
    /// Creates an animator that flies from the current camera of `engine` to `to`.
    ///
    /// If `duration` is `None`, it is calculated from the length of the flight and `velocity` (in
    /// screenfuls per second, see [`FlyToInterpolator::duration`]).
    pub fn new(
        engine: &dyn MapEngine,
        to: &CameraOptions,
        duration: Option<Duration>,
        velocity: Option<f64>,
        curve: TimingCurve,
        owner: AnimationOwner,
        context: &AnimationContext,
    ) -> Result<Self, CameraError> {
        if let Some(velocity) = velocity {
            if !velocity.is_finite() || velocity <= 0.0 {
                return Err(CameraError::InvalidDuration(format!(
                    "fly-to velocity must be positive, got {velocity}"
                )));
            }
        }

        let bounds = engine.camera_bounds();
        let interpolator =
            FlyToInterpolator::new(&engine.camera_state(), to, &bounds, engine.size())?;

        let duration = match duration {
            Some(duration) => duration,
            None => Duration::try_from_secs_f64(interpolator.duration(velocity))
                .map_err(|err| CameraError::InvalidDuration(err.to_string()))?,
        };

        let final_camera = CameraOptions {
            center: to.center.map(|center| center.wrapped()),
            padding: to.padding,
            anchor: to.anchor,
            zoom: to.zoom.map(|zoom| bounds.clamp_zoom(zoom)),
            bearing: to.bearing,
            pitch: to.pitch.map(|pitch| bounds.clamp_pitch(pitch)),
        };

        log::debug!("Flying to {final_camera:?} in {duration:?}");

        Ok(Self {
            core: AnimatorCore::new(owner, AnimationType::UNSPECIFIED, context),
            timeline: Timeline::new(duration, context),
            interpolator,
            curve,
            final_camera,
        })
    }

    /// Duration of the flight.
    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// Camera the animator sets when it finishes.
    pub fn final_camera(&self) -> &CameraOptions {
        &self.final_camera
    }
}

impl CameraAnimator for FlyToCameraAnimator {
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
        if self.core.state() == AnimatorState::Initial {
            self.timeline.resume(Duration::ZERO);
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
        if self.core.state() != AnimatorState::Running {
            return;
        }

        let ratio = self.timeline.ratio();
        if ratio >= 1.0 {
            engine.set_camera(&self.final_camera);
            self.core.finish(AnimatingPosition::End);
            return;
        }

        let fraction = self.curve.solve(ratio);
        engine.set_camera(&self.interpolator.camera_options(fraction));
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

impl std::fmt::Debug for FlyToCameraAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlyToCameraAnimator")
            .field("curve", &self.curve)
            .field("final_camera", &self.final_camera)
            .finish_non_exhaustive()
    }
}
