use std::any::Any;
use std::time::Duration;

use crate::animator::{
    AnimatingPosition, AnimationCompletion, AnimationContext, AnimationOwner, AnimationType,
    AnimatorCore, AnimatorState, CameraAnimator, StatusSignal, Timeline,
};
use crate::camera::{CameraOptions, CameraTransition};
use crate::engine::MapEngine;
use crate::interpolation::{
    CameraOptionsInterpolator, Interpolator, LinearInterpolator, OptionalInterpolator,
};
use crate::timing::TimingParameters;

/// Closure that sets the target values of a [`CameraTransition`].
pub type CameraAnimation = Box<dyn FnOnce(&mut CameraTransition)>;

/// General purpose animator that changes any set of camera properties with the given timing.
///
/// The transition is created from the camera of the map when the animator is first started (or paused),
/// and then passed to the animation closure to set the targets. Only the properties with a target are
/// written to the map.
///
/// The animator can be paused, resumed, reversed and continued with a different timing.
pub struct BasicCameraAnimator {
    core: AnimatorCore,
    timeline: Timeline,
    timing: TimingParameters,
    animation: Option<CameraAnimation>,
    transition: Option<CameraTransition>,
    interpolator: CameraOptionsInterpolator,
    is_reversed: bool,
    pauses_on_completion: bool,
}

impl BasicCameraAnimator {
    /// Creates a new animator in the initial state.
    pub fn new(
        duration: Duration,
        timing: TimingParameters,
        owner: AnimationOwner,
        animation_type: AnimationType,
        context: &AnimationContext,
        animation: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> Self {
        Self {
            core: AnimatorCore::new(owner, animation_type, context),
            timeline: Timeline::new(duration, context),
            timing,
            animation: Some(Box::new(animation)),
            transition: None,
            interpolator: CameraOptionsInterpolator::default(),
            is_reversed: false,
            pauses_on_completion: false,
        }
    }

    /// Transition of the animator. Available only while the animator is running or paused.
    pub fn transition(&self) -> Option<&CameraTransition> {
        if self.core.state().is_active() {
            self.transition.as_ref()
        } else {
            None
        }
    }

    /// Duration of the animation.
    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// Timing parameters used to ease the animation.
    pub fn timing(&self) -> TimingParameters {
        self.timing
    }

    /// Returns true if the animator is running.
    pub fn is_running(&self) -> bool {
        self.core.state() == AnimatorState::Running
    }

    /// Returns true if the animation runs from its end to its start.
    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    /// Changes the direction of the animation. The animation continues from its current position.
    pub fn set_reversed(&mut self, is_reversed: bool) {
        if self.is_reversed != is_reversed {
            self.timeline.mirror();
            self.is_reversed = is_reversed;
        }
    }

    /// If true, the animator pauses instead of finishing when it reaches the end, so it can be reversed
    /// or continued.
    pub fn pauses_on_completion(&self) -> bool {
        self.pauses_on_completion
    }

    /// Sets whether the animator pauses when it reaches the end.
    pub fn set_pauses_on_completion(&mut self, pauses_on_completion: bool) {
        self.pauses_on_completion = pauses_on_completion;
    }

    /// Elapsed share of the animation duration in `[0, 1]`.
    pub fn fraction_complete(&self) -> f64 {
        self.timeline.ratio()
    }

    /// Moves the animation to the given share of its duration. Cannot be done while the animator is
    /// running. The camera is updated when the animation runs again.
    pub fn set_fraction_complete(&mut self, fraction: f64) {
        if self.is_running() {
            log::warn!("Cannot set fraction complete of a running animator");
            return;
        }

        if !fraction.is_finite() {
            log::warn!("Invalid fraction complete {fraction}");
            return;
        }

        self.timeline.set_ratio(fraction);
    }

    fn make_transition(&mut self, engine: &dyn MapEngine) {
        if self.transition.is_some() {
            return;
        }

        let mut transition = CameraTransition::new(&engine.camera_state(), engine.anchor());
        if let Some(animation) = self.animation.take() {
            animation(&mut transition);
        }

        log::debug!("Basic animator transition: {transition:?}");
        self.transition = Some(transition);
    }

    fn camera_options_at(&self, transition: &CameraTransition, fraction: f64) -> CameraOptions {
        let from = transition.from_camera_options();
        let to = transition.to_camera_options();
        let mut options = self.interpolator.interpolate(&from, &to, fraction);

        if !transition.should_optimize_bearing_path {
            options.bearing =
                OptionalInterpolator(LinearInterpolator).interpolate(&from.bearing, &to.bearing, fraction);
        }

        options
    }

    fn complete(&mut self, engine: &mut dyn MapEngine) {
        let Some(transition) = &self.transition else {
            return;
        };

        let (options, position) = if self.is_reversed {
            (transition.from_camera_options(), AnimatingPosition::Start)
        } else {
            (transition.to_camera_options(), AnimatingPosition::End)
        };

        engine.set_camera(&options);

        if self.pauses_on_completion {
            self.timeline.pause();
            self.core.set_paused();
        } else {
            self.core.finish(position);
        }
    }
}

impl CameraAnimator for BasicCameraAnimator {
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
        match self.core.state() {
            AnimatorState::Initial => {
                self.make_transition(engine);
                self.timeline.resume(Duration::ZERO);
                self.core.set_running();
            }
            AnimatorState::Paused => {
                self.timeline.resume(Duration::ZERO);
                self.core.set_running();
            }
            AnimatorState::Running | AnimatorState::Final(_) => {}
        }
    }

    fn start_after_delay(&mut self, delay: Duration, engine: &mut dyn MapEngine) {
        match self.core.state() {
            AnimatorState::Initial => {
                self.make_transition(engine);
                self.timeline.resume(delay);
                self.core.set_running();
            }
            AnimatorState::Paused => {
                log::warn!("A paused animator cannot be started with a delay");
            }
            AnimatorState::Running | AnimatorState::Final(_) => {}
        }
    }

    fn pause(&mut self, engine: &mut dyn MapEngine) {
        match self.core.state() {
            AnimatorState::Initial => {
                self.make_transition(engine);
                self.core.set_paused();
            }
            AnimatorState::Running => {
                self.timeline.pause();
                self.core.set_paused();
            }
            AnimatorState::Paused | AnimatorState::Final(_) => {}
        }
    }

    fn stop(&mut self) {
        if self.core.state().is_final() {
            return;
        }

        self.timeline.pause();
        self.core.finish(AnimatingPosition::Current);
    }

    fn continue_animation(
        &mut self,
        timing: Option<TimingParameters>,
        duration_factor: f64,
        _engine: &mut dyn MapEngine,
    ) {
        match self.core.state() {
            AnimatorState::Paused => {
                if let Some(timing) = timing {
                    self.timing = timing;
                }

                if !(duration_factor > 0.0 && self.timeline.scale(duration_factor)) {
                    log::warn!("Invalid duration factor {duration_factor}, duration is not changed");
                }

                self.timeline.resume(Duration::ZERO);
                self.core.set_running();
            }
            AnimatorState::Initial => log::warn!("Can't continue an animation that has not started"),
            AnimatorState::Running => {
                log::warn!("Can't continue an animation that is already running")
            }
            AnimatorState::Final(_) => {
                log::warn!("Can't continue an animation that has already completed")
            }
        }
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
            self.complete(engine);
            return;
        }

        let Some(transition) = &self.transition else {
            return;
        };

        let progress = self.timing.progress(ratio);
        let fraction = if self.is_reversed {
            1.0 - progress
        } else {
            progress
        };

        let options = self.camera_options_at(transition, fraction);
        engine.set_camera(&options);
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
