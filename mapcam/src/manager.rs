//! High level entry point for camera animations.

use std::time::Duration;

use mapcam_types::cartesian::{Point2d, Vector2d};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animator::{
    AnimationCompletion, AnimationContext, AnimationOwner, AnimationType, AnimatorState,
    validate_stop_velocity, CameraAnimator, CameraAnimatorStatus, DEFAULT_STOP_VELOCITY,
};
use crate::camera::{CameraOptions, CameraTransition, Change};
use crate::engine::MapEngine;
use crate::error::CameraError;
use crate::factory::CameraAnimatorsFactory;
use crate::runner::{AnimatorHandle, AnimatorId, CameraAnimatorsRunner};
use crate::timing::{SpringTiming, TimingCurve, TimingParameters};

/// Configuration of a [`CameraAnimationsManager`].
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraAnimationsConfiguration {
    fly_to_velocity: Option<f64>,
    fly_to_curve: TimingCurve,
    ease_curve: TimingCurve,
    deceleration_stop_velocity: f64,
}

impl Default for CameraAnimationsConfiguration {
    fn default() -> Self {
        Self {
            fly_to_velocity: None,
            fly_to_curve: TimingCurve::EASE_OUT,
            ease_curve: TimingCurve::EASE_OUT,
            deceleration_stop_velocity: DEFAULT_STOP_VELOCITY,
        }
    }
}

impl CameraAnimationsConfiguration {
    /// Velocity of fly-to animations without explicit duration, in screenfuls per second. If `None`,
    /// [`DEFAULT_VELOCITY`](crate::interpolation::DEFAULT_VELOCITY) is used.
    pub fn fly_to_velocity(&self) -> Option<f64> {
        self.fly_to_velocity
    }

    /// Sets velocity of fly-to animations without explicit duration.
    pub fn with_fly_to_velocity(mut self, velocity: Option<f64>) -> Self {
        self.fly_to_velocity = velocity;
        self
    }

    /// Sets velocity of fly-to animations without explicit duration.
    pub fn set_fly_to_velocity(&mut self, velocity: Option<f64>) {
        self.fly_to_velocity = velocity;
    }

    /// Timing curve of fly-to animations when none is given.
    pub fn fly_to_curve(&self) -> TimingCurve {
        self.fly_to_curve
    }

    /// Sets timing curve of fly-to animations when none is given.
    pub fn with_fly_to_curve(mut self, curve: TimingCurve) -> Self {
        self.fly_to_curve = curve;
        self
    }

    /// Sets timing curve of fly-to animations when none is given.
    pub fn set_fly_to_curve(&mut self, curve: TimingCurve) {
        self.fly_to_curve = curve;
    }

    /// Timing curve of ease animations when none is given.
    pub fn ease_curve(&self) -> TimingCurve {
        self.ease_curve
    }

    /// Sets timing curve of ease animations when none is given.
    pub fn with_ease_curve(mut self, curve: TimingCurve) -> Self {
        self.ease_curve = curve;
        self
    }

    /// Sets timing curve of ease animations when none is given.
    pub fn set_ease_curve(&mut self, curve: TimingCurve) {
        self.ease_curve = curve;
    }

    /// Velocity in points per second below which deceleration animations stop.
    pub fn deceleration_stop_velocity(&self) -> f64 {
        self.deceleration_stop_velocity
    }

    /// Sets velocity below which deceleration animations stop.
    ///
    /// Returns an error if the velocity is not finite and positive.
    pub fn with_deceleration_stop_velocity(mut self, velocity: f64) -> Result<Self, CameraError> {
        self.set_deceleration_stop_velocity(velocity)?;
        Ok(self)
    }

    /// Sets velocity below which deceleration animations stop.
    ///
    /// Returns an error and keeps the previous value if the velocity is not finite and positive.
    pub fn set_deceleration_stop_velocity(&mut self, velocity: f64) -> Result<(), CameraError> {
        validate_stop_velocity(velocity)?;
        self.deceleration_stop_velocity = velocity;
        Ok(())
    }
}

/// Owns a map engine together with the animators that move its camera.
///
/// The high level methods ([`ease_to`](Self::ease_to), [`fly_to`](Self::fly_to) and
/// [`decelerate`](Self::decelerate)) create an animator, register it and start it right away. Before
/// doing so they cancel the running animations of the same owner, so only one of them moves the camera
/// at a time.
///
/// The `make_*` methods register animators without starting them. Use the returned handle to control
/// the animator.
///
/// Nothing happens on its own: call [`update`](Self::update) on every frame.
pub struct CameraAnimationsManager<E: MapEngine> {
    engine: E,
    runner: CameraAnimatorsRunner,
    factory: CameraAnimatorsFactory,
    configuration: CameraAnimationsConfiguration,
}

impl<E: MapEngine> CameraAnimationsManager<E> {
    /// Creates a new enabled manager that uses the system clock.
    pub fn new(engine: E) -> Self {
        Self::with_context(engine, AnimationContext::default())
    }

    /// Creates a new enabled manager with the given animation context.
    pub fn with_context(mut engine: E, context: AnimationContext) -> Self {
        let mut runner = CameraAnimatorsRunner::new(context.deferred().clone());
        runner.set_enabled(true, &mut engine);

        Self {
            engine,
            runner,
            factory: CameraAnimatorsFactory::new(context),
            configuration: CameraAnimationsConfiguration::default(),
        }
    }

    /// Map engine moved by the animations.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable map engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Runner that owns the animators.
    pub fn runner(&self) -> &CameraAnimatorsRunner {
        &self.runner
    }

    /// Current configuration.
    pub fn configuration(&self) -> CameraAnimationsConfiguration {
        self.configuration
    }

    /// Replaces the configuration. Running animations are not affected.
    pub fn set_configuration(&mut self, configuration: CameraAnimationsConfiguration) {
        self.configuration = configuration;
    }

    /// Advances all running animations. Call once per frame.
    pub fn update(&mut self) {
        self.runner.update(&mut self.engine);
    }

    /// Returns true if animations are allowed to run.
    pub fn is_enabled(&self) -> bool {
        self.runner.is_enabled()
    }

    /// Enables or disables animations. Disabling cancels all of them, and animations created while
    /// disabled are cancelled immediately.
    pub fn set_enabled(&mut self, is_enabled: bool) {
        self.runner.set_enabled(is_enabled, &mut self.engine);
    }

    /// Smoothly moves the camera to `to` over `duration`.
    ///
    /// Every present field of `to` is animated, except the anchor, which is applied as is during the
    /// whole animation. If `curve` is `None`, the configured ease curve is used.
    pub fn ease_to(
        &mut self,
        to: CameraOptions,
        duration: Duration,
        curve: Option<TimingCurve>,
        owner: AnimationOwner,
        completion: Option<AnimationCompletion>,
    ) -> AnimatorHandle {
        self.runner
            .cancel_animations_with_owners(std::slice::from_ref(&owner), &mut self.engine);

        let curve = curve.unwrap_or(self.configuration.ease_curve);
        let animator = self.factory.make_basic_camera_animator(
            duration,
            curve.into(),
            owner,
            AnimationType::UNSPECIFIED,
            move |transition| {
                transition.set_targets(&to);
                if let Some(anchor) = to.anchor {
                    transition.anchor = Change {
                        from_value: anchor,
                        to_value: Some(anchor),
                    };
                }
            },
        );

        self.register_and_start(Box::new(animator), completion)
    }

    /// Flies the camera to `to` along the optimal path, zooming out in the middle of long flights.
    ///
    /// If `duration` is `None`, it is calculated from the length of the path and the configured
    /// velocity. Animations owned by [`AnimationOwner::CAMERA_ANIMATIONS_MANAGER`] are cancelled first.
    pub fn fly_to(
        &mut self,
        to: CameraOptions,
        duration: Option<Duration>,
        curve: Option<TimingCurve>,
        completion: Option<AnimationCompletion>,
    ) -> Result<AnimatorHandle, CameraError> {
        self.cancel_manager_animations();

        let animator = self.factory.make_fly_to_animator(
            &self.engine,
            &to,
            duration,
            self.configuration.fly_to_velocity,
            curve.unwrap_or(self.configuration.fly_to_curve),
            AnimationOwner::CAMERA_ANIMATIONS_MANAGER,
        )?;

        Ok(self.register_and_start(Box::new(animator), completion))
    }

    /// Continues a gesture by inertia.
    ///
    /// `velocity` is in points per second and is multiplied by `deceleration_factor` every millisecond.
    /// `handler` is called on every frame with the original location and the current simulated location,
    /// and is expected to move the camera accordingly (for example with
    /// [`drag_camera_options`](crate::engine::drag_camera_options)).
    pub fn decelerate(
        &mut self,
        location: Point2d,
        velocity: Vector2d,
        deceleration_factor: f64,
        handler: impl FnMut(Point2d, Point2d, &mut dyn MapEngine) + 'static,
        completion: Option<AnimationCompletion>,
    ) -> Result<AnimatorHandle, CameraError> {
        self.cancel_manager_animations();

        let animator = self.factory.make_gesture_deceleration_animator(
            location,
            velocity,
            deceleration_factor,
            self.configuration.deceleration_stop_velocity,
            AnimationOwner::CAMERA_ANIMATIONS_MANAGER,
            handler,
        )?;

        Ok(self.register_and_start(Box::new(animator), completion))
    }

    /// Registers a [`BasicCameraAnimator`](crate::animator::BasicCameraAnimator) with arbitrary timing
    /// parameters. The animator is not started.
    pub fn make_animator_with_timing(
        &mut self,
        duration: Duration,
        timing: TimingParameters,
        owner: AnimationOwner,
        animation_type: AnimationType,
        animations: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> AnimatorHandle {
        let animator = self.factory.make_basic_camera_animator(
            duration,
            timing,
            owner,
            animation_type,
            animations,
        );
        self.runner.add(Box::new(animator), &mut self.engine)
    }

    /// Registers a basic animator eased with a timing curve. The animator is not started.
    pub fn make_animator_with_curve(
        &mut self,
        duration: Duration,
        curve: TimingCurve,
        owner: AnimationOwner,
        animations: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> AnimatorHandle {
        self.make_animator_with_timing(
            duration,
            curve.into(),
            owner,
            AnimationType::UNSPECIFIED,
            animations,
        )
    }

    /// Registers a basic animator eased with a cubic bezier curve given by two control points. The
    /// animator is not started.
    pub fn make_animator_with_control_points(
        &mut self,
        duration: Duration,
        control_point1: Point2d,
        control_point2: Point2d,
        owner: AnimationOwner,
        animations: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> Result<AnimatorHandle, CameraError> {
        let curve = TimingCurve::new(
            control_point1.x,
            control_point1.y,
            control_point2.x,
            control_point2.y,
        )?;
        Ok(self.make_animator_with_curve(duration, curve, owner, animations))
    }

    /// Registers a basic animator with spring timing. The animator is not started.
    pub fn make_animator_with_damping(
        &mut self,
        duration: Duration,
        damping_ratio: f64,
        owner: AnimationOwner,
        animations: impl FnOnce(&mut CameraTransition) + 'static,
    ) -> Result<AnimatorHandle, CameraError> {
        let spring = SpringTiming::new(damping_ratio)?;
        Ok(self.make_animator_with_timing(
            duration,
            spring.into(),
            owner,
            AnimationType::UNSPECIFIED,
            animations,
        ))
    }

    /// Registers a [`SimpleCameraAnimator`](crate::animator::SimpleCameraAnimator). The animator is not
    /// started.
    pub fn make_simple_animator(
        &mut self,
        from: CameraOptions,
        to: CameraOptions,
        duration: Duration,
        curve: TimingCurve,
        owner: AnimationOwner,
    ) -> AnimatorHandle {
        let animator = self
            .factory
            .make_simple_camera_animator(from, to, duration, curve, owner);
        self.runner.add(Box::new(animator), &mut self.engine)
    }

    /// Stops all animations.
    pub fn cancel_animations(&mut self) {
        self.runner.cancel_animations(&mut self.engine);
    }

    /// Stops animations of any of the given owners.
    pub fn cancel_animations_with_owners(&mut self, owners: &[AnimationOwner]) {
        self.runner
            .cancel_animations_with_owners(owners, &mut self.engine);
    }

    /// Stops animations that have one of the given owners and one of the given types.
    pub fn cancel_animations_with_owners_and_types(
        &mut self,
        owners: &[AnimationOwner],
        types: &[AnimationType],
    ) {
        self.runner
            .cancel_animations_with_owners_and_types(owners, types, &mut self.engine);
    }

    /// Handles of all live animators.
    pub fn camera_animators(&self) -> Vec<AnimatorHandle> {
        self.runner.camera_animators()
    }

    /// Adds an observer of status changes of all animators.
    pub fn on_status_changed(
        &mut self,
        observer: impl FnMut(AnimatorId, CameraAnimatorStatus) + 'static,
    ) {
        self.runner.on_status_changed(observer);
    }

    /// Starts or resumes the animator.
    pub fn start(&mut self, handle: &AnimatorHandle) {
        self.runner.start(handle, &mut self.engine);
    }

    /// Starts the animator after a delay.
    pub fn start_after_delay(&mut self, handle: &AnimatorHandle, delay: Duration) {
        self.runner
            .start_after_delay(handle, delay, &mut self.engine);
    }

    /// Pauses the animator.
    pub fn pause(&mut self, handle: &AnimatorHandle) {
        self.runner.pause(handle, &mut self.engine);
    }

    /// Stops the animator.
    pub fn stop(&mut self, handle: &AnimatorHandle) {
        self.runner.stop(handle, &mut self.engine);
    }

    /// Continues a paused animator, optionally with new timing, for `duration_factor` of its duration.
    pub fn continue_animation(
        &mut self,
        handle: &AnimatorHandle,
        timing: Option<TimingParameters>,
        duration_factor: f64,
    ) {
        self.runner
            .continue_animation(handle, timing, duration_factor, &mut self.engine);
    }

    /// Adds a completion to the animator. Completions added after the animator finished are called on
    /// the next update.
    pub fn add_completion(&mut self, handle: &AnimatorHandle, completion: AnimationCompletion) {
        self.runner.add_completion(handle, completion);
    }

    /// State of the animator.
    pub fn animator_state(&self, handle: &AnimatorHandle) -> AnimatorState {
        self.runner.state(handle)
    }

    /// Animator of the handle downcast to its concrete type.
    pub fn animator<T: CameraAnimator>(&self, handle: &AnimatorHandle) -> Option<&T> {
        self.runner.animator_as(handle)
    }

    /// Mutable animator of the handle downcast to its concrete type.
    pub fn animator_mut<T: CameraAnimator>(&mut self, handle: &AnimatorHandle) -> Option<&mut T> {
        self.runner.animator_as_mut(handle)
    }

    fn cancel_manager_animations(&mut self) {
        self.runner.cancel_animations_with_owners(
            &[AnimationOwner::CAMERA_ANIMATIONS_MANAGER],
            &mut self.engine,
        );
    }

    fn register_and_start(
        &mut self,
        mut animator: Box<dyn CameraAnimator>,
        completion: Option<AnimationCompletion>,
    ) -> AnimatorHandle {
        if let Some(completion) = completion {
            animator.add_completion(completion);
        }

        let handle = self.runner.add(animator, &mut self.engine);
        self.runner.start(&handle, &mut self.engine);
        handle
    }
}

impl<E: MapEngine + std::fmt::Debug> std::fmt::Debug for CameraAnimationsManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraAnimationsManager")
            .field("engine", &self.engine)
            .field("runner", &self.runner)
            .field("configuration", &self.configuration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use mapcam_types::latlon;

    use super::*;
    use crate::animator::test_utils::*;
    use crate::animator::{
        AnimatingPosition, FlyToCameraAnimator, SimpleCameraAnimator, StopReason,
    };
    use crate::clock::ManualClock;
    use crate::engine::drag_camera_options;

    fn manager() -> (Rc<ManualClock>, CameraAnimationsManager<MockEngine>) {
        let _ = env_logger::builder().is_test(true).try_init();

        let (clock, context) = manual_context();
        let manager = CameraAnimationsManager::with_context(MockEngine::new(), context);
        (clock, manager)
    }

    #[test]
    fn configuration_defaults_and_builders() {
        let configuration = CameraAnimationsConfiguration::default();
        assert_eq!(configuration.fly_to_velocity(), None);
        assert_eq!(configuration.ease_curve(), TimingCurve::EASE_OUT);
        assert_eq!(configuration.deceleration_stop_velocity(), 20.0);

        let mut configuration = configuration
            .with_fly_to_velocity(Some(2.0))
            .with_ease_curve(TimingCurve::LINEAR);
        configuration
            .set_deceleration_stop_velocity(5.0)
            .expect("valid stop velocity");
        assert_eq!(configuration.fly_to_velocity(), Some(2.0));
        assert_eq!(configuration.ease_curve(), TimingCurve::LINEAR);
        assert_eq!(configuration.deceleration_stop_velocity(), 5.0);
    }

    #[test]
    fn configuration_rejects_invalid_stop_velocity() {
        let mut configuration = CameraAnimationsConfiguration::default();
        for velocity in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert_matches!(
                configuration.set_deceleration_stop_velocity(velocity),
                Err(CameraError::InvalidStopVelocity(_))
            );
            assert_matches!(
                configuration.with_deceleration_stop_velocity(velocity),
                Err(CameraError::InvalidStopVelocity(_))
            );
        }
        assert_eq!(configuration.deceleration_stop_velocity(), DEFAULT_STOP_VELOCITY);
    }

    #[test]
    fn ease_to_moves_camera() {
        let (clock, mut manager) = manager();
        let (positions, completion) = completion_recorder();

        let handle = manager.ease_to(
            CameraOptions::default().with_zoom(4.0).with_bearing(90.0),
            Duration::from_secs(1),
            Some(TimingCurve::LINEAR),
            AnimationOwner::UNSPECIFIED,
            Some(completion),
        );
        assert_eq!(manager.animator_state(&handle), AnimatorState::Running);
        assert_eq!(manager.engine().begin_count, 1);

        clock.advance(Duration::from_millis(500));
        manager.update();
        assert_abs_diff_eq!(manager.engine().camera.zoom, 3.0);
        assert_abs_diff_eq!(manager.engine().camera.bearing, 45.0);

        clock.advance(Duration::from_millis(500));
        manager.update();
        assert_eq!(manager.engine().camera.zoom, 4.0);
        assert_eq!(manager.engine().camera.bearing, 90.0);
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::End]);
        assert!(manager.camera_animators().is_empty());
        assert_eq!(manager.engine().end_count, 1);
    }

    #[test]
    fn ease_to_pins_anchor() {
        let (clock, mut manager) = manager();
        let anchor = Point2d::new(10.0, 20.0);

        manager.ease_to(
            CameraOptions::default().with_zoom(3.0).with_anchor(anchor),
            Duration::from_secs(1),
            None,
            AnimationOwner::UNSPECIFIED,
            None,
        );

        clock.advance(Duration::from_millis(300));
        manager.update();
        let options = manager
            .engine()
            .set_camera_calls
            .last()
            .copied()
            .expect("camera is set");
        let applied = options.anchor.expect("anchor is set");
        assert_abs_diff_eq!(applied, anchor, epsilon = 1e-9);
    }

    #[test]
    fn second_ease_with_same_owner_cancels_first() {
        let (clock, mut manager) = manager();
        let owner = AnimationOwner::new("test");
        let (first_positions, first_completion) = completion_recorder();

        let first = manager.ease_to(
            CameraOptions::default().with_zoom(10.0),
            Duration::from_secs(1),
            Some(TimingCurve::LINEAR),
            owner.clone(),
            Some(first_completion),
        );
        let second = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_secs(1),
            Some(TimingCurve::LINEAR),
            owner,
            None,
        );

        assert_eq!(first.final_position(), Some(AnimatingPosition::Current));
        assert_eq!(*first_positions.borrow(), vec![AnimatingPosition::Current]);
        assert_eq!(manager.camera_animators(), vec![second.clone()]);

        clock.advance(Duration::from_millis(500));
        manager.update();
        assert_abs_diff_eq!(manager.engine().camera.zoom, 3.0);
        assert!(manager
            .engine()
            .set_camera_calls
            .iter()
            .all(|options| options.zoom.is_some_and(|zoom| zoom <= 4.0)));
    }

    #[test]
    fn different_owners_run_together() {
        let (_, mut manager) = manager();

        let zoom = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_secs(1),
            None,
            AnimationOwner::new("zoom"),
            None,
        );
        let bearing = manager.ease_to(
            CameraOptions::default().with_bearing(90.0),
            Duration::from_secs(1),
            None,
            AnimationOwner::new("bearing"),
            None,
        );

        assert_eq!(manager.camera_animators(), vec![zoom, bearing]);
        assert_eq!(manager.runner().running_count(), 2);
    }

    #[test]
    fn disabled_manager_cancels_animations() {
        let (_, mut manager) = manager();
        manager.set_enabled(false);
        assert!(!manager.is_enabled());

        let (positions, completion) = completion_recorder();
        let handle = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_secs(1),
            None,
            AnimationOwner::UNSPECIFIED,
            Some(completion),
        );

        assert_eq!(handle.final_position(), Some(AnimatingPosition::Current));
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::Current]);
        assert_eq!(manager.engine().begin_count, 0);
        assert!(manager.engine().set_camera_calls.is_empty());
    }

    #[test]
    fn cancel_is_synchronous_and_idempotent() {
        let (_, mut manager) = manager();
        let (positions, completion) = completion_recorder();
        let handle = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_secs(1),
            None,
            AnimationOwner::UNSPECIFIED,
            Some(completion),
        );

        manager.cancel_animations();
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::Current]);

        manager.cancel_animations();
        manager.stop(&handle);
        manager.update();
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::Current]);
        assert_eq!(manager.engine().end_count, 1);
        assert_eq!(
            manager.animator_state(&handle),
            AnimatorState::Final(AnimatingPosition::Current)
        );
    }

    #[test]
    fn completion_added_after_finish_runs_on_next_update() {
        let (clock, mut manager) = manager();
        let handle = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_millis(100),
            None,
            AnimationOwner::UNSPECIFIED,
            None,
        );
        clock.advance(Duration::from_millis(100));
        manager.update();
        assert!(handle.is_finished());

        let (positions, completion) = completion_recorder();
        manager.add_completion(&handle, completion);
        assert!(positions.borrow().is_empty());

        manager.update();
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::End]);
    }

    #[test]
    fn status_observers_receive_events() {
        let (clock, mut manager) = manager();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        manager.on_status_changed(move |id, status| sink.borrow_mut().push((id, status)));

        let handle = manager.ease_to(
            CameraOptions::default().with_zoom(4.0),
            Duration::from_millis(100),
            None,
            AnimationOwner::UNSPECIFIED,
            None,
        );
        clock.advance(Duration::from_millis(100));
        manager.update();

        assert_eq!(
            *events.borrow(),
            vec![
                (handle.id(), CameraAnimatorStatus::Started),
                (
                    handle.id(),
                    CameraAnimatorStatus::Stopped(StopReason::Finished)
                ),
            ]
        );
    }

    #[test]
    fn fly_to_reaches_destination() {
        let (clock, mut manager) = manager();
        let (positions, completion) = completion_recorder();

        let handle = manager
            .fly_to(
                CameraOptions::default()
                    .with_center(latlon!(10.0, 10.0))
                    .with_zoom(10.0),
                None,
                None,
                Some(completion),
            )
            .expect("valid flight");

        let duration = manager
            .animator::<FlyToCameraAnimator>(&handle)
            .expect("animator is running")
            .duration();
        assert!(duration > Duration::ZERO);

        clock.advance(duration / 2);
        manager.update();
        let camera = manager.engine().camera;
        assert!(camera.center.lat() > 0.0 && camera.center.lat() < 10.0);
        assert!(camera.zoom.is_finite());

        clock.advance(duration);
        manager.update();
        let camera = manager.engine().camera;
        assert_abs_diff_eq!(camera.center.lat(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(camera.center.lon(), 10.0, epsilon = 1e-9);
        assert_eq!(camera.zoom, 10.0);
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::End]);
    }

    #[test]
    fn fly_to_cancels_previous_flight() {
        let (_, mut manager) = manager();
        let first = manager
            .fly_to(
                CameraOptions::default().with_center(latlon!(10.0, 10.0)),
                Some(Duration::from_secs(1)),
                None,
                None,
            )
            .expect("valid flight");
        let gestures = manager.ease_to(
            CameraOptions::default().with_bearing(10.0),
            Duration::from_secs(1),
            None,
            AnimationOwner::GESTURES,
            None,
        );
        let second = manager
            .fly_to(
                CameraOptions::default().with_center(latlon!(-10.0, -10.0)),
                Some(Duration::from_secs(1)),
                None,
                None,
            )
            .expect("valid flight");

        assert_eq!(first.final_position(), Some(AnimatingPosition::Current));
        assert_eq!(manager.camera_animators(), vec![gestures, second]);
    }

    #[test]
    fn fly_to_with_invalid_velocity_fails() {
        let (_, mut manager) = manager();
        manager.set_configuration(
            CameraAnimationsConfiguration::default().with_fly_to_velocity(Some(0.0)),
        );

        let result = manager.fly_to(
            CameraOptions::default().with_center(latlon!(10.0, 10.0)),
            None,
            None,
            None,
        );
        assert_matches!(result, Err(CameraError::InvalidDuration(_)));
        assert!(manager.camera_animators().is_empty());
    }

    #[test]
    fn decelerate_drags_camera() {
        let (clock, mut manager) = manager();
        let (positions, completion) = completion_recorder();

        let mut initial = None;
        let handle = manager
            .decelerate(
                Point2d::new(100.0, 100.0),
                Vector2d::new(1000.0, 0.0),
                0.99,
                move |from, to, engine: &mut dyn MapEngine| {
                    let camera = *initial.get_or_insert_with(|| engine.camera_state());
                    engine.set_camera(&drag_camera_options(&camera, from, to));
                },
                Some(completion),
            )
            .expect("valid factor");

        assert_matches!(
            manager.animator_state(&handle),
            AnimatorState::Running
        );

        clock.advance(Duration::from_millis(10));
        manager.update();
        let first_lon = manager.engine().camera.center.lon();
        assert!(first_lon < 0.0);

        clock.advance(Duration::from_secs(1));
        manager.update();
        assert!(manager.engine().camera.center.lon() <= first_lon);
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::End]);
        assert_abs_diff_eq!(manager.engine().camera.center.lat(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn decelerate_with_invalid_factor_fails() {
        let (_, mut manager) = manager();
        let result = manager.decelerate(
            Point2d::origin(),
            Vector2d::new(100.0, 0.0),
            1.5,
            |_, _, _: &mut dyn MapEngine| {},
            None,
        );
        assert_matches!(result, Err(CameraError::InvalidDecelerationFactor(_)));
    }

    #[test]
    fn simple_animator_target_can_change() {
        let (clock, mut manager) = manager();
        let from = CameraOptions::default().with_zoom(2.0);
        let handle = manager.make_simple_animator(
            from,
            CameraOptions::default().with_zoom(4.0),
            Duration::from_secs(1),
            TimingCurve::LINEAR,
            AnimationOwner::UNSPECIFIED,
        );
        assert_eq!(manager.animator_state(&handle), AnimatorState::Initial);

        manager.start(&handle);
        clock.advance(Duration::from_millis(500));
        manager.update();
        assert_abs_diff_eq!(manager.engine().camera.zoom, 3.0, epsilon = 1e-5);

        manager
            .animator_mut::<SimpleCameraAnimator>(&handle)
            .expect("animator is running")
            .set_to(CameraOptions::default().with_zoom(6.0));
        let animator = manager
            .animator::<SimpleCameraAnimator>(&handle)
            .expect("animator is running");
        assert_eq!(*animator.from(), from);
        assert_eq!(animator.duration(), Duration::from_secs(1));

        clock.advance(Duration::from_millis(500));
        manager.update();
        assert_eq!(manager.engine().camera.zoom, 6.0);
        assert!(handle.is_finished());
    }

    #[test]
    fn low_level_factories_register_without_starting() {
        let (clock, mut manager) = manager();

        let spring = manager
            .make_animator_with_damping(
                Duration::from_secs(1),
                0.5,
                AnimationOwner::UNSPECIFIED,
                |transition| transition.zoom.to_value = Some(5.0),
            )
            .expect("valid damping");
        let bezier = manager
            .make_animator_with_control_points(
                Duration::from_secs(1),
                Point2d::new(0.25, 0.1),
                Point2d::new(0.25, 1.0),
                AnimationOwner::UNSPECIFIED,
                |transition| transition.pitch.to_value = Some(30.0),
            )
            .expect("valid control points");

        assert_eq!(manager.camera_animators(), vec![spring.clone(), bezier.clone()]);
        assert_eq!(manager.animator_state(&spring), AnimatorState::Initial);
        assert_eq!(manager.engine().begin_count, 0);

        manager.start(&spring);
        manager.start(&bezier);
        clock.advance(Duration::from_secs(1));
        manager.update();
        assert_eq!(manager.engine().camera.zoom, 5.0);
        assert_eq!(manager.engine().camera.pitch, 30.0);
        assert!(manager.camera_animators().is_empty());
    }

    #[test]
    fn low_level_factories_validate_timing() {
        let (_, mut manager) = manager();

        let result = manager.make_animator_with_control_points(
            Duration::from_secs(1),
            Point2d::new(1.5, 0.0),
            Point2d::new(0.5, 1.0),
            AnimationOwner::UNSPECIFIED,
            |_| {},
        );
        assert_matches!(result, Err(CameraError::InvalidTimingCurve(..)));

        let result = manager.make_animator_with_damping(
            Duration::from_secs(1),
            -1.0,
            AnimationOwner::UNSPECIFIED,
            |_| {},
        );
        assert_matches!(result, Err(CameraError::InvalidDampingRatio(_)));
        assert!(manager.camera_animators().is_empty());
    }

    #[test]
    fn cancel_by_owner_and_type_keeps_others() {
        let (_, mut manager) = manager();
        let deceleration = manager
            .decelerate(
                Point2d::origin(),
                Vector2d::new(500.0, 0.0),
                0.99,
                |_, _, _: &mut dyn MapEngine| {},
                None,
            )
            .expect("valid factor");
        let ease = manager.make_animator_with_curve(
            Duration::from_secs(1),
            TimingCurve::LINEAR,
            AnimationOwner::CAMERA_ANIMATIONS_MANAGER,
            |transition| transition.zoom.to_value = Some(4.0),
        );
        manager.start(&ease);

        manager.cancel_animations_with_owners_and_types(
            &[AnimationOwner::CAMERA_ANIMATIONS_MANAGER],
            &[AnimationType::DECELERATION],
        );

        assert!(deceleration.is_finished());
        assert_eq!(manager.camera_animators(), vec![ease]);
    }
}
