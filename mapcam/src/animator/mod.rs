//! Camera animators and the types they share.
//!
//! Every animator goes through the same states:
//!
//! ```text
//! Initial -> Running <-> Paused -> Final
//! ```
//!
//! `Final` is terminal: an animator cannot be restarted, a new one must be created instead. Changes of the
//! state are published through the [`StatusSignal`] of the animator.

use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::engine::MapEngine;
use crate::timing::TimingParameters;

mod basic;
mod deceleration;
mod fly_to;
mod simple;

pub use basic::{BasicCameraAnimator, CameraAnimation};
pub use deceleration::{
    GestureDecelerationCameraAnimator, LocationChangeHandler, DEFAULT_STOP_VELOCITY,
};
pub(crate) use deceleration::validate_stop_velocity;
pub use fly_to::FlyToCameraAnimator;
pub use simple::SimpleCameraAnimator;

/// Position at which an animation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnimatingPosition {
    /// The animation reached its end.
    End,
    /// The animation ran in reverse and reached its start.
    Start,
    /// The animation was interrupted.
    Current,
}

/// State of an animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatorState {
    /// Created but not started.
    Initial,
    /// Updates the camera on every tick.
    Running,
    /// Started, but does not update the camera until resumed.
    Paused,
    /// Finished or cancelled. Cannot be started again.
    Final(AnimatingPosition),
}

impl AnimatorState {
    /// Returns true for running and paused animators.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Returns true if the animator is done.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }
}

/// Why an animator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The animation ran to its end (or to its start, if reversed).
    Finished,
    /// The animation was interrupted.
    Cancelled,
}

/// Change of an animator's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAnimatorStatus {
    /// The animator started or resumed running.
    Started,
    /// A running animator was paused.
    Paused,
    /// A running or paused animator reached its final state.
    Stopped(StopReason),
}

/// Tag of the subsystem that requested an animation. Used to cancel animations selectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationOwner(Cow<'static, str>);

impl AnimationOwner {
    /// Animations started by user gestures.
    pub const GESTURES: Self = Self(Cow::Borrowed("com.mapbox.maps.gestures"));
    /// Animations started by the high-level methods of
    /// [`CameraAnimationsManager`](crate::CameraAnimationsManager).
    pub const CAMERA_ANIMATIONS_MANAGER: Self =
        Self(Cow::Borrowed("com.mapbox.maps.cameraAnimationsManager"));
    /// Owner is not specified.
    pub const UNSPECIFIED: Self = Self(Cow::Borrowed("com.mapbox.maps.unspecified"));

    /// Creates a custom owner.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// String representation of the owner.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of an animation, used together with [`AnimationOwner`] for cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationType(Cow<'static, str>);

impl AnimationType {
    /// Type is not specified.
    pub const UNSPECIFIED: Self = Self(Cow::Borrowed("unspecified"));
    /// Inertial movement after a gesture.
    pub const DECELERATION: Self = Self(Cow::Borrowed("deceleration"));

    /// Creates a custom animation type.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// String representation of the type.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback invoked once when an animator reaches its final state.
pub type AnimationCompletion = Box<dyn FnOnce(AnimatingPosition)>;

/// List of observers of an animator's status.
#[derive(Default)]
pub struct StatusSignal {
    observers: Vec<Box<dyn FnMut(CameraAnimatorStatus)>>,
}

impl StatusSignal {
    /// Adds an observer. Observers are notified in the order they were added.
    pub fn subscribe(&mut self, observer: impl FnMut(CameraAnimatorStatus) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn send(&mut self, status: CameraAnimatorStatus) {
        for observer in &mut self.observers {
            observer(status);
        }
    }
}

impl fmt::Debug for StatusSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusSignal")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Queue of tasks executed on the next animation tick.
///
/// Completions added to an animator that has already finished are not called right away but are put into
/// this queue, so the caller never observes its completion running inside `add_completion`.
#[derive(Clone, Default)]
pub struct DeferredQueue {
    tasks: Rc<RefCell<VecDeque<Box<dyn FnOnce()>>>>,
}

impl DeferredQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a task.
    pub fn push(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Number of scheduled tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns true if there are no scheduled tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs the tasks that were scheduled before this call. Tasks scheduled while running wait for the
    /// next call.
    pub fn run_pending(&self) {
        let count = self.len();
        for _ in 0..count {
            // The borrow must end before the task runs, as the task may schedule more tasks.
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("tasks", &self.len())
            .finish()
    }
}

/// Environment animators are created in: the clock they read time from and the queue for deferred
/// completions.
#[derive(Clone)]
pub struct AnimationContext {
    clock: Rc<dyn Clock>,
    deferred: DeferredQueue,
}

impl AnimationContext {
    /// Creates a new context.
    pub fn new(clock: Rc<dyn Clock>, deferred: DeferredQueue) -> Self {
        Self { clock, deferred }
    }

    /// Clock of the animations.
    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    /// Queue of deferred completions.
    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::new(Rc::new(SystemClock), DeferredQueue::new())
    }
}

impl fmt::Debug for AnimationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationContext")
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}

/// Object that changes the camera over time.
///
/// Animators do not own the map. The map is given to every call that may need to read or change the
/// camera. Methods that are not supported by an animator log a warning and do nothing.
pub trait CameraAnimator: Any {
    /// Subsystem that requested the animation.
    fn owner(&self) -> &AnimationOwner;

    /// Kind of the animation.
    fn animation_type(&self) -> &AnimationType;

    /// Current state.
    fn state(&self) -> AnimatorState;

    /// Starts the animation, or resumes it if it is paused. Does nothing for running and final
    /// animators.
    fn start(&mut self, engine: &mut dyn MapEngine);

    /// Starts the animation after the given delay. The animator is considered running during the delay.
    fn start_after_delay(&mut self, delay: Duration, engine: &mut dyn MapEngine) {
        let _ = engine;
        log::warn!(
            "{} does not support delayed start, {delay:?} delay is ignored",
            std::any::type_name::<Self>()
        );
    }

    /// Pauses the animation.
    fn pause(&mut self, engine: &mut dyn MapEngine) {
        let _ = engine;
        log::warn!("{} cannot be paused", std::any::type_name::<Self>());
    }

    /// Interrupts the animation. The camera keeps its current value and every completion is called
    /// with [`AnimatingPosition::Current`]. Does nothing if the animator is already final.
    fn stop(&mut self);

    /// Resumes a paused animation, optionally with new timing parameters. `duration_factor` scales the
    /// duration of the animation.
    fn continue_animation(
        &mut self,
        timing: Option<TimingParameters>,
        duration_factor: f64,
        engine: &mut dyn MapEngine,
    ) {
        let _ = (timing, duration_factor, engine);
        log::warn!("{} cannot be continued", std::any::type_name::<Self>());
    }

    /// Adds a callback to be called when the animator reaches its final state.
    ///
    /// If the animator is already final, the callback is scheduled on the deferred queue and called with
    /// the final position on the next tick.
    fn add_completion(&mut self, completion: AnimationCompletion);

    /// Advances the animation and writes the new camera values to the engine.
    fn update(&mut self, engine: &mut dyn MapEngine);

    /// Publishes the changes of the animator's activity.
    fn status_signal(&mut self) -> &mut StatusSignal;

    /// Returns the animator as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the animator as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// State machine and completion bookkeeping shared by all animators.
pub(crate) struct AnimatorCore {
    owner: AnimationOwner,
    animation_type: AnimationType,
    state: AnimatorState,
    completions: Vec<AnimationCompletion>,
    signal: StatusSignal,
    deferred: DeferredQueue,
}

impl AnimatorCore {
    pub(crate) fn new(
        owner: AnimationOwner,
        animation_type: AnimationType,
        context: &AnimationContext,
    ) -> Self {
        Self {
            owner,
            animation_type,
            state: AnimatorState::Initial,
            completions: Vec::new(),
            signal: StatusSignal::default(),
            deferred: context.deferred.clone(),
        }
    }

    pub(crate) fn owner(&self) -> &AnimationOwner {
        &self.owner
    }

    pub(crate) fn animation_type(&self) -> &AnimationType {
        &self.animation_type
    }

    pub(crate) fn state(&self) -> AnimatorState {
        self.state
    }

    pub(crate) fn signal(&mut self) -> &mut StatusSignal {
        &mut self.signal
    }

    pub(crate) fn set_running(&mut self) {
        if matches!(self.state, AnimatorState::Initial | AnimatorState::Paused) {
            self.state = AnimatorState::Running;
            self.signal.send(CameraAnimatorStatus::Started);
        }
    }

    pub(crate) fn set_paused(&mut self) {
        match self.state {
            AnimatorState::Running => {
                self.state = AnimatorState::Paused;
                self.signal.send(CameraAnimatorStatus::Paused);
            }
            AnimatorState::Initial => self.state = AnimatorState::Paused,
            AnimatorState::Paused | AnimatorState::Final(_) => {}
        }
    }

    /// Moves to the final state and calls the completions. Does nothing if already final.
    pub(crate) fn finish(&mut self, position: AnimatingPosition) {
        if self.state.is_final() {
            return;
        }

        let was_active = self.state.is_active();
        self.state = AnimatorState::Final(position);

        if was_active {
            let reason = match position {
                AnimatingPosition::Current => StopReason::Cancelled,
                AnimatingPosition::End | AnimatingPosition::Start => StopReason::Finished,
            };
            self.signal.send(CameraAnimatorStatus::Stopped(reason));
        }

        for completion in std::mem::take(&mut self.completions) {
            completion(position);
        }
    }

    pub(crate) fn add_completion(&mut self, completion: AnimationCompletion) {
        match self.state {
            AnimatorState::Final(position) => self.deferred.push(move || completion(position)),
            _ => self.completions.push(completion),
        }
    }
}

/// Elapsed time of a self-timed animation that can be paused and resumed.
///
/// A pending delay is kept next to the instant the timeline was resumed at rather than added to it, so
/// any delay can be represented.
pub(crate) struct Timeline {
    clock: Rc<dyn Clock>,
    duration: Duration,
    accumulated: Duration,
    resumed_at: Option<Instant>,
    delay: Duration,
}

impl Timeline {
    pub(crate) fn new(duration: Duration, context: &AnimationContext) -> Self {
        Self {
            clock: context.clock.clone(),
            duration,
            accumulated: Duration::ZERO,
            resumed_at: None,
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    pub(crate) fn duration(&self) -> Duration {
        self.duration
    }

    /// Starts counting time after `delay`.
    pub(crate) fn resume(&mut self, delay: Duration) {
        self.resumed_at = Some(self.now());
        self.delay = delay;
    }

    pub(crate) fn pause(&mut self) {
        self.accumulated = self.elapsed();
        self.resumed_at = None;
        self.delay = Duration::ZERO;
    }

    fn since_resumed(&self) -> Option<Duration> {
        self.resumed_at
            .map(|at| self.now().saturating_duration_since(at))
    }

    /// Returns true while a delayed start is pending.
    pub(crate) fn is_waiting(&self) -> bool {
        self.since_resumed()
            .is_some_and(|since| since < self.delay)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        let running = self
            .since_resumed()
            .map(|since| since.saturating_sub(self.delay))
            .unwrap_or_default();
        self.accumulated.saturating_add(running)
    }

    /// Elapsed share of the duration in `[0, 1]`. Zero duration is always complete.
    pub(crate) fn ratio(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }

        (self.elapsed().as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Moves the timeline to the given share of the duration. Non-finite ratios are ignored.
    pub(crate) fn set_ratio(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            return;
        }

        self.accumulated = self.duration.mul_f64(ratio.clamp(0.0, 1.0));
        if self.resumed_at.is_some() {
            self.resumed_at = Some(self.now());
            self.delay = Duration::ZERO;
        }
    }

    /// Scales the duration keeping the elapsed share. Returns false and leaves the timeline unchanged
    /// if the scaled duration cannot be represented.
    pub(crate) fn scale(&mut self, factor: f64) -> bool {
        let Ok(duration) = Duration::try_from_secs_f64(self.duration.as_secs_f64() * factor) else {
            return false;
        };

        let ratio = self.ratio();
        self.pause();
        self.duration = duration;
        self.accumulated = self.duration.mul_f64(ratio);
        true
    }

    /// Turns the elapsed time into the remaining time. Used to run the animation in the other direction.
    pub(crate) fn mirror(&mut self) {
        let elapsed = self.elapsed().min(self.duration);
        self.accumulated = self.duration - elapsed;
        if let Some(since) = self.since_resumed() {
            self.resumed_at = Some(self.now());
            self.delay = self.delay.saturating_sub(since);
        }
    }
}


#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::test_utils::*;
    use super::*;

    #[test]
    fn owners_compare_by_value() {
        assert_eq!(
            AnimationOwner::new("com.mapbox.maps.gestures"),
            AnimationOwner::GESTURES
        );
        assert_ne!(AnimationOwner::GESTURES, AnimationOwner::UNSPECIFIED);
        assert_eq!(
            AnimationOwner::CAMERA_ANIMATIONS_MANAGER.as_str(),
            "com.mapbox.maps.cameraAnimationsManager"
        );
        assert_eq!(AnimationType::DECELERATION.to_string(), "deceleration");
    }

    #[test]
    fn deferred_queue_runs_tasks_once() {
        let queue = DeferredQueue::new();
        let counter = Rc::new(Cell::new(0));

        let c = counter.clone();
        queue.push(move || c.set(c.get() + 1));
        assert_eq!(queue.len(), 1);

        queue.run_pending();
        queue.run_pending();
        assert_eq!(counter.get(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn deferred_task_scheduled_while_running_waits() {
        let queue = DeferredQueue::new();
        let counter = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let c = counter.clone();
        queue.push(move || {
            let c = c.clone();
            inner_queue.push(move || c.set(c.get() + 1));
        });

        queue.run_pending();
        assert_eq!(counter.get(), 0);
        assert_eq!(queue.len(), 1);

        queue.run_pending();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn core_sends_statuses_for_active_transitions_only() {
        let (_, context) = manual_context();
        let mut core = AnimatorCore::new(
            AnimationOwner::UNSPECIFIED,
            AnimationType::UNSPECIFIED,
            &context,
        );
        let statuses = record_statuses(core.signal());

        core.set_paused();
        core.set_running();
        core.set_paused();
        core.set_running();
        core.finish(AnimatingPosition::End);
        core.finish(AnimatingPosition::Current);

        assert_eq!(
            *statuses.borrow(),
            vec![
                CameraAnimatorStatus::Started,
                CameraAnimatorStatus::Paused,
                CameraAnimatorStatus::Started,
                CameraAnimatorStatus::Stopped(StopReason::Finished),
            ]
        );
        assert_eq!(core.state(), AnimatorState::Final(AnimatingPosition::End));
    }

    #[test]
    fn core_initial_to_final_is_silent() {
        let (_, context) = manual_context();
        let mut core = AnimatorCore::new(
            AnimationOwner::UNSPECIFIED,
            AnimationType::UNSPECIFIED,
            &context,
        );
        let statuses = record_statuses(core.signal());
        let (positions, completion) = completion_recorder();
        core.add_completion(completion);

        core.finish(AnimatingPosition::Current);

        assert!(statuses.borrow().is_empty());
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::Current]);
    }

    #[test]
    fn late_completion_is_deferred() {
        let (_, context) = manual_context();
        let mut core = AnimatorCore::new(
            AnimationOwner::UNSPECIFIED,
            AnimationType::UNSPECIFIED,
            &context,
        );
        core.set_running();
        core.finish(AnimatingPosition::End);

        let (positions, completion) = completion_recorder();
        core.add_completion(completion);
        assert!(positions.borrow().is_empty());

        context.deferred().run_pending();
        assert_eq!(*positions.borrow(), vec![AnimatingPosition::End]);
    }

    #[test]
    fn timeline_pauses_and_resumes() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(4), &context);

        timeline.resume(Duration::ZERO);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timeline.ratio(), 0.25);

        timeline.pause();
        clock.advance(Duration::from_secs(10));
        assert_eq!(timeline.ratio(), 0.25);

        timeline.resume(Duration::ZERO);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timeline.ratio(), 0.5);

        timeline.mirror();
        assert_eq!(timeline.ratio(), 0.5);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timeline.ratio(), 0.75);

        clock.advance(Duration::from_secs(10));
        assert_eq!(timeline.ratio(), 1.0);
    }

    #[test]
    fn timeline_waits_for_delay() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.resume(Duration::from_secs(1));
        assert!(timeline.is_waiting());
        assert_eq!(timeline.ratio(), 0.0);

        clock.advance(Duration::from_secs(2));
        assert!(!timeline.is_waiting());
        assert_eq!(timeline.ratio(), 0.5);
    }

    #[test]
    fn timeline_scale_keeps_ratio() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.resume(Duration::ZERO);
        clock.advance(Duration::from_secs(1));
        timeline.scale(2.0);
        assert_eq!(timeline.duration(), Duration::from_secs(4));
        assert_eq!(timeline.ratio(), 0.5);

        timeline.resume(Duration::ZERO);
        clock.advance(Duration::from_secs(1));
        assert_eq!(timeline.ratio(), 0.75);
    }

    #[test]
    fn timeline_scale_rejects_unrepresentable_duration() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.resume(Duration::ZERO);
        clock.advance(Duration::from_secs(1));
        assert!(!timeline.scale(1e300));
        assert!(!timeline.scale(f64::NAN));
        assert_eq!(timeline.duration(), Duration::from_secs(2));
        assert_eq!(timeline.ratio(), 0.5);
    }

    #[test]
    fn timeline_ignores_non_finite_ratio() {
        let (_, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.set_ratio(0.25);
        timeline.set_ratio(f64::NAN);
        timeline.set_ratio(f64::INFINITY);
        assert_eq!(timeline.ratio(), 0.25);
    }

    #[test]
    fn timeline_accepts_any_delay() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.resume(Duration::MAX);
        clock.advance(Duration::from_secs(3600));
        assert!(timeline.is_waiting());
        assert_eq!(timeline.ratio(), 0.0);

        timeline.mirror();
        assert!(timeline.is_waiting());
        assert_eq!(timeline.ratio(), 1.0);
    }

    #[test]
    fn timeline_mirror_keeps_remaining_delay() {
        let (clock, context) = manual_context();
        let mut timeline = Timeline::new(Duration::from_secs(2), &context);

        timeline.resume(Duration::from_secs(1));
        clock.advance(Duration::from_millis(500));
        timeline.mirror();
        assert!(timeline.is_waiting());

        clock.advance(Duration::from_millis(1000));
        assert!(!timeline.is_waiting());
        assert_eq!(timeline.ratio(), 1.0);
    }

    #[test]
    fn zero_duration_is_complete() {
        let (_, context) = manual_context();
        let timeline = Timeline::new(Duration::ZERO, &context);
        assert_eq!(timeline.ratio(), 1.0);
    }
}
