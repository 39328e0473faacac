//! Registry that owns the animators and drives them on every tick.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::animator::{
    AnimatingPosition, AnimationCompletion, AnimationOwner, AnimationType, AnimatorState,
    CameraAnimator, CameraAnimatorStatus, DeferredQueue,
};
use crate::engine::MapEngine;
use crate::timing::TimingParameters;

/// Identifier of an animator registered in a [`CameraAnimatorsRunner`]. Identifiers grow in the order
/// of registration and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimatorId(u64);

impl fmt::Display for AnimatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an animator owned by a runner.
///
/// The handle does not keep the animator alive. Once the animator reaches its final state, the runner
/// drops it and the handle only remembers the final position.
#[derive(Debug, Clone)]
pub struct AnimatorHandle {
    id: AnimatorId,
    outcome: Rc<Cell<Option<AnimatingPosition>>>,
}

impl AnimatorHandle {
    /// Identifier of the animator.
    pub fn id(&self) -> AnimatorId {
        self.id
    }

    /// Position the animator stopped at, if it is already released by the runner.
    pub fn final_position(&self) -> Option<AnimatingPosition> {
        self.outcome.get()
    }

    /// Returns true if the animator reached its final state and was released.
    pub fn is_finished(&self) -> bool {
        self.outcome.get().is_some()
    }
}

impl PartialEq for AnimatorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

struct AnimatorSlot {
    id: AnimatorId,
    animator: Box<dyn CameraAnimator>,
    outcome: Rc<Cell<Option<AnimatingPosition>>>,
}

type StatusInbox = Rc<RefCell<VecDeque<(AnimatorId, CameraAnimatorStatus)>>>;
type StatusObserver = Box<dyn FnMut(AnimatorId, CameraAnimatorStatus)>;

/// Owner of all camera animators.
///
/// Animators are stored in registration order. The runner listens to their status changes to keep track
/// of the running ones: only running animators are updated on [`CameraAnimatorsRunner::update`], and the
/// map is told when animations begin and end. As soon as an animator reaches its final state it is
/// dropped, so fire-and-forget animations clean up after themselves.
///
/// The runner is disabled when created. While disabled, every added animator is stopped right away and
/// every update cancels all animations.
pub struct CameraAnimatorsRunner {
    is_enabled: bool,
    next_id: u64,
    slots: Vec<AnimatorSlot>,
    active: Vec<AnimatorId>,
    inbox: StatusInbox,
    observers: Vec<StatusObserver>,
    deferred: DeferredQueue,
}

impl CameraAnimatorsRunner {
    /// Creates an empty disabled runner. Deferred completions are scheduled on the given queue, which is
    /// drained at the start of every update.
    pub fn new(deferred: DeferredQueue) -> Self {
        Self {
            is_enabled: false,
            next_id: 0,
            slots: Vec::new(),
            active: Vec::new(),
            inbox: Rc::default(),
            observers: Vec::new(),
            deferred,
        }
    }

    /// Returns true if animations are allowed to run.
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Enables or disables the runner. Disabling cancels all animations.
    pub fn set_enabled(&mut self, is_enabled: bool, engine: &mut dyn MapEngine) {
        self.is_enabled = is_enabled;
        if !is_enabled {
            self.cancel_animations(engine);
        }
    }

    /// Registers an animator. The runner takes ownership of it.
    ///
    /// The animator is not started. An animator that is already running is tracked as active right away.
    /// If the runner is disabled, the animator is stopped immediately.
    pub fn add(
        &mut self,
        mut animator: Box<dyn CameraAnimator>,
        engine: &mut dyn MapEngine,
    ) -> AnimatorHandle {
        let id = AnimatorId(self.next_id);
        self.next_id += 1;

        let inbox = self.inbox.clone();
        animator
            .status_signal()
            .subscribe(move |status| inbox.borrow_mut().push_back((id, status)));

        if !self.is_enabled {
            log::debug!("Animation runner is disabled, stopping animator {id}");
            animator.stop();
        } else if animator.state() == AnimatorState::Running {
            self.inbox
                .borrow_mut()
                .push_back((id, CameraAnimatorStatus::Started));
        }

        let outcome = Rc::new(Cell::new(None));
        self.slots.push(AnimatorSlot {
            id,
            animator,
            outcome: outcome.clone(),
        });
        self.process(engine);

        AnimatorHandle { id, outcome }
    }

    /// Runs deferred completions and updates every running animator in the order of registration.
    pub fn update(&mut self, engine: &mut dyn MapEngine) {
        self.deferred.run_pending();

        if !self.is_enabled {
            self.cancel_animations(engine);
            return;
        }

        let active = self.active.clone();
        for id in active {
            if let Some(index) = self.slot_index(id) {
                self.slots[index].animator.update(engine);
            }
            self.process(engine);
        }
    }

    /// Stops all animators.
    pub fn cancel_animations(&mut self, engine: &mut dyn MapEngine) {
        self.cancel_where(engine, |_| true);
    }

    /// Stops animators of any of the given owners.
    pub fn cancel_animations_with_owners(
        &mut self,
        owners: &[AnimationOwner],
        engine: &mut dyn MapEngine,
    ) {
        self.cancel_where(engine, |animator| owners.contains(animator.owner()));
    }

    /// Stops animators that have one of the given owners and one of the given types.
    pub fn cancel_animations_with_owners_and_types(
        &mut self,
        owners: &[AnimationOwner],
        types: &[AnimationType],
        engine: &mut dyn MapEngine,
    ) {
        self.cancel_where(engine, |animator| {
            owners.contains(animator.owner()) && types.contains(animator.animation_type())
        });
    }

    /// Handles of all animators owned by the runner, in registration order.
    pub fn camera_animators(&self) -> Vec<AnimatorHandle> {
        self.slots
            .iter()
            .map(|slot| AnimatorHandle {
                id: slot.id,
                outcome: slot.outcome.clone(),
            })
            .collect()
    }

    /// Number of animators owned by the runner.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the runner owns no animators.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of running animators.
    pub fn running_count(&self) -> usize {
        self.active.len()
    }

    /// Adds an observer of status changes of all animators.
    pub fn on_status_changed(
        &mut self,
        observer: impl FnMut(AnimatorId, CameraAnimatorStatus) + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    /// State of the animator. Released animators are reported in their final state.
    pub fn state(&self, handle: &AnimatorHandle) -> AnimatorState {
        match self.slot_index(handle.id) {
            Some(index) => self.slots[index].animator.state(),
            None => AnimatorState::Final(handle.outcome.get().unwrap_or(AnimatingPosition::Current)),
        }
    }

    /// Animator of the handle, if it is still owned by the runner.
    pub fn animator(&self, handle: &AnimatorHandle) -> Option<&dyn CameraAnimator> {
        self.slot_index(handle.id)
            .map(|index| self.slots[index].animator.as_ref())
    }

    /// Animator of the handle downcast to its concrete type.
    pub fn animator_as<T: CameraAnimator>(&self, handle: &AnimatorHandle) -> Option<&T> {
        self.animator(handle)?.as_any().downcast_ref()
    }

    /// Mutable animator of the handle downcast to its concrete type.
    pub fn animator_as_mut<T: CameraAnimator>(&mut self, handle: &AnimatorHandle) -> Option<&mut T> {
        let index = self.slot_index(handle.id)?;
        self.slots[index].animator.as_any_mut().downcast_mut()
    }

    /// Starts or resumes the animator.
    pub fn start(&mut self, handle: &AnimatorHandle, engine: &mut dyn MapEngine) {
        self.with_animator(handle, engine, |animator, engine| animator.start(engine));
    }

    /// Starts the animator after a delay.
    pub fn start_after_delay(
        &mut self,
        handle: &AnimatorHandle,
        delay: Duration,
        engine: &mut dyn MapEngine,
    ) {
        self.with_animator(handle, engine, |animator, engine| {
            animator.start_after_delay(delay, engine)
        });
    }

    /// Pauses the animator.
    pub fn pause(&mut self, handle: &AnimatorHandle, engine: &mut dyn MapEngine) {
        self.with_animator(handle, engine, |animator, engine| animator.pause(engine));
    }

    /// Stops the animator.
    pub fn stop(&mut self, handle: &AnimatorHandle, engine: &mut dyn MapEngine) {
        self.with_animator(handle, engine, |animator, _| animator.stop());
    }

    /// Continues a paused animator.
    pub fn continue_animation(
        &mut self,
        handle: &AnimatorHandle,
        timing: Option<TimingParameters>,
        duration_factor: f64,
        engine: &mut dyn MapEngine,
    ) {
        self.with_animator(handle, engine, |animator, engine| {
            animator.continue_animation(timing, duration_factor, engine)
        });
    }

    /// Adds a completion to the animator. If the animator was already released, the completion is
    /// called with its final position on the next update.
    pub fn add_completion(&mut self, handle: &AnimatorHandle, completion: AnimationCompletion) {
        match self.slot_index(handle.id) {
            Some(index) => self.slots[index].animator.add_completion(completion),
            None => match handle.outcome.get() {
                Some(position) => self.deferred.push(move || completion(position)),
                None => log::warn!("Animator {} is not known to the runner", handle.id),
            },
        }
    }

    fn slot_index(&self, id: AnimatorId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |slot| slot.id).ok()
    }

    fn with_animator(
        &mut self,
        handle: &AnimatorHandle,
        engine: &mut dyn MapEngine,
        operation: impl FnOnce(&mut dyn CameraAnimator, &mut dyn MapEngine),
    ) {
        match self.slot_index(handle.id) {
            Some(index) => operation(self.slots[index].animator.as_mut(), engine),
            None => log::debug!("Animator {} is already released", handle.id),
        }

        self.process(engine);
    }

    fn cancel_where(
        &mut self,
        engine: &mut dyn MapEngine,
        predicate: impl Fn(&dyn CameraAnimator) -> bool,
    ) {
        for slot in &mut self.slots {
            if predicate(slot.animator.as_ref()) {
                slot.animator.stop();
            }
        }

        self.process(engine);
    }

    /// Applies the status changes reported by the animators and releases final ones.
    fn process(&mut self, engine: &mut dyn MapEngine) {
        loop {
            let Some((id, status)) = self.inbox.borrow_mut().pop_front() else {
                break;
            };

            match status {
                CameraAnimatorStatus::Started => {
                    if let Err(position) = self.active.binary_search(&id) {
                        self.active.insert(position, id);
                        engine.begin_animation();
                    }
                }
                CameraAnimatorStatus::Paused | CameraAnimatorStatus::Stopped(_) => {
                    if let Ok(position) = self.active.binary_search(&id) {
                        self.active.remove(position);
                        engine.end_animation();
                    }
                }
            }

            for observer in &mut self.observers {
                observer(id, status);
            }
        }

        self.slots.retain(|slot| match slot.animator.state() {
            AnimatorState::Final(position) => {
                log::debug!("Releasing animator {} at {position:?}", slot.id);
                slot.outcome.set(Some(position));
                false
            }
            _ => true,
        });
    }
}

impl fmt::Debug for CameraAnimatorsRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraAnimatorsRunner")
            .field("is_enabled", &self.is_enabled)
            .field("animators", &self.slots.len())
            .field("active", &self.active)
            .finish()
    }
}
