//! Explicit animation state machine.
//!
//! Frame-stepped and timer-stepped effects implement [`Animation`]; an
//! [`Animator`] owns the stepping loop and its state transitions:
//!
//! ```text
//!   Idle ──start──▶ Animating ──step()=Finished──▶ Done
//!                    │    ▲
//!               pause│    │resume
//!                    ▼    │
//!                   Paused ──cancel──▶ Done
//! ```
//!
//! Only the animator reschedules; animations just report how long to wait
//! before their next step.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::SchedulerHandle;

/// Lifecycle of an animation driven by an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Created but not started.
    Idle,
    /// Steps are being scheduled.
    Animating,
    /// Stepping is suspended; `resume` continues.
    Paused,
    /// Finished or cancelled. Terminal.
    Done,
}

/// When the next step should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// On the next animation frame.
    NextFrame,
    /// After a fixed delay.
    After(Duration),
}

/// Outcome of a single animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Schedule another step.
    Continue(Cadence),
    /// The animation is complete.
    Finished,
}

/// A steppable effect.
pub trait Animation {
    /// Advance by one step, writing any visual output.
    fn step(&mut self) -> Step;
}

struct AnimatorInner {
    scheduler: SchedulerHandle,
    animation: RefCell<Box<dyn Animation>>,
    state: Cell<AnimationState>,
    generation: Cell<u64>,
    cadence: Cell<Cadence>,
    steps: Cell<u64>,
}

impl AnimatorInner {
    fn schedule(inner: &Rc<Self>, cadence: Cadence) {
        inner.cadence.set(cadence);
        let generation = inner.generation.get();
        let this = Rc::clone(inner);
        let task = Box::new(move || Self::tick(&this, generation));
        match cadence {
            Cadence::NextFrame => inner.scheduler.next_frame(task),
            Cadence::After(delay) => inner.scheduler.defer(delay, task),
        }
    }

    fn tick(inner: &Rc<Self>, generation: u64) {
        if generation != inner.generation.get() || inner.state.get() != AnimationState::Animating
        {
            return;
        }
        let step = inner.animation.borrow_mut().step();
        inner.steps.set(inner.steps.get() + 1);
        match step {
            Step::Continue(cadence) => Self::schedule(inner, cadence),
            Step::Finished => {
                tracing::trace!("Animation finished after {} steps", inner.steps.get());
                inner.state.set(AnimationState::Done);
            }
        }
    }

    fn invalidate(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

/// Handle driving an [`Animation`] through a scheduler.
///
/// Clones share the same underlying state machine. Dropping every handle
/// does not stop a running animation; scheduled steps keep it alive until
/// it finishes.
#[derive(Clone)]
pub struct Animator {
    inner: Rc<AnimatorInner>,
}

impl Animator {
    /// Wrap an animation. Nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new(scheduler: SchedulerHandle, animation: impl Animation + 'static) -> Self {
        Self {
            inner: Rc::new(AnimatorInner {
                scheduler,
                animation: RefCell::new(Box::new(animation)),
                state: Cell::new(AnimationState::Idle),
                generation: Cell::new(0),
                cadence: Cell::new(Cadence::NextFrame),
                steps: Cell::new(0),
            }),
        }
    }

    /// Start and run the first step synchronously.
    ///
    /// No-op unless the animator is idle.
    pub fn start(&self) {
        if self.begin() {
            AnimatorInner::tick(&self.inner, self.inner.generation.get());
        }
    }

    /// Start with the first step deferred by `cadence`.
    ///
    /// No-op unless the animator is idle.
    pub fn start_with(&self, cadence: Cadence) {
        if self.begin() {
            AnimatorInner::schedule(&self.inner, cadence);
        }
    }

    fn begin(&self) -> bool {
        if self.inner.state.get() != AnimationState::Idle {
            return false;
        }
        self.inner.state.set(AnimationState::Animating);
        true
    }

    /// Suspend stepping. The pending step is discarded.
    pub fn pause(&self) {
        if self.inner.state.get() == AnimationState::Animating {
            self.inner.invalidate();
            self.inner.state.set(AnimationState::Paused);
        }
    }

    /// Continue after [`pause`](Self::pause), waiting the full last cadence
    /// again before the next step.
    pub fn resume(&self) {
        if self.inner.state.get() == AnimationState::Paused {
            self.inner.state.set(AnimationState::Animating);
            AnimatorInner::schedule(&self.inner, self.inner.cadence.get());
        }
    }

    /// Stop permanently.
    pub fn cancel(&self) {
        if self.inner.state.get() != AnimationState::Done {
            self.inner.invalidate();
            self.inner.state.set(AnimationState::Done);
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.inner.state.get()
    }

    /// Whether the animation reached [`AnimationState::Done`].
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state() == AnimationState::Done
    }

    /// Steps executed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.inner.steps.get()
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("state", &self.state())
            .field("steps", &self.steps())
            .finish_non_exhaustive()
    }
}
