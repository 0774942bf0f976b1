//! Deferred-callback and next-frame scheduling.
//!
//! Every timer in the engine goes through the [`Scheduler`] trait so hosts
//! can plug in `setTimeout`/`requestAnimationFrame` while tests drive a
//! [`ManualScheduler`] on a virtual clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Shared handle to a scheduler.
pub type SchedulerHandle = Rc<dyn Scheduler>;

/// Nominal frame interval used for frame pacing (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Cooperative, single-threaded scheduling primitive.
///
/// Implementations never run a task synchronously from inside `defer` or
/// `next_frame`; tasks always run on a later turn of the event loop.
pub trait Scheduler {
    /// Time elapsed since the scheduler's origin.
    fn now(&self) -> Duration;

    /// Run `task` once after `delay`.
    fn defer(&self, delay: Duration, task: Task);

    /// Run `task` before the next repaint.
    fn next_frame(&self, task: Task);
}

struct Timer {
    fire_at: Duration,
    seq: u64,
    task: Task,
}

/// Deterministic scheduler driven by explicit clock advances.
///
/// Timers fire in `(fire time, insertion order)` order. Frame callbacks
/// queued during a frame run on the following frame.
pub struct ManualScheduler {
    now: Cell<Duration>,
    frame_interval: Duration,
    seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<Task>>,
    frames_run: Cell<u64>,
}

impl ManualScheduler {
    /// Create a scheduler at time zero with the default frame interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL)
    }

    /// Create a scheduler with a custom frame interval.
    #[must_use]
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            frame_interval,
            seq: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            frames_run: Cell::new(0),
        }
    }

    /// Create a shared scheduler.
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Number of frame callbacks waiting for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending_timers() == 0 && self.pending_frames() == 0
    }

    /// Total frames run so far.
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    fn next_timer_at(&self) -> Option<Duration> {
        self.timers.borrow().iter().map(|t| t.fire_at).min()
    }

    /// Pop the earliest due timer, if one is due by `deadline`.
    fn pop_due(&self, deadline: Duration) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at <= deadline)
            .min_by_key(|(_, t)| (t.fire_at, t.seq))
            .map(|(i, _)| i)?;
        Some(timers.swap_remove(index))
    }

    /// Fire all timers due up to `deadline`, then set the clock to it.
    ///
    /// Frame callbacks are not run.
    pub fn advance_to(&self, deadline: Duration) {
        while let Some(timer) = self.pop_due(deadline) {
            self.now.set(timer.fire_at.max(self.now.get()));
            (timer.task)();
        }
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }

    /// Advance the clock by `by`, firing due timers.
    pub fn advance(&self, by: Duration) {
        self.advance_to(self.now.get() + by);
    }

    /// Advance one frame interval and run the queued frame callbacks.
    ///
    /// Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        self.advance(self.frame_interval);
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for task in frames {
            task();
        }
        self.frames_run.set(self.frames_run.get() + 1);
        count
    }

    /// Interleave timers and frames until `deadline` or until idle.
    pub fn run_until(&self, deadline: Duration) {
        loop {
            let now = self.now.get();
            let next_frame = (self.pending_frames() > 0).then(|| now + self.frame_interval);
            let next_timer = self.next_timer_at();
            let frame_first = match (next_timer, next_frame) {
                (None, None) => break,
                (Some(t), Some(f)) => f < t,
                (None, Some(_)) => true,
                (Some(_), None) => false,
            };
            if frame_first {
                if next_frame.is_some_and(|f| f > deadline) {
                    break;
                }
                self.run_frame();
            } else {
                match next_timer {
                    Some(t) if t <= deadline => self.advance_to(t),
                    _ => break,
                }
            }
        }
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }

    /// Run for `duration` of virtual time.
    pub fn run_for(&self, duration: Duration) {
        self.run_until(self.now.get() + duration);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn defer(&self, delay: Duration, task: Task) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            fire_at: self.now.get() + delay,
            seq,
            task,
        });
    }

    fn next_frame(&self, task: Task) {
        self.frames.borrow_mut().push(task);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending_timers", &self.pending_timers())
            .field("pending_frames", &self.pending_frames())
            .finish()
    }
}
