//! Reusable reveal actions.
//!
//! Variants compose around a single [`RevealAction`] rather than extend one
//! another: [`FollowUp`] wraps any action, [`Cascade`] and [`CountUp`] are
//! standalone strategies, and closures work anywhere an action is expected.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::Animator;
use crate::counter::{CounterAnimation, CounterConfig};
use crate::surface::SurfaceHandle;
use crate::target::{RevealEffect, TargetId, WatchableTarget};
use crate::trigger::{RevealAction, RevealContext};

/// Apply the target's own effect descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyEffect;

impl RevealAction for ApplyEffect {
    fn reveal(&mut self, target: &WatchableTarget, _ctx: &RevealContext) {
        target.effect().apply(target.surface());
    }
}

/// Reveal a container, then its children one interval apart.
///
/// Child `i` receives `child_effect` at `i * interval` after the container
/// fires.
pub struct Cascade {
    child_effect: RevealEffect,
    interval: Duration,
    children: HashMap<TargetId, Vec<SurfaceHandle>>,
}

impl Cascade {
    /// Create a cascade with no children attached.
    #[must_use]
    pub fn new(child_effect: RevealEffect, interval: Duration) -> Self {
        Self {
            child_effect,
            interval,
            children: HashMap::new(),
        }
    }

    /// Attach the child surfaces of `container`, in display order.
    #[must_use]
    pub fn with_children(mut self, container: TargetId, children: Vec<SurfaceHandle>) -> Self {
        self.children.insert(container, children);
        self
    }

    /// Attach children in place.
    pub fn add_children(&mut self, container: TargetId, children: Vec<SurfaceHandle>) {
        self.children.insert(container, children);
    }
}

impl RevealAction for Cascade {
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext) {
        target.effect().apply(target.surface());
        let Some(children) = self.children.get(&target.id()) else {
            return;
        };
        for (index, child) in children.iter().enumerate() {
            let delay = self
                .interval
                .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            if delay.is_zero() {
                self.child_effect.apply(child.as_ref());
                continue;
            }
            let child = Rc::clone(child);
            let effect = self.child_effect.clone();
            ctx.scheduler()
                .defer(delay, Box::new(move || effect.apply(child.as_ref())));
        }
    }
}

/// Run an inner action, then apply a secondary effect to a related
/// surface after a delay.
pub struct FollowUp<A> {
    inner: A,
    effect: RevealEffect,
    delay: Duration,
    surfaces: HashMap<TargetId, SurfaceHandle>,
}

impl<A: RevealAction> FollowUp<A> {
    /// Wrap `inner`; targets without an attached surface get no follow-up.
    #[must_use]
    pub fn new(inner: A, effect: RevealEffect, delay: Duration) -> Self {
        Self {
            inner,
            effect,
            delay,
            surfaces: HashMap::new(),
        }
    }

    /// Attach the secondary surface for `target`.
    #[must_use]
    pub fn with_surface(mut self, target: TargetId, surface: SurfaceHandle) -> Self {
        self.surfaces.insert(target, surface);
        self
    }

    /// Attach a secondary surface in place.
    pub fn add_surface(&mut self, target: TargetId, surface: SurfaceHandle) {
        self.surfaces.insert(target, surface);
    }
}

impl<A: RevealAction> RevealAction for FollowUp<A> {
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext) {
        self.inner.reveal(target, ctx);
        if let Some(surface) = self.surfaces.get(&target.id()) {
            let surface = Rc::clone(surface);
            let effect = self.effect.clone();
            ctx.scheduler()
                .defer(self.delay, Box::new(move || effect.apply(surface.as_ref())));
        }
    }
}

/// Start a count-up on the revealed target.
#[derive(Default)]
pub struct CountUp {
    config: CounterConfig,
    targets: HashMap<TargetId, u64>,
    started: Vec<Animator>,
}

impl CountUp {
    /// Create with the given counter timing.
    #[must_use]
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            targets: HashMap::new(),
            started: Vec::new(),
        }
    }

    /// Set the value `target` counts up to.
    #[must_use]
    pub fn with_value(mut self, target: TargetId, value: u64) -> Self {
        self.targets.insert(target, value);
        self
    }

    /// Set a value in place.
    pub fn set_value(&mut self, target: TargetId, value: u64) {
        self.targets.insert(target, value);
    }

    /// Animators started so far, in reveal order.
    #[must_use]
    pub fn started(&self) -> &[Animator] {
        &self.started
    }
}

impl RevealAction for CountUp {
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext) {
        target.effect().apply(target.surface());
        let Some(&value) = self.targets.get(&target.id()) else {
            tracing::debug!("No count value for {}", target.id());
            return;
        };
        let animation = CounterAnimation::new(value, target.surface_handle(), self.config);
        let cadence = animation.first_cadence();
        let animator = Animator::new(Rc::clone(ctx.scheduler()), animation);
        animator.start_with(cadence);
        self.started.push(animator);
    }
}
