//! One-shot visibility triggers.
//!
//! A [`VisibilityTrigger`] owns a list of [`WatchableTarget`]s and a single
//! [`RevealAction`]. Each observation pass hands it the current
//! [`IntersectionEntry`]s; every observed target at or above the threshold
//! is revealed and then dropped from observation, so the action fires at
//! most once per target no matter how often the viewport re-crosses it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RevealError, RevealResult};
use crate::geometry::{IntersectionEntry, Rect, RootMargin, Viewport};
use crate::scheduler::SchedulerHandle;
use crate::target::{TargetId, WatchableTarget};

/// Slack allowed below the threshold when matching a ratio.
///
/// Browsers report the ratio at a crossing after layout rounding, so an
/// element that just reached a 0.5 threshold may arrive as 0.4995.
pub const THRESHOLD_TOLERANCE: f64 = 1e-3;

/// Whether a target can fire more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Fire once, then stop observing.
    #[default]
    Once,
    /// Fire on every fresh entry (after having left the root).
    Repeat,
}

/// Threshold, margin and stagger settings for a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Visible fraction required to fire, `0.0..=1.0`.
    pub threshold: f64,
    /// Offsets applied to the viewport before testing.
    #[serde(default)]
    pub root_margin: RootMargin,
    /// One-shot or repeatable.
    #[serde(default)]
    pub mode: TriggerMode,
    /// Per-index delay when several targets fire together.
    #[serde(default, with = "millis_opt")]
    pub stagger: Option<Duration>,
}

impl TriggerConfig {
    /// Create a one-shot config with the given threshold.
    ///
    /// # Errors
    ///
    /// Returns [`RevealError::InvalidThreshold`] if `threshold` is outside
    /// `0.0..=1.0`.
    pub fn new(threshold: f64) -> RevealResult<Self> {
        let config = Self {
            threshold,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the root margin.
    #[must_use]
    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    /// Set the stagger interval.
    #[must_use]
    pub fn with_stagger(mut self, interval: Duration) -> Self {
        self.stagger = Some(interval);
        self
    }

    /// Switch to repeatable firing.
    #[must_use]
    pub fn repeating(mut self) -> Self {
        self.mode = TriggerMode::Repeat;
        self
    }

    /// Check the threshold range.
    ///
    /// # Errors
    ///
    /// Returns [`RevealError::InvalidThreshold`] if out of range or NaN.
    pub fn validate(&self) -> RevealResult<()> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(RevealError::InvalidThreshold(self.threshold))
        }
    }

    /// Whether `entry` satisfies this configuration, within
    /// [`THRESHOLD_TOLERANCE`] of the threshold.
    #[must_use]
    pub fn is_satisfied_by(&self, entry: &IntersectionEntry) -> bool {
        entry.is_intersecting && entry.ratio + THRESHOLD_TOLERANCE >= self.threshold
    }

    /// Delay for the target at `index` within a simultaneous group.
    #[must_use]
    pub fn stagger_delay(&self, index: usize) -> Duration {
        self.stagger.map_or(Duration::ZERO, |interval| {
            interval.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
        })
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
            mode: TriggerMode::Once,
            stagger: None,
        }
    }
}

mod millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// Information passed to a reveal action when it fires.
pub struct RevealContext {
    scheduler: SchedulerHandle,
    index: usize,
}

impl RevealContext {
    /// Create a context. Hosts normally get one from the trigger.
    #[must_use]
    pub fn new(scheduler: SchedulerHandle, index: usize) -> Self {
        Self { scheduler, index }
    }

    /// Scheduler for follow-up work.
    #[must_use]
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Position of the target within the group that fired together.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time at which the action is running.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }
}

/// The visual side effect run when a target is revealed.
pub trait RevealAction {
    /// Reveal `target`.
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext);
}

impl<F> RevealAction for F
where
    F: FnMut(&WatchableTarget, &RevealContext),
{
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext) {
        self(target, ctx);
    }
}

type SharedAction = Rc<RefCell<Box<dyn RevealAction>>>;

struct Slot {
    target: WatchableTarget,
    observing: bool,
    inside: bool,
}

/// One-shot visibility trigger over a set of targets.
pub struct VisibilityTrigger {
    config: TriggerConfig,
    scheduler: SchedulerHandle,
    action: SharedAction,
    slots: Vec<Slot>,
}

impl VisibilityTrigger {
    /// Create a trigger with no targets.
    pub fn new(
        config: TriggerConfig,
        scheduler: SchedulerHandle,
        action: impl RevealAction + 'static,
    ) -> Self {
        Self {
            config,
            scheduler,
            action: Rc::new(RefCell::new(Box::new(action))),
            slots: Vec::new(),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Begin observing targets, in order.
    ///
    /// Absent targets (`None`) and IDs already registered are skipped.
    pub fn register<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = Option<WatchableTarget>>,
    {
        for target in targets {
            let Some(target) = target else {
                tracing::debug!("Skipping missing reveal target");
                continue;
            };
            if self.position(target.id()).is_some() {
                tracing::debug!("Target {} already registered", target.id());
                continue;
            }
            let observing = !target.is_revealed();
            self.slots.push(Slot {
                target,
                observing,
                inside: false,
            });
        }
    }

    fn position(&self, id: TargetId) -> Option<usize> {
        self.slots.iter().position(|s| s.target.id() == id)
    }

    /// Run one observation pass.
    ///
    /// Returns the targets revealed by this pass, in registration order.
    /// Hosts use it to stop observing those nodes.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> Vec<TargetId> {
        // Later entries for the same target supersede earlier ones.
        let latest: HashMap<TargetId, &IntersectionEntry> =
            entries.iter().map(|e| (e.target, e)).collect();

        let mut fired = Vec::new();
        for (slot_index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.observing {
                continue;
            }
            let Some(entry) = latest.get(&slot.target.id()) else {
                continue;
            };
            let satisfied = self.config.is_satisfied_by(entry);
            match self.config.mode {
                TriggerMode::Once => {
                    if satisfied {
                        slot.target.mark_revealed();
                        slot.observing = false;
                        fired.push(slot_index);
                    }
                }
                TriggerMode::Repeat => {
                    if satisfied && !slot.inside {
                        slot.inside = true;
                        slot.target.mark_revealed();
                        fired.push(slot_index);
                    } else if !entry.is_intersecting {
                        slot.inside = false;
                    }
                }
            }
        }

        let mut revealed = Vec::with_capacity(fired.len());
        for (ordinal, slot_index) in fired.into_iter().enumerate() {
            let target = &self.slots[slot_index].target;
            let index = target.stagger_index().unwrap_or(ordinal);
            self.fire(target.clone(), index);
            revealed.push(target.id());
        }
        revealed
    }

    fn fire(&self, target: WatchableTarget, index: usize) {
        let delay = self.config.stagger_delay(index);
        tracing::trace!("Revealing {} (index {index}, delay {delay:?})", target.id());
        if delay.is_zero() {
            let ctx = RevealContext::new(Rc::clone(&self.scheduler), index);
            self.action.borrow_mut().reveal(&target, &ctx);
            return;
        }
        let action = Rc::clone(&self.action);
        let scheduler = Rc::clone(&self.scheduler);
        self.scheduler.defer(
            delay,
            Box::new(move || {
                let ctx = RevealContext::new(scheduler, index);
                action.borrow_mut().reveal(&target, &ctx);
            }),
        );
    }

    /// Run an observation pass from layout rectangles.
    ///
    /// Targets without bounds are treated as not intersecting.
    pub fn observe_layout(
        &mut self,
        viewport: &Viewport,
        bounds: &[(TargetId, Rect)],
    ) -> Vec<TargetId> {
        let root = viewport.root_rect(&self.config.root_margin);
        let entries: Vec<_> = bounds
            .iter()
            .map(|(id, rect)| IntersectionEntry::compute(*id, rect, &root))
            .collect();
        self.observe(&entries)
    }

    /// Whether `id` is still being observed.
    #[must_use]
    pub fn is_observing(&self, id: TargetId) -> bool {
        self.position(id).is_some_and(|i| self.slots[i].observing)
    }

    /// Whether `id` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: TargetId) -> bool {
        self.position(id)
            .is_some_and(|i| self.slots[i].target.is_revealed())
    }

    /// Number of targets still observed.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.observing).count()
    }

    /// Number of targets revealed.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.target.is_revealed()).count()
    }

    /// All registered targets in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &WatchableTarget> {
        self.slots.iter().map(|s| &s.target)
    }
}

impl std::fmt::Debug for VisibilityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("config", &self.config)
            .field("targets", &self.slots.len())
            .field("observed", &self.observed_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ManualScheduler, Scheduler};
    use crate::surface::RecordingSurface;
    use crate::target::RevealEffect;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counting_trigger(
        config: TriggerConfig,
        scheduler: &Rc<ManualScheduler>,
    ) -> (VisibilityTrigger, Rc<RefCell<Vec<(TargetId, Duration)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let trigger = VisibilityTrigger::new(
            config,
            scheduler.clone(),
            move |target: &WatchableTarget, ctx: &RevealContext| {
                sink.borrow_mut().push((target.id(), ctx.now()));
            },
        );
        (trigger, log)
    }

    fn target() -> WatchableTarget {
        WatchableTarget::new(RecordingSurface::shared("t")).with_effect(RevealEffect::class("animated"))
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(TriggerConfig::new(1.5).is_err());
        assert!(TriggerConfig::new(-0.1).is_err());
        assert!(TriggerConfig::new(f64::NAN).is_err());
        assert!(TriggerConfig::new(0.5).is_ok());
    }

    #[test]
    fn fires_once_and_stops_observing() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = counting_trigger(TriggerConfig::new(0.1).unwrap(), &scheduler);
        let t = target();
        let id = t.id();
        trigger.register([Some(t)]);

        assert_eq!(trigger.observe(&[IntersectionEntry::new(id, 0.15)]), vec![id]);
        assert!(!trigger.is_observing(id));
        assert!(trigger.is_revealed(id));

        assert!(trigger.observe(&[IntersectionEntry::new(id, 0.0)]).is_empty());
        assert!(trigger.observe(&[IntersectionEntry::new(id, 1.0)]).is_empty());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn below_threshold_does_not_fire() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = counting_trigger(TriggerConfig::new(0.5).unwrap(), &scheduler);
        let t = target();
        let id = t.id();
        trigger.register([Some(t)]);
        assert!(trigger.observe(&[IntersectionEntry::new(id, 0.49)]).is_empty());
        assert!(trigger.is_observing(id));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn ratio_rounded_just_below_threshold_fires() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = counting_trigger(TriggerConfig::new(0.5).unwrap(), &scheduler);
        let t = target();
        let id = t.id();
        trigger.register([Some(t)]);
        assert!(trigger
            .observe(&[IntersectionEntry::new(id, 0.5 - THRESHOLD_TOLERANCE * 2.0)])
            .is_empty());
        assert_eq!(trigger.observe(&[IntersectionEntry::new(id, 0.4995)]), vec![id]);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn missing_targets_are_skipped() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, _) = counting_trigger(TriggerConfig::default(), &scheduler);
        trigger.register([None, Some(target()), None]);
        assert_eq!(trigger.observed_count(), 1);
    }

    #[test]
    fn duplicate_ids_register_once() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, _) = counting_trigger(TriggerConfig::default(), &scheduler);
        let t = target();
        trigger.register([Some(t.clone()), Some(t)]);
        assert_eq!(trigger.observed_count(), 1);
    }

    #[test]
    fn reveals_follow_registration_order() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = counting_trigger(TriggerConfig::default(), &scheduler);
        let targets: Vec<_> = (0..3).map(|_| target()).collect();
        let ids: Vec<_> = targets.iter().map(WatchableTarget::id).collect();
        trigger.register(targets.into_iter().map(Some));

        let entries: Vec<_> = ids.iter().rev().map(|id| IntersectionEntry::new(*id, 1.0)).collect();
        assert_eq!(trigger.observe(&entries), ids);
        let fired: Vec<_> = log.borrow().iter().map(|(id, _)| *id).collect();
        assert_eq!(fired, ids);
    }

    #[test]
    fn stagger_delays_by_index() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) =
            counting_trigger(TriggerConfig::default().with_stagger(ms(150)), &scheduler);
        let targets: Vec<_> = (0..5).map(|_| target()).collect();
        let ids: Vec<_> = targets.iter().map(WatchableTarget::id).collect();
        trigger.register(targets.into_iter().map(Some));

        scheduler.advance(ms(1000));
        let entries: Vec<_> = ids.iter().map(|id| IntersectionEntry::new(*id, 1.0)).collect();
        trigger.observe(&entries);
        scheduler.advance(ms(1000));

        let times: Vec<_> = log.borrow().iter().map(|(_, t)| t.as_millis()).collect();
        assert_eq!(times, vec![1000, 1150, 1300, 1450, 1600]);
        let fired: Vec<_> = log.borrow().iter().map(|(id, _)| *id).collect();
        assert_eq!(fired, ids);
    }

    #[test]
    fn explicit_stagger_index_wins() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) =
            counting_trigger(TriggerConfig::default().with_stagger(ms(150)), &scheduler);
        let t = target().with_stagger_index(3);
        let id = t.id();
        trigger.register([Some(t)]);
        trigger.observe(&[IntersectionEntry::new(id, 1.0)]);
        scheduler.advance(ms(449));
        assert!(log.borrow().is_empty());
        scheduler.advance(ms(1));
        assert_eq!(log.borrow()[0].1, ms(450));
    }

    #[test]
    fn repeat_mode_fires_on_each_entry() {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) =
            counting_trigger(TriggerConfig::new(0.5).unwrap().repeating(), &scheduler);
        let t = target();
        let id = t.id();
        trigger.register([Some(t)]);
        trigger.observe(&[IntersectionEntry::new(id, 0.6)]);
        trigger.observe(&[IntersectionEntry::new(id, 0.9)]);
        trigger.observe(&[IntersectionEntry::new(id, 0.0)]);
        trigger.observe(&[IntersectionEntry::new(id, 0.7)]);
        assert_eq!(log.borrow().len(), 2);
        assert!(trigger.is_observing(id));
    }

    #[test]
    fn config_json_uses_margin_string_and_millis() {
        let config: TriggerConfig = serde_json::from_str(
            r#"{"threshold":0.1,"root_margin":"0px 0px -50px 0px","stagger":150}"#,
        )
        .unwrap();
        assert_eq!(config.root_margin, RootMargin::bottom(-50.0));
        assert_eq!(config.stagger, Some(ms(150)));
        assert_eq!(config.mode, TriggerMode::Once);
    }
}
