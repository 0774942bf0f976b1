//! Property tests for the reveal engine.
//!
//! - A target's action fires at most once, whatever the entry sequence
//! - Nothing fires below the threshold, less the rounding tolerance
//! - Staggered groups fire in index order, `index * interval` apart
//! - Counters never go backwards and land exactly on the target

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use reveal_core::{
    CountUp, CounterConfig, IntersectionEntry, ManualScheduler, RecordingSurface, RevealContext,
    Scheduler, TargetId, TriggerConfig, VisibilityTrigger, WatchableTarget, THRESHOLD_TOLERANCE,
};

type FireLog = Rc<RefCell<Vec<(TargetId, Duration)>>>;

fn logging_trigger(config: TriggerConfig, scheduler: &Rc<ManualScheduler>) -> (VisibilityTrigger, FireLog) {
    let log: FireLog = Rc::new(RefCell::new(Vec::new()));
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

fn register_targets(trigger: &mut VisibilityTrigger, count: usize) -> Vec<TargetId> {
    let targets: Vec<_> = (0..count)
        .map(|i| WatchableTarget::new(RecordingSurface::shared(format!("t{i}"))))
        .collect();
    let ids = targets.iter().map(WatchableTarget::id).collect();
    trigger.register(targets.into_iter().map(Some));
    ids
}

proptest! {
    #[test]
    fn prop_reveal_fires_at_most_once(
        threshold in 0.0f64..=1.0,
        passes in prop::collection::vec(
            prop::collection::vec((0usize..4, 0.0f64..=1.0), 0..6),
            1..20
        )
    ) {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = logging_trigger(TriggerConfig::new(threshold).unwrap(), &scheduler);
        let ids = register_targets(&mut trigger, 4);

        for pass in passes {
            let entries: Vec<_> = pass
                .iter()
                .map(|(i, ratio)| IntersectionEntry::new(ids[*i], *ratio))
                .collect();
            trigger.observe(&entries);
        }

        let mut counts: HashMap<TargetId, usize> = HashMap::new();
        for (id, _) in log.borrow().iter() {
            *counts.entry(*id).or_default() += 1;
        }
        prop_assert!(counts.values().all(|&c| c == 1));
        prop_assert_eq!(counts.len(), trigger.revealed_count());
        prop_assert_eq!(trigger.revealed_count() + trigger.observed_count(), 4);
    }

    #[test]
    fn prop_never_fires_below_threshold(
        threshold in 0.05f64..=1.0,
        ratios in prop::collection::vec(0.0f64..1.0, 1..30)
    ) {
        let scheduler = ManualScheduler::shared();
        let (mut trigger, log) = logging_trigger(TriggerConfig::new(threshold).unwrap(), &scheduler);
        let ids = register_targets(&mut trigger, 1);

        let below = threshold - THRESHOLD_TOLERANCE;
        for ratio in ratios.iter().map(|r| r * below * 0.999) {
            trigger.observe(&[IntersectionEntry::new(ids[0], ratio)]);
        }
        prop_assert!(log.borrow().is_empty());
        prop_assert!(trigger.is_observing(ids[0]));
    }

    #[test]
    fn prop_stagger_order_and_spacing(
        count in 1usize..12,
        interval_ms in 1u64..500,
        start_ms in 0u64..5000
    ) {
        let scheduler = ManualScheduler::shared();
        let config = TriggerConfig::default().with_stagger(Duration::from_millis(interval_ms));
        let (mut trigger, log) = logging_trigger(config, &scheduler);
        let ids = register_targets(&mut trigger, count);

        scheduler.advance(Duration::from_millis(start_ms));
        let entries: Vec<_> = ids.iter().map(|id| IntersectionEntry::new(*id, 1.0)).collect();
        trigger.observe(&entries);
        scheduler.advance(Duration::from_millis(interval_ms * count as u64 + 1));

        let log = log.borrow();
        prop_assert_eq!(log.len(), count);
        for (i, (id, at)) in log.iter().enumerate() {
            prop_assert_eq!(*id, ids[i]);
            let expected = Duration::from_millis(start_ms + interval_ms * i as u64);
            prop_assert!(*at >= expected);
            prop_assert_eq!(*at, expected);
        }
    }

    #[test]
    fn prop_counter_is_monotonic_and_exact(target in 0u64..1_000_000) {
        let scheduler = ManualScheduler::shared();
        let surface = RecordingSurface::shared("stat");
        let watch = WatchableTarget::new(surface.clone());
        let id = watch.id();
        let action = CountUp::new(CounterConfig::default()).with_value(id, target);
        let mut trigger = VisibilityTrigger::new(TriggerConfig::default(), scheduler.clone(), action);
        trigger.register([Some(watch)]);
        trigger.observe(&[IntersectionEntry::new(id, 1.0)]);
        scheduler.advance(Duration::from_millis(2000));

        let texts = surface.texts();
        let suffixed = target > 10;
        let values: Vec<u64> = texts
            .iter()
            .map(|t| {
                let digits = t.strip_suffix('+').unwrap_or(t);
                assert_eq!(t.ends_with('+'), suffixed);
                digits.parse().unwrap()
            })
            .collect();
        prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(values.last().copied(), Some(target));
        prop_assert_eq!(scheduler.now(), Duration::from_millis(2000));
    }
}
