//! Reveal Scenario Tests
//!
//! End-to-end behaviour of the visibility trigger and its variants:
//! - One-shot reveal with a negative bottom margin
//! - Staggered group reveals
//! - Count-up counters
//! - Typing effect driven through the animator

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use reveal_core::{
    AnimationState, ApplyEffect, CountUp, CounterConfig, IntersectionEntry, ManualScheduler,
    RecordingSurface, Rect, RevealContext, RevealEffect, RootMargin, Scheduler, TargetId,
    TriggerConfig, TypingConfig, TypingEffect, Viewport, VisibilityTrigger, WatchableTarget,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// One-shot reveal
// ============================================================================

#[test]
fn test_margin_reveal_fires_once_across_scrolls() {
    let scheduler = ManualScheduler::shared();
    let surface = RecordingSurface::shared("section");
    let target =
        WatchableTarget::new(surface.clone()).with_effect(RevealEffect::class("animated"));
    let id = target.id();

    let margin: RootMargin = "0 0 -50px 0".parse().expect("valid margin");
    let config = TriggerConfig::new(0.1)
        .expect("valid threshold")
        .with_root_margin(margin);
    let mut trigger = VisibilityTrigger::new(config, scheduler, ApplyEffect);
    trigger.register([Some(target)]);

    let viewport = Viewport::new(1000.0, 800.0);
    let at = |y: f64| [(id, Rect::new(0.0, y, 1000.0, 200.0))];

    // Below the shrunken root: 770 > 750.
    assert!(trigger.observe_layout(&viewport, &at(770.0)).is_empty());
    assert!(!surface.has_class("animated"));

    // 30px of 200px inside the root: 15% visible.
    assert_eq!(trigger.observe_layout(&viewport, &at(720.0)), vec![id]);
    assert_eq!(surface.class_count("animated"), 1);

    // Fully out, then back to 50%.
    assert!(trigger.observe_layout(&viewport, &at(2000.0)).is_empty());
    assert!(trigger.observe_layout(&viewport, &at(650.0)).is_empty());
    assert_eq!(surface.class_count("animated"), 1);
    assert_eq!(trigger.revealed_count(), 1);
    assert_eq!(trigger.observed_count(), 0);
}

#[test]
fn test_margin_keeps_target_hidden_inside_bottom_band() {
    let scheduler = ManualScheduler::shared();
    let surface = RecordingSurface::shared("card");
    let target = WatchableTarget::new(surface.clone()).with_effect(RevealEffect::class("animated"));
    let id = target.id();
    let config = TriggerConfig::new(0.1)
        .expect("valid threshold")
        .with_root_margin(RootMargin::bottom(-50.0));
    let mut trigger = VisibilityTrigger::new(config, scheduler, ApplyEffect);
    trigger.register([Some(target)]);

    // Visible in the raw viewport, but only within the excluded 50px band.
    let bounds = [(id, Rect::new(0.0, 760.0, 100.0, 100.0))];
    assert!(trigger
        .observe_layout(&Viewport::new(1000.0, 800.0), &bounds)
        .is_empty());
    assert!(trigger.is_observing(id));
}

#[test]
fn test_missing_targets_never_raise() {
    let scheduler = ManualScheduler::shared();
    let mut trigger = VisibilityTrigger::new(TriggerConfig::default(), scheduler, ApplyEffect);
    trigger.register(std::iter::repeat_with(|| None).take(4));
    assert_eq!(trigger.observed_count(), 0);
    assert!(trigger
        .observe(&[IntersectionEntry::new(TargetId::new(), 1.0)])
        .is_empty());
}

// ============================================================================
// Stagger
// ============================================================================

#[test]
fn test_group_of_five_reveals_150ms_apart() {
    let scheduler = ManualScheduler::shared();
    let log: Rc<RefCell<Vec<(usize, Duration)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut trigger = VisibilityTrigger::new(
        TriggerConfig::default().with_stagger(ms(150)),
        scheduler.clone(),
        move |target: &WatchableTarget, ctx: &RevealContext| {
            target.effect().apply(target.surface());
            sink.borrow_mut().push((ctx.index(), ctx.now()));
        },
    );

    let surfaces: Vec<_> = (0..5)
        .map(|i| RecordingSurface::shared(format!("cert-{i}")))
        .collect();
    let targets: Vec<_> = surfaces
        .iter()
        .map(|s| WatchableTarget::new(s.clone()).with_effect(RevealEffect::class("animated")))
        .collect();
    let entries: Vec<_> = targets
        .iter()
        .map(|t| IntersectionEntry::new(t.id(), 0.8))
        .collect();
    trigger.register(targets.into_iter().map(Some));

    scheduler.advance(ms(250));
    trigger.observe(&entries);
    scheduler.advance(ms(1000));

    let expected: Vec<_> = (0..5u64).map(|i| (i as usize, ms(250 + i * 150))).collect();
    assert_eq!(*log.borrow(), expected);
    assert!(surfaces.iter().all(|s| s.class_count("animated") == 1));
}

// ============================================================================
// Counter
// ============================================================================

#[test]
fn test_counter_shows_120_plus_after_two_seconds() {
    let scheduler = ManualScheduler::shared();
    let stat = RecordingSurface::shared("stat");
    let target = WatchableTarget::new(stat.clone());
    let id = target.id();
    let value = reveal_core::parse_count("120").expect("numeric count");
    let action = CountUp::new(CounterConfig::default()).with_value(id, value);
    let mut trigger =
        VisibilityTrigger::new(TriggerConfig::new(0.5).expect("valid"), scheduler.clone(), action);
    trigger.register([Some(target)]);
    trigger.observe(&[IntersectionEntry::new(id, 0.5)]);

    scheduler.advance(ms(2000));
    assert_eq!(stat.text().as_deref(), Some("120+"));

    let texts = stat.texts();
    assert_eq!(texts.len(), 125);
    assert!(texts.iter().all(|t| t.ends_with('+')));

    // Scrolling back does not restart the count.
    trigger.observe(&[IntersectionEntry::new(id, 1.0)]);
    scheduler.advance(ms(5000));
    assert_eq!(stat.texts().len(), 125);
}

#[test]
fn test_small_counter_has_no_suffix() {
    let scheduler = ManualScheduler::shared();
    let stat = RecordingSurface::shared("stat");
    let target = WatchableTarget::new(stat.clone());
    let id = target.id();
    let action = CountUp::new(CounterConfig::default()).with_value(id, 8);
    let mut trigger = VisibilityTrigger::new(TriggerConfig::default(), scheduler.clone(), action);
    trigger.register([Some(target)]);
    trigger.observe(&[IntersectionEntry::new(id, 1.0)]);
    scheduler.advance(ms(3000));
    assert_eq!(stat.text().as_deref(), Some("8"));
}

// ============================================================================
// Typing
// ============================================================================

#[test]
fn test_typing_effect_cycles_through_phrases() {
    let scheduler = ManualScheduler::shared();
    let surface = RecordingSurface::shared("typing");
    let effect = TypingEffect::new(&["ab", "c"], surface.clone(), TypingConfig::default())
        .expect("non-empty phrases");
    let animator = effect.start(scheduler.clone());

    scheduler.advance(ms(999));
    assert!(surface.is_untouched());

    // 1000: "a", 1150: "ab", 3150: "a", 3250: "", 3750: "c"
    scheduler.advance(ms(1));
    assert_eq!(surface.text().as_deref(), Some("a"));
    scheduler.advance(ms(150));
    assert_eq!(surface.text().as_deref(), Some("ab"));
    scheduler.advance(ms(2000));
    assert_eq!(surface.text().as_deref(), Some("a"));
    scheduler.advance(ms(100));
    assert_eq!(surface.text().as_deref(), Some(""));
    scheduler.advance(ms(500));
    assert_eq!(surface.text().as_deref(), Some("c"));
    assert_eq!(animator.state(), AnimationState::Animating);

    animator.pause();
    let written = surface.texts().len();
    scheduler.advance(ms(10_000));
    assert_eq!(surface.texts().len(), written);

    animator.cancel();
    assert_eq!(animator.state(), AnimationState::Done);
    assert_eq!(scheduler.now(), ms(13_750));
}
