//! Mounting a [`PageConfig`] onto a host's node tree.
//!
//! The host supplies a [`NodeTree`] (the DOM in the browser, a fake tree in
//! tests). Mounting queries each preset's selectors, prepares the matched
//! nodes, builds the reveal action for the preset kind, and hands back one
//! [`MountedTrigger`] per preset for the host to feed intersection entries
//! into. Nodes that are missing or unusable are skipped.

use std::time::Duration;

use crate::action::{ApplyEffect, Cascade, CountUp, FollowUp};
use crate::animation::Animator;
use crate::config::{AttributeStyle, PageConfig, RevealKind, TriggerPreset, TypingPreset};
use crate::counter::parse_count;
use crate::geometry::IntersectionEntry;
use crate::scheduler::SchedulerHandle;
use crate::surface::SurfaceHandle;
use crate::target::{RevealEffect, TargetId, WatchableTarget};
use crate::trigger::{RevealAction, VisibilityTrigger};
use crate::typing::TypingEffect;

/// Read access to the host's element tree.
pub trait NodeTree {
    /// Host node handle.
    type Node: Clone + PartialEq;

    /// All nodes matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Descendants of `node` matching `selector`, in document order.
    fn query_within(&self, node: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// Attribute value, if present.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Presentation surface for `node`, or `None` if it cannot be styled.
    fn surface(&self, node: &Self::Node) -> Option<SurfaceHandle>;
}

/// A visibility trigger bound to host nodes.
pub struct MountedTrigger<N> {
    name: String,
    trigger: VisibilityTrigger,
    nodes: Vec<(N, TargetId)>,
}

impl<N: Clone + PartialEq> MountedTrigger<N> {
    /// Wrap a trigger with no nodes bound yet.
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: VisibilityTrigger) -> Self {
        Self {
            name: name.into(),
            trigger,
            nodes: Vec::new(),
        }
    }

    /// Register `target` for `node`.
    pub fn bind(&mut self, node: N, target: WatchableTarget) {
        let id = target.id();
        self.trigger.register([Some(target)]);
        if self.trigger.is_observing(id) {
            self.nodes.push((node, id));
        }
    }

    /// Preset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying trigger.
    #[must_use]
    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }

    /// Bound nodes, in registration order.
    #[must_use]
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().map(|(node, _)| node)
    }

    /// Target registered for `node`.
    #[must_use]
    pub fn target_of(&self, node: &N) -> Option<TargetId> {
        self.nodes.iter().find(|(n, _)| n == node).map(|(_, id)| *id)
    }

    /// Run one pass over host observations `(node, ratio, is_intersecting)`.
    ///
    /// Returns the nodes revealed by this pass; hosts stop observing them.
    /// Observations for unknown nodes are ignored.
    pub fn observe_nodes(&mut self, observations: &[(N, f64, bool)]) -> Vec<N> {
        let entries: Vec<IntersectionEntry> = observations
            .iter()
            .filter_map(|(node, ratio, is_intersecting)| {
                let target = self.target_of(node)?;
                let mut entry = IntersectionEntry::new(target, *ratio);
                entry.is_intersecting = *is_intersecting;
                Some(entry)
            })
            .collect();
        if entries.is_empty() {
            return Vec::new();
        }
        let revealed = self.trigger.observe(&entries);
        if !revealed.is_empty() {
            tracing::debug!("'{}' revealed {} target(s)", self.name, revealed.len());
        }
        revealed
            .iter()
            .filter_map(|id| self.nodes.iter().find(|(_, t)| t == id))
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// Reveal every node still waiting, as if all were fully visible.
    ///
    /// Hosts that cannot observe visibility use this so prepared nodes
    /// are not left hidden.
    pub fn reveal_all(&mut self) -> Vec<N> {
        let observations: Vec<(N, f64, bool)> = self
            .nodes
            .iter()
            .map(|(node, _)| (node.clone(), 1.0, true))
            .collect();
        self.observe_nodes(&observations)
    }
}

impl<N> std::fmt::Debug for MountedTrigger<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedTrigger")
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .field("trigger", &self.trigger)
            .finish()
    }
}

/// Everything a page mount produced.
pub struct MountedPage<N> {
    /// One trigger per preset that matched at least one node.
    pub triggers: Vec<MountedTrigger<N>>,
    /// Running typing effect, if mounted.
    pub typing: Option<Animator>,
}

impl<N> MountedPage<N> {
    /// Targets revealed across all triggers.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.triggers
            .iter()
            .map(|m| m.trigger.revealed_count())
            .sum()
    }

    /// Targets still observed across all triggers.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.triggers
            .iter()
            .map(|m| m.trigger.observed_count())
            .sum()
    }
}

impl<N> std::fmt::Debug for MountedPage<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedPage")
            .field("triggers", &self.triggers)
            .field("typing", &self.typing)
            .finish()
    }
}

/// Mount every preset, attribute style and the typing effect of `config`.
///
/// The radar chart needs a raster surface and is mounted by the host.
#[must_use]
pub fn mount_page<T: NodeTree>(
    config: &PageConfig,
    tree: &T,
    scheduler: &SchedulerHandle,
) -> MountedPage<T::Node> {
    for style in &config.attribute_styles {
        let applied = apply_attribute_style(style, tree);
        tracing::debug!("{} set on {} node(s)", style.property, applied);
    }

    let triggers = config
        .triggers
        .iter()
        .filter_map(|preset| mount_preset(preset, tree, scheduler))
        .collect();

    let typing = config
        .typing
        .as_ref()
        .and_then(|preset| mount_typing(preset, tree, scheduler));

    MountedPage { triggers, typing }
}

/// Copy an attribute into an inline style on every matching node.
#[must_use]
pub fn apply_attribute_style<T: NodeTree>(style: &AttributeStyle, tree: &T) -> usize {
    let mut applied = 0;
    for node in tree.query_all(&style.selector) {
        let value = tree.attribute(&node, &style.attribute);
        let (Some(value), Some(surface)) = (value, tree.surface(&node)) else {
            continue;
        };
        surface.set_style(&style.property, &format!("{value}{}", style.suffix));
        applied += 1;
    }
    applied
}

/// Mount one preset. Returns `None` when nothing on the page matches.
#[must_use]
pub fn mount_preset<T: NodeTree>(
    preset: &TriggerPreset,
    tree: &T,
    scheduler: &SchedulerHandle,
) -> Option<MountedTrigger<T::Node>> {
    let mut targets = Vec::new();
    for (index, node) in tree.query_all(&preset.selector()).into_iter().enumerate() {
        let Some(surface) = tree.surface(&node) else {
            tracing::debug!("'{}' match {} has no surface", preset.name, index);
            continue;
        };
        preset.prepare.apply(surface.as_ref());
        let mut target = WatchableTarget::new(surface).with_effect(preset.effect.clone());
        if preset.index_stagger {
            target = target.with_stagger_index(index);
        }
        targets.push((node, target));
    }

    let mounted = match &preset.kind {
        RevealKind::Effect => bind_all(preset, scheduler, ApplyEffect, targets),
        RevealKind::Cascade {
            child_selector,
            child_effect,
            interval,
        } => {
            let mut cascade = Cascade::new(child_effect.clone(), *interval);
            for (node, target) in &targets {
                let children = tree
                    .query_within(node, child_selector)
                    .iter()
                    .filter_map(|child| tree.surface(child))
                    .collect();
                cascade.add_children(target.id(), children);
            }
            bind_all(preset, scheduler, cascade, targets)
        }
        RevealKind::FollowUp {
            child_selector,
            follow_effect,
            delay,
        } => {
            let follow_up = follow_up_for(tree, &targets, child_selector, follow_effect, *delay);
            bind_all(preset, scheduler, follow_up, targets)
        }
        RevealKind::Counter { attribute, timing } => {
            let mut count_up = CountUp::new(*timing);
            targets.retain(|(node, target)| {
                match tree.attribute(node, attribute).map(|raw| parse_count(&raw)) {
                    Some(Ok(value)) => {
                        count_up.set_value(target.id(), value);
                        true
                    }
                    Some(Err(e)) => {
                        tracing::debug!("'{}' skipping counter: {}", preset.name, e);
                        false
                    }
                    None => {
                        tracing::debug!("'{}' counter without {}", preset.name, attribute);
                        false
                    }
                }
            });
            bind_all(preset, scheduler, count_up, targets)
        }
    };

    if mounted.nodes.is_empty() {
        tracing::debug!("'{}' matched nothing, not mounted", preset.name);
        return None;
    }
    Some(mounted)
}

fn follow_up_for<T: NodeTree>(
    tree: &T,
    targets: &[(T::Node, WatchableTarget)],
    child_selector: &str,
    effect: &RevealEffect,
    delay: Duration,
) -> FollowUp<ApplyEffect> {
    let mut follow_up = FollowUp::new(ApplyEffect, effect.clone(), delay);
    for (node, target) in targets {
        let child = tree
            .query_within(node, child_selector)
            .first()
            .and_then(|child| tree.surface(child));
        if let Some(surface) = child {
            follow_up.add_surface(target.id(), surface);
        }
    }
    follow_up
}

fn bind_all<N: Clone + PartialEq>(
    preset: &TriggerPreset,
    scheduler: &SchedulerHandle,
    action: impl RevealAction + 'static,
    targets: Vec<(N, WatchableTarget)>,
) -> MountedTrigger<N> {
    let trigger = VisibilityTrigger::new(preset.trigger.clone(), scheduler.clone(), action);
    let mut mounted = MountedTrigger::new(preset.name.clone(), trigger);
    for (node, target) in targets {
        mounted.bind(node, target);
    }
    mounted
}

/// Start the typing effect on the first node matching the preset.
#[must_use]
pub fn mount_typing<T: NodeTree>(
    preset: &TypingPreset,
    tree: &T,
    scheduler: &SchedulerHandle,
) -> Option<Animator> {
    let Some(surface) = tree
        .query_all(&preset.selector)
        .first()
        .and_then(|node| tree.surface(node))
    else {
        tracing::debug!("No typing element for '{}'", preset.selector);
        return None;
    };
    let effect = TypingEffect::new(&preset.phrases, surface, preset.timing)?;
    Some(effect.start(scheduler.clone()))
}
