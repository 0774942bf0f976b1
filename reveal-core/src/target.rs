//! Watchable targets - the surfaces a trigger observes.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::surface::{Surface, SurfaceHandle};

/// Unique identifier for a watchable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(Uuid);

impl TargetId {
    /// Create a new unique target ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual side effect applied to a surface when it is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RevealEffect {
    /// Add a class (e.g. `animated`).
    AddClass(String),
    /// Set the `animation` shorthand (e.g. `fadeInUp 0.6s ease-out`).
    Animation(String),
    /// Set an arbitrary inline style property.
    Style {
        /// CSS property name.
        property: String,
        /// CSS value.
        value: String,
    },
    /// Apply several effects in order.
    Batch(Vec<RevealEffect>),
    /// No visual change (the action does the work).
    #[default]
    None,
}

impl RevealEffect {
    /// Shorthand for [`RevealEffect::AddClass`].
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::AddClass(name.into())
    }

    /// Shorthand for [`RevealEffect::Animation`].
    #[must_use]
    pub fn animation(value: impl Into<String>) -> Self {
        Self::Animation(value.into())
    }

    /// Shorthand for [`RevealEffect::Style`].
    #[must_use]
    pub fn style(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Style {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Write this effect to a surface.
    pub fn apply(&self, surface: &dyn Surface) {
        match self {
            Self::AddClass(class) => surface.add_class(class),
            Self::Animation(value) => surface.set_style("animation", value),
            Self::Style { property, value } => surface.set_style(property, value),
            Self::Batch(effects) => {
                for effect in effects {
                    effect.apply(surface);
                }
            }
            Self::None => {}
        }
    }
}

/// A visual surface registered with a visibility trigger.
#[derive(Clone)]
pub struct WatchableTarget {
    id: TargetId,
    surface: SurfaceHandle,
    effect: RevealEffect,
    stagger_index: Option<usize>,
    revealed: bool,
}

impl WatchableTarget {
    /// Create an unrevealed target over `surface` with no effect.
    #[must_use]
    pub fn new(surface: SurfaceHandle) -> Self {
        Self {
            id: TargetId::new(),
            surface,
            effect: RevealEffect::None,
            stagger_index: None,
            revealed: false,
        }
    }

    /// Set the reveal effect.
    #[must_use]
    pub fn with_effect(mut self, effect: RevealEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Set an explicit ordinal within a sibling group.
    #[must_use]
    pub fn with_stagger_index(mut self, index: usize) -> Self {
        self.stagger_index = Some(index);
        self
    }

    /// Override the generated ID.
    #[must_use]
    pub fn with_id(mut self, id: TargetId) -> Self {
        self.id = id;
        self
    }

    /// Target identity.
    #[must_use]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// The surface this target writes to.
    #[must_use]
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Shared handle to the surface, for actions that outlive the call.
    #[must_use]
    pub fn surface_handle(&self) -> SurfaceHandle {
        Rc::clone(&self.surface)
    }

    /// Effect descriptor.
    #[must_use]
    pub fn effect(&self) -> &RevealEffect {
        &self.effect
    }

    /// Explicit stagger ordinal, if one was given.
    #[must_use]
    pub fn stagger_index(&self) -> Option<usize> {
        self.stagger_index
    }

    /// Whether the target has been revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Flip the revealed flag. Monotonic: there is no way back.
    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }
}

impl std::fmt::Debug for WatchableTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchableTarget")
            .field("id", &self.id)
            .field("effect", &self.effect)
            .field("stagger_index", &self.stagger_index)
            .field("revealed", &self.revealed)
            .finish_non_exhaustive()
    }
}
