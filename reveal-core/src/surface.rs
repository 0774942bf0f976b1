//! Presentation surfaces that reveal actions write to.
//!
//! A [`Surface`] is the only capability a reveal action has over a page
//! element: it can add classes, set inline style properties and replace
//! the text content. Hosts implement it over real DOM nodes; tests use
//! [`RecordingSurface`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to a surface.
pub type SurfaceHandle = Rc<dyn Surface>;

/// Mutable presentation state of a single visual element.
pub trait Surface {
    /// Add a class to the element's class list.
    fn add_class(&self, class: &str);

    /// Set an inline style property (CSS property name, e.g. `animation-delay`).
    fn set_style(&self, property: &str, value: &str);

    /// Replace the element's text content.
    fn set_text(&self, text: &str);
}

/// A single mutation recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    /// `add_class` was called.
    AddClass(String),
    /// `set_style` was called.
    SetStyle {
        /// Property name.
        property: String,
        /// Property value.
        value: String,
    },
    /// `set_text` was called.
    SetText(String),
}

/// In-memory surface that records every mutation.
///
/// Used by native hosts and tests in place of a DOM element.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    name: String,
    ops: RefCell<Vec<SurfaceOp>>,
}

impl RecordingSurface {
    /// Create a recording surface with a debug name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: RefCell::new(Vec::new()),
        }
    }

    /// Create a shared recording surface.
    #[must_use]
    pub fn shared(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self::new(name))
    }

    /// Debug name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All recorded operations, oldest first.
    #[must_use]
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    /// Whether `class` has been added.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.ops
            .borrow()
            .iter()
            .any(|op| matches!(op, SurfaceOp::AddClass(c) if c == class))
    }

    /// Number of times `class` has been added.
    #[must_use]
    pub fn class_count(&self, class: &str) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::AddClass(c) if c == class))
            .count()
    }

    /// Current value of an inline style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.styles().remove(property)
    }

    /// Final inline style map.
    #[must_use]
    pub fn styles(&self) -> BTreeMap<String, String> {
        let mut styles = BTreeMap::new();
        for op in self.ops.borrow().iter() {
            if let SurfaceOp::SetStyle { property, value } = op {
                styles.insert(property.clone(), value.clone());
            }
        }
        styles
    }

    /// Current text content, if any was written.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.texts().pop()
    }

    /// Every text value written, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::SetText(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.ops.borrow().is_empty()
    }
}

impl Surface for RecordingSurface {
    fn add_class(&self, class: &str) {
        self.ops
            .borrow_mut()
            .push(SurfaceOp::AddClass(class.to_string()));
    }

    fn set_style(&self, property: &str, value: &str) {
        self.ops.borrow_mut().push(SurfaceOp::SetStyle {
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    fn set_text(&self, text: &str) {
        self.ops.borrow_mut().push(SurfaceOp::SetText(text.to_string()));
    }
}
