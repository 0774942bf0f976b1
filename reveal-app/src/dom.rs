//! DOM-backed surfaces and node tree.

use std::rc::Rc;

use reveal_core::{NodeTree, Surface, SurfaceHandle};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

/// [`Surface`] over an `HtmlElement`.
#[derive(Debug, Clone)]
pub struct DomSurface {
    element: HtmlElement,
}

impl DomSurface {
    /// Wrap an element.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl Surface for DomSurface {
    fn add_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().add_1(class) {
            tracing::warn!("Failed to add class '{}': {:?}", class, e);
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.element.style().set_property(property, value) {
            tracing::warn!("Failed to set {}: {:?}", property, e);
        }
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

/// [`NodeTree`] over a live document.
#[derive(Debug, Clone)]
pub struct DomTree {
    document: Document,
}

impl DomTree {
    /// Query `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// First element matching `selector`.
    #[must_use]
    pub fn query_first(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Invalid selector '{}': {:?}", selector, e);
                None
            }
        }
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl NodeTree for DomTree {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(e) => {
                tracing::warn!("Invalid selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn query_within(&self, node: &Element, selector: &str) -> Vec<Element> {
        match node.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(e) => {
                tracing::warn!("Invalid selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn surface(&self, node: &Element) -> Option<SurfaceHandle> {
        let element = node.clone().dyn_into::<HtmlElement>().ok()?;
        Some(Rc::new(DomSurface::new(element)))
    }
}
