//! `IntersectionObserver` bridge.
//!
//! One observer per mounted trigger, configured with the trigger's
//! threshold and root margin. Browser entries are matched back to targets
//! by element identity; revealed one-shot targets are unobserved.

use std::cell::RefCell;
use std::rc::Rc;

use reveal_core::{MountedTrigger, TriggerMode};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::{AppError, AppResult};

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// A mounted trigger wired to a live `IntersectionObserver`.
pub struct ObservedTrigger {
    observer: IntersectionObserver,
    mounted: Rc<RefCell<MountedTrigger<Element>>>,
    /// Must outlive the observer.
    _callback: ObserverCallback,
}

impl ObservedTrigger {
    /// Create the observer and start observing every bound node.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser rejects the observer options. Every
    /// bound node is revealed before the error is returned.
    pub fn attach(mounted: MountedTrigger<Element>) -> AppResult<Self> {
        let config = mounted.trigger().config().clone();
        let once = config.mode == TriggerMode::Once;
        let mounted = Rc::new(RefCell::new(mounted));

        let state = Rc::clone(&mounted);
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let observations: Vec<(Element, f64, bool)> = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        (
                            entry.target(),
                            entry.intersection_ratio(),
                            entry.is_intersecting(),
                        )
                    })
                    .collect();
                let revealed = state.borrow_mut().observe_nodes(&observations);
                if once {
                    for element in &revealed {
                        observer.unobserve(element);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold));
        init.set_root_margin(&config.root_margin.to_string());
        let observer =
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            {
                Ok(observer) => observer,
                Err(e) => {
                    let revealed = mounted.borrow_mut().reveal_all();
                    tracing::warn!(
                        "'{}' has no observer, revealed {} node(s) at once",
                        mounted.borrow().name(),
                        revealed.len()
                    );
                    return Err(AppError::js(&e));
                }
            };

        for element in mounted.borrow().nodes() {
            observer.observe(element);
        }
        tracing::debug!(
            "Observing {} node(s) for '{}' at {} / {}",
            mounted.borrow().nodes().count(),
            mounted.borrow().name(),
            config.threshold,
            config.root_margin
        );

        Ok(Self {
            observer,
            mounted,
            _callback: callback,
        })
    }

    /// Targets revealed so far.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.mounted.borrow().trigger().revealed_count()
    }

    /// Targets still waiting to be revealed.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.mounted.borrow().trigger().observed_count()
    }
}

impl Drop for ObservedTrigger {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl std::fmt::Debug for ObservedTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedTrigger")
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
