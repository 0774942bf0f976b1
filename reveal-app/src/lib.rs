//! # Folio Reveal WASM Application
//!
//! This crate binds the reveal engine to the browser: DOM elements become
//! surfaces, `IntersectionObserver` feeds the visibility triggers, and
//! `setTimeout`/`requestAnimationFrame` drive every animation.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web reveal-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { RevealApp } from './pkg/reveal_app.js';
//!
//! await init();
//! const app = new RevealApp();          // or new RevealApp(configJson)
//! document.addEventListener('DOMContentLoaded', () => app.mount());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod dom;
pub mod error;
pub mod observer;
pub mod scheduler;

use std::rc::Rc;

use reveal_core::{mount_page, Animator, PageConfig, SchedulerHandle};
use wasm_bindgen::prelude::*;

pub use canvas::{mount_radar, CanvasSurface};
pub use dom::{DomSurface, DomTree};
pub use error::{AppError, AppResult};
pub use observer::ObservedTrigger;
pub use scheduler::BrowserScheduler;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Folio Reveal WASM initialized");
}

/// The page's reveal engine.
#[wasm_bindgen]
pub struct RevealApp {
    config: PageConfig,
    observers: Vec<ObservedTrigger>,
    typing: Option<Animator>,
    mounted: bool,
}

#[wasm_bindgen]
impl RevealApp {
    /// Create the engine from an optional JSON page configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not parse or validate.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<RevealApp, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => PageConfig::from_json(json).map_err(AppError::from)?,
            None => PageConfig::default(),
        };
        Ok(Self {
            config,
            observers: Vec::new(),
            typing: None,
            mounted: false,
        })
    }

    /// Bind every configured preset to the current document.
    ///
    /// Missing elements are skipped. A radar or observer that cannot be set
    /// up is logged and skipped without affecting the other presets.
    /// Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browser, before anything is mounted.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted {
            tracing::warn!("RevealApp already mounted");
            return Ok(());
        }
        self.mount_inner().map_err(JsValue::from)
    }

    /// Targets revealed so far.
    #[wasm_bindgen(js_name = revealedCount)]
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.observers
            .iter()
            .map(ObservedTrigger::revealed_count)
            .sum()
    }

    /// Targets still waiting to be revealed.
    #[wasm_bindgen(js_name = observedCount)]
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observers
            .iter()
            .map(ObservedTrigger::observed_count)
            .sum()
    }

    /// Whether the typing effect is running.
    #[wasm_bindgen(js_name = isTyping)]
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing.as_ref().is_some_and(|a| !a.is_done())
    }

    /// Active configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.config
            .to_json()
            .map_err(|e| JsValue::from(AppError::from(e)))
    }
}

impl RevealApp {
    fn mount_inner(&mut self) -> AppResult<()> {
        let window = web_sys::window().ok_or(AppError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(AppError::MissingGlobal("document"))?;
        let tree = DomTree::new(document);
        let scheduler: SchedulerHandle = Rc::new(BrowserScheduler::new()?);

        let page = mount_page(&self.config, &tree, &scheduler);
        self.typing = page.typing;
        self.mounted = true;

        let mut triggers = page.triggers;
        if let Some(radar) = &self.config.radar {
            match mount_radar(radar, &tree, &scheduler) {
                Ok(Some(mounted)) => triggers.push(mounted),
                Ok(None) => {}
                Err(e) => tracing::warn!("Radar not mounted: {}", e),
            }
        }

        for mounted in triggers {
            let name = mounted.name().to_string();
            match ObservedTrigger::attach(mounted) {
                Ok(observer) => self.observers.push(observer),
                Err(e) => tracing::warn!("'{}' not observed: {}", name, e),
            }
        }

        tracing::info!(
            "Mounted {} trigger(s) observing {} target(s)",
            self.observers.len(),
            self.observed_count()
        );
        Ok(())
    }
}

/// The built-in page configuration as JSON, for hosts that want to tweak it.
///
/// # Errors
///
/// Returns an error if serialization fails.
#[wasm_bindgen(js_name = defaultConfigJson)]
pub fn default_config_json() -> Result<String, JsValue> {
    PageConfig::default()
        .to_json()
        .map_err(|e| JsValue::from(AppError::from(e)))
}
