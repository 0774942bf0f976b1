//! Browser timers as a [`Scheduler`].
//!
//! `defer` maps to `setTimeout`, `next_frame` to `requestAnimationFrame`.
//! Each task is handed to the browser as a one-shot closure that frees
//! itself after running.

use std::time::Duration;

use reveal_core::{Scheduler, Task};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

use crate::error::{AppError, AppResult};

/// Scheduler backed by the page's event loop.
#[derive(Debug, Clone)]
pub struct BrowserScheduler {
    window: Window,
    performance: Option<Performance>,
}

impl BrowserScheduler {
    /// Bind to the global window.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browser context.
    pub fn new() -> AppResult<Self> {
        let window = web_sys::window().ok_or(AppError::MissingGlobal("window"))?;
        let performance = window.performance();
        Ok(Self {
            window,
            performance,
        })
    }
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> Duration {
        let millis = self.performance.as_ref().map_or(0.0, Performance::now);
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }

    fn defer(&self, delay: Duration, task: Task) {
        let callback = Closure::once_into_js(task);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )
        {
            tracing::warn!("setTimeout failed: {:?}", e);
        }
    }

    fn next_frame(&self, task: Task) {
        let callback = Closure::once_into_js(task);
        if let Err(e) = self.window.request_animation_frame(callback.unchecked_ref()) {
            tracing::warn!("requestAnimationFrame failed: {:?}", e);
        }
    }
}
