//! Host error types.

use reveal_core::RevealError;
use reveal_renderer::RenderError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type for host operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while binding the engine to the browser.
#[derive(Debug, Error)]
pub enum AppError {
    /// A browser global is unavailable.
    #[error("No {0} object")]
    MissingGlobal(&'static str),

    /// The radar selector matched something other than a canvas.
    #[error("Element '{0}' is not a canvas")]
    NotACanvas(String),

    /// The canvas has no 2D context.
    #[error("2D context not available")]
    NoContext,

    /// A browser API call threw.
    #[error("Browser call failed: {0}")]
    Js(String),

    /// Page configuration was rejected.
    #[error(transparent)]
    Config(#[from] RevealError),

    /// Chart data was rejected.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    /// Wrap a thrown JS value.
    pub(crate) fn js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
