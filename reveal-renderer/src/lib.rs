//! # Folio Reveal Renderer
//!
//! Immediate-mode 2D drawing for reveal effects that paint rather than
//! toggle classes.
//!
//! ## Surfaces
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RasterSurface trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ CanvasRenderingCtx2d │ RecordingRaster      │
//! │ (browser, app crate) │ (native, tests)      │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! The [`radar`] module builds on this to grow a skills radar chart over a
//! fixed number of animation frames once its section scrolls into view.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod easing;
pub mod error;
pub mod radar;

pub use backend::recording::{DrawCommand, RecordingRaster};
pub use backend::{RasterHandle, RasterSurface, TextAlign};
pub use easing::{ease_out_cubic, frame_progress};
pub use error::{RenderError, RenderResult};
pub use radar::{RadarAnimation, RadarChart, RadarReveal, Skill};
