//! Raster surface implementations.

pub mod recording;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::RenderResult;

/// Shared handle to a raster surface.
pub type RasterHandle = Rc<dyn RasterSurface>;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at the start of the text.
    #[default]
    Start,
    /// Anchor at the centre.
    Center,
    /// Anchor at the end.
    End,
}

impl TextAlign {
    /// CSS keyword for the alignment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// Immediate-mode 2D drawing primitives, modelled on `CanvasRenderingContext2d`.
pub trait RasterSurface {
    /// Clear a rectangle to transparent.
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);

    /// Set the stroke colour.
    fn set_stroke_style(&self, style: &str);

    /// Set the fill colour.
    fn set_fill_style(&self, style: &str);

    /// Set the stroke width in px.
    fn set_line_width(&self, width: f64);

    /// Set the CSS font shorthand.
    fn set_font(&self, font: &str);

    /// Set the text alignment.
    fn set_text_align(&self, align: TextAlign);

    /// Start a new path.
    fn begin_path(&self);

    /// Move the pen without drawing.
    fn move_to(&self, x: f64, y: f64);

    /// Add a line to the current path.
    fn line_to(&self, x: f64, y: f64);

    /// Add a circular arc to the current path.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects the arc (negative radius).
    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> RenderResult<()>;

    /// Close the current sub-path.
    fn close_path(&self);

    /// Fill the current path.
    fn fill(&self);

    /// Stroke the current path.
    fn stroke(&self);

    /// Draw filled text.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot draw text.
    fn fill_text(&self, text: &str, x: f64, y: f64) -> RenderResult<()>;
}
