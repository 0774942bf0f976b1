//! Recording surface for hosts without a real canvas.
//!
//! Every primitive is appended to a command log and traced, so native
//! hosts can inspect or dump what a browser canvas would have drawn.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderResult};

use super::{RasterSurface, TextAlign};

/// A single recorded drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[allow(missing_docs)] // Fields mirror the RasterSurface parameters
pub enum DrawCommand {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeStyle { style: String },
    FillStyle { style: String },
    LineWidth { width: f64 },
    Font { font: String },
    TextAlign { align: TextAlign },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    ClosePath,
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records commands instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRaster {
    commands: RefCell<Vec<DrawCommand>>,
}

impl RecordingRaster {
    /// Create an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: DrawCommand) {
        tracing::trace!("Raster {:?}", command);
        self.commands.borrow_mut().push(command);
    }

    /// Every command recorded so far.
    #[must_use]
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    /// Commands grouped into frames, each starting at a `ClearRect`.
    #[must_use]
    pub fn frames(&self) -> Vec<Vec<DrawCommand>> {
        let mut frames: Vec<Vec<DrawCommand>> = Vec::new();
        for command in self.commands.borrow().iter() {
            if matches!(command, DrawCommand::ClearRect { .. }) || frames.is_empty() {
                frames.push(Vec::new());
            }
            if let Some(frame) = frames.last_mut() {
                frame.push(command.clone());
            }
        }
        frames
    }

    /// Number of frames drawn.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }

    /// Drop the recorded commands.
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Serialize the command log as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string(&*self.commands.borrow())?)
    }
}

impl RasterSurface for RecordingRaster {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_stroke_style(&self, style: &str) {
        self.push(DrawCommand::StrokeStyle {
            style: style.to_string(),
        });
    }

    fn set_fill_style(&self, style: &str) {
        self.push(DrawCommand::FillStyle {
            style: style.to_string(),
        });
    }

    fn set_line_width(&self, width: f64) {
        self.push(DrawCommand::LineWidth { width });
    }

    fn set_font(&self, font: &str) {
        self.push(DrawCommand::Font {
            font: font.to_string(),
        });
    }

    fn set_text_align(&self, align: TextAlign) {
        self.push(DrawCommand::TextAlign { align });
    }

    fn begin_path(&self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> RenderResult<()> {
        if radius < 0.0 {
            return Err(RenderError::Surface(format!(
                "negative arc radius {radius}"
            )));
        }
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
        Ok(())
    }

    fn close_path(&self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> RenderResult<()> {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }
}
