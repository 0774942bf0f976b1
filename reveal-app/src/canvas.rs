//! `CanvasRenderingContext2d` as a [`RasterSurface`], and radar mounting.

use std::rc::Rc;

use reveal_core::{
    MountedTrigger, NodeTree, RadarPreset, SchedulerHandle, VisibilityTrigger, WatchableTarget,
};
use reveal_renderer::{
    RadarChart, RadarReveal, RasterHandle, RasterSurface, RenderError, RenderResult, TextAlign,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use crate::dom::DomTree;
use crate::error::{AppError, AppResult};

fn surface_error(e: &JsValue) -> RenderError {
    RenderError::Surface(format!("{e:?}"))
}

/// Raster surface drawing into a canvas 2D context.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context is unavailable.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> AppResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| AppError::js(&e))?
            .ok_or(AppError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::NoContext)?;
        Ok(Self { ctx })
    }
}

impl RasterSurface for CanvasSurface {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn set_stroke_style(&self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }

    fn set_fill_style(&self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_line_width(&self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_font(&self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn begin_path(&self) {
        self.ctx.begin_path();
    }

    fn move_to(&self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> RenderResult<()> {
        self.ctx
            .arc(x, y, radius, start, end)
            .map_err(|e| surface_error(&e))
    }

    fn close_path(&self) {
        self.ctx.close_path();
    }

    fn fill(&self) {
        self.ctx.fill();
    }

    fn stroke(&self) {
        self.ctx.stroke();
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> RenderResult<()> {
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| surface_error(&e))
    }
}

/// Bind the radar chart to its section and canvas.
///
/// Returns `Ok(None)` when either element is missing from the page.
///
/// # Errors
///
/// Returns an error if the canvas selector matches a non-canvas, the
/// context is unavailable, or the chart data is invalid.
pub fn mount_radar(
    preset: &RadarPreset,
    tree: &DomTree,
    scheduler: &SchedulerHandle,
) -> AppResult<Option<MountedTrigger<Element>>> {
    let (Some(section), Some(canvas)) = (
        tree.query_first(&preset.section_selector),
        tree.query_first(&preset.canvas_selector),
    ) else {
        tracing::debug!("Radar section or canvas missing, not mounted");
        return Ok(None);
    };
    let Some(section_surface) = tree.surface(&section) else {
        return Ok(None);
    };
    let canvas = canvas
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| AppError::NotACanvas(preset.canvas_selector.clone()))?;

    let raster: RasterHandle = Rc::new(CanvasSurface::from_canvas(&canvas)?);
    let chart = RadarChart::from_preset(preset)?;
    let action = RadarReveal::new(chart, raster, preset.frames);
    let trigger = VisibilityTrigger::new(preset.trigger.clone(), scheduler.clone(), action);

    let mut mounted = MountedTrigger::new("radar", trigger);
    mounted.bind(section, WatchableTarget::new(section_surface));
    Ok(Some(mounted))
}
