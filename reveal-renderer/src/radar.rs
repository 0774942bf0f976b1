//! Animated skills radar chart.
//!
//! The chart grows from its centre to full extent over a fixed number of
//! frames, redrawing everything each frame:
//!
//! ```text
//!            Frontend
//!               ●
//!      Database/ \Backend       grid:    5 rings
//!             ●   ●             axes:    centre -> max_radius
//!             │ ◆ │             polygon: value/100 * progress
//!             ●   ●             points:  skill colour, white rim
//!      Design  \ / Mobile       labels:  max_radius + 20
//!               ●
//!             DevOps
//! ```

use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use reveal_core::{
    Animation, Animator, Cadence, RadarPreset, RevealAction, RevealContext, SkillSpec, Step,
    WatchableTarget,
};
use serde::{Deserialize, Serialize};

use crate::backend::{RasterHandle, RasterSurface, TextAlign};
use crate::easing::{ease_out_cubic, frame_progress};
use crate::{RenderError, RenderResult};

const GRID_RINGS: u32 = 5;
const GRID_COLOR: &str = "#e2e8f0";
const POLYGON_FILL: &str = "rgba(102, 126, 234, 0.2)";
const POLYGON_STROKE: &str = "#667eea";
const POINT_RADIUS: f64 = 4.0;
const POINT_RIM: &str = "#ffffff";
const LABEL_COLOR: &str = "#1a202c";
const LABEL_FONT: &str = "12px Inter, sans-serif";
const LABEL_OFFSET: f64 = 20.0;

/// One axis of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Axis label.
    pub name: String,
    /// Score, `0..=100`.
    pub value: f64,
    /// Marker colour.
    pub color: String,
}

impl From<&SkillSpec> for Skill {
    fn from(spec: &SkillSpec) -> Self {
        Self {
            name: spec.name.clone(),
            value: spec.value,
            color: spec.color.clone(),
        }
    }
}

/// Radar chart geometry and data.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarChart {
    center: (f64, f64),
    max_radius: f64,
    size: f64,
    skills: Vec<Skill>,
}

impl RadarChart {
    /// Create a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no skills, a value lies outside
    /// `0..=100`, or the radius is not positive.
    pub fn new(
        center: (f64, f64),
        max_radius: f64,
        size: f64,
        skills: Vec<Skill>,
    ) -> RenderResult<Self> {
        if skills.is_empty() {
            return Err(RenderError::InvalidChart("no skills to plot".to_string()));
        }
        if max_radius <= 0.0 || !max_radius.is_finite() {
            return Err(RenderError::InvalidChart(format!(
                "radius must be positive, got {max_radius}"
            )));
        }
        if let Some(skill) = skills.iter().find(|s| !(0.0..=100.0).contains(&s.value)) {
            return Err(RenderError::InvalidChart(format!(
                "{} has value {} outside 0..=100",
                skill.name, skill.value
            )));
        }
        Ok(Self {
            center,
            max_radius,
            size,
            skills,
        })
    }

    /// Build the chart described by a page preset.
    ///
    /// # Errors
    ///
    /// See [`RadarChart::new`].
    pub fn from_preset(preset: &RadarPreset) -> RenderResult<Self> {
        Self::new(
            preset.center,
            preset.max_radius,
            preset.size,
            preset.skills.iter().map(Skill::from).collect(),
        )
    }

    /// Plotted skills, clockwise from the top.
    #[must_use]
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Radius of the outermost ring.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Angle of axis `index`; axis 0 points straight up.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn axis_angle(&self, index: usize) -> f64 {
        TAU * index as f64 / self.skills.len() as f64 - PI / 2.0
    }

    /// Distance of skill `index` from the centre at `progress`.
    #[must_use]
    pub fn point_radius(&self, index: usize, progress: f64) -> f64 {
        self.skills
            .get(index)
            .map_or(0.0, |s| self.max_radius * s.value / 100.0 * progress)
    }

    /// Position of skill `index` at `progress`.
    #[must_use]
    pub fn point_at(&self, index: usize, progress: f64) -> (f64, f64) {
        self.polar(index, self.point_radius(index, progress))
    }

    /// Anchor of the label for axis `index`.
    #[must_use]
    pub fn label_at(&self, index: usize) -> (f64, f64) {
        self.polar(index, self.max_radius + LABEL_OFFSET)
    }

    fn polar(&self, index: usize, radius: f64) -> (f64, f64) {
        let angle = self.axis_angle(index);
        (
            self.center.0 + angle.cos() * radius,
            self.center.1 + angle.sin() * radius,
        )
    }

    /// Clear the surface and draw one complete frame at eased `progress`.
    ///
    /// # Errors
    ///
    /// Returns the first primitive the surface rejects.
    pub fn draw(&self, surface: &dyn RasterSurface, progress: f64) -> RenderResult<()> {
        surface.clear_rect(0.0, 0.0, self.size, self.size);
        self.draw_grid(surface)?;
        self.draw_axes(surface);
        self.draw_polygon(surface, progress);
        self.draw_points(surface, progress)?;
        self.draw_labels(surface)
    }

    fn draw_grid(&self, surface: &dyn RasterSurface) -> RenderResult<()> {
        surface.set_stroke_style(GRID_COLOR);
        surface.set_line_width(1.0);
        for ring in 1..=GRID_RINGS {
            let radius = self.max_radius / f64::from(GRID_RINGS) * f64::from(ring);
            surface.begin_path();
            surface.arc(self.center.0, self.center.1, radius, 0.0, TAU)?;
            surface.stroke();
        }
        Ok(())
    }

    fn draw_axes(&self, surface: &dyn RasterSurface) {
        surface.set_stroke_style(GRID_COLOR);
        surface.set_line_width(1.0);
        for index in 0..self.skills.len() {
            let (x, y) = self.polar(index, self.max_radius);
            surface.begin_path();
            surface.move_to(self.center.0, self.center.1);
            surface.line_to(x, y);
            surface.stroke();
        }
    }

    fn draw_polygon(&self, surface: &dyn RasterSurface, progress: f64) {
        surface.set_fill_style(POLYGON_FILL);
        surface.set_stroke_style(POLYGON_STROKE);
        surface.set_line_width(2.0);
        surface.begin_path();
        for index in 0..self.skills.len() {
            let (x, y) = self.point_at(index, progress);
            if index == 0 {
                surface.move_to(x, y);
            } else {
                surface.line_to(x, y);
            }
        }
        surface.close_path();
        surface.fill();
        surface.stroke();
    }

    fn draw_points(&self, surface: &dyn RasterSurface, progress: f64) -> RenderResult<()> {
        for (index, skill) in self.skills.iter().enumerate() {
            let (x, y) = self.point_at(index, progress);
            surface.set_fill_style(&skill.color);
            surface.begin_path();
            surface.arc(x, y, POINT_RADIUS, 0.0, TAU)?;
            surface.fill();
            surface.set_stroke_style(POINT_RIM);
            surface.set_line_width(2.0);
            surface.stroke();
        }
        Ok(())
    }

    fn draw_labels(&self, surface: &dyn RasterSurface) -> RenderResult<()> {
        surface.set_fill_style(LABEL_COLOR);
        surface.set_font(LABEL_FONT);
        surface.set_text_align(TextAlign::Center);
        for (index, skill) in self.skills.iter().enumerate() {
            let (x, y) = self.label_at(index);
            surface.fill_text(&skill.name, x, y)?;
        }
        Ok(())
    }
}

/// Frame-stepped growth of a [`RadarChart`].
///
/// Frames `0..=frames` are drawn, one per animation frame, so the chart
/// is drawn `frames + 1` times. Duration follows the display refresh rate.
pub struct RadarAnimation {
    chart: RadarChart,
    surface: RasterHandle,
    frame: u32,
    frames: u32,
}

impl RadarAnimation {
    /// Animate `chart` on `surface` over `frames` frames.
    #[must_use]
    pub fn new(chart: RadarChart, surface: RasterHandle, frames: u32) -> Self {
        Self {
            chart,
            surface,
            frame: 0,
            frames,
        }
    }

    /// Next frame to draw.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Eased progress of the next frame.
    #[must_use]
    pub fn progress(&self) -> f64 {
        ease_out_cubic(frame_progress(self.frame, self.frames))
    }
}

impl Animation for RadarAnimation {
    fn step(&mut self) -> Step {
        let progress = self.progress();
        tracing::trace!("Radar frame {}/{} at {:.3}", self.frame, self.frames, progress);
        if let Err(e) = self.chart.draw(&*self.surface, progress) {
            tracing::warn!("Radar frame {} failed: {}", self.frame, e);
        }
        if self.frame < self.frames {
            self.frame += 1;
            Step::Continue(Cadence::NextFrame)
        } else {
            Step::Finished
        }
    }
}

impl std::fmt::Debug for RadarAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarAnimation")
            .field("frame", &self.frame)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

/// Reveal action that starts the radar animation when its section shows.
///
/// The first frame is drawn synchronously inside the reveal. The chart
/// animates at most once even if its section fires again.
pub struct RadarReveal {
    chart: RadarChart,
    surface: RasterHandle,
    frames: u32,
    animator: Option<Animator>,
}

impl RadarReveal {
    /// Create the action for a chart drawn on `surface`.
    #[must_use]
    pub fn new(chart: RadarChart, surface: RasterHandle, frames: u32) -> Self {
        Self {
            chart,
            surface,
            frames,
            animator: None,
        }
    }

    /// Handle of the running (or finished) animation, once started.
    #[must_use]
    pub fn animator(&self) -> Option<&Animator> {
        self.animator.as_ref()
    }
}

impl RevealAction for RadarReveal {
    fn reveal(&mut self, target: &WatchableTarget, ctx: &RevealContext) {
        target.effect().apply(target.surface());
        if self.animator.is_some() {
            tracing::debug!("Radar already animated for {}", target.id());
            return;
        }
        tracing::debug!("Starting radar animation ({} frames)", self.frames);
        let animation = RadarAnimation::new(
            self.chart.clone(),
            Rc::clone(&self.surface),
            self.frames,
        );
        let animator = Animator::new(Rc::clone(ctx.scheduler()), animation);
        animator.start();
        self.animator = Some(animator);
    }
}
