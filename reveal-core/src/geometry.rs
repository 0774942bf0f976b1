//! Viewport intersection geometry.
//!
//! Browsers compute intersection ratios natively; this module does the same
//! arithmetic for hosts without an observer primitive and for tests that
//! drive a trigger from raw layout rectangles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RevealError, RevealResult};
use crate::target::TargetId;

/// Axis-aligned rectangle in CSS pixels, viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Same rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlap with `other`, or `None` if they are disjoint.
    ///
    /// Edge-adjacent rectangles produce a zero-area overlap, matching how
    /// `IntersectionObserver` reports `isIntersecting` for touching edges.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Offsets applied to the viewport before intersection testing.
///
/// Positive values grow the root box, negative values shrink it. A margin
/// of `0px 0px -50px 0px` makes targets count as visible only once they are
/// 50px above the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    /// Top offset in px.
    pub top: f64,
    /// Right offset in px.
    pub right: f64,
    /// Bottom offset in px.
    pub bottom: f64,
    /// Left offset in px.
    pub left: f64,
}

impl RootMargin {
    /// No margin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a margin from four offsets (CSS order).
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Margin that only moves the bottom edge.
    #[must_use]
    pub const fn bottom(px: f64) -> Self {
        Self::new(0.0, 0.0, px, 0.0)
    }

    /// Apply the margin to a root rectangle.
    #[must_use]
    pub fn apply(&self, root: &Rect) -> Rect {
        Rect::new(
            root.x - self.left,
            root.y - self.top,
            (root.width + self.left + self.right).max(0.0),
            (root.height + self.top + self.bottom).max(0.0),
        )
    }
}

fn parse_px(token: &str) -> RevealResult<f64> {
    let number = token.strip_suffix("px").unwrap_or(token);
    if number.len() == token.len() && number.parse::<f64>().map_or(true, |n| n != 0.0) {
        // Only a bare zero may omit the unit.
        return Err(RevealError::InvalidRootMargin(format!(
            "'{token}' must be a pixel length"
        )));
    }
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RevealError::InvalidRootMargin(format!(
            "'{token}' is not a number"
        ))),
    }
}

impl FromStr for RootMargin {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(parse_px)
            .collect::<RevealResult<Vec<_>>>()?;
        match values.as_slice() {
            [] => Ok(Self::ZERO),
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(RevealError::InvalidRootMargin(format!(
                "'{s}' has more than four values"
            ))),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl Serialize for RootMargin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RootMargin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The visible area targets are tested against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in px.
    pub width: f64,
    /// Height in px.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Root rectangle after applying `margin`.
    #[must_use]
    pub fn root_rect(&self, margin: &RootMargin) -> Rect {
        margin.apply(&Rect::new(0.0, 0.0, self.width, self.height))
    }
}

/// One observation of a target's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Which target this entry describes.
    pub target: TargetId,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub ratio: f64,
    /// Whether the target touches the root at all.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Build an entry directly from a ratio.
    #[must_use]
    pub fn new(target: TargetId, ratio: f64) -> Self {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        Self {
            target,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    /// Compute the entry for a target rectangle against a root rectangle.
    #[must_use]
    pub fn compute(target: TargetId, bounds: &Rect, root: &Rect) -> Self {
        let Some(overlap) = bounds.intersection(root) else {
            return Self {
                target,
                ratio: 0.0,
                is_intersecting: false,
            };
        };
        let area = bounds.area();
        let ratio = if area > 0.0 {
            (overlap.area() / area).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            target,
            ratio,
            is_intersecting: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_value_margin() {
        let margin: RootMargin = "0px 0px -50px 0px".parse().unwrap();
        assert_eq!(margin, RootMargin::bottom(-50.0));
    }

    #[test]
    fn parses_shorthand_forms() {
        assert_eq!("10px".parse::<RootMargin>().unwrap(), RootMargin::new(10.0, 10.0, 10.0, 10.0));
        assert_eq!("5px 0".parse::<RootMargin>().unwrap(), RootMargin::new(5.0, 0.0, 5.0, 0.0));
        assert_eq!(
            "1px 2px 3px".parse::<RootMargin>().unwrap(),
            RootMargin::new(1.0, 2.0, 3.0, 2.0)
        );
        assert_eq!("".parse::<RootMargin>().unwrap(), RootMargin::ZERO);
    }

    #[test]
    fn rejects_bad_margins() {
        assert!("10".parse::<RootMargin>().is_err());
        assert!("10%".parse::<RootMargin>().is_err());
        assert!("abcpx".parse::<RootMargin>().is_err());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
    }

    #[test]
    fn margin_display_roundtrips() {
        let margin = RootMargin::bottom(-50.0);
        let again: RootMargin = margin.to_string().parse().unwrap();
        assert_eq!(margin, again);
    }

    #[test]
    fn negative_bottom_margin_shrinks_root() {
        let root = Viewport::new(1000.0, 800.0).root_rect(&RootMargin::bottom(-50.0));
        assert_eq!(root, Rect::new(0.0, 0.0, 1000.0, 750.0));
    }

    #[test]
    fn ratio_is_visible_fraction() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let id = TargetId::new();
        let entry = IntersectionEntry::compute(id, &Rect::new(0.0, 80.0, 100.0, 40.0), &root);
        assert!(entry.is_intersecting);
        assert!((entry.ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn disjoint_target_is_not_intersecting() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let entry =
            IntersectionEntry::compute(TargetId::new(), &Rect::new(0.0, 200.0, 10.0, 10.0), &root);
        assert!(!entry.is_intersecting);
        assert!(entry.ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_area_target_inside_root_counts_as_visible() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let entry =
            IntersectionEntry::compute(TargetId::new(), &Rect::new(10.0, 10.0, 0.0, 0.0), &root);
        assert!(entry.is_intersecting);
        assert!((entry.ratio - 1.0).abs() < f64::EPSILON);
    }
}
