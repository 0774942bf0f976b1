//! Easing curves for frame-stepped animations.

/// Cubic ease-out: fast start, gentle landing. `0 -> 0`, `1 -> 1`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Linear progress of `frame` out of `frames`, clamped to `0.0..=1.0`.
///
/// Progress is counted in frames, not wall-clock time.
#[must_use]
pub fn frame_progress(frame: u32, frames: u32) -> f64 {
    if frames == 0 {
        return 1.0;
    }
    (f64::from(frame) / f64::from(frames)).min(1.0)
}
