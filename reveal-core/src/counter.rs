//! Numeric count-up reveal.
//!
//! Interpolates from zero to a target integer over a fixed duration,
//! writing the floored value as text each tick. Targets above ten get a
//! trailing `+` (`"120+"`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, Cadence, Step};
use crate::error::{RevealError, RevealResult};
use crate::surface::SurfaceHandle;

/// Values strictly above this get a `+` suffix.
pub const PLUS_SUFFIX_ABOVE: u64 = 10;

/// Timing for a count-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Interval between text updates.
    #[serde(with = "millis")]
    pub tick: Duration,
    /// Total time from zero to the target.
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl CounterConfig {
    /// Number of ticks needed to cover the duration (at least one).
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        let tick = self.tick.as_nanos().max(1);
        let ticks = self.duration.as_nanos().div_ceil(tick);
        u64::try_from(ticks).unwrap_or(u64::MAX).max(1)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
            duration: Duration::from_millis(2000),
        }
    }
}

pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Parse a `data-count` attribute value.
///
/// # Errors
///
/// Returns [`RevealError::InvalidCount`] unless the trimmed value is a
/// non-negative integer.
pub fn parse_count(raw: &str) -> RevealResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| RevealError::InvalidCount(raw.to_string()))
}

/// Text shown for `value` while counting towards `target`.
#[must_use]
pub fn format_count(value: u64, target: u64) -> String {
    if target > PLUS_SUFFIX_ABOVE {
        format!("{value}+")
    } else {
        value.to_string()
    }
}

/// Value displayed after `tick` of `total` ticks.
#[must_use]
pub fn value_at(target: u64, tick: u64, total: u64) -> u64 {
    if tick >= total {
        return target;
    }
    let scaled = u128::from(target) * u128::from(tick) / u128::from(total.max(1));
    u64::try_from(scaled).unwrap_or(target)
}

/// Count-up animation writing to a surface.
pub struct CounterAnimation {
    target: u64,
    surface: SurfaceHandle,
    config: CounterConfig,
    tick: u64,
}

impl CounterAnimation {
    /// Count from zero to `target` on `surface`.
    #[must_use]
    pub fn new(target: u64, surface: SurfaceHandle, config: CounterConfig) -> Self {
        Self {
            target,
            surface,
            config,
            tick: 0,
        }
    }

    /// Cadence for the first step.
    #[must_use]
    pub fn first_cadence(&self) -> Cadence {
        Cadence::After(self.config.tick)
    }

    /// Value written by the most recent step.
    #[must_use]
    pub fn current(&self) -> u64 {
        value_at(self.target, self.tick, self.config.total_ticks())
    }
}

impl Animation for CounterAnimation {
    fn step(&mut self) -> Step {
        let total = self.config.total_ticks();
        self.tick = (self.tick + 1).min(total);
        let text = format_count(self.current(), self.target);
        tracing::trace!("Counter tick {}/{total}: {text}", self.tick);
        self.surface.set_text(&text);
        if self.tick >= total {
            Step::Finished
        } else {
            Step::Continue(Cadence::After(self.config.tick))
        }
    }
}

impl std::fmt::Debug for CounterAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterAnimation")
            .field("target", &self.target)
            .field("tick", &self.tick)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use std::rc::Rc;

    #[test]
    fn default_config_has_125_ticks() {
        assert_eq!(CounterConfig::default().total_ticks(), 125);
    }

    #[test]
    fn zero_duration_still_takes_one_tick() {
        let config = CounterConfig {
            tick: Duration::from_millis(16),
            duration: Duration::ZERO,
        };
        assert_eq!(config.total_ticks(), 1);
    }

    #[test]
    fn parse_count_accepts_padded_integers() {
        assert_eq!(parse_count(" 120 ").unwrap(), 120);
        assert!(parse_count("12a").is_err());
        assert!(parse_count("-3").is_err());
        assert!(parse_count("").is_err());
    }

    #[test]
    fn suffix_only_above_ten() {
        assert_eq!(format_count(10, 10), "10");
        assert_eq!(format_count(5, 11), "5+");
        assert_eq!(format_count(120, 120), "120+");
    }

    #[test]
    fn value_at_hits_target_exactly() {
        assert_eq!(value_at(120, 0, 125), 0);
        assert_eq!(value_at(120, 124, 125), 119);
        assert_eq!(value_at(120, 125, 125), 120);
        assert_eq!(value_at(120, 500, 125), 120);
    }

    #[test]
    fn steps_until_finished() {
        let surface = Rc::new(RecordingSurface::new("stat"));
        let mut counter = CounterAnimation::new(7, surface.clone(), CounterConfig::default());
        let mut steps = 1;
        while counter.step() != Step::Finished {
            steps += 1;
        }
        assert_eq!(steps, 125);
        assert_eq!(surface.text().as_deref(), Some("7"));
    }
}
