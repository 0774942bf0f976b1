//! Typing-text effect.
//!
//! Types each phrase one character at a time, holds it, deletes it and
//! moves to the next, as an [`Animation`] driven by an [`Animator`] instead
//! of a self-rescheduling timer chain.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, Animator, Cadence, Step};
use crate::counter::millis;
use crate::scheduler::SchedulerHandle;
use crate::surface::SurfaceHandle;

/// Timing for the typing effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay after typing a character.
    #[serde(with = "millis")]
    pub type_speed: Duration,
    /// Delay after deleting a character.
    #[serde(with = "millis")]
    pub delete_speed: Duration,
    /// Hold time once a phrase is complete.
    #[serde(with = "millis")]
    pub pause: Duration,
    /// Gap between clearing a phrase and typing the next.
    #[serde(with = "millis")]
    pub next_phrase_delay: Duration,
    /// Delay before the first character.
    #[serde(with = "millis")]
    pub start_delay: Duration,
    /// Cycle through the phrases forever.
    pub looping: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            type_speed: Duration::from_millis(150),
            delete_speed: Duration::from_millis(100),
            pause: Duration::from_millis(2000),
            next_phrase_delay: Duration::from_millis(500),
            start_delay: Duration::from_millis(1000),
            looping: true,
        }
    }
}

/// What the effect is doing to the current phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// Adding characters.
    Typing,
    /// Removing characters.
    Deleting,
}

/// Typing animation over a list of phrases.
pub struct TypingEffect {
    phrases: Vec<Vec<char>>,
    surface: SurfaceHandle,
    config: TypingConfig,
    phrase: usize,
    chars: usize,
    phase: TypingPhase,
}

impl TypingEffect {
    /// Create the effect. Returns `None` when there is nothing to type.
    #[must_use]
    pub fn new<S: AsRef<str>>(
        phrases: &[S],
        surface: SurfaceHandle,
        config: TypingConfig,
    ) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases: phrases.iter().map(|p| p.as_ref().chars().collect()).collect(),
            surface,
            config,
            phrase: 0,
            chars: 0,
            phase: TypingPhase::Typing,
        })
    }

    /// Wrap in an animator and start after the configured delay.
    pub fn start(self, scheduler: SchedulerHandle) -> Animator {
        let delay = self.config.start_delay;
        let animator = Animator::new(scheduler, self);
        animator.start_with(Cadence::After(delay));
        animator
    }

    /// Index of the phrase being typed or deleted.
    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// Text currently displayed.
    #[must_use]
    pub fn visible_text(&self) -> String {
        self.phrases[self.phrase][..self.chars].iter().collect()
    }
}

impl Animation for TypingEffect {
    fn step(&mut self) -> Step {
        let len = self.phrases[self.phrase].len();
        match self.phase {
            TypingPhase::Typing => self.chars = (self.chars + 1).min(len),
            TypingPhase::Deleting => self.chars = self.chars.saturating_sub(1),
        }
        self.surface.set_text(&self.visible_text());

        let delay = match self.phase {
            TypingPhase::Typing if self.chars == len => {
                if !self.config.looping && self.phrase + 1 == self.phrases.len() {
                    return Step::Finished;
                }
                self.phase = TypingPhase::Deleting;
                self.config.pause
            }
            TypingPhase::Typing => self.config.type_speed,
            TypingPhase::Deleting if self.chars == 0 => {
                self.phase = TypingPhase::Typing;
                self.phrase = (self.phrase + 1) % self.phrases.len();
                self.config.next_phrase_delay
            }
            TypingPhase::Deleting => self.config.delete_speed,
        };
        Step::Continue(Cadence::After(delay))
    }
}

impl std::fmt::Debug for TypingEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingEffect")
            .field("phrase", &self.phrase)
            .field("chars", &self.chars)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use std::rc::Rc;

    fn effect(phrases: &[&str], looping: bool) -> (TypingEffect, Rc<RecordingSurface>) {
        let surface = RecordingSurface::shared("typing");
        let config = TypingConfig {
            looping,
            ..TypingConfig::default()
        };
        (
            TypingEffect::new(phrases, surface.clone(), config).unwrap(),
            surface,
        )
    }

    #[test]
    fn empty_phrase_list_yields_none() {
        let phrases: [&str; 0] = [];
        assert!(TypingEffect::new(&phrases, RecordingSurface::shared("x"), TypingConfig::default()).is_none());
    }

    #[test]
    fn types_holds_and_deletes() {
        let (mut typing, surface) = effect(&["ab", "c"], true);
        let ms = |n| Step::Continue(Cadence::After(Duration::from_millis(n)));

        assert_eq!(typing.step(), ms(150));
        assert_eq!(typing.step(), ms(2000));
        assert_eq!(typing.phase(), TypingPhase::Deleting);
        assert_eq!(typing.step(), ms(100));
        assert_eq!(typing.step(), ms(500));
        assert_eq!(typing.phrase_index(), 1);
        assert_eq!(surface.texts(), vec!["a", "ab", "a", ""]);
    }

    #[test]
    fn wraps_to_first_phrase() {
        let (mut typing, _) = effect(&["x"], true);
        typing.step();
        typing.step();
        assert_eq!(typing.phrase_index(), 0);
        assert_eq!(typing.phase(), TypingPhase::Typing);
    }

    #[test]
    fn non_looping_finishes_on_last_phrase() {
        let (mut typing, surface) = effect(&["hi"], false);
        assert!(matches!(typing.step(), Step::Continue(_)));
        assert_eq!(typing.step(), Step::Finished);
        assert_eq!(surface.text().as_deref(), Some("hi"));
    }

    #[test]
    fn counts_unicode_characters() {
        let (mut typing, surface) = effect(&["Gráfico"], false);
        for _ in 0..3 {
            typing.step();
        }
        assert_eq!(surface.text().as_deref(), Some("Grá"));
    }
}
