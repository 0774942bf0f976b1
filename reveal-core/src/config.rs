//! Page configuration.
//!
//! Describes which elements get which reveal behaviour. The default
//! reproduces the portfolio page; hosts may load a JSON override.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::counter::{millis, CounterConfig};
use crate::error::{RevealError, RevealResult};
use crate::geometry::RootMargin;
use crate::target::RevealEffect;
use crate::trigger::TriggerConfig;
use crate::typing::TypingConfig;

/// Attribute the counter reads its target value from.
pub const DEFAULT_COUNT_ATTRIBUTE: &str = "data-count";

fn default_count_attribute() -> String {
    DEFAULT_COUNT_ATTRIBUTE.to_string()
}

/// How a preset reveals its targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealKind {
    /// Apply the preset effect.
    Effect,
    /// Apply the effect, then cascade `child_effect` over matching children.
    Cascade {
        /// Selector for children, relative to each target.
        child_selector: String,
        /// Effect applied to each child.
        child_effect: RevealEffect,
        /// Delay between consecutive children.
        #[serde(with = "millis")]
        interval: Duration,
    },
    /// Apply the effect, then `follow_effect` on a child after `delay`.
    ///
    /// Flattened beside the preset's own `effect`, so the child effect
    /// needs a distinct key.
    FollowUp {
        /// Selector for the child, relative to each target.
        child_selector: String,
        /// Effect applied to the child.
        follow_effect: RevealEffect,
        /// Delay after the primary effect.
        #[serde(with = "millis")]
        delay: Duration,
    },
    /// Count up to the integer stored in `attribute`.
    Counter {
        /// Attribute holding the target value.
        #[serde(default = "default_count_attribute")]
        attribute: String,
        /// Counter timing.
        #[serde(default)]
        timing: CounterConfig,
    },
}

/// One group of elements sharing a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerPreset {
    /// Name used in logs.
    pub name: String,
    /// Selectors whose matches are registered, in order.
    pub selectors: Vec<String>,
    /// Threshold, margin and stagger.
    pub trigger: TriggerConfig,
    /// Effect applied when a target is revealed.
    #[serde(default)]
    pub effect: RevealEffect,
    /// Effect applied at registration time.
    #[serde(default)]
    pub prepare: RevealEffect,
    /// Give each target its position in the match list as stagger index.
    #[serde(default)]
    pub index_stagger: bool,
    /// Reveal behaviour.
    #[serde(flatten)]
    pub kind: RevealKind,
}

impl TriggerPreset {
    /// Plain effect preset.
    #[must_use]
    pub fn effect(name: &str, selectors: &[&str], trigger: TriggerConfig, effect: RevealEffect) -> Self {
        Self {
            name: name.to_string(),
            selectors: selectors.iter().map(ToString::to_string).collect(),
            trigger,
            effect,
            prepare: RevealEffect::None,
            index_stagger: false,
            kind: RevealKind::Effect,
        }
    }

    /// Set the registration-time effect.
    #[must_use]
    pub fn with_prepare(mut self, prepare: RevealEffect) -> Self {
        self.prepare = prepare;
        self
    }

    /// Set the reveal kind.
    #[must_use]
    pub fn with_kind(mut self, kind: RevealKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enable per-position stagger indices.
    #[must_use]
    pub fn with_index_stagger(mut self) -> Self {
        self.index_stagger = true;
        self
    }

    /// Combined selector for a single query.
    #[must_use]
    pub fn selector(&self) -> String {
        self.selectors.join(", ")
    }

    /// Check the preset.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid threshold, no selectors, or a blank
    /// selector.
    pub fn validate(&self) -> RevealResult<()> {
        self.trigger.validate()?;
        if self.selectors.is_empty() {
            return Err(RevealError::Config(format!(
                "preset '{}' has no selectors",
                self.name
            )));
        }
        if self.selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(RevealError::Config(format!(
                "preset '{}' has a blank selector",
                self.name
            )));
        }
        Ok(())
    }
}

/// Inline style copied from an attribute at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStyle {
    /// Elements to update.
    pub selector: String,
    /// Attribute to read.
    pub attribute: String,
    /// Style property to set.
    pub property: String,
    /// Appended to the attribute value.
    #[serde(default)]
    pub suffix: String,
}

/// One axis of the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    /// Axis label.
    pub name: String,
    /// Score, `0..=100`.
    pub value: f64,
    /// Marker colour.
    pub color: String,
}

impl SkillSpec {
    fn new(name: &str, value: f64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// Radar chart placement and data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPreset {
    /// Section whose visibility starts the animation.
    pub section_selector: String,
    /// Canvas to draw on.
    pub canvas_selector: String,
    /// Trigger settings for the section.
    pub trigger: TriggerConfig,
    /// Drawing surface size in px (square).
    pub size: f64,
    /// Chart centre.
    pub center: (f64, f64),
    /// Radius of the outermost ring.
    pub max_radius: f64,
    /// Frames from centre to full extent.
    pub frames: u32,
    /// Axes, clockwise from the top.
    pub skills: Vec<SkillSpec>,
}

impl Default for RadarPreset {
    fn default() -> Self {
        Self {
            section_selector: ".skills-radar-section".to_string(),
            canvas_selector: "#skillsRadar".to_string(),
            trigger: TriggerConfig {
                threshold: 0.5,
                ..TriggerConfig::default()
            },
            size: 300.0,
            center: (150.0, 150.0),
            max_radius: 120.0,
            frames: 60,
            skills: vec![
                SkillSpec::new("Frontend", 90.0, "#61dafb"),
                SkillSpec::new("Backend", 85.0, "#68d391"),
                SkillSpec::new("Mobile", 75.0, "#02569b"),
                SkillSpec::new("DevOps", 70.0, "#f14e32"),
                SkillSpec::new("Design", 80.0, "#a259ff"),
                SkillSpec::new("Database", 82.0, "#47a047"),
            ],
        }
    }
}

/// Typing effect placement and phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPreset {
    /// Element receiving the text.
    pub selector: String,
    /// Phrases, typed in order.
    pub phrases: Vec<String>,
    /// Timing.
    #[serde(default)]
    pub timing: TypingConfig,
}

impl Default for TypingPreset {
    fn default() -> Self {
        Self {
            selector: ".typing-text".to_string(),
            phrases: [
                "Desenvolvedor Full Stack & Designer",
                "Especialista em Vue.js",
                "Designer Gráfico",
                "Desenvolvedor Mobile",
                "Criador de Soluções Web",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            timing: TypingConfig::default(),
        }
    }
}

/// Everything the page mounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Visibility trigger presets, mounted in order.
    #[serde(default)]
    pub triggers: Vec<TriggerPreset>,
    /// Styles derived from attributes at mount time.
    #[serde(default)]
    pub attribute_styles: Vec<AttributeStyle>,
    /// Typing effect, if any.
    #[serde(default)]
    pub typing: Option<TypingPreset>,
    /// Radar chart, if any.
    #[serde(default)]
    pub radar: Option<RadarPreset>,
}

impl PageConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> RevealResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> RevealResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every preset.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> RevealResult<()> {
        for preset in &self.triggers {
            preset.validate()?;
        }
        if let Some(radar) = &self.radar {
            radar.validate()?;
        }
        Ok(())
    }
}

impl RadarPreset {
    /// Check the chart geometry and data.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid trigger, zero frames, a radius or
    /// size that is not positive, no skills, or a skill outside `0..=100`.
    pub fn validate(&self) -> RevealResult<()> {
        self.trigger.validate()?;
        if self.frames == 0 {
            return Err(RevealError::Config("radar needs at least one frame".into()));
        }
        if !(self.max_radius.is_finite() && self.max_radius > 0.0) {
            return Err(RevealError::Config(format!(
                "radar radius must be positive, got {}",
                self.max_radius
            )));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(RevealError::Config(format!(
                "radar size must be positive, got {}",
                self.size
            )));
        }
        if self.skills.is_empty() {
            return Err(RevealError::Config("radar has no skills".into()));
        }
        if let Some(skill) = self
            .skills
            .iter()
            .find(|s| !(0.0..=100.0).contains(&s.value))
        {
            return Err(RevealError::Config(format!(
                "radar skill '{}' value {} outside 0..=100",
                skill.name, skill.value
            )));
        }
        Ok(())
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        let reveal_margin = RootMargin::bottom(-50.0);
        let at = |threshold: f64| TriggerConfig {
            threshold,
            ..TriggerConfig::default()
        };
        let ms = Duration::from_millis;

        let triggers = vec![
            TriggerPreset::effect(
                "scroll",
                &[
                    ".animate-on-scroll",
                    ".section-header",
                    ".hero-content > *",
                    ".about-content > *",
                    ".skill-category",
                    ".project-card",
                    ".contact-item",
                ],
                at(0.1).with_root_margin(reveal_margin),
                RevealEffect::class("animated"),
            )
            .with_prepare(RevealEffect::class("animate-on-scroll")),
            TriggerPreset::effect(
                "slide-left",
                &[".about-text", ".contact-info"],
                at(0.2).with_root_margin(reveal_margin),
                RevealEffect::Batch(vec![
                    RevealEffect::style("animation-delay", "0.3s"),
                    RevealEffect::class("animated"),
                ]),
            )
            .with_prepare(RevealEffect::class("slide-in-left")),
            TriggerPreset::effect(
                "slide-right",
                &[".about-image", ".contact-form"],
                at(0.2).with_root_margin(reveal_margin),
                RevealEffect::Batch(vec![
                    RevealEffect::style("animation-delay", "0.6s"),
                    RevealEffect::class("animated"),
                ]),
            )
            .with_prepare(RevealEffect::class("slide-in-right")),
            TriggerPreset::effect(
                "skills",
                &[".skill-category-enhanced"],
                at(0.3),
                RevealEffect::class("animated"),
            )
            .with_kind(RevealKind::Cascade {
                child_selector: ".skill-card".to_string(),
                child_effect: RevealEffect::class("animated"),
                interval: ms(150),
            }),
            TriggerPreset::effect(
                "timeline",
                &[".timeline-item"],
                at(0.5),
                RevealEffect::animation("fadeInLeft 0.8s ease-out"),
            )
            .with_kind(RevealKind::FollowUp {
                child_selector: ".timeline-dot".to_string(),
                follow_effect: RevealEffect::animation("pulse 2s ease-in-out infinite"),
                delay: ms(500),
            }),
            TriggerPreset::effect(
                "certifications",
                &[".certification-card"],
                at(0.3).with_stagger(ms(150)),
                RevealEffect::animation("fadeInUp 0.6s ease-out"),
            )
            .with_index_stagger()
            .with_kind(RevealKind::FollowUp {
                child_selector: ".cert-status".to_string(),
                follow_effect: RevealEffect::animation("checkmark 0.5s ease-in-out"),
                delay: ms(400),
            }),
            TriggerPreset::effect(
                "stats",
                &[".stat-number[data-count]"],
                at(0.5),
                RevealEffect::None,
            )
            .with_kind(RevealKind::Counter {
                attribute: default_count_attribute(),
                timing: CounterConfig::default(),
            }),
        ];

        Self {
            triggers,
            attribute_styles: vec![AttributeStyle {
                selector: ".skill-card[data-level]".to_string(),
                attribute: "data-level".to_string(),
                property: "--skill-level".to_string(),
                suffix: "%".to_string(),
            }],
            typing: Some(TypingPreset::default()),
            radar: Some(RadarPreset::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PageConfig::default().validate().unwrap();
    }

    #[test]
    fn default_scroll_preset_matches_page() {
        let config = PageConfig::default();
        let scroll = &config.triggers[0];
        assert!((scroll.trigger.threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(scroll.trigger.root_margin, RootMargin::bottom(-50.0));
        assert_eq!(scroll.effect, RevealEffect::class("animated"));
        assert!(scroll.selector().contains(".project-card"));
    }

    #[test]
    fn json_roundtrip_preserves_presets() {
        let config = PageConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(PageConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn follow_up_effect_serializes_beside_preset_effect() {
        let config = PageConfig::default();
        let timeline = config
            .triggers
            .iter()
            .find(|p| p.name == "timeline")
            .unwrap();
        let value = serde_json::to_value(timeline).unwrap();
        assert_eq!(value["effect"]["value"], "fadeInLeft 0.8s ease-out");
        assert_eq!(
            value["follow_effect"]["value"],
            "pulse 2s ease-in-out infinite"
        );

        let back: TriggerPreset = serde_json::from_value(value).unwrap();
        assert_eq!(&back, timeline);
    }

    #[test]
    fn parses_minimal_json() {
        let config = PageConfig::from_json(
            r#"{
                "triggers": [{
                    "name": "cards",
                    "selectors": [".card"],
                    "trigger": {"threshold": 0.25, "root_margin": "0px 0px -20px 0px"},
                    "effect": {"type": "add_class", "value": "visible"},
                    "kind": "effect"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.triggers.len(), 1);
        assert!(config.typing.is_none());
        assert_eq!(config.triggers[0].kind, RevealKind::Effect);
    }

    #[test]
    fn parses_counter_kind_with_defaults() {
        let config = PageConfig::from_json(
            r#"{"triggers":[{"name":"stats","selectors":[".stat"],"trigger":{"threshold":0.5},"kind":"counter"}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.triggers[0].kind,
            RevealKind::Counter {
                attribute: "data-count".to_string(),
                timing: CounterConfig::default(),
            }
        );
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = PageConfig::from_json(
            r#"{"triggers":[{"name":"x","selectors":[".x"],"trigger":{"threshold":2.0},"kind":"effect"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RevealError::InvalidThreshold(_)));
    }

    #[test]
    fn rejects_empty_selectors() {
        let mut config = PageConfig::default();
        config.triggers[0].selectors.clear();
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn rejects_one_blank_selector() {
        let mut config = PageConfig::default();
        config.triggers[0].selectors.push("  ".to_string());
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn rejects_degenerate_radar_geometry() {
        for (max_radius, size) in [(0.0, 300.0), (-5.0, 300.0), (f64::NAN, 300.0), (120.0, 0.0)] {
            let mut config = PageConfig::default();
            if let Some(radar) = config.radar.as_mut() {
                radar.max_radius = max_radius;
                radar.size = size;
            }
            assert!(
                matches!(config.validate(), Err(RevealError::Config(_))),
                "radius {max_radius} size {size} accepted"
            );
        }
    }

    #[test]
    fn rejects_radar_without_skills() {
        let mut config = PageConfig::default();
        if let Some(radar) = config.radar.as_mut() {
            radar.skills.clear();
        }
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_skill() {
        let mut config = PageConfig::default();
        if let Some(radar) = config.radar.as_mut() {
            radar.skills[0].value = 120.0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            PageConfig::from_json("{ nope"),
            Err(RevealError::Serialization(_))
        ));
    }
}
