//! # Folio Reveal Core
//!
//! Platform-free engine behind the portfolio page's scroll-triggered
//! animations. Compiles to WASM; hosts inject surfaces, intersection
//! entries and a scheduler.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              reveal-core                    │
//! ├─────────────────────────────────────────────┤
//! │  Visibility Trigger │  Reveal Actions       │
//! │  - Threshold/margin │  - Effects, cascades  │
//! │  - One-shot reveal  │  - Follow-ups         │
//! │  - Stagger          │  - Count-up           │
//! ├─────────────────────────────────────────────┤
//! │  Mount: PageConfig presets -> host NodeTree │
//! ├─────────────────────────────────────────────┤
//! │  Animator           │  Scheduler            │
//! │  - Idle/Animating/  │  - defer / next_frame │
//! │    Paused/Done      │  - Manual clock       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod animation;
pub mod config;
pub mod counter;
pub mod error;
pub mod geometry;
pub mod mount;
pub mod scheduler;
pub mod surface;
pub mod target;
pub mod trigger;
pub mod typing;

pub use action::{ApplyEffect, Cascade, CountUp, FollowUp};
pub use animation::{Animation, AnimationState, Animator, Cadence, Step};
pub use config::{
    AttributeStyle, PageConfig, RadarPreset, RevealKind, SkillSpec, TriggerPreset, TypingPreset,
};
pub use counter::{format_count, parse_count, CounterAnimation, CounterConfig};
pub use error::{RevealError, RevealResult};
pub use geometry::{IntersectionEntry, Rect, RootMargin, Viewport};
pub use mount::{
    apply_attribute_style, mount_page, mount_preset, mount_typing, MountedPage, MountedTrigger,
    NodeTree,
};
pub use scheduler::{ManualScheduler, Scheduler, SchedulerHandle, Task, FRAME_INTERVAL};
pub use surface::{RecordingSurface, Surface, SurfaceHandle, SurfaceOp};
pub use target::{RevealEffect, TargetId, WatchableTarget};
pub use trigger::{
    RevealAction, RevealContext, TriggerConfig, TriggerMode, VisibilityTrigger,
    THRESHOLD_TOLERANCE,
};
pub use typing::{TypingConfig, TypingEffect, TypingPhase};

/// Reveal core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
