#![forbid(unsafe_code)]

//! Scene and broadcast configuration.
//!
//! | Variable                     | Meaning                                   |
//! |------------------------------|-------------------------------------------|
//! | `TILECAST_DEFAULT_QUALITY`   | Fallback quality in `0.0..=1.0`           |
//! | `TILECAST_RESIZE_POLICY`     | `panic` (default) or `recreate`           |
//! | `TILECAST_COALESCE_MOVES`    | `1`/`true` to merge pending moves         |
//! | `TILECAST_OPS_PER_TICK`      | Ops drained per broadcaster tick          |
//! | `TILECAST_TEXTURES_PER_TICK` | Textures drained per broadcaster tick     |
//!
//! Unparseable values are ignored and the default is kept.

use tilecast_raster::{PackedRgba, Quality};

pub const ENV_DEFAULT_QUALITY: &str = "TILECAST_DEFAULT_QUALITY";
pub const ENV_RESIZE_POLICY: &str = "TILECAST_RESIZE_POLICY";
pub const ENV_COALESCE_MOVES: &str = "TILECAST_COALESCE_MOVES";
pub const ENV_OPS_PER_TICK: &str = "TILECAST_OPS_PER_TICK";
pub const ENV_TEXTURES_PER_TICK: &str = "TILECAST_TEXTURES_PER_TICK";

/// What to do when a descriptor changes `w`, `h`, or kind of a live unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Treat it as a caller bug and panic.
    #[default]
    Panic,
    /// Destroy the old unit (if the remote has it) and build a new one.
    Recreate,
}

impl ResizePolicy {
    /// Parse `panic` / `recreate` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("panic") {
            Some(Self::Panic)
        } else if value.eq_ignore_ascii_case("recreate") {
            Some(Self::Recreate)
        } else {
            None
        }
    }
}

/// Scene behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Quality for kinds missing from the quality table.
    pub default_quality: Quality,
    pub resize_policy: ResizePolicy,
    /// Replace a still-pending `move` for the same id instead of queueing a
    /// second one.
    pub coalesce_moves: bool,
    /// Colour transparent pixels are flattened onto before encoding.
    pub export_background: PackedRgba,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_quality: Quality::DEFAULT,
            resize_policy: ResizePolicy::Panic,
            coalesce_moves: false,
            export_background: PackedRgba::BLACK,
        }
    }
}

impl SceneConfig {
    /// Defaults overridden by `TILECAST_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(q) = get_env(ENV_DEFAULT_QUALITY).and_then(|v| v.trim().parse::<f32>().ok()) {
            config.default_quality = Quality::new(q);
        }
        if let Some(policy) = get_env(ENV_RESIZE_POLICY).and_then(|v| ResizePolicy::parse(&v)) {
            config.resize_policy = policy;
        }
        if let Some(flag) = get_env(ENV_COALESCE_MOVES).and_then(|v| parse_flag(&v)) {
            config.coalesce_moves = flag;
        }
        config
    }

    #[must_use]
    pub fn with_default_quality(mut self, quality: f32) -> Self {
        self.default_quality = Quality::new(quality);
        self
    }

    #[must_use]
    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    #[must_use]
    pub fn with_coalesce_moves(mut self, coalesce: bool) -> Self {
        self.coalesce_moves = coalesce;
        self
    }

    #[must_use]
    pub fn with_export_background(mut self, background: PackedRgba) -> Self {
        self.export_background = background;
        self
    }
}

/// How much the broadcaster drains per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendBudget {
    pub ops_per_tick: usize,
    pub textures_per_tick: usize,
}

impl Default for SendBudget {
    fn default() -> Self {
        Self {
            ops_per_tick: 64,
            textures_per_tick: 4,
        }
    }
}

impl SendBudget {
    pub const fn new(ops_per_tick: usize, textures_per_tick: usize) -> Self {
        Self {
            ops_per_tick,
            textures_per_tick,
        }
    }

    /// Defaults overridden by `TILECAST_*_PER_TICK`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut budget = Self::default();
        if let Some(n) = get_env(ENV_OPS_PER_TICK).and_then(|v| v.trim().parse().ok()) {
            budget.ops_per_tick = n;
        }
        if let Some(n) = get_env(ENV_TEXTURES_PER_TICK).and_then(|v| v.trim().parse().ok()) {
            budget.textures_per_tick = n;
        }
        budget
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
