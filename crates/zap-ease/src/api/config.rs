use serde::Deserialize;
use crate::error::EaseError;
use crate::extensions::easing::{CurveRef, CurveTable};
use crate::tween::session::PhaseConfig;

/// How many extra phases a tween runs after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RepeatRepr")]
pub enum Repeat {
    #[default]
    Never,
    /// Loop until removed.
    Forever,
    /// Loop this many more times.
    Times(u32),
}

/// JSON accepts `true`/`false` or a count.
#[derive(Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Flag(bool),
    Count(u32),
}

impl From<RepeatRepr> for Repeat {
    fn from(repr: RepeatRepr) -> Self {
        match repr {
            RepeatRepr::Flag(true) => Repeat::Forever,
            RepeatRepr::Flag(false) | RepeatRepr::Count(0) => Repeat::Never,
            RepeatRepr::Count(n) => Repeat::Times(n),
        }
    }
}

impl From<bool> for Repeat {
    fn from(flag: bool) -> Self {
        if flag { Repeat::Forever } else { Repeat::Never }
    }
}

impl From<u32> for Repeat {
    fn from(count: u32) -> Self {
        if count == 0 { Repeat::Never } else { Repeat::Times(count) }
    }
}

impl Repeat {
    pub fn is_active(self) -> bool {
        !matches!(self, Repeat::Never)
    }

    /// Count one repeat off. `Times(1)` becomes `Never`; `Forever` stays.
    pub fn decrement(self) -> Self {
        match self {
            Repeat::Times(n) if n > 1 => Repeat::Times(n - 1),
            Repeat::Times(_) | Repeat::Never => Repeat::Never,
            Repeat::Forever => Repeat::Forever,
        }
    }
}

/// Group-wide defaults, provided when the group is created.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TweenConfig {
    /// Phase duration in milliseconds (default: 1000).
    pub duration: f32,
    /// Curve, by value or by name (default: easeInOutSine).
    pub ease: CurveRef,
    pub reverse: bool,
    pub repeat: Repeat,
    /// Delay before the first update, in milliseconds.
    pub wait: f32,
    /// Ceiling on elapsed time accepted per tick (default: 1000/60 ms).
    pub max_frame_delta: f32,
    /// Whether the group arms its frame source by itself (default: true).
    pub use_auto_tick: bool,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            ease: CurveRef::default(),
            reverse: false,
            repeat: Repeat::Never,
            wait: 0.0,
            max_frame_delta: 1000.0 / 60.0,
            use_auto_tick: true,
        }
    }
}

impl TweenConfig {
    /// Parse a config from a JSON string. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, EaseError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-tween overrides of the group defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TweenOptions {
    pub duration: Option<f32>,
    pub ease: Option<CurveRef>,
    pub reverse: Option<bool>,
    pub repeat: Option<Repeat>,
    pub wait: Option<f32>,
}

impl TweenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, EaseError> {
        Ok(serde_json::from_str(json)?)
    }

    // -- Builder methods --

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_ease(mut self, ease: impl Into<CurveRef>) -> Self {
        self.ease = Some(ease.into());
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn with_repeat(mut self, repeat: impl Into<Repeat>) -> Self {
        self.repeat = Some(repeat.into());
        self
    }

    pub fn with_wait(mut self, wait: f32) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Merge with group defaults and resolve the curve.
    /// Returns the phase configuration and the initial wait.
    pub fn resolve(&self, defaults: &TweenConfig, curves: &CurveTable) -> Result<(PhaseConfig, f32), EaseError> {
        let curve = self.ease.as_ref().unwrap_or(&defaults.ease).resolve(curves)?;
        let phase = PhaseConfig {
            duration: self.duration.unwrap_or(defaults.duration),
            curve,
            reverse: self.reverse.unwrap_or(defaults.reverse),
            repeat: self.repeat.unwrap_or(defaults.repeat),
        };
        Ok((phase, self.wait.unwrap_or(defaults.wait).max(0.0)))
    }
}
