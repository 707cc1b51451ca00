//! Deterministic per-frame property tweening.
//!
//! A [`TweenGroup`] owns tweens, each animating any number of properties on
//! any number of targets along one shared timeline. Targets are reached
//! through the [`TargetStore`] and [`Tweenable`] traits, so the engine works
//! against any scene representation; [`Scene`] and [`Entity`] are a ready-made one.

pub mod api;
pub mod core;
pub mod components;
pub mod error;
pub mod extensions;
pub mod tween;

// Re-export key types at crate root for convenience
pub use api::config::{Repeat, TweenConfig, TweenOptions};
pub use api::target::{Axis, AxisPair, Field, TargetStore, Tweenable};
pub use api::types::{EaseEvent, EaseEventKind, EventSource, TargetId, TweenId};
pub use components::entity::Entity;
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::{FrameClock, FrameSource, ManualFrames};
pub use error::EaseError;
pub use extensions::{Curve, CurveFn, CurveRef, CurveTable, Easing};
pub use tween::{
    Binding, Commands, Listener, Property, PropertyKind, PropertyValue,
    PhaseConfig, PhaseState, Span, Strategy, Tween, TweenGroup,
};
