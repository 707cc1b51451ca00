// api/target.rs
//
// The contract between the tween engine and the objects it mutates.
// The engine never owns targets; it looks them up by TargetId every frame.

use glam::Vec2;
use crate::api::types::TargetId;

/// A scalar field on a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// Horizontal position (`position.x`).
    X,
    /// Vertical position (`position.y`).
    Y,
    Width,
    Height,
    Alpha,
    /// Rotation in radians.
    Rotation,
    /// Any other numeric field, addressed by its literal name.
    Named(String),
}

/// A 2-component sub-object on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPair {
    Position,
    Scale,
    Skew,
}

/// One component of an [`AxisPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn get(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }
}

/// Capability interface for anything the engine can animate.
///
/// Field existence is the caller's responsibility: the engine does not check
/// ahead of time that a target actually carries a given named field.
pub trait Tweenable {
    fn field(&self, field: &Field) -> f32;
    fn set_field(&mut self, field: &Field, value: f32);

    fn pair(&self, pair: AxisPair) -> Vec2;
    fn set_pair(&mut self, pair: AxisPair, value: Vec2);

    /// Packed `0xRRGGBB` tint.
    fn tint(&self) -> u32;
    fn set_tint(&mut self, color: u32);

    /// Polled every frame; destroyed targets have their bindings dropped.
    fn is_destroyed(&self) -> bool {
        false
    }
}

/// Lookup of targets by id. A missing target counts as destroyed.
pub trait TargetStore {
    fn target(&self, id: TargetId) -> Option<&dyn Tweenable>;
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn Tweenable>;
}
