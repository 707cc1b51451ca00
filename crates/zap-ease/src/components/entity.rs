use std::collections::HashMap;
use glam::Vec2;
use crate::api::target::{AxisPair, Field, Tweenable};
use crate::api::types::TargetId;

/// Fat Entity: a plain display-object-like struct the engine can animate.
/// Serves as the reference [`Tweenable`] implementation.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: TargetId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Cleared when the entity is destroyed; tweens drop it on the next frame.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
    pub skew: Vec2,
    pub width: f32,
    pub height: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Packed 0xRRGGBB tint.
    pub tint: u32,
    /// Free-form numeric fields, addressed by name.
    pub fields: HashMap<String, f32>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            skew: Vec2::ZERO,
            width: 0.0,
            height: 0.0,
            alpha: 1.0,
            tint: 0xffffff,
            fields: HashMap::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_tint(mut self, tint: u32) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: f32) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Mark the entity destroyed without removing it from its store.
    pub fn destroy(&mut self) {
        self.active = false;
    }
}

impl Tweenable for Entity {
    fn field(&self, field: &Field) -> f32 {
        match field {
            Field::X => self.pos.x,
            Field::Y => self.pos.y,
            Field::Width => self.width,
            Field::Height => self.height,
            Field::Alpha => self.alpha,
            Field::Rotation => self.rotation,
            Field::Named(name) => self.fields.get(name).copied().unwrap_or(0.0),
        }
    }

    fn set_field(&mut self, field: &Field, value: f32) {
        match field {
            Field::X => self.pos.x = value,
            Field::Y => self.pos.y = value,
            Field::Width => self.width = value,
            Field::Height => self.height = value,
            Field::Alpha => self.alpha = value,
            Field::Rotation => self.rotation = value,
            Field::Named(name) => {
                self.fields.insert(name.clone(), value);
            }
        }
    }

    fn pair(&self, pair: AxisPair) -> Vec2 {
        match pair {
            AxisPair::Position => self.pos,
            AxisPair::Scale => self.scale,
            AxisPair::Skew => self.skew,
        }
    }

    fn set_pair(&mut self, pair: AxisPair, value: Vec2) {
        match pair {
            AxisPair::Position => self.pos = value,
            AxisPair::Scale => self.scale = value,
            AxisPair::Skew => self.skew = value,
        }
    }

    fn tint(&self) -> u32 {
        self.tint
    }

    fn set_tint(&mut self, color: u32) {
        self.tint = color;
    }

    fn is_destroyed(&self) -> bool {
        !self.active
    }
}
