// tween/property.rs
//
// What a caller can ask a tween to animate. Properties are a closed set,
// resolved to a binding strategy once at registration time.

use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};
use glam::Vec2;
use serde::Deserialize;
use crate::error::EaseError;

/// A property to animate, with its goal.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    X(f32),
    Y(f32),
    Width(f32),
    Height(f32),
    Alpha(f32),
    Rotation(f32),
    /// Both position axes, each on its own span.
    Position(Vec2),
    /// Both scale axes driven to the same value.
    Scale(f32),
    ScaleX(f32),
    ScaleY(f32),
    /// Both skew axes driven to the same value.
    Skew(f32),
    SkewX(f32),
    SkewY(f32),
    /// Rotate the target to face a point, the short way round.
    Face(Vec2),
    /// Step through colors without blending. One color means "from the current tint".
    Tint(Vec<u32>),
    /// Blend smoothly through colors. One color means "from the current tint".
    Blend(Vec<u32>),
    /// Jitter position randomly within this radius (not curved).
    Shake(f32),
    /// Any other numeric field, by name.
    Field(String, f32),
}

/// The tag of a [`Property`], used to address bindings for removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    X,
    Y,
    Width,
    Height,
    Alpha,
    Rotation,
    Position,
    Scale,
    ScaleX,
    ScaleY,
    Skew,
    SkewX,
    SkewY,
    Face,
    Tint,
    Blend,
    Shake,
    Field(String),
}

impl PropertyKind {
    /// Map a property name to its kind. Unknown names are generic fields.
    pub fn from_name(name: &str) -> Self {
        match name {
            "x" => PropertyKind::X,
            "y" => PropertyKind::Y,
            "width" => PropertyKind::Width,
            "height" => PropertyKind::Height,
            "alpha" => PropertyKind::Alpha,
            "rotation" => PropertyKind::Rotation,
            "position" => PropertyKind::Position,
            "scale" => PropertyKind::Scale,
            "scaleX" => PropertyKind::ScaleX,
            "scaleY" => PropertyKind::ScaleY,
            "skew" => PropertyKind::Skew,
            "skewX" => PropertyKind::SkewX,
            "skewY" => PropertyKind::SkewY,
            "face" => PropertyKind::Face,
            "tint" => PropertyKind::Tint,
            "blend" => PropertyKind::Blend,
            "shake" => PropertyKind::Shake,
            other => PropertyKind::Field(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PropertyKind::X => "x",
            PropertyKind::Y => "y",
            PropertyKind::Width => "width",
            PropertyKind::Height => "height",
            PropertyKind::Alpha => "alpha",
            PropertyKind::Rotation => "rotation",
            PropertyKind::Position => "position",
            PropertyKind::Scale => "scale",
            PropertyKind::ScaleX => "scaleX",
            PropertyKind::ScaleY => "scaleY",
            PropertyKind::Skew => "skew",
            PropertyKind::SkewX => "skewX",
            PropertyKind::SkewY => "skewY",
            PropertyKind::Face => "face",
            PropertyKind::Tint => "tint",
            PropertyKind::Blend => "blend",
            PropertyKind::Shake => "shake",
            PropertyKind::Field(name) => name,
        }
    }
}

/// A loosely typed property goal, as found in JSON tween descriptions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f32),
    Colors(Vec<u32>),
    Point { x: f32, y: f32 },
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::X(_) => PropertyKind::X,
            Property::Y(_) => PropertyKind::Y,
            Property::Width(_) => PropertyKind::Width,
            Property::Height(_) => PropertyKind::Height,
            Property::Alpha(_) => PropertyKind::Alpha,
            Property::Rotation(_) => PropertyKind::Rotation,
            Property::Position(_) => PropertyKind::Position,
            Property::Scale(_) => PropertyKind::Scale,
            Property::ScaleX(_) => PropertyKind::ScaleX,
            Property::ScaleY(_) => PropertyKind::ScaleY,
            Property::Skew(_) => PropertyKind::Skew,
            Property::SkewX(_) => PropertyKind::SkewX,
            Property::SkewY(_) => PropertyKind::SkewY,
            Property::Face(_) => PropertyKind::Face,
            Property::Tint(_) => PropertyKind::Tint,
            Property::Blend(_) => PropertyKind::Blend,
            Property::Shake(_) => PropertyKind::Shake,
            Property::Field(name, _) => PropertyKind::Field(name.clone()),
        }
    }

    /// Build a property from a name and a loosely typed goal.
    pub fn from_name(name: &str, value: PropertyValue) -> Result<Self, EaseError> {
        let kind = PropertyKind::from_name(name);
        let invalid = |reason| EaseError::InvalidProperty {
            name: name.to_string(),
            reason,
        };

        match kind {
            PropertyKind::Position | PropertyKind::Face => match value {
                PropertyValue::Point { x, y } if kind == PropertyKind::Position => {
                    Ok(Property::Position(Vec2::new(x, y)))
                }
                PropertyValue::Point { x, y } => Ok(Property::Face(Vec2::new(x, y))),
                _ => Err(invalid("expected a point")),
            },
            PropertyKind::Tint => colors(value)
                .map(Property::Tint)
                .ok_or_else(|| invalid("expected colors")),
            PropertyKind::Blend => colors(value)
                .map(Property::Blend)
                .ok_or_else(|| invalid("expected colors")),
            kind => match value {
                PropertyValue::Number(v) => scalar(kind, v).ok_or_else(|| invalid("expected a number")),
                _ => Err(invalid("expected a number")),
            },
        }
    }

    /// Parse a JSON object of `name: goal` pairs, e.g. `{"x": 10, "tint": [255, 65280]}`.
    pub fn from_json(json: &str) -> Result<Vec<Self>, EaseError> {
        let map: BTreeMap<String, PropertyValue> = serde_json::from_str(json)?;
        map.into_iter()
            .map(|(name, value)| Property::from_name(&name, value))
            .collect()
    }
}

fn scalar(kind: PropertyKind, v: f32) -> Option<Property> {
    Some(match kind {
        PropertyKind::X => Property::X(v),
        PropertyKind::Y => Property::Y(v),
        PropertyKind::Width => Property::Width(v),
        PropertyKind::Height => Property::Height(v),
        PropertyKind::Alpha => Property::Alpha(v),
        PropertyKind::Rotation => Property::Rotation(v),
        PropertyKind::Scale => Property::Scale(v),
        PropertyKind::ScaleX => Property::ScaleX(v),
        PropertyKind::ScaleY => Property::ScaleY(v),
        PropertyKind::Skew => Property::Skew(v),
        PropertyKind::SkewX => Property::SkewX(v),
        PropertyKind::SkewY => Property::SkewY(v),
        PropertyKind::Shake => Property::Shake(v),
        PropertyKind::Field(name) => Property::Field(name, v),
        PropertyKind::Position | PropertyKind::Face | PropertyKind::Tint | PropertyKind::Blend => {
            return None
        }
    })
}

fn colors(value: PropertyValue) -> Option<Vec<u32>> {
    match value {
        PropertyValue::Colors(colors) if !colors.is_empty() => Some(colors),
        PropertyValue::Number(v) if v >= 0.0 && v.fract() == 0.0 => Some(vec![v as u32]),
        _ => None,
    }
}

/// Bearing in radians from `from` toward `to`.
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Smallest signed rotation taking `start` onto `bearing`.
///
/// The result lies in (-π, π] and `start + result ≡ bearing (mod 2π)`, so a
/// facing tween never turns more than half a revolution.
pub fn shortest_angle(start: f32, bearing: f32) -> f32 {
    let diff = (bearing - start).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}
