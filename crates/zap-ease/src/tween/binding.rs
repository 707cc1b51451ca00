// tween/binding.rs
//
// One (target, property) pair and the strategy that writes it each frame.
// Strategies are a closed set dispatched with a match; nothing is looked up
// by name after registration.

use std::ops::Sub;
use glam::Vec2;
use crate::api::target::{Axis, AxisPair, Field, Tweenable};
use crate::api::types::TargetId;
use crate::core::rng::Rng;
use crate::extensions::color;
use crate::extensions::easing::Curve;
use super::property::{bearing, shortest_angle, Property, PropertyKind};

/// Start, goal and their difference. `delta` always equals `goal - start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<T> {
    pub start: T,
    pub goal: T,
    pub delta: T,
}

impl<T: Copy + Sub<Output = T>> Span<T> {
    pub fn new(start: T, goal: T) -> Self {
        Self { start, goal, delta: goal - start }
    }

    /// Swap start and goal, recomputing the delta.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.goal);
        self.delta = self.goal - self.start;
    }
}

impl Span<f32> {
    #[inline]
    pub fn at(&self, curve: &Curve, elapsed: f32, duration: f32) -> f32 {
        curve.ease(elapsed, self.start, self.delta, duration)
    }
}

impl Span<Vec2> {
    /// Each axis runs the curve on its own start and delta.
    #[inline]
    pub fn at(&self, curve: &Curve, elapsed: f32, duration: f32) -> Vec2 {
        Vec2::new(
            curve.ease(elapsed, self.start.x, self.delta.x, duration),
            curve.ease(elapsed, self.start.y, self.delta.y, duration),
        )
    }
}

/// Which color a blend heads toward once it passes the last color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWrap {
    /// A reverse is pending: head back to the previous color.
    Previous,
    /// A repeat is pending: head to the first color.
    First,
    /// Terminal phase: hold the last color.
    Clamp,
}

/// The per-frame inputs every binding reads.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub elapsed: f32,
    pub duration: f32,
    pub curve: &'a Curve,
    pub wrap: ColorWrap,
}

/// How a binding computes and writes its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// A single named scalar field.
    Scalar { field: Field, span: Span<f32> },
    /// One axis of a 2-component sub-object.
    Axis { pair: AxisPair, axis: Axis, span: Span<f32> },
    /// Both axes of a sub-object driven to the same value.
    Uniform { pair: AxisPair, span: Span<f32> },
    /// Position, each axis curved independently.
    Point { span: Span<Vec2> },
    /// Rotation toward a bearing, never more than half a turn.
    Face { span: Span<f32> },
    /// Discrete color steps.
    Tint { colors: Vec<u32>, span: Span<f32> },
    /// Blended color steps.
    Blend { colors: Vec<u32>, span: Span<f32> },
    /// Random jitter around `start`, fresh every frame.
    Shake { start: Vec2, radius: f32 },
}

/// A property bound to one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub target: TargetId,
    pub kind: PropertyKind,
    pub strategy: Strategy,
}

impl Binding {
    /// Snapshot the target's current values as the start of a new binding.
    pub fn new(id: TargetId, target: &dyn Tweenable, property: Property) -> Self {
        let kind = property.kind();
        let scalar = |field: Field, goal: f32| {
            let span = Span::new(target.field(&field), goal);
            Strategy::Scalar { field, span }
        };
        let one_axis = |pair: AxisPair, axis: Axis, goal: f32| Strategy::Axis {
            pair,
            axis,
            span: Span::new(axis.get(target.pair(pair)), goal),
        };
        let uniform = |pair: AxisPair, goal: f32| Strategy::Uniform {
            pair,
            span: Span::new(target.pair(pair).x, goal),
        };

        let strategy = match property {
            Property::X(goal) => scalar(Field::X, goal),
            Property::Y(goal) => scalar(Field::Y, goal),
            Property::Width(goal) => scalar(Field::Width, goal),
            Property::Height(goal) => scalar(Field::Height, goal),
            Property::Alpha(goal) => scalar(Field::Alpha, goal),
            Property::Rotation(goal) => scalar(Field::Rotation, goal),
            Property::Field(name, goal) => scalar(Field::Named(name), goal),
            Property::Position(goal) => Strategy::Point {
                span: Span::new(target.pair(AxisPair::Position), goal),
            },
            Property::Scale(goal) => uniform(AxisPair::Scale, goal),
            Property::ScaleX(goal) => one_axis(AxisPair::Scale, Axis::X, goal),
            Property::ScaleY(goal) => one_axis(AxisPair::Scale, Axis::Y, goal),
            Property::Skew(goal) => uniform(AxisPair::Skew, goal),
            Property::SkewX(goal) => one_axis(AxisPair::Skew, Axis::X, goal),
            Property::SkewY(goal) => one_axis(AxisPair::Skew, Axis::Y, goal),
            Property::Face(point) => {
                let rotation = target.field(&Field::Rotation);
                let diff = shortest_angle(rotation, bearing(target.pair(AxisPair::Position), point));
                Strategy::Face { span: Span::new(rotation, rotation + diff) }
            }
            Property::Tint(colors) => {
                let colors = color_steps(target, colors);
                let span = Span::new(0.0, colors.len() as f32);
                Strategy::Tint { colors, span }
            }
            Property::Blend(colors) => {
                let colors = color_steps(target, colors);
                let span = Span::new(0.0, colors.len() as f32);
                Strategy::Blend { colors, span }
            }
            Property::Shake(radius) => Strategy::Shake {
                start: target.pair(AxisPair::Position),
                radius,
            },
        };

        Self { target: id, kind, strategy }
    }

    /// Whether this binding matches a removal filter. `None` matches everything.
    pub fn matches(&self, target: Option<TargetId>, kinds: Option<&[PropertyKind]>) -> bool {
        target.map_or(true, |t| t == self.target)
            && kinds.map_or(true, |ks| ks.contains(&self.kind))
    }

    /// Compute this frame's value and write it to the target.
    pub fn apply(&self, target: &mut dyn Tweenable, frame: &Frame, rng: &mut Rng) {
        let Frame { elapsed, duration, curve, wrap } = *frame;
        match &self.strategy {
            Strategy::Scalar { field, span } => {
                target.set_field(field, span.at(curve, elapsed, duration));
            }
            Strategy::Axis { pair, axis, span } => {
                let mut v = target.pair(*pair);
                axis.set(&mut v, span.at(curve, elapsed, duration));
                target.set_pair(*pair, v);
            }
            Strategy::Uniform { pair, span } => {
                target.set_pair(*pair, Vec2::splat(span.at(curve, elapsed, duration)));
            }
            Strategy::Point { span } => {
                target.set_pair(AxisPair::Position, span.at(curve, elapsed, duration));
            }
            Strategy::Face { span } => {
                target.set_field(&Field::Rotation, span.at(curve, elapsed, duration));
            }
            Strategy::Tint { colors, span } => {
                let step = span.at(curve, elapsed, duration);
                target.set_tint(colors[color_index(step, colors.len())]);
            }
            Strategy::Blend { colors, span } => {
                let percent = span.at(curve, elapsed, duration);
                target.set_tint(blend_at(colors, percent, wrap));
            }
            Strategy::Shake { start, radius } => {
                let offset = Vec2::new(rng.jitter(*radius), rng.jitter(*radius));
                target.set_pair(AxisPair::Position, *start + offset);
            }
        }
    }

    /// Flip direction for a reverse phase. Shake has no direction and is left alone.
    pub fn reverse(&mut self) {
        match &mut self.strategy {
            Strategy::Scalar { span, .. }
            | Strategy::Axis { span, .. }
            | Strategy::Uniform { span, .. }
            | Strategy::Face { span }
            | Strategy::Tint { span, .. }
            | Strategy::Blend { span, .. } => span.reverse(),
            Strategy::Point { span } => span.reverse(),
            Strategy::Shake { .. } => {}
        }
    }

    /// Put the target back at the start values before a repeat phase.
    pub fn reset(&self, target: &mut dyn Tweenable) {
        match &self.strategy {
            Strategy::Scalar { field, span } => target.set_field(field, span.start),
            Strategy::Axis { pair, axis, span } => {
                let mut v = target.pair(*pair);
                axis.set(&mut v, span.start);
                target.set_pair(*pair, v);
            }
            Strategy::Uniform { pair, span } => target.set_pair(*pair, Vec2::splat(span.start)),
            Strategy::Point { span } => target.set_pair(AxisPair::Position, span.start),
            Strategy::Face { span } => target.set_field(&Field::Rotation, span.start),
            // Color steps wrap through their index instead.
            Strategy::Tint { .. } | Strategy::Blend { .. } => {}
            Strategy::Shake { start, .. } => target.set_pair(AxisPair::Position, *start),
        }
    }

    /// Side effects when the tween completes. Only shake needs to settle.
    pub fn complete(&self, target: &mut dyn Tweenable) {
        if let Strategy::Shake { start, .. } = &self.strategy {
            target.set_pair(AxisPair::Position, *start);
        }
    }
}

fn color_steps(target: &dyn Tweenable, mut colors: Vec<u32>) -> Vec<u32> {
    if colors.len() < 2 {
        colors.insert(0, target.tint());
    }
    colors
}

#[inline]
fn color_index(step: f32, len: usize) -> usize {
    (step.floor().max(0.0) as usize).min(len - 1)
}

/// Blend at a fractional color step. The integer part picks a color, the
/// fraction blends toward the next one. At the end of the phase
/// (`percent >= len`) the blend has fully arrived at the wrap color.
pub fn blend_at(colors: &[u32], percent: f32, wrap: ColorWrap) -> u32 {
    let len = colors.len();
    let index = color_index(percent, len);
    let fraction = if percent >= len as f32 {
        1.0
    } else {
        (percent - percent.floor()).clamp(0.0, 1.0)
    };
    let next = if index + 1 < len {
        index + 1
    } else {
        match wrap {
            ColorWrap::Previous => index.saturating_sub(1),
            ColorWrap::First => 0,
            ColorWrap::Clamp => index,
        }
    };
    color::blend(colors[index], colors[next], fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use crate::components::entity::Entity;
    use crate::extensions::easing::Easing;

    const LINEAR: Curve = Curve::Easing(Easing::Linear);

    fn frame(elapsed: f32, duration: f32) -> Frame<'static> {
        Frame { elapsed, duration, curve: &LINEAR, wrap: ColorWrap::Clamp }
    }

    fn entity() -> Entity {
        Entity::new(TargetId(1))
    }

    #[test]
    fn span_reverse_recomputes_delta() {
        let mut span = Span::new(10.0_f32, 30.0);
        assert_eq!(span.delta, 20.0);
        span.reverse();
        assert_eq!((span.start, span.goal, span.delta), (30.0, 10.0, -20.0));

        let mut span = Span::new(Vec2::ZERO, Vec2::new(4.0, -2.0));
        span.reverse();
        assert_eq!(span.delta, Vec2::new(-4.0, 2.0));
    }

    #[test]
    fn scalar_writes_curved_value() {
        let mut e = entity();
        let b = Binding::new(TargetId(1), &e, Property::Alpha(0.0));
        b.apply(&mut e, &frame(250.0, 1000.0), &mut Rng::default());
        assert!((e.alpha - 0.75).abs() < 1e-5);
    }

    #[test]
    fn paired_axis_touches_one_axis() {
        let mut e = entity().with_scale(Vec2::new(1.0, 2.0));
        let b = Binding::new(TargetId(1), &e, Property::ScaleX(3.0));
        b.apply(&mut e, &frame(500.0, 1000.0), &mut Rng::default());
        assert_eq!(e.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn uniform_drives_both_axes() {
        let mut e = entity();
        let b = Binding::new(TargetId(1), &e, Property::Skew(1.0));
        b.apply(&mut e, &frame(500.0, 1000.0), &mut Rng::default());
        assert_eq!(e.skew, Vec2::splat(0.5));
    }

    #[test]
    fn point_curves_each_axis() {
        let mut e = entity().with_pos(Vec2::new(10.0, 10.0));
        let b = Binding::new(TargetId(1), &e, Property::Position(Vec2::new(20.0, 0.0)));
        b.apply(&mut e, &frame(500.0, 1000.0), &mut Rng::default());
        assert_eq!(e.pos, Vec2::new(15.0, 5.0));
    }

    #[test]
    fn face_turns_the_short_way() {
        let mut e = entity().with_rotation(0.1);
        // Straight down the negative x axis is a bearing of π.
        let b = Binding::new(TargetId(1), &e, Property::Face(Vec2::new(-10.0, -0.0001)));
        match &b.strategy {
            Strategy::Face { span } => assert!(span.delta.abs() <= PI),
            other => panic!("expected face strategy, got {:?}", other),
        }
        b.apply(&mut e, &frame(1000.0, 1000.0), &mut Rng::default());
        let d = shortest_angle(e.rotation, -PI);
        assert!(d.abs() < 1e-3, "rotation {} does not face the point", e.rotation);
    }

    #[test]
    fn tint_steps_without_blending() {
        let mut e = entity();
        let b = Binding::new(TargetId(1), &e, Property::Tint(vec![0xff0000, 0x00ff00, 0x0000ff]));
        let mut rng = Rng::default();
        b.apply(&mut e, &frame(100.0, 1000.0), &mut rng);
        assert_eq!(e.tint, 0xff0000);
        b.apply(&mut e, &frame(500.0, 1000.0), &mut rng);
        assert_eq!(e.tint, 0x00ff00);
        b.apply(&mut e, &frame(1000.0, 1000.0), &mut rng);
        assert_eq!(e.tint, 0x0000ff);
    }

    #[test]
    fn single_color_starts_from_current_tint() {
        let e = entity().with_tint(0x123456);
        let b = Binding::new(TargetId(1), &e, Property::Blend(vec![0xffffff]));
        match &b.strategy {
            Strategy::Blend { colors, span } => {
                assert_eq!(colors, &vec![0x123456, 0xffffff]);
                assert_eq!(span.delta, 2.0);
            }
            other => panic!("expected blend strategy, got {:?}", other),
        }
    }

    #[test]
    fn blend_boundaries() {
        let colors = [0xff0000, 0x0000ff];
        assert_eq!(blend_at(&colors, 0.0, ColorWrap::Clamp), 0xff0000);
        let near = blend_at(&colors, 0.999, ColorWrap::Clamp);
        let (r, g, b) = color::split(near);
        assert!(r <= 1 && g == 0 && b >= 254, "got {:06x}", near);
    }

    #[test]
    fn blend_wraps_past_last_color() {
        let colors = [0xff0000, 0x00ff00, 0x0000ff];
        assert_eq!(blend_at(&colors, 2.5, ColorWrap::Clamp), 0x0000ff);
        assert_eq!(blend_at(&colors, 2.5, ColorWrap::First), color::blend(0x0000ff, 0xff0000, 0.5));
        assert_eq!(blend_at(&colors, 2.5, ColorWrap::Previous), color::blend(0x0000ff, 0x00ff00, 0.5));
    }

    #[test]
    fn blend_end_of_phase_lands_on_wrap_color() {
        let colors = [0xff0000, 0x00ff00, 0x0000ff];
        assert_eq!(blend_at(&colors, 3.0, ColorWrap::First), 0xff0000);
        assert_eq!(blend_at(&colors, 3.0, ColorWrap::Previous), 0x00ff00);
        assert_eq!(blend_at(&colors, 3.0, ColorWrap::Clamp), 0x0000ff);
        assert_eq!(blend_at(&colors, 7.0, ColorWrap::Clamp), 0x0000ff);
    }

    #[test]
    fn shake_stays_within_half_radius() {
        let start = Vec2::new(50.0, -20.0);
        let mut e = entity().with_pos(start);
        let b = Binding::new(TargetId(1), &e, Property::Shake(10.0));
        let mut rng = Rng::new(99);
        for i in 0..5000 {
            b.apply(&mut e, &frame(i as f32, 1000.0), &mut rng);
            let d = e.pos - start;
            assert!(d.x.abs() <= 5.0 && d.y.abs() <= 5.0, "offset {:?} exceeds radius", d);
        }
        b.complete(&mut e);
        assert_eq!(e.pos, start);
    }

    #[test]
    fn shake_ignores_reverse() {
        let e = entity();
        let mut b = Binding::new(TargetId(1), &e, Property::Shake(4.0));
        let before = b.clone();
        b.reverse();
        assert_eq!(b, before);
    }

    #[test]
    fn reset_restores_start() {
        let mut e = entity().with_pos(Vec2::new(1.0, 2.0));
        let b = Binding::new(TargetId(1), &e, Property::Y(10.0));
        b.apply(&mut e, &frame(1000.0, 1000.0), &mut Rng::default());
        assert_eq!(e.pos.y, 10.0);
        b.reset(&mut e);
        assert_eq!(e.pos, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn filters_match_target_and_kind() {
        let e = entity();
        let b = Binding::new(TargetId(1), &e, Property::X(1.0));
        assert!(b.matches(None, None));
        assert!(b.matches(Some(TargetId(1)), Some(&[PropertyKind::X])));
        assert!(!b.matches(Some(TargetId(2)), None));
        assert!(!b.matches(None, Some(&[PropertyKind::Y])));
    }
}
