// extensions/easing.rs
//
// Easing curves. Pure math, no knowledge of targets or tweens.
// Tweens call curves in Penner form: ease(elapsed, start, delta, duration).

use std::collections::HashMap;
use std::f32::consts::PI;
use serde::Deserialize;
use crate::error::EaseError;

/// Built-in easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    /// Smooth start and end. The group default.
    #[default]
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    /// Overshoot then settle.
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    /// Elastic spring.
    ElasticIn,
    ElasticOut,
    ElasticInOut,
}

impl Easing {
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadIn, Easing::QuadOut, Easing::QuadInOut,
        Easing::CubicIn, Easing::CubicOut, Easing::CubicInOut,
        Easing::QuartIn, Easing::QuartOut, Easing::QuartInOut,
        Easing::QuintIn, Easing::QuintOut, Easing::QuintInOut,
        Easing::SineIn, Easing::SineOut, Easing::SineInOut,
        Easing::ExpoIn, Easing::ExpoOut, Easing::ExpoInOut,
        Easing::CircIn, Easing::CircOut, Easing::CircInOut,
        Easing::BackIn, Easing::BackOut, Easing::BackInOut,
        Easing::BounceIn, Easing::BounceOut, Easing::BounceInOut,
        Easing::ElasticIn, Easing::ElasticOut, Easing::ElasticInOut,
    ];

    /// Conventional camelCase name (`"easeInOutSine"`, `"linear"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "easeInQuad",
            Easing::QuadOut => "easeOutQuad",
            Easing::QuadInOut => "easeInOutQuad",
            Easing::CubicIn => "easeInCubic",
            Easing::CubicOut => "easeOutCubic",
            Easing::CubicInOut => "easeInOutCubic",
            Easing::QuartIn => "easeInQuart",
            Easing::QuartOut => "easeOutQuart",
            Easing::QuartInOut => "easeInOutQuart",
            Easing::QuintIn => "easeInQuint",
            Easing::QuintOut => "easeOutQuint",
            Easing::QuintInOut => "easeInOutQuint",
            Easing::SineIn => "easeInSine",
            Easing::SineOut => "easeOutSine",
            Easing::SineInOut => "easeInOutSine",
            Easing::ExpoIn => "easeInExpo",
            Easing::ExpoOut => "easeOutExpo",
            Easing::ExpoInOut => "easeInOutExpo",
            Easing::CircIn => "easeInCirc",
            Easing::CircOut => "easeOutCirc",
            Easing::CircInOut => "easeInOutCirc",
            Easing::BackIn => "easeInBack",
            Easing::BackOut => "easeOutBack",
            Easing::BackInOut => "easeInOutBack",
            Easing::BounceIn => "easeInBounce",
            Easing::BounceOut => "easeOutBounce",
            Easing::BounceInOut => "easeInOutBounce",
            Easing::ElasticIn => "easeInElastic",
            Easing::ElasticOut => "easeOutElastic",
            Easing::ElasticInOut => "easeInOutElastic",
        }
    }

    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (but can overshoot for Back/Elastic).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            // Quadratic
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            // Cubic
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            // Quartic
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }

            // Quintic
            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }

            // Sine
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            // Exponential
            Easing::ExpoIn => {
                if t == 0.0 { 0.0 } else { 2.0_f32.powf(10.0 * t - 10.0) }
            }
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            // Circular
            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            // Back (overshoot)
            Easing::BackIn => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                C3 * t * t * t - C1 * t * t
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::BackInOut => {
                const C1: f32 = 1.70158;
                const C2: f32 = C1 * 1.525;
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((C2 + 1.0) * 2.0 * t - C2) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((C2 + 1.0) * (t * 2.0 - 2.0) + C2) + 2.0) / 2.0
                }
            }

            // Bounce
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }

            // Elastic
            Easing::ElasticIn => {
                const C4: f32 = (2.0 * PI) / 3.0;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    -(2.0_f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * C4).sin()
                }
            }
            Easing::ElasticOut => {
                const C4: f32 = (2.0 * PI) / 3.0;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            Easing::ElasticInOut => {
                const C5: f32 = (2.0 * PI) / 4.5;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    -(2.0_f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * C5).sin()) / 2.0
                } else {
                    2.0_f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * C5).sin() / 2.0 + 1.0
                }
            }
        }
    }
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// A caller-supplied curve: `(elapsed, start, delta, duration) -> value`.
///
/// Expected (not enforced): `f(0, s, d, D) == s` and `f(D, s, d, D) == s + d`.
pub type CurveFn = fn(f32, f32, f32, f32) -> f32;

/// The curve a tween runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Easing(Easing),
    Custom(CurveFn),
}

impl Curve {
    /// Evaluate in Penner form. A non-positive duration jumps straight to the goal.
    #[inline]
    pub fn ease(&self, elapsed: f32, start: f32, delta: f32, duration: f32) -> f32 {
        match self {
            Curve::Easing(easing) => {
                if duration <= 0.0 {
                    start + delta
                } else {
                    start + delta * easing.apply(elapsed / duration)
                }
            }
            Curve::Custom(f) => f(elapsed, start, delta, duration),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Easing(Easing::default())
    }
}

impl From<Easing> for Curve {
    fn from(easing: Easing) -> Self {
        Curve::Easing(easing)
    }
}

impl From<CurveFn> for Curve {
    fn from(f: CurveFn) -> Self {
        Curve::Custom(f)
    }
}

/// A curve value, or a name to be looked up in a [`CurveTable`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum CurveRef {
    Named(String),
    Curve(Curve),
}

impl CurveRef {
    pub fn resolve(&self, table: &CurveTable) -> Result<Curve, EaseError> {
        match self {
            CurveRef::Curve(curve) => Ok(*curve),
            CurveRef::Named(name) => table.get(name),
        }
    }
}

impl Default for CurveRef {
    fn default() -> Self {
        CurveRef::Curve(Curve::default())
    }
}

impl From<String> for CurveRef {
    fn from(name: String) -> Self {
        CurveRef::Named(name)
    }
}

impl From<&str> for CurveRef {
    fn from(name: &str) -> Self {
        CurveRef::Named(name.to_string())
    }
}

impl From<Easing> for CurveRef {
    fn from(easing: Easing) -> Self {
        CurveRef::Curve(Curve::Easing(easing))
    }
}

impl From<Curve> for CurveRef {
    fn from(curve: Curve) -> Self {
        CurveRef::Curve(curve)
    }
}

impl From<CurveFn> for CurveRef {
    fn from(f: CurveFn) -> Self {
        CurveRef::Curve(Curve::Custom(f))
    }
}

/// Named curves, owned by whoever resolves names (usually the tween group).
#[derive(Debug, Clone)]
pub struct CurveTable {
    curves: HashMap<String, Curve>,
}

impl CurveTable {
    /// An empty table. Only curve values will resolve.
    pub fn empty() -> Self {
        Self { curves: HashMap::new() }
    }

    /// Table holding every built-in [`Easing`] under its conventional name.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for easing in Easing::ALL {
            table.register(easing.name(), easing);
        }
        table
    }

    /// Register (or replace) a named curve.
    pub fn register(&mut self, name: impl Into<String>, curve: impl Into<Curve>) {
        self.curves.insert(name.into(), curve.into());
    }

    pub fn get(&self, name: &str) -> Result<Curve, EaseError> {
        self.curves
            .get(name)
            .copied()
            .ok_or_else(|| EaseError::UnknownCurve(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl Default for CurveTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn every_easing_hits_both_ends() {
        for easing in Easing::ALL {
            let start = easing.apply(0.0);
            let end = easing.apply(1.0);
            assert!(start.abs() < 1e-4, "{} starts at {}", easing.name(), start);
            assert!((end - 1.0).abs() < 1e-4, "{} ends at {}", easing.name(), end);
        }
    }

    #[test]
    fn quad_out_faster_start() {
        let mid = Easing::QuadOut.apply(0.5);
        assert!(mid > 0.5, "QuadOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn back_overshoots() {
        let early = Easing::BackOut.apply(0.3);
        assert!(early > 0.3, "BackOut should overshoot");
    }

    #[test]
    fn penner_form_scales_by_delta() {
        let curve = Curve::Easing(Easing::Linear);
        assert!((curve.ease(250.0, 100.0, 100.0, 1000.0) - 125.0).abs() < 0.001);
        assert!((curve.ease(1000.0, 100.0, -50.0, 1000.0) - 50.0).abs() < 0.001);
    }

    #[test]
    fn zero_duration_jumps_to_goal() {
        let curve = Curve::Easing(Easing::QuadIn);
        assert_eq!(curve.ease(0.0, 3.0, 4.0, 0.0), 7.0);
    }

    #[test]
    fn custom_curve_is_called_verbatim() {
        fn step(t: f32, s: f32, d: f32, dur: f32) -> f32 {
            if t < dur { s } else { s + d }
        }
        let curve = Curve::from(step as CurveFn);
        assert_eq!(curve.ease(999.0, 1.0, 1.0, 1000.0), 1.0);
        assert_eq!(curve.ease(1000.0, 1.0, 1.0, 1000.0), 2.0);
    }

    #[test]
    fn standard_table_resolves_names() {
        let table = CurveTable::standard();
        assert_eq!(table.len(), Easing::ALL.len());
        assert_eq!(table.get("easeInOutSine").unwrap(), Curve::Easing(Easing::SineInOut));
        assert_eq!(table.get("linear").unwrap(), Curve::Easing(Easing::Linear));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let table = CurveTable::standard();
        let err = CurveRef::from("wobble").resolve(&table).unwrap_err();
        assert!(matches!(err, EaseError::UnknownCurve(ref n) if n == "wobble"));
    }

    #[test]
    fn empty_table_still_resolves_values() {
        let table = CurveTable::empty();
        let curve = CurveRef::from(Easing::CubicOut).resolve(&table).unwrap();
        assert_eq!(curve, Curve::Easing(Easing::CubicOut));
        assert!(CurveRef::from("linear").resolve(&table).is_err());
    }
}
