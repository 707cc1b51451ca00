// extensions/mod.rs
//
// Curves and color helpers. Nothing here knows about tweens or targets.

pub mod color;
pub mod easing;

pub use easing::{Easing, Curve, CurveFn, CurveRef, CurveTable};
