// tween/mod.rs
//
// The tweening engine proper: properties resolve to bindings, bindings share
// a session timeline, and a group schedules sessions against a frame source.

pub mod binding;
pub mod group;
pub mod property;
pub mod session;

pub use binding::{Binding, ColorWrap, Span, Strategy};
pub use group::{Commands, Listener, TweenGroup, DEFAULT_EVENT_QUEUE};
pub use property::{Property, PropertyKind, PropertyValue};
pub use session::{Boundary, PhaseConfig, PhaseState, Tween};
