/// Identifier of a tween target inside a [`TargetStore`](crate::TargetStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// Handle to a tween session owned by a [`TweenGroup`](crate::TweenGroup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Lifecycle notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseEventKind {
    /// Fired every tick while a delay is counting down.
    Wait,
    /// Fired once when the delay expires.
    WaitEnd,
    /// Fired every tick a tween (or the group) has live work.
    Each,
    /// A phase boundary flipped direction.
    Reverse,
    /// A phase boundary restarted from the start values.
    Repeat,
    /// A tween finished, or the group drained to empty.
    Complete,
}

/// Who emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Tween(TweenId),
    Group,
}

/// A lifecycle event queued by a tween or its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EaseEvent {
    pub kind: EaseEventKind,
    pub source: EventSource,
}

impl EaseEvent {
    pub fn tween(id: TweenId, kind: EaseEventKind) -> Self {
        Self { kind, source: EventSource::Tween(id) }
    }

    pub fn group(kind: EaseEventKind) -> Self {
        Self { kind, source: EventSource::Group }
    }

    /// The emitting tween, if the event did not come from the group.
    pub fn tween_id(&self) -> Option<TweenId> {
        match self.source {
            EventSource::Tween(id) => Some(id),
            EventSource::Group => None,
        }
    }
}
