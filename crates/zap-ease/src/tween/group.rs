// tween/group.rs
//
// Tween group: owns many tweens and bridges them to a frame source.
// Completely decoupled from any scene: targets are looked up through a
// TargetStore passed into every call that touches them.
//
// Usage:
//   let mut tweens = TweenGroup::new(TweenConfig::default());
//   tweens.add(&scene, &[id], vec![Property::X(100.0)], &TweenOptions::new())?;
//   tweens.update(dt_ms, &mut scene);  // Advances all tweens, writes targets

use std::collections::VecDeque;
use glam::Vec2;
use crate::api::config::{TweenConfig, TweenOptions};
use crate::api::target::{AxisPair, Field, TargetStore};
use crate::api::types::{EaseEvent, EaseEventKind, TargetId, TweenId};
use crate::core::rng::Rng;
use crate::core::time::{FrameClock, FrameSource, ManualFrames};
use crate::error::EaseError;
use crate::extensions::easing::CurveTable;
use super::binding::Binding;
use super::property::{bearing, shortest_angle, Property, PropertyKind};
use super::session::Tween;

/// Default number of events kept for [`TweenGroup::drain_events`].
pub const DEFAULT_EVENT_QUEUE: usize = 1024;

/// Synchronous observer. Receives every event as it is emitted and may
/// queue changes to the group through [`Commands`].
pub type Listener = Box<dyn FnMut(&EaseEvent, &mut Commands)>;

#[derive(Debug, Clone)]
enum Command {
    Add {
        targets: Vec<TargetId>,
        properties: Vec<Property>,
        options: TweenOptions,
    },
    Remove {
        target: Option<TargetId>,
        kinds: Option<Vec<PropertyKind>>,
    },
    RemoveTween(TweenId),
    Clear,
}

/// Changes requested by listeners. Applied as soon as the tween that emitted
/// the event has finished its update: removed tweens are skipped for the rest
/// of the tick and added tweens start on the next tick.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn add(&mut self, targets: &[TargetId], properties: Vec<Property>, options: TweenOptions) {
        self.queue.push(Command::Add {
            targets: targets.to_vec(),
            properties,
            options,
        });
    }

    pub fn remove(&mut self, target: Option<TargetId>, kinds: Option<&[PropertyKind]>) {
        self.queue.push(Command::Remove {
            target,
            kinds: kinds.map(|k| k.to_vec()),
        });
    }

    pub fn remove_tween(&mut self, id: TweenId) {
        self.queue.push(Command::RemoveTween(id));
    }

    pub fn clear(&mut self) {
        self.queue.push(Command::Clear);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Manages all active tweens.
pub struct TweenGroup<F: FrameSource = ManualFrames> {
    tweens: Vec<Tween>,
    next_id: u32,
    config: TweenConfig,
    curves: CurveTable,
    clock: FrameClock,
    source: F,
    /// Whether a frame request is outstanding.
    armed: bool,
    rng: Rng,
    /// Events emitted during the current tick, handed to listeners.
    pending: Vec<EaseEvent>,
    /// Events waiting to be drained by the host. Oldest are dropped past `queue_capacity`.
    queue: VecDeque<EaseEvent>,
    queue_capacity: usize,
    listeners: Vec<Listener>,
}

impl TweenGroup<ManualFrames> {
    /// A group driven by explicit [`update`](Self::update) calls.
    pub fn new(config: TweenConfig) -> Self {
        Self::with_source(config, ManualFrames)
    }
}

impl Default for TweenGroup<ManualFrames> {
    fn default() -> Self {
        Self::new(TweenConfig::default())
    }
}

impl<F: FrameSource> TweenGroup<F> {
    /// A group that arms `source` while it has live tweens.
    pub fn with_source(config: TweenConfig, source: F) -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
            clock: FrameClock::new(config.max_frame_delta),
            config,
            curves: CurveTable::standard(),
            source,
            armed: false,
            rng: Rng::default(),
            pending: Vec::new(),
            queue: VecDeque::new(),
            queue_capacity: DEFAULT_EVENT_QUEUE,
            listeners: Vec::new(),
        }
    }

    /// Replace the named-curve table used to resolve `ease` names.
    pub fn with_curves(mut self, curves: CurveTable) -> Self {
        self.curves = curves;
        self
    }

    /// Seed the generator behind shake jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    /// Keep at most `capacity` undrained events for polling hosts.
    /// Zero turns the queue off; listeners still see every event.
    pub fn with_event_queue(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self.queue.truncate(capacity);
        self
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    pub fn curves_mut(&mut self) -> &mut CurveTable {
        &mut self.curves
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Register a synchronous observer.
    pub fn on(&mut self, listener: impl FnMut(&EaseEvent, &mut Commands) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Create a tween animating every property on every target, sharing one timeline.
    /// Targets missing from the store are skipped.
    pub fn add<S>(
        &mut self,
        store: &S,
        targets: &[TargetId],
        properties: Vec<Property>,
        options: &TweenOptions,
    ) -> Result<TweenId, EaseError>
    where
        S: TargetStore + ?Sized,
    {
        let (phase, wait) = options.resolve(&self.config, &self.curves)?;
        let id = TweenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let mut tween = Tween::new(id, phase, wait);
        for &target_id in targets {
            match store.target(target_id) {
                Some(target) if !target.is_destroyed() => {
                    for property in &properties {
                        tween.push(Binding::new(target_id, target, property.clone()));
                    }
                }
                _ => log::warn!("tween {:?}: target {:?} not found, skipping", id, target_id),
            }
        }

        log::debug!(
            "tween {:?}: {} binding(s), {}ms, reverse={}, repeat={:?}",
            id,
            tween.len(),
            phase.duration,
            phase.reverse,
            phase.repeat
        );

        let was_empty = self.tweens.is_empty();
        self.tweens.push(tween);
        if was_empty {
            self.arm();
        }
        Ok(id)
    }

    /// Move a target to `destination` at `speed` units per millisecond.
    pub fn target<S>(
        &mut self,
        store: &S,
        id: TargetId,
        destination: Vec2,
        speed: f32,
        options: &TweenOptions,
    ) -> Result<TweenId, EaseError>
    where
        S: TargetStore + ?Sized,
    {
        let distance = store
            .target(id)
            .map(|t| t.pair(AxisPair::Position).distance(destination))
            .unwrap_or(0.0);
        let options = options.clone().with_duration(travel_time(distance, speed));
        self.add(store, &[id], vec![Property::Position(destination)], &options)
    }

    /// Rotate a target to face `point` at `speed` radians per millisecond,
    /// the short way round.
    pub fn face<S>(
        &mut self,
        store: &S,
        id: TargetId,
        point: Vec2,
        speed: f32,
        options: &TweenOptions,
    ) -> Result<TweenId, EaseError>
    where
        S: TargetStore + ?Sized,
    {
        let turn = store
            .target(id)
            .map(|t| {
                let rotation = t.field(&Field::Rotation);
                shortest_angle(rotation, bearing(t.pair(AxisPair::Position), point))
            })
            .unwrap_or(0.0);
        let options = options.clone().with_duration(travel_time(turn.abs(), speed));
        self.add(store, &[id], vec![Property::Face(point)], &options)
    }

    /// Remove matching bindings from every tween. `None` matches everything,
    /// so `remove(None, None)` clears the group.
    pub fn remove(&mut self, target: Option<TargetId>, kinds: Option<&[PropertyKind]>) {
        if target.is_none() && kinds.is_none() {
            self.clear();
            return;
        }
        for tween in &mut self.tweens {
            tween.remove(target, kinds);
        }
        self.tweens.retain(|t| {
            if t.is_empty() {
                log::debug!("tween {:?}: removed", t.id());
            }
            !t.is_empty()
        });
        if self.tweens.is_empty() {
            self.disarm();
        }
    }

    /// Remove a single tween by handle.
    pub fn remove_tween(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.id() != id);
        let removed = self.tweens.len() != before;
        if self.tweens.is_empty() {
            self.disarm();
        }
        removed
    }

    /// Drop every tween and any outstanding frame request.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.disarm();
    }

    /// Tear the group down: tweens, listeners and pending events are dropped
    /// and the frame source is cancelled whether or not it looked armed.
    pub fn destroy(&mut self) {
        self.tweens.clear();
        self.listeners.clear();
        self.pending.clear();
        self.queue.clear();
        self.source.cancel();
        self.armed = false;
        self.clock.stop();
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|t| t.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tween> {
        self.tweens.iter()
    }

    /// Number of live tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Number of tweens that will advance on the next tick.
    pub fn count_running(&self) -> usize {
        self.tweens.iter().filter(|t| !t.is_paused()).count()
    }

    /// Number of distinct targets being animated.
    pub fn count_targets(&self) -> usize {
        let mut ids: Vec<TargetId> = self.tweens.iter().flat_map(|t| t.targets()).collect();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        ids.len()
    }

    pub fn pause(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.pause();
        }
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.resume();
        }
    }

    pub fn pause_all(&mut self) {
        for tween in &mut self.tweens {
            tween.pause();
        }
    }

    pub fn resume_all(&mut self) {
        for tween in &mut self.tweens {
            tween.resume();
        }
    }

    /// Drain queued events (for hosts that poll instead of listening).
    pub fn drain_events(&mut self) -> impl Iterator<Item = EaseEvent> + '_ {
        self.queue.drain(..)
    }

    /// Number of events waiting in the poll queue.
    pub fn queued_events(&self) -> usize {
        self.queue.len()
    }

    /// Handle a frame from the frame source at timestamp `now` (ms).
    /// Returns the number of tweens that finished.
    pub fn frame<S>(&mut self, now: f64, store: &mut S) -> usize
    where
        S: TargetStore + ?Sized,
    {
        // The request that produced this frame has been consumed.
        self.armed = false;
        let elapsed = self.clock.advance(now);
        let finished = self.advance(elapsed, store);
        if !self.tweens.is_empty() && self.config.use_auto_tick && !self.armed {
            self.source.request();
            self.armed = true;
        }
        finished
    }

    /// Advance every tween by `elapsed` milliseconds (capped at `max_frame_delta`).
    /// Returns the number of tweens that finished.
    pub fn update<S>(&mut self, elapsed: f32, store: &mut S) -> usize
    where
        S: TargetStore + ?Sized,
    {
        let elapsed = self.clock.clamp(elapsed);
        self.advance(elapsed, store)
    }

    fn advance<S>(&mut self, elapsed: f32, store: &mut S) -> usize
    where
        S: TargetStore + ?Sized,
    {
        // Tweens added or removed by listeners during this pass must not
        // disturb it, so walk a snapshot of ids and look each one up.
        let snapshot: Vec<TweenId> = self.tweens.iter().map(|t| t.id()).collect();
        if snapshot.is_empty() {
            return 0;
        }

        let mut finished = Vec::new();
        let mut advanced = false;
        for id in snapshot {
            let Some(index) = self.tweens.iter().position(|t| t.id() == id) else {
                continue;
            };
            let tween = &mut self.tweens[index];
            if tween.is_paused() {
                continue;
            }
            advanced = true;
            let mark = self.pending.len();
            if tween.update(elapsed, store, &mut self.rng, &mut self.pending) {
                log::debug!("tween {:?}: finished", id);
                finished.push(id);
            }
            self.dispatch(mark, store);
        }

        let count = finished.len();
        self.tweens.retain(|t| !finished.contains(&t.id()));

        if advanced {
            let mark = self.pending.len();
            self.pending.push(EaseEvent::group(EaseEventKind::Each));
            if self.tweens.is_empty() {
                self.pending.push(EaseEvent::group(EaseEventKind::Complete));
            }
            self.dispatch(mark, store);
        }
        self.flush_events();

        if self.tweens.is_empty() {
            self.disarm();
        }
        count
    }

    /// Hand events from `from` onward to listeners, then apply their commands.
    fn dispatch<S>(&mut self, from: usize, store: &mut S)
    where
        S: TargetStore + ?Sized,
    {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        let mut commands = Commands::default();
        for event in &self.pending[from..] {
            for listener in listeners.iter_mut() {
                listener(event, &mut commands);
            }
        }
        // Keep any listener registered meanwhile (none can be, but stay additive).
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
        self.apply(commands, store);
    }

    fn apply<S>(&mut self, commands: Commands, store: &mut S)
    where
        S: TargetStore + ?Sized,
    {
        for command in commands.queue {
            match command {
                Command::Add { targets, properties, options } => {
                    if let Err(err) = self.add(&*store, &targets, properties, &options) {
                        log::warn!("listener add failed: {}", err);
                    }
                }
                Command::Remove { target, kinds } => self.remove(target, kinds.as_deref()),
                Command::RemoveTween(id) => {
                    self.remove_tween(id);
                }
                Command::Clear => self.clear(),
            }
        }
    }

    /// Move this tick's events to the poll queue, dropping the oldest past capacity.
    fn flush_events(&mut self) {
        if self.queue_capacity == 0 {
            self.pending.clear();
            return;
        }
        for event in self.pending.drain(..) {
            if self.queue.len() >= self.queue_capacity {
                self.queue.pop_front();
            }
            self.queue.push_back(event);
        }
    }

    fn arm(&mut self) {
        if self.config.use_auto_tick && !self.armed {
            self.clock.reset(self.source.now());
            self.source.request();
            self.armed = true;
        }
    }

    fn disarm(&mut self) {
        if self.armed {
            self.source.cancel();
            self.armed = false;
        }
    }
}

fn travel_time(distance: f32, speed: f32) -> f32 {
    if speed > 0.0 {
        distance / speed
    } else {
        0.0
    }
}
