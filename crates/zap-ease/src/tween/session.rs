// tween/session.rs
//
// A tween session: one timeline shared by any number of bindings.
// Phase configuration is immutable; the counters that change at phase
// boundaries live in PhaseState and move forward through `boundary()`.

use crate::api::config::Repeat;
use crate::api::target::TargetStore;
use crate::api::types::{EaseEvent, EaseEventKind, TargetId, TweenId};
use crate::core::rng::Rng;
use crate::extensions::easing::Curve;
use super::binding::{Binding, ColorWrap, Frame};
use super::property::PropertyKind;

/// Fixed shape of every phase of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseConfig {
    /// Phase duration in milliseconds.
    pub duration: f32,
    pub curve: Curve,
    pub reverse: bool,
    pub repeat: Repeat,
}

/// What happened at a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Reverse,
    Repeat,
    Complete,
}

/// Mutable timeline counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    /// Position within the current phase, `0 ≤ elapsed ≤ duration`.
    pub elapsed: f32,
    /// Remaining delay before the clock starts.
    pub wait: f32,
    pub reverse: bool,
    pub repeat: Repeat,
}

impl PhaseState {
    pub fn new(config: &PhaseConfig, wait: f32) -> Self {
        Self {
            elapsed: 0.0,
            wait,
            reverse: config.reverse,
            repeat: config.repeat,
        }
    }

    /// Decide the transition at the end of a phase and the counters after it.
    ///
    /// Reverse wins over repeat. A pending reverse is consumed unless a repeat
    /// is also pending, in which case the repeat is counted off instead and the
    /// tween keeps ping-ponging.
    pub fn boundary(self) -> (Boundary, PhaseState) {
        if self.reverse {
            let next = if self.repeat.is_active() {
                PhaseState { repeat: self.repeat.decrement(), ..self }
            } else {
                PhaseState { reverse: false, ..self }
            };
            (Boundary::Reverse, next)
        } else if self.repeat.is_active() {
            (Boundary::Repeat, PhaseState { repeat: self.repeat.decrement(), ..self })
        } else {
            (Boundary::Complete, self)
        }
    }

    /// Where blends head after the last color, given what the next boundary will do.
    pub fn wrap(&self) -> ColorWrap {
        if self.reverse {
            ColorWrap::Previous
        } else if self.repeat.is_active() {
            ColorWrap::First
        } else {
            ColorWrap::Clamp
        }
    }
}

/// One timeline driving a set of bindings in lockstep.
#[derive(Debug, Clone)]
pub struct Tween {
    id: TweenId,
    bindings: Vec<Binding>,
    config: PhaseConfig,
    state: PhaseState,
    paused: bool,
    /// Latched once `update` has reported completion.
    finished: bool,
}

impl Tween {
    pub fn new(id: TweenId, config: PhaseConfig, wait: f32) -> Self {
        Self {
            id,
            bindings: Vec::new(),
            state: PhaseState::new(&config, wait),
            config,
            paused: false,
            finished: false,
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<Binding>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Distinct targets this tween still animates, in binding order.
    pub fn targets(&self) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = Vec::new();
        for b in &self.bindings {
            if !ids.contains(&b.target) {
                ids.push(b.target);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Normalized progress through the current phase [0, 1].
    pub fn progress(&self) -> f32 {
        if self.config.duration <= 0.0 {
            1.0
        } else {
            (self.state.elapsed / self.config.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.state.wait > 0.0
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Drop bindings matching the filter. Returns how many were removed.
    pub fn remove(&mut self, target: Option<TargetId>, kinds: Option<&[PropertyKind]>) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|b| !b.matches(target, kinds));
        before - self.bindings.len()
    }

    /// Advance the timeline by `elapsed` milliseconds and write every binding.
    /// Returns `true` once the tween has finished; later calls write nothing.
    pub fn update<S>(&mut self, elapsed: f32, targets: &mut S, rng: &mut Rng, events: &mut Vec<EaseEvent>) -> bool
    where
        S: TargetStore + ?Sized,
    {
        if self.finished {
            return true;
        }
        if self.bindings.is_empty() {
            self.finished = true;
            return true;
        }

        let mut elapsed = elapsed.max(0.0);
        if self.state.wait > 0.0 {
            self.state.wait -= elapsed;
            if self.state.wait > 0.0 {
                self.emit(events, EaseEventKind::Wait);
                return false;
            }
            // Overshoot past the delay is spent on the first phase.
            elapsed = -self.state.wait;
            self.state.wait = 0.0;
            self.emit(events, EaseEventKind::WaitEnd);
        }

        let duration = self.config.duration.max(0.0);
        self.state.elapsed += elapsed;
        let mut leftover = 0.0;
        if self.state.elapsed >= duration {
            leftover = self.state.elapsed - duration;
            self.state.elapsed = duration;
        }

        self.apply(targets, rng);
        self.emit(events, EaseEventKind::Each);

        if self.state.elapsed < duration {
            return false;
        }

        let (boundary, next) = self.state.boundary();
        match boundary {
            Boundary::Reverse => {
                for b in &mut self.bindings {
                    b.reverse();
                }
                self.state = PhaseState { elapsed: leftover, ..next };
                if leftover > 0.0 {
                    self.apply(targets, rng);
                }
                self.emit(events, EaseEventKind::Reverse);
                false
            }
            Boundary::Repeat => {
                for b in &self.bindings {
                    if let Some(target) = targets.target_mut(b.target) {
                        b.reset(target);
                    }
                }
                self.state = PhaseState { elapsed: leftover, ..next };
                if leftover > 0.0 {
                    self.apply(targets, rng);
                }
                self.emit(events, EaseEventKind::Repeat);
                false
            }
            Boundary::Complete => {
                for b in &self.bindings {
                    if let Some(target) = targets.target_mut(b.target) {
                        b.complete(target);
                    }
                }
                self.emit(events, EaseEventKind::Complete);
                self.finished = true;
                true
            }
        }
    }

    /// Write every binding at the current elapsed time, dropping bindings
    /// whose target is gone.
    fn apply<S>(&mut self, targets: &mut S, rng: &mut Rng)
    where
        S: TargetStore + ?Sized,
    {
        let duration = self.config.duration.max(0.0);
        let frame = Frame {
            elapsed: self.state.elapsed.min(duration),
            duration,
            curve: &self.config.curve,
            wrap: self.state.wrap(),
        };
        let id = self.id;
        self.bindings.retain(|b| match targets.target_mut(b.target) {
            Some(target) if !target.is_destroyed() => {
                b.apply(target, &frame, rng);
                true
            }
            _ => {
                log::debug!("tween {:?}: dropping {} on destroyed target {:?}", id, b.kind.name(), b.target);
                false
            }
        });
    }

    fn emit(&self, events: &mut Vec<EaseEvent>, kind: EaseEventKind) {
        events.push(EaseEvent::tween(self.id, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use crate::api::target::TargetStore;
    use crate::components::entity::Entity;
    use crate::core::scene::Scene;
    use crate::extensions::color;
    use crate::extensions::easing::Easing;
    use crate::tween::property::Property;

    const TARGET: TargetId = TargetId(1);
    const RED: u32 = 0xff0000;
    const BLUE: u32 = 0x0000ff;

    fn phase(duration: f32, reverse: bool, repeat: Repeat) -> PhaseConfig {
        PhaseConfig { duration, curve: Curve::Easing(Easing::Linear), reverse, repeat }
    }

    fn setup(props: Vec<Property>, config: PhaseConfig, wait: f32) -> (Scene, Tween) {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(TARGET));
        let bindings = {
            let target = scene.target(TARGET).unwrap();
            props.into_iter().map(|p| Binding::new(TARGET, target, p)).collect()
        };
        (scene, Tween::new(TweenId(0), config, wait).with_bindings(bindings))
    }

    fn kinds(events: &[EaseEvent]) -> Vec<EaseEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    fn x(scene: &Scene) -> f32 {
        scene.get(TARGET).unwrap().pos.x
    }

    #[test]
    fn single_update_reaches_goal() {
        let (mut scene, mut tween) = setup(vec![Property::X(100.0)], phase(1000.0, false, Repeat::Never), 0.0);
        let mut events = Vec::new();
        let finished = tween.update(1000.0, &mut scene, &mut Rng::default(), &mut events);
        assert!(finished);
        assert_eq!(x(&scene), 100.0);
        assert_eq!(kinds(&events), vec![EaseEventKind::Each, EaseEventKind::Complete]);
    }

    #[test]
    fn uneven_steps_summing_to_duration_reach_goal() {
        let config = PhaseConfig { curve: Curve::Easing(Easing::CubicInOut), ..phase(1000.0, false, Repeat::Never) };
        let (mut scene, mut tween) = setup(vec![Property::X(100.0), Property::Alpha(0.0)], config, 0.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        let steps = [16.0, 17.0, 250.0, 1.0, 300.0, 416.0];
        let mut finished = false;
        for dt in steps {
            assert!(!finished);
            finished = tween.update(dt, &mut scene, &mut rng, &mut events);
        }
        assert!(finished);
        let e = scene.get(TARGET).unwrap();
        assert!((e.pos.x - 100.0).abs() < 1e-3);
        assert!(e.alpha.abs() < 1e-5);
    }

    #[test]
    fn empty_tween_is_finished_immediately() {
        let (mut scene, mut tween) = setup(vec![], phase(1000.0, false, Repeat::Forever), 0.0);
        let mut events = Vec::new();
        assert!(tween.update(16.0, &mut scene, &mut Rng::default(), &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn reverse_round_trip_returns_to_start() {
        let (mut scene, mut tween) = setup(
            vec![Property::Position(Vec2::new(40.0, -40.0))],
            phase(500.0, true, Repeat::Never),
            0.0,
        );
        let mut rng = Rng::default();
        let mut events = Vec::new();
        assert!(!tween.update(500.0, &mut scene, &mut rng, &mut events));
        assert_eq!(scene.get(TARGET).unwrap().pos, Vec2::new(40.0, -40.0));
        assert!(tween.update(500.0, &mut scene, &mut rng, &mut events));
        assert_eq!(scene.get(TARGET).unwrap().pos, Vec2::ZERO);
        assert_eq!(
            kinds(&events),
            vec![EaseEventKind::Each, EaseEventKind::Reverse, EaseEventKind::Each, EaseEventKind::Complete]
        );
    }

    #[test]
    fn finite_repeat_runs_exact_count() {
        let (mut scene, mut tween) = setup(vec![Property::X(10.0)], phase(100.0, false, Repeat::Times(3)), 0.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        let mut phases = 0;
        while !tween.update(100.0, &mut scene, &mut rng, &mut events) {
            phases += 1;
            assert!(phases < 10, "repeat never terminated");
        }
        let repeats = events.iter().filter(|e| e.kind == EaseEventKind::Repeat).count();
        assert_eq!(repeats, 3);
        assert_eq!(phases, 3);
        assert_eq!(x(&scene), 10.0);
    }

    #[test]
    fn endless_repeat_never_finishes() {
        let (mut scene, mut tween) = setup(vec![Property::X(10.0)], phase(100.0, false, Repeat::Forever), 0.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        for _ in 0..500 {
            assert!(!tween.update(100.0, &mut scene, &mut rng, &mut events));
        }
    }

    #[test]
    fn repeat_resets_and_carries_leftover() {
        let (mut scene, mut tween) = setup(vec![Property::X(100.0)], phase(100.0, false, Repeat::Forever), 0.0);
        let mut events = Vec::new();
        tween.update(130.0, &mut scene, &mut Rng::default(), &mut events);
        assert!((tween.state().elapsed - 30.0).abs() < 1e-4);
        assert!((x(&scene) - 30.0).abs() < 1e-3, "x was {}", x(&scene));
    }

    #[test]
    fn reverse_carries_leftover() {
        let (mut scene, mut tween) = setup(vec![Property::X(100.0)], phase(100.0, true, Repeat::Never), 0.0);
        let mut events = Vec::new();
        tween.update(125.0, &mut scene, &mut Rng::default(), &mut events);
        assert!((x(&scene) - 75.0).abs() < 1e-3, "x was {}", x(&scene));
    }

    #[test]
    fn reverse_with_repeat_keeps_ping_ponging() {
        let (mut scene, mut tween) = setup(vec![Property::X(10.0)], phase(100.0, true, Repeat::Times(1)), 0.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        let mut boundaries = Vec::new();
        for _ in 0..3 {
            let done = tween.update(100.0, &mut scene, &mut rng, &mut events);
            boundaries.push((*events.last().unwrap()).kind);
            if done {
                break;
            }
        }
        assert_eq!(
            boundaries,
            vec![EaseEventKind::Reverse, EaseEventKind::Reverse, EaseEventKind::Complete]
        );
        assert_eq!(x(&scene), 10.0);
    }

    #[test]
    fn wait_delays_then_spends_overshoot() {
        let (mut scene, mut tween) = setup(vec![Property::X(100.0)], phase(100.0, false, Repeat::Never), 50.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        assert!(!tween.update(30.0, &mut scene, &mut rng, &mut events));
        assert!(tween.is_waiting());
        assert_eq!(x(&scene), 0.0);
        assert!(!tween.update(40.0, &mut scene, &mut rng, &mut events));
        assert!(!tween.is_waiting());
        assert!((x(&scene) - 20.0).abs() < 1e-3);
        assert_eq!(
            kinds(&events),
            vec![EaseEventKind::Wait, EaseEventKind::WaitEnd, EaseEventKind::Each]
        );
    }

    #[test]
    fn destroyed_targets_are_dropped() {
        let (mut scene, mut tween) = setup(vec![Property::X(100.0)], phase(100.0, false, Repeat::Never), 0.0);
        scene.get_mut(TARGET).unwrap().destroy();
        let mut events = Vec::new();
        assert!(!tween.update(10.0, &mut scene, &mut Rng::default(), &mut events));
        assert!(tween.is_empty());
        assert_eq!(kinds(&events), vec![EaseEventKind::Each]);
        assert!(tween.update(10.0, &mut scene, &mut Rng::default(), &mut events));
    }

    #[test]
    fn shake_settles_on_completion() {
        let (mut scene, mut tween) = setup(vec![Property::Shake(8.0)], phase(100.0, false, Repeat::Never), 0.0);
        let mut rng = Rng::new(3);
        let mut events = Vec::new();
        tween.update(50.0, &mut scene, &mut rng, &mut events);
        assert!(tween.update(50.0, &mut scene, &mut rng, &mut events));
        assert_eq!(scene.get(TARGET).unwrap().pos, Vec2::ZERO);
    }

    #[test]
    fn remove_filters_bindings() {
        let (_, mut tween) = setup(vec![Property::X(1.0), Property::Y(1.0)], phase(100.0, false, Repeat::Never), 0.0);
        assert_eq!(tween.remove(None, Some(&[PropertyKind::Y])), 1);
        assert_eq!(tween.len(), 1);
        assert_eq!(tween.targets(), vec![TARGET]);
        assert_eq!(tween.remove(Some(TARGET), None), 1);
        assert!(tween.is_empty());
    }

    #[test]
    fn boundary_transitions() {
        let state = PhaseState::new(&phase(1.0, true, Repeat::Never), 0.0);
        let (b, next) = state.boundary();
        assert_eq!(b, Boundary::Reverse);
        assert!(!next.reverse);
        assert_eq!(next.boundary().0, Boundary::Complete);

        let state = PhaseState::new(&phase(1.0, false, Repeat::Times(1)), 0.0);
        let (b, next) = state.boundary();
        assert_eq!(b, Boundary::Repeat);
        assert_eq!(next.repeat, Repeat::Never);
        assert_eq!(next.boundary().0, Boundary::Complete);
    }

    #[test]
    fn finished_tween_stays_finished() {
        let (mut scene, mut tween) = setup(vec![Property::X(10.0)], phase(100.0, false, Repeat::Never), 0.0);
        let mut rng = Rng::default();
        let mut events = Vec::new();
        assert!(tween.update(100.0, &mut scene, &mut rng, &mut events));
        assert!(tween.is_finished());

        scene.get_mut(TARGET).unwrap().pos.x = 7.0;
        events.clear();
        assert!(tween.update(16.0, &mut scene, &mut rng, &mut events));
        assert_eq!(x(&scene), 7.0);
        assert!(events.is_empty());
    }

    fn tint(scene: &Scene) -> u32 {
        scene.get(TARGET).unwrap().tint
    }

    #[test]
    fn blend_heads_to_first_color_before_repeat() {
        let (mut scene, mut tween) = setup(
            vec![Property::Blend(vec![RED, BLUE])],
            phase(100.0, false, Repeat::Times(1)),
            0.0,
        );
        let mut rng = Rng::default();
        let mut events = Vec::new();

        tween.update(75.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), color::blend(BLUE, RED, 0.5));

        // Boundary frame arrives at the first color, matching the restart.
        tween.update(25.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), RED);
        assert_eq!(events.last().map(|e| e.kind), Some(EaseEventKind::Repeat));

        // Final phase clamps on the last color.
        tween.update(75.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), BLUE);
        assert!(tween.update(25.0, &mut scene, &mut rng, &mut events));
        assert_eq!(tint(&scene), BLUE);
    }

    #[test]
    fn blend_heads_to_previous_color_before_reverse() {
        let (mut scene, mut tween) = setup(
            vec![Property::Blend(vec![RED, BLUE])],
            phase(100.0, true, Repeat::Never),
            0.0,
        );
        let mut rng = Rng::default();
        let mut events = Vec::new();

        tween.update(75.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), color::blend(BLUE, RED, 0.5));

        tween.update(25.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), RED);
        assert_eq!(events.last().map(|e| e.kind), Some(EaseEventKind::Reverse));

        // Reverse phase walks the steps back down to the first color.
        tween.update(50.0, &mut scene, &mut rng, &mut events);
        assert_eq!(tint(&scene), BLUE);
        assert!(tween.update(50.0, &mut scene, &mut rng, &mut events));
        assert_eq!(tint(&scene), RED);
    }
}
