use zap_ease::{
    EaseError, EaseEvent, Property, TargetId, TargetStore,
    TweenConfig, TweenGroup, TweenId, TweenOptions,
};
use crate::raf::RafFrames;

/// Pairs a rAF-driven tween group with the store it animates.
///
/// wasm-bindgen cannot export generic structs, so hosts keep one of these in a
/// `thread_local!` and export free functions that reach it, the same way the
/// rAF callback does.
pub struct TweenRunner<S: TargetStore> {
    group: TweenGroup<RafFrames>,
    store: S,
}

impl<S: TargetStore> TweenRunner<S> {
    pub fn new(config: TweenConfig, frames: RafFrames, store: S) -> Self {
        Self {
            group: TweenGroup::with_source(config, frames),
            store,
        }
    }

    /// Called from the rAF callback with the browser timestamp.
    pub fn frame(&mut self, now: f64) -> usize {
        self.group.frame(now, &mut self.store)
    }

    /// Add a tween described in JSON, e.g.
    /// `add_json(&[1, 2], r#"{"x": 100, "alpha": 0}"#, r#"{"duration": 250}"#)`.
    pub fn add_json(&mut self, targets: &[u32], properties: &str, options: &str) -> Result<TweenId, EaseError> {
        let properties = Property::from_json(properties)?;
        let options = if options.trim().is_empty() {
            TweenOptions::new()
        } else {
            TweenOptions::from_json(options)?
        };
        let targets: Vec<TargetId> = targets.iter().map(|&id| TargetId(id)).collect();
        self.group.add(&self.store, &targets, properties, &options)
    }

    pub fn drain_events(&mut self) -> Vec<EaseEvent> {
        self.group.drain_events().collect()
    }

    pub fn group(&self) -> &TweenGroup<RafFrames> {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut TweenGroup<RafFrames> {
        &mut self.group
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Stop all tweens and release the frame source.
    pub fn destroy(&mut self) {
        self.group.destroy();
    }
}
