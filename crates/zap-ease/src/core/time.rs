// core/time.rs
//
// Frame timing for tween groups: the host frame-tick source contract and a
// clock that turns frame timestamps into clamped elapsed milliseconds.

/// A host-provided frame-tick source (display refresh callback, external ticker...).
///
/// The group asks for one frame at a time. When the frame fires, the host
/// calls [`TweenGroup::frame`](crate::TweenGroup::frame) with the frame timestamp.
pub trait FrameSource {
    /// Ask for the next frame.
    fn request(&mut self);
    /// Drop any outstanding frame request.
    fn cancel(&mut self);
    /// Current time in milliseconds, on the same clock as frame timestamps.
    fn now(&self) -> f64;
}

/// Inert frame source for hosts that drive groups with
/// [`TweenGroup::update`](crate::TweenGroup::update) themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualFrames;

impl FrameSource for ManualFrames {
    fn request(&mut self) {}
    fn cancel(&mut self) {}
    fn now(&self) -> f64 {
        0.0
    }
}

/// Converts frame timestamps into elapsed milliseconds, capped per frame.
///
/// The cap keeps a long stall (a backgrounded tab, a debugger pause) from
/// skipping whole phases in one step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f32,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self { max_delta, last: None }
    }

    /// Restart measuring from `now` (called when the group arms its frame source).
    pub fn reset(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Forget the last timestamp; the next frame measures zero elapsed time.
    pub fn stop(&mut self) {
        self.last = None;
    }

    /// Elapsed milliseconds since the previous frame, clamped to `[0, max_delta]`.
    pub fn advance(&mut self, now: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        self.clamp(elapsed)
    }

    /// Cap an externally measured frame delta.
    pub fn clamp(&self, elapsed: f32) -> f32 {
        elapsed.max(0.0).min(self.max_delta)
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta;
    }
}
