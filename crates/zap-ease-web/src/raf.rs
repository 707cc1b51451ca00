use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use zap_ease::FrameSource;

/// Frame source backed by `requestAnimationFrame`.
///
/// At most one request is outstanding. The handle is cleared as the browser
/// fires the callback, so the group may request the next frame from inside it.
pub struct RafFrames {
    callback: Closure<dyn FnMut(f64)>,
    handle: Rc<Cell<Option<i32>>>,
}

impl RafFrames {
    /// `on_frame` receives the rAF timestamp in milliseconds. It normally
    /// forwards to `TweenGroup::frame` through the host's runner.
    pub fn new(mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let handle = Rc::new(Cell::new(None));
        let pending = Rc::clone(&handle);
        let callback = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            pending.set(None);
            on_frame(now);
        });
        Self { callback, handle }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl FrameSource for RafFrames {
    fn request(&mut self) {
        if self.is_pending() {
            return;
        }
        let Some(window) = web_sys::window() else {
            log::warn!("requestAnimationFrame: no window");
            return;
        };
        match window.request_animation_frame(self.callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }

    fn cancel(&mut self) {
        let Some(id) = self.handle.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", err);
            }
        }
    }

    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

impl Drop for RafFrames {
    fn drop(&mut self) {
        // The closure is freed with us, so nothing may stay scheduled.
        self.cancel();
    }
}
