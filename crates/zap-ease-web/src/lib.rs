//! Browser bridge for zap-ease: a `requestAnimationFrame` frame source and a
//! runner that owns a tween group together with its target store.
//!
//! ```ignore
//! thread_local! {
//!     static RUNNER: RefCell<Option<TweenRunner<Scene>>> = RefCell::new(None);
//! }
//!
//! #[wasm_bindgen]
//! pub fn tweens_init(config: &str) {
//!     zap_ease_web::init_logging();
//!     let config = TweenConfig::from_json(config).unwrap_or_default();
//!     let frames = RafFrames::new(|now| with_runner(|r| { r.frame(now); }));
//!     RUNNER.with(|cell| *cell.borrow_mut() = Some(TweenRunner::new(config, frames, Scene::new())));
//! }
//! ```

pub mod raf;
pub mod runner;

pub use raf::RafFrames;
pub use runner::TweenRunner;

/// Route `log` to the browser console and panics to `console.error`.
/// Safe to call more than once.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
