use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// A single-shot `requestAnimationFrame` callback.
///
/// At most one frame is ever pending: `request()` cancels anything already
/// scheduled before scheduling again, so a burst of calls within one
/// event-loop turn collapses into a single invocation of the callback.
pub(crate) struct AnimationFrameHandler {
    window: web_sys::Window,
    closure: Closure<dyn FnMut()>,
    handle: Rc<Cell<Option<i32>>>,
}

impl AnimationFrameHandler {
    pub fn new<F>(window: web_sys::Window, mut f: F) -> Self
    where
        F: 'static + FnMut(),
    {
        let handle = Rc::new(Cell::new(None));
        let closure = Closure::new({
            let handle = handle.clone();
            move || {
                handle.set(None);
                f();
            }
        });

        Self { window, closure, handle }
    }

    pub fn request(&self) {
        self.cancel();

        let handle = self
            .window
            .request_animation_frame(self.closure.as_ref().unchecked_ref())
            .expect("Failed to request animation frame");

        self.handle.set(Some(handle));
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.handle.take() {
            self.window.cancel_animation_frame(handle).expect("Failed to cancel animation frame");
        }
    }
}

impl Drop for AnimationFrameHandler {
    fn drop(&mut self) {
        self.cancel();
    }
}
