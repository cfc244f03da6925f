use tracing::error;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

/// Registers an event listener on construction and removes it on drop.
pub(crate) struct EventListenerHandle<T: ?Sized> {
    target: EventTarget,
    event_type: &'static str,
    capture: bool,
    listener: Closure<T>,
}

impl<T: ?Sized> EventListenerHandle<T> {
    pub fn new<U>(target: U, event_type: &'static str, listener: Closure<T>) -> Self
    where
        U: Into<EventTarget>,
    {
        Self::with_capture(target, event_type, false, listener)
    }

    pub fn with_capture<U>(
        target: U,
        event_type: &'static str,
        capture: bool,
        listener: Closure<T>,
    ) -> Self
    where
        U: Into<EventTarget>,
    {
        let target = target.into();
        target
            .add_event_listener_with_callback_and_bool(
                event_type,
                listener.as_ref().unchecked_ref(),
                capture,
            )
            .expect("Failed to add event listener");
        EventListenerHandle { target, event_type, capture, listener }
    }
}

impl<T: ?Sized> Drop for EventListenerHandle<T> {
    fn drop(&mut self) {
        if let Err(e) = self.target.remove_event_listener_with_callback_and_bool(
            self.event_type,
            self.listener.as_ref().unchecked_ref(),
            self.capture,
        ) {
            error!("Error removing `{}` listener: {e:?}", self.event_type);
        }
    }
}
