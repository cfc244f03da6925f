//! Resize detection for arbitrary DOM elements, without relying on a native
//! [`ResizeObserver`].
//!
//! Browsers only fire `resize` events for the window itself, and the
//! [`ResizeObserver`] API that fixed this is not available everywhere. This
//! crate detects size changes of any visible element using nothing but
//! standard DOM/CSSOM primitives, through one of two interchangeable
//! strategies:
//!
//! - [`FrameSensor`] injects a hidden, same-size `<iframe>` into the target
//!   and listens for the embedded window's own `resize` event. Simple and
//!   cheap, but every native event is forwarded verbatim and the environment
//!   must support embedded browsing contexts.
//! - [`ResizeSensor`] injects synthetic scrollable "trigger" children sized so
//!   that any change to the target's box moves their scroll position, then
//!   measures the target on the next animation frame. Notifications are
//!   coalesced to one per frame and suppressed when the measured size did not
//!   actually change.
//!
//! [`SensorRegistry`] sits above [`ResizeSensor`] and memoizes one sensor per
//! element id, rejecting elements that cannot host injected children.
//!
//! Sensors own every node and listener they inject. Teardown goes through
//! `dispose()`, which is also run on drop, and is safe to call more than
//! once.
//!
//! The crate is meant to be compiled to WebAssembly with
//! [`wasm-bindgen`][wasm_bindgen] and only does useful work inside a browser
//! main thread.
//!
//! [`ResizeObserver`]: https://developer.mozilla.org/en-US/docs/Web/API/ResizeObserver
//! [wasm_bindgen]: https://docs.rs/wasm-bindgen

mod animation;
mod animation_frame;
mod event_handle;
mod frame;
mod registry;
mod trigger;

use web_sys::HtmlElement;

pub use self::animation::{AnimationProperties, AnimationSupport};
pub use self::frame::FrameSensor;
pub use self::registry::SensorRegistry;
pub use self::trigger::ResizeSensor;

/// An element's rendered size, taken from its offset box: content plus
/// padding and border, excluding margin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// `offsetWidth`/`offsetHeight` are specified as integers but typed as
    /// signed in the bindings.
    pub(crate) fn from_offsets(width: i32, height: i32) -> Self {
        Self { width: width.max(0) as u32, height: height.max(0) as u32 }
    }

    pub(crate) fn of(element: &HtmlElement) -> Self {
        Self::from_offsets(element.offset_width(), element.offset_height())
    }
}

/// Returns the computed `position` of `element`, or an empty string when it
/// cannot be determined (e.g. the element is not in a rendered tree).
pub(crate) fn computed_position(element: &HtmlElement) -> String {
    web_sys::window()
        .and_then(|window| window.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value("position").ok())
        .unwrap_or_default()
}
