use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlIFrameElement};

const FRAME_STYLE: &str = "display: block; position: absolute; top: 0; left: 0; width: 100%; \
                           height: 100%; overflow: hidden; border: 0; opacity: 0; \
                           pointer-events: none; z-index: -1;";

/// Detects size changes of an element through a hidden, same-size `<iframe>`.
///
/// The iframe stretches to cover its host, so the host's layout engine
/// resizes the embedded window together with the host and fires that window's
/// own `resize` event. Every native event is forwarded verbatim with the
/// target element as argument; callers re-measure and decide for themselves
/// whether anything changed.
///
/// The first notification is at-least-once: one fires synchronously after the
/// iframe is appended, and another once `about:blank` finishes loading.
/// Callers that need exactly-once semantics must deduplicate.
///
/// There is no fallback path. In an environment without embedded browsing
/// contexts construction panics; use [`ResizeSensor`] there instead.
///
/// [`ResizeSensor`]: crate::ResizeSensor
pub struct FrameSensor {
    iframe: Option<HtmlIFrameElement>,
    _on_load: Closure<dyn FnMut()>,
    _on_resize: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameSensor {
    pub fn observe<F>(target: &HtmlElement, on_resize: F) -> Self
    where
        F: 'static + FnMut(&HtmlElement),
    {
        // The iframe is positioned absolutely against the target, so the
        // target itself has to establish a containing block.
        let position = crate::computed_position(target);
        if !matches!(position.as_str(), "relative" | "absolute" | "fixed" | "sticky") {
            target
                .style()
                .set_property("position", "relative")
                .expect("Failed to set position on target");
        }

        let document = target.owner_document().expect("Failed to obtain owner document");
        let iframe: HtmlIFrameElement = document
            .create_element("iframe")
            .expect("Failed to create iframe element")
            .unchecked_into();
        iframe.set_attribute("aria-hidden", "true").expect("Failed to set attribute");
        iframe.set_attribute("tabindex", "-1").expect("Failed to set attribute");
        iframe.set_attribute("src", "about:blank").expect("Failed to set attribute");
        iframe.set_attribute("style", FRAME_STYLE).expect("Failed to set attribute");

        let on_resize = Rc::new(RefCell::new(on_resize));
        let loaded = Rc::new(Cell::new(false));
        let resize_closure = Rc::new(RefCell::new(None));

        let on_load: Closure<dyn FnMut()> = Closure::new({
            let iframe = iframe.clone();
            let target = target.clone();
            let on_resize = on_resize.clone();
            let loaded = loaded.clone();
            let resize_closure = resize_closure.clone();
            move || {
                let closure: Closure<dyn FnMut()> = Closure::new({
                    let target = target.clone();
                    let on_resize = on_resize.clone();
                    move || (&mut *on_resize.borrow_mut())(&target)
                });
                iframe
                    .content_window()
                    .expect("Failed to obtain iframe content window")
                    .set_onresize(Some(closure.as_ref().unchecked_ref()));
                *resize_closure.borrow_mut() = Some(closure);

                loaded.set(true);
                (&mut *on_resize.borrow_mut())(&target);
            }
        });
        iframe.set_onload(Some(on_load.as_ref().unchecked_ref()));

        target.append_child(&iframe).expect("Failed to append iframe to target");

        // Guarantee a first notification even if the embedded context never
        // finishes loading. When it does load, a duplicate follows.
        if !loaded.get() {
            (&mut *on_resize.borrow_mut())(target);
        }

        Self { iframe: Some(iframe), _on_load: on_load, _on_resize: resize_closure }
    }

    /// Removes the injected iframe. Safe to call more than once; calls after
    /// the first are no-ops.
    pub fn dispose(&mut self) {
        if let Some(iframe) = self.iframe.take() {
            iframe.set_onload(None);
            iframe.remove();
        }
    }
}

impl Drop for FrameSensor {
    fn drop(&mut self) {
        self.dispose();
    }
}
