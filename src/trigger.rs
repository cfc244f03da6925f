use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AnimationEvent, Document, Event, HtmlElement};

use crate::animation::{self, AnimationSupport, CONTAINER_CLASS, CONTRACT_CLASS, EXPAND_CLASS};
use crate::animation_frame::AnimationFrameHandler;
use crate::event_handle::EventListenerHandle;
use crate::Dimensions;

/// Detects size changes of an element through synthetic scrollable triggers.
///
/// A hidden container filling the target holds two triggers: an "expand"
/// trigger whose child is kept one pixel larger than the trigger itself, and
/// a "contract" trigger whose pseudo-element is always 200% of its container.
/// Both are scrolled to their maximum extent, so any change to the target's
/// box moves a scroll position and fires a `scroll` event. The handler resets
/// the triggers and schedules a measurement on the next animation frame;
/// rapid bursts coalesce into one measurement, and the callback only fires
/// when the measured [`Dimensions`] differ from the last stored value.
///
/// When the host supports CSS animations, a zero-length keyframe animation on
/// the container additionally reports the trigger subtree being (re)inserted
/// into a rendered layout, which re-initializes the scroll state. Without
/// animation support that wiring is skipped and recovery after reattachment
/// is weaker.
pub struct ResizeSensor {
    triggers: Option<ResizeTriggers>,
    on_scroll: Option<EventListenerHandle<dyn FnMut(Event)>>,
    on_animation_start: Option<EventListenerHandle<dyn FnMut(AnimationEvent)>>,
    frame: Option<Rc<AnimationFrameHandler>>,
}

impl ResizeSensor {
    /// Injects the trigger elements and starts listening. The element's size
    /// at subscribe time is stored without invoking `callback`.
    pub fn new<F>(target: &HtmlElement, animation: &AnimationSupport, mut callback: F) -> Self
    where
        F: 'static + FnMut(Dimensions),
    {
        if crate::computed_position(target) == "static" {
            target
                .style()
                .set_property("position", "relative")
                .expect("Failed to set position on target");
        }

        let document = target.owner_document().expect("Failed to obtain owner document");
        animation::ensure_trigger_styles(&document, animation);

        let triggers = ResizeTriggers::insert(&document, target);
        let dimensions = Rc::new(Cell::new(Dimensions::default()));

        let window = web_sys::window().expect("Failed to obtain window");
        let frame = Rc::new(AnimationFrameHandler::new(window, {
            let target = target.clone();
            let dimensions = dimensions.clone();
            move || {
                let current = Dimensions::of(&target);
                if current != dimensions.get() {
                    dimensions.set(current);
                    callback(current);
                }
            }
        }));

        // Capture phase, so scroll events from either trigger reach one
        // handler on the container.
        let on_scroll = EventListenerHandle::with_capture(
            triggers.container.clone(),
            "scroll",
            true,
            Closure::new({
                let triggers = triggers.clone();
                let frame = frame.clone();
                move |_: Event| {
                    triggers.reset();
                    frame.request();
                }
            }),
        );

        let on_animation_start = animation.properties().map(|properties| {
            let name = properties.name;
            EventListenerHandle::new(
                triggers.container.clone(),
                properties.start_event,
                Closure::new({
                    let triggers = triggers.clone();
                    move |event: AnimationEvent| {
                        if event.animation_name() == name {
                            triggers.reset();
                        }
                    }
                }),
            )
        });

        triggers.reset();
        dimensions.set(Dimensions::of(target));

        Self {
            triggers: Some(triggers),
            on_scroll: Some(on_scroll),
            on_animation_start,
            frame: Some(frame),
        }
    }

    /// Removes all listeners and injected nodes and cancels any pending
    /// measurement, so the callback never fires after teardown. Safe to call
    /// more than once.
    pub fn dispose(&mut self) {
        self.on_scroll = None;
        self.on_animation_start = None;
        if let Some(frame) = self.frame.take() {
            frame.cancel();
        }
        if let Some(triggers) = self.triggers.take() {
            triggers.remove();
        }
    }
}

impl Drop for ResizeSensor {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[derive(Clone)]
struct ResizeTriggers {
    container: HtmlElement,
    expand: HtmlElement,
    expand_child: HtmlElement,
    contract: HtmlElement,
}

impl ResizeTriggers {
    fn insert(document: &Document, target: &HtmlElement) -> Self {
        let create = || -> HtmlElement {
            document
                .create_element("div")
                .expect("Failed to create trigger element")
                .unchecked_into()
        };

        let container = create();
        let expand = create();
        let expand_child = create();
        let contract = create();

        container.set_class_name(CONTAINER_CLASS);
        expand.set_class_name(EXPAND_CLASS);
        contract.set_class_name(CONTRACT_CLASS);

        expand.append_child(&expand_child).expect("Failed to build trigger subtree");
        container.append_child(&expand).expect("Failed to build trigger subtree");
        container.append_child(&contract).expect("Failed to build trigger subtree");
        target.append_child(&container).expect("Failed to append triggers to target");

        Self { container, expand, expand_child, contract }
    }

    /// Scroll-to-max positions go stale the instant the container's size
    /// changes, so this runs again after every scroll and animation-start
    /// event.
    fn reset(&self) {
        self.contract.set_scroll_left(self.contract.scroll_width());
        self.contract.set_scroll_top(self.contract.scroll_height());

        let child_style = self.expand_child.style();
        child_style
            .set_property("width", &format!("{}px", self.expand.offset_width() + 1))
            .expect("Failed to size expand trigger");
        child_style
            .set_property("height", &format!("{}px", self.expand.offset_height() + 1))
            .expect("Failed to size expand trigger");

        self.expand.set_scroll_left(self.expand.scroll_width());
        self.expand.set_scroll_top(self.expand.scroll_height());
    }

    fn remove(&self) {
        self.container.remove();
    }
}
