#![cfg(target_arch = "wasm32")]

//! Browser test suite; run with `wasm-pack test --headless --chrome` (or
//! `--firefox`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use resize_sensor::{AnimationSupport, Dimensions, FrameSensor, ResizeSensor, SensorRegistry};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::wasm_bindgen_test;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    console_error_panic_hook::set_once();
    web_sys::window().unwrap().document().unwrap()
}

fn test_element(width: u32, height: u32) -> HtmlElement {
    let document = document();
    let element: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    set_size(&element, width, height);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn set_size(element: &HtmlElement, width: u32, height: u32) {
    let style = element.style();
    style.set_property("width", &format!("{width}px")).unwrap();
    style.set_property("height", &format!("{height}px")).unwrap();
}

async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window().unwrap().request_animation_frame(&resolve).unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

/// Waits long enough for scroll events and the coalescing frame to run.
async fn settle() {
    for _ in 0..3 {
        next_frame().await;
    }
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn counting_callback() -> (Rc<RefCell<Vec<Dimensions>>>, impl FnMut(Dimensions)) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let callback = {
        let calls = calls.clone();
        move |dimensions| calls.borrow_mut().push(dimensions)
    };
    (calls, callback)
}

#[wasm_bindgen_test]
async fn setup_is_silent_and_resize_reports_once() {
    let element = test_element(100, 200);
    let (calls, callback) = counting_callback();
    let mut sensor = ResizeSensor::new(&element, &AnimationSupport::detect(&document()), callback);

    settle().await;
    assert!(calls.borrow().is_empty(), "setup must not invoke the callback");

    set_size(&element, 20, 200);
    settle().await;
    assert_eq!(*calls.borrow(), [Dimensions { width: 20, height: 200 }]);

    sensor.dispose();
    element.remove();
}

#[wasm_bindgen_test]
async fn synchronous_mutations_coalesce_to_final_size() {
    let element = test_element(100, 100);
    let (calls, callback) = counting_callback();
    let mut sensor = ResizeSensor::new(&element, &AnimationSupport::detect(&document()), callback);
    settle().await;

    set_size(&element, 50, 100);
    set_size(&element, 60, 100);
    set_size(&element, 70, 100);
    settle().await;

    assert_eq!(*calls.borrow(), [Dimensions { width: 70, height: 100 }]);

    sensor.dispose();
    element.remove();
}

#[wasm_bindgen_test]
async fn unchanged_size_is_suppressed() {
    let element = test_element(80, 40);
    let (calls, callback) = counting_callback();
    let mut sensor = ResizeSensor::new(&element, &AnimationSupport::detect(&document()), callback);
    settle().await;

    set_size(&element, 80, 40);
    settle().await;
    assert!(calls.borrow().is_empty());

    sensor.dispose();
    element.remove();
}

#[wasm_bindgen_test]
async fn dispose_is_idempotent_and_silences_callback() {
    let element = test_element(100, 100);
    let (calls, callback) = counting_callback();
    let mut sensor = ResizeSensor::new(&element, &AnimationSupport::detect(&document()), callback);
    settle().await;

    set_size(&element, 30, 30);
    sensor.dispose();
    sensor.dispose();
    settle().await;

    assert!(calls.borrow().is_empty(), "no callback may fire during or after teardown");
    assert!(element.query_selector("div").unwrap().is_none(), "triggers must be removed");
    element.remove();
}

#[wasm_bindgen_test]
fn registry_returns_one_sensor_per_element() {
    let element = test_element(50, 50);
    element.set_id("registry-uniqueness");
    let mut registry = SensorRegistry::new(&document());

    let first = registry.create(&element, |_| {}).unwrap();
    let second = registry.create(&element, |_| {}).unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    registry.destroy(&element);
    let third = registry.create(&element, |_| {}).unwrap();
    assert!(!Rc::ptr_eq(&first, &third));

    registry.destroy(&element);
    element.remove();
}

#[wasm_bindgen_test]
fn registry_rejects_unsuitable_elements() {
    let document = document();
    let image: HtmlElement = document.create_element("img").unwrap().unchecked_into();
    document.body().unwrap().append_child(&image).unwrap();

    let mut registry = SensorRegistry::new(&document);
    assert!(registry.create(&image, |_| {}).is_none());
    assert_eq!(image.child_element_count(), 0, "no nodes may be injected");

    image.remove();
}

#[wasm_bindgen_test]
fn registry_destroy_without_sensor_does_not_panic() {
    let element = test_element(10, 10);
    element.set_id("never-registered");
    let mut registry = SensorRegistry::new(&document());
    registry.destroy(&element);
    element.remove();
}

#[wasm_bindgen_test]
async fn frame_sensor_forwards_native_resize() {
    let element = test_element(120, 60);
    let notified = Rc::new(Cell::new(0u32));
    let mut sensor = FrameSensor::observe(&element, {
        let notified = notified.clone();
        move |_| notified.set(notified.get() + 1)
    });

    // At-least-once before the iframe finishes loading.
    assert!(notified.get() >= 1);

    sleep(100).await;
    let after_load = notified.get();

    set_size(&element, 240, 60);
    sleep(100).await;
    assert!(notified.get() > after_load, "native resize must be forwarded");

    sensor.dispose();
    element.remove();
}

#[wasm_bindgen_test]
fn frame_sensor_on_detached_element_disposes_cleanly() {
    let element: HtmlElement = document().create_element("div").unwrap().unchecked_into();
    let notified = Rc::new(Cell::new(0u32));
    let mut sensor = FrameSensor::observe(&element, {
        let notified = notified.clone();
        move |_| notified.set(notified.get() + 1)
    });

    assert!(notified.get() >= 1);
    assert!(element.query_selector("iframe").unwrap().is_some());

    sensor.dispose();
    assert!(element.query_selector("iframe").unwrap().is_none());
    sensor.dispose();
}
