use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::error;
use web_sys::{Document, HtmlElement};

use crate::animation::AnimationSupport;
use crate::trigger::ResizeSensor;
use crate::Dimensions;

/// Tags that cannot reliably host injected children; browsers either forbid
/// appending to them or mishandle the result.
const UNSUITABLE_TAGS: [&str; 5] = ["IMG", "COL", "TR", "THEAD", "TFOOT"];

/// Memoizes one [`ResizeSensor`] per element, keyed by the element's `id`
/// attribute, and owns the animation feature profile shared by the sensors it
/// creates.
///
/// Error conditions are reported through [`tracing`] and a `None` return, not
/// by panicking: callers commonly sit inside layout code where an escaping
/// panic would take the whole page down.
pub struct SensorRegistry {
    animation: AnimationSupport,
    sensors: HashMap<String, Rc<RefCell<ResizeSensor>>>,
}

impl SensorRegistry {
    /// Probes animation support once; every sensor created through this
    /// registry reuses the result.
    pub fn new(document: &Document) -> Self {
        Self { animation: AnimationSupport::detect(document), sensors: HashMap::new() }
    }

    /// Returns the sensor registered for `target`, creating one if needed.
    ///
    /// Returns `None` and logs a diagnostic when `target` cannot host
    /// injected children. When a sensor already exists for the element's id,
    /// the existing sensor is returned and `callback` is dropped unused.
    pub fn create<F>(
        &mut self,
        target: &HtmlElement,
        callback: F,
    ) -> Option<Rc<RefCell<ResizeSensor>>>
    where
        F: 'static + FnMut(Dimensions),
    {
        let tag_name = target.tag_name();
        if is_unsuitable_tag(&tag_name) {
            error!(
                tag = %tag_name,
                "element cannot host a resize sensor; wrap it in one that can"
            );
            return None;
        }

        let id = target.id();
        if let Some(sensor) = self.sensors.get(&id) {
            return Some(sensor.clone());
        }

        let sensor = Rc::new(RefCell::new(ResizeSensor::new(target, &self.animation, callback)));
        self.sensors.insert(id, sensor.clone());
        Some(sensor)
    }

    /// Disposes and unregisters the sensor for `target`. Logs a diagnostic
    /// when none is registered; the caller proceeds either way.
    pub fn destroy(&mut self, target: &HtmlElement) {
        let id = target.id();
        match self.sensors.remove(&id) {
            Some(sensor) => sensor.borrow_mut().dispose(),
            None => error!(id = %id, "no resize sensor registered for element"),
        }
    }
}

fn is_unsuitable_tag(tag_name: &str) -> bool {
    UNSUITABLE_TAGS.contains(&tag_name.to_ascii_uppercase().as_str())
}
