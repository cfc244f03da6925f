use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

pub(crate) const CONTAINER_CLASS: &str = "resize-sensor";
pub(crate) const CONTRACT_CLASS: &str = "resize-sensor__contract";
pub(crate) const EXPAND_CLASS: &str = "resize-sensor__expand";

const ANIMATION_NAME: &str = "resize-sensor-anim";
const STYLE_ELEMENT_ID: &str = "resize-sensor-styles";

/// The vendor convention to use for the trigger animation.
///
/// The scroll-trigger strategy plays a zero-length keyframe animation on its
/// container so that an `animationstart` event fires whenever the trigger
/// subtree is (re)inserted into a rendered layout. Which property and event
/// names to use varies across engines, so they are probed once and carried
/// around as plain rule text.
pub struct AnimationProperties {
    pub keyframes_rule: String,
    pub style_declaration: String,
    pub start_event: &'static str,
    pub name: &'static str,
}

impl AnimationProperties {
    fn with_prefix(css_prefix: &str, start_event: &'static str) -> Self {
        Self {
            keyframes_rule: format!(
                "@{css_prefix}keyframes {ANIMATION_NAME} {{ from {{ opacity: 0; }} to {{ opacity: 0; }} }}"
            ),
            style_declaration: format!("{css_prefix}animation: 1ms {ANIMATION_NAME};"),
            start_event,
            name: ANIMATION_NAME,
        }
    }
}

/// Result of probing the host for CSS animation support.
///
/// Holders are expected to detect once and keep the value around; the probe
/// itself has no hidden cache, which keeps it constructible fresh in tests.
pub struct AnimationSupport {
    properties: Option<AnimationProperties>,
}

impl AnimationSupport {
    /// Probes a detached test element for a bare or vendor-prefixed
    /// `animationName` style property.
    pub fn detect(document: &Document) -> Self {
        let probe: HtmlElement = document
            .create_element("div")
            .expect("Failed to create probe element")
            .unchecked_into();
        let style = JsValue::from(probe.style());

        let has =
            |property: &str| Reflect::has(&style, &JsValue::from_str(property)).unwrap_or(false);

        if has("animationName") {
            return Self { properties: Some(AnimationProperties::with_prefix("", "animationstart")) };
        }

        const PREFIXES: [(&str, &str, &str); 4] = [
            ("Webkit", "-webkit-", "webkitAnimationStart"),
            ("Moz", "-moz-", "animationstart"),
            ("O", "-o-", "oAnimationStart"),
            ("ms", "-ms-", "MSAnimationStart"),
        ];

        for (property_prefix, css_prefix, start_event) in PREFIXES {
            if has(&format!("{property_prefix}AnimationName")) {
                return Self {
                    properties: Some(AnimationProperties::with_prefix(css_prefix, start_event)),
                };
            }
        }

        Self { properties: None }
    }

    pub fn properties(&self) -> Option<&AnimationProperties> {
        self.properties.as_ref()
    }

    pub fn is_supported(&self) -> bool {
        self.properties.is_some()
    }
}

/// Inserts the shared style block for the trigger elements into `document`,
/// at most once per document.
///
/// The class names are namespaced to stay clear of author styles; the
/// contract trigger's pseudo-element is fixed at 200% of its container so it
/// always has scrollable overflow.
pub(crate) fn ensure_trigger_styles(document: &Document, animation: &AnimationSupport) {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return;
    }

    let keyframes = animation.properties().map(|p| p.keyframes_rule.as_str()).unwrap_or("");
    let declaration = animation.properties().map(|p| p.style_declaration.as_str()).unwrap_or("");

    let rules = format!(
        "{keyframes} \
         .{CONTAINER_CLASS} {{ {declaration} visibility: hidden; opacity: 0; }} \
         .{CONTAINER_CLASS}, .{CONTAINER_CLASS} > div, .{CONTRACT_CLASS}:before {{ \
         content: ' '; display: block; position: absolute; top: 0; left: 0; \
         height: 100%; width: 100%; overflow: hidden; }} \
         .{CONTAINER_CLASS} > div {{ background: #eee; overflow: auto; }} \
         .{CONTRACT_CLASS}:before {{ width: 200%; height: 200%; }}"
    );

    let style = document.create_element("style").expect("Failed to create style element");
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&rules));

    document
        .head()
        .expect("Failed to obtain document head")
        .append_child(&style)
        .expect("Failed to insert trigger styles");
}
