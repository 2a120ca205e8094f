use voyage_core::{Teardown, VisibilityObserver};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type EntriesCallback = dyn FnMut(js_sys::Array, web::IntersectionObserver);

/// One `IntersectionObserver` per anchor element, looked up by id.
pub struct DomVisibility {
    document: web::Document,
}

impl DomVisibility {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }
}

impl VisibilityObserver for DomVisibility {
    fn observe(&self, anchor: &str, threshold: f32, callback: Box<dyn FnMut(f32)>) -> Teardown {
        let Some(element) = self.document.get_element_by_id(anchor) else {
            log::warn!("[visibility] no element #{}; anchor ignored", anchor);
            return Teardown::noop();
        };
        let mut callback = callback;
        let closure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                        callback(entry.intersection_ratio() as f32);
                    }
                }
            },
        ) as Box<EntriesCallback>);

        // Report both leaving (0) and crossing the anchor's own threshold.
        let thresholds = js_sys::Array::of2(
            &JsValue::from_f64(0.0),
            &JsValue::from_f64(threshold as f64),
        );
        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&thresholds);
        let observer = match web::IntersectionObserver::new_with_options(
            closure.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("[visibility] IntersectionObserver error: {:?}", e);
                return Teardown::noop();
            }
        };
        observer.observe(&element);
        Teardown::new(move || {
            observer.disconnect();
            drop(closure);
        })
    }
}
