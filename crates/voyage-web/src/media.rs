use crate::constants::REDUCED_MOTION_QUERY;
use voyage_core::{MotionPreference, Teardown};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Reduced-motion signal backed by `matchMedia`.
pub struct MediaQueryMotion {
    query: Option<web::MediaQueryList>,
}

impl MediaQueryMotion {
    pub fn new() -> Self {
        let query = web::window().and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten());
        if query.is_none() {
            log::info!("[motion] matchMedia unavailable");
        }
        Self { query }
    }
}

impl MotionPreference for MediaQueryMotion {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.query.as_ref().map(|q| q.matches())
    }

    fn on_change(&self, callback: Box<dyn FnMut(bool)>) -> Teardown {
        let Some(query) = self.query.clone() else {
            return Teardown::noop();
        };
        let mut callback = callback;
        let closure = Closure::wrap(Box::new(move |ev: web::MediaQueryListEvent| {
            callback(ev.matches());
        }) as Box<dyn FnMut(web::MediaQueryListEvent)>);
        if let Err(e) =
            query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            log::warn!("[motion] cannot follow preference changes: {:?}", e);
            return Teardown::noop();
        }
        Teardown::new(move || {
            let _ = query
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        })
    }
}
