use crate::bridge;
use crate::constants::{
    AUDIO_TOGGLE_ID, CITY_ATTR, CITY_SELECTOR, DAY_NIGHT_TOGGLE_ID, DESTINATIONS_SECTION_ID,
    GLOBE_RETURN_ID, GLOBE_SECTION_ID, PRESSED_ATTR, THEME_ATTR, TOUR_TOGGLE_ID,
};
use std::rc::Rc;
use voyage_core::{
    clear_city, destination_anchor_id, select_city, toggle_tour, AppStore, CityRegistry, CitySlug,
    DayNight, Subscription, TourMode,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// An event listener that is removed again when dropped.
pub struct DomListener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

pub fn listen(
    target: &web::EventTarget,
    event: &'static str,
    handler: impl FnMut(web::Event) + 'static,
) -> anyhow::Result<DomListener> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("addEventListener({}) failed: {:?}", event, e))?;
    Ok(DomListener {
        target: target.clone(),
        event,
        closure,
    })
}

/// Click handler on `#element_id`. A missing element is logged and skipped.
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> anyhow::Result<Option<DomListener>> {
    let Some(el) = document.get_element_by_id(element_id) else {
        log::info!("[dom] no #{}; control not wired", element_id);
        return Ok(None);
    };
    listen(&el, "click", move |_| handler()).map(Some)
}

/// Scroll `#element_id` to the top of the viewport. Returns false when the
/// element is missing.
pub fn scroll_to_element(document: &web::Document, element_id: &str, reduced_motion: bool) -> bool {
    let Some(el) = document.get_element_by_id(element_id) else {
        return false;
    };
    let options = web::ScrollIntoViewOptions::new();
    options.set_behavior(if reduced_motion {
        web::ScrollBehavior::Auto
    } else {
        web::ScrollBehavior::Smooth
    });
    options.set_block(web::ScrollLogicalPosition::Start);
    el.scroll_into_view_with_scroll_into_view_options(&options);
    true
}

/// Smooth-scroll the destination panel for `slug` into view, or the
/// destinations section when the panel is missing. Reduced motion jumps.
pub fn scroll_to_destination(slug: CitySlug, reduced_motion: bool) {
    let Some(document) = window_document() else {
        return;
    };
    let panel = destination_anchor_id(slug);
    let target = bridge::first_present(&[panel.as_str(), DESTINATIONS_SECTION_ID], |id| {
        document.get_element_by_id(id).is_some()
    });
    match target {
        Some(id) => {
            if id != panel {
                log::warn!("[dom] no destination panel for {}; showing all destinations", slug);
            }
            scroll_to_element(&document, id, reduced_motion);
        }
        None => log::warn!("[dom] nowhere to scroll for {}", slug),
    }
}

/// Every `[data-city]` element: click selects and scrolls, hover previews.
pub fn wire_city_pins(
    document: &web::Document,
    store: &AppStore,
    registry: &CityRegistry,
) -> anyhow::Result<Vec<DomListener>> {
    let nodes = document
        .query_selector_all(CITY_SELECTOR)
        .map_err(|e| anyhow::anyhow!("querySelectorAll failed: {:?}", e))?;
    let mut listeners = Vec::new();
    for i in 0..nodes.length() {
        let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let Some(slug) = bridge::city_from_attr(el.get_attribute(CITY_ATTR).as_deref(), registry)
        else {
            continue;
        };
        let s = store.clone();
        listeners.push(listen(&el, "click", move |ev| {
            ev.prevent_default();
            select_city(&s, slug);
            scroll_to_destination(slug, s.get_state().reduced_motion_preferred);
        })?);
        let s = store.clone();
        listeners.push(listen(&el, "pointerenter", move |_| {
            s.set_preview_city(Some(slug));
        })?);
        let s = store.clone();
        listeners.push(listen(&el, "pointerleave", move |_| {
            if s.get_state().preview_city == Some(slug) {
                s.set_preview_city(None);
            }
        })?);
    }
    log::info!("[dom] wired {} city pins", listeners.len() / 3);
    Ok(listeners)
}

/// Day/night, audio, tour and return-to-globe buttons.
pub fn wire_toggles(
    document: &web::Document,
    store: &AppStore,
    registry: &Rc<CityRegistry>,
) -> anyhow::Result<Vec<DomListener>> {
    let mut listeners = Vec::new();
    let s = store.clone();
    listeners.extend(add_click_listener(document, DAY_NIGHT_TOGGLE_ID, move || {
        s.toggle_day_night()
    })?);
    let s = store.clone();
    listeners.extend(add_click_listener(document, AUDIO_TOGGLE_ID, move || {
        s.toggle_audio()
    })?);
    let s = store.clone();
    let r = registry.clone();
    listeners.extend(add_click_listener(document, TOUR_TOGGLE_ID, move || {
        toggle_tour(&s, &r);
    })?);
    let s = store.clone();
    let doc = document.clone();
    listeners.extend(add_click_listener(document, GLOBE_RETURN_ID, move || {
        let state = s.get_state();
        if state.active_city.is_some() {
            clear_city(&s);
        } else {
            scroll_to_element(&doc, GLOBE_SECTION_ID, state.reduced_motion_preferred);
        }
    })?);
    Ok(listeners)
}

pub fn apply_theme(document: &web::Document, mode: DayNight) {
    if let Some(body) = document.body() {
        let _ = body.set_attribute(THEME_ATTR, bridge::theme_attr(mode));
    }
}

fn set_pressed(document: &web::Document, element_id: &str, pressed: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let _ = el.set_attribute(PRESSED_ATTR, if pressed { "true" } else { "false" });
    }
}

/// Keep `<body data-theme>` and the toggles' pressed state in step with the
/// store.
pub fn sync_document(document: &web::Document, store: &AppStore) -> Vec<Subscription> {
    let state = store.get_state();
    apply_theme(document, state.day_night);
    set_pressed(document, DAY_NIGHT_TOGGLE_ID, state.day_night == DayNight::Night);
    set_pressed(document, AUDIO_TOGGLE_ID, state.audio_enabled);
    set_pressed(document, TOUR_TOGGLE_ID, state.tour_mode == TourMode::Auto);

    let doc = document.clone();
    let theme = store.subscribe(
        |s| s.day_night,
        move |mode, _| {
            apply_theme(&doc, *mode);
            set_pressed(&doc, DAY_NIGHT_TOGGLE_ID, *mode == DayNight::Night);
        },
    );
    let doc = document.clone();
    let audio = store.subscribe(
        |s| s.audio_enabled,
        move |enabled, _| set_pressed(&doc, AUDIO_TOGGLE_ID, *enabled),
    );
    let doc = document.clone();
    let tour = store.subscribe(
        |s| s.tour_mode,
        move |mode, _| set_pressed(&doc, TOUR_TOGGLE_ID, *mode == TourMode::Auto),
    );
    vec![theme, audio, tour]
}
