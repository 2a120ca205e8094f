#![cfg(target_arch = "wasm32")]
//! Browser front-end: wires the voyage store, camera controller and scroll
//! dispatcher to the DOM and exposes a small API to the page's JS.

mod bridge;
mod constants;
mod dom;
mod frame;
mod media;
mod storage;
mod visibility;

use bridge::{SliceValue, StateSlice};
use frame::{FrameContext, FrameLoop, PerformanceClock, RendererSlot};
use media::MediaQueryMotion;
use std::cell::RefCell;
use std::rc::Rc;
use storage::LocalStorage;
use visibility::DomVisibility;
use voyage_core::{
    clear_city, destination_anchors, primary_anchors, select_city, toggle_tour, AppStore,
    CameraController, CityRegistry, ContentLibrary, ExperienceParams, Scene, SceneDispatcher,
    Subscription, Teardown, TourDriver,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("voyage-web starting");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

fn slice_to_js(value: SliceValue) -> JsValue {
    match value {
        SliceValue::Text(s) => JsValue::from_str(s),
        SliceValue::Flag(b) => JsValue::from_bool(b),
        SliceValue::Null => JsValue::NULL,
    }
}

// Field order matters: the frame loop must stop before the controller drops.
struct GlobeView {
    _frame: FrameLoop,
    controller: Rc<CameraController>,
}

#[wasm_bindgen]
pub struct VoyageApp {
    globe: Option<GlobeView>,
    store: AppStore,
    registry: Rc<CityRegistry>,
    library: ContentLibrary,
    params: ExperienceParams,
    clock: Rc<PerformanceClock>,
    renderer: RendererSlot,
    subscriptions: Vec<Subscription>,
    _dispatcher: SceneDispatcher,
    _listeners: Vec<dom::DomListener>,
    _motion: Teardown,
}

#[wasm_bindgen]
impl VoyageApp {
    /// Build the experience from an optional JSON array of destination records.
    #[wasm_bindgen(constructor)]
    pub fn new(content_json: Option<String>) -> Result<VoyageApp, JsValue> {
        Self::init(content_json.as_deref()).map_err(to_js)
    }

    /// Mount the globe view: start camera flights and the frame loop.
    pub fn mount_globe(&mut self) {
        if self.globe.is_some() {
            log::warn!("[app] globe already mounted");
            return;
        }
        let controller = Rc::new(CameraController::mount(
            self.store.clone(),
            self.registry.clone(),
            self.clock.clone(),
            self.params.clone(),
        ));
        let ctx = FrameContext {
            controller: controller.clone(),
            tour: TourDriver::new(
                self.store.clone(),
                self.registry.clone(),
                self.params.tour_dwell_ms,
            ),
            renderer: self.renderer.clone(),
            last_ms: None,
        };
        let frame = frame::start_loop(Rc::new(RefCell::new(ctx)));
        self.globe = Some(GlobeView {
            _frame: frame,
            controller,
        });
    }

    pub fn unmount_globe(&mut self) {
        if self.globe.take().is_some() {
            log::info!("[app] globe unmounted");
        }
    }

    /// Returns false when the slug names no known city.
    pub fn select_city(&self, slug: &str) -> bool {
        match self.registry.lookup(slug) {
            Some(city) => {
                select_city(&self.store, city.slug());
                true
            }
            None => false,
        }
    }

    /// Return to the globe view: no active city, tour stopped.
    pub fn clear_city(&self) {
        clear_city(&self.store);
    }

    pub fn preview_city(&self, slug: Option<String>) {
        let city = slug
            .as_deref()
            .and_then(|s| self.registry.lookup(s))
            .map(|c| c.slug());
        self.store.set_preview_city(city);
    }

    pub fn set_scene(&self, scene: &str) -> Result<(), JsValue> {
        let scene: Scene = scene
            .parse()
            .map_err(|e: voyage_core::ParseError| JsValue::from_str(&e.to_string()))?;
        self.store.set_scene(scene);
        Ok(())
    }

    pub fn toggle_day_night(&self) -> String {
        self.store.toggle_day_night();
        bridge::theme_attr(self.store.get_state().day_night).to_string()
    }

    pub fn toggle_audio(&self) -> bool {
        self.store.toggle_audio();
        self.store.get_state().audio_enabled
    }

    pub fn toggle_tour(&self) -> String {
        bridge::tour_mode_name(toggle_tour(&self.store, &self.registry)).to_string()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.store.get_state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Call `callback(next, previous)` whenever the named state field changes.
    pub fn on_change(&mut self, slice: &str, callback: js_sys::Function) -> Result<(), JsValue> {
        let slice = StateSlice::from_name(slice)
            .ok_or_else(|| JsValue::from_str(&format!("unknown state field '{}'", slice)))?;
        let sub = self.store.subscribe(
            move |s| slice.read(s),
            move |next, previous| {
                if let Err(e) =
                    callback.call2(&JsValue::NULL, &slice_to_js(*next), &slice_to_js(*previous))
                {
                    log::warn!("[app] {} listener failed: {:?}", slice.name(), e);
                }
            },
        );
        self.subscriptions.push(sub);
        Ok(())
    }

    /// Receives a `Float32Array` `[eye xyz, target xyz]` every frame while mounted.
    pub fn set_renderer(&self, callback: Option<js_sys::Function>) {
        *self.renderer.borrow_mut() = callback;
    }

    pub fn set_aspect(&self, aspect: f32) {
        if let Some(g) = &self.globe {
            g.controller.set_aspect(aspect);
        }
    }

    pub fn orbit(&self, delta_yaw: f32, delta_pitch: f32) -> bool {
        self.globe
            .as_ref()
            .map_or(false, |g| g.controller.orbit(delta_yaw, delta_pitch))
    }

    pub fn zoom(&self, delta: f32) -> bool {
        self.globe
            .as_ref()
            .map_or(false, |g| g.controller.zoom(delta))
    }

    /// Column-major view matrix, or nothing while unmounted.
    pub fn view_matrix(&self) -> Option<Vec<f32>> {
        let g = self.globe.as_ref()?;
        Some(g.controller.camera().view_matrix().to_cols_array().to_vec())
    }

    pub fn projection_matrix(&self) -> Option<Vec<f32>> {
        let g = self.globe.as_ref()?;
        Some(g.controller.camera().projection_matrix().to_cols_array().to_vec())
    }

    pub fn camera_pose(&self) -> Option<Vec<f32>> {
        let g = self.globe.as_ref()?;
        Some(bridge::pose_to_array(g.controller.pose()).to_vec())
    }

    pub fn destination_count(&self) -> usize {
        self.library.len()
    }
}

impl VoyageApp {
    fn init(content_json: Option<&str>) -> anyhow::Result<Self> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let params = ExperienceParams::default();
        let registry = Rc::new(CityRegistry::new(params.globe_radius));
        let library = match content_json {
            Some(json) => ContentLibrary::from_json(json, &registry)?,
            None => ContentLibrary::default(),
        };

        let store = AppStore::new(Rc::new(LocalStorage));
        let motion = store.attach_motion_preference(&MediaQueryMotion::new());

        let mut anchors = primary_anchors();
        anchors.extend(destination_anchors(&library, &registry));
        let dispatcher =
            SceneDispatcher::attach(&store, &DomVisibility::new(document.clone()), anchors);

        let mut listeners = dom::wire_city_pins(&document, &store, &registry)?;
        listeners.extend(dom::wire_toggles(&document, &store, &registry)?);
        let subscriptions = dom::sync_document(&document, &store);

        log::info!(
            "[app] ready: {} destinations, {} anchors",
            library.len(),
            dispatcher.anchor_count()
        );
        Ok(Self {
            globe: None,
            store,
            registry,
            library,
            params,
            clock: Rc::new(PerformanceClock::default()),
            renderer: Rc::new(RefCell::new(None)),
            subscriptions,
            _dispatcher: dispatcher,
            _listeners: listeners,
            _motion: motion,
        })
    }
}
