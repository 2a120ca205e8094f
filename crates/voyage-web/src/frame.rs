use crate::bridge;
use crate::constants::MAX_FRAME_DT_SEC;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use voyage_core::{CameraController, Clock, InstantClock, TourDriver};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// `performance.now()`, the same timebase `requestAnimationFrame` stamps its
/// frames with. Falls back to `instant` when the Performance API is missing.
pub struct PerformanceClock {
    performance: Option<web::Performance>,
    fallback: InstantClock,
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self {
            performance: web::window().and_then(|w| w.performance()),
            fallback: InstantClock::default(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => self.fallback.now_ms(),
        }
    }
}

/// JS callback receiving a `Float32Array` pose each frame.
pub type RendererSlot = Rc<RefCell<Option<js_sys::Function>>>;

pub struct FrameContext {
    pub controller: Rc<CameraController>,
    pub tour: TourDriver,
    pub renderer: RendererSlot,
    pub last_ms: Option<f64>,
}

impl FrameContext {
    pub fn frame(&mut self, now_ms: f64) {
        let dt_sec = bridge::frame_delta_sec(self.last_ms, now_ms, MAX_FRAME_DT_SEC);
        self.last_ms = Some(now_ms);

        if self.controller.tick(now_ms).is_none() {
            self.controller.auto_rotate(dt_sec);
        }
        self.tour.tick(now_ms);
        self.push_pose();
    }

    fn push_pose(&self) {
        let renderer = self.renderer.borrow().clone();
        let Some(renderer) = renderer else {
            return;
        };
        let pose = bridge::pose_to_array(self.controller.pose());
        let array = js_sys::Float32Array::from(&pose[..]);
        if let Err(e) = renderer.call1(&JsValue::NULL, &array) {
            log::warn!("[frame] renderer callback failed: {:?}", e);
        }
    }
}

/// Running `requestAnimationFrame` loop. Dropping it cancels the pending frame
/// and releases the context.
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

fn request_frame(
    tick: &RefCell<Option<Closure<dyn FnMut(f64)>>>,
    handle: &Cell<Option<i32>>,
) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(closure) = tick.borrow().as_ref() {
        match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let handle_clone = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        handle_clone.set(None);
        frame_ctx.borrow_mut().frame(now_ms);
        request_frame(&tick_clone, &handle_clone);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick, &handle);
    log::info!("[frame] loop started");
    FrameLoop { handle, tick }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        self.tick.borrow_mut().take();
        log::info!("[frame] loop stopped");
    }
}
