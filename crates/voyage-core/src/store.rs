//! Application state store: the single source of truth for which scene is
//! active, which city is selected, theme, tour mode and camera status.
//!
//! The store is an explicit object, not a global. Clone the [`AppStore`] handle
//! to share it; all clones see the same state. Every mutation goes through a
//! named action, and listeners registered with [`AppStore::subscribe`] fire
//! only when the slice they select actually changes.
//!
//! Actions may be called from inside a listener. The nested mutation is
//! applied at once and the listeners are re-evaluated in a further pass rather
//! than being re-entered, so a listener never runs inside itself.

use crate::city::CitySlug;
use crate::constants::{AUDIO_ENABLED_KEY, MAX_NOTIFY_PASSES};
use crate::env::{MotionPreference, PreferenceStorage, Teardown};
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Narrative phase of the experience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scene {
    #[default]
    Welcome,
    GlobeIntro,
    Route,
    Destinations,
}

impl Scene {
    pub fn as_str(self) -> &'static str {
        match self {
            Scene::Welcome => "welcome",
            Scene::GlobeIntro => "globe-intro",
            Scene::Route => "route",
            Scene::Destinations => "destinations",
        }
    }
}

impl FromStr for Scene {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcome" => Ok(Scene::Welcome),
            "globe-intro" | "globe" => Ok(Scene::GlobeIntro),
            "route" => Ok(Scene::Route),
            "destinations" => Ok(Scene::Destinations),
            _ => Err(ParseError::new("scene", s)),
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourMode {
    #[default]
    Manual,
    Auto,
}

impl TourMode {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            TourMode::Manual => TourMode::Auto,
            TourMode::Auto => TourMode::Manual,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNight {
    #[default]
    Day,
    Night,
}

impl DayNight {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            DayNight::Day => DayNight::Night,
            DayNight::Night => DayNight::Day,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayNight::Day => "day",
            DayNight::Night => "night",
        }
    }
}

impl FromStr for DayNight {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(DayNight::Day),
            "night" => Ok(DayNight::Night),
            _ => Err(ParseError::new("day/night mode", s)),
        }
    }
}

/// Snapshot of everything the store tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub active_scene: Scene,
    /// City the narrative has committed to (click or panel scroll).
    pub active_city: Option<CitySlug>,
    /// City under the pointer; independent of `active_city`.
    pub preview_city: Option<CitySlug>,
    pub tour_mode: TourMode,
    pub day_night: DayNight,
    pub audio_enabled: bool,
    pub reduced_motion_preferred: bool,
    /// True only while the globe view is mounted.
    pub globe_ready: bool,
    /// True only while a camera flight is running; manual controls are
    /// ignored meanwhile.
    pub camera_flying: bool,
}

trait Listener {
    fn notify(&self, state: &AppState);
}

struct SliceListener<T, S, F> {
    selector: S,
    last: RefCell<T>,
    callback: RefCell<F>,
}

impl<T, S, F> Listener for SliceListener<T, S, F>
where
    T: PartialEq,
    S: Fn(&AppState) -> T,
    F: FnMut(&T, &T),
{
    fn notify(&self, state: &AppState) {
        let next = (self.selector)(state);
        if *self.last.borrow() == next {
            return;
        }
        let previous = self.last.replace(next);
        let current = self.last.borrow();
        match self.callback.try_borrow_mut() {
            Ok(mut cb) => (*cb)(&*current, &previous),
            Err(_) => log::warn!("[store] listener re-entered; change skipped"),
        }
    }
}

struct StoreInner {
    state: Cell<AppState>,
    listeners: RefCell<Vec<(u64, Rc<dyn Listener>)>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
    dirty: Cell<bool>,
    storage: Rc<dyn PreferenceStorage>,
}

impl StoreInner {
    fn update(&self, mutate: impl FnOnce(&mut AppState)) {
        let mut next = self.state.get();
        mutate(&mut next);
        if next == self.state.get() {
            return;
        }
        self.state.set(next);
        self.notify();
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(i, _)| *i == id)
    }

    fn notify(&self) {
        if self.notifying.get() {
            self.dirty.set(true);
            return;
        }
        self.notifying.set(true);
        let mut passes = 0;
        loop {
            self.dirty.set(false);
            let snapshot: Vec<(u64, Rc<dyn Listener>)> = self.listeners.borrow().clone();
            for (id, listener) in snapshot {
                if self.is_subscribed(id) {
                    listener.notify(&self.state.get());
                }
            }
            passes += 1;
            if !self.dirty.get() {
                break;
            }
            if passes >= MAX_NOTIFY_PASSES {
                log::error!(
                    "[store] listeners still changing state after {} passes; giving up",
                    passes
                );
                break;
            }
        }
        self.notifying.set(false);
    }
}

/// Handle to a listener registered with [`AppStore::subscribe`].
///
/// Dropping it unsubscribes; call [`Subscription::forget`] to keep the
/// listener for the lifetime of the store.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn forget(mut self) {
        self.id = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.store.upgrade()) {
            inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
        }
    }
}

/// Shared, cheaply cloneable store handle.
#[derive(Clone)]
pub struct AppStore {
    inner: Rc<StoreInner>,
}

impl AppStore {
    /// Create a store with default state, restoring the audio preference from
    /// `storage`. Storage failures leave the default in place.
    pub fn new(storage: Rc<dyn PreferenceStorage>) -> Self {
        let mut state = AppState::default();
        match storage.read_flag(AUDIO_ENABLED_KEY) {
            Ok(Some(enabled)) => state.audio_enabled = enabled,
            Ok(None) => {}
            Err(e) => log::warn!("[store] could not restore audio preference: {}", e),
        }
        Self {
            inner: Rc::new(StoreInner {
                state: Cell::new(state),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
                dirty: Cell::new(false),
                storage,
            }),
        }
    }

    #[inline]
    pub fn get_state(&self) -> AppState {
        self.inner.state.get()
    }

    /// Call `callback(&new, &previous)` whenever `selector`'s output changes.
    pub fn subscribe<T, S, F>(&self, selector: S, callback: F) -> Subscription
    where
        T: PartialEq + 'static,
        S: Fn(&AppState) -> T + 'static,
        F: FnMut(&T, &T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let initial = selector(&self.inner.state.get());
        let listener: Rc<dyn Listener> = Rc::new(SliceListener {
            selector,
            last: RefCell::new(initial),
            callback: RefCell::new(callback),
        });
        self.inner.listeners.borrow_mut().push((id, listener));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn set_scene(&self, scene: Scene) {
        log::debug!("[store] scene -> {}", scene);
        self.inner.update(|s| s.active_scene = scene);
    }

    /// Commit to a city. Selecting a city always moves the narrative to the
    /// destinations scene; clearing it leaves the scene alone.
    pub fn set_city(&self, city: Option<CitySlug>) {
        log::debug!("[store] city -> {:?}", city);
        self.inner.update(|s| {
            s.active_city = city;
            if city.is_some() {
                s.active_scene = Scene::Destinations;
            }
        });
    }

    pub fn set_preview_city(&self, city: Option<CitySlug>) {
        self.inner.update(|s| s.preview_city = city);
    }

    pub fn set_tour_mode(&self, mode: TourMode) {
        self.inner.update(|s| s.tour_mode = mode);
    }

    pub fn set_day_night(&self, mode: DayNight) {
        self.inner.update(|s| s.day_night = mode);
    }

    pub fn toggle_day_night(&self) {
        self.inner.update(|s| s.day_night = s.day_night.toggled());
    }

    /// Update the audio flag and persist it. A failed write is logged and the
    /// in-memory value stays authoritative.
    pub fn set_audio_enabled(&self, enabled: bool) {
        self.inner.update(|s| s.audio_enabled = enabled);
        if let Err(e) = self.inner.storage.write_flag(AUDIO_ENABLED_KEY, enabled) {
            log::warn!("[store] audio preference not persisted: {}", e);
        }
    }

    pub fn toggle_audio(&self) {
        let enabled = !self.get_state().audio_enabled;
        self.set_audio_enabled(enabled);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.inner.update(|s| s.reduced_motion_preferred = reduced);
    }

    pub fn set_globe_ready(&self, ready: bool) {
        self.inner.update(|s| s.globe_ready = ready);
    }

    pub fn set_camera_flying(&self, flying: bool) {
        self.inner.update(|s| s.camera_flying = flying);
    }

    /// Track the host's reduced-motion preference: read it now, then follow
    /// every change until the returned teardown runs. An unavailable signal
    /// counts as "no preference".
    pub fn attach_motion_preference(&self, preference: &dyn MotionPreference) -> Teardown {
        let initial = preference.prefers_reduced_motion().unwrap_or_else(|| {
            log::info!("[store] reduced-motion signal unavailable; assuming full motion");
            false
        });
        self.set_reduced_motion(initial);
        let weak = Rc::downgrade(&self.inner);
        preference.on_change(Box::new(move |reduced| {
            if let Some(inner) = weak.upgrade() {
                inner.update(|s| s.reduced_motion_preferred = reduced);
            }
        }))
    }
}

impl fmt::Debug for AppStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &self.get_state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
