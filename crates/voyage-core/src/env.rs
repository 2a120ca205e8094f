//! Environment adapter: the seams between the core and the host (browser or
//! test harness).
//!
//! The core never talks to a DOM directly. Durable storage, the reduced-motion
//! accessibility signal, section visibility and the frame clock are reached
//! through the traits below. The `Manual*`/`Memory*` adapters at the bottom are
//! plain in-memory implementations used by tests and host runs.

use crate::error::StorageError;
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Runs a cleanup closure exactly once, when dropped or when `run` is called.
#[must_use = "dropping a Teardown immediately runs its cleanup"]
pub struct Teardown(Option<Box<dyn FnOnce()>>);

impl Teardown {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(cleanup)))
    }

    pub fn noop() -> Self {
        Self(None)
    }

    pub fn run(mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }

    /// Keep the underlying registration alive for the rest of the session.
    pub fn forget(mut self) {
        self.0 = None;
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Teardown").field(&self.0.is_some()).finish()
    }
}

/// Boolean preferences that survive a reload.
pub trait PreferenceStorage {
    fn read_flag(&self, key: &str) -> Result<Option<bool>, StorageError>;
    fn write_flag(&self, key: &str, value: bool) -> Result<(), StorageError>;
}

/// Flags are stored stringified ("true"/"false"); anything else reads as unset.
#[inline]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[inline]
pub fn format_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Live "prefers reduced motion" signal.
pub trait MotionPreference {
    /// Current value, or `None` when the host cannot tell.
    fn prefers_reduced_motion(&self) -> Option<bool>;
    /// Follow changes until the returned teardown runs.
    fn on_change(&self, callback: Box<dyn FnMut(bool)>) -> Teardown;
}

/// Reports how much of a named anchor is visible, as a 0..=1 ratio.
pub trait VisibilityObserver {
    fn observe(&self, anchor: &str, threshold: f32, callback: Box<dyn FnMut(f32)>) -> Teardown;
}

/// Monotonic milliseconds used to time camera flights and the tour.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `instant`, which works on both native and wasm.
pub struct InstantClock {
    origin: instant::Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

// ---------------- In-memory adapters ----------------

/// Cloning shares the same backing map, which lets a test simulate a reload by
/// handing the same storage to a fresh store.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<FnvHashMap<String, String>>>,
    fail: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read and write fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail.set(unavailable);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl PreferenceStorage for MemoryStorage {
    fn read_flag(&self, key: &str) -> Result<Option<bool>, StorageError> {
        if self.fail.get() {
            return Err(StorageError::Unavailable);
        }
        Ok(self.values.borrow().get(key).and_then(|v| parse_flag(v)))
    }

    fn write_flag(&self, key: &str, value: bool) -> Result<(), StorageError> {
        if self.fail.get() {
            return Err(StorageError::Unavailable);
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), format_flag(value).to_string());
        Ok(())
    }
}

type Shared<T> = Rc<RefCell<T>>;

/// Reduced-motion signal flipped by hand.
#[derive(Clone, Default)]
pub struct ManualMotion {
    value: Rc<Cell<Option<bool>>>,
    listeners: Shared<Vec<(u64, Shared<Box<dyn FnMut(bool)>>)>>,
    next_id: Rc<Cell<u64>>,
}

impl ManualMotion {
    pub fn new(value: Option<bool>) -> Self {
        let m = Self::default();
        m.value.set(value);
        m
    }

    pub fn set(&self, reduced: bool) {
        self.value.set(Some(reduced));
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for l in listeners {
            let mut f = l.borrow_mut();
            (*f)(reduced);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl MotionPreference for ManualMotion {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.value.get()
    }

    fn on_change(&self, callback: Box<dyn FnMut(bool)>) -> Teardown {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(callback))));
        let listeners = Rc::downgrade(&self.listeners);
        Teardown::new(move || {
            if let Some(l) = listeners.upgrade() {
                l.borrow_mut().retain(|(i, _)| *i != id);
            }
        })
    }
}

struct Observation {
    id: u64,
    anchor: String,
    threshold: f32,
    callback: Shared<Box<dyn FnMut(f32)>>,
}

/// Visibility reports injected by hand, standing in for an intersection observer.
#[derive(Clone, Default)]
pub struct ManualVisibility {
    observations: Shared<Vec<Observation>>,
    next_id: Rc<Cell<u64>>,
}

impl ManualVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a visibility ratio for `anchor` to every observer of it.
    pub fn report(&self, anchor: &str, ratio: f32) {
        let callbacks: Vec<_> = self
            .observations
            .borrow()
            .iter()
            .filter(|o| o.anchor == anchor)
            .map(|o| o.callback.clone())
            .collect();
        for cb in callbacks {
            let mut f = cb.borrow_mut();
            (*f)(ratio);
        }
    }

    pub fn active_count(&self) -> usize {
        self.observations.borrow().len()
    }

    pub fn threshold_of(&self, anchor: &str) -> Option<f32> {
        self.observations
            .borrow()
            .iter()
            .find(|o| o.anchor == anchor)
            .map(|o| o.threshold)
    }
}

impl VisibilityObserver for ManualVisibility {
    fn observe(&self, anchor: &str, threshold: f32, callback: Box<dyn FnMut(f32)>) -> Teardown {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observations.borrow_mut().push(Observation {
            id,
            anchor: anchor.to_string(),
            threshold,
            callback: Rc::new(RefCell::new(callback)),
        });
        let observations = Rc::downgrade(&self.observations);
        Teardown::new(move || {
            if let Some(o) = observations.upgrade() {
                o.borrow_mut().retain(|obs| obs.id != id);
            }
        })
    }
}

/// Clock advanced explicitly by tests.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
