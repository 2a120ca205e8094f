use crate::city::{CityRegistry, CitySlug};
use crate::store::{AppStore, TourMode};
use std::rc::Rc;

/// A visitor clicked a city: commit to it and stop any running tour.
pub fn select_city(store: &AppStore, city: CitySlug) {
    store.set_city(Some(city));
    store.set_tour_mode(TourMode::Manual);
}

/// Back to the free-spinning globe: drop the selection and stop any tour,
/// which would otherwise pick a city again on the next frame.
pub fn clear_city(store: &AppStore) {
    store.set_tour_mode(TourMode::Manual);
    store.set_city(None);
}

/// Flip between manual and auto tour. Starting a tour with nothing selected
/// begins at the first city.
pub fn toggle_tour(store: &AppStore, registry: &CityRegistry) -> TourMode {
    let state = store.get_state();
    let mode = state.tour_mode.toggled();
    store.set_tour_mode(mode);
    if mode == TourMode::Auto && state.active_city.is_none() {
        store.set_city(registry.first_city());
    }
    log::info!("[tour] {:?}", mode);
    mode
}

/// Advances the auto tour from the frame loop: once the camera has landed,
/// wait `dwell_ms` and move on to the next city. Past the last city the tour
/// drops back to manual.
pub struct TourDriver {
    store: AppStore,
    registry: Rc<CityRegistry>,
    dwell_ms: f64,
    landed_at: Option<f64>,
}

impl TourDriver {
    pub fn new(store: AppStore, registry: Rc<CityRegistry>, dwell_ms: f64) -> Self {
        Self {
            store,
            registry,
            dwell_ms,
            landed_at: None,
        }
    }

    pub fn tick(&mut self, now_ms: f64) {
        let state = self.store.get_state();
        if state.tour_mode != TourMode::Auto || state.camera_flying {
            self.landed_at = None;
            return;
        }
        let Some(current) = state.active_city else {
            self.landed_at = None;
            self.store.set_city(self.registry.first_city());
            return;
        };
        let landed_at = *self.landed_at.get_or_insert(now_ms);
        if now_ms - landed_at < self.dwell_ms {
            return;
        }
        self.landed_at = None;
        match self.registry.next_city(current) {
            Some(next) => {
                log::info!("[tour] {} -> {}", current, next);
                self.store.set_city(Some(next));
            }
            None => {
                log::info!("[tour] finished at {}", current);
                self.store.set_tour_mode(TourMode::Manual);
            }
        }
    }
}
