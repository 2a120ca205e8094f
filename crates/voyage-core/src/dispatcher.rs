//! Scroll-driven scene dispatch.
//!
//! Each narrative section is an [`Anchor`]: a named element plus the store
//! action to run when enough of it scrolls into view. The dispatcher fires an
//! anchor once per crossing into view and stays quiet while it remains visible.
//! When sections overlap, whichever crossed most recently wrote last.

use crate::city::{CityRegistry, CitySlug};
use crate::constants::{PANEL_THRESHOLD, SCENE_THRESHOLD};
use crate::content::ContentLibrary;
use crate::env::{Teardown, VisibilityObserver};
use crate::store::{AppStore, Scene};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorAction {
    Scene(Scene),
    City(CitySlug),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub id: String,
    pub threshold: f32,
    pub action: AnchorAction,
}

impl Anchor {
    pub fn scene(id: &str, scene: Scene) -> Self {
        Self {
            id: id.to_string(),
            threshold: SCENE_THRESHOLD,
            action: AnchorAction::Scene(scene),
        }
    }

    pub fn destination(slug: CitySlug) -> Self {
        Self {
            id: destination_anchor_id(slug),
            threshold: PANEL_THRESHOLD,
            action: AnchorAction::City(slug),
        }
    }
}

/// Element id of a destination panel.
#[inline]
pub fn destination_anchor_id(slug: CitySlug) -> String {
    format!("destination-{}", slug)
}

/// The page-level sections: welcome hero, route, and the sticky globe.
pub fn primary_anchors() -> Vec<Anchor> {
    vec![
        Anchor::scene("welcome", Scene::Welcome),
        Anchor::scene("route", Scene::Route),
        Anchor::scene("globe", Scene::GlobeIntro),
    ]
}

/// One anchor per destination panel, in content order. Content that names a
/// city missing from the registry gets no anchor.
pub fn destination_anchors(library: &ContentLibrary, registry: &CityRegistry) -> Vec<Anchor> {
    library
        .iter()
        .filter_map(|d| d.city_slug(registry))
        .map(Anchor::destination)
        .collect()
}

fn dispatch(store: &AppStore, action: AnchorAction) {
    log::debug!("[dispatch] {:?}", action);
    match action {
        AnchorAction::Scene(scene) => store.set_scene(scene),
        AnchorAction::City(city) => store.set_city(Some(city)),
    }
}

/// Live set of anchor observations. Dropping it unregisters all of them.
pub struct SceneDispatcher {
    watches: SmallVec<[Teardown; 8]>,
}

impl SceneDispatcher {
    pub fn attach(
        store: &AppStore,
        observer: &dyn VisibilityObserver,
        anchors: impl IntoIterator<Item = Anchor>,
    ) -> Self {
        let mut watches = SmallVec::new();
        for anchor in anchors {
            let store = store.clone();
            let threshold = anchor.threshold;
            let action = anchor.action;
            let mut in_view = false;
            let watch = observer.observe(
                &anchor.id,
                threshold,
                Box::new(move |ratio: f32| {
                    if ratio >= threshold {
                        if !in_view {
                            in_view = true;
                            dispatch(&store, action);
                        }
                    } else {
                        in_view = false;
                    }
                }),
            );
            watches.push(watch);
        }
        log::info!("[dispatch] observing {} anchors", watches.len());
        Self { watches }
    }

    #[inline]
    pub fn anchor_count(&self) -> usize {
        self.watches.len()
    }

    pub fn detach(self) {}
}
