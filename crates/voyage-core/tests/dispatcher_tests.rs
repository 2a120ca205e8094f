// Host-side tests for scroll-driven scene dispatch.

use std::rc::Rc;
use voyage_core::*;

fn store() -> AppStore {
    AppStore::new(Rc::new(MemoryStorage::new()))
}

const CONTENT: &str = r#"[
  {"slug":"tokyo","city":"Tokyo","country":"Japan","headline":"h","role":"r",
   "timeframe":"2019","coordinates":{"lat":35.6762,"lng":139.6503},"overview":"o"},
  {"slug":"new-york","city":"New York","country":"USA","headline":"h","role":"r",
   "timeframe":"2015","coordinates":{"lat":40.7128,"lng":-74.006},"overview":"o"},
  {"slug":"atlantis","city":"Atlantis","country":"Sea","headline":"h","role":"r",
   "timeframe":"-","coordinates":{"lat":0,"lng":0},"overview":"o"}
]"#;

#[test]
fn anchors_carry_their_thresholds() {
    let anchors = primary_anchors();
    assert_eq!(anchors.len(), 3);
    assert!(anchors.iter().all(|a| a.threshold == SCENE_THRESHOLD));
    let panel = Anchor::destination(CitySlug::Tokyo);
    assert_eq!(panel.id, "destination-tokyo");
    assert_eq!(panel.threshold, PANEL_THRESHOLD);
}

#[test]
fn observer_is_registered_with_each_threshold() {
    let store = store();
    let observer = ManualVisibility::new();
    let mut anchors = primary_anchors();
    anchors.push(Anchor::destination(CitySlug::Copenhagen));
    let dispatcher = SceneDispatcher::attach(&store, &observer, anchors);
    assert_eq!(dispatcher.anchor_count(), 4);
    assert_eq!(observer.active_count(), 4);
    assert_eq!(observer.threshold_of("route"), Some(0.6));
    assert_eq!(observer.threshold_of("destination-copenhagen"), Some(0.5));
}

#[test]
fn scene_changes_only_past_threshold() {
    let store = store();
    let observer = ManualVisibility::new();
    let _d = SceneDispatcher::attach(&store, &observer, primary_anchors());

    observer.report("route", 0.59);
    assert_eq!(store.get_state().active_scene, Scene::Welcome);
    observer.report("route", 0.6);
    assert_eq!(store.get_state().active_scene, Scene::Route);
    observer.report("globe", 0.9);
    assert_eq!(store.get_state().active_scene, Scene::GlobeIntro);
}

#[test]
fn fires_once_per_crossing() {
    let store = store();
    let observer = ManualVisibility::new();
    let _d = SceneDispatcher::attach(&store, &observer, primary_anchors());

    observer.report("route", 0.7);
    store.set_scene(Scene::Welcome);
    // Still in view: no second dispatch.
    observer.report("route", 0.9);
    assert_eq!(store.get_state().active_scene, Scene::Welcome);

    observer.report("route", 0.1);
    observer.report("route", 0.8);
    assert_eq!(store.get_state().active_scene, Scene::Route);
}

#[test]
fn most_recent_crossing_wins_when_sections_overlap() {
    let store = store();
    let observer = ManualVisibility::new();
    let _d = SceneDispatcher::attach(&store, &observer, primary_anchors());

    observer.report("globe", 0.7);
    observer.report("route", 0.65);
    assert_eq!(store.get_state().active_scene, Scene::Route);
    observer.report("globe", 0.95);
    assert_eq!(store.get_state().active_scene, Scene::Route);
}

#[test]
fn destination_panels_select_their_city() {
    let store = store();
    let registry = CityRegistry::default();
    let library = ContentLibrary::from_json(CONTENT, &registry).unwrap();
    let anchors = destination_anchors(&library, &registry);
    // atlantis has no globe pin and gets no anchor
    assert_eq!(anchors.len(), 2);

    let observer = ManualVisibility::new();
    let _d = SceneDispatcher::attach(&store, &observer, anchors);
    observer.report("destination-tokyo", 0.5);
    let s = store.get_state();
    assert_eq!(s.active_city, Some(CitySlug::Tokyo));
    assert_eq!(s.active_scene, Scene::Destinations);

    observer.report("destination-atlantis", 1.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::Tokyo));
}

#[test]
fn dropping_the_dispatcher_unregisters_everything() {
    let store = store();
    let observer = ManualVisibility::new();
    let dispatcher = SceneDispatcher::attach(&store, &observer, primary_anchors());
    dispatcher.detach();
    assert_eq!(observer.active_count(), 0);
    observer.report("route", 1.0);
    assert_eq!(store.get_state().active_scene, Scene::Welcome);
}

#[test]
fn scroll_selection_starts_a_camera_flight() {
    let store = store();
    let clock = Rc::new(ManualClock::new(0.0));
    let controller = CameraController::mount(
        store.clone(),
        Rc::new(CityRegistry::default()),
        clock,
        ExperienceParams::default(),
    );
    let observer = ManualVisibility::new();
    let _d = SceneDispatcher::attach(
        &store,
        &observer,
        [Anchor::destination(CitySlug::MountainView)],
    );
    observer.report("destination-mountain-view", 0.75);
    assert!(controller.is_flying());
    assert!(store.get_state().camera_flying);
}
