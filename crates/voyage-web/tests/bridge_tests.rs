// Host-side tests for the DOM/JS bridge conversions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod bridge {
    include!("../src/bridge.rs");
}

use bridge::*;
use glam::Vec3;
use std::rc::Rc;
use voyage_core::{
    AppStore, CameraPose, CityRegistry, CitySlug, DayNight, MemoryStorage, TourMode,
};

#[test]
fn slice_names_match_state_json_keys() {
    let store = AppStore::new(Rc::new(MemoryStorage::new()));
    let json = serde_json::to_value(store.get_state()).unwrap();
    let keys = json.as_object().unwrap();
    for slice in StateSlice::ALL {
        assert!(keys.contains_key(slice.name()), "{} missing", slice.name());
        assert_eq!(StateSlice::from_name(slice.name()), Some(slice));
    }
    assert_eq!(keys.len(), StateSlice::ALL.len());
    assert_eq!(StateSlice::from_name("activecity"), None);
}

#[test]
fn slices_read_js_friendly_values() {
    let store = AppStore::new(Rc::new(MemoryStorage::new()));
    let s = store.get_state();
    assert_eq!(StateSlice::ActiveCity.read(&s), SliceValue::Null);
    assert_eq!(StateSlice::ActiveScene.read(&s), SliceValue::Text("welcome"));
    assert_eq!(StateSlice::CameraFlying.read(&s), SliceValue::Flag(false));

    store.set_city(Some(CitySlug::WashingtonDc));
    store.set_day_night(DayNight::Night);
    store.set_tour_mode(TourMode::Auto);
    let s = store.get_state();
    assert_eq!(
        StateSlice::ActiveCity.read(&s),
        SliceValue::Text("washington-dc")
    );
    assert_eq!(
        StateSlice::ActiveScene.read(&s),
        SliceValue::Text("destinations")
    );
    assert_eq!(StateSlice::DayNight.read(&s), SliceValue::Text("night"));
    assert_eq!(StateSlice::TourMode.read(&s), SliceValue::Text("auto"));
}

#[test]
fn city_attribute_resolution() {
    let registry = CityRegistry::default();
    assert_eq!(
        city_from_attr(Some(" tokyo "), &registry),
        Some(CitySlug::Tokyo)
    );
    assert_eq!(city_from_attr(Some(""), &registry), None);
    assert_eq!(city_from_attr(Some("gotham"), &registry), None);
    assert_eq!(city_from_attr(None, &registry), None);
}

#[test]
fn scroll_target_falls_back_to_section() {
    let present = ["destinations", "destination-tokyo"];
    let exists = |id: &str| present.contains(&id);
    assert_eq!(
        first_present(&["destination-tokyo", "destinations"], exists),
        Some("destination-tokyo")
    );
    assert_eq!(
        first_present(&["destination-copenhagen", "destinations"], exists),
        Some("destinations")
    );
    assert_eq!(first_present(&["destination-copenhagen"], exists), None);
}

#[test]
fn pose_flattens_eye_then_target() {
    let pose = CameraPose {
        position: Vec3::new(1.0, 2.0, 3.0),
        target: Vec3::new(4.0, 5.0, 6.0),
    };
    assert_eq!(pose_to_array(pose), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn frame_delta_is_clamped() {
    assert_eq!(frame_delta_sec(None, 500.0, 0.1), 0.0);
    assert!((frame_delta_sec(Some(1000.0), 1016.0, 0.1) - 0.016).abs() < 1e-6);
    assert_eq!(frame_delta_sec(Some(1000.0), 9000.0, 0.1), 0.1);
    assert_eq!(frame_delta_sec(Some(1000.0), 900.0, 0.1), 0.0);
}
