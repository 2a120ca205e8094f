// Host-side tests for city selection and the auto tour.

use std::rc::Rc;
use voyage_core::*;

fn setup() -> (AppStore, Rc<CityRegistry>) {
    (
        AppStore::new(Rc::new(MemoryStorage::new())),
        Rc::new(CityRegistry::default()),
    )
}

#[test]
fn registry_tour_order() {
    let registry = CityRegistry::default();
    let order: Vec<_> = registry.iter().map(|c| c.slug()).collect();
    assert_eq!(
        order,
        vec![
            CitySlug::NewYork,
            CitySlug::WashingtonDc,
            CitySlug::MountainView,
            CitySlug::LosAngeles,
            CitySlug::Tokyo,
            CitySlug::Copenhagen,
        ]
    );
    assert_eq!(registry.first_city(), Some(CitySlug::NewYork));
    assert_eq!(registry.next_city(CitySlug::Copenhagen), None);
    assert_eq!(registry.previous_city(CitySlug::NewYork), None);
    assert_eq!(
        registry.previous_city(CitySlug::Tokyo),
        Some(CitySlug::LosAngeles)
    );
}

#[test]
fn registry_positions_use_its_radius() {
    let registry = CityRegistry::new(3.5);
    assert_eq!(registry.radius(), 3.5);
    for city in registry.iter() {
        assert!((city.scene_position().length() - 3.5).abs() < 1e-4);
    }
    assert!(registry.lookup("atlantis").is_none());
    assert_eq!(
        registry.lookup("tokyo").map(|c| c.name()),
        Some("Tokyo")
    );
}

#[test]
fn clicking_a_city_stops_the_tour() {
    let (store, registry) = setup();
    toggle_tour(&store, &registry);
    assert_eq!(store.get_state().tour_mode, TourMode::Auto);
    select_city(&store, CitySlug::Tokyo);
    let s = store.get_state();
    assert_eq!(s.tour_mode, TourMode::Manual);
    assert_eq!(s.active_city, Some(CitySlug::Tokyo));
    assert_eq!(s.active_scene, Scene::Destinations);
}

#[test]
fn starting_the_tour_selects_the_first_city() {
    let (store, registry) = setup();
    assert_eq!(toggle_tour(&store, &registry), TourMode::Auto);
    assert_eq!(store.get_state().active_city, Some(CitySlug::NewYork));

    assert_eq!(toggle_tour(&store, &registry), TourMode::Manual);
    assert_eq!(store.get_state().active_city, Some(CitySlug::NewYork));
}

#[test]
fn clearing_the_city_stops_the_tour() {
    let (store, registry) = setup();
    let mut driver = TourDriver::new(store.clone(), registry.clone(), 100.0);
    toggle_tour(&store, &registry);
    clear_city(&store);
    let s = store.get_state();
    assert_eq!(s.active_city, None);
    assert_eq!(s.tour_mode, TourMode::Manual);

    driver.tick(0.0);
    driver.tick(1000.0);
    assert_eq!(store.get_state().active_city, None);
}

#[test]
fn starting_the_tour_keeps_an_existing_selection() {
    let (store, registry) = setup();
    store.set_city(Some(CitySlug::LosAngeles));
    toggle_tour(&store, &registry);
    assert_eq!(store.get_state().active_city, Some(CitySlug::LosAngeles));
}

#[test]
fn driver_advances_after_dwell() {
    let (store, registry) = setup();
    let mut driver = TourDriver::new(store.clone(), registry.clone(), 1000.0);
    store.set_tour_mode(TourMode::Auto);

    driver.tick(0.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::NewYork));

    driver.tick(10.0);
    driver.tick(1009.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::NewYork));
    driver.tick(1010.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::WashingtonDc));
}

#[test]
fn driver_waits_for_the_camera_to_land() {
    let (store, registry) = setup();
    let mut driver = TourDriver::new(store.clone(), registry.clone(), 1000.0);
    store.set_tour_mode(TourMode::Auto);
    store.set_city(Some(CitySlug::Tokyo));
    store.set_camera_flying(true);

    driver.tick(0.0);
    driver.tick(5000.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::Tokyo));

    store.set_camera_flying(false);
    driver.tick(5000.0);
    driver.tick(6000.0);
    assert_eq!(store.get_state().active_city, Some(CitySlug::Copenhagen));
}

#[test]
fn driver_returns_to_manual_after_last_city() {
    let (store, registry) = setup();
    let mut driver = TourDriver::new(store.clone(), registry, 100.0);
    store.set_tour_mode(TourMode::Auto);
    store.set_city(Some(CitySlug::Copenhagen));
    driver.tick(0.0);
    driver.tick(100.0);
    let s = store.get_state();
    assert_eq!(s.tour_mode, TourMode::Manual);
    assert_eq!(s.active_city, Some(CitySlug::Copenhagen));
}

#[test]
fn driver_is_idle_in_manual_mode() {
    let (store, registry) = setup();
    let mut driver = TourDriver::new(store.clone(), registry, 100.0);
    driver.tick(0.0);
    driver.tick(10_000.0);
    assert_eq!(store.get_state().active_city, None);
}

#[test]
fn full_tour_with_camera_flights() {
    let (store, registry) = setup();
    let clock = Rc::new(ManualClock::new(0.0));
    let params = ExperienceParams {
        tour_dwell_ms: 500.0,
        ..ExperienceParams::default()
    };
    let controller = CameraController::mount(
        store.clone(),
        registry.clone(),
        clock.clone(),
        params.clone(),
    );
    let mut driver = TourDriver::new(store.clone(), registry.clone(), params.tour_dwell_ms);
    toggle_tour(&store, &registry);

    let mut visited = vec![store.get_state().active_city];
    let mut now = 0.0;
    while store.get_state().tour_mode == TourMode::Auto && now < 60_000.0 {
        now += 100.0;
        clock.set(now);
        controller.tick(now);
        driver.tick(now);
        let city = store.get_state().active_city;
        if visited.last() != Some(&city) {
            visited.push(city);
        }
    }
    assert_eq!(store.get_state().tour_mode, TourMode::Manual);
    let expected: Vec<_> = registry.iter().map(|c| Some(c.slug())).collect();
    assert_eq!(visited, expected);
}
