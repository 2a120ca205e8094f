// Host-side tests for the pure geometry helpers.

use glam::Vec3;
use std::f32::consts::PI;
use voyage_core::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn projection_is_deterministic() {
    for lat in (-90..=90).step_by(15) {
        for lng in (-180..=180).step_by(30) {
            let a = project_to_sphere(lat as f32, lng as f32, GLOBE_RADIUS);
            let b = project_to_sphere(lat as f32, lng as f32, GLOBE_RADIUS);
            assert_eq!(a, b, "projection differs at ({lat}, {lng})");
        }
    }
}

#[test]
fn equator_prime_meridian_lies_on_sphere() {
    let p = project_to_sphere(0.0, 0.0, GLOBE_RADIUS);
    assert!(approx(p.length(), GLOBE_RADIUS, 1e-5));
    // (0, 0) faces +X
    assert!(approx(p.x, GLOBE_RADIUS, 1e-5));
    assert!(approx(p.y, 0.0, 1e-5));
    assert!(approx(p.z, 0.0, 1e-5));
}

#[test]
fn north_pole_maps_to_positive_y() {
    let p = project_to_sphere(90.0, 45.0, 3.0);
    assert!(approx(p.y, 3.0, 1e-5));
    assert!(approx(p.x, 0.0, 1e-5) && approx(p.z, 0.0, 1e-5));
}

#[test]
fn every_projected_point_has_the_requested_radius() {
    for lat in (-90..=90).step_by(10) {
        for lng in (-180..=180).step_by(20) {
            let p = project_to_sphere(lat as f32, lng as f32, 5.0);
            assert!(approx(p.length(), 5.0, 1e-4), "({lat}, {lng}) -> {p:?}");
        }
    }
}

#[test]
fn out_of_range_input_is_clamped_not_nan() {
    let clamped = project_to_sphere(95.0, 200.0, GLOBE_RADIUS);
    let expected = project_to_sphere(90.0, -160.0, GLOBE_RADIUS);
    assert!((clamped - expected).length() < 1e-5);

    let nan = project_to_sphere(f32::NAN, f32::INFINITY, GLOBE_RADIUS);
    assert!(nan.is_finite());
    assert!((nan - project_to_sphere(0.0, 0.0, GLOBE_RADIUS)).length() < 1e-5);
}

#[test]
fn coordinates_clamp_wraps_longitude() {
    let c = Coordinates::new(-120.0, 540.0).clamped();
    assert_eq!(c.lat, -90.0);
    assert!(approx(c.lng, -180.0, 1e-4) || approx(c.lng, 180.0, 1e-4));
    assert!(c.is_in_range());
    assert!(!Coordinates::new(91.0, 0.0).is_in_range());
}

#[test]
fn sphere_to_lat_lng_inverts_projection() {
    let registry = CityRegistry::default();
    for city in registry.iter() {
        let back = sphere_to_lat_lng(city.scene_position());
        let c = city.coordinates();
        assert!(approx(back.lat, c.lat, 1e-2), "{} lat {}", city.name(), back.lat);
        assert!(approx(back.lng, c.lng, 1e-2), "{} lng {}", city.name(), back.lng);
    }
    assert_eq!(sphere_to_lat_lng(Vec3::ZERO), Coordinates::default());
}

#[test]
fn camera_position_is_pulled_back_along_the_same_ray() {
    let eye = camera_position_for_city(35.6762, 139.6503, CAMERA_CITY_DISTANCE);
    let surface = project_to_sphere(35.6762, 139.6503, GLOBE_RADIUS);
    assert!(approx(eye.length(), CAMERA_CITY_DISTANCE, 1e-4));
    assert!(eye.normalize().dot(surface.normalize()) > 0.9999);
}

#[test]
fn interpolate_angle_without_wrap_is_linear() {
    assert!(approx(interpolate_angle(0.0, 1.0, 0.25), 0.25, 1e-6));
    assert!(approx(interpolate_angle(-1.0, 1.0, 0.5), 0.0, 1e-6));
}

#[test]
fn interpolate_angle_takes_short_way_across_seam() {
    // 3.0 -> -3.0 is 0.28 rad through ±π, not 6 rad through zero
    let start = 3.0;
    let end = -3.0;
    for i in 0..=10 {
        let t = i as f32 / 10.0;
        let a = wrap_angle(interpolate_angle(start, end, t));
        assert!(a.abs() >= 3.0 - 1e-4, "t={t} went the long way: {a}");
    }
    let mid = wrap_angle(interpolate_angle(start, end, 0.5));
    assert!(approx(mid.abs(), PI, 1e-4));
    let done = wrap_angle(interpolate_angle(start, end, 1.0));
    assert!(approx(done, end, 1e-4));
}

#[test]
fn interpolate_angle_endpoints() {
    assert_eq!(interpolate_angle(-2.5, 2.5, 0.0), -2.5);
    let end = wrap_angle(interpolate_angle(-2.5, 2.5, 1.0));
    assert!(approx(end, 2.5, 1e-4));
}

#[test]
fn easing_boundaries_are_exact() {
    for easing in Easing::ALL {
        assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
        assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
    }
    assert_eq!(ease_in(0.0), 0.0);
    assert_eq!(ease_out(1.0), 1.0);
    assert_eq!(ease_in_out(1.0), 1.0);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
}

#[test]
fn easing_is_monotonic_and_bounded() {
    for easing in Easing::ALL {
        let mut prev = easing.apply(0.0);
        for i in 1..=1000 {
            let v = easing.apply(i as f32 / 1000.0);
            assert!(v + 1e-6 >= prev, "{easing:?} decreased at step {i}");
            assert!((0.0..=1.0).contains(&v));
            prev = v;
        }
    }
}

#[test]
fn easing_clamps_input() {
    assert_eq!(ease_in_out_cubic(-0.5), 0.0);
    assert_eq!(ease_in_out_cubic(1.5), 1.0);
    assert!(approx(ease_in_out_cubic(0.5), 0.5, 1e-6));
}
