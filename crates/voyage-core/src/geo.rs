//! Pure geometry helpers: lat/lng to globe-space positions, camera viewpoints,
//! angle interpolation and easing curves.
//!
//! Out-of-range geographic input is clamped rather than rejected: latitude is
//! clamped to \[-90, 90\], longitude wrapped into \[-180, 180\], and non-finite
//! values are treated as zero. The projection therefore never yields NaN for
//! a finite radius.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Geographic coordinates in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f32,
    pub lng: f32,
}

impl Coordinates {
    pub const fn new(lat: f32, lng: f32) -> Self {
        Self { lat, lng }
    }

    /// Clamp latitude and wrap longitude into the documented domain.
    pub fn clamped(self) -> Self {
        let lat = if self.lat.is_finite() {
            self.lat.clamp(-90.0, 90.0)
        } else {
            0.0
        };
        let lng = if self.lng.is_finite() {
            wrap_longitude(self.lng)
        } else {
            0.0
        };
        Self { lat, lng }
    }

    #[inline]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[inline]
fn wrap_longitude(lng: f32) -> f32 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Project a lat/lng pair onto a sphere of `radius` centred at the origin.
///
/// `phi` is the polar angle from +Y and `theta` the azimuth offset by 180
/// degrees, so (0, 0) lands on +X and the north pole on +Y.
pub fn project_to_sphere(lat: f32, lng: f32, radius: f32) -> Vec3 {
    let c = Coordinates::new(lat, lng).clamped();
    let phi = (90.0 - c.lat).to_radians();
    let theta = (c.lng + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`project_to_sphere`]; the radius is discarded.
pub fn sphere_to_lat_lng(point: Vec3) -> Coordinates {
    let r = point.length();
    if !(r > f32::EPSILON) {
        return Coordinates::default();
    }
    let phi = (point.y / r).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);
    Coordinates {
        lat: 90.0 - phi.to_degrees(),
        lng: wrap_longitude(theta.to_degrees() - 180.0),
    }
    .clamped()
}

/// Eye position for framing a city: the same projection, pulled back to
/// `distance` from the globe centre.
#[inline]
pub fn camera_position_for_city(lat: f32, lng: f32, distance: f32) -> Vec3 {
    project_to_sphere(lat, lng, distance)
}

/// Interpolate between two angles (radians) along the shorter arc.
///
/// The result is not normalised; it moves continuously from `start` so that
/// consecutive frames never jump across the ±π seam.
pub fn interpolate_angle(start: f32, end: f32, t: f32) -> f32 {
    let difference = (end - start + PI).rem_euclid(TAU) - PI;
    start + difference * t
}

/// Normalise an angle into (-π, π].
pub fn wrap_angle(angle: f32) -> f32 {
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a + TAU
    } else {
        a
    }
}

#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// Easing curve selectable by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInOutCubic,
}

impl Easing {
    pub const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInOutCubic,
    ];

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::EaseIn => ease_in(t),
            Easing::EaseOut => ease_out(t),
            Easing::EaseInOut => ease_in_out(t),
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
        }
    }
}
