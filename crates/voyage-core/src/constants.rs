// Shared scene/camera tuning constants used by the core and the web frontend.

// Globe layout
pub const GLOBE_RADIUS: f32 = 2.0; // radius every city position is projected onto
pub const CAMERA_CITY_DISTANCE: f32 = 4.2; // eye distance from the origin when framing a city

// Default view: looking at the origin from above the equator
pub const DEFAULT_VIEW_LAT: f32 = 20.0;
pub const DEFAULT_VIEW_LNG: f32 = 0.0;
pub const DEFAULT_VIEW_DISTANCE: f32 = 6.4; // GLOBE_RADIUS * (1 + altitude 2.2)

// Manual camera controls
pub const MIN_VIEW_DISTANCE: f32 = 2.6;
pub const MAX_VIEW_DISTANCE: f32 = 9.0;
pub const MAX_PITCH_RADIANS: f32 = 1.45; // keeps orbiting away from the poles
pub const AUTO_ROTATE_RADIANS_PER_SEC: f32 = 0.07;

// Camera flights (milliseconds)
pub const FLIGHT_DURATION_MS: f64 = 1200.0;
pub const REDUCED_MOTION_FLIGHT_MS: f64 = 500.0;

// Visibility thresholds (fraction of the element in view)
pub const SCENE_THRESHOLD: f32 = 0.6;
pub const PANEL_THRESHOLD: f32 = 0.5;

// Auto tour: how long to stay on a city once the camera has landed
pub const TOUR_DWELL_MS: f64 = 6000.0;

// Durable storage keys
pub const AUDIO_ENABLED_KEY: &str = "audioEnabled";

// Upper bound on listener re-evaluation passes for one outer action
pub const MAX_NOTIFY_PASSES: usize = 64;

/// Tunable parameters for one experience instance.
///
/// Defaults come from the constants above; tests and embedders override single
/// fields with struct update syntax.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceParams {
    pub globe_radius: f32,
    pub camera_distance: f32,
    pub flight_ms: f64,
    pub reduced_flight_ms: f64,
    pub tour_dwell_ms: f64,
}

impl Default for ExperienceParams {
    fn default() -> Self {
        Self {
            globe_radius: GLOBE_RADIUS,
            camera_distance: CAMERA_CITY_DISTANCE,
            flight_ms: FLIGHT_DURATION_MS,
            reduced_flight_ms: REDUCED_MOTION_FLIGHT_MS,
            tour_dwell_ms: TOUR_DWELL_MS,
        }
    }
}

impl ExperienceParams {
    /// Flight duration to use for the given reduced-motion preference.
    #[inline]
    pub fn flight_duration_ms(&self, reduced_motion: bool) -> f64 {
        if reduced_motion {
            self.reduced_flight_ms
        } else {
            self.flight_ms
        }
    }
}
