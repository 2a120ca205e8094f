// Conversions between DOM/JS strings and core types. Kept free of browser calls
// so the host tests can include it directly.

use voyage_core::{AppState, CameraPose, CityRegistry, CitySlug, DayNight, TourMode};

/// A named piece of [`AppState`] that JS can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateSlice {
    ActiveScene,
    ActiveCity,
    PreviewCity,
    TourMode,
    DayNight,
    AudioEnabled,
    ReducedMotion,
    GlobeReady,
    CameraFlying,
}

/// Slice value in a JS-friendly shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceValue {
    Text(&'static str),
    Flag(bool),
    Null,
}

impl StateSlice {
    pub const ALL: [StateSlice; 9] = [
        StateSlice::ActiveScene,
        StateSlice::ActiveCity,
        StateSlice::PreviewCity,
        StateSlice::TourMode,
        StateSlice::DayNight,
        StateSlice::AudioEnabled,
        StateSlice::ReducedMotion,
        StateSlice::GlobeReady,
        StateSlice::CameraFlying,
    ];

    /// Accepts the camelCase field names used by `state_json`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            StateSlice::ActiveScene => "activeScene",
            StateSlice::ActiveCity => "activeCity",
            StateSlice::PreviewCity => "previewCity",
            StateSlice::TourMode => "tourMode",
            StateSlice::DayNight => "dayNight",
            StateSlice::AudioEnabled => "audioEnabled",
            StateSlice::ReducedMotion => "reducedMotionPreferred",
            StateSlice::GlobeReady => "globeReady",
            StateSlice::CameraFlying => "cameraFlying",
        }
    }

    pub fn read(self, state: &AppState) -> SliceValue {
        let city = |c: Option<CitySlug>| c.map_or(SliceValue::Null, |c| SliceValue::Text(c.as_str()));
        match self {
            StateSlice::ActiveScene => SliceValue::Text(state.active_scene.as_str()),
            StateSlice::ActiveCity => city(state.active_city),
            StateSlice::PreviewCity => city(state.preview_city),
            StateSlice::TourMode => SliceValue::Text(tour_mode_name(state.tour_mode)),
            StateSlice::DayNight => SliceValue::Text(theme_attr(state.day_night)),
            StateSlice::AudioEnabled => SliceValue::Flag(state.audio_enabled),
            StateSlice::ReducedMotion => SliceValue::Flag(state.reduced_motion_preferred),
            StateSlice::GlobeReady => SliceValue::Flag(state.globe_ready),
            StateSlice::CameraFlying => SliceValue::Flag(state.camera_flying),
        }
    }
}

#[inline]
pub fn tour_mode_name(mode: TourMode) -> &'static str {
    match mode {
        TourMode::Manual => "manual",
        TourMode::Auto => "auto",
    }
}

#[inline]
pub fn theme_attr(mode: DayNight) -> &'static str {
    mode.as_str()
}

/// Resolve a `data-city` attribute. Blank or unknown slugs resolve to nothing.
pub fn city_from_attr(raw: Option<&str>, registry: &CityRegistry) -> Option<CitySlug> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    registry.lookup(raw).map(|c| c.slug())
}

/// First candidate id the page actually has, in order.
pub fn first_present<'a>(candidates: &[&'a str], exists: impl Fn(&str) -> bool) -> Option<&'a str> {
    candidates.iter().copied().find(|id| exists(id))
}

/// Flatten a pose for the renderer: eye xyz then target xyz.
#[inline]
pub fn pose_to_array(pose: CameraPose) -> [f32; 6] {
    let p = pose.position;
    let t = pose.target;
    [p.x, p.y, p.z, t.x, t.y, t.z]
}

/// Frame delta in seconds, clamped to `[0, max_sec]`. The first frame has none.
#[inline]
pub fn frame_delta_sec(last_ms: Option<f64>, now_ms: f64, max_sec: f32) -> f32 {
    match last_ms {
        Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, max_sec),
        None => 0.0,
    }
}
