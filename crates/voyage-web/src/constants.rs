// DOM hooks and frame-loop tuning for the browser front-end

// Toggle buttons
pub const DAY_NIGHT_TOGGLE_ID: &str = "day-night-toggle";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";
pub const TOUR_TOGGLE_ID: &str = "tour-toggle";
pub const GLOBE_RETURN_ID: &str = "globe-return";

// Scroll targets
pub const GLOBE_SECTION_ID: &str = "globe";
pub const DESTINATIONS_SECTION_ID: &str = "destinations";

// Globe pins and destination links carry `data-city="<slug>"`
pub const CITY_ATTR: &str = "data-city";
pub const CITY_SELECTOR: &str = "[data-city]";

// Written on <body> so CSS can follow the day/night mode
pub const THEME_ATTR: &str = "data-theme";

// Written on toggle buttons to reflect the current state
pub const PRESSED_ATTR: &str = "aria-pressed";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Frame loop: clamp long gaps (background tabs) so auto-rotate does not jump
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
