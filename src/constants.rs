// Web front-end wiring and scene constants.

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const PLAY_BUTTON_ID: &str = "transport-play";
pub const PAUSE_BUTTON_ID: &str = "transport-pause";
pub const STOP_BUTTON_ID: &str = "transport-stop";

// Intrinsic content size, read from the canvas; absent means audio-only
pub const CONTENT_WIDTH_ATTR: &str = "data-content-width";
pub const CONTENT_HEIGHT_ATTR: &str = "data-content-height";

// Default scene: (label, url, content-relative x, y)
pub const DEFAULT_SOURCES: &[(&str, &str, f32, f32)] = &[
    ("bells", "audio/bells.ogg", 0.2, 0.3),
    ("drone", "audio/drone.ogg", 0.5, 0.5),
    ("voices", "audio/voices.ogg", 0.8, 0.35),
    ("rain", "audio/rain.ogg", 0.65, 0.8),
];

// Frame loop
pub const MAX_FRAME_SECS: f32 = 0.25; // longer gaps (background tabs) count as one hitch
