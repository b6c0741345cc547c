/// Page wiring and front-end tuning constants.
///
/// Scene-level values (scales, offsets, emulator rig) live in `ar_core`; this
/// file only names DOM hooks and browser-facing knobs.
// DOM ids expected in (or created on) the host page
pub const CANVAS_ID: &str = "app-canvas";
pub const AR_BUTTON_ID: &str = "ar-button";
pub const DEBUG_PANEL_ID: &str = "xr-debug";
pub const PANEL_LAYER_ID: &str = "panel-layer";
pub const ACTIVE_PANEL_ID: &str = "active-panel";

// URL query key selecting the scene variant (`?scene=coins`)
pub const SCENE_QUERY_KEY: &str = "scene";

// WebXR session parameters
pub const SESSION_MODE: &str = "immersive-ar";
pub const REQUIRED_FEATURES: &[&str] = &["hit-test"];
pub const OPTIONAL_FEATURES: &[&str] = &["local-floor", "dom-overlay"];
pub const POSE_SPACE: &str = "local";
pub const HIT_TEST_SPACE: &str = "viewer";

// Clear colors: opaque backdrop for the emulated view, transparent over passthrough
pub const EMULATED_CLEAR_COLOR: [f32; 4] = [0.06, 0.07, 0.10, 1.0];
pub const PASSTHROUGH_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

// Emulated controller proxy box (meters), drawn only without a real device
pub const CONTROLLER_PROXY_SIZE: [f32; 3] = [0.03, 0.03, 0.12];
pub const CONTROLLER_PROXY_COLOR: [f32; 4] = [0.85, 0.85, 0.9, 1.0];

// Reticle plate thickness (meters)
pub const RETICLE_THICKNESS: f32 = 0.004;

// Debug panel refresh cadence (frames)
pub const DEBUG_REFRESH_FRAMES: u32 = 10;
