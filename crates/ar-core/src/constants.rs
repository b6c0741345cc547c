use glam::{Quat, Vec3};

// Shared scene tuning constants used by the web frontend and the logic crate.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 10.0;

// Lighting (sRGB hex colours, intensities in renderer units)
pub const AMBIENT_COLOR: u32 = 0xffffff;
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const HEMISPHERE_SKY_COLOR: u32 = 0xffffff;
pub const HEMISPHERE_GROUND_COLOR: u32 = 0xbbbbff;
pub const HEMISPHERE_INTENSITY: f32 = 1.0;

// Spawning
pub const MODEL_SCALE: f32 = 0.1; // hard-set after decomposing the reticle pose
pub const MODEL_ASSET_PATH: &str = "assets/model.glb";
pub const COIN_ASSET_PATH: &str = "assets/coin.glb";
pub const COIN_COUNT: usize = 3;
pub const COIN_SCALE: f32 = 0.1;
pub const COIN_SPREAD: f32 = 2.0; // x/z drawn from [-COIN_SPREAD, COIN_SPREAD]
pub const COIN_HEIGHT: f32 = 1.0;

// Interaction
pub const HIGHLIGHT_SCALE_DELTA: f32 = 0.1; // added per axis while active
pub const PANEL_OFFSET: Vec3 = Vec3::new(0.0, 0.25, 0.0); // from the spawned model's origin
pub const IDLE_SPIN_RAD_PER_SEC: f32 = 0.5;
pub const RAY_MAX_DISTANCE: f32 = CAMERA_FAR;

// Reticle proxy (flat square drawn on the detected surface)
pub const RETICLE_HALF_EXTENT: f32 = 0.1;
pub const RETICLE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];

// Emulated device rig, used when no native immersive-ar support exists
pub const EMU_HEADSET_POSITION: Vec3 = Vec3::new(0.0, 1.6, 0.0);
pub const EMU_HEADSET_PITCH_DEG: f32 = -35.0;
pub const EMU_CONTROLLER_OFFSET: Vec3 = Vec3::new(0.25, 1.35, -0.35);
// Rest orientation: tilted 20 degrees down around +X
pub const EMU_CONTROLLER_ORIENTATION: Quat = Quat::from_xyzw(-0.173_648_18, 0.0, 0.0, 0.984_807_7);
pub const EMU_AIM_DISTANCE: f32 = 2.0;
pub const EMU_FLOOR_HEIGHT: f32 = 0.0;
pub const EMU_NUDGE_STEP_DEG: f32 = 3.0;
pub const EMU_PITCH_LIMIT_DEG: f32 = 80.0;

#[inline]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
