// Emulated XR device for browsers without `immersive-ar`.
//
// A fixed headset looks down at a virtual floor and a single controller
// is aimed by the pointer. Hit tests are answered by casting the viewer's
// forward ray against that floor.

use ar_core::{
    ray_plane_y, ArScene, Camera, NodeId, Ray, SpawnPhase, CAMERA_FAR, EMU_AIM_DISTANCE,
    EMU_CONTROLLER_OFFSET, EMU_CONTROLLER_ORIENTATION, EMU_FLOOR_HEIGHT, EMU_HEADSET_PITCH_DEG,
    EMU_HEADSET_POSITION, EMU_PITCH_LIMIT_DEG,
};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Headset and controller poses of the emulated device.
#[derive(Clone, Debug)]
pub struct EmulatedRig {
    yaw_deg: f32,
    pitch_deg: f32,
    controller_rotation: Quat,
    pub pointer_down: bool,
}

impl Default for EmulatedRig {
    fn default() -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: EMU_HEADSET_PITCH_DEG,
            controller_rotation: EMU_CONTROLLER_ORIENTATION,
            pointer_down: false,
        }
    }
}

impl EmulatedRig {
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn headset_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_deg.to_radians(),
            self.pitch_deg.to_radians(),
            0.0,
        )
    }

    pub fn headset_pose(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.headset_rotation(), EMU_HEADSET_POSITION)
    }

    pub fn controller_pose(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.controller_rotation, EMU_CONTROLLER_OFFSET)
    }

    /// Turn the headset. Pitch is clamped so the view never flips over.
    pub fn nudge(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw_deg = (self.yaw_deg + yaw_deg) % 360.0;
        self.pitch_deg =
            (self.pitch_deg + pitch_deg).clamp(-EMU_PITCH_LIMIT_DEG, EMU_PITCH_LIMIT_DEG);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Point the controller at the spot `ray` reaches after the aim distance.
    pub fn aim(&mut self, ray: &Ray) {
        let target = ray.at(EMU_AIM_DISTANCE);
        let dir = target - EMU_CONTROLLER_OFFSET;
        if dir.length_squared() > 1e-8 {
            self.controller_rotation = Quat::from_rotation_arc(Vec3::NEG_Z, dir.normalize());
        }
    }

    /// Place `camera` at the headset.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = EMU_HEADSET_POSITION;
        camera.orientation = self.headset_rotation();
    }
}

/// Hit-test source answering with the floor plane under the viewer's gaze.
#[derive(Clone, Copy, Debug)]
pub struct FloorHitSource {
    height: f32,
}

impl Default for FloorHitSource {
    fn default() -> Self {
        Self {
            height: EMU_FLOOR_HEIGHT,
        }
    }
}

impl FloorHitSource {
    /// Zero or one upward-facing floor pose along the viewer's forward ray.
    pub fn hits(&self, viewer_pose: Mat4) -> Vec<Mat4> {
        let ray = Ray::from_pose(viewer_pose);
        match ray_plane_y(ray.origin, ray.direction, self.height) {
            Some(t) if t <= CAMERA_FAR => vec![Mat4::from_translation(ray.at(t))],
            _ => Vec::new(),
        }
    }
}

/// Multi-line status for the emulator's debug panel.
pub fn status_text(scene: &ArScene, rig: &EmulatedRig, controller: usize) -> String {
    let graph = &scene.graph;
    let name = |id: NodeId| graph.get(id).map(|n| n.name.clone()).unwrap_or_default();
    let reticle = if scene.reticle().is_visible(graph) {
        "on floor"
    } else {
        "searching"
    };
    let placement = match scene.spawner().phase() {
        SpawnPhase::Idle => "tap to place",
        SpawnPhase::Requested => "placed",
    };
    let mut lines = vec![
        "emulated XR device".to_string(),
        format!("scene: {}", scene.variant().name()),
        format!("view: yaw {:.0} pitch {:.0}", rig.yaw_deg(), rig.pitch_deg()),
        format!("reticle: {reticle}"),
        format!("model: {placement}"),
    ];
    if let Some(active) = scene.highlighter().active() {
        lines.push(format!("selected: {}", name(active)));
    }
    if let Some(held) = scene.grabber().held_by(controller) {
        lines.push(format!("holding: {}", name(held)));
    }
    lines.push("arrows look, r reset, d hide".to_string());
    lines.join("\n")
}
