// Host-side tests for the emulated device.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod emulator {
    include!("../src/emulator.rs");
}

use ar_core::*;
use emulator::{status_text, EmulatedRig, FloorHitSource};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn default_headset_looks_down_at_the_floor() {
    let rig = EmulatedRig::default();
    let pose = rig.headset_pose();
    assert!(close(pose.transform_point3(Vec3::ZERO), EMU_HEADSET_POSITION));

    let hits = FloorHitSource::default().hits(pose);
    assert_eq!(hits.len(), 1);
    let p = hits[0].transform_point3(Vec3::ZERO);
    let pitch = EMU_HEADSET_PITCH_DEG.to_radians();
    let expected_z = -EMU_HEADSET_POSITION.y / (-pitch).tan();
    assert!(close(p, Vec3::new(0.0, EMU_FLOOR_HEIGHT, expected_z)), "{p:?}");
}

#[test]
fn no_floor_hit_when_looking_up() {
    let mut rig = EmulatedRig::default();
    rig.nudge(0.0, 60.0);
    assert!(rig.pitch_deg() > 0.0);
    assert!(FloorHitSource::default().hits(rig.headset_pose()).is_empty());
}

#[test]
fn yaw_turns_the_floor_hit_around_the_headset() {
    let mut rig = EmulatedRig::default();
    let ahead = FloorHitSource::default().hits(rig.headset_pose())[0];
    rig.nudge(90.0, 0.0);
    let left = FloorHitSource::default().hits(rig.headset_pose())[0];
    let a = ahead.transform_point3(Vec3::ZERO);
    let l = left.transform_point3(Vec3::ZERO);
    // Same distance from the headset's footprint, now off to the -X side.
    let foot = Vec3::new(EMU_HEADSET_POSITION.x, 0.0, EMU_HEADSET_POSITION.z);
    assert!(((a - foot).length() - (l - foot).length()).abs() < 1e-3);
    assert!(l.x < -1.0 && l.z.abs() < 1e-3, "{l:?}");
}

#[test]
fn controller_starts_at_rest_and_aims_at_pointer() {
    let mut rig = EmulatedRig::default();
    let rest = Mat4::from_rotation_translation(EMU_CONTROLLER_ORIENTATION, EMU_CONTROLLER_OFFSET);
    assert!(rig.controller_pose().abs_diff_eq(rest, 1e-6));

    let ray = Ray::new(EMU_HEADSET_POSITION, Vec3::new(0.3, -0.5, -1.0));
    rig.aim(&ray);
    let pose = rig.controller_pose();
    let forward = pose.transform_vector3(Vec3::NEG_Z);
    let expected = (ray.at(EMU_AIM_DISTANCE) - EMU_CONTROLLER_OFFSET).normalize();
    assert!(close(forward, expected));
    assert!(close(pose.transform_point3(Vec3::ZERO), EMU_CONTROLLER_OFFSET));
}

#[test]
fn camera_takes_the_headset_pose() {
    let mut rig = EmulatedRig::default();
    rig.nudge(15.0, 5.0);
    let mut camera = Camera::default();
    rig.apply_to(&mut camera);
    assert!(camera.pose().abs_diff_eq(rig.headset_pose(), 1e-6));
}

#[test]
fn status_reports_reticle_and_selection() {
    let mut scene = ArScene::new(SceneVariant::Inspect, StdRng::seed_from_u64(1));
    let rig = EmulatedRig::default();
    let text = status_text(&scene, &rig, 0);
    assert!(text.contains("scene: inspect"));
    assert!(text.contains("reticle: searching"));
    assert!(text.contains("tap to place"));

    let reticle = scene.reticle();
    reticle.apply_hits(&mut scene.graph, &[Mat4::IDENTITY]);
    let text = status_text(&scene, &rig, 0);
    assert!(text.contains("reticle: on floor"));
}
