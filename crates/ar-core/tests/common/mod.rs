// Shared fixtures for the host-side scene tests.
#![allow(dead_code)]

use ar_core::*;
use glam::{Mat4, Quat, Vec3};

pub fn unit_box(half: f32) -> MeshProxy {
    MeshProxy {
        bounds: Aabb::from_half_extents(Vec3::ZERO, Vec3::splat(half)),
        color: [1.0, 1.0, 1.0, 1.0],
    }
}

/// Two parts, "Left" at x = -2 and "Right" at x = +2 in model space.
pub fn two_part_asset() -> ModelAsset {
    let left = AssetNode {
        transform: Transform::from_translation(Vec3::new(-2.0, 0.0, 0.0)),
        ..AssetNode::mesh("Left", unit_box(0.5))
    };
    let right = AssetNode {
        transform: Transform::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        ..AssetNode::mesh("Right", unit_box(0.5))
    };
    ModelAsset {
        path: "test/model.glb".to_string(),
        roots: vec![left, right],
    }
}

pub fn coin_asset() -> ModelAsset {
    ModelAsset {
        path: "test/coin.glb".to_string(),
        roots: vec![AssetNode::mesh("Coin", unit_box(0.5))],
    }
}

pub fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

pub fn approx_quat(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - 1e-5
}

pub fn anchor_pose() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0))
}
