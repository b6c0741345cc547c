// Host-side tests for renderer geometry and light folding.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod shading {
    include!("../src/shading.rs");
}

use ar_core::*;
use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shading::*;

#[test]
fn unit_cube_spans_half_extents_with_outward_normals() {
    let cube = unit_cube();
    assert_eq!(cube.len(), 36);
    for v in &cube {
        let p = Vec3::from(v.position);
        let n = Vec3::from(v.normal);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(p.abs().max_element() <= 0.5 + 1e-6);
        // Every vertex lies on the face its normal points out of.
        assert!((p.dot(n) - 0.5).abs() < 1e-6);
    }
}

#[test]
fn cube_triangles_wind_counter_clockwise_from_outside() {
    for tri in unit_cube().chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
        let face = (b - a).cross(c - a).normalize();
        assert!(face.dot(Vec3::from(tri[0].normal)) > 0.99);
    }
}

#[test]
fn proxy_matrix_maps_cube_onto_bounds() {
    let bounds = Aabb::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 0.5, 4.0));
    let world =
        Mat4::from_rotation_translation(Quat::from_rotation_y(0.7), Vec3::new(5.0, 1.0, 0.0));
    let m = proxy_matrix(world, &bounds);
    let lo = m.transform_point3(Vec3::splat(-0.5));
    let hi = m.transform_point3(Vec3::splat(0.5));
    assert!(lo.abs_diff_eq(world.transform_point3(bounds.min), 1e-5));
    assert!(hi.abs_diff_eq(world.transform_point3(bounds.max), 1e-5));
}

#[test]
fn scene_lights_fold_into_ambient_and_hemisphere_terms() {
    let scene = ArScene::new(SceneVariant::Inspect, StdRng::seed_from_u64(0));
    let terms = LightTerms::from_lights(&scene.graph.lights());
    assert!(terms.ambient.abs_diff_eq(Vec3::splat(AMBIENT_INTENSITY), 1e-6));
    let sky = Vec3::from(hex_to_rgb(HEMISPHERE_SKY_COLOR)) * HEMISPHERE_INTENSITY;
    let ground = Vec3::from(hex_to_rgb(HEMISPHERE_GROUND_COLOR)) * HEMISPHERE_INTENSITY;
    assert!(terms.sky.abs_diff_eq(sky, 1e-6));
    assert!(terms.ground.abs_diff_eq(ground, 1e-6));
}

#[test]
fn no_lights_means_black() {
    assert_eq!(LightTerms::from_lights(&[]), LightTerms::default());
}
