// Host-side tests for spawn gating, placement and coin layout.

mod common;

use ar_core::*;
use common::*;
use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn inspect_scene() -> ArScene {
    ArScene::new(SceneVariant::Inspect, StdRng::seed_from_u64(7))
}

fn show_reticle(scene: &mut ArScene, pose: Mat4) {
    let reticle = scene.reticle();
    reticle.apply_hits(&mut scene.graph, &[pose]);
}

fn any_ray() -> Ray {
    Ray::new(Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z)
}

#[test]
fn repeated_selection_issues_exactly_one_request() {
    for n in 1..=8 {
        let mut scene = inspect_scene();
        show_reticle(&mut scene, anchor_pose());
        let mut issued = Vec::new();
        for _ in 0..n {
            issued.extend(scene.on_select(0, &any_ray()));
        }
        assert_eq!(issued.len(), 1, "n = {n}");
        assert_eq!(scene.spawner().requests_issued(), 1);
        assert_eq!(issued[0].asset, AssetKind::Model);
        assert_eq!(issued[0].path, MODEL_ASSET_PATH);
    }
}

#[test]
fn flag_is_set_before_completion() {
    let mut scene = inspect_scene();
    show_reticle(&mut scene, anchor_pose());
    let reqs = scene.on_select(0, &any_ray());
    assert_eq!(reqs.len(), 1);
    assert!(scene.spawner().has_spawned());
    assert_eq!(scene.spawner().load_state(AssetKind::Model), Some(LoadState::InFlight));
    // Still loading: further selections neither spawn nor panic.
    assert!(scene.on_select(0, &any_ray()).is_empty());
    assert!(scene.model().is_none());
}

#[test]
fn no_request_while_reticle_hidden() {
    let mut scene = inspect_scene();
    assert!(scene.on_select(0, &any_ray()).is_empty());
    assert!(!scene.spawner().has_spawned());
    assert_eq!(scene.spawner().phase(), SpawnPhase::Idle);

    show_reticle(&mut scene, anchor_pose());
    assert_eq!(scene.on_select(0, &any_ray()).len(), 1);
}

#[test]
fn completion_places_model_at_reticle_with_fixed_scale() {
    let mut scene = inspect_scene();
    let rotation = Quat::from_rotation_y(1.1);
    // A scaled reticle pose: the scale must not leak into the model.
    let pose = Mat4::from_scale_rotation_translation(Vec3::splat(3.0), rotation, Vec3::new(0.4, -0.2, -1.3));
    show_reticle(&mut scene, pose);
    let reqs = scene.on_select(0, &any_ray());
    scene.finish_load(&reqs[0], Ok(two_part_asset()));

    let model = scene.model().expect("model spawned");
    assert_eq!(scene.graph.parent(model), Some(scene.interactive_group()));
    let t = scene.graph.get(model).unwrap().transform;
    assert!(approx_vec(t.translation, Vec3::new(0.4, -0.2, -1.3)));
    assert!(approx_quat(t.rotation, rotation));
    assert_eq!(t.scale, Vec3::splat(MODEL_SCALE));
    assert_eq!(scene.spawner().load_state(AssetKind::Model), Some(LoadState::Loaded));
}

#[test]
fn anchored_transform_discards_anchor_scale() {
    let pose = Mat4::from_scale_rotation_translation(Vec3::new(2.0, 5.0, 0.5), Quat::IDENTITY, Vec3::X);
    let t = anchored_transform(pose, 0.1);
    assert_eq!(t.scale, Vec3::splat(0.1));
    assert!(approx_vec(t.translation, Vec3::X));
}

#[test]
fn failed_load_is_terminal_but_not_fatal() {
    let mut scene = inspect_scene();
    show_reticle(&mut scene, anchor_pose());
    let reqs = scene.on_select(0, &any_ray());
    scene.finish_load(
        &reqs[0],
        Err(ArError::Fetch {
            path: MODEL_ASSET_PATH.to_string(),
            reason: "404".to_string(),
        }),
    );
    assert!(scene.model().is_none());
    assert_eq!(scene.spawner().load_state(AssetKind::Model), Some(LoadState::Failed));
    // No retry on later selections, and the frame loop keeps running.
    assert!(scene.on_select(0, &any_ray()).is_empty());
    scene.tick(1.0);
    assert_eq!(scene.spawner().requests_issued(), 1);
}

#[test]
fn duplicate_completion_is_ignored() {
    let mut scene = inspect_scene();
    show_reticle(&mut scene, anchor_pose());
    let reqs = scene.on_select(0, &any_ray());
    scene.finish_load(&reqs[0], Ok(two_part_asset()));
    let nodes = scene.graph.len();
    scene.finish_load(&reqs[0], Ok(two_part_asset()));
    assert_eq!(scene.graph.len(), nodes);
}

#[test]
fn coins_scene_requests_each_asset_once_and_places_three_coins() {
    let mut scene = ArScene::new(SceneVariant::Coins, StdRng::seed_from_u64(99));
    show_reticle(&mut scene, anchor_pose());
    let reqs: Vec<LoadRequest> = (0..5).flat_map(|_| scene.on_select(0, &any_ray())).collect();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].asset, AssetKind::Model);
    assert_eq!(reqs[1].asset, AssetKind::Coin);

    for r in &reqs {
        let asset = match r.asset {
            AssetKind::Model => two_part_asset(),
            AssetKind::Coin => coin_asset(),
        };
        scene.finish_load(r, Ok(asset));
    }
    assert_eq!(scene.coins().len(), COIN_COUNT);
    for (i, coin) in scene.coins().iter().enumerate() {
        let node = scene.graph.get(*coin).unwrap();
        assert_eq!(node.name, format!("coin-{i}"));
        assert_eq!(scene.graph.parent(*coin), Some(scene.interactive_group()));
        let p = node.transform.translation;
        assert!((-COIN_SPREAD..=COIN_SPREAD).contains(&p.x));
        assert!((-COIN_SPREAD..=COIN_SPREAD).contains(&p.z));
        assert_eq!(p.y, COIN_HEIGHT);
    }
}

#[test]
fn coin_positions_stay_inside_square() {
    for seed in 0..200u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        for p in coin_positions(&mut rng, COIN_COUNT) {
            assert!(p.x >= -2.0 && p.x <= 2.0, "x = {}", p.x);
            assert!(p.z >= -2.0 && p.z <= 2.0, "z = {}", p.z);
            assert_eq!(p.y, 1.0);
        }
    }
}

#[test]
fn coin_positions_are_independent_draws() {
    let mut rng = StdRng::seed_from_u64(5);
    let ps = coin_positions(&mut rng, 64);
    assert_eq!(ps.len(), 64);
    assert!(ps.iter().any(|p| (p.x - p.z).abs() > 1e-3));
    assert!(ps.iter().any(|p| p.x < 0.0) && ps.iter().any(|p| p.x > 0.0));
}
