// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use ar_core::SceneVariant;
use input::parse_scene_variant;

#[test]
fn scene_query_selects_variant() {
    assert_eq!(parse_scene_variant("?scene=coins"), SceneVariant::Coins);
    assert_eq!(parse_scene_variant("?scene=inspect"), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?scene=2"), SceneVariant::Coins);
    assert_eq!(parse_scene_variant("?scene=COINS"), SceneVariant::Coins);
}

#[test]
fn scene_query_found_among_other_params() {
    assert_eq!(
        parse_scene_variant("?debug=1&scene=coins&x=y"),
        SceneVariant::Coins
    );
    assert_eq!(parse_scene_variant("scene=coins"), SceneVariant::Coins);
}

#[test]
fn missing_or_unknown_scene_defaults_to_inspect() {
    assert_eq!(parse_scene_variant(""), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?"), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?scene="), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?scene"), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?scene=castle"), SceneVariant::Inspect);
    assert_eq!(parse_scene_variant("?scenery=coins"), SceneVariant::Inspect);
}
