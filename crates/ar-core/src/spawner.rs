//! Spawn gating for the scene's assets.
//!
//! The spawn phase flips to `Requested` before any load is handed to the
//! host, so repeated selections while loads are in flight never issue a
//! second request for the same asset.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::constants::{COIN_ASSET_PATH, COIN_HEIGHT, COIN_SPREAD, MODEL_ASSET_PATH};
use crate::scene::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    Coin,
}

impl AssetKind {
    pub fn path(self) -> &'static str {
        match self {
            AssetKind::Model => MODEL_ASSET_PATH,
            AssetKind::Coin => COIN_ASSET_PATH,
        }
    }
}

/// One asynchronous load to issue. `anchor` is the reticle pose at selection time.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub asset: AssetKind,
    pub path: &'static str,
    pub anchor: Mat4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    InFlight,
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPhase {
    Idle,
    Requested,
}

#[derive(Debug)]
pub struct AssetSpawner {
    phase: SpawnPhase,
    loads: Vec<(AssetKind, Option<LoadState>)>,
    requests_issued: usize,
}

impl AssetSpawner {
    pub fn new(assets: &[AssetKind]) -> Self {
        Self {
            phase: SpawnPhase::Idle,
            loads: assets.iter().map(|a| (*a, None)).collect(),
            requests_issued: 0,
        }
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    pub fn has_spawned(&self) -> bool {
        self.phase == SpawnPhase::Requested
    }

    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }

    pub fn load_state(&self, asset: AssetKind) -> Option<LoadState> {
        self.loads
            .iter()
            .find(|(a, _)| *a == asset)
            .and_then(|(_, s)| *s)
    }

    /// Selection handler. Returns the loads to issue, empty unless the reticle
    /// is visible and nothing has been requested yet.
    pub fn try_spawn(&mut self, reticle_visible: bool, reticle_pose: Mat4) -> Vec<LoadRequest> {
        if !reticle_visible || self.phase != SpawnPhase::Idle {
            return Vec::new();
        }
        self.phase = SpawnPhase::Requested;
        let mut out = Vec::with_capacity(self.loads.len());
        for (asset, state) in &mut self.loads {
            if state.is_some() {
                continue;
            }
            *state = Some(LoadState::InFlight);
            out.push(LoadRequest {
                asset: *asset,
                path: asset.path(),
                anchor: reticle_pose,
            });
        }
        self.requests_issued += out.len();
        log::info!("[spawn] issuing {} load request(s)", out.len());
        out
    }

    /// Record a completion. Returns false for assets that were not in flight.
    pub fn complete(&mut self, asset: AssetKind, ok: bool) -> bool {
        for (a, state) in &mut self.loads {
            if *a == asset && *state == Some(LoadState::InFlight) {
                *state = Some(if ok {
                    LoadState::Loaded
                } else {
                    LoadState::Failed
                });
                return true;
            }
        }
        false
    }
}

/// Place an instance at `anchor`: keep its position and rotation, hard-set the
/// scale (the anchor's own scale component is discarded).
pub fn anchored_transform(anchor: Mat4, scale: f32) -> Transform {
    let (_, rotation, translation) = anchor.to_scale_rotation_translation();
    Transform {
        translation,
        rotation,
        scale: Vec3::splat(scale),
    }
}

/// `count` positions with x and z drawn independently from the closed
/// `[-COIN_SPREAD, COIN_SPREAD]` range, at `COIN_HEIGHT`.
pub fn coin_positions<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-COIN_SPREAD..=COIN_SPREAD),
                COIN_HEIGHT,
                rng.gen_range(-COIN_SPREAD..=COIN_SPREAD),
            )
        })
        .collect()
}
