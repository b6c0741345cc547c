//! Per-scene context: everything the two demo scenes mutate lives here
//! instead of in module-level globals, and is dropped with the scene.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;

use crate::asset::ModelAsset;
use crate::constants::*;
use crate::error::ArResult;
use crate::hit_test::Reticle;
use crate::interaction::{
    ControllerId, Grabber, Highlighter, IdleSpin, PanelAnchor, SelectionChange,
};
use crate::ray::Ray;
use crate::scene::{Light, Node, NodeId, NodeKind, SceneGraph, Transform};
use crate::spawner::{anchored_transform, coin_positions, AssetKind, AssetSpawner, LoadRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneVariant {
    /// Tap to place one model; select parts to highlight them and show a panel.
    Inspect,
    /// Tap to place a model plus three coins; drag coins with the controller.
    Coins,
}

impl SceneVariant {
    pub fn name(self) -> &'static str {
        match self {
            SceneVariant::Inspect => "inspect",
            SceneVariant::Coins => "coins",
        }
    }

    pub fn assets(self) -> &'static [AssetKind] {
        match self {
            SceneVariant::Inspect => &[AssetKind::Model],
            SceneVariant::Coins => &[AssetKind::Model, AssetKind::Coin],
        }
    }
}

/// A panel to mirror into the page: label text and world position.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub node: NodeId,
    pub text: String,
    pub world: Vec3,
}

pub struct ArScene {
    pub graph: SceneGraph,
    variant: SceneVariant,
    interactive: NodeId,
    reticle: Reticle,
    spawner: AssetSpawner,
    highlighter: Highlighter,
    grabber: Grabber,
    spin: IdleSpin,
    model: Option<NodeId>,
    coins: Vec<NodeId>,
    controllers: Vec<NodeId>,
    rng: StdRng,
}

impl ArScene {
    pub fn new(variant: SceneVariant, rng: StdRng) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add(
            root,
            Node::new(
                "ambient",
                NodeKind::Light(Light::Ambient {
                    color: hex_to_rgb(AMBIENT_COLOR),
                    intensity: AMBIENT_INTENSITY,
                }),
            ),
        );
        graph.add(
            root,
            Node::new(
                "hemisphere",
                NodeKind::Light(Light::Hemisphere {
                    sky: hex_to_rgb(HEMISPHERE_SKY_COLOR),
                    ground: hex_to_rgb(HEMISPHERE_GROUND_COLOR),
                    intensity: HEMISPHERE_INTENSITY,
                }),
            ),
        );
        let interactive = graph.add(root, Node::new("interactive", NodeKind::Group));
        let reticle = Reticle::create(&mut graph, root);
        log::info!("[scene] initialised '{}' scene", variant.name());
        Self {
            graph,
            variant,
            interactive,
            reticle,
            spawner: AssetSpawner::new(variant.assets()),
            highlighter: Highlighter::default(),
            grabber: Grabber::new(),
            spin: IdleSpin::default(),
            model: None,
            coins: Vec::new(),
            controllers: Vec::new(),
            rng,
        }
    }

    pub fn variant(&self) -> SceneVariant {
        self.variant
    }

    pub fn reticle(&self) -> Reticle {
        self.reticle
    }

    pub fn interactive_group(&self) -> NodeId {
        self.interactive
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn coins(&self) -> &[NodeId] {
        &self.coins
    }

    pub fn spawner(&self) -> &AssetSpawner {
        &self.spawner
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn grabber(&self) -> &Grabber {
        &self.grabber
    }

    pub fn controllers(&self) -> &[NodeId] {
        &self.controllers
    }

    /// Node tracking controller `index`, created on first use.
    pub fn controller_node(&mut self, index: ControllerId) -> NodeId {
        while self.controllers.len() <= index {
            let i = self.controllers.len();
            let root = self.graph.root();
            let id = self
                .graph
                .add(root, Node::new(format!("controller-{i}"), NodeKind::Controller { index: i }));
            self.controllers.push(id);
        }
        self.controllers[index]
    }

    pub fn set_controller_pose(&mut self, index: ControllerId, pose: Mat4) {
        let id = self.controller_node(index);
        if let Some(n) = self.graph.get_mut(id) {
            n.transform = Transform::from_matrix(pose);
        }
    }

    /// `select`: spawn if nothing has been placed yet, otherwise (Inspect)
    /// run the highlight state machine on the ray's nearest hit.
    pub fn on_select(&mut self, controller: ControllerId, ray: &Ray) -> Vec<LoadRequest> {
        let requests = self.spawner.try_spawn(
            self.reticle.is_visible(&self.graph),
            self.reticle.pose(&self.graph),
        );
        if !requests.is_empty() {
            return requests;
        }
        if self.variant == SceneVariant::Inspect {
            self.highlight_along(controller, ray);
        }
        requests
    }

    fn highlight_along(&mut self, controller: ControllerId, ray: &Ray) -> SelectionChange {
        let Some(model) = self.model else {
            return SelectionChange::Unchanged;
        };
        let hit = self
            .graph
            .raycast(ray, &[model], RAY_MAX_DISTANCE)
            .first()
            .map(|h| h.node);
        log::debug!("[select] controller {} hit {:?}", controller, hit);
        let anchor = PanelAnchor {
            parent: self.interactive,
            origin: model,
        };
        self.highlighter.select(&mut self.graph, hit, Some(anchor))
    }

    /// `selectstart` (Coins): grab the nearest coin along the ray.
    pub fn on_select_start(&mut self, controller: ControllerId, ray: &Ray) {
        if self.variant != SceneVariant::Coins || self.grabber.held_by(controller).is_some() {
            return;
        }
        let candidates: Vec<NodeId> = self
            .coins
            .iter()
            .copied()
            .filter(|c| !self.grabber.is_held(*c))
            .collect();
        let hit = self
            .graph
            .raycast(ray, &candidates, RAY_MAX_DISTANCE)
            .first()
            .and_then(|h| self.owning_coin(h.node));
        let Some(coin) = hit else {
            return;
        };
        let controller_node = self.controller_node(controller);
        if let Err(e) = self
            .grabber
            .grab(&mut self.graph, controller, controller_node, coin)
        {
            log::warn!("[grab] {}", e);
        }
    }

    /// `selectend` (Coins): drop whatever the controller holds back into the group.
    pub fn on_select_end(&mut self, controller: ControllerId) {
        if let Err(e) = self
            .grabber
            .release(&mut self.graph, controller, self.interactive)
        {
            log::warn!("[grab] {}", e);
        }
    }

    /// A primary action finishing: `select` then `selectend`, in the order
    /// XR input sources report them.
    pub fn on_press_end(&mut self, controller: ControllerId, ray: &Ray) -> Vec<LoadRequest> {
        let requests = self.on_select(controller, ray);
        self.on_select_end(controller);
        requests
    }

    fn owning_coin(&self, node: NodeId) -> Option<NodeId> {
        self.coins
            .iter()
            .copied()
            .find(|c| *c == node || self.graph.is_ancestor(*c, node))
    }

    /// Completion continuation of a load issued by `on_select`.
    pub fn finish_load(&mut self, request: &LoadRequest, result: ArResult<ModelAsset>) {
        let asset = match result {
            Ok(a) => a,
            Err(e) => {
                log::error!("[spawn] {} failed: {}", request.path, e);
                self.spawner.complete(request.asset, false);
                return;
            }
        };
        if !self.spawner.complete(request.asset, true) {
            log::warn!("[spawn] unexpected completion for {}", request.path);
            return;
        }
        match request.asset {
            AssetKind::Model => {
                let transform = anchored_transform(request.anchor, MODEL_SCALE);
                let id = asset.instantiate(&mut self.graph, self.interactive, "model", transform);
                self.model.get_or_insert(id);
                log::info!("[spawn] model placed at {:?}", transform.translation);
            }
            AssetKind::Coin => {
                for (i, pos) in coin_positions(&mut self.rng, COIN_COUNT).into_iter().enumerate() {
                    let transform = Transform {
                        scale: Vec3::splat(COIN_SCALE),
                        ..Transform::from_translation(pos)
                    };
                    let id = asset.instantiate(
                        &mut self.graph,
                        self.interactive,
                        &format!("coin-{i}"),
                        transform,
                    );
                    self.coins.push(id);
                }
                log::info!("[spawn] {} coins placed", self.coins.len());
            }
        }
    }

    /// Per-frame update after hit testing and before rendering.
    pub fn tick(&mut self, elapsed_sec: f64) {
        if self.variant != SceneVariant::Inspect {
            return;
        }
        if let Some(model) = self.model {
            let paused = self.highlighter.is_active();
            self.spin
                .apply(&mut self.graph, model, elapsed_sec, paused, IDLE_SPIN_RAD_PER_SEC);
        }
    }

    /// Visible overlay panels, for the DOM bridge.
    pub fn visible_panels(&self) -> Vec<PanelView> {
        self.graph
            .descendants(self.interactive)
            .into_iter()
            .filter_map(|id| {
                let node = self.graph.get(id)?;
                let NodeKind::Panel { text } = &node.kind else {
                    return None;
                };
                if !self.graph.is_visible_in_tree(id) {
                    return None;
                }
                Some(PanelView {
                    node: id,
                    text: text.clone(),
                    world: self.graph.world_matrix(id).transform_point3(Vec3::ZERO),
                })
            })
            .collect()
    }
}
