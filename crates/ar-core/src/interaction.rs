//! Selection state machines.
//!
//! `Highlighter` keeps a single shared Active slot: entering Active adds a
//! fixed per-axis scale delta and shows the node's panel, leaving it
//! subtracts the same delta and hides the panel. `Grabber` moves nodes onto
//! a controller node for the duration of a gesture. `IdleSpin` freezes its
//! time sample while anything is Active.

use fnv::FnvHashMap;
use glam::{Quat, Vec3};
use slotmap::SecondaryMap;

use crate::constants::{HIGHLIGHT_SCALE_DELTA, PANEL_OFFSET};
use crate::error::ArResult;
use crate::scene::{Node, NodeId, NodeKind, SceneGraph, Transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Inactive,
    Active { node: NodeId, panel: Option<NodeId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Activated { node: NodeId, previous: Option<NodeId> },
    Deactivated { node: NodeId },
}

/// Where activation panels go and what they are anchored to.
#[derive(Clone, Copy, Debug)]
pub struct PanelAnchor {
    pub parent: NodeId,
    /// Panels sit at `PANEL_OFFSET` from this node's world origin.
    pub origin: NodeId,
}

#[derive(Debug)]
pub struct Highlighter {
    state: Selection,
    delta: f32,
    panels: SecondaryMap<NodeId, NodeId>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HIGHLIGHT_SCALE_DELTA)
    }
}

impl Highlighter {
    pub fn new(delta: f32) -> Self {
        Self {
            state: Selection::Inactive,
            delta,
            panels: SecondaryMap::new(),
        }
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn active(&self) -> Option<NodeId> {
        match self.state {
            Selection::Active { node, .. } => Some(node),
            Selection::Inactive => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Feed the nearest hit of a selection ray (or `None` for a miss).
    pub fn select(
        &mut self,
        graph: &mut SceneGraph,
        hit: Option<NodeId>,
        anchor: Option<PanelAnchor>,
    ) -> SelectionChange {
        let current = self.active();
        if hit.is_some() && hit == current {
            return SelectionChange::Unchanged;
        }
        if current.is_some() {
            self.deactivate(graph);
        }
        let Some(node) = hit.filter(|n| graph.contains(*n)) else {
            return match current {
                Some(prev) => SelectionChange::Deactivated { node: prev },
                None => SelectionChange::Unchanged,
            };
        };
        adjust_scale(graph, node, self.delta);
        let panel = anchor.map(|a| self.show_panel(graph, node, a));
        self.state = Selection::Active { node, panel };
        log::info!(
            "[select] active: {}",
            graph.get(node).map(|n| n.name.as_str()).unwrap_or("?")
        );
        SelectionChange::Activated {
            node,
            previous: current,
        }
    }

    /// Revert the Active node, if any.
    pub fn deactivate(&mut self, graph: &mut SceneGraph) {
        if let Selection::Active { node, panel } = self.state {
            adjust_scale(graph, node, -self.delta);
            if let Some(p) = panel {
                graph.set_visible(p, false);
            }
            self.state = Selection::Inactive;
        }
    }

    pub fn panel_for(&self, node: NodeId) -> Option<NodeId> {
        self.panels.get(node).copied()
    }

    fn show_panel(&mut self, graph: &mut SceneGraph, node: NodeId, anchor: PanelAnchor) -> NodeId {
        let text = graph
            .get(node)
            .map(|n| n.name.clone())
            .unwrap_or_default();
        let origin = graph.world_matrix(anchor.origin).transform_point3(Vec3::ZERO);
        let local = graph
            .world_matrix(anchor.parent)
            .inverse()
            .transform_point3(origin + PANEL_OFFSET);

        let panel = match self.panels.get(node) {
            Some(p) if graph.contains(*p) => *p,
            _ => {
                let p = graph.add(
                    anchor.parent,
                    Node::new(format!("panel:{text}"), NodeKind::Panel { text: text.clone() }),
                );
                self.panels.insert(node, p);
                p
            }
        };
        if let Some(n) = graph.get_mut(panel) {
            n.transform = Transform::from_translation(local);
            n.kind = NodeKind::Panel { text };
            n.visible = true;
        }
        panel
    }
}

fn adjust_scale(graph: &mut SceneGraph, node: NodeId, delta: f32) {
    if let Some(n) = graph.get_mut(node) {
        n.transform.scale += Vec3::splat(delta);
    }
}

pub type ControllerId = usize;

/// Stable controller ids for host input handles.
///
/// A handle keeps its id while it stays connected, so other handles
/// disconnecting never renumbers it. Freed ids are reused.
#[derive(Debug)]
pub struct ControllerSlots<H> {
    slots: Vec<Option<H>>,
}

impl<H: PartialEq> Default for ControllerSlots<H> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<H: PartialEq> ControllerSlots<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of(&self, handle: &H) -> Option<ControllerId> {
        self.slots.iter().position(|s| s.as_ref() == Some(handle))
    }

    /// Id of `handle`, assigning the lowest free one on first sight.
    pub fn id_for(&mut self, handle: H) -> ControllerId {
        if let Some(id) = self.id_of(&handle) {
            return id;
        }
        match self.slots.iter().position(Option::is_none) {
            Some(id) => {
                self.slots[id] = Some(handle);
                id
            }
            None => {
                self.slots.push(Some(handle));
                self.slots.len() - 1
            }
        }
    }

    /// Drop handles for which `live` is false and return their ids.
    pub fn retain(&mut self, mut live: impl FnMut(&H) -> bool) -> Vec<ControllerId> {
        let mut freed = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|h| !live(h)) {
                *slot = None;
                freed.push(id);
            }
        }
        freed
    }

    /// Forget every handle, returning the ids that were in use.
    pub fn clear(&mut self) -> Vec<ControllerId> {
        self.retain(|_| false)
    }
}

/// Gesture-scoped ownership transfer of nodes onto controller nodes.
#[derive(Debug, Default)]
pub struct Grabber {
    held: FnvHashMap<ControllerId, NodeId>,
}

impl Grabber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held_by(&self, controller: ControllerId) -> Option<NodeId> {
        self.held.get(&controller).copied()
    }

    pub fn is_held(&self, node: NodeId) -> bool {
        self.held.values().any(|n| *n == node)
    }

    /// Gesture start: parent `node` to the controller, keeping its world pose.
    pub fn grab(
        &mut self,
        graph: &mut SceneGraph,
        controller: ControllerId,
        controller_node: NodeId,
        node: NodeId,
    ) -> ArResult<()> {
        if self.held.contains_key(&controller) || self.is_held(node) {
            return Ok(());
        }
        graph.attach(node, controller_node)?;
        self.held.insert(controller, node);
        log::info!("[grab] controller {} took {:?}", controller, node);
        Ok(())
    }

    /// Gesture end: hand the held node back to `group`.
    pub fn release(
        &mut self,
        graph: &mut SceneGraph,
        controller: ControllerId,
        group: NodeId,
    ) -> ArResult<Option<NodeId>> {
        let Some(node) = self.held.remove(&controller) else {
            return Ok(None);
        };
        if !graph.contains(node) {
            return Ok(None);
        }
        graph.attach(node, group)?;
        log::info!("[grab] controller {} released {:?}", controller, node);
        Ok(Some(node))
    }
}

/// Continuous Y rotation of a node, angle proportional to elapsed time.
///
/// The node's rotation on the first `apply` is kept as the base; every frame
/// writes `base * Ry(t * rate)`, so equal samples give equal rotations.
#[derive(Debug, Default)]
pub struct IdleSpin {
    frozen_at: Option<f64>,
    base: Option<(NodeId, Quat)>,
}

impl IdleSpin {
    /// Elapsed-time sample to use this frame: frozen while `paused`, live otherwise.
    pub fn sample(&mut self, elapsed_sec: f64, paused: bool) -> f64 {
        if paused {
            *self.frozen_at.get_or_insert(elapsed_sec)
        } else {
            self.frozen_at = None;
            elapsed_sec
        }
    }

    pub fn apply(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        elapsed_sec: f64,
        paused: bool,
        rad_per_sec: f32,
    ) {
        let t = self.sample(elapsed_sec, paused);
        let Some(n) = graph.get_mut(node) else {
            return;
        };
        let base = match self.base {
            Some((id, base)) if id == node => base,
            _ => {
                let base = n.transform.rotation;
                self.base = Some((node, base));
                base
            }
        };
        n.transform.rotation = base * Quat::from_rotation_y(t as f32 * rad_per_sec);
    }
}
