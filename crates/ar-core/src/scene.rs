//! Arena scene graph.
//!
//! Nodes live in a `SlotMap` and refer to each other by `NodeId`, so removing
//! a subtree invalidates stale ids instead of leaving dangling references.
//! Every node carries a local TRS transform; world matrices are composed on
//! demand by walking the parent chain.

use glam::{Mat4, Quat, Vec3};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{ArError, ArResult};
use crate::ray::{ray_aabb, Ray};

new_key_type! {
    pub struct NodeId;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned box in a node's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshProxy {
    pub bounds: Aabb,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Hemisphere {
        sky: [f32; 3],
        ground: [f32; 3],
        intensity: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(MeshProxy),
    Reticle,
    Panel { text: String },
    Controller { index: usize },
    Light(Light),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Result of a ray cast against mesh proxies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

pub type RayHits = SmallVec<[RayHit; 4]>;

pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("scene", NodeKind::Group));
        Self { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Insert `node` under `parent`. A stale parent id falls back to the root.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            log::warn!("[scene] parent of '{}' is gone; adding to root", node.name);
            self.root
        };
        node.parent = Some(parent);
        node.children.clear();
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find_map(|(id, n)| (n.name == name).then_some(id))
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.visible = visible;
        }
    }

    /// True when the node and all of its ancestors are visible.
    pub fn is_visible_in_tree(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.nodes.get(c) {
                Some(n) if n.visible => cur = n.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.nodes.get(c) else {
                break;
            };
            m = n.transform.matrix() * m;
            cur = n.parent;
        }
        m
    }

    pub fn world_transform(&self, id: NodeId) -> Transform {
        Transform::from_matrix(self.world_matrix(id))
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Reparent `child` under `new_parent`, keeping its world transform.
    pub fn attach(&mut self, child: NodeId, new_parent: NodeId) -> ArResult<()> {
        if !self.contains(child) || !self.contains(new_parent) {
            return Err(ArError::UnknownNode);
        }
        if child == self.root || child == new_parent || self.is_ancestor(child, new_parent) {
            return Err(ArError::InvalidParent);
        }
        let world = self.world_matrix(child);
        let parent_world = self.world_matrix(new_parent);
        let local = parent_world.inverse() * world;

        if let Some(old) = self.nodes[child].parent {
            self.nodes[old].children.retain(|c| *c != child);
        }
        self.nodes[new_parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(new_parent);
        node.transform = Transform::from_matrix(local);
        Ok(())
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        if let Some(p) = self.nodes[id].parent {
            if let Some(parent) = self.nodes.get_mut(p) {
                parent.children.retain(|c| *c != id);
            }
        }
        for d in self.descendants(id) {
            self.nodes.remove(d);
        }
        self.nodes.remove(id);
    }

    /// Depth-first descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Meshes that would be drawn this frame, with their world matrices.
    pub fn visible_meshes(&self) -> Vec<(NodeId, Mat4, MeshProxy)> {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|id| match &self.nodes[id].kind {
                NodeKind::Mesh(proxy) if self.is_visible_in_tree(id) => {
                    Some((id, self.world_matrix(id), *proxy))
                }
                _ => None,
            })
            .collect()
    }

    pub fn lights(&self) -> Vec<Light> {
        self.nodes
            .values()
            .filter_map(|n| match n.kind {
                NodeKind::Light(l) if n.visible => Some(l),
                _ => None,
            })
            .collect()
    }

    /// Cast `ray` against visible mesh proxies in the subtrees of `roots`
    /// (roots included). Hits are sorted nearest first.
    pub fn raycast(&self, ray: &Ray, roots: &[NodeId], max_distance: f32) -> RayHits {
        let mut hits = RayHits::new();
        for &root in roots {
            if !self.contains(root) {
                continue;
            }
            let mut candidates = vec![root];
            candidates.extend(self.descendants(root));
            for id in candidates {
                let NodeKind::Mesh(proxy) = &self.nodes[id].kind else {
                    continue;
                };
                if !self.is_visible_in_tree(id) {
                    continue;
                }
                let inv = self.world_matrix(id).inverse();
                let local_origin = inv.transform_point3(ray.origin);
                let local_dir = inv.transform_vector3(ray.direction);
                if let Some(t) = ray_aabb(local_origin, local_dir, &proxy.bounds) {
                    if t <= max_distance && !hits.iter().any(|h: &RayHit| h.node == id) {
                        hits.push(RayHit {
                            node: id,
                            distance: t,
                            point: ray.at(t),
                        });
                    }
                }
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
