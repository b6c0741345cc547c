//! Decoded model assets.
//!
//! glTF parsing is left to the `gltf` crate; this module only keeps what the
//! scenes need: the node hierarchy, names, local transforms and one proxy box
//! per mesh (POSITION accessor bounds plus the material base colour).

use glam::{Quat, Vec3};

use crate::error::{ArError, ArResult};
use crate::scene::{Aabb, MeshProxy, Node, NodeId, NodeKind, SceneGraph, Transform};

const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

#[derive(Clone, Debug, PartialEq)]
pub struct AssetNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshProxy>,
    pub children: Vec<AssetNode>,
}

impl AssetNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, proxy: MeshProxy) -> Self {
        Self {
            mesh: Some(proxy),
            ..Self::group(name)
        }
    }
}

/// A decoded asset, ready to be instantiated any number of times.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelAsset {
    pub path: String,
    pub roots: Vec<AssetNode>,
}

impl ModelAsset {
    /// Instantiate under `parent` as a group named `name` with `transform`.
    pub fn instantiate(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        name: &str,
        transform: Transform,
    ) -> NodeId {
        let root = graph.add(
            parent,
            Node::new(name, NodeKind::Group).with_transform(transform),
        );
        for n in &self.roots {
            add_asset_node(graph, root, n);
        }
        root
    }

    pub fn mesh_count(&self) -> usize {
        fn count(n: &AssetNode) -> usize {
            n.mesh.is_some() as usize + n.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }
}

fn add_asset_node(graph: &mut SceneGraph, parent: NodeId, n: &AssetNode) {
    let kind = match n.mesh {
        Some(proxy) => NodeKind::Mesh(proxy),
        None => NodeKind::Group,
    };
    let id = graph.add(parent, Node::new(n.name.clone(), kind).with_transform(n.transform));
    for c in &n.children {
        add_asset_node(graph, id, c);
    }
}

/// Decode a `.glb` or `.gltf` (JSON with embedded or no buffers) byte slice.
pub fn decode_gltf(path: &str, bytes: &[u8]) -> ArResult<ModelAsset> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| ArError::AssetDecode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| ArError::AssetDecode {
            path: path.to_string(),
            reason: "no scenes".to_string(),
        })?;
    let roots = scene.nodes().map(|n| convert_node(&n)).collect::<Vec<_>>();
    let asset = ModelAsset {
        path: path.to_string(),
        roots,
    };
    log::info!(
        "[asset] decoded {} ({} root nodes, {} meshes)",
        path,
        asset.roots.len(),
        asset.mesh_count()
    );
    Ok(asset)
}

fn convert_node(node: &gltf::Node) -> AssetNode {
    let (t, r, s) = node.transform().decomposed();
    let name = node
        .name()
        .map(str::to_string)
        .or_else(|| node.mesh().and_then(|m| m.name().map(str::to_string)))
        .unwrap_or_else(|| format!("node-{}", node.index()));
    AssetNode {
        name,
        transform: Transform {
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from_array(s),
        },
        mesh: node.mesh().and_then(|m| mesh_proxy(&m)),
        children: node.children().map(|c| convert_node(&c)).collect(),
    }
}

fn mesh_proxy(mesh: &gltf::Mesh) -> Option<MeshProxy> {
    let mut bounds: Option<Aabb> = None;
    let mut color = None;
    for prim in mesh.primitives() {
        if color.is_none() {
            color = Some(prim.material().pbr_metallic_roughness().base_color_factor());
        }
        let Some(acc) = prim.get(&gltf::Semantic::Positions) else {
            continue;
        };
        let (Some(min), Some(max)) = (
            acc.min().as_ref().and_then(vec3_from_json),
            acc.max().as_ref().and_then(vec3_from_json),
        ) else {
            continue;
        };
        let b = Aabb::new(min, max);
        bounds = Some(match bounds {
            Some(prev) => prev.union(&b),
            None => b,
        });
    }
    bounds.map(|bounds| MeshProxy {
        bounds,
        color: color.unwrap_or(DEFAULT_COLOR),
    })
}

fn vec3_from_json(v: &gltf::json::Value) -> Option<Vec3> {
    let arr = v.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    let f = |i: usize| arr[i].as_f64().map(|x| x as f32);
    Some(Vec3::new(f(0)?, f(1)?, f(2)?))
}
