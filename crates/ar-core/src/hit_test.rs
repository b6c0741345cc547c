//! Viewer-space hit-test source lifecycle and reticle placement.
//!
//! The tracker is generic over the source handle so the same state machine
//! drives both the native `XRHitTestSource` and the emulated floor caster.

use glam::Mat4;

use crate::scene::{Node, NodeId, NodeKind, SceneGraph, Transform};

/// Surface marker. Its node is owned by the scene graph; only the tracker moves it.
#[derive(Clone, Copy, Debug)]
pub struct Reticle {
    node: NodeId,
}

impl Reticle {
    pub fn create(graph: &mut SceneGraph, parent: NodeId) -> Self {
        let node = graph.add(parent, Node::new("reticle", NodeKind::Reticle).hidden());
        Self { node }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_visible(&self, graph: &SceneGraph) -> bool {
        graph.get(self.node).map(|n| n.visible).unwrap_or(false)
    }

    pub fn pose(&self, graph: &SceneGraph) -> Mat4 {
        graph.world_matrix(self.node)
    }

    /// First result wins; no results hides the marker.
    pub fn apply_hits(&self, graph: &mut SceneGraph, hits: &[Mat4]) {
        let Some(node) = graph.get_mut(self.node) else {
            return;
        };
        match hits.first() {
            Some(pose) => {
                node.visible = true;
                node.transform = Transform::from_matrix(*pose);
            }
            None => node.visible = false,
        }
    }
}

/// Identifies one source request; stale tickets from an ended session are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceTicket {
    generation: u32,
}

#[derive(Debug)]
pub enum SourceState<S> {
    Unrequested,
    Pending(SourceTicket),
    Ready(S),
    /// The host refused the request; stays this way until the session ends.
    Unavailable,
}

#[derive(Debug)]
pub struct HitTestTracker<S> {
    state: SourceState<S>,
    generation: u32,
    requests_issued: u32,
}

impl<S> Default for HitTestTracker<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HitTestTracker<S> {
    pub fn new() -> Self {
        Self {
            state: SourceState::Unrequested,
            generation: 0,
            requests_issued: 0,
        }
    }

    pub fn state(&self) -> &SourceState<S> {
        &self.state
    }

    pub fn requests_issued(&self) -> u32 {
        self.requests_issued
    }

    pub fn source(&self) -> Option<&S> {
        match &self.state {
            SourceState::Ready(s) => Some(s),
            _ => None,
        }
    }

    /// Arm a request if none has been made this session. The caller issues the
    /// host request and reports back with `resolve` or `reject`.
    pub fn poll_request(&mut self) -> Option<SourceTicket> {
        match self.state {
            SourceState::Unrequested => {
                let ticket = SourceTicket {
                    generation: self.generation,
                };
                self.state = SourceState::Pending(ticket);
                self.requests_issued += 1;
                Some(ticket)
            }
            _ => None,
        }
    }

    /// Store a resolved source. Returns the source back when the ticket is stale.
    pub fn resolve(&mut self, ticket: SourceTicket, source: S) -> Result<(), S> {
        match self.state {
            SourceState::Pending(pending) if pending == ticket => {
                self.state = SourceState::Ready(source);
                Ok(())
            }
            _ => Err(source),
        }
    }

    pub fn reject(&mut self, ticket: SourceTicket) {
        if matches!(self.state, SourceState::Pending(p) if p == ticket) {
            log::warn!("[hit-test] source request rejected; reticle stays hidden");
            self.state = SourceState::Unavailable;
        }
    }

    /// Clear the cached source and re-arm for the next session. Returns the
    /// dropped source so the caller can cancel it on the host.
    pub fn session_ended(&mut self) -> Option<S> {
        self.generation = self.generation.wrapping_add(1);
        match std::mem::replace(&mut self.state, SourceState::Unrequested) {
            SourceState::Ready(s) => Some(s),
            _ => None,
        }
    }

    /// Query the current source, if any, and move the reticle. Returns whether
    /// a query ran this frame.
    pub fn update_reticle<F>(&self, graph: &mut SceneGraph, reticle: &Reticle, query: F) -> bool
    where
        F: FnOnce(&S) -> Vec<Mat4>,
    {
        let Some(source) = self.source() else {
            return false;
        };
        let hits = query(source);
        reticle.apply_hits(graph, &hits);
        true
    }
}
