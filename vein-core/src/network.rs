use crate::assignment::Assignment;
use crate::attractor::Attractor;
use crate::error::{Result, SimulationError};
use crate::types::NodeId;
use glam::DVec2;

#[derive(Clone, Debug, PartialEq)]
pub struct VeinNode {
    pub pos: DVec2,
    /// Unit growth direction, or zero when nothing pulls on the node.
    pub direction: DVec2,
    pub parent: Option<NodeId>,
}

/// Grow-only list of vein nodes. Insertion order doubles as the tie-break
/// order for nearest-node queries.
#[derive(Clone, Debug)]
pub struct VeinNetwork {
    pub nodes: Vec<VeinNode>,
}

impl VeinNode {
    pub fn new_root(pos: DVec2) -> Self {
        Self {
            pos,
            direction: DVec2::ZERO,
            parent: None,
        }
    }

    pub fn new_child(pos: DVec2, parent: NodeId) -> Self {
        Self {
            pos,
            direction: DVec2::ZERO,
            parent: Some(parent),
        }
    }

    pub fn is_growing(&self) -> bool {
        self.direction != DVec2::ZERO
    }
}

impl VeinNetwork {
    pub fn new(origin: DVec2) -> Self {
        Self {
            nodes: vec![VeinNode::new_root(origin)],
        }
    }

    /// Seeds a network with one unconnected node per position, in order.
    pub fn from_positions(positions: impl IntoIterator<Item = DVec2>) -> Result<Self> {
        let nodes: Vec<VeinNode> = positions.into_iter().map(VeinNode::new_root).collect();
        if nodes.is_empty() {
            return Err(SimulationError::EmptyNetwork);
        }
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_child(&mut self, parent: NodeId, pos: DVec2) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(VeinNode::new_child(pos, parent));
        id
    }

    /// First node (in insertion order) at minimum distance from `pos`.
    pub fn find_nearest_node(&self, pos: DVec2) -> Option<(NodeId, f64)> {
        nearest(&self.nodes, pos)
    }

    /// Overwrites every node's direction with the normalized sum of the
    /// vectors towards its assigned attractors.
    ///
    /// Nodes without attractors, or whose pulls cancel out exactly, get the
    /// zero direction.
    pub fn compute_directions(&mut self, assignment: &Assignment, attractors: &[Attractor]) {
        debug_assert_eq!(assignment.node_count(), self.nodes.len());
        for (id, node) in self.nodes.iter_mut().enumerate() {
            let sum: DVec2 = assignment
                .attractors_of(id)
                .iter()
                .map(|&a| attractors[a].pos - node.pos)
                .sum();
            node.direction = sum.normalize_or_zero();
        }
    }

    /// Spawns one child per growing node at `pos + direction * step_radius * 2`.
    ///
    /// Children are computed from the nodes present before the call and
    /// appended afterwards, so new nodes never grow in the same pass.
    /// Returns the ids of the new nodes in the order they were added.
    pub fn grow(&mut self, step_radius: f64) -> Vec<NodeId> {
        let to_add: Vec<(NodeId, DVec2)> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_growing())
            .map(|(id, n)| (id, n.pos + n.direction * step_radius * 2.0))
            .collect();

        to_add
            .into_iter()
            .map(|(parent, pos)| self.add_child(parent, pos))
            .collect()
    }
}

fn nearest(nodes: &[VeinNode], pos: DVec2) -> Option<(NodeId, f64)> {
    let mut best = None;
    let mut best_d2 = f64::INFINITY;
    for (id, n) in nodes.iter().enumerate() {
        let d2 = n.pos.distance_squared(pos);
        // Strict comparison keeps the earliest node on ties.
        if d2 < best_d2 {
            best_d2 = d2;
            best = Some(id);
        }
    }
    best.map(|id| (id, best_d2))
}

/// Assigns every attractor to its nearest node.
///
/// Nodes are scanned in insertion order and the first node at minimum
/// distance wins. The result is built from scratch on every call. With no
/// nodes the call is a no-op: every attractor stays unowned.
pub fn assign_closest(nodes: &[VeinNode], attractors: &[Attractor]) -> Assignment {
    let mut assignment = Assignment::with_len(nodes.len(), attractors.len());
    for (aid, a) in attractors.iter().enumerate() {
        if let Some((nid, _)) = nearest(nodes, a.pos) {
            assignment.assign(nid, aid);
        }
    }
    assignment
}
