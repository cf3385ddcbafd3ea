use crate::types::{AttractorId, NodeId};

/// Which attractors pull on which vein node.
///
/// For each `NodeId`, this mapping stores the attractors for which that
/// node is the nearest one. It also stores the reverse lookup: the owning
/// node of each attractor.
///
/// An assignment is a snapshot. It is rebuilt from scratch every pass by
/// [`crate::network::assign_closest`] and never patched incrementally, so
/// it cannot go stale between passes. Attractor ids are only valid for the
/// attractor field it was computed from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Attractors assigned to each node.
    members: Vec<Vec<AttractorId>>,
    /// Owning node of each attractor.
    owners: Vec<Option<NodeId>>,
}

impl Assignment {
    /// Creates an empty [`Assignment`] for the given number of nodes and
    /// attractors.
    ///
    /// Every node starts with no attractors and every attractor starts
    /// unowned.
    ///
    /// ### Parameters
    /// - `nodes` - Number of vein nodes.
    /// - `attractors` - Number of attractors.
    pub fn with_len(nodes: usize, attractors: usize) -> Self {
        Self {
            members: vec![Vec::new(); nodes],
            owners: vec![None; attractors],
        }
    }

    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    /// Assigns an attractor to a node.
    ///
    /// ### Panics
    /// Panics if either id is out of bounds, or if the attractor already
    /// has an owner.
    pub fn assign(&mut self, node: NodeId, attractor: AttractorId) {
        assert!(
            self.owners[attractor].is_none(),
            "attractor {attractor} assigned twice"
        );
        self.members[node].push(attractor);
        self.owners[attractor] = Some(node);
    }

    /// Attractors assigned to `node`, in attractor order. Empty for ids
    /// past the end.
    pub fn attractors_of(&self, node: NodeId) -> &[AttractorId] {
        self.members.get(node).map_or(&[], Vec::as_slice)
    }

    /// Node that owns `attractor`, if any.
    pub fn owner_of(&self, attractor: AttractorId) -> Option<NodeId> {
        self.owners.get(attractor).copied().flatten()
    }

    /// Number of attractors without an owner.
    pub fn unassigned_count(&self) -> usize {
        self.owners.iter().filter(|o| o.is_none()).count()
    }
}
