// Per-node record for the lattice arena.
//
// A `NodeState` holds three kinds of data with different lifetimes:
// - Topology (`coord`, `position`, `neighbors`): fixed at build time.
// - Build-time attributes (`bias`, default `walkable`): set by the builder;
//   bias never changes afterwards, walkability is then driven externally.
// - Search state (`distance`, `predecessor`): transient, owned by the solver
//   and reset before every run. Not meaningful outside a run.
//
// Neighbors and predecessors are `NodeId`s into the owning `LatticeGraph`,
// never references, so the arena has no ownership cycles and a reload is a
// plain rebuild.
//
// See also: `grid.rs` which builds and owns these, `dijkstra.rs` which
// drives the search state.

use crate::types::{LatticeCoord, NodeId, Vec3};
use smallvec::SmallVec;

/// Neighbor list: at most six orthogonal neighbors, stored inline.
pub type Neighbors = SmallVec<[NodeId; 6]>;

/// A lattice node.
#[derive(Clone, Debug)]
pub struct NodeState {
    id: NodeId,
    coord: LatticeCoord,
    position: Vec3,
    neighbors: Neighbors,
    walkable: bool,
    distance: f32,
    predecessor: Option<NodeId>,
    bias: Option<f32>,
    /// Node scale relative to its collider, used to convert world bounds.
    scale: Vec3,
    /// Collider size in node-local units.
    collider_size: Vec3,
}

impl NodeState {
    /// Create a node with no neighbors and freshly reset search state.
    pub fn new(id: NodeId, coord: LatticeCoord, position: Vec3, walkable: bool) -> Self {
        Self {
            id,
            coord,
            position,
            neighbors: Neighbors::new(),
            walkable,
            distance: f32::INFINITY,
            predecessor: None,
            bias: None,
            scale: Vec3::ONE,
            collider_size: Vec3::ONE,
        }
    }

    // -- search state -------------------------------------------------------

    /// Reset search state to the sentinels. Bias and walkability are kept.
    pub fn reset(&mut self) {
        self.distance = f32::INFINITY;
        self.predecessor = None;
    }

    pub fn set_distance(&mut self, value: f32) {
        self.distance = value;
    }

    pub fn set_predecessor(&mut self, node: Option<NodeId>) {
        self.predecessor = node;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn predecessor(&self) -> Option<NodeId> {
        self.predecessor
    }

    /// True once the solver has assigned a finite label.
    pub fn is_reached(&self) -> bool {
        self.distance.is_finite()
    }

    // -- walkability --------------------------------------------------------

    /// Set walkability. Returns `true` if the value changed, so the caller
    /// can emit a change notification.
    pub fn set_walkable(&mut self, walkable: bool) -> bool {
        let changed = self.walkable != walkable;
        self.walkable = walkable;
        changed
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    // -- topology -----------------------------------------------------------

    pub(crate) fn add_neighbor(&mut self, node: NodeId) {
        debug_assert!(node != self.id, "self-loop on {}", self.id);
        debug_assert!(!self.neighbors.contains(&node));
        self.neighbors.push(node);
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn coord(&self) -> LatticeCoord {
        self.coord
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    // -- build-time attributes ----------------------------------------------

    pub(crate) fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Node scale relative to its collider.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub(crate) fn set_bias(&mut self, bias: f32) {
        self.bias = Some(bias);
    }

    /// Static terrain bias, if the lattice was built with one.
    pub fn bias(&self) -> Option<f32> {
        self.bias
    }

    /// Set the collider so that its world-space size equals `world_size`.
    /// The stored size is divided by the node scale, as colliders are
    /// expressed in node-local units.
    pub fn set_collider_dimension(&mut self, world_size: Vec3) {
        self.collider_size = world_size.div_components(self.scale);
    }

    /// Collider size in node-local units.
    pub fn collider_size(&self) -> Vec3 {
        self.collider_size
    }

    /// Collider size in world units.
    pub fn bounds(&self) -> Vec3 {
        self.collider_size.scale(self.scale)
    }
}
