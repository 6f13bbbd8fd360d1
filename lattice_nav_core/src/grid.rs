// Lattice graph: the node arena plus its fixed topology.
//
// `LatticeGraph::build()` allocates `depth × width × height` nodes, places
// each at `origin + (w, h, d) * padding`, and wires six-direction adjacency.
// Nodes are stored in a `Vec<NodeState>` indexed by `NodeId`, in depth-major
// order:
//
//     index = (d * width + w) * height + h
//
// This is the iteration order of every linear scan in the crate (locator,
// linear frontier, tie-breaks), so it is part of the observable behavior.
//
// Neighbors are added in the fixed order -d, +d, -w, +w, -h, +h. Boundary
// nodes simply skip the out-of-range directions, so the relation is
// symmetric by construction and never contains diagonals or self-loops.
//
// When `GridConfig::terrain_bias` is set, each node also gets a static bias
// `(height - 1 - h) + |position - reference|`: nodes near the top of the
// workspace and near the reference point are cheaper. Whether the solver
// reads it is decided by `SolverConfig::bias_policy`.
//
// There is no incremental rebuild. A reload builds a fresh graph and drops
// the old one; `NodeId`s from the old graph must not be reused.
//
// See also: `node.rs` for `NodeState`, `navigator.rs` which owns the graph
// and handles reloads, `config.rs` for `GridConfig`.

use crate::config::GridConfig;
use crate::error::{NavError, NavResult};
use crate::node::NodeState;
use crate::types::{Aabb, LatticeCoord, NodeId, Vec3};

/// The lattice: node arena plus topology.
#[derive(Clone, Debug)]
pub struct LatticeGraph {
    nodes: Vec<NodeState>,
    depth: u32,
    width: u32,
    height: u32,
    padding: f32,
    /// World position of `[0, 0, 0]` (after optional centering).
    origin: Vec3,
}

impl LatticeGraph {
    /// Validate `config` and build a fresh lattice.
    pub fn build(config: &GridConfig) -> NavResult<Self> {
        config.validate()?;

        let mut graph = Self {
            nodes: Vec::with_capacity(config.node_count()),
            depth: config.depth,
            width: config.width,
            height: config.height,
            padding: config.padding,
            origin: config.effective_origin(),
        };

        // --- 1. Allocate nodes ---
        let default_walkable = !config.nodes_only_in_area;
        for d in 0..graph.depth {
            for w in 0..graph.width {
                for h in 0..graph.height {
                    let coord = LatticeCoord::new(d, w, h);
                    let id = NodeId(graph.nodes.len() as u32);
                    debug_assert_eq!(Some(id), graph.id_of(coord));
                    let mut node =
                        NodeState::new(id, coord, graph.world_position(coord), default_walkable);
                    node.set_scale(config.node_scale);
                    graph.nodes.push(node);
                }
            }
        }

        // --- 2. Wire orthogonal neighbors ---
        for i in 0..graph.nodes.len() {
            let coord = graph.nodes[i].coord();
            let neighbors = graph.orthogonal_neighbors(coord);
            for n in neighbors.into_iter().flatten() {
                graph.nodes[i].add_neighbor(n);
            }
        }

        // --- 3. Static terrain bias ---
        if let Some(bias) = &config.terrain_bias {
            let top = graph.height - 1;
            for node in &mut graph.nodes {
                let rank = (top - node.coord().h) as f32;
                let b = rank + node.position().distance(bias.reference);
                node.set_bias(b);
            }
        }

        log::debug!(
            "built {}x{}x{} lattice: {} nodes, padding {}, origin {}",
            graph.depth,
            graph.width,
            graph.height,
            graph.nodes.len(),
            graph.padding,
            graph.origin,
        );
        Ok(graph)
    }

    /// Candidate neighbors of `coord` in wiring order; `None` where the
    /// direction leaves the lattice.
    fn orthogonal_neighbors(&self, coord: LatticeCoord) -> [Option<NodeId>; 6] {
        let LatticeCoord { d, w, h } = coord;
        [
            d.checked_sub(1).and_then(|d| self.id_of(LatticeCoord::new(d, w, h))),
            self.id_of(LatticeCoord::new(d + 1, w, h)),
            w.checked_sub(1).and_then(|w| self.id_of(LatticeCoord::new(d, w, h))),
            self.id_of(LatticeCoord::new(d, w + 1, h)),
            h.checked_sub(1).and_then(|h| self.id_of(LatticeCoord::new(d, w, h))),
            self.id_of(LatticeCoord::new(d, w, h + 1)),
        ]
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    pub fn in_bounds(&self, coord: LatticeCoord) -> bool {
        coord.d < self.depth && coord.w < self.width && coord.h < self.height
    }

    /// Arena id of a lattice coordinate. `None` if out of bounds.
    pub fn id_of(&self, coord: LatticeCoord) -> Option<NodeId> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(NodeId((coord.d * self.width + coord.w) * self.height + coord.h))
    }

    /// Like `id_of`, but out-of-bounds coordinates are an error.
    pub fn require_id(&self, coord: LatticeCoord) -> NavResult<NodeId> {
        self.id_of(coord).ok_or(NavError::CoordOutOfBounds(coord))
    }

    /// World position a coordinate maps to. Width runs along X, height
    /// along Y, depth along Z.
    pub fn world_position(&self, coord: LatticeCoord) -> Vec3 {
        self.origin
            + Vec3::new(coord.w as f32, coord.h as f32, coord.d as f32) * self.padding
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    /// Get a node by id. Panics on an id from another lattice.
    pub fn node(&self, id: NodeId) -> &NodeState {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeState {
        &mut self.nodes[id.index()]
    }

    /// Get a node by id, or `None` if the id is out of range.
    pub fn get(&self, id: NodeId) -> Option<&NodeState> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
        self.nodes.get_mut(id.index())
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [NodeState] {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_walkable()).count()
    }

    /// Reset every node's search state to the sentinels.
    pub fn reset_search_state(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// World-space collider box of a node.
    pub fn node_aabb(&self, id: NodeId) -> Option<Aabb> {
        self.get(id)
            .map(|n| Aabb::from_center_size(n.position(), n.bounds()))
    }

    /// `(depth, width, height)`.
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.depth, self.width, self.height)
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// World position of coordinate `[0, 0, 0]`.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainBias;

    fn grid(depth: u32, width: u32, height: u32) -> LatticeGraph {
        LatticeGraph::build(&GridConfig::new(depth, width, height, 1.0, Vec3::ZERO)).unwrap()
    }

    #[test]
    fn build_allocates_one_node_per_coordinate() {
        let g = grid(3, 4, 5);
        assert_eq!(g.node_count(), 60);
        for (i, node) in g.nodes().iter().enumerate() {
            assert_eq!(node.id(), NodeId(i as u32));
            assert_eq!(g.id_of(node.coord()), Some(node.id()));
        }
    }

    #[test]
    fn arena_order_is_depth_major() {
        let g = grid(2, 2, 2);
        let coords: Vec<_> = g.nodes().iter().map(|n| n.coord()).collect();
        assert_eq!(coords[0], LatticeCoord::new(0, 0, 0));
        assert_eq!(coords[1], LatticeCoord::new(0, 0, 1));
        assert_eq!(coords[2], LatticeCoord::new(0, 1, 0));
        assert_eq!(coords[4], LatticeCoord::new(1, 0, 0));
    }

    #[test]
    fn positions_follow_width_height_depth_axes() {
        let config = GridConfig::new(3, 3, 3, 2.0, Vec3::new(1.0, 2.0, 3.0));
        let g = LatticeGraph::build(&config).unwrap();
        let id = g.id_of(LatticeCoord::new(1, 2, 0)).unwrap();
        // x = w * p, y = h * p, z = d * p.
        assert_eq!(g.node(id).position(), Vec3::new(5.0, 2.0, 5.0));
    }

    #[test]
    fn neighbor_counts_match_position() {
        let g = grid(3, 3, 3);
        let center = g.id_of(LatticeCoord::new(1, 1, 1)).unwrap();
        let corner = g.id_of(LatticeCoord::new(0, 0, 0)).unwrap();
        let edge = g.id_of(LatticeCoord::new(1, 0, 0)).unwrap();
        let face = g.id_of(LatticeCoord::new(1, 1, 0)).unwrap();
        assert_eq!(g.node(center).neighbors().len(), 6);
        assert_eq!(g.node(corner).neighbors().len(), 3);
        assert_eq!(g.node(edge).neighbors().len(), 4);
        assert_eq!(g.node(face).neighbors().len(), 5);
    }

    #[test]
    fn neighbors_are_symmetric_and_orthogonal() {
        let g = grid(3, 2, 4);
        for node in g.nodes() {
            for &n in node.neighbors() {
                assert_ne!(n, node.id(), "self-loop at {}", node.coord());
                let other = g.node(n);
                assert!(
                    other.neighbors().contains(&node.id()),
                    "{} -> {} is not symmetric",
                    node.coord(),
                    other.coord()
                );
                assert_eq!(node.coord().manhattan_distance(other.coord()), 1);
            }
        }
    }

    #[test]
    fn neighbor_wiring_order() {
        let g = grid(3, 3, 3);
        let center = g.id_of(LatticeCoord::new(1, 1, 1)).unwrap();
        let coords: Vec<_> = g
            .node(center)
            .neighbors()
            .iter()
            .map(|&n| g.node(n).coord())
            .collect();
        assert_eq!(
            coords,
            vec![
                LatticeCoord::new(0, 1, 1),
                LatticeCoord::new(2, 1, 1),
                LatticeCoord::new(1, 0, 1),
                LatticeCoord::new(1, 2, 1),
                LatticeCoord::new(1, 1, 0),
                LatticeCoord::new(1, 1, 2),
            ]
        );
    }

    #[test]
    fn single_node_lattice_has_no_neighbors() {
        let g = grid(1, 1, 1);
        assert_eq!(g.node_count(), 1);
        assert!(g.node(NodeId(0)).neighbors().is_empty());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = GridConfig::new(0, 1, 1, 1.0, Vec3::ZERO);
        assert!(matches!(
            LatticeGraph::build(&config),
            Err(NavError::InvalidConfig(_))
        ));
    }

    #[test]
    fn nodes_only_in_area_start_unwalkable() {
        let config = GridConfig {
            nodes_only_in_area: true,
            ..GridConfig::new(2, 2, 2, 1.0, Vec3::ZERO)
        };
        let g = LatticeGraph::build(&config).unwrap();
        assert_eq!(g.walkable_count(), 0);
    }

    #[test]
    fn centered_lattice_surrounds_origin() {
        let config = GridConfig {
            center_on_origin: true,
            ..GridConfig::new(3, 3, 3, 2.0, Vec3::new(10.0, 0.0, -4.0))
        };
        let g = LatticeGraph::build(&config).unwrap();
        let center = g.id_of(LatticeCoord::new(1, 1, 1)).unwrap();
        assert_eq!(g.node(center).position(), Vec3::new(10.0, 0.0, -4.0));
    }

    #[test]
    fn terrain_bias_prefers_top_and_reference() {
        let config = GridConfig {
            terrain_bias: Some(TerrainBias {
                reference: Vec3::ZERO,
            }),
            ..GridConfig::new(1, 1, 3, 1.0, Vec3::ZERO)
        };
        let g = LatticeGraph::build(&config).unwrap();
        // Bottom node sits on the reference: rank 2, distance 0.
        assert_eq!(g.node(NodeId(0)).bias(), Some(2.0));
        // Middle: rank 1, distance 1.
        assert_eq!(g.node(NodeId(1)).bias(), Some(2.0));
        // Top: rank 0, distance 2.
        assert_eq!(g.node(NodeId(2)).bias(), Some(2.0));

        let plain = grid(1, 1, 3);
        assert!(plain.nodes().iter().all(|n| n.bias().is_none()));
    }

    #[test]
    fn require_id_rejects_out_of_bounds() {
        let g = grid(2, 2, 2);
        assert!(g.require_id(LatticeCoord::new(1, 1, 1)).is_ok());
        assert!(matches!(
            g.require_id(LatticeCoord::new(2, 0, 0)),
            Err(NavError::CoordOutOfBounds(_))
        ));
    }

    #[test]
    fn node_aabb_uses_node_bounds() {
        let mut g = grid(1, 1, 1);
        g.node_mut(NodeId(0)).set_collider_dimension(Vec3::new(2.0, 2.0, 2.0));
        let aabb = g.node_aabb(NodeId(0)).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 1.0));
        assert!(g.node_aabb(NodeId(5)).is_none());
    }
}
