// Closest-node lookup: snap a world point onto the lattice.
//
// A linear scan over the arena in index order, keeping the first node with
// a strictly smaller Euclidean distance. Ties therefore resolve to the
// lowest `NodeId`, which tests rely on.
//
// The candidate set depends on `LocatorPolicy`:
// - `AllNodes`: any node, even one currently blocked. The caller must then
//   handle an unwalkable endpoint.
// - `WalkableOnly`: only nodes walkable at call time.
//
// A non-finite query point has no meaningful nearest node and yields `None`.
//
// See also: `navigator.rs` which resolves both query endpoints through here.

use crate::config::LocatorPolicy;
use crate::grid::LatticeGraph;
use crate::types::{NodeId, Vec3};

/// Find the node closest to `point` under `policy`.
///
/// Returns `None` when there are no candidates (empty lattice, or no
/// walkable node under `WalkableOnly`, or a non-finite `point`).
pub fn closest_node(graph: &LatticeGraph, point: Vec3, policy: LocatorPolicy) -> Option<NodeId> {
    if !point.is_finite() {
        return None;
    }
    let mut best: Option<(NodeId, f32)> = None;
    for node in graph.nodes() {
        if policy == LocatorPolicy::WalkableOnly && !node.is_walkable() {
            continue;
        }
        let dist = node.position().distance(point);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((node.id(), dist)),
        }
    }
    best.map(|(id, _)| id)
}

/// Resolve both endpoints of a query. `None` if either has no candidate.
pub fn closest_pair(
    graph: &LatticeGraph,
    origin: Vec3,
    target: Vec3,
    policy: LocatorPolicy,
) -> Option<(NodeId, NodeId)> {
    Some((
        closest_node(graph, origin, policy)?,
        closest_node(graph, target, policy)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::types::LatticeCoord;

    fn grid() -> LatticeGraph {
        LatticeGraph::build(&GridConfig::new(3, 3, 3, 1.0, Vec3::ZERO)).unwrap()
    }

    #[test]
    fn exact_position_selects_that_node() {
        let g = grid();
        for node in g.nodes() {
            assert_eq!(
                closest_node(&g, node.position(), LocatorPolicy::AllNodes),
                Some(node.id())
            );
        }
    }

    #[test]
    fn nearby_point_snaps_to_nearest() {
        let g = grid();
        let expected = g.id_of(LatticeCoord::new(2, 1, 0)).unwrap();
        // x ~ w = 1, y ~ h = 0, z ~ d = 2.
        let p = Vec3::new(1.2, -0.3, 1.9);
        assert_eq!(closest_node(&g, p, LocatorPolicy::WalkableOnly), Some(expected));
    }

    #[test]
    fn ties_favor_lowest_index() {
        let g = grid();
        // Equidistant from [0,0,0] (id 0) and [0,0,1] (id 1).
        let p = Vec3::new(0.0, 0.5, 0.0);
        assert_eq!(closest_node(&g, p, LocatorPolicy::AllNodes), Some(NodeId(0)));
    }

    #[test]
    fn walkable_only_skips_blocked_nodes() {
        let mut g = grid();
        let blocked = g.id_of(LatticeCoord::new(0, 0, 0)).unwrap();
        g.node_mut(blocked).set_walkable(false);

        let p = Vec3::ZERO;
        assert_eq!(closest_node(&g, p, LocatorPolicy::AllNodes), Some(blocked));
        let snapped = closest_node(&g, p, LocatorPolicy::WalkableOnly).unwrap();
        assert_ne!(snapped, blocked);
        // Three nodes are at distance 1; the lowest id is [0,0,1].
        assert_eq!(g.node(snapped).coord(), LatticeCoord::new(0, 0, 1));
    }

    #[test]
    fn non_finite_point_has_no_candidate() {
        let g = grid();
        let p = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(closest_node(&g, p, LocatorPolicy::AllNodes), None);
    }

    #[test]
    fn no_walkable_nodes_yields_none() {
        let config = GridConfig {
            nodes_only_in_area: true,
            ..GridConfig::new(2, 2, 2, 1.0, Vec3::ZERO)
        };
        let g = LatticeGraph::build(&config).unwrap();
        assert_eq!(closest_node(&g, Vec3::ZERO, LocatorPolicy::WalkableOnly), None);
        assert!(closest_pair(&g, Vec3::ZERO, Vec3::ONE, LocatorPolicy::WalkableOnly).is_none());
        assert!(closest_pair(&g, Vec3::ZERO, Vec3::ONE, LocatorPolicy::AllNodes).is_some());
    }
}
