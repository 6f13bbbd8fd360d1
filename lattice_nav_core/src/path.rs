// Route reconstruction from solver labels.
//
// After `dijkstra::shortest_path_tree()`, every reached node's predecessor
// points one step closer to the start. Two readers of that chain:
//
// - `trace_predecessors()`: follow predecessors from the target until none
//   remain and reverse. No validation. For an unreachable target the result
//   is just `[target]`, which looks like a (wrong) one-node route. Kept for
//   callers that inspect raw solver state. Only an id outside the arena is
//   an error (`UnknownNode`).
// - `extract_path()`: the checked version. Succeeds only if the target has
//   a finite label and the chain ends at `start`; anything else is
//   `PathNotFound(Unreachable)`.
//
// See also: `dijkstra.rs` which writes the labels, `navigator.rs` which
// calls `extract_path()` at the end of every query.

use crate::error::{NavError, NavResult, NoPathReason};
use crate::grid::LatticeGraph;
use crate::types::{NodeId, Vec3};
use serde::{Deserialize, Serialize};

/// A route through the lattice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Node ids from start to target inclusive.
    pub nodes: Vec<NodeId>,
    /// World position of each entry in `nodes`.
    pub positions: Vec<Vec3>,
    /// Solver label of the target. Includes bias when bias enters edge cost.
    pub total_cost: f32,
}

impl PathResult {
    /// Geometric length of the node polyline.
    pub fn length(&self) -> f32 {
        self.positions
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// Follow predecessors back from `target` and return the chain in
/// start-to-target order.
pub fn trace_predecessors(graph: &LatticeGraph, target: NodeId) -> NavResult<Vec<NodeId>> {
    let target_node = graph.get(target).ok_or(NavError::UnknownNode(target))?;
    let mut chain = vec![target];
    let mut current = target_node.predecessor();
    while let Some(prev) = current {
        // A chain can never be longer than the arena; anything else is a
        // predecessor cycle.
        debug_assert!(chain.len() <= graph.node_count(), "predecessor cycle");
        chain.push(prev);
        current = graph.node(prev).predecessor();
    }
    chain.reverse();
    Ok(chain)
}

/// Build a `PathResult` from the current labels, or `PathNotFound` if the
/// target was not reached from `start`.
pub fn extract_path(graph: &LatticeGraph, start: NodeId, target: NodeId) -> NavResult<PathResult> {
    let unreachable = NavError::PathNotFound(NoPathReason::Unreachable);
    let Some(target_node) = graph.get(target) else {
        return Err(NavError::UnknownNode(target));
    };
    if !target_node.is_reached() {
        return Err(unreachable);
    }

    let nodes = trace_predecessors(graph, target)?;
    if nodes.first() != Some(&start) {
        return Err(unreachable);
    }

    let positions = nodes.iter().map(|&id| graph.node(id).position()).collect();
    Ok(PathResult {
        nodes,
        positions,
        total_cost: target_node.distance(),
    })
}
