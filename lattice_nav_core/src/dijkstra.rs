// Single-source Dijkstra over the lattice.
//
// `shortest_path_tree()` resets every node's search state, labels the start
// with distance 0, and settles nodes in order of increasing distance,
// relaxing each settled node's walkable, unsettled neighbors. Labels and
// predecessors are written into the graph's `NodeState`s; `path.rs` reads
// them back.
//
// Node states during a run:
//
//   Unvisited (distance = ∞) → Frontier (finite, unsettled) → Settled
//
// Edge cost is the Euclidean distance between the two node positions,
// computed per edge rather than assumed to be `padding`. Under
// `BiasPolicy::AddToEdgeCost` the entered node's static bias is added.
//
// The run does NOT stop when the target is settled unless
// `SolverConfig::stop_at_target` is set. Exhausting the frontier leaves a
// full shortest-path tree over the walkable component of the start, which
// callers may inspect (every reached node has a meaningful label). Early
// exit produces the same label and predecessor chain for the target.
//
// Frontier selection picks the minimum `(distance, NodeId)`: ties go to the
// lowest arena index. Two implementations share that order:
// - `FrontierKind::BinaryHeap`: lazy-deletion min-heap (reversed `Ord`, same
//   pattern as the event queue). Stale entries are skipped on pop.
// - `FrontierKind::LinearScan`: scans every node each iteration. O(V²);
//   exists to cross-check the heap.
//
// An unreachable target is not an error here: its distance stays ∞ and its
// predecessor `None`. `path.rs` turns that into `PathNotFound`.
//
// See also: `grid.rs` for the graph being searched, `path.rs` for route
// reconstruction, `navigator.rs` for the query entry point.

use crate::config::{BiasPolicy, FrontierKind, SolverConfig};
use crate::error::{NavError, NavResult};
use crate::grid::LatticeGraph;
use crate::node::Neighbors;
use crate::types::NodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Summary of one solver run.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub start: NodeId,
    pub target: NodeId,
    /// Final label of the target; `f32::INFINITY` when unreachable.
    pub target_distance: f32,
    /// Number of nodes settled during the run.
    pub settled: usize,
    /// True if the run ended at the target rather than by exhausting the
    /// frontier.
    pub stopped_early: bool,
}

impl SearchOutcome {
    pub fn is_reachable(&self) -> bool {
        self.target_distance.is_finite()
    }
}

/// Entry in the heap frontier (min-heap via reversed ordering).
struct FrontierEntry {
    node: NodeId,
    distance: f32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (distance, id) is "greatest".
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.0.cmp(&self.node.0))
    }
}

/// Run Dijkstra from `start` over the current walkable subgraph.
///
/// Returns `UnknownNode` if either id does not belong to `graph`. An
/// unwalkable start settles nothing.
pub fn shortest_path_tree(
    graph: &mut LatticeGraph,
    start: NodeId,
    target: NodeId,
    config: &SolverConfig,
) -> NavResult<SearchOutcome> {
    for id in [start, target] {
        if graph.get(id).is_none() {
            return Err(NavError::UnknownNode(id));
        }
    }

    let started_at = Instant::now();
    graph.reset_search_state();

    let mut search = Search {
        settled: vec![false; graph.node_count()],
        settled_count: 0,
        target,
        stop_at_target: config.stop_at_target,
        bias_policy: config.bias_policy,
    };

    let stopped_early = if graph.node(start).is_walkable() {
        graph.node_mut(start).set_distance(0.0);
        match config.frontier {
            FrontierKind::BinaryHeap => search.run_heap(graph, start),
            FrontierKind::LinearScan => search.run_linear(graph),
        }
    } else {
        false
    };

    let outcome = SearchOutcome {
        start,
        target,
        target_distance: graph.node(target).distance(),
        settled: search.settled_count,
        stopped_early,
    };
    log::debug!(
        "dijkstra {:?}: settled {}/{} nodes in {:?}, target {} at {}",
        config.frontier,
        outcome.settled,
        graph.node_count(),
        started_at.elapsed(),
        target,
        outcome.target_distance,
    );
    Ok(outcome)
}

/// Per-run bookkeeping shared by both frontier strategies.
struct Search {
    settled: Vec<bool>,
    settled_count: usize,
    target: NodeId,
    stop_at_target: bool,
    bias_policy: BiasPolicy,
}

impl Search {
    /// Heap frontier. Returns true if the run stopped at the target.
    fn run_heap(&mut self, graph: &mut LatticeGraph, start: NodeId) -> bool {
        let mut open = BinaryHeap::new();
        open.push(FrontierEntry {
            node: start,
            distance: 0.0,
        });

        while let Some(entry) = open.pop() {
            let ci = entry.node.index();
            if self.settled[ci] || entry.distance > graph.node(entry.node).distance() {
                continue;
            }
            if self.settle(graph, entry.node, |node, distance| {
                open.push(FrontierEntry { node, distance })
            }) {
                return true;
            }
        }
        false
    }

    /// Linear-scan frontier. Returns true if the run stopped at the target.
    fn run_linear(&mut self, graph: &mut LatticeGraph) -> bool {
        loop {
            let mut best: Option<(NodeId, f32)> = None;
            for node in graph.nodes() {
                let d = node.distance();
                if self.settled[node.id().index()] || !d.is_finite() {
                    continue;
                }
                match best {
                    Some((_, best_d)) if d >= best_d => {}
                    _ => best = Some((node.id(), d)),
                }
            }
            let Some((current, _)) = best else {
                return false;
            };
            if self.settle(graph, current, |_, _| {}) {
                return true;
            }
        }
    }

    /// Mark `current` settled and relax its neighbors. `on_improve` is called
    /// for every neighbor whose label dropped. Returns true if the run should
    /// stop here.
    fn settle(
        &mut self,
        graph: &mut LatticeGraph,
        current: NodeId,
        mut on_improve: impl FnMut(NodeId, f32),
    ) -> bool {
        self.settled[current.index()] = true;
        self.settled_count += 1;
        if self.stop_at_target && current == self.target {
            return true;
        }

        let (current_pos, current_dist, neighbors) = {
            let node = graph.node(current);
            (
                node.position(),
                node.distance(),
                Neighbors::from_slice(node.neighbors()),
            )
        };

        for n in neighbors {
            if self.settled[n.index()] {
                continue;
            }
            let neighbor = graph.node_mut(n);
            if !neighbor.is_walkable() {
                continue;
            }
            let mut cost = current_pos.distance(neighbor.position());
            if self.bias_policy == BiasPolicy::AddToEdgeCost {
                cost += neighbor.bias().unwrap_or(0.0);
            }
            let candidate = current_dist + cost;
            if candidate < neighbor.distance() {
                neighbor.set_distance(candidate);
                neighbor.set_predecessor(Some(current));
                on_improve(n, candidate);
            }
        }
        false
    }
}
