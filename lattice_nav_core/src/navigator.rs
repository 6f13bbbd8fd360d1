// The navigator: owner of the lattice and entry point for every query.
//
// `LatticeNavigator` bundles the `NavConfig`, the current `LatticeGraph`,
// and a buffer of pending `NavEvent`s. There is no global grid; whoever owns
// the navigator owns the graph, and every mutation goes through `&mut self`,
// so a single owner can never interleave a reload with a running query. For
// multi-threaded use see `shared.rs`.
//
// A point-to-point query runs three stages:
//
//   1. Locate: snap origin and target to nodes (`locate.rs`), using the
//      configured `LocatorPolicy`.
//   2. Solve: Dijkstra from the start node (`dijkstra.rs`).
//   3. Extract: walk predecessors back from the target (`path.rs`).
//
// Failures at each stage map to `PathNotFound` with a distinct reason:
// `NoCandidates` (stage 1 found nothing), `UnwalkableEndpoint` (an endpoint
// node is blocked, only possible under `AllNodes` or via
// `find_path_between`), and `Unreachable` (stage 3).
//
// Walkability changes and reloads are recorded as events; nothing is pushed
// to observers directly. Callers drain them with `drain_events()`. Draining
// is optional, so the buffer is bounded by `EventConfig::capacity`: once
// full, the oldest event is dropped and counted in `dropped_events()`.
//
// See also: `command.rs` for the serialized mutation inputs, `event.rs` for
// the outputs, `tracker.rs` for the endpoint-holding route planner.

use crate::command::NavCommand;
use crate::config::{NavConfig, SolverConfig};
use crate::dijkstra::shortest_path_tree;
use crate::error::{NavError, NavResult, NoPathReason};
use crate::event::NavEvent;
use crate::grid::LatticeGraph;
use crate::locate::{closest_node, closest_pair};
use crate::path::{PathResult, extract_path};
use crate::types::{LatticeCoord, NodeId, Vec3};
use std::collections::VecDeque;

#[derive(Debug)]
pub struct LatticeNavigator {
    config: NavConfig,
    graph: LatticeGraph,
    pending_events: VecDeque<NavEvent>,
    dropped_events: u64,
}

impl LatticeNavigator {
    /// Validate `config` and build the initial lattice. Emits `GridBuilt`.
    pub fn new(config: NavConfig) -> NavResult<Self> {
        let graph = LatticeGraph::build(&config.grid)?;
        let node_count = graph.node_count();
        let mut nav = Self {
            config,
            graph,
            pending_events: VecDeque::new(),
            dropped_events: 0,
        };
        nav.record(NavEvent::GridBuilt { node_count });
        Ok(nav)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Shortest route between the nodes closest to `origin` and `target`.
    pub fn find_path(&mut self, origin: Vec3, target: Vec3) -> NavResult<PathResult> {
        let (start, goal) = closest_pair(&self.graph, origin, target, self.config.solver.locator)
            .ok_or(NavError::PathNotFound(NoPathReason::NoCandidates))?;
        self.find_path_between(start, goal)
    }

    /// Shortest route between two known nodes, skipping the locator.
    pub fn find_path_between(&mut self, start: NodeId, target: NodeId) -> NavResult<PathResult> {
        for id in [start, target] {
            let node = self.graph.get(id).ok_or(NavError::UnknownNode(id))?;
            if !node.is_walkable() {
                return Err(NavError::PathNotFound(NoPathReason::UnwalkableEndpoint));
            }
        }
        shortest_path_tree(&mut self.graph, start, target, &self.config.solver)?;
        extract_path(&self.graph, start, target)
    }

    /// Node the locator would pick for `point` under the configured policy.
    pub fn closest_node(&self, point: Vec3) -> Option<NodeId> {
        closest_node(&self.graph, point, self.config.solver.locator)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Discard the lattice and build a fresh one from the grid config.
    /// Walkability, bounds, and search state all return to their defaults.
    /// Emits `GridDestroyed` then `GridBuilt`.
    pub fn reload_grid(&mut self) -> NavResult<()> {
        let fresh = LatticeGraph::build(&self.config.grid)?;
        let old = std::mem::replace(&mut self.graph, fresh);
        self.record(NavEvent::GridDestroyed {
            node_count: old.node_count(),
        });
        self.record(NavEvent::GridBuilt {
            node_count: self.graph.node_count(),
        });
        log::debug!(
            "reloaded lattice: {} nodes destroyed, {} built",
            old.node_count(),
            self.graph.node_count()
        );
        Ok(())
    }

    /// Set a node's walkability. Returns whether the value changed; only a
    /// change emits `WalkabilityChanged`.
    pub fn set_walkable(&mut self, node: NodeId, walkable: bool) -> NavResult<bool> {
        let state = self
            .graph
            .get_mut(node)
            .ok_or(NavError::UnknownNode(node))?;
        if !state.set_walkable(walkable) {
            return Ok(false);
        }
        let coord = state.coord();
        log::trace!("node {node} at {coord} walkable = {walkable}");
        self.record(NavEvent::WalkabilityChanged {
            node,
            coord,
            walkable,
        });
        Ok(true)
    }

    /// Like `set_walkable`, addressed by lattice coordinate.
    pub fn set_walkable_at(&mut self, coord: LatticeCoord, walkable: bool) -> NavResult<bool> {
        let node = self.graph.require_id(coord)?;
        self.set_walkable(node, walkable)
    }

    /// Resize every node's collider so its world size is `size` scaled
    /// component-wise by `scale`. Emits `NodeBoundsChanged`.
    pub fn set_node_bounds(&mut self, size: Vec3, scale: Vec3) {
        let world_size = size.scale(scale);
        for node in self.graph.nodes_mut() {
            node.set_collider_dimension(world_size);
        }
        self.record(NavEvent::NodeBoundsChanged { size: world_size });
    }

    /// Replace the per-query solver settings. Takes effect on the next query.
    pub fn set_solver_config(&mut self, solver: SolverConfig) {
        self.config.solver = solver;
    }

    pub fn apply_command(&mut self, command: &NavCommand) -> NavResult<()> {
        match command {
            NavCommand::SetWalkable { coord, walkable } => {
                self.set_walkable_at(*coord, *walkable)?;
            }
            NavCommand::ReloadGrid => self.reload_grid()?,
            NavCommand::SetNodeBounds { size, scale } => self.set_node_bounds(*size, *scale),
        }
        Ok(())
    }

    /// Take all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        self.pending_events.drain(..).collect()
    }

    /// Total events discarded because the buffer was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    fn record(&mut self, event: NavEvent) {
        let capacity = self.config.events.capacity;
        if capacity == 0 {
            return;
        }
        if self.pending_events.len() >= capacity {
            if self.dropped_events == 0 {
                log::warn!("event buffer full ({capacity}); dropping oldest undrained events");
            }
            self.pending_events.pop_front();
            self.dropped_events += 1;
        }
        self.pending_events.push_back(event);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &LatticeGraph {
        &self.graph
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn walkable_count(&self) -> usize {
        self.graph.walkable_count()
    }
}
