// lattice_nav_core - 3D lattice graph and shortest-path navigation.
//
// This crate builds a regular, six-connected lattice of waypoint nodes over
// a box of world space and answers point-to-point route queries with
// Dijkstra's algorithm. Nodes can be blocked and unblocked at runtime by
// external signals (area detectors, obstacle tracking); the lattice can be
// discarded and rebuilt on demand. There is no rendering, physics, or
// scene-graph dependency: presentation reacts to drained `NavEvent`s.
//
// Module overview:
// - `types.rs`:     Vec3, Aabb, LatticeCoord, NodeId.
// - `config.rs`:    NavConfig = GridConfig + SolverConfig, JSON loading and validation.
// - `error.rs`:     NavError / NavResult.
// - `node.rs`:      NodeState: per-node topology, walkability, search labels, bounds.
// - `grid.rs`:      LatticeGraph: node arena, neighbor wiring, terrain bias.
// - `locate.rs`:    Closest-node lookup for snapping world points onto the lattice.
// - `dijkstra.rs`:  Shortest-path tree solver (heap and linear-scan frontiers).
// - `path.rs`:      Predecessor tracing and PathResult.
// - `navigator.rs`: LatticeNavigator: owns the graph; queries, reloads, walkability.
// - `shared.rs`:    SharedNavigator: thread-safe handle with reload-during-query rejection.
// - `tracker.rs`:   PathTracker (endpoint-holding planner), Route, RouteWalker.
// - `command.rs`:   NavCommand: serialized mutations.
// - `event.rs`:     NavEvent: observable side effects.
//
// Query results are deterministic: every scan runs in arena order and every
// tie breaks towards the lowest `NodeId`, so the same lattice and the same
// query always produce the same route.

pub mod command;
pub mod config;
pub mod dijkstra;
pub mod error;
pub mod event;
pub mod grid;
pub mod locate;
pub mod navigator;
pub mod node;
pub mod path;
pub mod shared;
pub mod tracker;
pub mod types;

pub use command::NavCommand;
pub use config::{
    BiasPolicy, EventConfig, FrontierKind, GridConfig, LocatorPolicy, NavConfig, SolverConfig,
};
pub use error::{NavError, NavResult, NoPathReason};
pub use event::NavEvent;
pub use navigator::LatticeNavigator;
pub use path::PathResult;
pub use shared::SharedNavigator;
pub use tracker::{PathTracker, Route, RouteWalker};
pub use types::{LatticeCoord, NodeId, Vec3};
