// Data-driven navigation configuration.
//
// All tunable parameters live in `NavConfig`, loaded from JSON at startup.
// It is split into three groups:
// - `GridConfig`: lattice topology (dimensions, spacing, origin) and the
//   per-node defaults applied at build time (area-only walkability, terrain
//   bias). Changing these requires a reload.
// - `SolverConfig`: how queries run (locator candidate policy, whether bias
//   enters edge cost, early exit, frontier strategy). Read on every query.
// - `EventConfig`: how many undrained events the navigator keeps.
//
// Every struct uses `#[serde(default)]`, so a config file only needs the
// fields it changes. Validation happens in `GridConfig::validate()`, called
// by the lattice builder; serde only checks shape.
//
// See also: `grid.rs` which consumes `GridConfig`, `dijkstra.rs` and
// `locate.rs` which read `SolverConfig`.

use crate::error::{NavError, NavResult};
use crate::types::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest allowed lattice extent along any axis.
pub const MIN_DIMENSION: u32 = 1;
/// Largest allowed lattice extent along any axis.
pub const MAX_DIMENSION: u32 = 25;

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Which nodes the closest-node locator may return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorPolicy {
    /// Every node, walkable or not.
    AllNodes,
    /// Only nodes that are walkable at query time.
    #[default]
    WalkableOnly,
}

/// Whether the precomputed terrain bias participates in relaxation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasPolicy {
    /// Bias is stored but never read by the solver. Edge cost is pure
    /// geometric distance.
    #[default]
    Ignore,
    /// The bias of the node being entered is added to each edge cost.
    AddToEdgeCost,
}

/// Frontier data structure used by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontierKind {
    /// Lazy-deletion binary heap keyed by `(distance, NodeId)`.
    #[default]
    BinaryHeap,
    /// Scan every node for the minimum each iteration. O(V²); kept as a
    /// reference for the heap's output.
    LinearScan,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Reference point for the per-node terrain bias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainBias {
    /// Nodes closer to this point get a smaller bias.
    pub reference: Vec3,
}

/// Lattice topology and build-time node defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of layers along Z.
    pub depth: u32,
    /// Number of columns along X.
    pub width: u32,
    /// Number of rows along Y.
    pub height: u32,
    /// World distance between adjacent nodes.
    pub padding: f32,
    /// World position of node `[0, 0, 0]`, or of the lattice center when
    /// `center_on_origin` is set.
    pub origin: Vec3,
    /// Shift the lattice so `origin` sits at its geometric center.
    pub center_on_origin: bool,
    /// Nodes start unwalkable and are only enabled while an external area
    /// detector reports them inside an active region.
    pub nodes_only_in_area: bool,
    /// Scale of each node's visual/collider template. Node bounds set through
    /// `set_node_bounds` are divided by this to get collider-local units.
    pub node_scale: Vec3,
    /// Precompute a static per-node bias from vertical rank and distance to
    /// a reference point. `None` leaves every node's bias unset.
    pub terrain_bias: Option<TerrainBias>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            width: 5,
            height: 5,
            padding: 3.0,
            origin: Vec3::ZERO,
            center_on_origin: false,
            nodes_only_in_area: false,
            node_scale: Vec3::ONE,
            terrain_bias: None,
        }
    }
}

impl GridConfig {
    /// Shorthand for an uncentered lattice with default node settings.
    pub fn new(depth: u32, width: u32, height: u32, padding: f32, origin: Vec3) -> Self {
        Self {
            depth,
            width,
            height,
            padding,
            origin,
            ..Self::default()
        }
    }

    /// Total number of nodes the lattice will contain.
    pub fn node_count(&self) -> usize {
        self.depth as usize * self.width as usize * self.height as usize
    }

    /// Reject dimensions outside `[1, 25]`, non-positive or non-finite
    /// padding, and non-finite origin/reference points.
    pub fn validate(&self) -> NavResult<()> {
        for (name, value) in [
            ("depth", self.depth),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(NavError::InvalidConfig(format!(
                    "{name} must be in [{MIN_DIMENSION}, {MAX_DIMENSION}], got {value}"
                )));
            }
        }
        if !(self.padding.is_finite() && self.padding > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "padding must be a positive finite number, got {}",
                self.padding
            )));
        }
        if !self.origin.is_finite() {
            return Err(NavError::InvalidConfig(format!(
                "origin must be finite, got {}",
                self.origin
            )));
        }
        if !(self.node_scale.is_finite()
            && self.node_scale.x > 0.0
            && self.node_scale.y > 0.0
            && self.node_scale.z > 0.0)
        {
            return Err(NavError::InvalidConfig(format!(
                "node scale must be positive and finite, got {}",
                self.node_scale
            )));
        }
        let bad_reference = self
            .terrain_bias
            .as_ref()
            .map(|b| b.reference)
            .filter(|r| !r.is_finite());
        if let Some(reference) = bad_reference {
            return Err(NavError::InvalidConfig(format!(
                "terrain bias reference must be finite, got {reference}"
            )));
        }
        Ok(())
    }

    /// World position of lattice coordinate `[0, 0, 0]` after centering.
    pub fn effective_origin(&self) -> Vec3 {
        if !self.center_on_origin {
            return self.origin;
        }
        let half_span = |n: u32| ((n.saturating_sub(1)) as f32 * self.padding) / 2.0;
        Vec3::new(
            self.origin.x - half_span(self.width),
            self.origin.y - half_span(self.height),
            self.origin.z - half_span(self.depth),
        )
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Per-query behavior.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub locator: LocatorPolicy,
    pub bias_policy: BiasPolicy,
    /// Stop relaxing once the target is settled. Off by default: the solver
    /// builds the whole shortest-path tree, which is cheap on lattices of at
    /// most 25³ nodes and keeps every node's label meaningful after a query.
    pub stop_at_target: bool,
    pub frontier: FrontierKind,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Pending-event buffer limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Most events held between drains. When full, the oldest event is
    /// dropped to make room. Zero disables event recording.
    pub capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

/// Complete navigation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub grid: GridConfig,
    pub solver: SolverConfig,
    pub events: EventConfig,
}

impl NavConfig {
    /// Parse a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> NavResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> NavResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = NavConfig::default();
        assert!(config.grid.validate().is_ok());
        assert_eq!(config.grid.node_count(), 125);
        assert_eq!(config.solver.locator, LocatorPolicy::WalkableOnly);
        assert_eq!(config.solver.bias_policy, BiasPolicy::Ignore);
        assert!(!config.solver.stop_at_target);
        assert_eq!(config.events.capacity, 1024);
    }

    #[test]
    fn default_config_serializes() {
        let config = NavConfig::default();
        let json = config.to_json().unwrap();
        let restored = NavConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "grid": { "depth": 3, "width": 1, "height": 3, "padding": 1.0 },
            "solver": { "locator": "AllNodes", "frontier": "LinearScan" }
        }"#;
        let config = NavConfig::from_json(json).unwrap();
        assert_eq!(config.grid.depth, 3);
        assert_eq!(config.grid.width, 1);
        assert_eq!(config.grid.origin, Vec3::ZERO);
        assert!(!config.grid.nodes_only_in_area);
        assert_eq!(config.solver.locator, LocatorPolicy::AllNodes);
        assert_eq!(config.solver.frontier, FrontierKind::LinearScan);
        assert_eq!(config.solver.bias_policy, BiasPolicy::Ignore);
        assert_eq!(config.events, EventConfig::default());
    }

    #[test]
    fn config_loads_terrain_bias() {
        let json = r#"{
            "grid": {
                "terrain_bias": { "reference": { "x": 1.0, "y": 2.0, "z": 3.0 } }
            },
            "solver": { "bias_policy": "AddToEdgeCost" }
        }"#;
        let config = NavConfig::from_json(json).unwrap();
        let bias = config.grid.terrain_bias.unwrap();
        assert_eq!(bias.reference, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.solver.bias_policy, BiasPolicy::AddToEdgeCost);
    }

    #[test]
    fn from_json_rejects_wrong_schema() {
        let err = NavConfig::from_json(r#"{ "grid": { "depth": "five" } }"#).unwrap_err();
        assert!(matches!(err, NavError::Json(_)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = NavConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, NavError::Io(_)));
    }

    #[test]
    fn validate_rejects_out_of_range_dimensions() {
        let with_depth = |depth| GridConfig {
            depth,
            ..GridConfig::default()
        };
        assert!(matches!(with_depth(0).validate(), Err(NavError::InvalidConfig(_))));
        assert!(matches!(with_depth(26).validate(), Err(NavError::InvalidConfig(_))));
        assert!(with_depth(25).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_padding() {
        for padding in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let grid = GridConfig {
                padding,
                ..GridConfig::default()
            };
            assert!(
                matches!(grid.validate(), Err(NavError::InvalidConfig(_))),
                "padding {padding} should be rejected"
            );
        }
    }

    #[test]
    fn effective_origin_centers_lattice() {
        let grid = GridConfig {
            depth: 3,
            width: 5,
            height: 1,
            padding: 2.0,
            origin: Vec3::new(10.0, 10.0, 10.0),
            center_on_origin: true,
            ..GridConfig::default()
        };
        // Half spans: width (5-1)*2/2 = 4, height 0, depth (3-1)*2/2 = 2.
        assert_eq!(grid.effective_origin(), Vec3::new(6.0, 10.0, 8.0));

        let uncentered = GridConfig {
            center_on_origin: false,
            ..grid
        };
        assert_eq!(uncentered.effective_origin(), Vec3::new(10.0, 10.0, 10.0));
    }
}
