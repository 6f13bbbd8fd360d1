// Commands that mutate navigator state.
//
// External controllers (area detectors, editor tooling, scripted scenarios)
// can drive the navigator through `NavCommand` instead of calling methods
// directly. Commands are plain serde data, so a scenario file is just a list
// of them. Current commands:
// - `SetWalkable`: enable or block one node by lattice coordinate.
// - `ReloadGrid`: discard the lattice and rebuild it from the config.
// - `SetNodeBounds`: resize every node's collider.
//
// See also: `navigator.rs` for `apply_command()` which dispatches these,
// `event.rs` for what each one emits.

use crate::types::{LatticeCoord, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavCommand {
    /// Set walkability of the node at `coord`. Out-of-bounds coordinates are
    /// rejected with `CoordOutOfBounds`.
    SetWalkable { coord: LatticeCoord, walkable: bool },
    /// Rebuild the lattice from the current config.
    ReloadGrid,
    /// Resize node colliders to `size` scaled component-wise by `scale`.
    SetNodeBounds { size: Vec3, scale: Vec3 },
}
