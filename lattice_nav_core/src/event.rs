// Navigation events: the observable side effects of mutating the lattice.
//
// The navigator never calls into presentation code. Anything a renderer or
// debug overlay needs to react to (recoloring a node when it becomes
// blocked, respawning node visuals after a reload) is pushed onto a pending
// buffer as a `NavEvent` and handed out by `LatticeNavigator::
// drain_events()`.
//
// Ordering guarantees:
// - Events are drained in the order they were emitted.
// - A reload emits `GridDestroyed` (old node count) strictly before
//   `GridBuilt` (new node count).
// - `WalkabilityChanged` is emitted only when the value actually changes.
//
// See also: `navigator.rs` which emits these, `command.rs` for the inputs
// that cause most of them.

use crate::types::{LatticeCoord, NodeId, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavEvent {
    /// A lattice was built (initial construction or the second half of a
    /// reload).
    GridBuilt { node_count: usize },
    /// The previous lattice was discarded. Every `NodeId` it handed out is
    /// now invalid.
    GridDestroyed { node_count: usize },
    /// A node's walkability flipped.
    WalkabilityChanged {
        node: NodeId,
        coord: LatticeCoord,
        walkable: bool,
    },
    /// Every node's collider was resized to `size` (world units).
    NodeBoundsChanged { size: Vec3 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_is_externally_tagged() {
        let event = NavEvent::WalkabilityChanged {
            node: NodeId(4),
            coord: LatticeCoord::new(1, 0, 1),
            walkable: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"WalkabilityChanged":"#));
        let restored: NavEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, restored);
    }
}
