// Error type for lattice navigation.
//
// Every failure a caller can hit is a `NavError` value. "No path" is an
// ordinary outcome for a movement controller, so it is reported as
// `PathNotFound` with a reason rather than as an empty route.
//
// See also: `navigator.rs` for where most of these originate,
// `tracker.rs` for `MissingEndpoint`, `shared.rs` for `ReloadDuringQuery`.

use crate::types::{LatticeCoord, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a query produced no route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoPathReason {
    /// The solver exhausted the walkable frontier without labeling the target.
    Unreachable,
    /// The locator had nothing to choose from: an empty lattice, or no
    /// walkable nodes under the `WalkableOnly` policy.
    NoCandidates,
    /// The `AllNodes` locator resolved an endpoint to an unwalkable node.
    UnwalkableEndpoint,
}

impl fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoPathReason::Unreachable => "target is unreachable",
            NoPathReason::NoCandidates => "no candidate nodes",
            NoPathReason::UnwalkableEndpoint => "endpoint is not walkable",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum NavError {
    #[error("{}", missing_endpoint_message(.origin_missing, .target_missing))]
    MissingEndpoint {
        origin_missing: bool,
        target_missing: bool,
    },

    #[error("no path found: {0}")]
    PathNotFound(NoPathReason),

    #[error("grid reload rejected: a path query is in flight")]
    ReloadDuringQuery,

    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("lattice coordinate {0} is out of bounds")]
    CoordOutOfBounds(LatticeCoord),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("navigator lock poisoned by a panicking query")]
    LockPoisoned,
}

impl NavError {
    /// True for the "no route this time" family of outcomes.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, NavError::PathNotFound(_))
    }
}

// Field references come from the thiserror attribute.
fn missing_endpoint_message(origin_missing: &bool, target_missing: &bool) -> String {
    let mut msg = String::from("ERROR:");
    if *origin_missing {
        msg.push_str("\n- Origin reference is missing!");
    }
    if *target_missing {
        msg.push_str("\n- Target reference is missing!");
    }
    msg
}

/// Result type alias for all fallible navigation operations.
pub type NavResult<T> = Result<T, NavError>;
