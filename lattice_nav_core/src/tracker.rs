// Endpoint-holding route planner and a simple route follower.
//
// `PathTracker` is what a movement controller keeps around: an origin and a
// target that may or may not be set yet. `plan()` asks the navigator for the
// node route between them and frames it with the literal endpoints, so the
// returned `Route` starts exactly at the origin and ends exactly at the
// target even though both snap to the nearest node for the search:
//
//   origin → node₀ → node₁ → … → nodeₙ → target
//
// Missing endpoints are a recoverable `MissingEndpoint` error listing which
// reference is absent; set it and call `plan()` again.
//
// `RouteWalker` moves a point along a `Route` at a bounded step per call,
// visiting every route point in order.

use crate::error::{NavError, NavResult};
use crate::navigator::LatticeNavigator;
use crate::path::PathResult;
use crate::shared::SharedNavigator;
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// A polyline in world space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<Vec3>,
}

impl Route {
    /// Consecutive point pairs, e.g. for drawing debug lines.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PathTracker {
    origin: Option<Vec3>,
    target: Option<Vec3>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints(origin: Vec3, target: Vec3) -> Self {
        Self {
            origin: Some(origin),
            target: Some(target),
        }
    }

    pub fn set_origin(&mut self, origin: Option<Vec3>) {
        self.origin = origin;
    }

    pub fn set_target(&mut self, target: Option<Vec3>) {
        self.target = target;
    }

    pub fn origin(&self) -> Option<Vec3> {
        self.origin
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    fn endpoints(&self) -> NavResult<(Vec3, Vec3)> {
        match (self.origin, self.target) {
            (Some(origin), Some(target)) => Ok((origin, target)),
            (origin, target) => Err(NavError::MissingEndpoint {
                origin_missing: origin.is_none(),
                target_missing: target.is_none(),
            }),
        }
    }

    /// Plan a route on a navigator owned by the caller.
    pub fn plan(&self, navigator: &mut LatticeNavigator) -> NavResult<Route> {
        let (origin, target) = self.endpoints()?;
        let path = navigator.find_path(origin, target)?;
        Ok(frame(origin, &path, target))
    }

    /// Plan a route through a shared handle.
    pub fn plan_shared(&self, navigator: &SharedNavigator) -> NavResult<Route> {
        let (origin, target) = self.endpoints()?;
        let path = navigator.find_path(origin, target)?;
        Ok(frame(origin, &path, target))
    }
}

fn frame(origin: Vec3, path: &PathResult, target: Vec3) -> Route {
    let mut points = Vec::with_capacity(path.positions.len() + 2);
    points.push(origin);
    points.extend_from_slice(&path.positions);
    points.push(target);
    Route { points }
}

// ---------------------------------------------------------------------------
// RouteWalker
// ---------------------------------------------------------------------------

/// Moves a position through every point of a route in order.
#[derive(Clone, Debug)]
pub struct RouteWalker {
    route: Route,
    position: Vec3,
    next_index: usize,
}

impl RouteWalker {
    pub fn new(route: Route, position: Vec3) -> Self {
        Self {
            route,
            position,
            next_index: 0,
        }
    }

    /// Move up to `max_distance` toward the next route point. A point is
    /// passed only once it is reached exactly, so each call moves toward at
    /// most one point. A NaN or negative distance moves nothing. Returns
    /// `true` while points remain.
    pub fn step(&mut self, max_distance: f32) -> bool {
        let Some(&next) = self.route.points.get(self.next_index) else {
            return false;
        };
        if max_distance.is_nan() || max_distance < 0.0 {
            return true;
        }
        self.position = move_towards(self.position, next, max_distance);
        if self.position == next {
            self.next_index += 1;
        }
        !self.is_finished()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point currently being moved toward, if any.
    pub fn next_point(&self) -> Option<Vec3> {
        self.route.points.get(self.next_index).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.next_index >= self.route.points.len()
    }
}

fn move_towards(from: Vec3, to: Vec3, max_distance: f32) -> Vec3 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_distance || dist == 0.0 {
        return to;
    }
    from + delta * (max_distance / dist)
}
