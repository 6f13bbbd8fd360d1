// Core types shared across the lattice navigation crate.
//
// Defines world-space points (`Vec3`), lattice coordinates (`LatticeCoord`),
// arena node identifiers (`NodeId`), and the axis-aligned box (`Aabb`) that
// presentation and physics collaborators read node collider bounds through.
// All types derive `Serialize` and `Deserialize` so configs, commands, and
// events can be written as JSON.
//
// See also: `node.rs` for the per-node record built from these, `grid.rs`
// for the coordinate → arena index mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// World-space types
// ---------------------------------------------------------------------------

/// A point (or extent) in world space.
///
/// The lattice maps width onto X, height onto Y, and depth onto Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Component-wise product.
    pub fn scale(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise quotient. Zero divisor components leave the numerator
    /// unchanged, so a degenerate scale never produces NaN bounds.
    pub fn div_components(self, other: Self) -> Self {
        fn safe_div(a: f32, b: f32) -> f32 {
            if b == 0.0 { a } else { a / b }
        }
        Self::new(
            safe_div(self.x, other.x),
            safe_div(self.y, other.y),
            safe_div(self.z, other.z),
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` with the given full `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

// ---------------------------------------------------------------------------
// Lattice identity
// ---------------------------------------------------------------------------

/// Integer coordinate of a lattice node: `(depth, width, height)` index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeCoord {
    pub d: u32,
    pub w: u32,
    pub h: u32,
}

impl LatticeCoord {
    pub const fn new(d: u32, w: u32, h: u32) -> Self {
        Self { d, w, h }
    }

    /// Manhattan distance in lattice steps.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.d.abs_diff(other.d) + self.w.abs_diff(other.w) + self.h.abs_diff(other.h)
    }
}

impl fmt::Display for LatticeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.d, self.w, self.h)
    }
}

/// Index of a node in the lattice arena.
///
/// Ids are only meaningful for the lattice instance that issued them; a
/// reload rebuilds the arena and may reuse the same numbers for new nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
