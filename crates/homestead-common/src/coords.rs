//! Grid coordinates for the square world grid.

use serde::{Deserialize, Serialize};

/// Orthogonal neighbor offsets (east, west, south, north).
pub const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Orthogonal and diagonal neighbor offsets.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Cell coordinate on the world grid.
///
/// Signed so neighbor arithmetic can step off the grid; use
/// [`GridCoord::in_bounds`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column (0 = west edge)
    pub x: i32,
    /// Row (0 = north edge)
    pub y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Checks whether the coordinate lies inside a `size × size` grid.
    #[must_use]
    pub const fn in_bounds(self, size: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as i64) < size as i64 && (self.y as i64) < size as i64
    }

    /// Converts to a row-major linear index.
    ///
    /// Only meaningful for in-bounds coordinates.
    #[must_use]
    pub const fn to_index(self, size: u32) -> usize {
        (self.y as usize) * (size as usize) + (self.x as usize)
    }

    /// Creates from a row-major linear index.
    #[must_use]
    pub const fn from_index(index: usize, size: u32) -> Self {
        let size = size as usize;
        Self {
            x: (index % size) as i32,
            y: (index / size) as i32,
        }
    }

    /// Euclidean distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// In-bounds orthogonal neighbors.
    pub fn neighbors4(self, size: u32) -> impl Iterator<Item = Self> {
        NEIGHBORS_4
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
            .filter(move |c| c.in_bounds(size))
    }

    /// In-bounds orthogonal and diagonal neighbors.
    pub fn neighbors8(self, size: u32) -> impl Iterator<Item = Self> {
        NEIGHBORS_8
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
            .filter(move |c| c.in_bounds(size))
    }
}
