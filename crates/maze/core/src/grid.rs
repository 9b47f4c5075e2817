//! Tile-space and world-space geometry primitives.
//!
//! Everything the AI reasons about is expressed in integer tile coordinates
//! ([`GridPosition`]). World-space values ([`WorldPoint`], [`MoveVector`]) only
//! appear at the boundary where a brain turns its next path step into a
//! movement command.

use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// Positions are small `Copy` values and are passed by value everywhere.
/// The `y` axis of the grid maps to the world `z` axis when computing yaw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// The four cardinal offsets, in a fixed order (N, E, S, W).
    pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    /// The eight king-move offsets, cardinals first.
    pub const KING_MOVES: [(i32, i32); 8] = [
        (0, -1),
        (1, 0),
        (0, 1),
        (-1, 0),
        (1, -1),
        (1, 1),
        (-1, 1),
        (-1, -1),
    ];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan (L1) distance in tiles.
    #[inline]
    pub const fn manhattan(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Chebyshev (L∞) distance in tiles.
    #[inline]
    pub fn chebyshev(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// Euclidean distance in tiles.
    #[inline]
    pub fn euclidean(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn neighbors4(self) -> impl Iterator<Item = GridPosition> {
        Self::CARDINALS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }

    pub fn neighbors8(self) -> impl Iterator<Item = GridPosition> {
        Self::KING_MOVES
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Center of this tile in world space.
    pub fn to_world(self, tile_size: f64) -> WorldPoint {
        WorldPoint::new(
            (f64::from(self.x) + 0.5) * tile_size,
            (f64::from(self.y) + 0.5) * tile_size,
        )
    }

    /// Tile containing the given world point.
    pub fn from_world(point: WorldPoint, tile_size: f64) -> Self {
        Self::new(
            (point.x / tile_size).floor() as i32,
            (point.z / tile_size).floor() as i32,
        )
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Continuous position on the ground plane (`x`, `z`).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f64,
    pub z: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Planar movement direction emitted in a command.
///
/// Either a unit vector or exactly zero (stand still).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveVector {
    pub x: f64,
    pub y: f64,
}

impl MoveVector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Normalizes `(x, y)`; vectors shorter than `1e-6` collapse to [`Self::ZERO`].
    pub fn normalized(x: f64, y: f64) -> Self {
        let len = (x * x + y * y).sqrt();
        if len < 1e-6 {
            Self::ZERO
        } else {
            Self {
                x: x / len,
                y: y / len,
            }
        }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_and_chebyshev() {
        let a = GridPosition::new(0, 0);
        let b = GridPosition::new(3, -4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.chebyshev(b), 4);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn world_round_trip_lands_on_tile_center() {
        let tile = GridPosition::new(4, 7);
        let world = tile.to_world(2.0);
        assert_eq!(world, WorldPoint::new(9.0, 15.0));
        assert_eq!(GridPosition::from_world(world, 2.0), tile);
    }

    #[test]
    fn tiny_vectors_normalize_to_zero() {
        assert!(MoveVector::normalized(1e-9, 0.0).is_zero());
        let v = MoveVector::normalized(3.0, 4.0);
        assert!((v.length() - 1.0).abs() < 1e-9);
    }
}
