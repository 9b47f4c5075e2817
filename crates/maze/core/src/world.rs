//! Collaborator interfaces consumed by the AI.
//!
//! The AI never owns the map or the path solver. Hosts implement
//! [`WorldOracle`] and [`PathPlanner`] and lend them to every tick.
use std::collections::HashSet;

use rand::RngCore;

use crate::grid::GridPosition;

/// Static and environmental map queries.
pub trait WorldOracle {
    fn is_walkable(&self, pos: GridPosition) -> bool;

    /// Returns true when nothing opaque lies between `a` and `b`.
    fn has_line_of_sight(&self, a: GridPosition, b: GridPosition) -> bool;

    /// Picks any walkable tile, or `None` when the map has none.
    fn random_walkable_tile(&self, rng: &mut dyn RngCore) -> Option<GridPosition>;

    /// Areas that shrink vision for observers standing inside them.
    fn dark_zones(&self) -> &[DarkZone] {
        &[]
    }

    /// Volumes that block sight lines passing through them.
    fn smoke_clouds(&self) -> &[SmokeCloud] {
        &[]
    }

    fn rooms(&self) -> &[Room] {
        &[]
    }

    fn room_at(&self, pos: GridPosition) -> Option<&Room> {
        self.rooms().iter().find(|room| room.contains(pos))
    }

    /// Number of walkable cardinal neighbours.
    fn walkable_degree(&self, pos: GridPosition) -> u8 {
        pos.neighbors4().filter(|n| self.is_walkable(*n)).count() as u8
    }
}

/// Path solver over the same map the [`WorldOracle`] describes.
pub trait PathPlanner {
    /// Returns the tile sequence from `start` (exclusive) to `goal` (inclusive),
    /// or `None` when `goal` cannot be reached.
    fn find_path(
        &self,
        start: GridPosition,
        goal: GridPosition,
        allow_diagonals: bool,
        avoid: Option<&HashSet<GridPosition>>,
    ) -> Option<Vec<GridPosition>>;

    /// Removes redundant waypoints. The default keeps the path unchanged.
    fn smooth_path(&self, path: Vec<GridPosition>) -> Vec<GridPosition> {
        path
    }
}

/// Circular region in tile space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Circle centered on the middle of a tile.
    pub fn around(tile: GridPosition, radius: f64) -> Self {
        Self::new(f64::from(tile.x) + 0.5, f64::from(tile.y) + 0.5, radius)
    }

    pub fn contains(&self, tile: GridPosition) -> bool {
        let dx = f64::from(tile.x) + 0.5 - self.center_x;
        let dy = f64::from(tile.y) + 0.5 - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Whether the segment between two tile centers passes through the circle.
    pub fn intersects_segment(&self, a: GridPosition, b: GridPosition) -> bool {
        let (ax, ay) = (f64::from(a.x) + 0.5, f64::from(a.y) + 0.5);
        let (bx, by) = (f64::from(b.x) + 0.5, f64::from(b.y) + 0.5);
        let (dx, dy) = (bx - ax, by - ay);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq <= f64::EPSILON {
            0.0
        } else {
            (((self.center_x - ax) * dx + (self.center_y - ay) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let px = ax + dx * t - self.center_x;
        let py = ay + dy * t - self.center_y;
        px * px + py * py <= self.radius * self.radius
    }
}

/// Darkness area. Observers inside see at `vision_mult` of their range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DarkZone {
    pub area: Circle,
    /// Overrides the configured dark-vision multiplier when set.
    pub vision_mult: Option<f64>,
}

/// Active obscuring volume (smoke grenade, fog burst).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmokeCloud {
    pub area: Circle,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RoomKind {
    #[default]
    Generic,
    Corridor,
    Hub,
    Storage,
    Lab,
    Exit,
}

/// Axis-aligned room rectangle, bounds inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: u32,
    pub kind: RoomKind,
    pub min: GridPosition,
    pub max: GridPosition,
}

impl Room {
    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    pub fn center(&self) -> GridPosition {
        GridPosition::new((self.min.x + self.max.x) / 2, (self.min.y + self.max.y) / 2)
    }

    pub fn tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| GridPosition::new(x, y)))
    }

    pub fn area(&self) -> u32 {
        ((self.max.x - self.min.x + 1).max(0) * (self.max.y - self.min.y + 1).max(0)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_through_circle_is_blocked() {
        let smoke = Circle::around(GridPosition::new(5, 0), 1.0);
        assert!(smoke.intersects_segment(GridPosition::new(0, 0), GridPosition::new(10, 0)));
        assert!(!smoke.intersects_segment(GridPosition::new(0, 4), GridPosition::new(10, 4)));
    }

    #[test]
    fn segment_ending_before_circle_is_clear() {
        let smoke = Circle::around(GridPosition::new(8, 0), 1.0);
        assert!(!smoke.intersects_segment(GridPosition::new(0, 0), GridPosition::new(5, 0)));
    }

    #[test]
    fn room_center_and_contains() {
        let room = Room {
            id: 1,
            kind: RoomKind::Hub,
            min: GridPosition::new(2, 2),
            max: GridPosition::new(6, 4),
        };
        assert_eq!(room.center(), GridPosition::new(4, 3));
        assert!(room.contains(GridPosition::new(6, 4)));
        assert!(!room.contains(GridPosition::new(7, 4)));
        assert_eq!(room.area(), 15);
        assert_eq!(room.tiles().count(), 15);
    }
}
