//! Per-tick read-only views of the player and monsters.
//!
//! The host owns the actual entities. Brains only see these snapshots, built
//! fresh each frame, so the AI never holds references across ticks.
use std::fmt;

use crate::grid::{GridPosition, WorldPoint};

/// Stable identifier of a monster for the lifetime of its brain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterId(pub u32);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Transient perception debuffs applied to a monster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterStatus {
    /// Sees nothing at all while set.
    pub blinded: bool,
    /// Vision range is scaled by the jam multiplier while set.
    pub perception_jammed: bool,
}

/// Snapshot of one monster as the host sees it this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterView {
    pub id: MonsterId,
    pub grid: GridPosition,
    pub position: WorldPoint,
    /// Facing in radians, `atan2(dx, dz)` convention.
    pub yaw: f64,
    pub health: f64,
    pub max_health: f64,
    pub status: MonsterStatus,
}

impl MonsterView {
    pub fn new(id: MonsterId, grid: GridPosition, tile_size: f64) -> Self {
        Self {
            id,
            grid,
            position: grid.to_world(tile_size),
            yaw: 0.0,
            health: 100.0,
            max_health: 100.0,
            status: MonsterStatus::default(),
        }
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_health(mut self, health: f64, max_health: f64) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn with_status(mut self, status: MonsterStatus) -> Self {
        self.status = status;
        self
    }

    /// Health as a ratio in `[0, 1]`; monsters without a max count as healthy.
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0.0 {
            1.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }
}

/// Snapshot of the player this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub grid: GridPosition,
    pub position: WorldPoint,
    pub yaw: f64,
    /// Tiles per second, when the host tracks it.
    pub velocity: Option<(f64, f64)>,
    pub health: f64,
    pub max_health: f64,
}

impl PlayerView {
    pub fn new(grid: GridPosition, tile_size: f64) -> Self {
        Self {
            grid,
            position: grid.to_world(tile_size),
            yaw: 0.0,
            velocity: None,
            health: 100.0,
            max_health: 100.0,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Some((vx, vy));
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}
