//! Per-tick output of a brain.
//!
//! [`BrainCommand`] is the only thing the movement/animation layer consumes,
//! so its shape is kept stable.

use crate::grid::{GridPosition, MoveVector};

/// Request to fire a ranged attack this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireCommand {
    pub target: GridPosition,
}

/// Movement command consumed by the physical layer.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrainCommand {
    /// Unit direction on the ground plane, or zero to stand still.
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub move_dir: MoveVector,
    /// Yaw change in radians, wrapped into `(-π, π]`.
    pub look_yaw: f64,
    pub sprint: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub fire: Option<FireCommand>,
}

impl BrainCommand {
    /// Stand still, keep facing.
    pub const IDLE: Self = Self {
        move_dir: MoveVector::ZERO,
        look_yaw: 0.0,
        sprint: false,
        fire: None,
    };

    pub fn is_idle(&self) -> bool {
        self.move_dir.is_zero() && self.look_yaw == 0.0 && !self.sprint && self.fire.is_none()
    }
}
