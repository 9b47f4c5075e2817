//! Per-agent transient memory.
//!
//! - [`StimulusMemory`]: single-slot last noise / last scent
//! - [`VisitedTiles`]: TTL-pruned visit log driving novelty scores
//! - [`InvestigateModule`] / [`NoiseInvestigationModule`]: travel-to-stimulus
//!   lifecycles, wrapped by [`Investigation`]
//! - [`SearchModule`]: deterministic junction-biased sweep

mod investigate;
mod noise_investigation;
mod search;
mod stimulus;
mod visited;

pub use investigate::InvestigateModule;
pub use noise_investigation::NoiseInvestigationModule;
pub use search::{SearchInput, SearchModule, SearchPlan};
pub use stimulus::StimulusMemory;
pub use visited::{UNVISITED_NOVELTY, VisitedTiles};

use maze_core::{GridPosition, InvestigationConfig, WorldOracle};
use rand::RngCore;

/// Status reported by an investigation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InvestigationStatus {
    Idle,
    /// Walking to the stimulus origin.
    Travel,
    /// Sweeping around the origin (search-on-arrival variant).
    Investigate,
    /// Looking around at the origin.
    Pause,
    Done,
    Disabled,
}

/// Result of one investigation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvestigationTick {
    pub status: InvestigationStatus,
    pub target: Option<GridPosition>,
}

impl InvestigationTick {
    pub const fn new(status: InvestigationStatus, target: Option<GridPosition>) -> Self {
        Self { status, target }
    }

    pub const fn idle() -> Self {
        Self::new(InvestigationStatus::Idle, None)
    }

    /// Whether the investigation still wants to steer the agent.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            InvestigationStatus::Travel | InvestigationStatus::Investigate | InvestigationStatus::Pause
        )
    }
}

/// Investigation capability attached to a brain.
#[derive(Clone, Debug)]
pub enum Investigation {
    Pause(InvestigateModule),
    Sweep(NoiseInvestigationModule),
}

impl Investigation {
    /// Builds the variant selected by `config.sweep_on_arrival`.
    pub fn from_config(config: &InvestigationConfig) -> Self {
        if config.sweep_on_arrival {
            Self::Sweep(NoiseInvestigationModule::new(config.clone()))
        } else {
            Self::Pause(InvestigateModule::new(config.clone()))
        }
    }

    pub fn begin(
        &mut self,
        target: GridPosition,
        now: f64,
        priority: u8,
        duration: Option<f64>,
    ) -> bool {
        match self {
            Self::Pause(m) => m.begin(target, now, priority, duration),
            Self::Sweep(m) => m.begin(target, now, priority, duration),
        }
    }

    pub fn tick(
        &mut self,
        now: f64,
        monster: GridPosition,
        world: &dyn WorldOracle,
        rng: &mut dyn RngCore,
    ) -> InvestigationTick {
        match self {
            Self::Pause(m) => m.tick(now, monster),
            Self::Sweep(m) => m.tick(now, monster, world, rng),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Pause(m) => m.reset(),
            Self::Sweep(m) => m.reset(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Self::Pause(m) => m.set_enabled(enabled),
            Self::Sweep(m) => m.set_enabled(enabled),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Pause(m) => m.is_active(),
            Self::Sweep(m) => m.is_active(),
        }
    }

    pub fn origin(&self) -> Option<GridPosition> {
        match self {
            Self::Pause(m) => m.origin(),
            Self::Sweep(m) => m.origin(),
        }
    }

    pub fn last(&self) -> InvestigationTick {
        match self {
            Self::Pause(m) => m.last(),
            Self::Sweep(m) => m.last(),
        }
    }
}
