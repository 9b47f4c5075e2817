//! Brains: the per-agent decision makers.
//!
//! Every variant shares a [`BrainCore`] for perception, memory and
//! navigation, and adds its own state machine on top through the [`Brain`]
//! trait. Optional capabilities (squad, investigation, tactics) are not part
//! of the brain; they live in [`crate::modules::BrainModules`] and are
//! consulted by the agent before the brain's own target pick.

pub mod confidence;
pub mod core;
pub mod fsm;
pub mod hunter;
pub mod pursuit;
pub mod roaming;
pub mod sentry;
pub mod stimulus;

use std::fmt;

use maze_core::{BrainKind, GridPosition, NoiseEvent, NoiseKind, ScentEvent};

pub use self::confidence::TargetConfidence;
pub use self::core::BrainCore;
pub use self::fsm::{BrainState, StateMachine};
pub use self::hunter::RoomHunterBrain;
pub use self::pursuit::Pursuit;
pub use self::roaming::RoamingBrain;
pub use self::sentry::SentryBrain;
pub use self::stimulus::{Sense, Stimulus, StimulusTracker};

use crate::context::{AgentSnapshot, TickContext};
use crate::modules::BrainModules;

/// Decision maker driving one monster.
///
/// # Tick order
///
/// The agent calls [`Brain::update_state`] first (perception and state
/// transitions), then asks the attached modules for a target, and only falls
/// back to [`Brain::pick_target`] when every module passes.
pub trait Brain: Send + fmt::Debug {
    fn kind(&self) -> BrainKind;

    fn state(&self) -> BrainState;

    fn core(&self) -> &BrainCore;

    fn core_mut(&mut self) -> &mut BrainCore;

    /// Refreshes perception and runs the state machine.
    fn update_state(&mut self, ctx: &TickContext<'_>, modules: &mut BrainModules);

    /// The brain's own navigation goal for the current state.
    fn pick_target(&mut self, ctx: &TickContext<'_>) -> Option<GridPosition>;

    /// Read-only view handed to target selectors.
    fn snapshot(&self, ctx: &TickContext<'_>) -> AgentSnapshot {
        let core = self.core();
        AgentSnapshot {
            id: core.id(),
            kind: self.kind(),
            role: core.role(),
            squad: core.profile().squad,
            state: self.state(),
            grid: ctx.monster.grid,
            health_ratio: core.health_ratio(),
            sees_player: core.sees_player(),
            last_known_player: core.last_known_player(),
            confidence: core.confidence().value(),
            target: core.current_target(),
            noise: core.memory().noise().copied(),
            scent: core.memory().scent().copied(),
        }
    }

    /// Stores a heard noise. Returns true when it replaced the memory slot.
    fn hear(&mut self, noise: NoiseEvent) -> bool {
        self.core_mut().memory_mut().hear(noise)
    }

    /// Stores a smelled scent. Returns true when it replaced the memory slot.
    fn smell(&mut self, scent: ScentEvent) -> bool {
        self.core_mut().memory_mut().smell(scent)
    }

    /// Being hit with a known source counts as the loudest possible noise.
    fn on_damaged(&mut self, now: f64, source: Option<GridPosition>) {
        if let Some(grid) = source {
            let alarm = NoiseEvent::new(NoiseKind::Alert, grid, now)
                .with_priority(u8::MAX)
                .with_strength(1.0);
            self.hear(alarm);
        }
    }

    /// Sprint while chasing and the goal is still far enough away.
    fn wants_sprint(&self, ctx: &TickContext<'_>, goal: GridPosition) -> bool {
        if self.state() != BrainState::Chase {
            return false;
        }
        let core = self.core();
        let distance = f64::from(ctx.monster.grid.manhattan(goal));
        distance >= core.confidence().sprint_distance(core.brain_config())
    }

    /// Facing change applied while the agent has nothing to walk to.
    fn idle_yaw(&mut self, _ctx: &TickContext<'_>) -> f64 {
        0.0
    }
}

/// Builds the brain variant named by the core's profile.
pub fn build_brain(core: BrainCore) -> Box<dyn Brain> {
    match core.profile().brain {
        BrainKind::Roaming => Box::new(RoamingBrain::new(core)),
        BrainKind::RoomHunter => Box::new(RoomHunterBrain::new(core)),
        BrainKind::Sentry => Box::new(SentryBrain::new(core)),
    }
}
