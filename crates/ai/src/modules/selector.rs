//! Target selection chain.

use maze_core::GridPosition;

use super::investigation::InvestigationModule;
use crate::brain::BrainState;
use crate::context::{AgentSnapshot, TickContext};
use crate::memory::InvestigationStatus;
use crate::squad::{SquadDirective, SquadModule};
use crate::tactics::{FlankCoverTactics, TacticsInput};

/// Outcome of one selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Navigate to this tile instead of the brain's own target.
    Redirect(GridPosition),
    /// Stand still, optionally facing a tile.
    Hold { look_at: Option<GridPosition> },
    /// No opinion; ask the next selector.
    Pass,
}

impl Selection {
    pub fn is_pass(&self) -> bool {
        matches!(self, Selection::Pass)
    }
}

impl From<SquadDirective> for Selection {
    fn from(directive: SquadDirective) -> Self {
        if directive.hold_position {
            Selection::Hold {
                look_at: directive.look_at,
            }
        } else {
            Selection::Redirect(directive.target)
        }
    }
}

/// Optional capability consulted before the brain picks its own target.
pub trait TargetSelector {
    fn name(&self) -> &'static str;

    fn select(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) -> Selection;
}

impl SquadModule {
    /// Squad selection, delegating hiding to `tactics` when attached.
    pub fn select_with(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &mut TickContext<'_>,
        tactics: Option<&mut FlankCoverTactics>,
    ) -> Selection {
        if matches!(agent.state, BrainState::Return | BrainState::Hold) {
            return Selection::Pass;
        }
        self.get_directive(agent, ctx, tactics)
            .map_or(Selection::Pass, Selection::from)
    }
}

impl TargetSelector for SquadModule {
    fn name(&self) -> &'static str {
        "squad"
    }

    fn select(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) -> Selection {
        self.select_with(agent, ctx, None)
    }
}

impl TargetSelector for InvestigationModule {
    fn name(&self) -> &'static str {
        "investigation"
    }

    fn select(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) -> Selection {
        if !self.is_active() {
            return Selection::Pass;
        }
        let tick = self.tick(ctx.now, agent.grid, ctx.world);
        match (tick.status, tick.target) {
            (InvestigationStatus::Travel | InvestigationStatus::Investigate, Some(target)) => {
                Selection::Redirect(target)
            }
            (InvestigationStatus::Pause, _) => Selection::Hold { look_at: None },
            _ => Selection::Pass,
        }
    }
}

impl TargetSelector for FlankCoverTactics {
    fn name(&self) -> &'static str {
        "tactics"
    }

    fn select(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) -> Selection {
        if agent.state != BrainState::Chase {
            return Selection::Pass;
        }
        let Some(player) = agent.last_known_player else {
            return Selection::Pass;
        };
        let velocity = ctx
            .player
            .filter(|_| agent.sees_player)
            .and_then(|p| p.velocity);

        let directive = self.tick(&TacticsInput {
            now: ctx.now,
            monster: agent.grid,
            player,
            player_velocity: velocity,
            role: agent.role,
            health_ratio: agent.health_ratio,
            world: ctx.world,
            planner: ctx.planner,
            allow_diagonals: true,
        });
        match directive.target {
            Some(_) if directive.hold_position => Selection::Hold {
                look_at: Some(player),
            },
            Some(target) => Selection::Redirect(target),
            None => Selection::Pass,
        }
    }
}
