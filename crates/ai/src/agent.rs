//! One monster: a brain plus its attached modules.

use std::sync::Arc;

use maze_core::{AgentProfile, AiConfig, BrainCommand, FireCommand, GridPosition, MonsterId};

use crate::brain::{Brain, BrainCore, BrainState, build_brain};
use crate::context::TickContext;
use crate::modules::{BrainModules, Selection};
use crate::squad::FireRequest;

/// A brain and the optional modules composed onto it.
#[derive(Debug)]
pub struct Agent {
    pub brain: Box<dyn Brain>,
    pub modules: BrainModules,
}

impl Agent {
    /// Builds the profile's brain with no modules attached.
    ///
    /// Use [`crate::modules::apply_brain_modules`] to attach them.
    pub fn new(id: MonsterId, profile: AgentProfile, config: Arc<AiConfig>, home: GridPosition) -> Self {
        Self {
            brain: build_brain(BrainCore::new(id, profile, config, home)),
            modules: BrainModules::default(),
        }
    }

    pub fn id(&self) -> MonsterId {
        self.brain.core().id()
    }

    pub fn state(&self) -> BrainState {
        self.brain.state()
    }

    /// Runs one decision step and returns the movement command.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> BrainCommand {
        self.brain.update_state(ctx, &mut self.modules);

        let snapshot = self.brain.snapshot(ctx);
        if let Some(squad) = self.modules.squad.as_mut() {
            squad.observe(&snapshot, ctx);
        }

        let mut command = match self.modules.select(&snapshot, ctx) {
            Selection::Hold { look_at } => self.brain.core_mut().hold(ctx, look_at),
            Selection::Redirect(goal) => self.drive(ctx, Some(goal)),
            Selection::Pass => {
                let goal = self.brain.pick_target(ctx);
                self.drive(ctx, goal)
            }
        };

        if command.move_dir.is_zero() && command.look_yaw == 0.0 {
            command.look_yaw = self.brain.idle_yaw(ctx);
        }
        command.fire = self.fire(ctx);
        command
    }

    fn drive(&mut self, ctx: &TickContext<'_>, goal: Option<GridPosition>) -> BrainCommand {
        let chasing = self.brain.state() == BrainState::Chase;
        let sprint = goal.is_some_and(|g| self.brain.wants_sprint(ctx, g));
        self.brain.core_mut().steer(ctx, goal, chasing, sprint)
    }

    /// Ranged attack gating: ranged profile, chasing a visible player within
    /// range, weapon cooled down, and (for squad members) a fire grant.
    fn fire(&mut self, ctx: &mut TickContext<'_>) -> Option<FireCommand> {
        let core = self.brain.core();
        if self.brain.state() != BrainState::Chase || !core.sees_player() {
            return None;
        }
        let target = ctx.player_grid()?;
        let now = ctx.now;
        if ctx.monster.grid.manhattan(target) > core.brain_config().fire_range || !core.fire_ready(now) {
            return None;
        }

        if let Some(squad) = self.modules.squad.as_ref().map(|m| m.squad()) {
            let config = ctx.squad.config();
            let request = FireRequest {
                role: core.role(),
                max_shooters: config.max_shooters,
                grant_seconds: config.fire_grant_seconds,
            };
            if !ctx.squad.allow_ranged_fire(squad, core.id(), now, request) {
                return None;
            }
        }

        self.brain.core_mut().mark_fired(now);
        Some(FireCommand { target })
    }
}
