//! Post guard with a leash.

use maze_core::{BrainKind, GridPosition};

use super::Brain;
use super::core::BrainCore;
use super::fsm::BrainState;
use super::pursuit::Pursuit;
use super::stimulus::StimulusTracker;
use crate::context::TickContext;
use crate::modules::BrainModules;

/// Stands on its home tile sweeping its facing. Chases and investigates only
/// while the target stays within `leash_radius` of home, then walks back.
#[derive(Clone, Debug)]
pub struct SentryBrain {
    core: BrainCore,
    pursuit: Pursuit,
    stimuli: StimulusTracker,
}

impl SentryBrain {
    pub fn new(core: BrainCore) -> Self {
        let pursuit = Pursuit::new(BrainState::Hold, core.config().search.clone());
        Self {
            core,
            pursuit,
            stimuli: StimulusTracker::default(),
        }
    }

    fn within_leash(&self, grid: GridPosition) -> bool {
        self.core.home().manhattan(grid) <= self.core.brain_config().leash_radius
    }
}

impl Brain for SentryBrain {
    fn kind(&self) -> BrainKind {
        BrainKind::Sentry
    }

    fn state(&self) -> BrainState {
        self.pursuit.state()
    }

    fn core(&self) -> &BrainCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BrainCore {
        &mut self.core
    }

    fn update_state(&mut self, ctx: &TickContext<'_>, modules: &mut BrainModules) {
        self.core.observe(ctx);
        let config = self.core.shared_config();
        let brain = &config.brain;
        let now = ctx.now;
        let here = ctx.monster.grid;

        let leashed_sighting = self.core.sees_player()
            && self
                .core
                .last_known_player()
                .is_some_and(|p| self.within_leash(p));
        if leashed_sighting && !ctx.chase_suppressed && !self.pursuit.is(BrainState::Chase) {
            self.pursuit.enter(BrainState::Chase, now, true, brain, modules);
            return;
        }

        let fresh = self.stimuli.take_fresh(&self.core);
        let role = self.core.role();
        match self.pursuit.state() {
            BrainState::Hold | BrainState::Return => {
                if self.pursuit.is(BrainState::Return) && here.manhattan(self.core.home()) == 0 {
                    self.pursuit.enter(BrainState::Hold, now, false, brain, modules);
                }
                let leashed = fresh
                    .filter(|s| s.investigates(brain, role) && self.within_leash(s.grid));
                if let Some(stimulus) = leashed {
                    if !self.pursuit.in_chase_cooldown(now, brain) {
                        self.pursuit.investigate(&self.core, &stimulus, now, modules);
                    }
                }
            }
            BrainState::Investigate => {
                if self.pursuit.investigation_finished(here, now, modules) {
                    self.pursuit.enter(BrainState::Return, now, false, brain, modules);
                }
            }
            BrainState::Chase => {
                let escaped = self
                    .core
                    .last_known_player()
                    .is_none_or(|p| !self.within_leash(p));
                if escaped || self.pursuit.chase_lost(&self.core, now) {
                    tracing::debug!("{}: target left the leash, returning", self.core.id());
                    self.pursuit.enter(BrainState::Return, now, true, brain, modules);
                }
            }
            BrainState::Patrol | BrainState::Search => {
                self.pursuit.enter(BrainState::Return, now, true, brain, modules);
            }
        }
    }

    fn pick_target(&mut self, _ctx: &TickContext<'_>) -> Option<GridPosition> {
        match self.pursuit.state() {
            BrainState::Investigate => self.pursuit.investigate_target(),
            BrainState::Chase => self.core.last_known_player(),
            BrainState::Return => Some(self.core.home()),
            BrainState::Hold | BrainState::Patrol | BrainState::Search => None,
        }
    }

    fn idle_yaw(&mut self, ctx: &TickContext<'_>) -> f64 {
        if self.pursuit.is(BrainState::Hold) {
            self.core.brain_config().scan_rate * ctx.dt.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::SquadCoordinator;
    use maze_content::GridWorld;
    use maze_core::{AgentProfile, AiConfig, MonsterId, MonsterView, PlayerView, Role};
    use std::sync::Arc;

    fn sentry() -> SentryBrain {
        SentryBrain::new(BrainCore::new(
            MonsterId(3),
            AgentProfile::new(BrainKind::Sentry, Role::Default).with_fov(360.0),
            Arc::new(AiConfig::default()),
            GridPosition::new(10, 10),
        ))
    }

    #[test]
    fn scans_while_holding() {
        let world = GridWorld::open(20, 20);
        let monster = MonsterView::new(MonsterId(3), GridPosition::new(10, 10), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let mut modules = BrainModules::default();
        let mut brain = sentry();
        let ctx = TickContext {
            now: 0.0,
            dt: 0.5,
            world: &world,
            planner: Some(&world),
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        brain.update_state(&ctx, &mut modules);
        assert_eq!(brain.state(), BrainState::Hold);
        assert_eq!(brain.pick_target(&ctx), None);
        assert!(brain.idle_yaw(&ctx) > 0.0);
    }

    #[test]
    fn chases_only_inside_leash() {
        let world = GridWorld::open(20, 20);
        let monster = MonsterView::new(MonsterId(3), GridPosition::new(10, 10), 2.0);
        let near = PlayerView::new(GridPosition::new(10, 14), 2.0);
        let far = PlayerView::new(GridPosition::new(10, 19), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let mut modules = BrainModules::default();
        let mut brain = sentry();

        let mut ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            world: &world,
            planner: Some(&world),
            player: Some(&far),
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        brain.update_state(&ctx, &mut modules);
        assert_eq!(brain.state(), BrainState::Hold);

        ctx.now = 1.0;
        ctx.player = Some(&near);
        brain.update_state(&ctx, &mut modules);
        assert_eq!(brain.state(), BrainState::Chase);

        ctx.now = 2.0;
        ctx.player = Some(&far);
        brain.update_state(&ctx, &mut modules);
        assert_eq!(brain.state(), BrainState::Return);
        assert_eq!(brain.pick_target(&ctx), Some(GridPosition::new(10, 10)));
    }
}
