//! Map-wide explorer.

use maze_core::{BrainKind, GridPosition};

use super::Brain;
use super::core::BrainCore;
use super::fsm::BrainState;
use super::pursuit::Pursuit;
use super::stimulus::StimulusTracker;
use crate::context::TickContext;
use crate::modules::BrainModules;

/// Wanders the whole map towards novel tiles, chases on sight and sweeps
/// briefly around the last known position once the player is lost.
#[derive(Clone, Debug)]
pub struct RoamingBrain {
    core: BrainCore,
    pursuit: Pursuit,
    stimuli: StimulusTracker,
    patrol_target: Option<GridPosition>,
}

impl RoamingBrain {
    pub fn new(core: BrainCore) -> Self {
        let pursuit = Pursuit::new(BrainState::Patrol, core.config().search.clone());
        Self {
            core,
            pursuit,
            stimuli: StimulusTracker::default(),
            patrol_target: None,
        }
    }
}

impl Brain for RoamingBrain {
    fn kind(&self) -> BrainKind {
        BrainKind::Roaming
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

        if self.core.sees_player() && !self.pursuit.is(BrainState::Chase) {
            if !ctx.chase_suppressed {
                self.pursuit.enter(BrainState::Chase, now, true, brain, modules);
            } else if !self.pursuit.is(BrainState::Search) {
                let origin = self.core.last_known_player().unwrap_or(here);
                self.pursuit
                    .begin_search(origin, brain.suppressed_search_seconds, now, brain, modules);
            }
            return;
        }

        let fresh = self.stimuli.take_fresh(&self.core);
        let role = self.core.role();
        match self.pursuit.state() {
            BrainState::Patrol | BrainState::Search => {
                if let Some(stimulus) = fresh.filter(|s| s.investigates(brain, role)) {
                    if !self.pursuit.in_chase_cooldown(now, brain)
                        && self.pursuit.investigate(&self.core, &stimulus, now, modules)
                    {
                        return;
                    }
                }
                if self.pursuit.search_expired(now) {
                    self.pursuit.enter(BrainState::Patrol, now, false, brain, modules);
                    self.patrol_target = None;
                }
            }
            BrainState::Investigate => {
                if let Some(stimulus) = fresh {
                    if stimulus.escalates(brain) && !ctx.chase_suppressed {
                        self.pursuit.escalate(&mut self.core, &stimulus, now, modules);
                        return;
                    }
                    if stimulus.investigates(brain, role) {
                        self.pursuit.investigate(&self.core, &stimulus, now, modules);
                    }
                }
                if self.pursuit.investigation_finished(here, now, modules) {
                    self.pursuit.enter(BrainState::Patrol, now, false, brain, modules);
                }
            }
            BrainState::Chase => {
                if self.pursuit.chase_lost(&self.core, now) {
                    let origin = self.core.last_known_player().unwrap_or(here);
                    self.pursuit
                        .begin_search(origin, brain.search_timeout_seconds, now, brain, modules);
                }
            }
            BrainState::Return | BrainState::Hold => {
                self.pursuit.enter(BrainState::Patrol, now, true, brain, modules);
            }
        }
    }

    fn pick_target(&mut self, ctx: &TickContext<'_>) -> Option<GridPosition> {
        match self.pursuit.state() {
            BrainState::Patrol => {
                let here = ctx.monster.grid;
                if self.patrol_target.is_none_or(|t| here.manhattan(t) <= 1) {
                    self.patrol_target = self.core.pick_patrol_target(ctx, None);
                }
                self.patrol_target
            }
            BrainState::Investigate => self.pursuit.investigate_target(),
            BrainState::Chase => self.core.last_known_player(),
            BrainState::Search => self.pursuit.search_target(&self.core, ctx),
            BrainState::Return | BrainState::Hold => None,
        }
    }
}
