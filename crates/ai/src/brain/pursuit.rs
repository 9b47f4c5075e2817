//! State machine bookkeeping shared by the brain variants.
//!
//! [`Pursuit`] owns the [`StateMachine`] together with everything tied to a
//! single state: the stimulus being investigated, the search sweep and the
//! chase cooldown. Every state change goes through [`Pursuit::enter`] so
//! module resets happen in exactly one place.

use maze_core::{BrainConfig, GridPosition, SearchConfig};

use super::core::BrainCore;
use super::fsm::{BrainState, StateMachine};
use super::stimulus::Stimulus;
use crate::context::TickContext;
use crate::memory::{SearchInput, SearchModule};
use crate::modules::BrainModules;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveInvestigation {
    target: GridPosition,
    deadline: f64,
    /// The attached investigation module accepted the stimulus and decides
    /// when it is done.
    module_driven: bool,
}

#[derive(Clone, Debug)]
pub struct Pursuit {
    fsm: StateMachine,
    investigation: Option<ActiveInvestigation>,
    search: SearchModule,
    search_origin: Option<GridPosition>,
    search_limit: f64,
    chase_ended_at: Option<f64>,
}

impl Pursuit {
    pub fn new(initial: BrainState, search: SearchConfig) -> Self {
        Self {
            fsm: StateMachine::new(initial, 0.0),
            investigation: None,
            search: SearchModule::new(search),
            search_origin: None,
            search_limit: 0.0,
            chase_ended_at: None,
        }
    }

    pub fn state(&self) -> BrainState {
        self.fsm.state()
    }

    pub fn is(&self, state: BrainState) -> bool {
        self.fsm.is(state)
    }

    pub fn fsm(&self) -> &StateMachine {
        &self.fsm
    }

    /// Changes state and resets whatever belonged to the old one.
    ///
    /// `force` ignores the state lock; direct sightings and escalations use
    /// it. Returns true when the state changed.
    pub fn enter(
        &mut self,
        to: BrainState,
        now: f64,
        force: bool,
        config: &BrainConfig,
        modules: &mut BrainModules,
    ) -> bool {
        let from = self.fsm.state();
        let lock = config.state_lock_seconds;
        let changed = if force {
            self.fsm.force(to, now, lock)
        } else {
            self.fsm.transition(to, now, lock)
        };
        if !changed {
            return false;
        }

        modules.on_transition(from, to);
        if from == BrainState::Chase {
            self.chase_ended_at = Some(now);
        }
        if from == BrainState::Investigate {
            self.investigation = None;
        }
        if to == BrainState::Search {
            self.search.reset();
        }
        true
    }

    // ========================================================================
    // Chase
    // ========================================================================

    /// Recently gave up a chase; stimuli do not start investigations yet.
    pub fn in_chase_cooldown(&self, now: f64, config: &BrainConfig) -> bool {
        self.chase_ended_at
            .is_some_and(|t| now - t < config.chase_cooldown_seconds)
    }

    /// The player has been out of sight longer than the confidence-scaled
    /// chase timeout.
    pub fn chase_lost(&self, core: &BrainCore, now: f64) -> bool {
        if core.sees_player() {
            return false;
        }
        let since = core.last_seen_at().unwrap_or(self.fsm.entered_at());
        now - since > core.confidence().chase_timeout(core.brain_config())
    }

    /// Turns an escalated stimulus into a chase towards its origin.
    pub fn escalate(
        &mut self,
        core: &mut BrainCore,
        stimulus: &Stimulus,
        now: f64,
        modules: &mut BrainModules,
    ) -> bool {
        core.set_last_known_player(stimulus.grid);
        core.confidence_mut().raise_to(0.5);
        let config = core.shared_config();
        self.enter(BrainState::Chase, now, true, &config.brain, modules)
    }

    // ========================================================================
    // Investigation
    // ========================================================================

    /// Enters (or retargets) an investigation of `stimulus`.
    pub fn investigate(
        &mut self,
        core: &BrainCore,
        stimulus: &Stimulus,
        now: f64,
        modules: &mut BrainModules,
    ) -> bool {
        let config = core.config();
        if !self.fsm.is(BrainState::Investigate)
            && !self.enter(BrainState::Investigate, now, false, &config.brain, modules)
        {
            return false;
        }

        let accepted = modules
            .investigation
            .as_mut()
            .map(|m| m.begin(stimulus.grid, now, stimulus.priority, None));
        if accepted == Some(false) && self.investigation.is_some() {
            return false;
        }
        let inv = &config.investigation;
        self.investigation = Some(ActiveInvestigation {
            target: stimulus.grid,
            deadline: now + inv.duration_seconds + inv.pause_seconds,
            module_driven: accepted == Some(true),
        });
        true
    }

    pub fn investigate_target(&self) -> Option<GridPosition> {
        self.investigation.map(|i| i.target)
    }

    /// Done when the module says so, when the agent arrived (without a
    /// module), or when the safety deadline passed.
    pub fn investigation_finished(&self, here: GridPosition, now: f64, modules: &BrainModules) -> bool {
        let Some(inv) = self.investigation else {
            return true;
        };
        if now > inv.deadline {
            return true;
        }
        if inv.module_driven {
            modules
                .investigation
                .as_ref()
                .is_none_or(|m| !m.is_active())
        } else {
            here.manhattan(inv.target) <= 1
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Starts a local sweep around `origin` lasting at most `limit` seconds.
    pub fn begin_search(
        &mut self,
        origin: GridPosition,
        limit: f64,
        now: f64,
        config: &BrainConfig,
        modules: &mut BrainModules,
    ) -> bool {
        if !self.enter(BrainState::Search, now, true, config, modules) {
            return false;
        }
        self.search_origin = Some(origin);
        self.search_limit = limit;
        true
    }

    pub fn search_expired(&self, now: f64) -> bool {
        self.fsm.is(BrainState::Search) && self.fsm.time_in_state(now) > self.search_limit
    }

    pub fn search_target(&mut self, core: &BrainCore, ctx: &TickContext<'_>) -> Option<GridPosition> {
        let origin = self.search_origin.unwrap_or(ctx.monster.grid);
        self.search.tick(&SearchInput {
            now: ctx.now,
            monster: ctx.monster.grid,
            origin,
            radius: None,
            preferred_dir: core.player_dir(),
            world: ctx.world,
            visited: core.visited(),
            visit_ttl: core.visited().ttl(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::stimulus::Sense;
    use maze_core::{AgentProfile, AiConfig, BrainKind, MonsterId, Role};
    use std::sync::Arc;

    fn core() -> BrainCore {
        BrainCore::new(
            MonsterId(1),
            AgentProfile::new(BrainKind::RoomHunter, Role::Default),
            Arc::new(AiConfig::default()),
            GridPosition::ORIGIN,
        )
    }

    fn noise(grid: GridPosition, strength: f64) -> Stimulus {
        Stimulus {
            sense: Sense::Hearing,
            grid,
            strength,
            priority: 1,
            at: 0.0,
        }
    }

    #[test]
    fn leaving_chase_starts_cooldown() {
        let config = BrainConfig::default();
        let mut modules = BrainModules::default();
        let mut pursuit = Pursuit::new(BrainState::Patrol, SearchConfig::default());
        assert!(pursuit.enter(BrainState::Chase, 0.0, true, &config, &mut modules));
        assert!(!pursuit.in_chase_cooldown(1.0, &config));
        assert!(pursuit.begin_search(GridPosition::ORIGIN, 5.0, 1.0, &config, &mut modules));
        assert!(pursuit.in_chase_cooldown(1.5, &config));
        assert!(!pursuit.in_chase_cooldown(1.0 + config.chase_cooldown_seconds, &config));
    }

    #[test]
    fn investigation_without_module_ends_on_arrival() {
        let core = core();
        let mut modules = BrainModules::default();
        let mut pursuit = Pursuit::new(BrainState::Patrol, SearchConfig::default());
        let target = GridPosition::new(5, 5);
        assert!(pursuit.investigate(&core, &noise(target, 0.6), 0.0, &mut modules));
        assert_eq!(pursuit.state(), BrainState::Investigate);
        assert_eq!(pursuit.investigate_target(), Some(target));
        assert!(!pursuit.investigation_finished(GridPosition::ORIGIN, 1.0, &modules));
        assert!(pursuit.investigation_finished(GridPosition::new(5, 4), 1.0, &modules));
        assert!(pursuit.investigation_finished(GridPosition::ORIGIN, 100.0, &modules));
    }

    #[test]
    fn search_expires_after_limit() {
        let config = BrainConfig::default();
        let mut modules = BrainModules::default();
        let mut pursuit = Pursuit::new(BrainState::Chase, SearchConfig::default());
        pursuit.begin_search(GridPosition::ORIGIN, 3.0, 10.0, &config, &mut modules);
        assert!(!pursuit.search_expired(12.0));
        assert!(pursuit.search_expired(13.5));
    }

    #[test]
    fn state_lock_blocks_investigation() {
        let core = core();
        let config = BrainConfig::default();
        let mut modules = BrainModules::default();
        let mut pursuit = Pursuit::new(BrainState::Patrol, SearchConfig::default());
        pursuit.enter(BrainState::Return, 0.0, false, &config, &mut modules);
        assert!(!pursuit.investigate(&core, &noise(GridPosition::new(3, 3), 0.6), 0.1, &mut modules));
        assert_eq!(pursuit.state(), BrainState::Return);
    }
}
