//! Room-bound hunter with the full patrol/investigate/chase/search/return
//! state machine.

use maze_core::{BrainKind, GridPosition, Room};

use super::Brain;
use super::core::BrainCore;
use super::fsm::BrainState;
use super::pursuit::Pursuit;
use super::stimulus::StimulusTracker;
use crate::context::TickContext;
use crate::modules::BrainModules;

/// Patrols one room at a time and hops rooms by novelty.
///
/// ```text
/// Patrol ──stimulus──▶ Investigate ──escalation──▶ Chase
///   ▲                      │                        │ lost past timeout
///   │                    done                       ▼
///   └──── home ◀── Return ◀──── timeout ──────── Search
/// ```
///
/// A sighting outside `Chase` forces a chase unless chase fairness is
/// suppressing this agent, in which case it sweeps locally for a short while.
#[derive(Clone, Debug)]
pub struct RoomHunterBrain {
    core: BrainCore,
    pursuit: Pursuit,
    stimuli: StimulusTracker,
    patrol_room: Option<Room>,
    room_entered_at: f64,
    patrol_target: Option<GridPosition>,
}

impl RoomHunterBrain {
    pub fn new(core: BrainCore) -> Self {
        let pursuit = Pursuit::new(BrainState::Patrol, core.config().search.clone());
        Self {
            core,
            pursuit,
            stimuli: StimulusTracker::default(),
            patrol_room: None,
            room_entered_at: 0.0,
            patrol_target: None,
        }
    }

    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }

    pub fn patrol_room(&self) -> Option<&Room> {
        self.patrol_room.as_ref()
    }

    /// Keeps the patrol room current, hopping to the best-scoring other room
    /// once the hop interval elapsed.
    fn refresh_patrol_room(&mut self, ctx: &TickContext<'_>) {
        let now = ctx.now;
        let hop_seconds = self.core.brain_config().room_hop_seconds;
        let next = match &self.patrol_room {
            None => ctx
                .world
                .room_at(self.core.home())
                .cloned()
                .or_else(|| self.core.pick_room(ctx, None)),
            Some(room) if now - self.room_entered_at >= hop_seconds => {
                self.core.pick_room(ctx, Some(room.id))
            }
            Some(_) => return,
        };

        let Some(next) = next else {
            return;
        };
        if self.patrol_room.as_ref().map(|r| r.id) != Some(next.id) {
            tracing::debug!("{}: patrolling room {} ({:?})", self.core.id(), next.id, next.kind);
            self.patrol_target = None;
        }
        self.patrol_room = Some(next);
        self.room_entered_at = now;
    }

    fn patrol_goal(&mut self, ctx: &TickContext<'_>) -> Option<GridPosition> {
        self.refresh_patrol_room(ctx);
        let here = ctx.monster.grid;
        let keep = self.patrol_target.filter(|t| {
            here.manhattan(*t) > 1 && self.patrol_room.as_ref().is_none_or(|r| r.contains(*t))
        });
        if keep.is_some() {
            return keep;
        }

        let room = self.patrol_room.clone();
        self.patrol_target = self
            .core
            .pick_patrol_target(ctx, room.as_ref())
            .or_else(|| self.core.pick_patrol_target(ctx, None));
        self.patrol_target
    }
}

impl Brain for RoomHunterBrain {
    fn kind(&self) -> BrainKind {
        BrainKind::RoomHunter
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
                tracing::debug!("{}: chase suppressed, sweeping {}", self.core.id(), origin);
                self.pursuit
                    .begin_search(origin, brain.suppressed_search_seconds, now, brain, modules);
            }
            return;
        }

        let fresh = self.stimuli.take_fresh(&self.core);
        let role = self.core.role();
        match self.pursuit.state() {
            BrainState::Patrol | BrainState::Return => {
                if self.pursuit.is(BrainState::Return) && here.manhattan(self.core.home()) <= 1 {
                    self.pursuit.enter(BrainState::Patrol, now, false, brain, modules);
                    self.patrol_target = None;
                }
                if let Some(stimulus) = fresh.filter(|s| s.investigates(brain, role)) {
                    if !self.pursuit.in_chase_cooldown(now, brain) {
                        self.pursuit.investigate(&self.core, &stimulus, now, modules);
                    }
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
            BrainState::Search => {
                if let Some(stimulus) = fresh {
                    if stimulus.escalates(brain) && !ctx.chase_suppressed {
                        self.pursuit.escalate(&mut self.core, &stimulus, now, modules);
                        return;
                    }
                    if stimulus.investigates(brain, role)
                        && self.pursuit.investigate(&self.core, &stimulus, now, modules)
                    {
                        return;
                    }
                }
                if self.pursuit.search_expired(now) {
                    self.pursuit.enter(BrainState::Return, now, false, brain, modules);
                }
            }
            BrainState::Hold => {
                self.pursuit.enter(BrainState::Patrol, now, true, brain, modules);
            }
        }
    }

    fn pick_target(&mut self, ctx: &TickContext<'_>) -> Option<GridPosition> {
        match self.pursuit.state() {
            BrainState::Patrol => self.patrol_goal(ctx),
            BrainState::Investigate => self.pursuit.investigate_target(),
            BrainState::Chase => self.core.last_known_player(),
            BrainState::Search => self.pursuit.search_target(&self.core, ctx),
            BrainState::Return => Some(self.core.home()),
            BrainState::Hold => None,
        }
    }
}
