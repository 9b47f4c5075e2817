//! Per-tick context and the read-only agent snapshot.

use maze_core::{
    BrainKind, GridPosition, MonsterId, MonsterView, NoiseEvent, PathPlanner, PlayerView, Role,
    ScentEvent, SquadId, WorldOracle,
};

use crate::brain::BrainState;
use crate::squad::SquadCoordinator;

/// Everything an agent borrows for one tick.
///
/// # Lifetime
///
/// The world, planner and entity views belong to the host and are only lent
/// for the duration of the tick. The squad blackboard is the one piece of
/// state shared across agents; ticks run sequentially, so a plain `&mut` is
/// enough.
pub struct TickContext<'a> {
    /// Monotonic simulation clock in seconds.
    pub now: f64,
    pub dt: f64,
    pub world: &'a dyn WorldOracle,
    /// `None` means the agent cannot move this tick.
    pub planner: Option<&'a dyn PathPlanner>,
    pub player: Option<&'a PlayerView>,
    pub monster: &'a MonsterView,
    pub squad: &'a mut SquadCoordinator,
    /// Set when enough agents are already chasing; sightings turn into a
    /// short local search instead of another chase.
    pub chase_suppressed: bool,
}

impl TickContext<'_> {
    /// Player tile, if the player exists and is alive.
    pub fn player_grid(&self) -> Option<GridPosition> {
        self.player.filter(|p| p.is_alive()).map(|p| p.grid)
    }
}

/// Read-only view of an agent handed to target selectors.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id: MonsterId,
    pub kind: BrainKind,
    pub role: Role,
    pub squad: Option<SquadId>,
    pub state: BrainState,
    pub grid: GridPosition,
    pub health_ratio: f64,
    pub sees_player: bool,
    pub last_known_player: Option<GridPosition>,
    pub confidence: f64,
    /// Goal the agent is currently navigating to.
    pub target: Option<GridPosition>,
    pub noise: Option<NoiseEvent>,
    pub scent: Option<ScentEvent>,
}
