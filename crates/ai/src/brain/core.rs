//! Navigation and perception state shared by every brain variant.

use std::collections::VecDeque;
use std::sync::Arc;

use maze_core::{
    AgentProfile, AiConfig, BrainCommand, BrainConfig, GridPosition, MonsterId, MoveVector, Role,
    Room,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::confidence::TargetConfidence;
use crate::context::TickContext;
use crate::memory::{StimulusMemory, VisitedTiles};
use crate::perception::{VisionOptions, can_see_player, wrap_angle, yaw_between};

/// Navigation core owned by a brain.
///
/// Holds the current path and goal, plan timers, the visit log, stimulus
/// memory, what the agent knows about the player, and a private RNG seeded
/// from the config seed and the monster id so runs replay exactly.
#[derive(Clone, Debug)]
pub struct BrainCore {
    id: MonsterId,
    profile: AgentProfile,
    config: Arc<AiConfig>,
    rng: ChaCha8Rng,
    home: GridPosition,

    path: VecDeque<GridPosition>,
    /// Goal the current path leads to. Differs from `requested` after a
    /// planning fallback.
    current_target: Option<GridPosition>,
    requested: Option<GridPosition>,
    next_plan_at: f64,

    visited: VisitedTiles,
    memory: StimulusMemory,
    confidence: TargetConfidence,

    sees_player: bool,
    last_known_player: Option<GridPosition>,
    last_seen_at: Option<f64>,
    player_dir: Option<(f64, f64)>,
    health_ratio: f64,
    last_fire_at: Option<f64>,
}

impl BrainCore {
    pub fn new(id: MonsterId, profile: AgentProfile, config: Arc<AiConfig>, home: GridPosition) -> Self {
        let seed = config.seed ^ u64::from(id.0);
        let visited = VisitedTiles::new(config.memory.visit_ttl_seconds);
        Self {
            id,
            profile,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            home,
            path: VecDeque::new(),
            current_target: None,
            requested: None,
            next_plan_at: f64::NEG_INFINITY,
            visited,
            memory: StimulusMemory::new(),
            confidence: TargetConfidence::default(),
            sees_player: false,
            last_known_player: None,
            last_seen_at: None,
            player_dir: None,
            health_ratio: 1.0,
            last_fire_at: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> MonsterId {
        self.id
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<AiConfig> {
        Arc::clone(&self.config)
    }

    pub fn brain_config(&self) -> &BrainConfig {
        &self.config.brain
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn home(&self) -> GridPosition {
        self.home
    }

    pub fn visited(&self) -> &VisitedTiles {
        &self.visited
    }

    pub fn memory(&self) -> &StimulusMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut StimulusMemory {
        &mut self.memory
    }

    pub fn confidence(&self) -> TargetConfidence {
        self.confidence
    }

    pub fn confidence_mut(&mut self) -> &mut TargetConfidence {
        &mut self.confidence
    }

    pub fn sees_player(&self) -> bool {
        self.sees_player
    }

    pub fn last_known_player(&self) -> Option<GridPosition> {
        self.last_known_player
    }

    /// Overwrites the believed player position, e.g. from an escalated stimulus.
    pub fn set_last_known_player(&mut self, grid: GridPosition) {
        self.last_known_player = Some(grid);
    }

    pub fn last_seen_at(&self) -> Option<f64> {
        self.last_seen_at
    }

    /// Direction the player was last seen moving, in tiles.
    pub fn player_dir(&self) -> Option<(f64, f64)> {
        self.player_dir
    }

    pub fn health_ratio(&self) -> f64 {
        self.health_ratio
    }

    pub fn current_target(&self) -> Option<GridPosition> {
        self.current_target
    }

    pub fn path(&self) -> impl Iterator<Item = &GridPosition> {
        self.path.iter()
    }

    pub fn vision_range(&self) -> u32 {
        self.profile
            .vision_range
            .unwrap_or(self.config.perception.vision_range)
    }

    pub fn hearing_range(&self) -> u32 {
        self.profile
            .hearing_range
            .unwrap_or(self.config.perception.hearing_range)
    }

    // ========================================================================
    // Perception
    // ========================================================================

    /// Records the visit, ages memory and refreshes sight of the player.
    pub fn observe(&mut self, ctx: &TickContext<'_>) {
        let now = ctx.now;
        self.visited.record(ctx.monster.grid, now);
        self.memory.forget_stale(now, &self.config.memory);
        self.health_ratio = ctx.monster.health_ratio();

        self.sees_player = self.can_see(ctx);
        if self.sees_player {
            if let Some(grid) = ctx.player_grid() {
                if let Some(prev) = self.last_known_player.filter(|p| *p != grid) {
                    self.player_dir = Some((f64::from(grid.x - prev.x), f64::from(grid.y - prev.y)));
                }
                self.last_known_player = Some(grid);
                self.last_seen_at = Some(now);
            }
        }

        let brain = &self.config.brain;
        let recent = self.memory.has_recent(now, brain.stimulus_recent_seconds);
        self.confidence.update(ctx.dt, self.sees_player, recent, brain);
    }

    /// Vision gate with this agent's range, facing and status.
    pub fn can_see(&self, ctx: &TickContext<'_>) -> bool {
        let Some(target) = ctx.player_grid() else {
            return false;
        };
        let options = VisionOptions::default()
            .facing(ctx.monster.yaw, self.profile.vision_fov_deg)
            .with_status(ctx.monster.status);
        can_see_player(
            ctx.world,
            ctx.monster.grid,
            target,
            self.vision_range(),
            &options,
            &self.config.perception,
        )
    }

    /// Forgets what the agent believed about the player.
    pub fn forget_player(&mut self) {
        self.last_known_player = None;
        self.player_dir = None;
        self.confidence.reset();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.current_target = None;
        self.requested = None;
    }

    fn plan_interval(&self, chasing: bool) -> f64 {
        if chasing {
            self.config.brain.chase_plan_interval
        } else {
            self.config.brain.plan_interval
        }
    }

    /// Turns a goal into a movement command.
    ///
    /// Replans when the goal changed or the path ran out, at most once per
    /// plan interval. Without a goal, or without a usable path, the agent
    /// stands still.
    pub fn steer(
        &mut self,
        ctx: &TickContext<'_>,
        goal: Option<GridPosition>,
        chasing: bool,
        sprint: bool,
    ) -> BrainCommand {
        let Some(goal) = goal else {
            self.clear_path();
            return BrainCommand::IDLE;
        };
        let here = ctx.monster.grid;
        if goal == here {
            self.path.clear();
            self.current_target = Some(goal);
            self.requested = Some(goal);
            return BrainCommand::IDLE;
        }

        let changed = self.requested != Some(goal);
        if ctx.now >= self.next_plan_at && (changed || self.path.is_empty()) {
            self.requested = Some(goal);
            self.next_plan_at = ctx.now + self.plan_interval(chasing);
            self.plan(ctx, goal);
        }

        while self.path.front().is_some_and(|wp| *wp == here) {
            self.path.pop_front();
        }
        let Some(waypoint) = self.path.front().copied() else {
            return BrainCommand::IDLE;
        };

        let monster = ctx.monster;
        let target = waypoint.to_world(self.config.brain.tile_size);
        let move_dir = MoveVector::normalized(target.x - monster.position.x, target.z - monster.position.z);
        let look_yaw = if move_dir.is_zero() {
            0.0
        } else {
            wrap_angle(yaw_between(monster.position, target) - monster.yaw)
        };
        BrainCommand {
            move_dir,
            look_yaw,
            sprint,
            fire: None,
        }
    }

    /// Stands still, turning towards `look_at` when given.
    pub fn hold(&mut self, ctx: &TickContext<'_>, look_at: Option<GridPosition>) -> BrainCommand {
        self.path.clear();
        let look_yaw = look_at
            .filter(|t| *t != ctx.monster.grid)
            .map_or(0.0, |t| {
                let target = t.to_world(self.config.brain.tile_size);
                wrap_angle(yaw_between(ctx.monster.position, target) - ctx.monster.yaw)
            });
        BrainCommand {
            look_yaw,
            ..BrainCommand::IDLE
        }
    }

    /// Plans to `goal`, falling back to room centers and then to a random
    /// walkable tile. Returns false when every attempt failed.
    fn plan(&mut self, ctx: &TickContext<'_>, goal: GridPosition) -> bool {
        let Some(planner) = ctx.planner else {
            tracing::trace!("{}: no planner, standing still", self.id);
            self.path.clear();
            return false;
        };
        let start = ctx.monster.grid;
        let diagonals = self.config.brain.allow_diagonals;

        if let Some(path) = planner.find_path(start, goal, diagonals, None) {
            self.set_path(planner.smooth_path(path), goal);
            return true;
        }
        tracing::debug!("{}: no path {} -> {}, trying room centers", self.id, start, goal);

        let mut centers: Vec<GridPosition> = ctx
            .world
            .rooms()
            .iter()
            .map(Room::center)
            .filter(|c| *c != start && *c != goal && ctx.world.is_walkable(*c))
            .collect();
        centers.shuffle(&mut self.rng);
        for center in centers.into_iter().take(self.config.brain.room_fallback_attempts) {
            if let Some(path) = planner.find_path(start, center, diagonals, None) {
                tracing::debug!("{}: falling back to room center {}", self.id, center);
                self.set_path(planner.smooth_path(path), center);
                return true;
            }
        }

        if let Some(tile) = ctx.world.random_walkable_tile(&mut self.rng) {
            if tile != start {
                if let Some(path) = planner.find_path(start, tile, diagonals, None) {
                    tracing::debug!("{}: falling back to random tile {}", self.id, tile);
                    self.set_path(planner.smooth_path(path), tile);
                    return true;
                }
            }
        }

        tracing::warn!("{}: planning from {} failed, standing still", self.id, start);
        self.path.clear();
        self.current_target = None;
        false
    }

    fn set_path(&mut self, path: Vec<GridPosition>, target: GridPosition) {
        self.path = path.into();
        self.current_target = Some(target);
    }

    // ========================================================================
    // Exploration scoring
    // ========================================================================

    /// Novelty-scored patrol pick: `distance * w1 + novelty * w2`.
    ///
    /// Candidates come from `area` when given, else from the whole map.
    pub fn pick_patrol_target(&mut self, ctx: &TickContext<'_>, area: Option<&Room>) -> Option<GridPosition> {
        let here = ctx.monster.grid;
        let brain = &self.config.brain;
        let mut best: Option<(f64, GridPosition)> = None;

        for _ in 0..brain.patrol_candidates {
            let candidate = match area {
                Some(room) => {
                    let tile = GridPosition::new(
                        self.rng.gen_range(room.min.x..=room.max.x),
                        self.rng.gen_range(room.min.y..=room.max.y),
                    );
                    ctx.world.is_walkable(tile).then_some(tile)
                }
                None => ctx.world.random_walkable_tile(&mut self.rng),
            };
            let Some(tile) = candidate.filter(|t| *t != here) else {
                continue;
            };
            let score = f64::from(here.manhattan(tile)) * brain.patrol_distance_weight
                + self.visited.novelty(tile, ctx.now) * brain.novelty_weight;
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, tile));
            }
        }

        tracing::trace!("{}: patrol pick {:?}", self.id, best);
        best.map(|(_, tile)| tile)
    }

    /// Room-hop pick: `distance * w1 + novelty * w2 + room-kind bonus`.
    pub fn pick_room(&self, ctx: &TickContext<'_>, exclude: Option<u32>) -> Option<Room> {
        let here = ctx.monster.grid;
        let brain = &self.config.brain;
        ctx.world
            .rooms()
            .iter()
            .filter(|room| Some(room.id) != exclude && ctx.world.is_walkable(room.center()))
            .map(|room| {
                let center = room.center();
                let score = f64::from(here.manhattan(center)) * brain.patrol_distance_weight
                    + self.visited.novelty(center, ctx.now) * brain.novelty_weight
                    + brain.room_kind_bonus(room.kind);
                (score, room)
            })
            .max_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.id.cmp(&a.1.id)))
            .map(|(_, room)| room.clone())
    }

    // ========================================================================
    // Ranged fire
    // ========================================================================

    pub fn fire_ready(&self, now: f64) -> bool {
        self.profile.ranged
            && self
                .last_fire_at
                .is_none_or(|t| now - t >= self.config.brain.fire_cooldown_seconds)
    }

    pub fn mark_fired(&mut self, now: f64) {
        self.last_fire_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::SquadCoordinator;
    use maze_content::GridWorld;
    use maze_core::{BrainKind, MonsterView, PlayerView, RoomKind, WorldOracle};

    fn core(config: AiConfig) -> BrainCore {
        BrainCore::new(
            MonsterId(1),
            AgentProfile::new(BrainKind::Roaming, Role::Default).with_fov(360.0),
            Arc::new(config),
            GridPosition::new(1, 1),
        )
    }

    #[test]
    fn steer_moves_towards_first_waypoint() {
        let world = GridWorld::open(10, 10);
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            world: &world,
            planner: Some(&world),
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        let mut core = core(AiConfig::default());
        let cmd = core.steer(&ctx, Some(GridPosition::new(5, 1)), false, false);
        assert!((cmd.move_dir.x - 1.0).abs() < 1e-9);
        assert!(cmd.move_dir.y.abs() < 1e-9);
        assert!((cmd.look_yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(core.current_target(), Some(GridPosition::new(5, 1)));
    }

    #[test]
    fn failed_plan_falls_back_to_room_center() {
        // Goal sealed off on the right; one reachable room on the left.
        let world = GridWorld::from_ascii(&["#########", "#...#...#", "#...#...#", "#########"])
            .with_room(Room {
                id: 1,
                kind: RoomKind::Generic,
                min: GridPosition::new(1, 1),
                max: GridPosition::new(3, 2),
            });
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            world: &world,
            planner: Some(&world),
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        let mut core = core(AiConfig::default());
        let cmd = core.steer(&ctx, Some(GridPosition::new(6, 1)), false, false);
        assert_eq!(core.current_target(), Some(GridPosition::new(2, 1)));
        assert!(!cmd.move_dir.is_zero());
    }

    #[test]
    fn no_planner_means_no_movement() {
        let world = GridWorld::open(10, 10);
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            world: &world,
            planner: None,
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        let mut core = core(AiConfig::default());
        assert!(core.steer(&ctx, Some(GridPosition::new(5, 5)), false, false).is_idle());
    }

    #[test]
    fn planning_is_cooldown_gated() {
        let world = GridWorld::open(10, 10);
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let mut core = core(AiConfig::default());
        let mut ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            world: &world,
            planner: Some(&world),
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        core.steer(&ctx, Some(GridPosition::new(5, 1)), false, false);
        ctx.now = 0.1;
        core.steer(&ctx, Some(GridPosition::new(1, 5)), false, false);
        assert_eq!(core.current_target(), Some(GridPosition::new(5, 1)));
        ctx.now = 0.7;
        core.steer(&ctx, Some(GridPosition::new(1, 5)), false, false);
        assert_eq!(core.current_target(), Some(GridPosition::new(1, 5)));
    }

    #[test]
    fn observe_tracks_sight_and_confidence() {
        let world = GridWorld::open(10, 10);
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let player = PlayerView::new(GridPosition::new(1, 5), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let ctx = TickContext {
            now: 0.0,
            dt: 0.5,
            world: &world,
            planner: Some(&world),
            player: Some(&player),
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        let mut core = core(AiConfig::default());
        core.observe(&ctx);
        assert!(core.sees_player());
        assert_eq!(core.last_known_player(), Some(player.grid));
        assert!(core.confidence().value() > 0.0);
        assert!(core.visited().last_visit(monster.grid).is_some());
        assert!(world.is_walkable(monster.grid));
    }

    #[test]
    fn patrol_prefers_unvisited_tiles() {
        let world = GridWorld::from_ascii(&["#####", "#...#", "#####"]);
        let monster = MonsterView::new(MonsterId(1), GridPosition::new(1, 1), 2.0);
        let mut squad = SquadCoordinator::new(Default::default());
        let ctx = TickContext {
            now: 1.0,
            dt: 0.1,
            world: &world,
            planner: Some(&world),
            player: None,
            monster: &monster,
            squad: &mut squad,
            chase_suppressed: false,
        };
        let mut config = AiConfig::default();
        config.brain.patrol_candidates = 64;
        let mut core = core(config);
        core.visited.record(GridPosition::new(3, 1), 1.0);
        let pick = core.pick_patrol_target(&ctx, None);
        assert_eq!(pick, Some(GridPosition::new(2, 1)));
    }
}
