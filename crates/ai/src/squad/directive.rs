//! Per-agent squad behavior: reporting and role directives.

use maze_core::{AiConfig, GridPosition, MonsterId, SquadConfig, SquadId, TacticsConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::blackboard::{ReportOptions, SquadTargetView, TargetKind};
use crate::context::{AgentSnapshot, TickContext};
use crate::tactics::{
    CoverQuery, FlankCoverTactics, TacticMode, TacticsInput, find_cover, pick_flank,
};

/// Why a directive was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DirectiveKind {
    /// Straight at the shared target.
    Push,
    /// Leased ring position around the target.
    Flank,
    /// Corridor junction that cuts the target off.
    CutOff,
    /// Out of the target's sight.
    Hide,
    /// Line-of-sight position next to an obstruction.
    FirePosition,
}

/// Squad instruction for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquadDirective {
    pub kind: DirectiveKind,
    pub target: GridPosition,
    /// Stay at `target` instead of moving.
    pub hold_position: bool,
    /// Tile to face while holding.
    pub look_at: Option<GridPosition>,
}

#[derive(Clone, Copy, Debug)]
struct CachedPosition {
    kind: DirectiveKind,
    tile: GridPosition,
    slot: Option<usize>,
    until: f64,
}

/// Squad membership of one agent.
///
/// Each tick the agent refreshes its roster entry, reports what it perceives
/// and asks for a directive derived from the squad's committed target and its
/// own role.
#[derive(Clone, Debug)]
pub struct SquadModule {
    squad: SquadId,
    squad_config: SquadConfig,
    tactics_config: TacticsConfig,
    rng: ChaCha8Rng,
    cached: Option<CachedPosition>,
    last_noise_reported: f64,
    last_scent_reported: f64,
}

impl SquadModule {
    pub fn new(squad: SquadId, id: MonsterId, config: &AiConfig) -> Self {
        Self {
            squad,
            squad_config: config.squad.clone(),
            tactics_config: config.tactics.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ (u64::from(id.0) << 32) ^ u64::from(squad.0)),
            cached: None,
            last_noise_reported: f64::NEG_INFINITY,
            last_scent_reported: f64::NEG_INFINITY,
        }
    }

    pub fn squad(&self) -> SquadId {
        self.squad
    }

    /// Forgets the cached flank or firing position.
    pub fn reset(&mut self) {
        self.cached = None;
    }

    /// Refreshes membership and stages reports for what the agent perceives.
    pub fn observe(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) {
        let now = ctx.now;
        ctx.squad.update_member(self.squad, agent.id, agent.role, now);

        let report = |kind| ReportOptions::for_role(kind, agent.id, agent.role, &self.squad_config);
        if agent.sees_player {
            if let Some(grid) = ctx.player_grid() {
                ctx.squad
                    .report_target(self.squad, grid, now, report(TargetKind::Sighting));
            }
        }
        if let Some(noise) = agent.noise.filter(|n| n.heard_at > self.last_noise_reported) {
            ctx.squad
                .report_target(self.squad, noise.grid, now, report(TargetKind::Noise));
            self.last_noise_reported = noise.heard_at;
        }
        if let Some(scent) = agent.scent.filter(|s| s.smelled_at > self.last_scent_reported) {
            ctx.squad
                .report_target(self.squad, scent.grid, now, report(TargetKind::Scent));
            self.last_scent_reported = scent.smelled_at;
        }
    }

    /// Role directive against the squad's committed target, if any.
    pub fn get_directive(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &mut TickContext<'_>,
        tactics: Option<&mut FlankCoverTactics>,
    ) -> Option<SquadDirective> {
        let shared = ctx.squad.get_target(self.squad, ctx.now)?;
        let role = agent.role;

        if role.is_leader_like() {
            self.cached = None;
            return Some(SquadDirective {
                kind: DirectiveKind::Push,
                target: shared.target,
                hold_position: false,
                look_at: None,
            });
        }
        if role.is_flanker_like() {
            return self.flank(agent, ctx, &shared, tactics);
        }
        if role.is_cover_like() {
            return self.cover(agent, ctx, &shared, tactics);
        }
        None
    }

    fn cached(&self, now: f64, slot: Option<usize>) -> Option<CachedPosition> {
        self.cached.filter(|c| now < c.until && c.slot == slot)
    }

    fn hold_directive(cached: CachedPosition, agent: &AgentSnapshot, shared: &SquadTargetView) -> SquadDirective {
        SquadDirective {
            kind: cached.kind,
            target: cached.tile,
            hold_position: agent.grid == cached.tile,
            look_at: Some(shared.target),
        }
    }

    fn query<'a>(agent: &AgentSnapshot, ctx: &TickContext<'a>, threat: GridPosition) -> CoverQuery<'a> {
        CoverQuery {
            agent: agent.grid,
            threat,
            world: ctx.world,
            planner: ctx.planner,
            allow_diagonals: true,
        }
    }

    // ========================================================================
    // Flankers
    // ========================================================================

    fn flank(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &mut TickContext<'_>,
        shared: &SquadTargetView,
        tactics: Option<&mut FlankCoverTactics>,
    ) -> Option<SquadDirective> {
        let slot = ctx.squad.get_flank_slot(
            self.squad,
            agent.id,
            self.tactics_config.flank_slots,
            ctx.now,
            self.squad_config.flank_slot_keep_seconds,
        );
        if let Some(tactics) = tactics {
            tactics.set_slot(slot);
        }

        if let Some(cached) = self.cached(ctx.now, Some(slot)) {
            return Some(Self::hold_directive(cached, agent, shared));
        }

        let query = Self::query(agent, ctx, shared.target);
        let (kind, tile) = match pick_flank(&query, slot, &self.tactics_config, &mut self.rng) {
            Some(tile) => (DirectiveKind::Flank, tile),
            None => (DirectiveKind::CutOff, self.cut_off(&query)?),
        };
        tracing::debug!("{} {} slot {} -> {}", agent.id, kind, slot, tile);

        let cached = CachedPosition {
            kind,
            tile,
            slot: Some(slot),
            until: ctx.now + self.squad_config.flank_target_keep_seconds,
        };
        self.cached = Some(cached);
        Some(Self::hold_directive(cached, agent, shared))
    }

    /// Nearest reachable junction around the target, shifted one step along
    /// the approach when that exit is open.
    fn cut_off(&self, query: &CoverQuery<'_>) -> Option<GridPosition> {
        let target = query.threat;
        let radius = self.squad_config.junction_search_radius;
        let r = radius as i32;

        let mut junctions = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let tile = target.offset(dx, dy);
                let d = tile.manhattan(target);
                if d == 0 || d > radius {
                    continue;
                }
                if query.world.is_walkable(tile) && query.world.walkable_degree(tile) >= 3 {
                    junctions.push((d, tile.manhattan(query.agent), tile));
                }
            }
        }
        junctions.sort();

        let (ax, ay) = (target.x - query.agent.x, target.y - query.agent.y);
        let step = if ax.abs() >= ay.abs() {
            (ax.signum(), 0)
        } else {
            (0, ay.signum())
        };

        let junction = junctions
            .into_iter()
            .map(|(_, _, tile)| tile)
            .find(|tile| query.reachable(*tile))?;
        let exit = junction.offset(step.0, step.1);
        if exit != target && exit != junction && query.world.is_walkable(exit) {
            Some(exit)
        } else {
            Some(junction)
        }
    }

    // ========================================================================
    // Cover / support
    // ========================================================================

    fn cover(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &mut TickContext<'_>,
        shared: &SquadTargetView,
        tactics: Option<&mut FlankCoverTactics>,
    ) -> Option<SquadDirective> {
        let hurt = agent.health_ratio < self.tactics_config.low_health_ratio
            || tactics
                .as_ref()
                .is_some_and(|t| t.wants_cover(ctx.now, agent.health_ratio));

        if hurt {
            self.cached = None;
            return self.hide(agent, ctx, shared, tactics);
        }

        if let Some(cached) = self.cached(ctx.now, None) {
            return Some(Self::hold_directive(cached, agent, shared));
        }
        let tile = self.fire_position(agent, ctx, shared.target)?;
        tracing::debug!("{} fire position {}", agent.id, tile);
        let cached = CachedPosition {
            kind: DirectiveKind::FirePosition,
            tile,
            slot: None,
            until: ctx.now + self.squad_config.flank_target_keep_seconds,
        };
        self.cached = Some(cached);
        Some(Self::hold_directive(cached, agent, shared))
    }

    fn hide(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &TickContext<'_>,
        shared: &SquadTargetView,
        tactics: Option<&mut FlankCoverTactics>,
    ) -> Option<SquadDirective> {
        let tile = match tactics {
            Some(tactics) => {
                let directive = tactics.tick(&TacticsInput {
                    now: ctx.now,
                    monster: agent.grid,
                    player: shared.target,
                    player_velocity: None,
                    role: agent.role,
                    health_ratio: agent.health_ratio,
                    world: ctx.world,
                    planner: ctx.planner,
                    allow_diagonals: true,
                });
                (directive.mode == TacticMode::Cover)
                    .then_some(directive.target)
                    .flatten()
            }
            None => find_cover(
                &Self::query(agent, ctx, shared.target),
                &self.tactics_config,
                &mut self.rng,
            ),
        }?;
        Some(SquadDirective {
            kind: DirectiveKind::Hide,
            target: tile,
            hold_position: agent.grid == tile,
            look_at: Some(shared.target),
        })
    }

    /// Samples tiles at `[cover_fire_min_dist, cover_fire_max_dist]` from the
    /// target that see it, touch an obstruction and can be reached.
    fn fire_position(
        &mut self,
        agent: &AgentSnapshot,
        ctx: &TickContext<'_>,
        target: GridPosition,
    ) -> Option<GridPosition> {
        let (min, max) = (
            self.squad_config.cover_fire_min_dist,
            self.squad_config.cover_fire_max_dist,
        );
        let r = max as i32;
        let query = Self::query(agent, ctx, target);
        let mut best: Option<(f64, GridPosition)> = None;

        for _ in 0..self.squad_config.cover_fire_samples {
            let tile = target.offset(self.rng.gen_range(-r..=r), self.rng.gen_range(-r..=r));
            let d = tile.manhattan(target);
            if d < min || d > max || !ctx.world.is_walkable(tile) {
                continue;
            }
            let sheltered = tile.neighbors4().any(|n| !ctx.world.is_walkable(n));
            if !sheltered || !ctx.world.has_line_of_sight(tile, target) {
                continue;
            }
            let jitter = self.rng.gen_range(0.0..=1.0) * self.tactics_config.jitter;
            let score = -f64::from(tile.manhattan(agent.grid)) + jitter;
            if best.is_some_and(|(s, _)| s >= score) {
                continue;
            }
            if query.reachable(tile) {
                best = Some((score, tile));
            }
        }
        best.map(|(_, tile)| tile)
    }
}
