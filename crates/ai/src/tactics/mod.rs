//! Tactics engine: chase, flank or take cover.
//!
//! [`FlankCoverTactics`] picks one tactical target per tick from the agent's
//! role, health and recent damage. Choices are held for a short window so
//! agents do not flicker between targets.

mod cover;
mod flank;
mod intercept;

pub use cover::{CoverQuery, find_cover};
pub use flank::{pick_flank, preferred_angle, ring_tiles};
pub use intercept::predict_intercept;

use maze_core::{GridPosition, MonsterId, PathPlanner, Role, TacticsConfig, WorldOracle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// What a tactical directive asks the agent to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TacticMode {
    Chase,
    Flank,
    Cover,
}

/// Output of one tactics tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TacticDirective {
    pub target: Option<GridPosition>,
    pub mode: TacticMode,
    /// Stay put at the target instead of moving.
    pub hold_position: bool,
}

impl TacticDirective {
    pub const fn chase(target: GridPosition) -> Self {
        Self {
            target: Some(target),
            mode: TacticMode::Chase,
            hold_position: false,
        }
    }
}

/// Per-tick inputs of [`FlankCoverTactics::tick`].
pub struct TacticsInput<'a> {
    pub now: f64,
    pub monster: GridPosition,
    pub player: GridPosition,
    /// Player velocity in tiles per second, when known.
    pub player_velocity: Option<(f64, f64)>,
    pub role: Role,
    pub health_ratio: f64,
    pub world: &'a dyn WorldOracle,
    pub planner: Option<&'a dyn PathPlanner>,
    pub allow_diagonals: bool,
}

impl<'a> TacticsInput<'a> {
    fn query(&self) -> CoverQuery<'a> {
        CoverQuery {
            agent: self.monster,
            threat: self.player,
            world: self.world,
            planner: self.planner,
            allow_diagonals: self.allow_diagonals,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct HeldTactic {
    directive: TacticDirective,
    chosen_at: f64,
    arrived_at: Option<f64>,
}

/// Per-agent tactics state.
///
/// # Decision order
///
/// 1. Keep the held choice while its hold window is open. A cover tile is
///    held for `cover_hold_seconds` once reached.
/// 2. Low health or a recent hit: take cover.
/// 3. By role: leader/rusher chase (leading the player when its velocity is
///    known), cover/support take cover, everyone else flanks.
///
/// Cover falls back to flanking and flanking falls back to chasing when no
/// tile qualifies.
#[derive(Clone, Debug)]
pub struct FlankCoverTactics {
    config: TacticsConfig,
    slot: usize,
    rng: ChaCha8Rng,
    held: Option<HeldTactic>,
    last_hit_at: Option<f64>,
}

impl FlankCoverTactics {
    /// Creates tactics for one agent. The flank slot defaults to
    /// `id % flank_slots`.
    pub fn new(config: TacticsConfig, id: MonsterId, seed: u64) -> Self {
        let slot = id.0 as usize % config.flank_slots.max(1);
        Self {
            config,
            slot,
            rng: ChaCha8Rng::seed_from_u64(seed ^ u64::from(id.0).rotate_left(17)),
            held: None,
            last_hit_at: None,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Overrides the flank slot, e.g. with one leased from a squad.
    pub fn set_slot(&mut self, slot: usize) {
        if slot != self.slot {
            self.slot = slot;
            if self
                .held
                .is_some_and(|h| h.directive.mode == TacticMode::Flank)
            {
                self.held = None;
            }
        }
    }

    pub fn on_damaged(&mut self, now: f64) {
        self.last_hit_at = Some(now);
    }

    pub fn reset(&mut self) {
        self.held = None;
    }

    /// The directive currently held, if any.
    pub fn current(&self) -> Option<TacticDirective> {
        self.held.map(|h| h.directive)
    }

    pub fn config(&self) -> &TacticsConfig {
        &self.config
    }

    fn recently_hit(&self, now: f64) -> bool {
        self.last_hit_at
            .is_some_and(|t| now - t <= self.config.cover_recent_hit_seconds)
    }

    pub fn wants_cover(&self, now: f64, health_ratio: f64) -> bool {
        health_ratio < self.config.low_health_ratio || self.recently_hit(now)
    }

    pub fn tick(&mut self, input: &TacticsInput<'_>) -> TacticDirective {
        if let Some(kept) = self.keep_held(input) {
            return kept;
        }

        let directive = self.decide(input);
        tracing::debug!(
            "tactics: {} ({:?}) -> {} {:?}",
            input.monster,
            input.role,
            directive.mode,
            directive.target
        );
        self.held = Some(HeldTactic {
            directive,
            chosen_at: input.now,
            arrived_at: None,
        });
        directive
    }

    fn keep_held(&mut self, input: &TacticsInput<'_>) -> Option<TacticDirective> {
        let held = self.held.as_mut()?;
        let now = input.now;
        match held.directive.mode {
            TacticMode::Cover => {
                let target = held.directive.target?;
                if held.arrived_at.is_none() && input.monster.manhattan(target) == 0 {
                    held.arrived_at = Some(now);
                }
                match held.arrived_at {
                    Some(arrived) if now < arrived + self.config.cover_hold_seconds => {
                        held.directive.hold_position = true;
                        Some(held.directive)
                    }
                    Some(_) => None,
                    None if now < held.chosen_at + self.config.hold_seconds => Some(held.directive),
                    None => None,
                }
            }
            TacticMode::Chase if now < held.chosen_at + self.config.hold_seconds => {
                // Mode is held; the chase target follows the player.
                Some(TacticDirective::chase(input.player))
            }
            TacticMode::Flank if now < held.chosen_at + self.config.hold_seconds => {
                Some(held.directive)
            }
            _ => None,
        }
    }

    fn decide(&mut self, input: &TacticsInput<'_>) -> TacticDirective {
        let query = input.query();

        if self.wants_cover(input.now, input.health_ratio) || input.role.is_cover_like() {
            if let Some(tile) = find_cover(&query, &self.config, &mut self.rng) {
                return TacticDirective {
                    target: Some(tile),
                    mode: TacticMode::Cover,
                    hold_position: tile == input.monster,
                };
            }
            tracing::trace!("tactics: no cover near {}", input.monster);
        }

        if !input.role.is_leader_like() {
            if let Some(tile) = pick_flank(&query, self.slot, &self.config, &mut self.rng) {
                return TacticDirective {
                    target: Some(tile),
                    mode: TacticMode::Flank,
                    hold_position: false,
                };
            }
        }

        let target = match input.player_velocity {
            Some(velocity) => predict_intercept(
                input.player,
                velocity,
                input.monster,
                self.config.intercept_speed,
                self.config.intercept_horizon_seconds,
                |t| input.world.is_walkable(t),
            ),
            None => input.player,
        };
        TacticDirective::chase(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_content::GridWorld;

    fn input<'a>(world: &'a GridWorld, now: f64, role: Role, health: f64) -> TacticsInput<'a> {
        TacticsInput {
            now,
            monster: GridPosition::new(2, 2),
            player: GridPosition::new(10, 10),
            player_velocity: None,
            role,
            health_ratio: health,
            world,
            planner: Some(world),
            allow_diagonals: true,
        }
    }

    fn pillar_world() -> GridWorld {
        let mut rows = vec!["...............".to_string(); 15];
        rows[4] = "...###.........".to_string();
        rows[5] = "...###.........".to_string();
        GridWorld::from_ascii(&rows)
    }

    #[test]
    fn leader_chases_player_tile() {
        let world = GridWorld::open(16, 16);
        let mut tactics = FlankCoverTactics::new(TacticsConfig::default(), MonsterId(1), 1);
        let d = tactics.tick(&input(&world, 0.0, Role::Leader, 1.0));
        assert_eq!(d, TacticDirective::chase(GridPosition::new(10, 10)));
    }

    #[test]
    fn leader_leads_a_moving_player() {
        let world = GridWorld::open(16, 16);
        let mut tactics = FlankCoverTactics::new(TacticsConfig::default(), MonsterId(1), 1);
        let mut inp = input(&world, 0.0, Role::Rusher, 1.0);
        inp.player_velocity = Some((0.0, 2.0));
        let d = tactics.tick(&inp);
        assert_eq!(d.mode, TacticMode::Chase);
        assert_eq!(d.target, Some(GridPosition::new(10, 12)));
    }

    #[test]
    fn flanker_gets_a_ring_tile() {
        let world = GridWorld::open(16, 16);
        let config = TacticsConfig::default();
        let mut tactics = FlankCoverTactics::new(config.clone(), MonsterId(2), 1);
        let d = tactics.tick(&input(&world, 0.0, Role::Flanker, 1.0));
        assert_eq!(d.mode, TacticMode::Flank);
        let dist = d.target.unwrap().manhattan(GridPosition::new(10, 10));
        assert!(dist >= config.flank_min_dist && dist <= config.flank_max_dist);
    }

    #[test]
    fn flank_target_is_held_within_window() {
        let world = GridWorld::open(16, 16);
        let mut tactics = FlankCoverTactics::new(TacticsConfig::default(), MonsterId(2), 1);
        let first = tactics.tick(&input(&world, 0.0, Role::Flanker, 1.0));
        for i in 1..10 {
            let mut inp = input(&world, f64::from(i) * 0.1, Role::Flanker, 1.0);
            inp.player = GridPosition::new(4, 12);
            assert_eq!(tactics.tick(&inp), first);
        }
    }

    #[test]
    fn low_health_seeks_cover() {
        let world = pillar_world();
        let mut tactics = FlankCoverTactics::new(
            TacticsConfig {
                cover_samples: 200,
                ..TacticsConfig::default()
            },
            MonsterId(3),
            1,
        );
        let mut inp = input(&world, 0.0, Role::Leader, 0.1);
        inp.monster = GridPosition::new(4, 2);
        let d = tactics.tick(&inp);
        assert_eq!(d.mode, TacticMode::Cover);
        assert!(!world.has_line_of_sight(d.target.unwrap(), inp.player));
    }

    #[test]
    fn recent_hit_triggers_cover_then_expires() {
        let tactics_config = TacticsConfig::default();
        let mut tactics = FlankCoverTactics::new(tactics_config.clone(), MonsterId(3), 1);
        tactics.on_damaged(1.0);
        assert!(tactics.wants_cover(1.5, 1.0));
        assert!(!tactics.wants_cover(1.0 + tactics_config.cover_recent_hit_seconds + 0.1, 1.0));
    }

    #[test]
    fn cover_role_without_cover_falls_back_to_flank() {
        let world = GridWorld::open(16, 16);
        let mut tactics = FlankCoverTactics::new(TacticsConfig::default(), MonsterId(4), 1);
        let d = tactics.tick(&input(&world, 0.0, Role::Support, 1.0));
        assert_eq!(d.mode, TacticMode::Flank);
    }

    #[test]
    fn slot_defaults_to_id_modulo_slots() {
        let tactics = FlankCoverTactics::new(TacticsConfig::default(), MonsterId(8), 1);
        assert_eq!(tactics.slot(), 8 % 6);
    }
}
