//! AI tuning parameters.
//!
//! [`AiConfig`] replaces process-wide tunables: one instance is built (usually
//! loaded from TOML) and shared as `Arc<AiConfig>` with every component.
//! Every section implements `Default` with the tuned values, and with the
//! `serde` feature missing fields fall back to those defaults.

use crate::error::ConfigError;
use crate::profile::{ModuleSet, Role};
use crate::world::RoomKind;

/// Root configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    /// Base seed mixed with each monster id for its private RNG.
    pub seed: u64,
    pub perception: PerceptionConfig,
    pub memory: MemoryConfig,
    pub investigation: InvestigationConfig,
    pub search: SearchConfig,
    pub tactics: TacticsConfig,
    pub squad: SquadConfig,
    pub brain: BrainConfig,
    pub modules: ModulesConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,
            perception: PerceptionConfig::default(),
            memory: MemoryConfig::default(),
            investigation: InvestigationConfig::default(),
            search: SearchConfig::default(),
            tactics: TacticsConfig::default(),
            squad: SquadConfig::default(),
            brain: BrainConfig::default(),
            modules: ModulesConfig::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerceptionConfig {
    /// Base vision range in tiles (manhattan).
    pub vision_range: u32,
    /// Vision multiplier while standing in a dark zone.
    pub dark_vision_mult: f64,
    /// Vision multiplier while perception-jammed.
    pub jam_vision_mult: f64,
    /// Base hearing range in tiles, scaled by noise strength.
    pub hearing_range: u32,
    /// Hearing multiplier when walls separate listener and source.
    pub occluded_hearing_mult: f64,
    /// Smell range in tiles at intensity 1.0.
    pub smell_range: u32,
}

impl PerceptionConfig {
    /// Lower clamp applied to every vision multiplier.
    pub const VISION_MULT_FLOOR: f64 = 0.15;
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            vision_range: 12,
            dark_vision_mult: 0.5,
            jam_vision_mult: 0.6,
            hearing_range: 10,
            occluded_hearing_mult: 0.6,
            smell_range: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoryConfig {
    pub noise_memory_seconds: f64,
    pub scent_memory_seconds: f64,
    /// Visited tiles older than this are forgotten and count as novel again.
    pub visit_ttl_seconds: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            noise_memory_seconds: 6.0,
            scent_memory_seconds: 8.0,
            visit_ttl_seconds: 45.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InvestigationConfig {
    /// How long an investigation may last once started or arrived.
    pub duration_seconds: f64,
    /// Look-around pause after arriving at the stimulus.
    pub pause_seconds: f64,
    /// Local sampling radius of the search-on-arrival variant.
    pub search_radius: u32,
    /// Resample cadence of the search-on-arrival variant.
    pub resample_seconds: f64,
    /// Use the search-on-arrival variant instead of the look-around pause.
    pub sweep_on_arrival: bool,
}

impl Default for InvestigationConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 8.0,
            pause_seconds: 1.5,
            search_radius: 3,
            resample_seconds: 2.0,
            sweep_on_arrival: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub radius: u32,
    pub repick_seconds: f64,
    /// Maximum number of ranked candidates kept in a plan.
    pub queue_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius: 6,
            repick_seconds: 2.5,
            queue_limit: 24,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    /// Hysteresis window for chase/flank choices.
    pub hold_seconds: f64,
    /// Time spent holding a reached cover tile.
    pub cover_hold_seconds: f64,
    pub low_health_ratio: f64,
    pub cover_recent_hit_seconds: f64,
    pub cover_samples: u32,
    pub cover_radius: u32,
    pub cover_near_weight: f64,
    pub cover_far_weight: f64,
    pub flank_min_dist: u32,
    pub flank_max_dist: u32,
    pub flank_slots: usize,
    /// Amplitude of the random score perturbation.
    pub jitter: f64,
    /// Lead time for intercept prediction.
    pub intercept_horizon_seconds: f64,
    /// Assumed monster speed in tiles per second when leading a target.
    pub intercept_speed: f64,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            hold_seconds: 1.2,
            cover_hold_seconds: 2.5,
            low_health_ratio: 0.35,
            cover_recent_hit_seconds: 2.0,
            cover_samples: 24,
            cover_radius: 6,
            cover_near_weight: 1.0,
            cover_far_weight: 0.6,
            flank_min_dist: 2,
            flank_max_dist: 5,
            flank_slots: 6,
            jitter: 0.25,
            intercept_horizon_seconds: 1.0,
            intercept_speed: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SquadConfig {
    /// Members and blackboard entries idle for longer are pruned.
    pub stale_seconds: f64,
    pub target_memory_seconds: f64,
    /// Memory multiplier for leader reports.
    pub leader_memory_mult: f64,
    pub flank_target_keep_seconds: f64,
    pub flank_slot_keep_seconds: f64,
    pub cover_fire_min_dist: u32,
    pub cover_fire_max_dist: u32,
    pub cover_fire_samples: u32,
    pub max_shooters: usize,
    pub fire_grant_seconds: f64,
    /// Radius searched for corridor cut-off junctions.
    pub junction_search_radius: u32,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            stale_seconds: 6.0,
            target_memory_seconds: 4.0,
            leader_memory_mult: 1.5,
            flank_target_keep_seconds: 2.5,
            flank_slot_keep_seconds: 3.0,
            cover_fire_min_dist: 3,
            cover_fire_max_dist: 7,
            cover_fire_samples: 24,
            max_shooters: 1,
            fire_grant_seconds: 0.8,
            junction_search_radius: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainConfig {
    /// World units per tile.
    pub tile_size: f64,
    pub allow_diagonals: bool,
    pub plan_interval: f64,
    pub chase_plan_interval: f64,
    /// Room centers tried when the direct path query fails.
    pub room_fallback_attempts: usize,
    pub chase_timeout_seconds: f64,
    /// Chase timeout at zero confidence.
    pub min_chase_timeout_seconds: f64,
    pub search_timeout_seconds: f64,
    /// Local search length when a sighting is suppressed by chase fairness.
    pub suppressed_search_seconds: f64,
    pub state_lock_seconds: f64,
    pub chase_cooldown_seconds: f64,
    /// Base distance beyond which a chasing monster sprints.
    pub sprint_distance: f64,
    /// Extra sprint distance granted at full confidence.
    pub sprint_confidence_bonus: f64,
    /// Simultaneous chasers before the rest are suppressed.
    pub max_chasers: usize,
    pub patrol_candidates: u32,
    pub patrol_distance_weight: f64,
    pub novelty_weight: f64,
    pub room_hop_seconds: f64,
    pub hub_room_bonus: f64,
    pub corridor_room_penalty: f64,
    pub confidence_gain_per_second: f64,
    pub confidence_decay_per_second: f64,
    /// Decay rate while a recent noise or scent backs the belief.
    pub confidence_stimulus_decay_per_second: f64,
    pub stimulus_recent_seconds: f64,
    /// Minimum noise strength to start investigating.
    pub investigate_noise_threshold: f64,
    /// Noise strength that escalates an investigation into a chase.
    pub escalate_noise_threshold: f64,
    pub investigate_scent_threshold: f64,
    pub escalate_scent_threshold: f64,
    pub leash_radius: u32,
    /// Radians per second a sentry sweeps while on guard.
    pub scan_rate: f64,
    pub fire_range: u32,
    pub fire_cooldown_seconds: f64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            tile_size: 2.0,
            allow_diagonals: true,
            plan_interval: 0.6,
            chase_plan_interval: 0.25,
            room_fallback_attempts: 4,
            chase_timeout_seconds: 4.0,
            min_chase_timeout_seconds: 1.5,
            search_timeout_seconds: 10.0,
            suppressed_search_seconds: 3.0,
            state_lock_seconds: 0.4,
            chase_cooldown_seconds: 1.5,
            sprint_distance: 6.0,
            sprint_confidence_bonus: 4.0,
            max_chasers: 3,
            patrol_candidates: 12,
            patrol_distance_weight: 0.04,
            novelty_weight: 1.0,
            room_hop_seconds: 20.0,
            hub_room_bonus: 0.3,
            corridor_room_penalty: 0.2,
            confidence_gain_per_second: 1.5,
            confidence_decay_per_second: 0.25,
            confidence_stimulus_decay_per_second: 0.1,
            stimulus_recent_seconds: 3.0,
            investigate_noise_threshold: 0.3,
            escalate_noise_threshold: 0.95,
            investigate_scent_threshold: 0.3,
            escalate_scent_threshold: 0.8,
            leash_radius: 8,
            scan_rate: 0.8,
            fire_range: 8,
            fire_cooldown_seconds: 1.0,
        }
    }
}

impl BrainConfig {
    /// Noise threshold adjusted for how cautious a role is.
    pub fn noise_threshold_for(&self, role: Role) -> f64 {
        let bias = match role {
            Role::Leader | Role::Rusher => -0.1,
            Role::Cover | Role::Support => 0.2,
            Role::Flanker | Role::Scout | Role::Default => 0.0,
        };
        (self.investigate_noise_threshold + bias).max(0.0)
    }

    /// Room-type bonus used by room-hop scoring.
    pub fn room_kind_bonus(&self, kind: RoomKind) -> f64 {
        match kind {
            RoomKind::Hub => self.hub_room_bonus,
            RoomKind::Corridor => -self.corridor_room_penalty,
            _ => 0.0,
        }
    }
}

/// Global module switches, intersected with each profile's request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModulesConfig {
    pub squad: bool,
    pub investigation: bool,
    pub tactics: bool,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            squad: true,
            investigation: true,
            tactics: true,
        }
    }
}

impl ModulesConfig {
    pub fn enabled(&self) -> ModuleSet {
        let mut set = ModuleSet::empty();
        set.set(ModuleSet::SQUAD, self.squad);
        set.set(ModuleSet::INVESTIGATION, self.investigation);
        set.set(ModuleSet::TACTICS, self.tactics);
        set
    }
}

// ============================================================================
// Validation
// ============================================================================

fn multiplier(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn ordered(
    min_field: &'static str,
    min: u32,
    max_field: &'static str,
    max: u32,
) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            min_field,
            min: f64::from(min),
            max_field,
            max: f64::from(max),
        })
    }
}

impl AiConfig {
    /// Checks multipliers, intervals and ranges. Returns the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.perception;
        multiplier("perception.dark_vision_mult", p.dark_vision_mult)?;
        multiplier("perception.jam_vision_mult", p.jam_vision_mult)?;
        multiplier("perception.occluded_hearing_mult", p.occluded_hearing_mult)?;

        let m = &self.memory;
        positive("memory.noise_memory_seconds", m.noise_memory_seconds)?;
        positive("memory.scent_memory_seconds", m.scent_memory_seconds)?;
        positive("memory.visit_ttl_seconds", m.visit_ttl_seconds)?;

        positive("investigation.duration_seconds", self.investigation.duration_seconds)?;
        positive("search.repick_seconds", self.search.repick_seconds)?;

        let t = &self.tactics;
        multiplier("tactics.low_health_ratio", t.low_health_ratio)?;
        ordered(
            "tactics.flank_min_dist",
            t.flank_min_dist,
            "tactics.flank_max_dist",
            t.flank_max_dist,
        )?;
        positive("tactics.flank_slots", t.flank_slots as f64)?;

        let s = &self.squad;
        ordered(
            "squad.cover_fire_min_dist",
            s.cover_fire_min_dist,
            "squad.cover_fire_max_dist",
            s.cover_fire_max_dist,
        )?;
        positive("squad.stale_seconds", s.stale_seconds)?;
        positive("squad.fire_grant_seconds", s.fire_grant_seconds)?;

        let b = &self.brain;
        positive("brain.tile_size", b.tile_size)?;
        positive("brain.plan_interval", b.plan_interval)?;
        positive("brain.chase_plan_interval", b.chase_plan_interval)?;
        positive("brain.chase_timeout_seconds", b.chase_timeout_seconds)?;
        if b.min_chase_timeout_seconds > b.chase_timeout_seconds {
            return Err(ConfigError::InvertedRange {
                min_field: "brain.min_chase_timeout_seconds",
                min: b.min_chase_timeout_seconds,
                max_field: "brain.chase_timeout_seconds",
                max: b.chase_timeout_seconds,
            });
        }
        positive("brain.search_timeout_seconds", b.search_timeout_seconds)?;
        if s.fire_grant_seconds >= b.fire_cooldown_seconds {
            return Err(ConfigError::GrantOutlivesCooldown {
                grant: s.fire_grant_seconds,
                cooldown: b.fire_cooldown_seconds,
            });
        }
        Ok(())
    }
}
