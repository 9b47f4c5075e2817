//! Monster type profiles.
//!
//! A profile is the validated, explicit description of what a monster type is
//! allowed to do: which brain drives it, which squad it belongs to, which
//! optional modules it carries, and how well it perceives.

use std::fmt;

use bitflags::bitflags;

use crate::error::ConfigError;

/// Squad role. Drives tactics branching, report priority and directives.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    /// Pushes straight at the target; reports stick longest.
    Leader,
    /// Direct chaser without leadership weight.
    Rusher,
    /// Holds a ring position around the target.
    Flanker,
    /// Flanks wide and reports what it sees.
    Scout,
    /// Hides or holds a firing position.
    Cover,
    /// Hangs back like cover.
    Support,
    #[default]
    Default,
}

impl Role {
    /// Roles that push directly at the target.
    pub const fn is_leader_like(self) -> bool {
        matches!(self, Role::Leader | Role::Rusher)
    }

    pub const fn is_flanker_like(self) -> bool {
        matches!(self, Role::Flanker | Role::Scout)
    }

    pub const fn is_cover_like(self) -> bool {
        matches!(self, Role::Cover | Role::Support)
    }
}

/// Identifier of a squad blackboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadId(pub u32);

impl fmt::Display for SquadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "squad#{}", self.0)
    }
}

/// Which brain variant drives the monster.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BrainKind {
    /// Map-wide novelty explorer.
    #[default]
    Roaming,
    /// Room-bound hunter with the full patrol/investigate/chase/search/return FSM.
    RoomHunter,
    /// Guards a post and chases within a leash.
    Sentry,
}

bitflags! {
    /// Optional capabilities attached to a brain at construction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModuleSet: u8 {
        const SQUAD = 1 << 0;
        const INVESTIGATION = 1 << 1;
        const TACTICS = 1 << 2;
    }
}

// Content files spell module sets as flag text, e.g. `"SQUAD | TACTICS"`.
#[cfg(feature = "serde")]
impl serde::Serialize for ModuleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ModuleSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Validated description of one monster type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentProfile {
    pub brain: BrainKind,
    pub role: Role,
    pub squad: Option<SquadId>,
    /// Full field of view in degrees. `360` disables the cone check.
    pub vision_fov_deg: f64,
    /// Overrides the configured base vision range when set.
    pub vision_range: Option<u32>,
    /// Overrides the configured hearing range when set.
    pub hearing_range: Option<u32>,
    /// Whether this type may request ranged fire.
    pub ranged: bool,
    /// Modules requested by this type, intersected with the global switches.
    pub modules: ModuleSet,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            brain: BrainKind::Roaming,
            role: Role::Default,
            squad: None,
            vision_fov_deg: 120.0,
            vision_range: None,
            hearing_range: None,
            ranged: false,
            modules: ModuleSet::INVESTIGATION,
        }
    }
}

impl AgentProfile {
    pub fn new(brain: BrainKind, role: Role) -> Self {
        Self {
            brain,
            role,
            ..Self::default()
        }
    }

    pub fn with_squad(mut self, squad: SquadId) -> Self {
        self.squad = Some(squad);
        self.modules |= ModuleSet::SQUAD;
        self
    }

    pub fn with_modules(mut self, modules: ModuleSet) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_fov(mut self, fov_deg: f64) -> Self {
        self.vision_fov_deg = fov_deg;
        self
    }

    pub fn ranged(mut self) -> Self {
        self.ranged = true;
        self
    }

    /// Checks ranges and cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vision_fov_deg > 0.0 && self.vision_fov_deg <= 360.0) {
            return Err(ConfigError::OutOfRange {
                field: "profile.vision_fov_deg",
                value: self.vision_fov_deg,
                min: 0.0,
                max: 360.0,
            });
        }
        if self.modules.contains(ModuleSet::SQUAD) && self.squad.is_none() {
            return Err(ConfigError::SquadModuleWithoutSquad);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(Role::from_str("LEADER").unwrap(), Role::Leader);
        assert_eq!(Role::Support.as_ref(), "support");
        assert!(Role::Scout.is_flanker_like());
        assert!(!Role::Default.is_cover_like());
    }

    #[test]
    fn squad_module_requires_squad() {
        let profile = AgentProfile::default().with_modules(ModuleSet::SQUAD);
        assert_eq!(profile.validate(), Err(ConfigError::SquadModuleWithoutSquad));

        let profile = AgentProfile::default().with_squad(SquadId(3));
        assert!(profile.validate().is_ok());
        assert!(profile.modules.contains(ModuleSet::SQUAD));
    }

    #[test]
    fn fov_must_be_positive() {
        let profile = AgentProfile::default().with_fov(0.0);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::OutOfRange { field: "profile.vision_fov_deg", .. })
        ));
    }
}
