//! Optional capabilities composed onto a brain.
//!
//! Brains know nothing about squads, investigations or tactics. An agent
//! carries a [`BrainModules`] next to its brain, and each tick the modules are
//! asked in a fixed order (squad, then investigation, then tactics) whether
//! they want to redirect or hold the agent. The first non-[`Selection::Pass`]
//! answer wins; otherwise the brain picks its own target.

pub mod investigation;
pub mod selector;

use maze_core::{AgentProfile, ModuleSet, ModulesConfig};

pub use self::investigation::InvestigationModule;
pub use self::selector::{Selection, TargetSelector};

use crate::agent::Agent;
use crate::brain::BrainState;
use crate::context::{AgentSnapshot, TickContext};
use crate::squad::SquadModule;
use crate::tactics::FlankCoverTactics;

/// Modules attached to one agent.
#[derive(Clone, Debug, Default)]
pub struct BrainModules {
    pub squad: Option<SquadModule>,
    pub investigation: Option<InvestigationModule>,
    pub tactics: Option<FlankCoverTactics>,
}

impl BrainModules {
    /// Which modules are currently attached.
    pub fn attached(&self) -> ModuleSet {
        let mut set = ModuleSet::empty();
        set.set(ModuleSet::SQUAD, self.squad.is_some());
        set.set(ModuleSet::INVESTIGATION, self.investigation.is_some());
        set.set(ModuleSet::TACTICS, self.tactics.is_some());
        set
    }

    /// Runs the selector chain. Squad hiding delegates to the attached
    /// tactics so cover choices stay consistent across both.
    pub fn select(&mut self, agent: &AgentSnapshot, ctx: &mut TickContext<'_>) -> Selection {
        if let Some(squad) = self.squad.as_mut() {
            let selection = squad.select_with(agent, ctx, self.tactics.as_mut());
            if !selection.is_pass() {
                tracing::trace!("{}: {} selection {:?}", agent.id, squad.name(), selection);
                return selection;
            }
        }
        if let Some(investigation) = self.investigation.as_mut() {
            let selection = investigation.select(agent, ctx);
            if !selection.is_pass() {
                tracing::trace!("{}: {} selection {:?}", agent.id, investigation.name(), selection);
                return selection;
            }
        }
        if let Some(tactics) = self.tactics.as_mut() {
            let selection = tactics.select(agent, ctx);
            if !selection.is_pass() {
                tracing::trace!("{}: {} selection {:?}", agent.id, tactics.name(), selection);
            }
            return selection;
        }
        Selection::Pass
    }

    /// Clears sub-state that belonged to the state being left.
    pub fn on_transition(&mut self, from: BrainState, to: BrainState) {
        if from == BrainState::Chase && to != BrainState::Chase {
            if let Some(tactics) = self.tactics.as_mut() {
                tactics.reset();
            }
            if let Some(squad) = self.squad.as_mut() {
                squad.reset();
            }
        }
        if from == BrainState::Investigate {
            if let Some(investigation) = self.investigation.as_mut() {
                investigation.reset();
            }
        }
    }

    pub fn on_damaged(&mut self, now: f64) {
        if let Some(tactics) = self.tactics.as_mut() {
            tactics.on_damaged(now);
        }
    }
}

/// Modules a profile ends up with: its request intersected with the global
/// switches. The squad module additionally needs a squad id.
pub fn normalized_modules(profile: &AgentProfile, config: &ModulesConfig) -> ModuleSet {
    let mut set = profile.modules & config.enabled();
    if profile.squad.is_none() {
        set.remove(ModuleSet::SQUAD);
    }
    set
}

/// Attaches every enabled module the agent does not carry yet.
///
/// Calling it again is a no-op. Returns how many modules were attached.
pub fn apply_brain_modules(agent: &mut Agent, config: &ModulesConfig) -> usize {
    let core = agent.brain.core();
    let id = core.id();
    let wanted = normalized_modules(core.profile(), config);
    let missing = wanted - agent.modules.attached();
    if missing.is_empty() {
        return 0;
    }

    let ai = core.shared_config();
    let squad = core.profile().squad;
    let modules = &mut agent.modules;
    let mut attached = 0;

    if missing.contains(ModuleSet::SQUAD) {
        if let Some(squad) = squad {
            modules.squad = Some(SquadModule::new(squad, id, &ai));
            attached += 1;
        }
    }
    if missing.contains(ModuleSet::INVESTIGATION) {
        modules.investigation = Some(InvestigationModule::new(&ai, id));
        attached += 1;
    }
    if missing.contains(ModuleSet::TACTICS) {
        let seed = ai.seed ^ u64::from(id.0).rotate_left(17);
        modules.tactics = Some(FlankCoverTactics::new(ai.tactics.clone(), id, seed));
        attached += 1;
    }

    tracing::debug!("{}: attached {} module(s): {:?}", id, attached, missing);
    attached
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{BrainKind, Role, SquadId};

    #[test]
    fn squad_is_dropped_without_squad_id() {
        let config = ModulesConfig::default();
        let profile = AgentProfile::new(BrainKind::Roaming, Role::Flanker)
            .with_modules(ModuleSet::all());
        assert_eq!(
            normalized_modules(&profile, &config),
            ModuleSet::INVESTIGATION | ModuleSet::TACTICS
        );

        let profile = profile.with_squad(SquadId(1));
        assert_eq!(normalized_modules(&profile, &config), ModuleSet::all());
    }

    #[test]
    fn global_switches_win() {
        let config = ModulesConfig {
            squad: true,
            investigation: false,
            tactics: false,
        };
        let profile = AgentProfile::new(BrainKind::RoomHunter, Role::Leader)
            .with_modules(ModuleSet::all())
            .with_squad(SquadId(2));
        assert_eq!(normalized_modules(&profile, &config), ModuleSet::SQUAD);
    }

    #[test]
    fn empty_chain_passes() {
        let modules = BrainModules::default();
        assert!(modules.attached().is_empty());
    }
}
