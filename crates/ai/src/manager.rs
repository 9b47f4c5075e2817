//! Frame driver owning every agent and the squad blackboard.

use std::sync::Arc;

use maze_core::{
    AgentProfile, AiConfig, BrainCommand, GridPosition, MonsterId, MonsterView, NoiseEvent,
    PathPlanner, PlayerView, ScentEvent, WorldOracle,
};

use crate::agent::Agent;
use crate::brain::BrainState;
use crate::context::TickContext;
use crate::error::{AgentError, Result};
use crate::modules::apply_brain_modules;
use crate::perception::{can_hear, can_smell};
use crate::squad::SquadCoordinator;

/// Host-provided inputs for one simulation frame.
pub struct Frame<'a> {
    pub now: f64,
    pub dt: f64,
    pub world: &'a dyn WorldOracle,
    pub planner: Option<&'a dyn PathPlanner>,
    pub player: Option<&'a PlayerView>,
    /// Views of the managed monsters. Agents without a view are skipped.
    pub monsters: &'a [MonsterView],
}

/// Owns the agents and ticks them in insertion order.
///
/// # Frame order
///
/// Agents tick sequentially against one shared [`SquadCoordinator`]. Flank
/// leases and fire grants resolve immediately; target reports are staged and
/// only become visible once the frame ends with [`SquadCoordinator::commit`].
#[derive(Debug)]
pub struct AgentManager {
    config: Arc<AiConfig>,
    agents: Vec<Agent>,
    squad: SquadCoordinator,
}

impl AgentManager {
    pub fn new(config: Arc<AiConfig>) -> Self {
        let squad = SquadCoordinator::new(config.squad.clone());
        Self {
            config,
            agents: Vec::new(),
            squad,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn squad(&self) -> &SquadCoordinator {
        &self.squad
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn agent(&self, id: MonsterId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: MonsterId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    /// Agents currently in [`BrainState::Chase`].
    pub fn chasers(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.state() == BrainState::Chase)
            .count()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Validates the profile, builds its brain and attaches enabled modules.
    pub fn spawn(&mut self, id: MonsterId, profile: AgentProfile, home: GridPosition) -> Result<()> {
        profile.validate()?;
        if self.agent(id).is_some() {
            return Err(AgentError::DuplicateAgent(id));
        }

        let brain = profile.brain;
        let mut agent = Agent::new(id, profile, Arc::clone(&self.config), home);
        let modules = apply_brain_modules(&mut agent, &self.config.modules);
        tracing::debug!("spawned {} ({}) at {} with {} module(s)", id, brain, home, modules);
        self.agents.push(agent);
        Ok(())
    }

    pub fn remove(&mut self, id: MonsterId) -> Result<Agent> {
        let index = self
            .agents
            .iter()
            .position(|a| a.id() == id)
            .ok_or(AgentError::UnknownAgent(id))?;
        let agent = self.agents.remove(index);
        if let Some(squad) = agent.brain.core().profile().squad {
            self.squad.remove_member(squad, id);
        }
        tracing::debug!("removed {}", id);
        Ok(agent)
    }

    // ========================================================================
    // Stimuli
    // ========================================================================

    /// Delivers a noise to every agent that can hear it. Returns how many did.
    pub fn broadcast_noise(
        &mut self,
        world: &dyn WorldOracle,
        monsters: &[MonsterView],
        noise: NoiseEvent,
    ) -> usize {
        let perception = &self.config.perception;
        let mut heard = 0;
        for agent in &mut self.agents {
            let id = agent.id();
            let Some(view) = monsters.iter().find(|m| m.id == id) else {
                continue;
            };
            let range = agent.brain.core().hearing_range();
            if can_hear(world, view.grid, &noise, range, perception) {
                agent.brain.hear(noise);
                heard += 1;
            }
        }
        tracing::trace!("{} at {} heard by {}", noise.kind, noise.grid, heard);
        heard
    }

    /// Delivers a scent to every agent close enough to smell it.
    pub fn broadcast_scent(&mut self, monsters: &[MonsterView], scent: ScentEvent) -> usize {
        let range = self.config.perception.smell_range;
        let mut smelled = 0;
        for agent in &mut self.agents {
            let id = agent.id();
            let Some(view) = monsters.iter().find(|m| m.id == id) else {
                continue;
            };
            if can_smell(view.grid, &scent, range) {
                agent.brain.smell(scent);
                smelled += 1;
            }
        }
        smelled
    }

    /// Tells an agent it was hit, optionally from a known tile.
    pub fn notify_damage(&mut self, id: MonsterId, now: f64, source: Option<GridPosition>) -> Result<()> {
        let agent = self.agent_mut(id).ok_or(AgentError::UnknownAgent(id))?;
        agent.brain.on_damaged(now, source);
        agent.modules.on_damaged(now);
        Ok(())
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Ticks every agent once and commits the squad blackboard.
    pub fn tick(&mut self, frame: &Frame<'_>) -> Vec<(MonsterId, BrainCommand)> {
        let max_chasers = self.config.brain.max_chasers;
        let mut chasing = self.chasers();
        let mut commands = Vec::with_capacity(self.agents.len());

        for agent in &mut self.agents {
            let id = agent.id();
            let Some(view) = frame.monsters.iter().find(|m| m.id == id) else {
                tracing::trace!("{}: no view this frame", id);
                continue;
            };

            let was_chasing = agent.state() == BrainState::Chase;
            let mut ctx = TickContext {
                now: frame.now,
                dt: frame.dt,
                world: frame.world,
                planner: frame.planner,
                player: frame.player,
                monster: view,
                squad: &mut self.squad,
                chase_suppressed: !was_chasing && chasing >= max_chasers,
            };
            let command = agent.tick(&mut ctx);

            match (was_chasing, agent.state() == BrainState::Chase) {
                (false, true) => chasing += 1,
                (true, false) => chasing = chasing.saturating_sub(1),
                _ => {}
            }
            commands.push((id, command));
        }

        self.squad.commit(frame.now);
        self.squad.prune(frame.now);
        commands
    }
}
