//! Fresh-stimulus intake shared by the brain variants.

use maze_core::{BrainConfig, GridPosition, Role};

use super::core::BrainCore;

/// Sense a stimulus came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Hearing,
    Smell,
}

/// A noise or scent the brain has not reacted to yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stimulus {
    pub sense: Sense,
    pub grid: GridPosition,
    /// Noise strength or scent intensity.
    pub strength: f64,
    pub priority: u8,
    pub at: f64,
}

impl Stimulus {
    /// Loud or strong enough to start an investigation for this role.
    pub fn investigates(&self, config: &BrainConfig, role: Role) -> bool {
        match self.sense {
            Sense::Hearing => self.strength >= config.noise_threshold_for(role),
            Sense::Smell => self.strength >= config.investigate_scent_threshold,
        }
    }

    /// Loud or strong enough to turn an investigation into a chase.
    pub fn escalates(&self, config: &BrainConfig) -> bool {
        match self.sense {
            Sense::Hearing => self.strength >= config.escalate_noise_threshold,
            Sense::Smell => self.strength >= config.escalate_scent_threshold,
        }
    }
}

/// Remembers which memory slots were already acted on.
#[derive(Clone, Debug)]
pub struct StimulusTracker {
    noise_handled_at: f64,
    scent_handled_at: f64,
}

impl Default for StimulusTracker {
    fn default() -> Self {
        Self {
            noise_handled_at: f64::NEG_INFINITY,
            scent_handled_at: f64::NEG_INFINITY,
        }
    }
}

impl StimulusTracker {
    /// Returns the unhandled stimulus worth reacting to and marks both slots
    /// handled. Each candidate is judged against its own sense's threshold,
    /// so a quiet noise never hides a strong scent. Among the survivors an
    /// escalating stimulus wins, then noise over scent.
    pub fn take_fresh(&mut self, core: &BrainCore) -> Option<Stimulus> {
        let noise = core
            .memory()
            .noise()
            .filter(|n| n.heard_at > self.noise_handled_at)
            .map(|n| Stimulus {
                sense: Sense::Hearing,
                grid: n.grid,
                strength: n.strength,
                priority: n.priority,
                at: n.heard_at,
            });
        let scent = core
            .memory()
            .scent()
            .filter(|s| s.smelled_at > self.scent_handled_at)
            .map(|s| Stimulus {
                sense: Sense::Smell,
                grid: s.grid,
                strength: s.intensity,
                priority: 0,
                at: s.smelled_at,
            });

        if let Some(n) = noise {
            self.noise_handled_at = n.at;
        }
        if let Some(s) = scent {
            self.scent_handled_at = s.at;
        }

        let config = core.brain_config();
        let role = core.role();
        [noise, scent]
            .into_iter()
            .flatten()
            .filter(|s| {
                let passes = s.investigates(config, role);
                if !passes {
                    tracing::trace!("{}: ignoring weak {:?} at {}", core.id(), s.sense, s.grid);
                }
                passes
            })
            .min_by_key(|s| !s.escalates(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{AgentProfile, AiConfig, BrainKind, MonsterId, NoiseEvent, NoiseKind, ScentEvent};
    use std::sync::Arc;

    #[test]
    fn each_stimulus_is_taken_once() {
        let mut core = BrainCore::new(
            MonsterId(1),
            AgentProfile::new(BrainKind::RoomHunter, Role::Default),
            Arc::new(AiConfig::default()),
            GridPosition::ORIGIN,
        );
        let mut tracker = StimulusTracker::default();
        core.memory_mut()
            .hear(NoiseEvent::new(NoiseKind::Door, GridPosition::new(3, 3), 1.0));
        core.memory_mut()
            .smell(ScentEvent::new(GridPosition::new(1, 1), 0.5, 1.0));

        let first = tracker.take_fresh(&core).unwrap();
        assert_eq!(first.sense, Sense::Hearing);
        assert!(tracker.take_fresh(&core).is_none());

        core.memory_mut()
            .smell(ScentEvent::new(GridPosition::new(2, 2), 0.9, 2.0));
        assert_eq!(tracker.take_fresh(&core).unwrap().sense, Sense::Smell);
    }

    #[test]
    fn thresholds_depend_on_role_and_sense() {
        let config = BrainConfig::default();
        let quiet = Stimulus {
            sense: Sense::Hearing,
            grid: GridPosition::ORIGIN,
            strength: 0.35,
            priority: 0,
            at: 0.0,
        };
        assert!(quiet.investigates(&config, Role::Leader));
        assert!(!quiet.investigates(&config, Role::Cover));
        assert!(!quiet.escalates(&config));

        let shot = Stimulus {
            strength: 1.0,
            ..quiet
        };
        assert!(shot.escalates(&config));
    }

    fn core(role: Role) -> BrainCore {
        BrainCore::new(
            MonsterId(1),
            AgentProfile::new(BrainKind::RoomHunter, role),
            Arc::new(AiConfig::default()),
            GridPosition::ORIGIN,
        )
    }

    #[test]
    fn quiet_noise_does_not_hide_a_strong_scent() {
        let mut core = core(Role::Cover);
        let mut tracker = StimulusTracker::default();
        core.memory_mut()
            .hear(NoiseEvent::new(NoiseKind::Footstep, GridPosition::new(3, 3), 0.0));
        core.memory_mut()
            .smell(ScentEvent::new(GridPosition::new(5, 5), 0.6, 0.0));

        let taken = tracker.take_fresh(&core).unwrap();
        assert_eq!(taken.sense, Sense::Smell);
        assert_eq!(taken.grid, GridPosition::new(5, 5));
        assert!(tracker.take_fresh(&core).is_none());
    }

    #[test]
    fn below_threshold_stimuli_are_dropped() {
        let mut core = core(Role::Cover);
        let mut tracker = StimulusTracker::default();
        core.memory_mut()
            .hear(NoiseEvent::new(NoiseKind::Footstep, GridPosition::new(3, 3), 0.0));
        core.memory_mut()
            .smell(ScentEvent::new(GridPosition::new(5, 5), 0.1, 0.0));
        assert!(tracker.take_fresh(&core).is_none());
    }

    #[test]
    fn escalating_stimulus_wins_over_plain_noise() {
        let mut core = core(Role::Default);
        let mut tracker = StimulusTracker::default();
        core.memory_mut()
            .hear(NoiseEvent::new(NoiseKind::Door, GridPosition::new(3, 3), 0.0));
        core.memory_mut()
            .smell(ScentEvent::new(GridPosition::new(5, 5), 0.9, 0.0));
        assert_eq!(tracker.take_fresh(&core).unwrap().sense, Sense::Smell);
    }
}
