//! Target confidence accumulator.

use maze_core::BrainConfig;

/// Continuous `[0, 1]` certainty about where the target is.
///
/// Rises while the target is visible, decays otherwise; decay slows while a
/// recent noise or scent backs the belief. Chase timeout and sprint distance
/// scale with it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetConfidence(f64);

impl TargetConfidence {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn update(&mut self, dt: f64, visible: bool, stimulus_recent: bool, config: &BrainConfig) {
        let dt = dt.max(0.0);
        let delta = if visible {
            config.confidence_gain_per_second * dt
        } else if stimulus_recent {
            -config.confidence_stimulus_decay_per_second * dt
        } else {
            -config.confidence_decay_per_second * dt
        };
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
    }

    /// Sets the value directly, e.g. after a loud escalation.
    pub fn raise_to(&mut self, value: f64) {
        self.0 = self.0.max(value.clamp(0.0, 1.0));
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }

    /// Seconds without sight before a chase gives up.
    pub fn chase_timeout(self, config: &BrainConfig) -> f64 {
        let min = config.min_chase_timeout_seconds;
        min + (config.chase_timeout_seconds - min) * self.0
    }

    /// Distance to the goal within which a chaser sprints.
    pub fn sprint_distance(self, config: &BrainConfig) -> f64 {
        config.sprint_distance + config.sprint_confidence_bonus * self.0
    }
}
