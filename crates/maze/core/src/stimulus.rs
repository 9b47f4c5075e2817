//! Sound and smell stimuli.

use crate::grid::GridPosition;

/// Category of a noise. Each kind carries a default priority and loudness.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum NoiseKind {
    Footstep,
    Door,
    Pickup,
    Gunshot,
    Explosion,
    /// Another monster calling out a sighting.
    Alert,
}

impl NoiseKind {
    pub const fn default_priority(self) -> u8 {
        match self {
            NoiseKind::Footstep => 0,
            NoiseKind::Door | NoiseKind::Pickup => 1,
            NoiseKind::Alert => 2,
            NoiseKind::Gunshot => 3,
            NoiseKind::Explosion => 4,
        }
    }

    pub const fn default_strength(self) -> f64 {
        match self {
            NoiseKind::Footstep => 0.4,
            NoiseKind::Door | NoiseKind::Pickup => 0.6,
            NoiseKind::Alert => 0.8,
            NoiseKind::Gunshot => 1.0,
            NoiseKind::Explosion => 1.5,
        }
    }
}

/// A heard noise, stored in a single-slot memory per agent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseEvent {
    pub kind: NoiseKind,
    pub grid: GridPosition,
    pub priority: u8,
    pub strength: f64,
    pub heard_at: f64,
}

impl NoiseEvent {
    /// Event with the kind's default priority and strength.
    pub fn new(kind: NoiseKind, grid: GridPosition, heard_at: f64) -> Self {
        Self {
            kind,
            grid,
            priority: kind.default_priority(),
            strength: kind.default_strength(),
            heard_at,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Whether `self` should replace `current` in a single-slot memory:
    /// strictly higher priority wins, otherwise equal priority and more recent.
    pub fn supersedes(&self, current: &NoiseEvent) -> bool {
        self.priority > current.priority
            || (self.priority == current.priority && self.heard_at >= current.heard_at)
    }
}

/// A smelled trail point. Intensity decay is the host's responsibility.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScentEvent {
    pub grid: GridPosition,
    pub intensity: f64,
    pub smelled_at: f64,
}

impl ScentEvent {
    pub fn new(grid: GridPosition, intensity: f64, smelled_at: f64) -> Self {
        Self {
            grid,
            intensity,
            smelled_at,
        }
    }

    /// Stronger scent wins; equal intensity falls back to recency.
    pub fn supersedes(&self, current: &ScentEvent) -> bool {
        self.intensity > current.intensity
            || (self.intensity == current.intensity && self.smelled_at >= current.smelled_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_beats_recency() {
        let n1 = NoiseEvent::new(NoiseKind::Door, GridPosition::new(1, 1), 0.0).with_priority(1);
        let n2 = NoiseEvent::new(NoiseKind::Footstep, GridPosition::new(2, 2), 1.0).with_priority(0);
        let n3 = NoiseEvent::new(NoiseKind::Door, GridPosition::new(3, 3), 1.0).with_priority(1);
        assert!(!n2.supersedes(&n1));
        assert!(n3.supersedes(&n1));
    }
}
