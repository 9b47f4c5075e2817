//! Single-slot noise and scent memory.

use maze_core::{MemoryConfig, NoiseEvent, ScentEvent};

/// Last heard noise and last smelled scent of one agent.
///
/// Each slot holds at most one event. A new event replaces the stored one
/// only if it supersedes it (higher priority, else same priority and more
/// recent). Events older than the configured memory span are forgotten.
#[derive(Clone, Debug, Default)]
pub struct StimulusMemory {
    noise: Option<NoiseEvent>,
    scent: Option<ScentEvent>,
}

impl StimulusMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a noise to the slot. Returns true when it was stored.
    pub fn hear(&mut self, event: NoiseEvent) -> bool {
        match &self.noise {
            Some(current) if !event.supersedes(current) => false,
            _ => {
                self.noise = Some(event);
                true
            }
        }
    }

    /// Offers a scent to the slot. Returns true when it was stored.
    pub fn smell(&mut self, event: ScentEvent) -> bool {
        match &self.scent {
            Some(current) if !event.supersedes(current) => false,
            _ => {
                self.scent = Some(event);
                true
            }
        }
    }

    /// Drops events that aged out of memory.
    pub fn forget_stale(&mut self, now: f64, config: &MemoryConfig) {
        if self
            .noise
            .is_some_and(|n| now - n.heard_at > config.noise_memory_seconds)
        {
            self.noise = None;
        }
        if self
            .scent
            .is_some_and(|s| now - s.smelled_at > config.scent_memory_seconds)
        {
            self.scent = None;
        }
    }

    pub fn noise(&self) -> Option<&NoiseEvent> {
        self.noise.as_ref()
    }

    pub fn scent(&self) -> Option<&ScentEvent> {
        self.scent.as_ref()
    }

    /// Whether any stimulus arrived within `window` seconds of `now`.
    pub fn has_recent(&self, now: f64, window: f64) -> bool {
        self.noise.is_some_and(|n| now - n.heard_at <= window)
            || self.scent.is_some_and(|s| now - s.smelled_at <= window)
    }

    pub fn clear_noise(&mut self) {
        self.noise = None;
    }

    pub fn clear_scent(&mut self) {
        self.scent = None;
    }

    pub fn clear(&mut self) {
        self.noise = None;
        self.scent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{GridPosition, NoiseKind};

    fn noise(priority: u8, at: f64, x: i32) -> NoiseEvent {
        NoiseEvent::new(NoiseKind::Door, GridPosition::new(x, 0), at).with_priority(priority)
    }

    #[test]
    fn priority_strictly_wins_over_recency() {
        let mut memory = StimulusMemory::new();
        assert!(memory.hear(noise(1, 0.0, 1)));
        assert!(!memory.hear(noise(0, 1.0, 2)));
        assert_eq!(memory.noise().unwrap().grid, GridPosition::new(1, 0));
    }

    #[test]
    fn equal_priority_takes_the_more_recent() {
        let mut memory = StimulusMemory::new();
        memory.hear(noise(1, 0.0, 1));
        assert!(memory.hear(noise(1, 1.0, 3)));
        assert_eq!(memory.noise().unwrap().grid, GridPosition::new(3, 0));
    }

    #[test]
    fn stale_events_are_forgotten() {
        let config = MemoryConfig::default();
        let mut memory = StimulusMemory::new();
        memory.hear(noise(4, 0.0, 1));
        memory.smell(ScentEvent::new(GridPosition::new(2, 2), 0.9, 0.0));

        memory.forget_stale(config.noise_memory_seconds - 0.1, &config);
        assert!(memory.noise().is_some());

        memory.forget_stale(config.noise_memory_seconds + 0.1, &config);
        assert!(memory.noise().is_none());
        assert!(memory.scent().is_some());

        // Once forgotten, a low-priority noise is accepted again.
        assert!(memory.hear(noise(0, 7.0, 5)));
    }

    #[test]
    fn recent_window() {
        let mut memory = StimulusMemory::new();
        assert!(!memory.has_recent(0.0, 3.0));
        memory.smell(ScentEvent::new(GridPosition::ORIGIN, 0.5, 10.0));
        assert!(memory.has_recent(12.0, 3.0));
        assert!(!memory.has_recent(14.0, 3.0));
    }
}
