//! Travel-to-stimulus-then-look-around investigation.

use maze_core::{GridPosition, InvestigationConfig};

use super::{InvestigationStatus, InvestigationTick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Travel,
    Pause,
    Done,
}

/// Investigation lifecycle: `Idle → Travel → Pause → Done`.
///
/// The agent walks to the stimulus origin, stands there for a short pause to
/// "look around", and is done. The whole investigation aborts once it has run
/// for longer than its duration, measured from arrival (or from the start
/// while still travelling, so an unreachable origin cannot pin the agent).
#[derive(Clone, Debug)]
pub struct InvestigateModule {
    config: InvestigationConfig,
    enabled: bool,
    phase: Phase,
    origin: Option<GridPosition>,
    priority: u8,
    started_at: f64,
    arrived_at: Option<f64>,
    duration: f64,
    last: InvestigationTick,
}

impl InvestigateModule {
    pub fn new(config: InvestigationConfig) -> Self {
        let duration = config.duration_seconds;
        Self {
            config,
            enabled: true,
            phase: Phase::Idle,
            origin: None,
            priority: 0,
            started_at: 0.0,
            arrived_at: None,
            duration,
            last: InvestigationTick::idle(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Starts or restarts an investigation of `target`.
    ///
    /// An active investigation is only replaced by a strictly higher
    /// priority stimulus or a different origin. Returns true when started.
    pub fn begin(
        &mut self,
        target: GridPosition,
        now: f64,
        priority: u8,
        duration: Option<f64>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let active = matches!(self.phase, Phase::Travel | Phase::Pause);
        if active && priority <= self.priority && self.origin == Some(target) {
            return false;
        }

        tracing::debug!(
            "investigation begin at {} (priority {}, replacing {:?})",
            target,
            priority,
            self.origin
        );
        self.phase = Phase::Travel;
        self.origin = Some(target);
        self.priority = priority;
        self.started_at = now;
        self.arrived_at = None;
        self.duration = duration.unwrap_or(self.config.duration_seconds);
        true
    }

    pub fn tick(&mut self, now: f64, monster: GridPosition) -> InvestigationTick {
        self.last = self.evaluate(now, monster);
        self.last
    }

    fn evaluate(&mut self, now: f64, monster: GridPosition) -> InvestigationTick {
        if !self.enabled {
            return InvestigationTick::new(InvestigationStatus::Disabled, None);
        }
        let Some(origin) = self.origin else {
            return InvestigationTick::idle();
        };

        match self.phase {
            Phase::Idle => InvestigationTick::idle(),
            Phase::Done => InvestigationTick::new(InvestigationStatus::Done, None),
            Phase::Travel => {
                if now > self.started_at + self.duration {
                    return self.finish("expired while travelling");
                }
                if monster.manhattan(origin) > 1 {
                    return InvestigationTick::new(InvestigationStatus::Travel, Some(origin));
                }
                self.arrived_at = Some(now);
                self.phase = Phase::Pause;
                InvestigationTick::new(InvestigationStatus::Pause, Some(origin))
            }
            Phase::Pause => {
                let arrived = self.arrived_at.unwrap_or(now);
                if now > arrived + self.duration {
                    return self.finish("expired");
                }
                if now >= arrived + self.config.pause_seconds {
                    return self.finish("look-around finished");
                }
                InvestigationTick::new(InvestigationStatus::Pause, Some(origin))
            }
        }
    }

    fn finish(&mut self, reason: &str) -> InvestigationTick {
        tracing::debug!("investigation at {:?} done: {}", self.origin, reason);
        self.phase = Phase::Done;
        InvestigationTick::new(InvestigationStatus::Done, None)
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.origin = None;
        self.priority = 0;
        self.arrived_at = None;
        self.last = InvestigationTick::idle();
    }

    pub fn is_active(&self) -> bool {
        self.enabled && matches!(self.phase, Phase::Travel | Phase::Pause)
    }

    pub fn origin(&self) -> Option<GridPosition> {
        self.origin
    }

    /// Result of the most recent [`Self::tick`].
    pub fn last(&self) -> InvestigationTick {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> InvestigateModule {
        InvestigateModule::new(InvestigationConfig {
            duration_seconds: 5.0,
            pause_seconds: 1.0,
            ..InvestigationConfig::default()
        })
    }

    #[test]
    fn travel_pause_done() {
        let mut m = module();
        let origin = GridPosition::new(5, 0);
        assert!(m.begin(origin, 0.0, 1, None));

        let t = m.tick(0.1, GridPosition::new(0, 0));
        assert_eq!(t.status, InvestigationStatus::Travel);
        assert_eq!(t.target, Some(origin));

        let t = m.tick(1.0, GridPosition::new(4, 0));
        assert_eq!(t.status, InvestigationStatus::Pause);

        let t = m.tick(1.5, GridPosition::new(4, 0));
        assert_eq!(t.status, InvestigationStatus::Pause);

        let t = m.tick(2.1, GridPosition::new(4, 0));
        assert_eq!(t.status, InvestigationStatus::Done);
        assert!(!m.is_active());
    }

    #[test]
    fn only_higher_priority_or_new_origin_restarts() {
        let mut m = module();
        let origin = GridPosition::new(5, 0);
        assert!(m.begin(origin, 0.0, 2, None));
        assert!(!m.begin(origin, 0.5, 2, None));
        assert!(!m.begin(origin, 0.5, 1, None));
        assert!(m.begin(origin, 0.5, 3, None));
        assert!(m.begin(GridPosition::new(1, 1), 0.6, 0, None));
        assert_eq!(m.origin(), Some(GridPosition::new(1, 1)));
    }

    #[test]
    fn unreachable_origin_expires() {
        let mut m = module();
        m.begin(GridPosition::new(50, 50), 0.0, 1, Some(2.0));
        assert_eq!(m.tick(1.0, GridPosition::ORIGIN).status, InvestigationStatus::Travel);
        assert_eq!(m.tick(2.5, GridPosition::ORIGIN).status, InvestigationStatus::Done);
    }

    #[test]
    fn disabled_module_reports_disabled() {
        let mut m = module();
        m.set_enabled(false);
        assert!(!m.begin(GridPosition::ORIGIN, 0.0, 5, None));
        assert_eq!(m.tick(0.0, GridPosition::ORIGIN).status, InvestigationStatus::Disabled);
    }
}
