//! Investigation variant that sweeps the area around the stimulus on arrival.

use maze_core::{GridPosition, InvestigationConfig, WorldOracle};
use rand::Rng;
use rand::RngCore;

use super::{InvestigationStatus, InvestigationTick};

/// Attempts made to draw a walkable tile around the origin per resample.
const SAMPLE_ATTEMPTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Travel,
    Search,
    Done,
}

/// Older investigation lifecycle: `Idle → Travel → Search → Done`.
///
/// Instead of pausing at the origin, the agent keeps moving between random
/// walkable tiles within `search_radius` of it, picking a new one whenever the
/// current sample is reached or `resample_seconds` have passed, until the
/// investigation expires.
#[derive(Clone, Debug)]
pub struct NoiseInvestigationModule {
    config: InvestigationConfig,
    enabled: bool,
    phase: Phase,
    origin: Option<GridPosition>,
    priority: u8,
    started_at: f64,
    arrived_at: Option<f64>,
    duration: f64,
    sample: Option<GridPosition>,
    next_sample_at: f64,
    last: InvestigationTick,
}

impl NoiseInvestigationModule {
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
            sample: None,
            next_sample_at: 0.0,
            last: InvestigationTick::idle(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Same restart rule as [`super::InvestigateModule::begin`].
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
        let active = matches!(self.phase, Phase::Travel | Phase::Search);
        if active && priority <= self.priority && self.origin == Some(target) {
            return false;
        }

        tracing::debug!("noise investigation begin at {} (priority {})", target, priority);
        self.phase = Phase::Travel;
        self.origin = Some(target);
        self.priority = priority;
        self.started_at = now;
        self.arrived_at = None;
        self.duration = duration.unwrap_or(self.config.duration_seconds);
        self.sample = None;
        true
    }

    pub fn tick(
        &mut self,
        now: f64,
        monster: GridPosition,
        world: &dyn WorldOracle,
        rng: &mut dyn RngCore,
    ) -> InvestigationTick {
        self.last = self.evaluate(now, monster, world, rng);
        self.last
    }

    fn evaluate(
        &mut self,
        now: f64,
        monster: GridPosition,
        world: &dyn WorldOracle,
        rng: &mut dyn RngCore,
    ) -> InvestigationTick {
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
                    self.phase = Phase::Done;
                    return InvestigationTick::new(InvestigationStatus::Done, None);
                }
                if monster.manhattan(origin) > 1 {
                    return InvestigationTick::new(InvestigationStatus::Travel, Some(origin));
                }
                self.arrived_at = Some(now);
                self.phase = Phase::Search;
                self.resample(now, origin, world, rng);
                InvestigationTick::new(InvestigationStatus::Investigate, self.sample)
            }
            Phase::Search => {
                let arrived = self.arrived_at.unwrap_or(now);
                if now > arrived + self.duration {
                    tracing::debug!("noise investigation at {} expired", origin);
                    self.phase = Phase::Done;
                    return InvestigationTick::new(InvestigationStatus::Done, None);
                }
                let reached = self.sample.is_none_or(|s| monster.manhattan(s) <= 1);
                if reached || now >= self.next_sample_at {
                    self.resample(now, origin, world, rng);
                }
                InvestigationTick::new(InvestigationStatus::Investigate, self.sample)
            }
        }
    }

    fn resample(
        &mut self,
        now: f64,
        origin: GridPosition,
        world: &dyn WorldOracle,
        rng: &mut dyn RngCore,
    ) {
        let radius = self.config.search_radius as i32;
        let picked = (0..SAMPLE_ATTEMPTS).find_map(|_| {
            let candidate = origin.offset(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            );
            (candidate.manhattan(origin) <= self.config.search_radius
                && world.is_walkable(candidate))
            .then_some(candidate)
        });
        self.sample = Some(picked.unwrap_or(origin));
        self.next_sample_at = now + self.config.resample_seconds;
        tracing::trace!("noise investigation sample {:?}", self.sample);
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.origin = None;
        self.priority = 0;
        self.arrived_at = None;
        self.sample = None;
        self.last = InvestigationTick::idle();
    }

    pub fn is_active(&self) -> bool {
        self.enabled && matches!(self.phase, Phase::Travel | Phase::Search)
    }

    pub fn origin(&self) -> Option<GridPosition> {
        self.origin
    }

    pub fn last(&self) -> InvestigationTick {
        self.last
    }
}
