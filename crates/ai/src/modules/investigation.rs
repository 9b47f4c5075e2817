//! Investigation capability attached to a brain.

use maze_core::{AiConfig, GridPosition, MonsterId, WorldOracle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::memory::{Investigation, InvestigationTick};

/// An [`Investigation`] plus the RNG its sweeping variant draws from.
#[derive(Clone, Debug)]
pub struct InvestigationModule {
    inner: Investigation,
    rng: ChaCha8Rng,
}

impl InvestigationModule {
    pub fn new(config: &AiConfig, id: MonsterId) -> Self {
        Self {
            inner: Investigation::from_config(&config.investigation),
            rng: ChaCha8Rng::seed_from_u64(config.seed.rotate_right(7) ^ u64::from(id.0)),
        }
    }

    pub fn begin(
        &mut self,
        target: GridPosition,
        now: f64,
        priority: u8,
        duration: Option<f64>,
    ) -> bool {
        self.inner.begin(target, now, priority, duration)
    }

    pub fn tick(&mut self, now: f64, monster: GridPosition, world: &dyn WorldOracle) -> InvestigationTick {
        self.inner.tick(now, monster, world, &mut self.rng)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.inner.set_enabled(enabled);
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    pub fn origin(&self) -> Option<GridPosition> {
        self.inner.origin()
    }

    pub fn last(&self) -> InvestigationTick {
        self.inner.last()
    }

    pub fn inner(&self) -> &Investigation {
        &self.inner
    }
}
