//! Junction-biased local search sweep.

use std::cmp::Ordering;

use maze_core::{GridPosition, SearchConfig, WorldOracle};

use super::VisitedTiles;

/// Agent-owned exploration plan around one origin.
///
/// Generated once per origin/radius pair and consumed incrementally. Any
/// change of origin or radius throws the plan away.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchPlan {
    pub origin: GridPosition,
    pub radius: u32,
    pub preferred_dir: Option<(f64, f64)>,
    pub queue: Vec<GridPosition>,
    pub index: usize,
    pub next_pick_at: f64,
    pub target: Option<GridPosition>,
}

/// Per-tick inputs of [`SearchModule::tick`].
pub struct SearchInput<'a> {
    pub now: f64,
    pub monster: GridPosition,
    pub origin: GridPosition,
    /// Overrides the configured radius when set.
    pub radius: Option<u32>,
    /// Direction the target was last seen heading, grid units.
    pub preferred_dir: Option<(f64, f64)>,
    pub world: &'a dyn WorldOracle,
    pub visited: &'a VisitedTiles,
    pub visit_ttl: f64,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    pos: GridPosition,
    junction: bool,
    alignment: f64,
    degree: u8,
    distance: u32,
}

impl Candidate {
    /// Best first: junctions, then alignment, degree, distance, coordinates.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .junction
            .cmp(&self.junction)
            .then_with(|| other.alignment.total_cmp(&self.alignment))
            .then_with(|| other.degree.cmp(&self.degree))
            .then_with(|| other.distance.cmp(&self.distance))
            .then_with(|| self.pos.cmp(&other.pos))
    }
}

/// Deterministic search sweep.
///
/// Candidates within the radius are ranked once per plan; the agent walks
/// the queue in order, skipping tiles it visited recently, and starts over
/// once the queue is exhausted.
#[derive(Clone, Debug)]
pub struct SearchModule {
    config: SearchConfig,
    plan: Option<SearchPlan>,
}

impl SearchModule {
    pub fn new(config: SearchConfig) -> Self {
        Self { config, plan: None }
    }

    pub fn plan(&self) -> Option<&SearchPlan> {
        self.plan.as_ref()
    }

    pub fn reset(&mut self) {
        self.plan = None;
    }

    /// Returns the tile to head for, or `None` when nothing around the origin
    /// is walkable.
    pub fn tick(&mut self, input: &SearchInput<'_>) -> Option<GridPosition> {
        let radius = input.radius.unwrap_or(self.config.radius);
        let stale = self
            .plan
            .as_ref()
            .is_none_or(|p| p.origin != input.origin || p.radius != radius);
        if stale {
            self.plan = Some(self.build_plan(input, radius));
        }
        let repick_seconds = self.config.repick_seconds;
        let plan = self.plan.as_mut()?;

        if let Some(target) = plan.target {
            let reached = input.monster.manhattan(target) <= 1;
            if !reached && input.now < plan.next_pick_at {
                return Some(target);
            }
        }

        let next = Self::next_unvisited(plan, input).or_else(|| {
            tracing::debug!("search queue around {} exhausted; restarting sweep", plan.origin);
            plan.index = 0;
            Self::next_unvisited(plan, input).or_else(|| {
                let first = plan.queue.first().copied();
                plan.index = usize::from(first.is_some());
                first
            })
        });

        plan.target = next;
        plan.next_pick_at = input.now + repick_seconds;
        tracing::trace!("search target {:?}", next);
        next
    }

    fn next_unvisited(plan: &mut SearchPlan, input: &SearchInput<'_>) -> Option<GridPosition> {
        while plan.index < plan.queue.len() {
            let candidate = plan.queue[plan.index];
            plan.index += 1;
            if !input
                .visited
                .visited_within(candidate, input.now, input.visit_ttl)
            {
                return Some(candidate);
            }
        }
        None
    }

    fn build_plan(&self, input: &SearchInput<'_>, radius: u32) -> SearchPlan {
        let origin = input.origin;
        let dir = input.preferred_dir.and_then(|(x, y)| {
            let len = (x * x + y * y).sqrt();
            (len > 1e-6).then(|| (x / len, y / len))
        });

        let r = radius as i32;
        let mut candidates = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let pos = origin.offset(dx, dy);
                let distance = pos.manhattan(origin);
                if distance == 0 || distance > radius || !input.world.is_walkable(pos) {
                    continue;
                }
                let degree = input.world.walkable_degree(pos);
                let alignment = dir.map_or(0.0, |(ux, uy)| {
                    let len = f64::from(dx * dx + dy * dy).sqrt();
                    (f64::from(dx) * ux + f64::from(dy) * uy) / len
                });
                candidates.push(Candidate {
                    pos,
                    junction: degree >= 3,
                    alignment,
                    degree,
                    distance,
                });
            }
        }
        candidates.sort_by(Candidate::rank);
        candidates.truncate(self.config.queue_limit);

        tracing::debug!(
            "search plan around {} (radius {}): {} candidates",
            origin,
            radius,
            candidates.len()
        );

        SearchPlan {
            origin,
            radius,
            preferred_dir: input.preferred_dir,
            queue: candidates.into_iter().map(|c| c.pos).collect(),
            index: 0,
            next_pick_at: input.now,
            target: None,
        }
    }
}
