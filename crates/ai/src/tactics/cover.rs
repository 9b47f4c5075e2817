//! Cover selection.

use maze_core::{GridPosition, PathPlanner, TacticsConfig, WorldOracle};
use rand::Rng;
use rand::RngCore;

/// Inputs shared by cover queries.
pub struct CoverQuery<'a> {
    pub agent: GridPosition,
    pub threat: GridPosition,
    pub world: &'a dyn WorldOracle,
    pub planner: Option<&'a dyn PathPlanner>,
    pub allow_diagonals: bool,
}

impl CoverQuery<'_> {
    /// Walkable and, when a planner is available, reachable from the agent.
    pub fn reachable(&self, tile: GridPosition) -> bool {
        if !self.world.is_walkable(tile) {
            return false;
        }
        if tile == self.agent {
            return true;
        }
        match self.planner {
            Some(planner) => planner
                .find_path(self.agent, tile, self.allow_diagonals, None)
                .is_some(),
            None => true,
        }
    }
}

/// Samples tiles around the agent and returns the best one that breaks line
/// of sight to the threat.
///
/// Score: `-dist_to_agent * near_weight + dist_to_threat * far_weight + jitter`.
/// Returns `None` when no sample qualifies.
pub fn find_cover(
    query: &CoverQuery<'_>,
    config: &TacticsConfig,
    rng: &mut dyn RngCore,
) -> Option<GridPosition> {
    let radius = config.cover_radius as i32;
    let mut best: Option<(f64, GridPosition)> = None;

    for _ in 0..config.cover_samples {
        let candidate = query.agent.offset(
            rng.gen_range(-radius..=radius),
            rng.gen_range(-radius..=radius),
        );
        if candidate.manhattan(query.agent) > config.cover_radius
            || candidate == query.threat
            || !query.world.is_walkable(candidate)
            || query.world.has_line_of_sight(candidate, query.threat)
        {
            continue;
        }

        let jitter = rng.gen_range(0.0..=1.0) * config.jitter;
        let score = -f64::from(candidate.manhattan(query.agent)) * config.cover_near_weight
            + f64::from(candidate.manhattan(query.threat)) * config.cover_far_weight
            + jitter;

        if best.is_some_and(|(s, _)| s >= score) {
            continue;
        }
        // Path queries are the expensive part; only run them for improvements.
        if query.reachable(candidate) {
            best = Some((score, candidate));
        }
    }

    tracing::trace!(
        "cover for {} against {}: {:?}",
        query.agent,
        query.threat,
        best
    );
    best.map(|(_, tile)| tile)
}
