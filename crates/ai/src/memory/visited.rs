//! Visit history used to bias exploration towards stale tiles.

use std::collections::HashMap;

use maze_core::GridPosition;

/// Score reported for tiles that were never visited (or were forgotten).
///
/// Sits above the `[0, 1]` range of visited tiles so unvisited tiles are
/// strictly preferred.
pub const UNVISITED_NOVELTY: f64 = 2.0;

/// Tile → last visit timestamp, pruned by TTL on every write.
#[derive(Clone, Debug)]
pub struct VisitedTiles {
    ttl: f64,
    visits: HashMap<GridPosition, f64>,
}

impl VisitedTiles {
    pub fn new(ttl: f64) -> Self {
        Self {
            ttl,
            visits: HashMap::new(),
        }
    }

    /// Records a visit and forgets every entry older than the TTL.
    pub fn record(&mut self, pos: GridPosition, now: f64) {
        let ttl = self.ttl;
        self.visits.retain(|_, at| now - *at <= ttl);
        self.visits.insert(pos, now);
    }

    pub fn last_visit(&self, pos: GridPosition) -> Option<f64> {
        self.visits.get(&pos).copied()
    }

    /// Whether `pos` was visited less than `window` seconds ago.
    pub fn visited_within(&self, pos: GridPosition, now: f64, window: f64) -> bool {
        self.last_visit(pos).is_some_and(|at| now - at < window)
    }

    /// `clamp01(age / ttl)` for known tiles, [`UNVISITED_NOVELTY`] otherwise.
    pub fn novelty(&self, pos: GridPosition, now: f64) -> f64 {
        match self.last_visit(pos) {
            None => UNVISITED_NOVELTY,
            Some(at) if now - at > self.ttl => UNVISITED_NOVELTY,
            Some(at) => ((now - at) / self.ttl).clamp(0.0, 1.0),
        }
    }

    pub fn ttl(&self) -> f64 {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn novelty_grows_with_age_and_unvisited_scores_highest() {
        let mut visited = VisitedTiles::new(10.0);
        let tile = GridPosition::new(1, 1);
        assert_eq!(visited.novelty(tile, 0.0), UNVISITED_NOVELTY);

        visited.record(tile, 0.0);
        assert_eq!(visited.novelty(tile, 0.0), 0.0);
        assert!((visited.novelty(tile, 5.0) - 0.5).abs() < 1e-9);
        assert_eq!(visited.novelty(tile, 10.0), 1.0);
        assert_eq!(visited.novelty(tile, 11.0), UNVISITED_NOVELTY);
    }

    #[test]
    fn writes_prune_expired_entries() {
        let mut visited = VisitedTiles::new(5.0);
        visited.record(GridPosition::new(0, 0), 0.0);
        visited.record(GridPosition::new(1, 0), 3.0);
        assert_eq!(visited.len(), 2);

        visited.record(GridPosition::new(2, 0), 6.0);
        assert_eq!(visited.len(), 2);
        assert!(visited.last_visit(GridPosition::new(0, 0)).is_none());
    }

    #[test]
    fn visited_within_window() {
        let mut visited = VisitedTiles::new(30.0);
        visited.record(GridPosition::ORIGIN, 1.0);
        assert!(visited.visited_within(GridPosition::ORIGIN, 2.0, 5.0));
        assert!(!visited.visited_within(GridPosition::ORIGIN, 7.0, 5.0));
        assert!(!visited.visited_within(GridPosition::new(3, 3), 2.0, 5.0));
    }
}
