//! Flank ring selection.

use std::f64::consts::TAU;

use maze_core::{GridPosition, TacticsConfig};
use rand::Rng;
use rand::RngCore;

use super::cover::CoverQuery;
use crate::perception::{grid_yaw, wrap_angle};

/// Ring candidates checked for reachability, best first.
const REACHABILITY_CHECKS: usize = 4;

/// Angle (grid yaw) a flank slot aims for around the target.
pub fn preferred_angle(slot: usize, slot_count: usize) -> f64 {
    let count = slot_count.max(1);
    wrap_angle((slot % count) as f64 * TAU / count as f64)
}

/// Walkable tiles at manhattan distance `[min, max]` from `center`.
pub fn ring_tiles(
    center: GridPosition,
    min: u32,
    max: u32,
    is_walkable: impl Fn(GridPosition) -> bool,
) -> Vec<GridPosition> {
    let r = max as i32;
    let mut tiles = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let tile = center.offset(dx, dy);
            let d = tile.manhattan(center);
            if d >= min && d <= max && is_walkable(tile) {
                tiles.push(tile);
            }
        }
    }
    tiles
}

/// Picks a ring tile around `query.threat` closest in angle to the slot's
/// preferred angle, with a small random perturbation.
pub fn pick_flank(
    query: &CoverQuery<'_>,
    slot: usize,
    config: &TacticsConfig,
    rng: &mut dyn RngCore,
) -> Option<GridPosition> {
    let preferred = preferred_angle(slot, config.flank_slots);
    let mut scored: Vec<(f64, GridPosition)> = ring_tiles(
        query.threat,
        config.flank_min_dist,
        config.flank_max_dist,
        |t| query.world.is_walkable(t),
    )
    .into_iter()
    .map(|tile| {
        let off = wrap_angle(grid_yaw(query.threat, tile) - preferred).abs();
        let jitter = rng.gen_range(0.0..=1.0) * config.jitter;
        (-off + jitter, tile)
    })
    .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let pick = scored
        .iter()
        .take(REACHABILITY_CHECKS)
        .find(|(_, tile)| query.reachable(*tile))
        .map(|(_, tile)| *tile);
    tracing::trace!("flank slot {} around {}: {:?}", slot, query.threat, pick);
    pick
}
