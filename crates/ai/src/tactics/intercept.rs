//! Linear lead prediction.

use maze_core::GridPosition;

/// Predicts where a moving target will be when a chaser arrives.
///
/// The lead time is the chaser's travel time to the target's current tile,
/// capped at `horizon` seconds. The predicted tile is pulled back along the
/// target's motion until it lands on a walkable tile; when none does, the
/// target's current tile is returned.
///
/// # Arguments
///
/// * `target` - Current tile of the target
/// * `velocity` - Target velocity in tiles per second
/// * `chaser` - Current tile of the chaser
/// * `speed` - Chaser speed in tiles per second
/// * `horizon` - Maximum lead time in seconds
/// * `is_walkable` - Walkability query for predicted tiles
pub fn predict_intercept(
    target: GridPosition,
    velocity: (f64, f64),
    chaser: GridPosition,
    speed: f64,
    horizon: f64,
    is_walkable: impl Fn(GridPosition) -> bool,
) -> GridPosition {
    let (vx, vy) = velocity;
    if speed <= 0.0 || horizon <= 0.0 || (vx.abs() < 1e-6 && vy.abs() < 1e-6) {
        return target;
    }

    let lead = (target.euclidean(chaser) / speed).min(horizon);
    let steps = (lead * vx.abs().max(vy.abs())).ceil().max(1.0) as u32;

    // Walk back from the full lead towards the target.
    for step in (1..=steps).rev() {
        let t = lead * f64::from(step) / f64::from(steps);
        let predicted = target.offset((vx * t).round() as i32, (vy * t).round() as i32);
        if predicted != target && is_walkable(predicted) {
            return predicted;
        }
    }
    target
}
