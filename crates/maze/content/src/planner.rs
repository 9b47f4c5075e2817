//! A* path planner over a [`GridWorld`].
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use maze_core::{GridPosition, PathPlanner, WorldOracle};

use crate::world::GridWorld;

const CARDINAL_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

fn heuristic(a: GridPosition, b: GridPosition, allow_diagonals: bool) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    if allow_diagonals {
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        DIAGONAL_COST * lo + CARDINAL_COST * (hi - lo)
    } else {
        CARDINAL_COST * (dx + dy)
    }
}

impl GridWorld {
    fn step_allowed(
        &self,
        from: GridPosition,
        to: GridPosition,
        goal: GridPosition,
        avoid: Option<&HashSet<GridPosition>>,
    ) -> bool {
        if !self.is_walkable(to) {
            return false;
        }
        if to != goal && avoid.is_some_and(|set| set.contains(&to)) {
            return false;
        }
        // No corner cutting: both orthogonal tiles of a diagonal step must be open.
        if from.x != to.x && from.y != to.y {
            return self.is_walkable(GridPosition::new(to.x, from.y))
                && self.is_walkable(GridPosition::new(from.x, to.y));
        }
        true
    }

    fn straight_walkable(&self, a: GridPosition, b: GridPosition) -> bool {
        let steps = a.chebyshev(b).max(1);
        (0..=steps).all(|i| {
            let t = f64::from(i) / f64::from(steps);
            let x = f64::from(a.x) + f64::from(b.x - a.x) * t;
            let y = f64::from(a.y) + f64::from(b.y - a.y) * t;
            self.is_walkable(GridPosition::new(x.round() as i32, y.round() as i32))
        })
    }
}

impl PathPlanner for GridWorld {
    fn find_path(
        &self,
        start: GridPosition,
        goal: GridPosition,
        allow_diagonals: bool,
        avoid: Option<&HashSet<GridPosition>>,
    ) -> Option<Vec<GridPosition>> {
        if start == goal {
            return Some(Vec::new());
        }
        if !self.is_walkable(goal) {
            return None;
        }

        let max_expansions = (self.width() * self.height()) as usize;
        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<GridPosition, GridPosition> = HashMap::new();
        let mut cost: HashMap<GridPosition, u32> = HashMap::new();
        let mut expansions = 0usize;

        cost.insert(start, 0);
        open.push(Reverse((heuristic(start, goal, allow_diagonals), 0u32, start)));

        while let Some(Reverse((_, g, current))) = open.pop() {
            if current == goal {
                let mut path = vec![current];
                let mut node = current;
                while let Some(&prev) = came_from.get(&node) {
                    if prev == start {
                        break;
                    }
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }
            if cost.get(&current).is_some_and(|&best| g > best) {
                continue;
            }
            expansions += 1;
            if expansions > max_expansions {
                return None;
            }

            let offsets: &[(i32, i32)] = if allow_diagonals {
                &GridPosition::KING_MOVES
            } else {
                &GridPosition::CARDINALS
            };
            for &(dx, dy) in offsets {
                let next = current.offset(dx, dy);
                if !self.step_allowed(current, next, goal, avoid) {
                    continue;
                }
                let step = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    CARDINAL_COST
                };
                let tentative = g + step;
                if cost.get(&next).is_none_or(|&best| tentative < best) {
                    cost.insert(next, tentative);
                    came_from.insert(next, current);
                    let f = tentative + heuristic(next, goal, allow_diagonals);
                    open.push(Reverse((f, tentative, next)));
                }
            }
        }
        None
    }

    /// Drops waypoints that can be skipped along a straight walkable line.
    fn smooth_path(&self, path: Vec<GridPosition>) -> Vec<GridPosition> {
        if path.len() < 3 {
            return path;
        }
        let mut smoothed = Vec::with_capacity(path.len());
        let mut anchor = path[0];
        smoothed.push(anchor);
        let mut i = 1;
        while i < path.len() {
            let mut furthest = i;
            while furthest + 1 < path.len() && self.straight_walkable(anchor, path[furthest + 1]) {
                furthest += 1;
            }
            anchor = path[furthest];
            smoothed.push(anchor);
            i = furthest + 1;
        }
        smoothed
    }
}
