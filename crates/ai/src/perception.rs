//! Perception oracle: stateless vision, hearing and smell gates.
//!
//! Every function here is a pure function of its inputs plus the two world
//! queries it makes (dark zones / smoke and line of sight). Calling one twice
//! with the same inputs gives the same answer.

use std::f64::consts::PI;

use maze_core::{
    GridPosition, MonsterStatus, NoiseEvent, PerceptionConfig, ScentEvent, WorldOracle, WorldPoint,
};

/// Optional inputs to [`can_see_player`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisionOptions {
    /// Observer facing, `atan2(dx, dz)` convention.
    pub monster_yaw: Option<f64>,
    /// Full field of view in degrees.
    pub vision_fov_deg: Option<f64>,
    /// Skip the line-of-sight oracle when false.
    pub require_line_of_sight: bool,
    pub status: MonsterStatus,
}

impl Default for VisionOptions {
    fn default() -> Self {
        Self {
            monster_yaw: None,
            vision_fov_deg: None,
            require_line_of_sight: true,
            status: MonsterStatus::default(),
        }
    }
}

impl VisionOptions {
    pub fn facing(mut self, yaw: f64, fov_deg: f64) -> Self {
        self.monster_yaw = Some(yaw);
        self.vision_fov_deg = Some(fov_deg);
        self
    }

    pub fn with_status(mut self, status: MonsterStatus) -> Self {
        self.status = status;
        self
    }

    pub fn without_line_of_sight(mut self) -> Self {
        self.require_line_of_sight = false;
        self
    }
}

#[inline]
pub fn manhattan(a: GridPosition, b: GridPosition) -> u32 {
    a.manhattan(b)
}

/// Wraps an angle into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Yaw from `from` towards `to`: `atan2(dx, dz)`.
pub fn yaw_between(from: WorldPoint, to: WorldPoint) -> f64 {
    (to.x - from.x).atan2(to.z - from.z)
}

/// Yaw between two tiles, grid `y` standing in for world `z`.
pub fn grid_yaw(from: GridPosition, to: GridPosition) -> f64 {
    f64::from(to.x - from.x).atan2(f64::from(to.y - from.y))
}

fn clamp_mult(mult: f64) -> f64 {
    mult.clamp(PerceptionConfig::VISION_MULT_FLOOR, 1.0)
}

/// Vision multiplier contributed by dark zones covering `observer`.
///
/// Overlapping zones do not stack; the darkest one wins.
pub fn darkness_multiplier(
    world: &dyn WorldOracle,
    observer: GridPosition,
    config: &PerceptionConfig,
) -> f64 {
    world
        .dark_zones()
        .iter()
        .filter(|zone| zone.area.contains(observer))
        .map(|zone| clamp_mult(zone.vision_mult.unwrap_or(config.dark_vision_mult)))
        .fold(1.0, f64::min)
}

/// Vision range after debuffs. Never larger than `base_range`.
pub fn effective_vision_range(
    world: &dyn WorldOracle,
    observer: GridPosition,
    base_range: f64,
    status: MonsterStatus,
    config: &PerceptionConfig,
) -> f64 {
    let mut range = base_range;
    if status.perception_jammed {
        range *= clamp_mult(config.jam_vision_mult);
    }
    range * darkness_multiplier(world, observer, config)
}

/// Whether an observer at `observer` perceives a target at `target`.
///
/// Gates, each a short circuit: effective range, blindness, line of sight,
/// field of view, smoke.
pub fn can_see_player(
    world: &dyn WorldOracle,
    observer: GridPosition,
    target: GridPosition,
    vision_range: u32,
    options: &VisionOptions,
    config: &PerceptionConfig,
) -> bool {
    let range = effective_vision_range(
        world,
        observer,
        f64::from(vision_range),
        options.status,
        config,
    );
    if f64::from(observer.manhattan(target)) > range {
        return false;
    }

    if options.status.blinded {
        return false;
    }

    if options.require_line_of_sight && !world.has_line_of_sight(observer, target) {
        return false;
    }

    if let (Some(yaw), Some(fov)) = (options.monster_yaw, options.vision_fov_deg) {
        if fov < 360.0 && observer != target {
            let angle = grid_yaw(observer, target);
            let half = fov.to_radians() / 2.0;
            if wrap_angle(angle - yaw).abs() > half {
                return false;
            }
        }
    }

    !world
        .smoke_clouds()
        .iter()
        .any(|cloud| cloud.area.intersects_segment(observer, target))
}

/// Whether a listener hears a noise. Range scales with strength and shrinks
/// when walls separate listener and source.
pub fn can_hear(
    world: &dyn WorldOracle,
    listener: GridPosition,
    noise: &NoiseEvent,
    hearing_range: u32,
    config: &PerceptionConfig,
) -> bool {
    let mut range = f64::from(hearing_range) * noise.strength.max(0.0);
    if !world.has_line_of_sight(listener, noise.grid) {
        range *= config.occluded_hearing_mult;
    }
    f64::from(listener.manhattan(noise.grid)) <= range
}

/// Whether a scent point is within smelling distance.
pub fn can_smell(listener: GridPosition, scent: &ScentEvent, smell_range: u32) -> bool {
    f64::from(listener.manhattan(scent.grid)) <= f64::from(smell_range) * scent.intensity.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{Circle, DarkZone, NoiseKind, SmokeCloud};
    use maze_content::GridWorld;

    fn config() -> PerceptionConfig {
        PerceptionConfig::default()
    }

    #[test]
    fn wrap_angle_stays_in_half_open_interval() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-9);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-9);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-9);
        assert!((wrap_angle(-2.0 * PI + 0.1) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn scenario_open_map_range_and_darkness() {
        let world = GridWorld::open(20, 20);
        let agent = GridPosition::new(0, 0);
        let player = GridPosition::new(0, 5);
        let opts = VisionOptions::default().facing(0.0, 360.0);

        assert!(can_see_player(&world, agent, player, 12, &opts, &config()));
        assert!(!can_see_player(&world, agent, player, 3, &opts, &config()));

        let dark = GridWorld::open(20, 20).with_dark_zone(DarkZone {
            area: Circle::around(agent, 2.0),
            vision_mult: None,
        });
        let range = effective_vision_range(&dark, agent, 12.0, MonsterStatus::default(), &config());
        assert!((range - 6.0).abs() < 1e-9);
        assert!(can_see_player(&dark, agent, player, 12, &opts, &config()));
    }

    #[test]
    fn multipliers_are_clamped_to_floor() {
        let world = GridWorld::open(10, 10).with_dark_zone(DarkZone {
            area: Circle::around(GridPosition::ORIGIN, 3.0),
            vision_mult: Some(0.01),
        });
        let mult = darkness_multiplier(&world, GridPosition::ORIGIN, &config());
        assert_eq!(mult, PerceptionConfig::VISION_MULT_FLOOR);
    }

    #[test]
    fn blinded_sees_nothing() {
        let world = GridWorld::open(10, 10);
        let opts = VisionOptions::default().with_status(MonsterStatus {
            blinded: true,
            perception_jammed: false,
        });
        assert!(!can_see_player(
            &world,
            GridPosition::new(1, 1),
            GridPosition::new(1, 2),
            12,
            &opts,
            &config()
        ));
    }

    #[test]
    fn walls_block_unless_los_disabled() {
        let world = GridWorld::from_ascii(&["#####", "#.#.#", "#####"]);
        let a = GridPosition::new(1, 1);
        let b = GridPosition::new(3, 1);
        assert!(!can_see_player(&world, a, b, 12, &VisionOptions::default(), &config()));
        let opts = VisionOptions::default().without_line_of_sight();
        assert!(can_see_player(&world, a, b, 12, &opts, &config()));
    }

    #[test]
    fn fov_cone_rejects_targets_behind() {
        let world = GridWorld::open(20, 20);
        let observer = GridPosition::new(10, 10);
        // Facing +z (grid +y).
        let opts = VisionOptions::default().facing(0.0, 90.0);
        assert!(can_see_player(&world, observer, GridPosition::new(10, 14), 12, &opts, &config()));
        assert!(!can_see_player(&world, observer, GridPosition::new(10, 6), 12, &opts, &config()));
        assert!(!can_see_player(&world, observer, GridPosition::new(14, 10), 12, &opts, &config()));
    }

    #[test]
    fn smoke_blocks_sight_lines() {
        let world = GridWorld::open(20, 20).with_smoke(SmokeCloud {
            area: Circle::around(GridPosition::new(5, 0), 1.0),
        });
        let opts = VisionOptions::default();
        assert!(!can_see_player(
            &world,
            GridPosition::new(0, 0),
            GridPosition::new(9, 0),
            12,
            &opts,
            &config()
        ));
    }

    #[test]
    fn hearing_scales_with_strength_and_walls() {
        let open = GridWorld::open(30, 3);
        let listener = GridPosition::new(0, 1);
        let shot = NoiseEvent::new(NoiseKind::Gunshot, GridPosition::new(9, 1), 0.0);
        let step = NoiseEvent::new(NoiseKind::Footstep, GridPosition::new(9, 1), 0.0);
        assert!(can_hear(&open, listener, &shot, 10, &config()));
        assert!(!can_hear(&open, listener, &step, 10, &config()));

        let walled = GridWorld::from_ascii(&["############", "#....#.....#", "############"]);
        let shot = NoiseEvent::new(NoiseKind::Gunshot, GridPosition::new(9, 1), 0.0);
        assert!(!can_hear(&walled, GridPosition::new(1, 1), &shot, 10, &config()));
    }

    #[test]
    fn smell_range_scales_with_intensity() {
        let scent = ScentEvent::new(GridPosition::new(3, 0), 1.0, 0.0);
        assert!(can_smell(GridPosition::ORIGIN, &scent, 4));
        let faint = ScentEvent::new(GridPosition::new(3, 0), 0.5, 0.0);
        assert!(!can_smell(GridPosition::ORIGIN, &faint, 4));
    }
}
