use maze_content::GridWorld;
use maze_core::{Circle, DarkZone, GridPosition, MonsterStatus, PerceptionConfig};
use monster_ai::perception::{VisionOptions, can_see_player, effective_vision_range};
use proptest::prelude::*;

fn tile() -> impl Strategy<Value = GridPosition> {
    (0..24i32, 0..24i32).prop_map(|(x, y)| GridPosition::new(x, y))
}

fn debuffs() -> impl Strategy<Value = (bool, Option<f64>, f64)> {
    (any::<bool>(), proptest::option::of(0.0..2.0f64), 0.0..2.0f64)
}

proptest! {
    #[test]
    fn debuffs_never_extend_vision(
        observer in tile(),
        base in 0u32..30,
        (jammed, zone_mult, jam_mult) in debuffs(),
    ) {
        let clear = GridWorld::open(24, 24);
        let dark = GridWorld::open(24, 24).with_dark_zone(DarkZone {
            area: Circle::around(observer, 3.0),
            vision_mult: zone_mult,
        });
        let config = PerceptionConfig { jam_vision_mult: jam_mult, ..PerceptionConfig::default() };
        let status = MonsterStatus { blinded: false, perception_jammed: jammed };

        let base = f64::from(base);
        let baseline = effective_vision_range(&clear, observer, base, MonsterStatus::default(), &config);
        let debuffed = effective_vision_range(&dark, observer, base, status, &config);
        prop_assert!(debuffed <= baseline);
        prop_assert!(debuffed >= base * PerceptionConfig::VISION_MULT_FLOOR.powi(2) - 1e-9);
    }

    #[test]
    fn vision_is_a_pure_function(
        observer in tile(),
        target in tile(),
        range in 0u32..30,
        yaw in -3.2..3.2f64,
        fov in 1.0..360.0f64,
        jammed in any::<bool>(),
    ) {
        let mut world = GridWorld::open(24, 24);
        world.set_wall(GridPosition::new(12, 12), true);
        let config = PerceptionConfig::default();
        let options = VisionOptions::default()
            .facing(yaw, fov)
            .with_status(MonsterStatus { blinded: false, perception_jammed: jammed });

        let first = can_see_player(&world, observer, target, range, &options, &config);
        let second = can_see_player(&world, observer, target, range, &options, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn darkness_never_reveals_a_hidden_target(
        observer in tile(),
        target in tile(),
        range in 0u32..30,
    ) {
        let clear = GridWorld::open(24, 24);
        let dark = GridWorld::open(24, 24).with_dark_zone(DarkZone {
            area: Circle::around(observer, 2.0),
            vision_mult: None,
        });
        let config = PerceptionConfig::default();
        let options = VisionOptions::default();
        let seen_dark = can_see_player(&dark, observer, target, range, &options, &config);
        let seen_clear = can_see_player(&clear, observer, target, range, &options, &config);
        prop_assert!(!seen_dark || seen_clear);
    }
}
