use std::sync::Arc;

use maze_content::GridWorld;
use maze_core::{
    AgentProfile, AiConfig, BrainKind, GridPosition, ModuleSet, MonsterId, MonsterView,
    NoiseEvent, NoiseKind, PlayerView, Role, SquadId,
};
use monster_ai::{Agent, AgentManager, BrainState, Frame, apply_brain_modules};

fn view(id: u32, grid: GridPosition) -> MonsterView {
    MonsterView::new(MonsterId(id), grid, 2.0)
}

fn frame<'a>(
    now: f64,
    world: &'a GridWorld,
    player: Option<&'a PlayerView>,
    monsters: &'a [MonsterView],
) -> Frame<'a> {
    Frame {
        now,
        dt: 0.1,
        world,
        planner: Some(world),
        player,
        monsters,
    }
}

#[test]
fn hunter_walks_the_whole_state_machine() {
    let world = GridWorld::open(20, 12);
    let config = Arc::new(AiConfig::default());
    let brain = config.brain.clone();
    let mut manager = AgentManager::new(Arc::clone(&config));
    let home = GridPosition::new(2, 2);
    let profile = AgentProfile::new(BrainKind::RoomHunter, Role::Default).with_fov(360.0);
    manager.spawn(MonsterId(1), profile, home).unwrap();
    let state = |m: &AgentManager| m.agent(MonsterId(1)).unwrap().state();

    let views = [view(1, home)];
    let door = NoiseEvent::new(NoiseKind::Door, GridPosition::new(8, 2), 0.0);
    assert_eq!(manager.broadcast_noise(&world, &views, door), 1);
    let commands = manager.tick(&frame(0.0, &world, None, &views));
    assert_eq!(state(&manager), BrainState::Investigate);
    assert!(!commands[0].1.move_dir.is_zero());

    let shot = NoiseEvent::new(NoiseKind::Gunshot, GridPosition::new(9, 2), 0.5);
    manager.broadcast_noise(&world, &views, shot);
    manager.tick(&frame(0.5, &world, None, &views));
    assert_eq!(state(&manager), BrainState::Chase);

    manager.tick(&frame(1.0, &world, None, &views));
    assert_eq!(state(&manager), BrainState::Chase);

    let lost_at = 0.5 + brain.chase_timeout_seconds + 1.0;
    manager.tick(&frame(lost_at, &world, None, &views));
    assert_eq!(state(&manager), BrainState::Search);

    let given_up = lost_at + brain.search_timeout_seconds + 0.5;
    let away = [view(1, GridPosition::new(9, 5))];
    manager.tick(&frame(given_up, &world, None, &away));
    assert_eq!(state(&manager), BrainState::Return);

    let commands = manager.tick(&frame(given_up + 0.5, &world, None, &away));
    assert!(!commands[0].1.move_dir.is_zero());

    let back = [view(1, GridPosition::new(2, 3))];
    manager.tick(&frame(given_up + 1.0, &world, None, &back));
    assert_eq!(state(&manager), BrainState::Patrol);
}

#[test]
fn module_composition_is_idempotent() {
    let config = Arc::new(AiConfig::default());
    let profile = AgentProfile::new(BrainKind::RoomHunter, Role::Scout)
        .with_modules(ModuleSet::all())
        .with_squad(SquadId(3));
    let mut agent = Agent::new(MonsterId(8), profile, Arc::clone(&config), GridPosition::ORIGIN);

    assert_eq!(apply_brain_modules(&mut agent, &config.modules), 3);
    assert_eq!(apply_brain_modules(&mut agent, &config.modules), 0);
    assert_eq!(agent.modules.attached(), ModuleSet::all());
}

#[test]
fn squad_flankers_fan_out_across_slots() {
    let world = GridWorld::open(30, 30);
    let mut manager = AgentManager::new(Arc::new(AiConfig::default()));
    let squad = SquadId(1);
    let leader = AgentProfile::new(BrainKind::RoomHunter, Role::Leader)
        .with_fov(360.0)
        .with_squad(squad);
    let flanker = AgentProfile::new(BrainKind::RoomHunter, Role::Flanker)
        .with_fov(360.0)
        .with_squad(squad);

    let mut views = vec![view(1, GridPosition::new(10, 10))];
    manager.spawn(MonsterId(1), leader, views[0].grid).unwrap();
    for id in 2..=4u32 {
        let grid = GridPosition::new(8 + id as i32, 12);
        manager.spawn(MonsterId(id), flanker.clone(), grid).unwrap();
        views.push(view(id, grid));
    }
    let player = PlayerView::new(GridPosition::new(12, 16), 2.0);

    manager.tick(&frame(0.0, &world, Some(&player), &views));
    assert!(manager.squad().get_target(squad, 0.05).is_some());
    manager.tick(&frame(0.1, &world, Some(&player), &views));

    let mut slots: Vec<usize> = (2..=4)
        .filter_map(|id| manager.squad().flank_lease(squad, MonsterId(id)))
        .map(|lease| lease.slot)
        .collect();
    assert_eq!(slots.len(), 3);
    slots.sort_unstable();
    slots.dedup();
    assert_eq!(slots.len(), 3);
    assert!(manager.squad().flank_lease(squad, MonsterId(1)).is_none());
}

#[test]
fn squad_fire_gate_lets_one_shooter_through() {
    let world = GridWorld::open(20, 20);
    let mut manager = AgentManager::new(Arc::new(AiConfig::default()));
    let profile = AgentProfile::new(BrainKind::Roaming, Role::Cover)
        .with_fov(360.0)
        .with_squad(SquadId(2))
        .ranged();

    let views: Vec<MonsterView> = (1..=3u32)
        .map(|id| {
            let grid = GridPosition::new(4 + id as i32, 5);
            manager.spawn(MonsterId(id), profile.clone(), grid).unwrap();
            view(id, grid)
        })
        .collect();
    let player = PlayerView::new(GridPosition::new(6, 9), 2.0);

    let commands = manager.tick(&frame(0.0, &world, Some(&player), &views));
    assert_eq!(manager.chasers(), 3);
    let shooters = commands.iter().filter(|(_, c)| c.fire.is_some()).count();
    assert_eq!(shooters, 1);
    assert_eq!(manager.squad().shooters(SquadId(2), 0.0).len(), 1);
}

#[test]
fn commands_are_unit_or_zero() {
    let world = GridWorld::open(16, 16);
    let mut manager = AgentManager::new(Arc::new(AiConfig::default()));
    let kinds = [BrainKind::Roaming, BrainKind::RoomHunter, BrainKind::Sentry];
    let views: Vec<MonsterView> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let id = i as u32 + 1;
            let grid = GridPosition::new(2 + 4 * i as i32, 3);
            let profile = AgentProfile::new(*kind, Role::Default);
            manager.spawn(MonsterId(id), profile, grid).unwrap();
            view(id, grid)
        })
        .collect();

    for step in 0..20 {
        let now = f64::from(step) * 0.1;
        for (_, command) in manager.tick(&frame(now, &world, None, &views)) {
            let len = command.move_dir.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-9);
            assert!(command.look_yaw.abs() <= std::f64::consts::PI + 1e-9);
        }
    }
}
