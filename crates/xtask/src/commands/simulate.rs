//! Headless scenario runner
//!
//! Steps the agent manager frame by frame over a scenario. Monsters move with
//! the commands they emit, the scripted player walks its route leaving
//! footsteps and scent, and state changes are reported as they happen.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use maze_content::{ConfigLoader, GridWorld, ProfileLoader, ScenarioLoader};
use maze_core::{
    BrainCommand, GridPosition, MonsterId, MonsterView, NoiseEvent, NoiseKind, PlayerView,
    ScentEvent, WorldOracle, WorldPoint,
};
use monster_ai::perception::wrap_angle;
use monster_ai::{AgentManager, BrainState, Frame};

use crate::utils;

/// World units per second.
const WALK_SPEED: f64 = 3.0;
const SPRINT_SPEED: f64 = 5.5;
const SCENT_INTENSITY: f64 = 0.5;

/// Run a scenario headless and print what the monsters decide
#[derive(Parser, Debug)]
pub struct Simulate {
    /// Scenario file (RON)
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Monster profiles file (RON)
    #[arg(short, long, value_name = "FILE")]
    profiles: Option<PathBuf>,

    /// AI tuning file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short, long, default_value = "300")]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value = "0.1")]
    dt: f64,

    /// Override the tuning seed
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds the scripted player needs per tile
    #[arg(long, default_value = "0.5")]
    player_step: f64,

    /// Print every state change and shot as it happens
    #[arg(short, long)]
    verbose: bool,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let mut config = ConfigLoader::load(&utils::resolve(self.config, utils::CONFIG_FILE)?)?;
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        let profiles = ProfileLoader::load(&utils::resolve(self.profiles, utils::PROFILES_FILE)?)?;
        let scenario_path = utils::resolve(self.scenario, utils::SCENARIO_FILE)?;
        let scenario = ScenarioLoader::load(&scenario_path)?;

        let config = Arc::new(config);
        let tile_size = config.brain.tile_size;
        let mut manager = AgentManager::new(Arc::clone(&config));
        let mut bodies = Vec::with_capacity(scenario.monsters.len());
        let mut tallies = BTreeMap::new();

        for spawn in &scenario.monsters {
            let profile = profiles
                .get(&spawn.profile)
                .with_context(|| format!("monster {} uses unknown profile '{}'", spawn.id, spawn.profile))?;
            let id = MonsterId(spawn.id);
            manager.spawn(id, profile.clone(), spawn.at)?;
            bodies.push(Body::new(id, spawn.at, tile_size));
            tallies.insert(id, Tally::new(&spawn.profile));
        }

        let start = scenario
            .player_route
            .first()
            .copied()
            .context("scenario has no player route")?;
        let mut player = Walker::new(scenario.player_route.clone(), start, self.player_step);

        println!(
            "{} {} ({} monsters, {} frames @ {}s, seed {:#x})",
            style("▶ Simulating").green().bold(),
            style(scenario_path.display()).dim(),
            bodies.len(),
            self.frames,
            self.dt,
            config.seed
        );

        let mut caught_at = None;
        for frame_index in 0..self.frames {
            let now = f64::from(frame_index) * self.dt;

            let views: Vec<MonsterView> = bodies.iter().map(|b| b.view()).collect();
            if let Some(step) = player.advance(now, &scenario.world) {
                let heard = manager.broadcast_noise(
                    &scenario.world,
                    &views,
                    NoiseEvent::new(NoiseKind::Footstep, step, now),
                );
                let smelled =
                    manager.broadcast_scent(&views, ScentEvent::new(step, SCENT_INTENSITY, now));
                tracing::trace!("player at {} heard by {} smelled by {}", step, heard, smelled);
            }

            let player_view = player.view(tile_size);
            let commands = manager.tick(&Frame {
                now,
                dt: self.dt,
                world: &scenario.world,
                planner: Some(&scenario.world),
                player: Some(&player_view),
                monsters: &views,
            });

            for (id, command) in commands {
                let Some(body) = bodies.iter_mut().find(|b| b.id == id) else {
                    continue;
                };
                body.apply(&command, self.dt, tile_size, &scenario.world);

                let state = manager.agent(id).map(|a| a.state()).unwrap_or_default();
                let Some(tally) = tallies.get_mut(&id) else {
                    continue;
                };
                if tally.last != Some(state) {
                    if self.verbose && tally.last.is_some() {
                        println!(
                            "  {:>6.1}s {} {} -> {}",
                            now,
                            style(id).cyan(),
                            tally.last.unwrap_or_default(),
                            style(state).yellow()
                        );
                    }
                    tally.transitions += 1;
                    tally.last = Some(state);
                }
                *tally.time_in.entry(state.to_string()).or_default() += self.dt;

                if let Some(fire) = command.fire {
                    tally.shots += 1;
                    if self.verbose {
                        println!(
                            "  {:>6.1}s {} {} at {}",
                            now,
                            style(id).cyan(),
                            style("fires").red(),
                            fire.target
                        );
                    }
                }
                if caught_at.is_none() && body.grid == player.grid {
                    caught_at = Some((now, id));
                }
            }
        }

        print_summary(&tallies, &bodies);
        match caught_at {
            Some((at, id)) => println!(
                "{} {} reached the player at {:.1}s",
                style("✗").red().bold(),
                style(id).cyan(),
                at
            ),
            None => println!("{} player was never reached", style("✓").green().bold()),
        }
        Ok(())
    }
}

fn print_summary(tallies: &BTreeMap<MonsterId, Tally>, bodies: &[Body]) {
    println!();
    println!("{}", style("=== Simulation Summary ===").bold().green());
    for body in bodies {
        let Some(tally) = tallies.get(&body.id) else {
            continue;
        };
        println!(
            "{} {} at {}",
            style(body.id).bold().cyan(),
            style(&tally.profile).dim(),
            body.grid
        );
        println!(
            "  final state: {}  transitions: {}  shots: {}",
            style(tally.last.unwrap_or_default()).yellow(),
            tally.transitions,
            tally.shots
        );
        let time_in: Vec<String> = tally
            .time_in
            .iter()
            .map(|(state, secs)| format!("{state} {secs:.1}s"))
            .collect();
        println!("  time in: {}", time_in.join(", "));
    }
    println!();
}

// ============================================================================
// Simulated bodies
// ============================================================================

struct Tally {
    profile: String,
    last: Option<BrainState>,
    transitions: u32,
    shots: u32,
    time_in: BTreeMap<String, f64>,
}

impl Tally {
    fn new(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            last: None,
            transitions: 0,
            shots: 0,
            time_in: BTreeMap::new(),
        }
    }
}

/// Kinematic stand-in for the physical layer: integrates commands and
/// refuses to enter walls.
struct Body {
    id: MonsterId,
    grid: GridPosition,
    position: WorldPoint,
    yaw: f64,
}

impl Body {
    fn new(id: MonsterId, grid: GridPosition, tile_size: f64) -> Self {
        Self {
            id,
            grid,
            position: grid.to_world(tile_size),
            yaw: 0.0,
        }
    }

    fn view(&self) -> MonsterView {
        MonsterView {
            position: self.position,
            ..MonsterView::new(self.id, self.grid, 1.0).with_yaw(self.yaw)
        }
    }

    fn apply(&mut self, command: &BrainCommand, dt: f64, tile_size: f64, world: &GridWorld) {
        self.yaw = wrap_angle(self.yaw + command.look_yaw);
        if command.move_dir.is_zero() {
            return;
        }
        let speed = if command.sprint { SPRINT_SPEED } else { WALK_SPEED };
        let next = WorldPoint::new(
            self.position.x + command.move_dir.x * speed * dt,
            self.position.z + command.move_dir.y * speed * dt,
        );
        let grid = GridPosition::from_world(next, tile_size);
        if world.is_walkable(grid) {
            self.position = next;
            self.grid = grid;
        }
    }
}

/// Scripted player looping over route waypoints one tile at a time.
struct Walker {
    route: Vec<GridPosition>,
    next: usize,
    grid: GridPosition,
    step_seconds: f64,
    last_step: f64,
    velocity: (f64, f64),
}

impl Walker {
    fn new(route: Vec<GridPosition>, start: GridPosition, step_seconds: f64) -> Self {
        Self {
            route,
            next: 0,
            grid: start,
            step_seconds: step_seconds.max(0.05),
            last_step: 0.0,
            velocity: (0.0, 0.0),
        }
    }

    /// Moves one tile when a step is due. Returns the new tile.
    fn advance(&mut self, now: f64, world: &GridWorld) -> Option<GridPosition> {
        if now - self.last_step < self.step_seconds || self.route.is_empty() {
            return None;
        }
        self.last_step = now;

        if self.grid == self.route[self.next] {
            self.next = (self.next + 1) % self.route.len();
        }
        let goal = self.route[self.next];
        let dx = (goal.x - self.grid.x).signum();
        let dy = (goal.y - self.grid.y).signum();

        let step = [(dx, dy), (dx, 0), (0, dy)]
            .into_iter()
            .filter(|&(x, y)| x != 0 || y != 0)
            .map(|(x, y)| self.grid.offset(x, y))
            .find(|tile| world.is_walkable(*tile));
        let Some(step) = step else {
            tracing::warn!("player stuck at {} heading to {}, skipping waypoint", self.grid, goal);
            self.next = (self.next + 1) % self.route.len();
            self.velocity = (0.0, 0.0);
            return None;
        };

        self.velocity = (
            f64::from(step.x - self.grid.x) / self.step_seconds,
            f64::from(step.y - self.grid.y) / self.step_seconds,
        );
        self.grid = step;
        Some(step)
    }

    fn view(&self, tile_size: f64) -> PlayerView {
        PlayerView::new(self.grid, tile_size).with_velocity(self.velocity.0, self.velocity.1)
    }
}
