//! Scenario loader.
//!
//! A scenario bundles a tile map with rooms, environmental volumes, monster
//! spawns and a scripted player route. The headless simulator consumes it.

use std::path::Path;

use maze_core::{DarkZone, GridPosition, Room, SmokeCloud, WorldOracle};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::world::GridWorld;

/// Scenario structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScenarioRon {
    rows: Vec<String>,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    dark_zones: Vec<DarkZone>,
    #[serde(default)]
    smoke: Vec<SmokeCloud>,
    #[serde(default)]
    monsters: Vec<SpawnSpec>,
    #[serde(default)]
    player_route: Vec<GridPosition>,
}

/// Monster placed when the scenario starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub id: u32,
    /// Key into the profile map.
    pub profile: String,
    pub at: GridPosition,
}

/// Loaded scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub world: GridWorld,
    pub monsters: Vec<SpawnSpec>,
    /// Waypoints the scripted player walks, in order, looping.
    pub player_route: Vec<GridPosition>,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let data: ScenarioRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let mut world = GridWorld::from_ascii(&data.rows);
        for room in data.rooms {
            world = world.with_room(room);
        }
        for zone in data.dark_zones {
            world = world.with_dark_zone(zone);
        }
        for cloud in data.smoke {
            world = world.with_smoke(cloud);
        }

        for spawn in &data.monsters {
            if !world.is_walkable(spawn.at) {
                anyhow::bail!("monster {} spawns inside a wall at {}", spawn.id, spawn.at);
            }
        }
        if let Some(bad) = data.player_route.iter().find(|p| !world.is_walkable(**p)) {
            anyhow::bail!("player route crosses a wall at {}", bad);
        }

        Ok(Scenario {
            world,
            monsters: data.monsters,
            player_route: data.player_route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::RoomKind;

    const SCENARIO: &str = include_str!("../../fixtures/walled_room.ron");

    #[test]
    fn parses_map_rooms_and_spawns() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        assert_eq!(scenario.world.rooms().len(), 1);
        assert_eq!(scenario.world.rooms()[0].kind, RoomKind::Hub);
        assert_eq!(scenario.world.dark_zones().len(), 1);
        assert_eq!(scenario.monsters[0].profile, "stalker");
        assert_eq!(scenario.player_route.len(), 2);
    }

    #[test]
    fn spawn_in_wall_is_rejected() {
        let bad = SCENARIO.replace("(x: 5, y: 2)", "(x: 0, y: 0)");
        let err = ScenarioLoader::parse(&bad).unwrap_err();
        assert!(err.to_string().contains("inside a wall"));
    }
}
