//! Tile map served through [`maze_core::WorldOracle`].
use rand::{Rng, RngCore};

use maze_core::{DarkZone, GridPosition, Room, SmokeCloud, WorldOracle};

/// Rectangular wall/floor grid with rooms and environmental volumes.
///
/// Tiles outside the bounds are treated as walls. Sight lines are traced with
/// Bresenham between tile centers; only walls are opaque.
#[derive(Clone, Debug)]
pub struct GridWorld {
    width: u32,
    height: u32,
    walls: Vec<bool>,
    walkable: Vec<GridPosition>,
    rooms: Vec<Room>,
    dark_zones: Vec<DarkZone>,
    smoke: Vec<SmokeCloud>,
}

impl GridWorld {
    /// Open map of the given size with no walls.
    pub fn open(width: u32, height: u32) -> Self {
        let mut world = Self {
            width,
            height,
            walls: vec![false; (width * height) as usize],
            walkable: Vec::new(),
            rooms: Vec::new(),
            dark_zones: Vec::new(),
            smoke: Vec::new(),
        };
        world.reindex();
        world
    }

    /// Parses rows where `#` is a wall and any other character is floor.
    /// Short rows are padded with walls.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len() as u32;
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0) as u32;

        let mut walls = vec![true; (width * height) as usize];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                walls[y * width as usize + x] = ch == '#';
            }
        }

        let mut world = Self {
            width,
            height,
            walls,
            walkable: Vec::new(),
            rooms: Vec::new(),
            dark_zones: Vec::new(),
            smoke: Vec::new(),
        };
        world.reindex();
        world
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_dark_zone(mut self, zone: DarkZone) -> Self {
        self.dark_zones.push(zone);
        self
    }

    pub fn with_smoke(mut self, cloud: SmokeCloud) -> Self {
        self.smoke.push(cloud);
        self
    }

    pub fn set_wall(&mut self, pos: GridPosition, wall: bool) {
        if let Some(index) = self.index(pos) {
            self.walls[index] = wall;
            self.reindex();
        }
    }

    /// Replaces active smoke volumes (they come and go at runtime).
    pub fn set_smoke(&mut self, clouds: Vec<SmokeCloud>) {
        self.smoke = clouds;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn walkable_tiles(&self) -> &[GridPosition] {
        &self.walkable
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    fn reindex(&mut self) {
        self.walkable.clear();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = GridPosition::new(x, y);
                if self.is_walkable(pos) {
                    self.walkable.push(pos);
                }
            }
        }
    }

    fn is_wall(&self, pos: GridPosition) -> bool {
        self.index(pos).is_none_or(|index| self.walls[index])
    }
}

impl WorldOracle for GridWorld {
    fn is_walkable(&self, pos: GridPosition) -> bool {
        !self.is_wall(pos)
    }

    fn has_line_of_sight(&self, a: GridPosition, b: GridPosition) -> bool {
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (a.x, a.y);

        loop {
            let pos = GridPosition::new(x, y);
            if pos != a && pos != b && self.is_wall(pos) {
                return false;
            }
            if x == b.x && y == b.y {
                return true;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn random_walkable_tile(&self, rng: &mut dyn RngCore) -> Option<GridPosition> {
        if self.walkable.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.walkable.len());
        Some(self.walkable[index])
    }

    fn dark_zones(&self) -> &[DarkZone] {
        &self.dark_zones
    }

    fn smoke_clouds(&self) -> &[SmokeCloud] {
        &self.smoke
    }

    fn rooms(&self) -> &[Room] {
        &self.rooms
    }
}
