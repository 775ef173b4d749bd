//! Arena layout data and RON loading.
//!
//! An arena is an ASCII grid, one string per row, top row first:
//!
//! - `#` wall segment
//! - `H` the house (core objective)
//! - `S` enemy spawn point
//! - `P` player start
//! - anything else is open floor

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::core::{load_ron_file, DataLoadError};

fn default_tile_size() -> f32 {
    1.0
}

fn default_core_health() -> i32 {
    100
}

fn default_wall_health() -> i32 {
    30
}

/// Arena file as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaLayoutRaw {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default = "default_core_health")]
    pub core_health: i32,
    #[serde(default = "default_wall_health")]
    pub wall_health: i32,
    pub grid: Vec<String>,
}

/// A parsed arena with world positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub name: String,
    pub tile_size: f32,
    pub core_health: i32,
    pub wall_health: i32,
    pub house: Vec2,
    pub player_start: Vec2,
    pub walls: Vec<Vec2>,
    pub spawn_points: Vec<Vec2>,
}

impl ArenaLayout {
    pub fn from_raw(raw: ArenaLayoutRaw, origin: &str) -> Result<Self, DataLoadError> {
        let invalid = |field: &'static str, details: String| DataLoadError::InvalidValue {
            path: origin.to_string(),
            field,
            details,
        };

        if raw.tile_size <= 0.0 {
            return Err(invalid("tile_size", format!("must be positive, got {}", raw.tile_size)));
        }

        let height = raw.grid.len();
        let width = raw.grid.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let tile_size = raw.tile_size;

        // Grid centered on the world origin, row 0 at the top.
        let to_world = |col: usize, row: usize| {
            Vec2::new(
                (col as f32 - width as f32 / 2.0 + 0.5) * tile_size,
                (height as f32 / 2.0 - row as f32 - 0.5) * tile_size,
            )
        };

        let mut house = Vec::new();
        let mut player = Vec::new();
        let mut walls = Vec::new();
        let mut spawn_points = Vec::new();

        for (row, line) in raw.grid.iter().enumerate() {
            for (col, tile) in line.chars().enumerate() {
                let position = to_world(col, row);
                match tile {
                    '#' => walls.push(position),
                    'H' => house.push(position),
                    'S' => spawn_points.push(position),
                    'P' => player.push(position),
                    _ => {}
                }
            }
        }

        let &[house] = house.as_slice() else {
            return Err(invalid("grid", format!("expected one house 'H', found {}", house.len())));
        };
        let &[player_start] = player.as_slice() else {
            return Err(invalid("grid", format!("expected one player start 'P', found {}", player.len())));
        };
        if spawn_points.is_empty() {
            warn!("Arena '{}' has no spawn points", raw.name);
        }

        Ok(Self {
            name: raw.name,
            tile_size,
            core_health: raw.core_health.max(1),
            wall_health: raw.wall_health.max(1),
            house,
            player_start,
            walls,
            spawn_points,
        })
    }
}

impl Default for ArenaLayout {
    fn default() -> Self {
        let grid = [
            "S.........................S",
            "...........................",
            "...........................",
            ".........#########.........",
            ".........#.......#.........",
            ".........#...H...#.........",
            "S........#.......#........S",
            ".........#...P...#.........",
            ".........####.####.........",
            "...........................",
            "...........................",
            "S.........................S",
        ];
        let raw = ArenaLayoutRaw {
            name: "Homestead".to_string(),
            tile_size: default_tile_size(),
            core_health: default_core_health(),
            wall_health: default_wall_health(),
            grid: grid.iter().map(|row| row.to_string()).collect(),
        };
        // The built-in grid always has one house and one player start.
        Self::from_raw(raw, "built-in").unwrap_or_else(|_| Self {
            name: "Empty".to_string(),
            tile_size: 1.0,
            core_health: default_core_health(),
            wall_health: default_wall_health(),
            house: Vec2::ZERO,
            player_start: Vec2::new(0.0, -2.0),
            walls: Vec::new(),
            spawn_points: Vec::new(),
        })
    }
}

/// Arena used when entering the game.
#[derive(Resource, Debug, Clone, Default, Deref)]
pub struct CurrentArena(pub ArenaLayout);

/// Load `assets/data/arena.ron`, keeping the built-in arena on failure.
pub fn load_arena_layout(mut arena: ResMut<CurrentArena>) {
    let path = Path::new("assets/data/arena.ron");

    let raw = match load_ron_file::<ArenaLayoutRaw>(path) {
        Ok(raw) => raw,
        Err(DataLoadError::FileNotFound(_)) => {
            info!("No arena file, using built-in arena '{}'", arena.name);
            return;
        }
        Err(e) => {
            error!("Failed to load arena: {}", e);
            return;
        }
    };

    match ArenaLayout::from_raw(raw, &path.display().to_string()) {
        Ok(layout) => {
            info!(
                "Loaded arena '{}': {} walls, {} spawn points",
                layout.name,
                layout.walls.len(),
                layout.spawn_points.len()
            );
            arena.0 = layout;
        }
        Err(e) => error!("Invalid arena: {}", e),
    }
}
