//! World entities: the house objective, walls, and collision layers.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Group;

/// The core objective enemies march on. Losing it loses the game.
#[derive(Component)]
pub struct HouseObjective;

/// A destructible wall segment.
#[derive(Component)]
pub struct Wall;

/// Marks everything built for the current arena.
#[derive(Component)]
pub struct ArenaEntity;

pub const PLAYER_LAYER: Group = Group::GROUP_1;
pub const STRUCTURE_LAYER: Group = Group::GROUP_2;
pub const ENEMY_LAYER: Group = Group::GROUP_3;
