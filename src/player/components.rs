//! Player-related components.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Last non-zero movement direction.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerFacing(pub Vec2);

impl Default for PlayerFacing {
    fn default() -> Self {
        Self(Vec2::NEG_Y)
    }
}

/// Melee swing in progress. Movement is locked while it runs.
#[derive(Component, Debug, Default)]
pub struct PlayerSwing {
    pub remaining: f32,
}

impl PlayerSwing {
    pub fn is_swinging(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Player tuning, optionally loaded from `assets/data/player.ron`.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    /// Units per second
    pub move_speed: f32,
    pub attack_damage: i32,
    /// How far in front of the player a swing reaches
    pub attack_reach: f32,
    /// Width of the swing box across the facing direction
    pub attack_width: f32,
    /// Seconds a swing locks movement
    pub attack_lock_time: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 4.0,
            attack_damage: 5,
            attack_reach: 0.9,
            attack_width: 0.8,
            attack_lock_time: 0.35,
        }
    }
}
