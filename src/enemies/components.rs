//! Enemy-related components.

use bevy::prelude::*;

use crate::combat::clamp_multiplier;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// Top-level AI state.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AgentState {
    /// Heading for the house, or for the player while aggroed.
    #[default]
    MoveToGoal,
    /// Standing still and swinging at the selected target.
    Attack,
    /// Terminal.
    Dead,
}

/// Move speed and wall damage, with the multipliers a wave applied to them.
///
/// Current values are always recomputed from the base, so multipliers never
/// stack.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyStats {
    pub base_move_speed: f32,
    pub move_speed: f32,
    pub speed_multiplier: f32,
    pub base_wall_damage: i32,
    pub wall_damage: i32,
    pub wall_damage_multiplier: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self::new(2.0, 5)
    }
}

impl EnemyStats {
    pub fn new(move_speed: f32, wall_damage: i32) -> Self {
        let mut stats = Self {
            base_move_speed: 0.0,
            move_speed: 0.0,
            speed_multiplier: 1.0,
            base_wall_damage: 0,
            wall_damage: 0,
            wall_damage_multiplier: 1.0,
        };
        stats.set_base_move_speed(move_speed);
        stats.set_base_wall_damage(wall_damage);
        stats
    }

    pub fn set_base_move_speed(&mut self, speed: f32) {
        self.base_move_speed = speed.max(0.0);
        self.move_speed = self.base_move_speed * self.speed_multiplier;
    }

    pub fn set_base_wall_damage(&mut self, damage: i32) {
        self.base_wall_damage = damage.max(0);
        self.recompute_wall_damage();
    }

    pub fn apply_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = clamp_multiplier(multiplier);
        self.move_speed = self.base_move_speed * self.speed_multiplier;
    }

    pub fn apply_wall_damage_multiplier(&mut self, multiplier: f32) {
        self.wall_damage_multiplier = clamp_multiplier(multiplier);
        self.recompute_wall_damage();
    }

    fn recompute_wall_damage(&mut self) {
        let scaled = (self.base_wall_damage as f32 * self.wall_damage_multiplier).round();
        self.wall_damage = (scaled as i32).max(0);
    }
}

/// Per-wave scaling applied to a freshly spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatMultipliers {
    pub health: f32,
    pub move_speed: f32,
    pub wall_damage: f32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            health: 1.0,
            move_speed: 1.0,
            wall_damage: 1.0,
        }
    }
}

/// Corpse delay before a dead enemy is despawned.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(2.0, TimerMode::Once))
    }
}
