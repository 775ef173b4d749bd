//! Night Siege - a top-down 2D wave defense game in Bevy.
//!
//! Zombies spawn in waves at the edge of the arena and march on the house.
//! They break walls in their way, and turn on the player when the player
//! comes close or strikes them.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, data file loading
//! - **Combat**: Health pools, damage application, death notification
//! - **Pathing**: Path planning service behind the `PathPlanner` trait
//! - **Enemies**: Targeting, aggro, attack cycle and movement AI
//! - **Player**: Top-down movement and melee
//! - **Waves**: Wave table, progress counting and spawning
//! - **World**: Arena construction and the loss condition

pub mod combat;
pub mod core;
pub mod enemies;
pub mod pathing;
pub mod player;
pub mod waves;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct NightSiegePlugin;

impl Plugin for NightSiegePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Health and damage
            .add_plugins(combat::CombatPlugin)

            // Path planning service
            .add_plugins(pathing::PathingPlugin)

            // Enemy AI
            .add_plugins(enemies::EnemyPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Waves
            .add_plugins(waves::WavePlugin)

            // Arena
            .add_plugins(world::WorldPlugin);
    }
}
