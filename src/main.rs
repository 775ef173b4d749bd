//! Night Siege - Entry Point
//!
//! Hold the house through the night.
//!
//! Controls:
//! - WASD: Move
//! - Space / Left click: Swing
//! - F3: Start the next wave now
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Night Siege".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics, one world unit per tile
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))

        // Our game plugin
        .add_plugins(night_siege::NightSiegePlugin)

        .run();
}
