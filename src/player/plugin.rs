//! Player plugin - movement and melee.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player movement and attacks.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
