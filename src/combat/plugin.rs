//! Combat plugin - damage and death.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - handles all health and damage systems.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
