//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai::{self, AttackHitEvent, AttackStartedEvent};
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::sensor;
use super::swing;
use crate::combat::CombatSet;
use crate::core::GameState;

/// Enemy plugin - handles enemy definitions, perception, decisions and death.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .add_event::<AttackStartedEvent>()
            .add_event::<AttackHitEvent>()
            .add_systems(Startup, load_enemy_definitions);

        setup_enemy_systems(app);
    }
}

/// Add the AI schedule. Expects the core events and a `PathPlanning`
/// resource to exist.
pub fn setup_enemy_systems(app: &mut App) {
    app
        // Perception and decisions; hits land in the same frame's damage pass
        .add_systems(
            Update,
            (
                sensor::warn_missing_sensor,
                sensor::forward_sensor_events,
                ai::deliver_paths,
                ai::think,
                swing::start_swings,
                swing::detect_attack_hit,
                ai::confirm_attack_hits,
            )
                .chain()
                .before(CombatSet::Damage)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (ai::notify_attacked_enemies, ai::handle_enemy_death)
                .after(CombatSet::Damage)
                .before(CombatSet::Aftermath)
                .run_if(in_state(GameState::InGame)),
        )
        // Movement and attack execution
        .add_systems(FixedUpdate, ai::act.run_if(in_state(GameState::InGame)));
}
