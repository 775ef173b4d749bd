//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver, Victory)
/// - Global events (DamageEvent, HealthChangedEvent, DeathEvent)
/// - Basic game flow systems
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<HealthChangedEvent>()
            .add_event::<DeathEvent>()

            // Data files are loaded in Startup, so gameplay can begin right away
            .add_systems(OnEnter(GameState::Loading), transition_to_game)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )
            .add_systems(OnEnter(GameState::GameOver), announce_game_over)
            .add_systems(OnEnter(GameState::Victory), announce_victory);
    }
}

fn transition_to_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}

fn announce_game_over() {
    info!("Game over");
}

fn announce_victory() {
    info!("Victory");
}
