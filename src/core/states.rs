//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy AI, waves
//! and damage only run in the InGame state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - Enter `InGame` once loading completes
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the core or the player is destroyed
/// - `Victory` once the final wave is cleared
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Core or player has been destroyed
    GameOver,
    /// Final wave cleared
    Victory,
}
