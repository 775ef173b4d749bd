//! Waves module - wave table, progress counting and enemy spawning.

mod data;
mod plugin;
mod spawner;
mod tracker;

pub use data::{WaveDefinition, WaveTable};
pub use plugin::WavePlugin;
pub use spawner::{spawn_positions, SpawnPoint, WaveMember};
pub use tracker::{
    EnemyCountChangedEvent, StartNextWave, Unregistered, WaveCompletedEvent, WaveCountdown,
    WaveProgress, WaveStartedEvent,
};
