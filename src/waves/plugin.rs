//! Wave plugin - wave table, progress tracking and spawning.

use bevy::prelude::*;

use super::data::{load_wave_table, WaveTable};
use super::spawner::*;
use super::tracker::*;
use crate::combat::CombatSet;
use crate::core::GameState;

/// Wave plugin - runs the siege in waves until the final one is cleared.
pub struct WavePlugin;

impl Plugin for WavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveTable>()
            .init_resource::<WaveProgress>()
            .init_resource::<WaveCountdown>()
            .add_event::<StartNextWave>()
            .add_event::<WaveStartedEvent>()
            .add_event::<WaveCompletedEvent>()
            .add_event::<EnemyCountChangedEvent>()
            .add_systems(Startup, (load_wave_table, arm_first_countdown).chain())
            .add_systems(
                Update,
                (
                    debug_start_wave,
                    schedule_waves,
                    begin_next_wave,
                    spawn_wave,
                )
                    .chain()
                    .before(CombatSet::Damage)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                (
                    track_wave_deaths,
                    track_removed_members,
                    declare_victory,
                    reclaim_corpses,
                )
                    .chain()
                    .in_set(CombatSet::Aftermath),
            );
    }
}

fn arm_first_countdown(table: Res<WaveTable>, mut countdown: ResMut<WaveCountdown>) {
    countdown.restart(table.intermission);
}
