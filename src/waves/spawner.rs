//! Wave spawning and membership tracking.

use bevy::prelude::*;

use super::data::WaveTable;
use super::tracker::*;
use crate::core::{DeathEvent, GameState};
use crate::enemies::{spawn_enemy, DeathTimer, EnemyDefinition, EnemyRegistry, StatMultipliers};
use crate::world::HouseObjective;

/// Where wave enemies appear.
#[derive(Component, Debug, Default)]
pub struct SpawnPoint;

/// Tags an enemy with the wave that spawned it.
#[derive(Component, Debug, Clone, Copy)]
pub struct WaveMember {
    pub wave_id: u32,
}

/// Spawn positions for `count` enemies, taking points in turn.
///
/// Later laps around the points are nudged apart so bodies do not overlap.
pub fn spawn_positions(points: &[Vec2], count: u32) -> Vec<Vec2> {
    if points.is_empty() {
        return Vec::new();
    }

    (0..count as usize)
        .map(|i| {
            let point = points[i % points.len()];
            let lap = (i / points.len()) as f32;
            if lap == 0.0 {
                point
            } else {
                point + Vec2::from_angle(lap * 2.4) * 0.35 * lap.sqrt()
            }
        })
        .collect()
}

/// Start the next wave when asked.
pub fn begin_next_wave(
    mut requests: EventReader<StartNextWave>,
    table: Res<WaveTable>,
    mut progress: ResMut<WaveProgress>,
    mut started: EventWriter<WaveStartedEvent>,
    mut counts: EventWriter<EnemyCountChangedEvent>,
) {
    for _ in requests.read() {
        if progress.in_progress() {
            warn!("Wave {} is still running", progress.current_wave());
            continue;
        }

        let next = progress.current_wave() + 1;
        let wave_id = progress.start_next_wave(table.plan(next).spawn_count);
        info!("Wave {} begins", wave_id);

        started.send(WaveStartedEvent { wave_id });
        counts.send(EnemyCountChangedEvent {
            alive: 0,
            total: progress.total_this_wave(),
        });
    }
}

/// Spawn the enemies of a wave that just began.
pub fn spawn_wave(
    mut commands: Commands,
    mut events: EventReader<WaveStartedEvent>,
    table: Res<WaveTable>,
    registry: Res<EnemyRegistry>,
    mut progress: ResMut<WaveProgress>,
    mut countdown: ResMut<WaveCountdown>,
    points: Query<(Entity, &Transform), With<SpawnPoint>>,
    houses: Query<Entity, With<HouseObjective>>,
    mut counts: EventWriter<EnemyCountChangedEvent>,
    mut completed: EventWriter<WaveCompletedEvent>,
) {
    for event in events.read() {
        let wave = table.plan(event.wave_id);

        let mut sorted: Vec<(Entity, Vec2)> = points
            .iter()
            .map(|(entity, transform)| (entity, transform.translation.truncate()))
            .collect();
        sorted.sort_by_key(|(entity, _)| *entity);
        let positions: Vec<Vec2> = sorted.into_iter().map(|(_, position)| position).collect();

        if positions.is_empty() {
            error!("Wave {} has nowhere to spawn", event.wave_id);
            progress.abandon();
            continue;
        }

        let fallback;
        let definition = match registry.get(&table.enemy_type) {
            Some(definition) => definition,
            None => {
                warn!("Unknown enemy type '{}', using defaults", table.enemy_type);
                fallback = EnemyDefinition::default();
                &fallback
            }
        };

        let multipliers = StatMultipliers {
            health: wave.hp_multiplier,
            move_speed: wave.speed_multiplier,
            wall_damage: wave.wall_damage_multiplier,
        };
        let house = houses.iter().next();

        let spawns = spawn_positions(&positions, wave.spawn_count);
        if spawns.is_empty() {
            // Nothing will ever unregister, so the wave is over now.
            progress.abandon();
            let victory = event.wave_id >= table.win_wave_id();
            info!("Wave {} has no enemies", event.wave_id);
            counts.send(EnemyCountChangedEvent { alive: 0, total: 0 });
            completed.send(WaveCompletedEvent {
                wave_id: event.wave_id,
                victory,
            });
            countdown.restart(table.intermission);
            continue;
        }
        progress.set_total(event.wave_id, spawns.len() as u32);

        for position in spawns {
            let enemy = spawn_enemy(
                &mut commands,
                &table.enemy_type,
                definition,
                position,
                house,
                multipliers,
            );
            commands.entity(enemy).insert(WaveMember {
                wave_id: event.wave_id,
            });
            progress.register(enemy, event.wave_id);
        }

        debug!(
            "Wave {}: {} x {} (hp x{}, speed x{}, wall damage x{})",
            event.wave_id,
            progress.enemies_alive(),
            definition.name,
            wave.hp_multiplier,
            wave.speed_multiplier,
            wave.wall_damage_multiplier
        );
        counts.send(EnemyCountChangedEvent {
            alive: progress.enemies_alive(),
            total: progress.total_this_wave(),
        });
    }
}

fn record_departure(
    progress: &mut WaveProgress,
    table: &WaveTable,
    countdown: &mut WaveCountdown,
    entity: Entity,
    counts: &mut EventWriter<EnemyCountChangedEvent>,
    completed: &mut EventWriter<WaveCompletedEvent>,
) {
    match progress.unregister(entity) {
        Unregistered::Ignored => {}
        Unregistered::Remaining(alive) => {
            counts.send(EnemyCountChangedEvent {
                alive,
                total: progress.total_this_wave(),
            });
        }
        Unregistered::WaveCleared(wave_id) => {
            counts.send(EnemyCountChangedEvent {
                alive: 0,
                total: progress.total_this_wave(),
            });
            let victory = wave_id >= table.win_wave_id();
            info!("Wave {} cleared", wave_id);
            completed.send(WaveCompletedEvent { wave_id, victory });
            countdown.restart(table.intermission);
        }
    }
}

/// Count wave enemies out as they die.
pub fn track_wave_deaths(
    mut deaths: EventReader<DeathEvent>,
    members: Query<&WaveMember>,
    table: Res<WaveTable>,
    mut progress: ResMut<WaveProgress>,
    mut countdown: ResMut<WaveCountdown>,
    mut counts: EventWriter<EnemyCountChangedEvent>,
    mut completed: EventWriter<WaveCompletedEvent>,
) {
    for event in deaths.read() {
        let Ok(member) = members.get(event.entity) else {
            continue;
        };
        if member.wave_id != progress.current_wave() {
            continue;
        }
        record_departure(
            &mut progress,
            &table,
            &mut countdown,
            event.entity,
            &mut counts,
            &mut completed,
        );
    }
}

/// Count out wave enemies despawned without dying.
pub fn track_removed_members(
    mut removed: RemovedComponents<WaveMember>,
    table: Res<WaveTable>,
    mut progress: ResMut<WaveProgress>,
    mut countdown: ResMut<WaveCountdown>,
    mut counts: EventWriter<EnemyCountChangedEvent>,
    mut completed: EventWriter<WaveCompletedEvent>,
) {
    for entity in removed.read() {
        record_departure(
            &mut progress,
            &table,
            &mut countdown,
            entity,
            &mut counts,
            &mut completed,
        );
    }
}

/// Despawn corpses once their timer runs out.
pub fn reclaim_corpses(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathTimer)>,
) {
    for (entity, mut timer) in query.iter_mut() {
        timer.0.tick(time.delta());
        if timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Start the next wave after the intermission, until the final wave is won.
pub fn schedule_waves(
    time: Res<Time>,
    table: Res<WaveTable>,
    progress: Res<WaveProgress>,
    mut countdown: ResMut<WaveCountdown>,
    mut requests: EventWriter<StartNextWave>,
) {
    if progress.in_progress() || progress.current_wave() >= table.win_wave_id() {
        return;
    }

    countdown.0.tick(time.delta());
    if countdown.0.just_finished() {
        requests.send(StartNextWave);
    }
}

/// F3 skips the intermission.
pub fn debug_start_wave(keyboard: Res<ButtonInput<KeyCode>>, mut requests: EventWriter<StartNextWave>) {
    if keyboard.just_pressed(KeyCode::F3) {
        requests.send(StartNextWave);
    }
}

pub fn declare_victory(
    mut completed: EventReader<WaveCompletedEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in completed.read() {
        if event.victory {
            info!("Survived wave {}, the house stands", event.wave_id);
            next_state.set(GameState::Victory);
        }
    }
}
