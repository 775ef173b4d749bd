//! Combat systems - damage application and death handling.

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::*;
use crate::core::{DamageEvent, DeathEvent, GameState, HealthChangedEvent};

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Damage events are turned into health changes.
    Damage,
    /// Reactions to deaths (despawning, game over).
    Aftermath,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Damage, CombatSet::Aftermath)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, apply_damage.in_set(CombatSet::Damage))
        .add_systems(Update, despawn_on_death.in_set(CombatSet::Aftermath));
}

/// Apply damage to entities.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<&mut Health>,
    mut changed_events: EventWriter<HealthChangedEvent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        let Ok(mut health) = health_query.get_mut(event.target) else {
            continue;
        };

        match health.take_damage(event.amount) {
            HealthChange::Unchanged => {}
            HealthChange::Damaged => {
                changed_events.send(HealthChangedEvent {
                    entity: event.target,
                    current: health.current,
                    maximum: health.maximum,
                });
            }
            HealthChange::Killed => {
                changed_events.send(HealthChangedEvent {
                    entity: event.target,
                    current: health.current,
                    maximum: health.maximum,
                });
                died_this_frame.insert(event.target);
                commands.entity(event.target).insert(Dead);
                death_events.send(DeathEvent {
                    entity: event.target,
                    killed_by: event.source,
                });
            }
        }
    }
}

/// Despawn entities flagged with [`DespawnOnDeath`] once they die.
pub fn despawn_on_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    query: Query<(), With<DespawnOnDeath>>,
) {
    for event in death_events.read() {
        if query.get(event.entity).is_ok() {
            debug!("Despawning destroyed entity {:?}", event.entity);
            commands.entity(event.entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damage_app() -> App {
        let mut app = App::new();
        app.add_event::<DamageEvent>()
            .add_event::<HealthChangedEvent>()
            .add_event::<DeathEvent>()
            .add_systems(Update, (apply_damage, despawn_on_death).chain());
        app
    }

    fn deaths(app: &App) -> Vec<DeathEvent> {
        let events = app.world().resource::<Events<DeathEvent>>();
        events.get_cursor().read(events).copied().collect()
    }

    #[test]
    fn lethal_damage_sends_one_death() {
        let mut app = damage_app();
        let target = app.world_mut().spawn(Health::new(5)).id();
        let attacker = app.world_mut().spawn_empty().id();

        for _ in 0..3 {
            app.world_mut().send_event(DamageEvent {
                target,
                source: Some(attacker),
                amount: 5,
            });
        }
        app.update();

        let deaths = deaths(&app);
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths[0].killed_by, Some(attacker));
        assert!(app.world().get::<Dead>(target).is_some());
    }

    #[test]
    fn walls_despawn_on_death() {
        let mut app = damage_app();
        let wall = app.world_mut().spawn((Health::new(1), DespawnOnDeath)).id();

        app.world_mut().send_event(DamageEvent {
            target: wall,
            source: None,
            amount: 3,
        });
        app.update();

        assert!(!app.world().entities().contains(wall));
    }

    #[test]
    fn every_change_is_reported() {
        let mut app = damage_app();
        let target = app.world_mut().spawn(Health::new(10)).id();

        app.world_mut().send_event(DamageEvent { target, source: None, amount: 2 });
        app.world_mut().send_event(DamageEvent { target, source: None, amount: 0 });
        app.world_mut().send_event(DamageEvent { target, source: None, amount: 3 });
        app.update();

        let events = app.world().resource::<Events<HealthChangedEvent>>();
        let currents: Vec<i32> = events.get_cursor().read(events).map(|e| e.current).collect();
        assert_eq!(currents, vec![8, 5]);
    }
}
