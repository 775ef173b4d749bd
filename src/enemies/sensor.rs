//! Detection sensor: turns rapier collision events into candidate enter/exit
//! calls on the owning agent.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::agent::EnemyAgent;
use super::targeting::TargetCategory;

/// Sensor collider child of an enemy.
#[derive(Component, Debug, Clone, Copy)]
pub struct TargetSensor {
    /// The enemy entity carrying the [`EnemyAgent`].
    pub owner: Entity,
    /// Colliders must belong to one of these groups to be reported.
    pub target_layers: Group,
}

impl TargetSensor {
    pub fn new(owner: Entity, target_layers: u32) -> Self {
        Self {
            owner,
            target_layers: Group::from_bits_truncate(target_layers),
        }
    }

    /// Colliders without explicit groups belong to every group.
    pub fn accepts(&self, groups: Option<&CollisionGroups>) -> bool {
        groups.map_or(true, |g| g.memberships.intersects(self.target_layers))
    }
}

/// Forward sensor overlaps to the owning agents.
pub fn forward_sensor_events(
    mut collisions: EventReader<CollisionEvent>,
    sensors: Query<&TargetSensor>,
    colliders: Query<(Option<&TargetCategory>, Option<&Parent>, Option<&CollisionGroups>)>,
    categories: Query<&TargetCategory>,
    mut agents: Query<&mut EnemyAgent>,
) {
    for event in collisions.read() {
        let (a, b, started) = match *event {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        for (sensor_entity, other) in [(a, b), (b, a)] {
            let Ok(sensor) = sensors.get(sensor_entity) else {
                continue;
            };
            if other == sensor.owner {
                continue;
            }
            let Ok(mut agent) = agents.get_mut(sensor.owner) else {
                continue;
            };

            if !started {
                agent.sensor_exit(other);
                continue;
            }

            let Ok((category, parent, groups)) = colliders.get(other) else {
                continue;
            };
            if !sensor.accepts(groups) {
                continue;
            }

            // The collider itself first, then the entity it hangs off.
            let resolved = match category {
                Some(category) => Some((other, *category)),
                None => parent.and_then(|p| {
                    categories.get(p.get()).ok().map(|category| (p.get(), *category))
                }),
            };

            if let Some((owner, category)) = resolved {
                agent.sensor_enter(other, owner, category);
            }
        }
    }
}

/// Log enemies spawned without a detection sensor. They still walk to the
/// house but never attack.
pub fn warn_missing_sensor(
    spawned: Query<Entity, Added<EnemyAgent>>,
    sensors: Query<&TargetSensor>,
) {
    for entity in spawned.iter() {
        if !sensors.iter().any(|sensor| sensor.owner == entity) {
            warn!("Enemy {:?} has no target sensor; it will not pick targets", entity);
        }
    }
}
