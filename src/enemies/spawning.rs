//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::agent::EnemyAgent;
use super::components::{Enemy, EnemyType, StatMultipliers};
use super::data::{EnemyDefinition, HitConfirmation};
use super::sensor::TargetSensor;
use super::swing::AttackSwing;
use crate::combat::Health;
use crate::world::ENEMY_LAYER;

/// Spawn one enemy with its detection sensor.
///
/// `house` pins the objective the enemy walks to; without it the enemy finds
/// the house itself. Multipliers scale from the definition's base stats.
pub fn spawn_enemy(
    commands: &mut Commands,
    enemy_type: &str,
    definition: &EnemyDefinition,
    position: Vec2,
    house: Option<Entity>,
    multipliers: StatMultipliers,
) -> Entity {
    let mut agent = EnemyAgent::new(definition.behaviour());
    if let Some(house) = house {
        agent = agent.with_house(house);
    }
    agent.apply_speed_multiplier(multipliers.move_speed);
    agent.apply_wall_damage_multiplier(multipliers.wall_damage);

    let mut health = Health::new(definition.max_health);
    health.apply_max_multiplier(multipliers.health, true);
    let radius = definition.body_radius;

    let mut enemy = commands.spawn((
        Name::new(definition.name.clone()),
        Enemy,
        EnemyType(enemy_type.to_string()),
        agent,
        health,
        Sprite::from_color(Color::srgb(0.35, 0.55, 0.3), Vec2::splat(radius * 2.0)),
        Transform::from_translation(position.extend(1.0)),
        RigidBody::Dynamic,
        Collider::ball(radius),
        CollisionGroups::new(ENEMY_LAYER, Group::ALL),
        GravityScale(0.0),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
    ));

    if definition.attack.hit_confirmation == HitConfirmation::External {
        enemy.insert(AttackSwing::new(definition.attack.windup));
    }

    let id = enemy.id();
    enemy.with_children(|parent| {
        parent.spawn((
            Name::new("Target Sensor"),
            TargetSensor::new(id, definition.sensor.target_layers),
            Collider::ball(definition.sensor.radius),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            Transform::default(),
        ));
    });

    debug!("Spawned {} at {:?}", definition.name, position);
    id
}
