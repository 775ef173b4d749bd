//! Top-down player movement and melee.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::path::Path;

use super::components::*;
use crate::combat::{CombatSet, Health};
use crate::core::{load_ron_file, DamageEvent, DataLoadError, GameState};
use crate::enemies::{Enemy, TargetCategory};
use crate::world::PLAYER_LAYER;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.init_resource::<PlayerConfig>()
        .add_systems(Startup, load_player_config)
        .add_systems(
            Update,
            (player_attack, player_movement)
                .chain()
                .before(CombatSet::Damage)
                .run_if(in_state(GameState::InGame)),
        );
}

fn load_player_config(mut config: ResMut<PlayerConfig>) {
    match load_ron_file::<PlayerConfig>(Path::new("assets/data/player.ron")) {
        Ok(loaded) => *config = loaded,
        Err(DataLoadError::FileNotFound(_)) => info!("No player config, using defaults"),
        Err(e) => error!("Failed to load player config: {}", e),
    }
}

/// Snap a facing direction to the nearest axis, like a four-way sprite.
pub fn swing_direction(facing: Vec2) -> Vec2 {
    if facing.x.abs() > facing.y.abs() {
        Vec2::new(facing.x.signum(), 0.0)
    } else if facing.y != 0.0 {
        Vec2::new(0.0, facing.y.signum())
    } else {
        Vec2::NEG_Y
    }
}

/// Whether `target` lies in the swing box `reach` long and `width` wide in
/// front of `origin` along `direction`.
pub fn in_swing_box(origin: Vec2, direction: Vec2, target: Vec2, reach: f32, width: f32) -> bool {
    let local = target - origin;
    let along = local.dot(direction);
    let across = local.dot(direction.perp()).abs();
    (0.0..=reach).contains(&along) && across <= width * 0.5
}

/// Handle WASD movement.
///
/// Writes the rigid body velocity; a swing or death stops the player.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(&mut Velocity, &mut PlayerFacing, &PlayerSwing, &Health), With<Player>>,
) {
    let Ok((mut velocity, mut facing, swing, health)) = player_query.get_single_mut() else {
        return;
    };

    if health.is_dead() || swing.is_swinging() {
        velocity.linvel = Vec2::ZERO;
        return;
    }

    // Build input direction from WASD
    let mut direction = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }

    // Normalize to prevent faster diagonal movement
    if direction != Vec2::ZERO {
        direction = direction.normalize();
        facing.0 = direction;
    }

    velocity.linvel = direction * config.move_speed;
}

/// Start a swing on Space or left click and hit every enemy in front once.
pub fn player_attack(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(Entity, &Transform, &PlayerFacing, &mut PlayerSwing, &Health), With<Player>>,
    enemy_query: Query<(Entity, &Transform, &Health), With<Enemy>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player, transform, facing, mut swing, health)) = player_query.get_single_mut() else {
        return;
    };

    if swing.is_swinging() {
        swing.remaining -= time.delta_secs();
        return;
    }

    let pressed = keyboard.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Left);
    if !pressed || health.is_dead() {
        return;
    }

    swing.remaining = config.attack_lock_time;
    let origin = transform.translation.truncate();
    let direction = swing_direction(facing.0);

    for (enemy, enemy_transform, enemy_health) in enemy_query.iter() {
        if enemy_health.is_dead() {
            continue;
        }
        let target = enemy_transform.translation.truncate();
        if in_swing_box(origin, direction, target, config.attack_reach, config.attack_width) {
            damage_events.send(DamageEvent {
                target: enemy,
                source: Some(player),
                amount: config.attack_damage,
            });
        }
    }
}

/// Spawn the player entity.
pub fn spawn_player(commands: &mut Commands, config: &PlayerConfig, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerFacing::default(),
            PlayerSwing::default(),
            Health::new(config.max_health),
            TargetCategory::Player,
            Sprite::from_color(Color::srgb(0.85, 0.8, 0.55), Vec2::splat(0.5)),
            Transform::from_translation(position.extend(2.0)),
            RigidBody::Dynamic,
            Collider::ball(0.25),
            CollisionGroups::new(PLAYER_LAYER, Group::ALL),
            GravityScale(0.0),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vec2::new(0.7, 0.3), Vec2::X)]
    #[case(Vec2::new(-0.7, 0.3), Vec2::NEG_X)]
    #[case(Vec2::new(0.2, 0.9), Vec2::Y)]
    #[case(Vec2::new(0.5, -0.5), Vec2::NEG_Y)]
    #[case(Vec2::ZERO, Vec2::NEG_Y)]
    fn facing_snaps_to_an_axis(#[case] facing: Vec2, #[case] expected: Vec2) {
        assert_eq!(swing_direction(facing), expected);
    }

    #[test]
    fn swing_box_covers_only_the_front() {
        let origin = Vec2::new(1.0, 1.0);

        assert!(in_swing_box(origin, Vec2::X, Vec2::new(1.5, 1.2), 0.9, 0.8));
        assert!(!in_swing_box(origin, Vec2::X, Vec2::new(0.5, 1.0), 0.9, 0.8));
        assert!(!in_swing_box(origin, Vec2::X, Vec2::new(2.0, 1.0), 0.9, 0.8));
        assert!(!in_swing_box(origin, Vec2::X, Vec2::new(1.5, 1.5), 0.9, 0.8));
        assert!(in_swing_box(origin, Vec2::NEG_Y, Vec2::new(1.0, 0.2), 0.9, 0.8));
    }

    #[test]
    fn player_config_parses_partial_files() {
        let config: PlayerConfig =
            crate::core::parse_ron("(move_speed: 6.0, attack_damage: 8)", "inline").unwrap();
        assert_eq!(config.move_speed, 6.0);
        assert_eq!(config.attack_damage, 8);
        assert_eq!(config.max_health, 100);
    }
}
