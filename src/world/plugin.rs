//! World plugin - arena loading, construction and the loss condition.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use super::data::{load_arena_layout, ArenaLayout, CurrentArena};
use crate::combat::{CombatSet, DespawnOnDeath, Health};
use crate::core::{DeathEvent, GameState};
use crate::enemies::TargetCategory;
use crate::pathing::NavObstacle;
use crate::player::{spawn_player, Player, PlayerConfig};
use crate::waves::SpawnPoint;

/// World plugin - handles the arena and defeat.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentArena>()
            .add_systems(Startup, (load_arena_layout, spawn_camera))
            .add_systems(OnEnter(GameState::InGame), (setup_arena, resume_physics))
            .add_systems(OnEnter(GameState::Paused), freeze_physics)
            .add_systems(OnEnter(GameState::GameOver), freeze_physics)
            .add_systems(OnEnter(GameState::Victory), freeze_physics)
            .add_systems(Update, check_defeat.in_set(CombatSet::Aftermath));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        OrthographicProjection {
            scale: 0.03,
            ..OrthographicProjection::default_2d()
        },
    ));
}

fn freeze_physics(mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = false;
    }
}

fn resume_physics(mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = true;
    }
}

/// Build the arena on first entry into the game. Returning from pause keeps
/// the existing one.
pub fn setup_arena(
    mut commands: Commands,
    arena: Res<CurrentArena>,
    player_config: Res<PlayerConfig>,
    existing: Query<(), With<ArenaEntity>>,
) {
    if !existing.is_empty() {
        return;
    }

    info!("Building arena: {}", arena.name);
    build_arena(&mut commands, &arena, &player_config);
}

/// Spawn the house, walls, spawn points and player of `layout`.
pub fn build_arena(commands: &mut Commands, layout: &ArenaLayout, player_config: &PlayerConfig) {
    let tile = layout.tile_size;

    commands.spawn((
        Name::new("House"),
        HouseObjective,
        ArenaEntity,
        TargetCategory::Core,
        Health::new(layout.core_health),
        NavObstacle {
            half_extents: Vec2::splat(tile * 0.45),
        },
        Sprite::from_color(Color::srgb(0.7, 0.45, 0.25), Vec2::splat(tile * 0.9)),
        Transform::from_translation(layout.house.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(tile * 0.45, tile * 0.45),
        CollisionGroups::new(STRUCTURE_LAYER, Group::ALL),
    ));

    for (index, position) in layout.walls.iter().enumerate() {
        commands.spawn((
            Name::new(format!("Wall {}", index)),
            Wall,
            ArenaEntity,
            TargetCategory::Wall,
            Health::new(layout.wall_health),
            DespawnOnDeath,
            NavObstacle {
                half_extents: Vec2::splat(tile * 0.45),
            },
            Sprite::from_color(Color::srgb(0.45, 0.42, 0.4), Vec2::splat(tile)),
            Transform::from_translation(position.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(tile * 0.5, tile * 0.5),
            CollisionGroups::new(STRUCTURE_LAYER, Group::ALL),
        ));
    }

    for position in &layout.spawn_points {
        commands.spawn((
            Name::new("Spawn Point"),
            SpawnPoint,
            ArenaEntity,
            Transform::from_translation(position.extend(0.0)),
        ));
    }

    let player = spawn_player(commands, player_config, layout.player_start);
    commands.entity(player).insert(ArenaEntity);

    debug!(
        "Arena '{}': {} walls, {} spawn points",
        layout.name,
        layout.walls.len(),
        layout.spawn_points.len()
    );
}

/// Losing the house or the player ends the game.
pub fn check_defeat(
    mut deaths: EventReader<DeathEvent>,
    houses: Query<(), With<HouseObjective>>,
    players: Query<(), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in deaths.read() {
        if houses.get(event.entity).is_ok() {
            info!("The house has fallen");
            next_state.set(GameState::GameOver);
        } else if players.get(event.entity).is_ok() {
            info!("The player has fallen");
            next_state.set(GameState::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn arena_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .init_resource::<CurrentArena>()
            .init_resource::<PlayerConfig>()
            .add_event::<DeathEvent>()
            .add_systems(Update, (setup_arena, check_defeat).chain());
        app
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<(), F>();
        query.iter(app.world()).count()
    }

    #[test]
    fn arena_is_built_once() {
        let mut app = arena_app();
        app.update();
        app.update();

        let layout = ArenaLayout::default();
        assert_eq!(count::<With<HouseObjective>>(&mut app), 1);
        assert_eq!(count::<With<Player>>(&mut app), 1);
        assert_eq!(count::<With<Wall>>(&mut app), layout.walls.len());
        assert_eq!(count::<With<SpawnPoint>>(&mut app), layout.spawn_points.len());
    }

    #[test]
    fn losing_the_house_ends_the_game() {
        let mut app = arena_app();
        app.update();

        let mut houses = app
            .world_mut()
            .query_filtered::<Entity, With<HouseObjective>>();
        let house = houses.single(app.world());
        app.world_mut().send_event(DeathEvent {
            entity: house,
            killed_by: None,
        });
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::GameOver
        );
    }

    #[test]
    fn other_deaths_do_not_end_the_game() {
        let mut app = arena_app();
        app.update();

        let bystander = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(DeathEvent {
            entity: bystander,
            killed_by: None,
        });
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::Loading
        );
    }
}
