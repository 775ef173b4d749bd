//! Pathing plugin - installs the default planner and feeds it obstacles.

use bevy::prelude::*;

use super::grid::{GridPathPlanner, NavGrid};
use super::planner::PathPlanning;
use crate::combat::CombatSet;
use crate::core::DeathEvent;

/// Static geometry that paths must go around.
#[derive(Component, Debug, Clone, Copy)]
pub struct NavObstacle {
    pub half_extents: Vec2,
}

/// Pathing plugin - provides a [`PathPlanning`] resource.
///
/// A planner inserted before this plugin is kept; otherwise a grid planner
/// over [`NavGrid::default`] is used.
pub struct PathingPlugin;

impl Plugin for PathingPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<PathPlanning>() {
            app.insert_resource(PathPlanning::new(GridPathPlanner::new(NavGrid::default())));
        }

        app.add_systems(PreUpdate, register_nav_obstacles).add_systems(
            Update,
            release_destroyed_obstacles
                .after(CombatSet::Damage)
                .before(CombatSet::Aftermath),
        );
    }
}

/// Block planner cells under newly spawned obstacles.
pub fn register_nav_obstacles(
    mut planning: ResMut<PathPlanning>,
    query: Query<(&Transform, &NavObstacle), Added<NavObstacle>>,
) {
    for (transform, obstacle) in query.iter() {
        planning.mark_obstacle(transform.translation.truncate(), obstacle.half_extents);
    }
}

/// Reopen cells under obstacles that were destroyed this frame.
pub fn release_destroyed_obstacles(
    mut planning: ResMut<PathPlanning>,
    mut deaths: EventReader<DeathEvent>,
    query: Query<(&Transform, &NavObstacle)>,
) {
    for event in deaths.read() {
        if let Ok((transform, obstacle)) = query.get(event.entity) {
            planning.clear_obstacle(transform.translation.truncate(), obstacle.half_extents);
        }
    }
}
