//! Enemy AI systems: drive each [`EnemyAgent`] from the ECS.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use super::agent::{EnemyAgent, Hit, TargetWorld};
use super::components::DeathTimer;
use crate::combat::Health;
use crate::core::{DamageEvent, DeathEvent};
use crate::pathing::PathPlanning;
use crate::player::Player;
use crate::world::HouseObjective;

/// An enemy started a swing.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackStartedEvent {
    pub attacker: Entity,
}

/// An enemy's swing reached its hit frame (external hit confirmation).
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackHitEvent {
    pub attacker: Entity,
}

/// The parts of the world an agent looks at.
#[derive(SystemParam)]
pub struct TargetWorldView<'w, 's> {
    transforms: Query<'w, 's, &'static GlobalTransform>,
    healths: Query<'w, 's, &'static Health>,
    houses: Query<'w, 's, Entity, With<HouseObjective>>,
    players: Query<'w, 's, Entity, With<Player>>,
}

impl TargetWorld for TargetWorldView<'_, '_> {
    fn position(&self, entity: Entity) -> Option<Vec2> {
        self.transforms
            .get(entity)
            .ok()
            .map(|transform| transform.translation().truncate())
    }

    fn is_alive(&self, entity: Entity) -> Option<bool> {
        self.healths.get(entity).ok().map(|health| !health.is_dead())
    }

    fn find_house(&self) -> Option<Entity> {
        self.houses.iter().next()
    }

    fn find_player(&self) -> Option<Entity> {
        self.players.get_single().ok()
    }
}

fn send_hit(damage: &mut EventWriter<DamageEvent>, attacker: Entity, hit: Hit) {
    damage.send(DamageEvent {
        target: hit.target,
        source: Some(attacker),
        amount: hit.amount,
    });
}

/// Hand finished paths to the agents that asked for them.
pub fn deliver_paths(mut planning: ResMut<PathPlanning>, mut agents: Query<&mut EnemyAgent>) {
    for result in planning.drain_completed() {
        if let Ok(mut agent) = agents.get_mut(result.requester) {
            agent.accept_path(result);
        }
    }
}

/// Per-frame perception and decisions.
pub fn think(
    time: Res<Time<Virtual>>,
    mut planning: ResMut<PathPlanning>,
    world: TargetWorldView,
    mut agents: Query<(Entity, &Transform, &mut EnemyAgent)>,
    mut damage: EventWriter<DamageEvent>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, mut agent) in agents.iter_mut() {
        let position = transform.translation.truncate();
        if let Some(hit) = agent.tick_frame(entity, now, position, &world, planning.planner_mut()) {
            send_hit(&mut damage, entity, hit);
        }
    }
}

/// Enemies that take damage start chasing the player.
pub fn notify_attacked_enemies(
    time: Res<Time<Virtual>>,
    mut damage_events: EventReader<DamageEvent>,
    mut agents: Query<&mut EnemyAgent>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        if let Ok(mut agent) = agents.get_mut(event.target) {
            agent.notify_attacked(now, event.source);
        }
    }
}

/// Apply damage for swings whose hit frame arrived.
pub fn confirm_attack_hits(
    mut hits: EventReader<AttackHitEvent>,
    mut agents: Query<&mut EnemyAgent>,
    mut damage: EventWriter<DamageEvent>,
) {
    for event in hits.read() {
        let Ok(mut agent) = agents.get_mut(event.attacker) else {
            continue;
        };
        if let Some(hit) = agent.confirm_external_hit() {
            send_hit(&mut damage, event.attacker, hit);
        }
    }
}

/// Move dead enemies into the Dead state and start their corpse timer.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut deaths: EventReader<DeathEvent>,
    mut agents: Query<(&mut EnemyAgent, Option<&mut Velocity>)>,
) {
    for event in deaths.read() {
        let Ok((mut agent, velocity)) = agents.get_mut(event.entity) else {
            continue;
        };
        if agent.die() {
            if let Some(mut velocity) = velocity {
                velocity.linvel = Vec2::ZERO;
            }
            commands.entity(event.entity).insert(DeathTimer::default());
        }
    }
}

/// Fixed-step movement and attack execution.
///
/// Swings are stamped on the virtual clock, the one `think` polls windups on.
pub fn act(
    time: Res<Time<Virtual>>,
    world: TargetWorldView,
    mut agents: Query<(Entity, &Transform, &mut EnemyAgent, &mut Velocity)>,
    mut started: EventWriter<AttackStartedEvent>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, mut agent, mut velocity) in agents.iter_mut() {
        let outcome = agent.tick_physics(now, transform.translation.truncate(), &world);
        velocity.linvel = outcome.velocity;

        if outcome.attack_started {
            started.send(AttackStartedEvent { attacker: entity });
        }
    }
}
