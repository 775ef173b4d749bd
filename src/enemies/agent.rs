//! The enemy agent: composes targeting, aggro, attack and movement into the
//! MoveToGoal / Attack / Dead state machine.
//!
//! The agent is plain data. Bevy systems in `ai` feed it a [`TargetWorld`]
//! view of the ECS and a path planner, then apply what it returns.

use bevy::prelude::*;

use super::aggro::AggroController;
use super::attack::{damage_for, AttackCycle};
use super::components::{AgentState, EnemyStats};
use super::data::{EnemyBehaviour, HitConfirmation};
use super::movement::{PathAcceptance, PathFollower};
use super::targeting::{select_target, Candidate, TargetCandidates, TargetCategory};
use crate::pathing::{PathPlanner, PathResult};

/// Read-only view of the world the agent needs each tick.
pub trait TargetWorld {
    /// Position of a live entity, `None` once it is gone.
    fn position(&self, entity: Entity) -> Option<Vec2>;
    /// `None` when the entity has no health at all.
    fn is_alive(&self, entity: Entity) -> Option<bool>;
    fn find_house(&self) -> Option<Entity>;
    fn find_player(&self) -> Option<Entity>;
}

/// Where the agent walks when it has nothing to attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveGoal {
    House(Entity),
    Player(Entity),
}

impl MoveGoal {
    pub fn entity(self) -> Entity {
        match self {
            Self::House(entity) | Self::Player(entity) => entity,
        }
    }
}

/// Damage the agent wants applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Entity owning the `Health` to damage.
    pub target: Entity,
    pub amount: i32,
    pub category: TargetCategory,
}

/// Result of a physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsOutcome {
    pub velocity: Vec2,
    /// A swing started this step.
    pub attack_started: bool,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyAgent {
    state: AgentState,
    behaviour: EnemyBehaviour,
    stats: EnemyStats,
    candidates: TargetCandidates,
    target: Option<Candidate>,
    aggro: AggroController,
    attack: AttackCycle,
    follower: PathFollower,
    house_override: Option<Entity>,
    house: Option<Entity>,
    goal: Option<MoveGoal>,
    velocity: Vec2,
}

impl EnemyAgent {
    pub fn new(behaviour: EnemyBehaviour) -> Self {
        let stats = EnemyStats::new(behaviour.movement.move_speed, behaviour.attack.wall_damage);
        let mut follower = PathFollower::default();
        follower.repath_now();

        Self {
            state: AgentState::MoveToGoal,
            aggro: AggroController::new(behaviour.aggro.clone()),
            behaviour,
            stats,
            candidates: TargetCandidates::default(),
            target: None,
            attack: AttackCycle::default(),
            follower,
            house_override: None,
            house: None,
            goal: None,
            velocity: Vec2::ZERO,
        }
    }

    /// Use `house` as the objective instead of looking one up.
    pub fn with_house(mut self, house: Entity) -> Self {
        self.house_override = Some(house);
        self
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == AgentState::Dead
    }

    pub fn behaviour(&self) -> &EnemyBehaviour {
        &self.behaviour
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn candidates(&self) -> &TargetCandidates {
        &self.candidates
    }

    pub fn target(&self) -> Option<Candidate> {
        self.target
    }

    pub fn aggro(&self) -> &AggroController {
        &self.aggro
    }

    pub fn attack(&self) -> &AttackCycle {
        &self.attack
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    pub fn house(&self) -> Option<Entity> {
        self.house
    }

    pub fn goal(&self) -> Option<MoveGoal> {
        self.goal
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// A collider entered the sensor. Returns false when it was ignored.
    pub fn sensor_enter(&mut self, collider: Entity, owner: Entity, category: TargetCategory) -> bool {
        if self.is_dead() || !self.behaviour.targeting.accepts(category) {
            return false;
        }
        self.candidates.insert(Candidate {
            collider,
            owner,
            category,
        })
    }

    pub fn sensor_exit(&mut self, collider: Entity) {
        self.candidates.remove(collider);
        if self.target.is_some_and(|t| t.collider == collider) {
            self.target = None;
        }
    }

    /// Enter the terminal state. Returns false if already dead.
    pub fn die(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.log_transition(AgentState::Dead);
        self.state = AgentState::Dead;
        self.velocity = Vec2::ZERO;
        self.target = None;
        self.attack.cancel_hit();
        self.follower.invalidate();
        true
    }

    /// Being hit forces player pursuit for a while.
    pub fn notify_attacked(&mut self, now: f32, attacker: Option<Entity>) {
        if self.is_dead() || !self.behaviour.targeting.can_target_player {
            return;
        }
        if self.behaviour.log_state_changes {
            info!("Enemy attacked by {:?}, forcing player aggro", attacker);
        }
        self.aggro.notify_attacked(now);
    }

    pub fn set_base_move_speed(&mut self, speed: f32) {
        self.stats.set_base_move_speed(speed);
    }

    pub fn set_base_wall_damage(&mut self, damage: i32) {
        self.stats.set_base_wall_damage(damage);
    }

    pub fn apply_speed_multiplier(&mut self, multiplier: f32) {
        self.stats.apply_speed_multiplier(multiplier);
    }

    pub fn apply_wall_damage_multiplier(&mut self, multiplier: f32) {
        self.stats.apply_wall_damage_multiplier(multiplier);
    }

    /// The swing's hit frame arrived. Only meaningful while attacking with
    /// external hit confirmation.
    pub fn confirm_external_hit(&mut self) -> Option<Hit> {
        if self.state != AgentState::Attack
            || self.behaviour.attack.hit_confirmation != HitConfirmation::External
        {
            return None;
        }
        if !self.attack.confirm_external() {
            return None;
        }
        self.current_hit()
    }

    /// Hand a planner result to the path follower.
    pub fn accept_path(&mut self, result: PathResult) -> PathAcceptance {
        if let Err(e) = &result.outcome {
            debug!("Path request failed: {}", e);
        }
        self.follower.accept(result)
    }

    /// Perception and decisions, once per frame.
    pub fn tick_frame(
        &mut self,
        id: Entity,
        now: f32,
        position: Vec2,
        world: &impl TargetWorld,
        planner: &mut dyn PathPlanner,
    ) -> Option<Hit> {
        if self.is_dead() {
            return None;
        }

        self.refresh_house(world);
        self.candidates.prune(|c| world.position(c.collider).is_some());

        let force_player = self.update_aggro(now, position, world);
        self.resolve_target(position, force_player, world);

        let goal = match self.aggro.player() {
            Some(player) if self.aggro.is_chasing() => Some(MoveGoal::Player(player)),
            _ => self.house.map(MoveGoal::House),
        };
        if goal != self.goal {
            self.goal = goal;
            self.follower.invalidate();
            self.follower.repath_now();
        }

        if self.target.is_some() {
            self.set_state(AgentState::Attack);
        } else {
            self.set_state(AgentState::MoveToGoal);
        }

        let mut hit = None;
        if self.behaviour.attack.hit_confirmation == HitConfirmation::Timer && self.attack.poll_timer(now) {
            hit = self.current_hit();
        }

        if self.state == AgentState::MoveToGoal {
            if let Some(goal_position) = self.goal_position(world) {
                let interval = self.behaviour.movement.repath_interval;
                if self.follower.poll_repath(now, interval, planner.is_idle(id)) {
                    planner.request_path(self.follower.make_request(id, position, goal_position));
                }
            }
        }

        hit
    }

    /// Movement or attack execution, once per fixed step.
    pub fn tick_physics(&mut self, now: f32, position: Vec2, world: &impl TargetWorld) -> PhysicsOutcome {
        let mut outcome = PhysicsOutcome::default();

        match self.state {
            AgentState::Dead => self.velocity = Vec2::ZERO,
            AgentState::MoveToGoal => {
                self.velocity = match self.goal_position(world) {
                    Some(goal) => self.follower.steer(
                        position,
                        goal,
                        &self.behaviour.movement,
                        self.stats.move_speed,
                    ),
                    None => Vec2::ZERO,
                };
            }
            AgentState::Attack => {
                self.velocity = Vec2::ZERO;
                if let Some(target) = self.target {
                    let valid = self.candidates.contains(target.collider)
                        && world.is_alive(target.owner) == Some(true);
                    if !valid {
                        self.target = None;
                    } else if self.attack.start(now, &self.behaviour.attack) {
                        outcome.attack_started = true;
                    }
                }
            }
        }

        outcome.velocity = self.velocity;
        outcome
    }

    fn refresh_house(&mut self, world: &impl TargetWorld) {
        if self.house.is_some_and(|house| world.position(house).is_some()) {
            return;
        }
        self.house = self
            .house_override
            .filter(|house| world.position(*house).is_some())
            .or_else(|| world.find_house());
    }

    /// Returns whether selection must consider only the player.
    fn update_aggro(&mut self, now: f32, position: Vec2, world: &impl TargetWorld) -> bool {
        let targeting = &self.behaviour.targeting;
        if !targeting.can_target_player {
            self.aggro.reset();
            return false;
        }

        let mut distance_sq = None;
        if let Some(player) = self.aggro.resolve_player(now, || world.find_player()) {
            match world.position(player) {
                None => self.aggro.forget_player(),
                Some(at) if world.is_alive(player) != Some(false) => {
                    distance_sq = Some(position.distance_squared(at));
                }
                Some(_) => {}
            }
        }

        let update = self.aggro.update(now, distance_sq);
        let attacking_structure = self.target.is_some_and(|t| t.category.is_structure());

        if targeting.break_wall_attack_when_aggro_player {
            if update.began && attacking_structure {
                self.target = None;
                self.attack.cancel_hit();
            }
            update.chasing
        } else {
            update.chasing && !attacking_structure
        }
    }

    fn resolve_target(&mut self, position: Vec2, force_player: bool, world: &impl TargetWorld) {
        let chosen = select_target(
            &self.candidates,
            position,
            &self.behaviour.targeting,
            force_player,
            |entity| world.position(entity),
        );

        self.target = None;
        if let Some(candidate) = chosen {
            if world.is_alive(candidate.owner) == Some(true) {
                self.target = Some(candidate);
            } else {
                self.candidates.remove(candidate.collider);
            }
        }
    }

    fn goal_position(&self, world: &impl TargetWorld) -> Option<Vec2> {
        self.goal.and_then(|goal| world.position(goal.entity()))
    }

    fn current_hit(&self) -> Option<Hit> {
        let target = self.target?;
        let amount = damage_for(
            target.category,
            &self.behaviour.attack,
            self.stats.wall_damage,
            self.behaviour.targeting.can_target_player,
        )?;
        Some(Hit {
            target: target.owner,
            amount,
            category: target.category,
        })
    }

    fn set_state(&mut self, next: AgentState) {
        if self.state == next || self.is_dead() {
            return;
        }
        self.log_transition(next);
        self.state = next;

        match next {
            AgentState::Attack => {
                self.velocity = Vec2::ZERO;
                self.follower.invalidate();
                self.attack.cancel_hit();
            }
            AgentState::MoveToGoal => {
                self.attack.cancel_hit();
                self.follower.repath_now();
            }
            AgentState::Dead => {}
        }
    }

    fn log_transition(&self, next: AgentState) {
        if self.behaviour.log_state_changes {
            info!("Enemy state {:?} -> {:?}", self.state, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::data::{AggroConfig, TargetingConfig};
    use crate::pathing::PathRequest;
    use std::collections::HashMap;

    const SELF_ID: u32 = 100;

    #[derive(Default)]
    struct FakeWorld {
        positions: HashMap<Entity, Vec2>,
        alive: HashMap<Entity, bool>,
        house: Option<Entity>,
        player: Option<Entity>,
        next: u32,
    }

    impl FakeWorld {
        fn spawn(&mut self, position: Vec2, alive: Option<bool>) -> Entity {
            self.next += 1;
            let entity = Entity::from_raw(self.next);
            self.positions.insert(entity, position);
            if let Some(alive) = alive {
                self.alive.insert(entity, alive);
            }
            entity
        }

        fn with_house(mut self, position: Vec2) -> Self {
            self.house = Some(self.spawn(position, Some(true)));
            self
        }
    }

    impl TargetWorld for FakeWorld {
        fn position(&self, entity: Entity) -> Option<Vec2> {
            self.positions.get(&entity).copied()
        }

        fn is_alive(&self, entity: Entity) -> Option<bool> {
            self.alive.get(&entity).copied()
        }

        fn find_house(&self) -> Option<Entity> {
            self.house
        }

        fn find_player(&self) -> Option<Entity> {
            self.player
        }
    }

    #[derive(Default)]
    struct RecordingPlanner {
        busy: bool,
        requests: Vec<PathRequest>,
    }

    impl PathPlanner for RecordingPlanner {
        fn request_path(&mut self, request: PathRequest) -> bool {
            if self.busy {
                return false;
            }
            self.requests.push(request);
            true
        }

        fn is_idle(&self, _requester: Entity) -> bool {
            !self.busy
        }

        fn drain_completed(&mut self) -> Vec<PathResult> {
            Vec::new()
        }
    }

    fn id() -> Entity {
        Entity::from_raw(SELF_ID)
    }

    fn agent(behaviour: EnemyBehaviour) -> EnemyAgent {
        EnemyAgent::new(behaviour)
    }

    fn tick(agent: &mut EnemyAgent, now: f32, world: &FakeWorld, planner: &mut RecordingPlanner) -> Option<Hit> {
        agent.tick_frame(id(), now, Vec2::ZERO, world, planner)
    }

    #[test]
    fn die_is_idempotent() {
        let world = FakeWorld::default().with_house(Vec2::new(5.0, 0.0));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);
        enemy.tick_physics(0.0, Vec2::ZERO, &world);
        assert_ne!(enemy.velocity(), Vec2::ZERO);

        assert!(enemy.die());
        assert!(!enemy.die());
        assert_eq!(enemy.state(), AgentState::Dead);
        assert_eq!(enemy.velocity(), Vec2::ZERO);

        assert_eq!(tick(&mut enemy, 1.0, &world, &mut planner), None);
        let outcome = enemy.tick_physics(1.0, Vec2::ZERO, &world);
        assert_eq!(outcome.velocity, Vec2::ZERO);
        assert_eq!(enemy.state(), AgentState::Dead);
    }

    #[test]
    fn speed_multiplier_floor() {
        let mut enemy = agent(EnemyBehaviour::default());
        let base = enemy.stats().base_move_speed;

        enemy.apply_speed_multiplier(0.0);
        assert_eq!(enemy.stats().move_speed, base * 0.01);
        enemy.apply_speed_multiplier(-5.0);
        assert_eq!(enemy.stats().move_speed, base * 0.01);
    }

    #[test]
    fn walks_to_house_and_requests_paths() {
        let world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);

        assert_eq!(enemy.state(), AgentState::MoveToGoal);
        assert_eq!(enemy.goal(), world.house.map(MoveGoal::House));
        assert_eq!(planner.requests.len(), 1);
        assert_eq!(planner.requests[0].goal, Vec2::new(4.0, 0.0));

        let outcome = enemy.tick_physics(0.0, Vec2::ZERO, &world);
        assert_eq!(outcome.velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn repath_respects_interval_and_busy_planner() {
        let world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        for step in 0..4 {
            tick(&mut enemy, step as f32 * 0.125, &world, &mut planner);
        }
        assert_eq!(planner.requests.len(), 1);

        planner.busy = true;
        tick(&mut enemy, 0.5, &world, &mut planner);
        assert_eq!(planner.requests.len(), 1);

        planner.busy = false;
        tick(&mut enemy, 1.0, &world, &mut planner);
        assert_eq!(planner.requests.len(), 2);
    }

    #[test]
    fn live_candidate_switches_to_attack() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);
        let generation = enemy.follower().generation();

        assert!(enemy.sensor_enter(wall, wall, TargetCategory::Wall));
        tick(&mut enemy, 0.1, &world, &mut planner);

        assert_eq!(enemy.state(), AgentState::Attack);
        assert_eq!(enemy.target().map(|t| t.owner), Some(wall));
        assert_eq!(enemy.velocity(), Vec2::ZERO);
        assert!(enemy.follower().generation() > generation);
        assert_eq!(enemy.follower().path(), None);

        enemy.sensor_exit(wall);
        tick(&mut enemy, 0.2, &world, &mut planner);
        assert_eq!(enemy.state(), AgentState::MoveToGoal);
    }

    #[test]
    fn dead_target_is_dropped() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(false));
        let no_health = world.spawn(Vec2::new(0.6, 0.0), None);
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        enemy.sensor_enter(no_health, no_health, TargetCategory::Wall);

        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.target(), None);
        assert_eq!(enemy.candidates().len(), 1);

        tick(&mut enemy, 0.1, &world, &mut planner);
        assert!(enemy.candidates().is_empty());
        assert_eq!(enemy.state(), AgentState::MoveToGoal);
    }

    #[test]
    fn destroyed_candidates_are_pruned() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        world.positions.remove(&wall);
        tick(&mut enemy, 0.0, &world, &mut planner);

        assert!(enemy.candidates().is_empty());
    }

    #[test]
    fn timer_hit_lands_once_per_cycle() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());
        enemy.apply_wall_damage_multiplier(2.0);
        enemy.sensor_enter(wall, wall, TargetCategory::Wall);

        tick(&mut enemy, 0.0, &world, &mut planner);
        assert!(enemy.tick_physics(0.0, Vec2::ZERO, &world).attack_started);
        assert!(!enemy.tick_physics(0.1, Vec2::ZERO, &world).attack_started);

        assert_eq!(tick(&mut enemy, 0.1, &world, &mut planner), None);
        let hit = tick(&mut enemy, 0.25, &world, &mut planner);
        assert_eq!(
            hit,
            Some(Hit {
                target: wall,
                amount: 10,
                category: TargetCategory::Wall
            })
        );
        assert_eq!(tick(&mut enemy, 0.3, &world, &mut planner), None);

        assert!(!enemy.tick_physics(0.9, Vec2::ZERO, &world).attack_started);
        assert!(enemy.tick_physics(1.0, Vec2::ZERO, &world).attack_started);
    }

    #[test]
    fn external_hit_needs_a_started_cycle() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut behaviour = EnemyBehaviour::default();
        behaviour.attack.hit_confirmation = HitConfirmation::External;
        let mut enemy = agent(behaviour);

        // Not attacking yet.
        assert_eq!(enemy.confirm_external_hit(), None);

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.confirm_external_hit(), None);

        enemy.tick_physics(0.0, Vec2::ZERO, &world);
        // The timer never lands damage in this mode.
        assert_eq!(tick(&mut enemy, 5.0, &world, &mut planner), None);

        assert_eq!(enemy.confirm_external_hit().map(|h| h.target), Some(wall));
        assert_eq!(enemy.confirm_external_hit(), None);
    }

    #[test]
    fn external_confirm_ignored_in_timer_mode() {
        let mut world = FakeWorld::default().with_house(Vec2::new(4.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        enemy.tick_physics(0.0, Vec2::ZERO, &world);

        assert_eq!(enemy.confirm_external_hit(), None);
        assert!(enemy.attack().hit_pending());
    }

    #[test]
    fn prefers_player_over_nearer_wall() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let player = world.spawn(Vec2::new(5.0, 0.0), Some(true));
        let wall = world.spawn(Vec2::new(1.0, 0.0), Some(true));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();

        let mut enemy = agent(EnemyBehaviour::default());
        enemy.sensor_enter(player, player, TargetCategory::Player);
        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.target().map(|t| t.owner), Some(player));

        let mut behaviour = EnemyBehaviour::default();
        behaviour.targeting.prefer_player_over_wall = false;
        let mut enemy = agent(behaviour);
        enemy.sensor_enter(player, player, TargetCategory::Player);
        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.target().map(|t| t.owner), Some(wall));
    }

    #[test]
    fn aggro_breaks_wall_attack_and_chases_player() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let player = world.spawn(Vec2::new(10.0, 10.0), Some(true));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.state(), AgentState::Attack);

        world.positions.insert(player, Vec2::new(0.0, 2.0));
        tick(&mut enemy, 0.1, &world, &mut planner);

        assert!(enemy.aggro().is_chasing());
        assert_eq!(enemy.target(), None);
        assert_eq!(enemy.state(), AgentState::MoveToGoal);
        assert_eq!(enemy.goal(), Some(MoveGoal::Player(player)));
    }

    #[test]
    fn holds_wall_attack_when_breaking_is_disabled() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let wall = world.spawn(Vec2::new(0.5, 0.0), Some(true));
        let player = world.spawn(Vec2::new(10.0, 10.0), Some(true));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();
        let mut behaviour = EnemyBehaviour::default();
        behaviour.targeting.break_wall_attack_when_aggro_player = false;
        let mut enemy = agent(behaviour);

        enemy.sensor_enter(wall, wall, TargetCategory::Wall);
        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.state(), AgentState::Attack);

        world.positions.insert(player, Vec2::new(0.0, 2.0));
        tick(&mut enemy, 0.1, &world, &mut planner);

        assert!(enemy.aggro().is_chasing());
        assert_eq!(enemy.target().map(|t| t.owner), Some(wall));
        assert_eq!(enemy.state(), AgentState::Attack);
    }

    #[test]
    fn goal_switch_makes_old_paths_stale() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let player = world.spawn(Vec2::new(20.0, 0.0), Some(true));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);
        let to_house = planner.requests[0];

        world.positions.insert(player, Vec2::new(1.0, 0.0));
        tick(&mut enemy, 0.1, &world, &mut planner);
        assert_eq!(enemy.goal(), Some(MoveGoal::Player(player)));

        let late = PathResult::for_request(&to_house, Ok(vec![Vec2::new(9.0, 0.0)]));
        assert_eq!(enemy.accept_path(late), PathAcceptance::Stale);

        let to_player = *planner.requests.last().unwrap();
        assert_eq!(to_player.goal, Vec2::new(1.0, 0.0));
        let fresh = PathResult::for_request(&to_player, Ok(vec![Vec2::new(1.0, 0.0)]));
        assert_eq!(enemy.accept_path(fresh), PathAcceptance::Accepted);
    }

    #[test]
    fn being_hit_forces_pursuit() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let player = world.spawn(Vec2::new(6.0, 0.0), Some(true));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);
        assert!(!enemy.aggro().is_chasing());

        enemy.notify_attacked(0.1, Some(player));
        tick(&mut enemy, 0.1, &world, &mut planner);
        assert_eq!(enemy.goal(), Some(MoveGoal::Player(player)));

        tick(&mut enemy, 3.2, &world, &mut planner);
        assert_eq!(enemy.goal(), world.house.map(MoveGoal::House));
    }

    #[test]
    fn notify_attacked_ignored_without_player_targeting() {
        let mut behaviour = EnemyBehaviour::default();
        behaviour.targeting = TargetingConfig {
            can_target_player: false,
            ..TargetingConfig::default()
        };
        behaviour.aggro = AggroConfig::default();
        let mut enemy = agent(behaviour);

        enemy.notify_attacked(1.0, None);
        assert_eq!(enemy.aggro().forced_until(), None);

        let player = Entity::from_raw(7);
        assert!(!enemy.sensor_enter(player, player, TargetCategory::Player));
        assert!(!enemy.sensor_enter(player, player, TargetCategory::Unknown));
    }

    #[test]
    fn dead_player_is_not_chased() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let player = world.spawn(Vec2::new(1.0, 0.0), Some(false));
        world.player = Some(player);
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default());

        tick(&mut enemy, 0.0, &world, &mut planner);

        assert!(!enemy.aggro().is_chasing());
        assert_eq!(enemy.goal(), world.house.map(MoveGoal::House));
    }

    #[test]
    fn house_override_wins_until_it_is_gone() {
        let mut world = FakeWorld::default().with_house(Vec2::new(9.0, 0.0));
        let decoy = world.spawn(Vec2::new(-3.0, 0.0), Some(true));
        let mut planner = RecordingPlanner::default();
        let mut enemy = agent(EnemyBehaviour::default()).with_house(decoy);

        tick(&mut enemy, 0.0, &world, &mut planner);
        assert_eq!(enemy.house(), Some(decoy));

        world.positions.remove(&decoy);
        tick(&mut enemy, 0.1, &world, &mut planner);
        assert_eq!(enemy.house(), world.house);
    }
}
