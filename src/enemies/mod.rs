//! Enemies module - enemy definitions, AI and spawning.

mod aggro;
mod agent;
mod ai;
mod attack;
mod components;
pub mod data;
mod movement;
mod plugin;
mod sensor;
mod spawning;
mod swing;
mod targeting;

pub use aggro::{AggroController, AggroUpdate};
pub use agent::{EnemyAgent, Hit, MoveGoal, PhysicsOutcome, TargetWorld};
pub use ai::{AttackHitEvent, AttackStartedEvent, TargetWorldView};
pub use attack::{damage_for, AttackCycle, AttackPhase};
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use movement::{PathAcceptance, PathFollower};
pub use plugin::{setup_enemy_systems, EnemyPlugin};
pub use sensor::{forward_sensor_events, TargetSensor};
pub use spawning::spawn_enemy;
pub use swing::AttackSwing;
pub use targeting::{select_target, Candidate, TargetCandidates, TargetCategory};
