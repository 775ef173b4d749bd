//! Global events used for cross-system communication.
//!
//! Events allow decoupled systems to communicate. For example, the enemy
//! attack cycle sends DamageEvents, and the health system receives them to
//! apply damage. This keeps systems independent and testable.

use bevy::prelude::*;

/// Sent when an entity should take damage.
///
/// The damage system listens for these events and applies the actual
/// health reduction.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Entity receiving damage (the one holding the `Health`)
    pub target: Entity,
    /// Entity that caused the damage, if any
    pub source: Option<Entity>,
    /// Damage amount in hit points
    pub amount: i32,
}

/// Sent on every hit point change, including the one that kills.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChangedEvent {
    pub entity: Entity,
    pub current: i32,
    pub maximum: i32,
}

/// Sent exactly once when an entity dies (health reaches 0).
///
/// Systems can listen for this to stop enemy AI, update wave counters,
/// end the game when the core falls, etc.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
