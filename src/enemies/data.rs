//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::targeting::TargetCategory;
use crate::core::{load_ron_file, ron_files_in};

/// How a started attack turns into damage.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitConfirmation {
    /// Damage lands `windup` seconds after the swing starts.
    #[default]
    Timer,
    /// Damage lands when something outside the AI (usually the attack
    /// animation's hit frame) sends an `AttackHitEvent`.
    External,
}

/// Which targets an enemy may pick and in what order.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TargetingConfig {
    pub can_target_player: bool,
    pub can_target_core: bool,
    pub prefer_player_over_wall: bool,
    pub prefer_wall_over_core: bool,
    /// Drop a wall/core attack as soon as player pursuit begins.
    pub break_wall_attack_when_aggro_player: bool,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            can_target_player: true,
            can_target_core: true,
            prefer_player_over_wall: true,
            prefer_wall_over_core: true,
            break_wall_attack_when_aggro_player: true,
        }
    }
}

impl TargetingConfig {
    /// Whether colliders of this category may become candidates at all.
    pub fn accepts(&self, category: TargetCategory) -> bool {
        match category {
            TargetCategory::Player => self.can_target_player,
            TargetCategory::Wall => true,
            TargetCategory::Core => self.can_target_core,
            TargetCategory::Unknown => false,
        }
    }
}

/// Reactive player pursuit tuning.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AggroConfig {
    /// Start chasing the player inside this distance.
    pub aggro_range: f32,
    /// Stop chasing only beyond this distance (never less than `aggro_range`).
    pub disengage_range: f32,
    /// How long being hit forces pursuit.
    pub hit_aggro_duration: f32,
    /// Forced pursuit ignores players farther than this.
    pub hit_aggro_max_distance: f32,
    /// Minimum delay between player lookups while none is known.
    pub player_requery_interval: f32,
}

impl Default for AggroConfig {
    fn default() -> Self {
        Self {
            aggro_range: 3.0,
            disengage_range: 4.5,
            hit_aggro_duration: 3.0,
            hit_aggro_max_distance: 8.0,
            player_requery_interval: 0.5,
        }
    }
}

/// Damage and timing of the attack cycle.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AttackConfig {
    pub player_damage: i32,
    /// Base wall damage before wave multipliers.
    pub wall_damage: i32,
    pub core_damage: i32,
    /// Seconds between swing starts (windup included).
    pub cooldown: f32,
    /// Seconds from swing start to damage in timer mode.
    pub windup: f32,
    pub hit_confirmation: HitConfirmation,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            player_damage: 5,
            wall_damage: 5,
            core_damage: 5,
            cooldown: 1.0,
            windup: 0.25,
            hit_confirmation: HitConfirmation::Timer,
        }
    }
}

/// Path following tuning.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Base move speed before wave multipliers.
    pub move_speed: f32,
    pub repath_interval: f32,
    pub next_waypoint_distance: f32,
    /// Side-on levels: never move along Y.
    pub lock_y: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            repath_interval: 0.5,
            next_waypoint_distance: 0.2,
            lock_y: false,
        }
    }
}

/// Detection volume around the enemy.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    pub radius: f32,
    /// Collision group bits a collider must belong to to be detected.
    pub target_layers: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            radius: 0.8,
            target_layers: u32::MAX,
        }
    }
}

/// Per-enemy AI configuration, shared by every tick of the agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyBehaviour {
    pub targeting: TargetingConfig,
    pub aggro: AggroConfig,
    pub attack: AttackConfig,
    pub movement: MovementConfig,
    pub log_state_changes: bool,
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: i32,
    #[serde(default = "default_body_radius")]
    pub body_radius: f32,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub targeting: TargetingConfig,
    #[serde(default)]
    pub aggro: AggroConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub log_state_changes: bool,
}

fn default_body_radius() -> f32 {
    0.25
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Zombie".to_string(),
            max_health: 10,
            body_radius: default_body_radius(),
            movement: MovementConfig::default(),
            attack: AttackConfig::default(),
            targeting: TargetingConfig::default(),
            aggro: AggroConfig::default(),
            sensor: SensorConfig::default(),
            log_state_changes: false,
        }
    }
}

impl EnemyDefinition {
    /// Clamp values that would break the AI into their safe ranges.
    pub fn sanitized(mut self) -> Self {
        self.max_health = self.max_health.max(1);
        self.body_radius = self.body_radius.max(0.01);

        let movement = &mut self.movement;
        movement.move_speed = movement.move_speed.max(0.0);
        movement.repath_interval = movement.repath_interval.max(0.05);
        movement.next_waypoint_distance = movement.next_waypoint_distance.max(0.01);

        let attack = &mut self.attack;
        attack.player_damage = attack.player_damage.max(0);
        attack.wall_damage = attack.wall_damage.max(0);
        attack.core_damage = attack.core_damage.max(0);
        attack.cooldown = attack.cooldown.max(0.05);
        attack.windup = attack.windup.max(0.0);

        let aggro = &mut self.aggro;
        aggro.aggro_range = aggro.aggro_range.max(0.0);
        aggro.disengage_range = aggro.disengage_range.max(aggro.aggro_range);
        aggro.hit_aggro_duration = aggro.hit_aggro_duration.max(0.0);
        aggro.hit_aggro_max_distance = aggro.hit_aggro_max_distance.max(0.0);
        aggro.player_requery_interval = aggro.player_requery_interval.max(0.0);

        self.sensor.radius = self.sensor.radius.max(0.01);
        self
    }

    /// Build the AI configuration for agents of this type.
    pub fn behaviour(&self) -> EnemyBehaviour {
        EnemyBehaviour {
            targeting: self.targeting.clone(),
            aggro: self.aggro.clone(),
            attack: self.attack.clone(),
            movement: self.movement.clone(),
            log_state_changes: self.log_state_changes,
        }
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition.sanitized());
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new("assets/data/enemies");

    let files = match ron_files_in(enemies_dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("Enemy definitions unavailable: {}", e);
            return;
        }
    };

    for path in files {
        let enemy_type = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match load_ron_file::<EnemyDefinition>(&path) {
            Ok(definition) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.insert(enemy_type, definition);
            }
            Err(e) => {
                error!("Failed to load enemy definition: {}", e);
            }
        }
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}
