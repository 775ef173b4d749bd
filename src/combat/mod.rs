//! Combat module - health pools, damage application, and death notification.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{apply_damage, despawn_on_death, CombatSet};
