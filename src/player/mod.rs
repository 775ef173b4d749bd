//! Player module - player entity, movement, and melee attack.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{in_swing_box, spawn_player, swing_direction};
pub use plugin::PlayerPlugin;
