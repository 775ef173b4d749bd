//! World module - the arena, its house and walls, and the loss condition.

mod components;
mod data;
mod plugin;

pub use components::*;
pub use data::{ArenaLayout, ArenaLayoutRaw, CurrentArena};
pub use plugin::{build_arena, check_defeat, setup_arena, WorldPlugin};
