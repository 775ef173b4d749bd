//! Pathing module - path planning service used by enemy movement.
//!
//! Agents talk to the planner only through the [`PathPlanner`] trait, so the
//! grid planner shipped here can be swapped for any other implementation.

mod grid;
mod planner;
mod plugin;

pub use grid::{GridPathPlanner, NavGrid};
pub use planner::{PathError, PathPlanner, PathPlanning, PathRequest, PathResult};
pub use plugin::{NavObstacle, PathingPlugin};
