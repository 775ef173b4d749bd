//! Path planner contract shared by planners and agents.

use bevy::prelude::*;
use thiserror::Error;

/// Why a path could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Start or goal lies outside the navigable area.
    #[error("{which} position {cell} is outside the navigation grid")]
    OutOfBounds { which: &'static str, cell: IVec2 },

    /// Every route to the goal is blocked.
    #[error("no route from {start} to {goal}")]
    NoRoute { start: IVec2, goal: IVec2 },
}

/// A request for a path from `start` to `goal`.
///
/// `generation` is echoed back in the result so the requester can tell
/// whether the answer still matches what it wants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRequest {
    pub requester: Entity,
    pub start: Vec2,
    pub goal: Vec2,
    pub generation: u64,
}

/// A finished path request.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub requester: Entity,
    pub generation: u64,
    /// Waypoints in travel order, ending at the goal.
    pub outcome: Result<Vec<Vec2>, PathError>,
}

impl PathResult {
    pub fn for_request(request: &PathRequest, outcome: Result<Vec<Vec2>, PathError>) -> Self {
        Self {
            requester: request.requester,
            generation: request.generation,
            outcome,
        }
    }
}

/// An asynchronous path planning service.
///
/// Each requester may have at most one request outstanding; further requests
/// are dropped until the planner has delivered the pending one.
pub trait PathPlanner: Send + Sync + 'static {
    /// Queue a request. Returns false if it was dropped because the
    /// requester already has one in flight.
    fn request_path(&mut self, request: PathRequest) -> bool;

    /// Whether `requester` has no request in flight.
    fn is_idle(&self, requester: Entity) -> bool;

    /// Hand over every request finished since the last call.
    fn drain_completed(&mut self) -> Vec<PathResult>;

    /// Make an area impassable. Planners without a notion of obstacles ignore it.
    fn mark_obstacle(&mut self, _center: Vec2, _half_extents: Vec2) {}

    /// Undo [`PathPlanner::mark_obstacle`] for a destroyed obstacle.
    fn clear_obstacle(&mut self, _center: Vec2, _half_extents: Vec2) {}
}

/// The path planner used by every enemy.
#[derive(Resource, Deref, DerefMut)]
pub struct PathPlanning(pub Box<dyn PathPlanner>);

impl PathPlanning {
    pub fn new(planner: impl PathPlanner) -> Self {
        Self(Box::new(planner))
    }

    pub fn planner_mut(&mut self) -> &mut dyn PathPlanner {
        self.0.as_mut()
    }
}
