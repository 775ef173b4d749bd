//! Waypoint following and repath throttling.

use bevy::prelude::*;

use super::data::MovementConfig;
use crate::pathing::{PathRequest, PathResult};

/// What happened to a delivered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAcceptance {
    /// Computed for a goal the agent has since left.
    Stale,
    /// The planner could not find a route; the previous path is kept.
    Failed,
    Accepted,
}

/// The agent's current path and the cursor into it.
#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    path: Option<Vec<Vec2>>,
    waypoint: usize,
    next_repath_at: f32,
    generation: u64,
}

impl PathFollower {
    pub fn path(&self) -> Option<&[Vec2]> {
        self.path.as_deref()
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoint
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn next_repath_at(&self) -> f32 {
        self.next_repath_at
    }

    /// Forget the current path. Results of requests already in flight
    /// become stale.
    pub fn invalidate(&mut self) {
        self.path = None;
        self.waypoint = 0;
        self.generation += 1;
    }

    /// Allow a repath on the next poll.
    pub fn repath_now(&mut self) {
        self.next_repath_at = f32::NEG_INFINITY;
    }

    /// Whether a request should be sent now.
    ///
    /// The throttle restarts whenever the interval has elapsed, even when the
    /// planner is busy and nothing is sent.
    pub fn poll_repath(&mut self, now: f32, interval: f32, planner_idle: bool) -> bool {
        if now < self.next_repath_at {
            return false;
        }
        self.next_repath_at = now + interval;
        planner_idle
    }

    pub fn make_request(&self, requester: Entity, start: Vec2, goal: Vec2) -> PathRequest {
        PathRequest {
            requester,
            start,
            goal,
            generation: self.generation,
        }
    }

    /// Take a planner result if it still belongs to the current goal.
    pub fn accept(&mut self, result: PathResult) -> PathAcceptance {
        if result.generation != self.generation {
            return PathAcceptance::Stale;
        }
        match result.outcome {
            Ok(waypoints) => {
                self.path = Some(waypoints);
                self.waypoint = 0;
                PathAcceptance::Accepted
            }
            Err(_) => PathAcceptance::Failed,
        }
    }

    /// Velocity for this physics step.
    ///
    /// Without a path the agent heads straight for `goal`. Reaching a
    /// waypoint advances the cursor and steers toward the next one in the
    /// same call; past the last waypoint the agent stops.
    pub fn steer(&mut self, position: Vec2, goal: Vec2, config: &MovementConfig, speed: f32) -> Vec2 {
        let path = match self.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => return heading(goal - position, config.lock_y) * speed,
        };

        let Some(mut waypoint) = path.get(self.waypoint).copied() else {
            return Vec2::ZERO;
        };

        if position.distance(waypoint) <= config.next_waypoint_distance {
            self.waypoint += 1;
            match path.get(self.waypoint) {
                Some(next) => waypoint = *next,
                None => return Vec2::ZERO,
            }
        }

        heading(waypoint - position, config.lock_y) * speed
    }
}

fn heading(to: Vec2, lock_y: bool) -> Vec2 {
    let mut direction = to.normalize_or_zero();
    if lock_y {
        direction.y = 0.0;
    }
    direction
}
