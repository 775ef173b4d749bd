//! Uniform grid navigation and an A* planner over it.

use bevy::prelude::*;
use pathfinding::prelude::astar;

use super::planner::{PathError, PathPlanner, PathRequest, PathResult};

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

/// A rectangular grid of walkable/blocked cells in world space.
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// World position of the lower-left corner of cell (0, 0).
    pub origin: Vec2,
    pub cell_size: f32,
    pub width: i32,
    pub height: i32,
    blocked: Vec<bool>,
}

impl Default for NavGrid {
    fn default() -> Self {
        Self::new(Vec2::splat(-20.0), 0.5, 80, 80)
    }
}

impl NavGrid {
    pub fn new(origin: Vec2, cell_size: f32, width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            origin,
            cell_size: cell_size.max(0.01),
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        }
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Cell containing `position`, even when it lies outside the grid.
    pub fn cell_at(&self, position: Vec2) -> IVec2 {
        ((position - self.origin) / self.cell_size).floor().as_ivec2()
    }

    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    pub fn is_blocked(&self, cell: IVec2) -> bool {
        match self.index(cell) {
            Some(i) => self.blocked[i],
            None => true,
        }
    }

    pub fn set_blocked(&mut self, cell: IVec2, blocked: bool) {
        if let Some(i) = self.index(cell) {
            self.blocked[i] = blocked;
        }
    }

    /// Block every cell overlapping the axis-aligned box.
    pub fn block_rect(&mut self, center: Vec2, half_extents: Vec2) {
        self.set_rect(center, half_extents, true);
    }

    /// Reopen every cell overlapping the axis-aligned box.
    pub fn clear_rect(&mut self, center: Vec2, half_extents: Vec2) {
        self.set_rect(center, half_extents, false);
    }

    fn set_rect(&mut self, center: Vec2, half_extents: Vec2, blocked: bool) {
        let min = self.cell_at(center - half_extents);
        let max = self.cell_at(center + half_extents);
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.set_blocked(IVec2::new(x, y), blocked);
            }
        }
    }

    /// Plan a route from `start` to `goal`.
    ///
    /// The goal cell counts as walkable even when blocked, so agents can path
    /// up to a structure that sits on obstacles. The returned waypoints skip
    /// the start cell and end exactly at `goal`.
    pub fn find_path(&self, start: Vec2, goal: Vec2) -> Result<Vec<Vec2>, PathError> {
        let start_cell = self.cell_at(start);
        let goal_cell = self.cell_at(goal);

        if !self.in_bounds(start_cell) {
            return Err(PathError::OutOfBounds {
                which: "start",
                cell: start_cell,
            });
        }
        if !self.in_bounds(goal_cell) {
            return Err(PathError::OutOfBounds {
                which: "goal",
                cell: goal_cell,
            });
        }

        let (cells, _cost) = astar(
            &start_cell,
            |cell| self.successors(*cell, goal_cell),
            |cell| octile_distance(*cell, goal_cell),
            |cell| *cell == goal_cell,
        )
        .ok_or(PathError::NoRoute {
            start: start_cell,
            goal: goal_cell,
        })?;

        let mut waypoints: Vec<Vec2> = cells
            .iter()
            .skip(1)
            .map(|cell| self.cell_center(*cell))
            .collect();
        match waypoints.last_mut() {
            Some(last) => *last = goal,
            None => waypoints.push(goal),
        }
        Ok(waypoints)
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    fn walkable(&self, cell: IVec2, goal: IVec2) -> bool {
        cell == goal || (self.in_bounds(cell) && !self.is_blocked(cell))
    }

    fn successors(&self, cell: IVec2, goal: IVec2) -> Vec<(IVec2, u32)> {
        let mut out = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let next = cell + IVec2::new(dx, dy);
                if !self.walkable(next, goal) {
                    continue;
                }
                if dx != 0 && dy != 0 {
                    // No corner cutting: both orthogonal neighbours must be open.
                    let side_a = cell + IVec2::new(dx, 0);
                    let side_b = cell + IVec2::new(0, dy);
                    if !self.walkable(side_a, goal) || !self.walkable(side_b, goal) {
                        continue;
                    }
                    out.push((next, DIAGONAL_COST));
                } else {
                    out.push((next, STRAIGHT_COST));
                }
            }
        }
        out
    }
}

fn octile_distance(a: IVec2, b: IVec2) -> u32 {
    let d = (a - b).abs();
    let (low, high) = (d.x.min(d.y) as u32, d.x.max(d.y) as u32);
    STRAIGHT_COST * high + (DIAGONAL_COST - STRAIGHT_COST) * low
}

/// Grid planner answering queued requests on the next drain.
#[derive(Debug, Default)]
pub struct GridPathPlanner {
    pub grid: NavGrid,
    pending: Vec<PathRequest>,
}

impl GridPathPlanner {
    pub fn new(grid: NavGrid) -> Self {
        Self {
            grid,
            pending: Vec::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl PathPlanner for GridPathPlanner {
    fn request_path(&mut self, request: PathRequest) -> bool {
        if !self.is_idle(request.requester) {
            return false;
        }
        self.pending.push(request);
        true
    }

    fn is_idle(&self, requester: Entity) -> bool {
        !self.pending.iter().any(|r| r.requester == requester)
    }

    fn drain_completed(&mut self) -> Vec<PathResult> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .iter()
            .map(|request| PathResult::for_request(request, self.grid.find_path(request.start, request.goal)))
            .collect()
    }

    fn mark_obstacle(&mut self, center: Vec2, half_extents: Vec2) {
        self.grid.block_rect(center, half_extents);
    }

    fn clear_obstacle(&mut self, center: Vec2, half_extents: Vec2) {
        self.grid.clear_rect(center, half_extents);
    }
}
