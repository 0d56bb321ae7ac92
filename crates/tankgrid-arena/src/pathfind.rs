//! Breadth-first path search over tank anchor cells.
//!
//! A path is a list of unit steps from the start cell. The search stops as
//! soon as it discovers a cell within two cells of the goal on both axes,
//! since goals are themselves 2x2 mobile boxes. The frontier is capped to
//! bound worst-case cost; a capped search may miss reachable goals.

use std::collections::VecDeque;

use glam::{DVec2, IVec2};
use log::debug;
use serde::{Deserialize, Serialize};

use tankgrid_core::constants::{AI_PATH_FRONTIER_BUDGET, GRID_SIZE};
use tankgrid_core::types::{Direction, Rect, TANK_MAX_COORD};

use crate::grid::{Arena, ObstaclePolicy, Tile};

/// Cells within this distance of the goal on both axes count as arrival.
pub const GOAL_TOLERANCE: i32 = 2;

/// A brick that has to be shot before a permeable path can be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickTarget {
    pub cell: IVec2,
    /// Path anchor at which the tank footprint first meets the brick.
    pub stand: IVec2,
}

/// Outcome of a two-policy search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPlan {
    pub steps: Vec<Direction>,
    /// Set when only the brick-permeable search succeeded.
    pub brick_blocked: bool,
    pub brick: Option<BrickTarget>,
}

impl PathPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn anchor_in_bounds(cell: IVec2) -> bool {
    let max = TANK_MAX_COORD as i32;
    cell.x >= 0 && cell.y >= 0 && cell.x <= max && cell.y <= max
}

fn near_goal(cell: IVec2, goal: IVec2) -> bool {
    let d = (cell - goal).abs();
    d.x <= GOAL_TOLERANCE && d.y <= GOAL_TOLERANCE
}

/// Single-policy BFS from `start` toward `goal`. Empty when no route was
/// found inside the frontier budget.
pub fn find_path_with(arena: &Arena, start: IVec2, goal: IVec2, policy: ObstaclePolicy) -> Vec<Direction> {
    let width = GRID_SIZE as usize;
    let slot = |c: IVec2| c.y as usize * width + c.x as usize;

    let mut came_from: Vec<Option<(IVec2, Direction)>> = vec![None; width * width];
    let mut visited = vec![false; width * width];
    if anchor_in_bounds(start) {
        visited[slot(start)] = true;
    }

    let mut queue = VecDeque::from([start]);
    while queue.len() < AI_PATH_FRONTIER_BUDGET {
        let Some(current) = queue.pop_front() else {
            break;
        };
        for dir in Direction::ALL {
            let next = current + dir.step();
            if !anchor_in_bounds(next) || arena.blocks_tank(next.as_dvec2(), policy) {
                continue;
            }
            if visited[slot(next)] {
                continue;
            }
            visited[slot(next)] = true;
            came_from[slot(next)] = Some((current, dir));

            if near_goal(next, goal) {
                return unwind(&came_from, start, next, slot);
            }
            queue.push_back(next);
        }
    }
    Vec::new()
}

fn unwind(
    came_from: &[Option<(IVec2, Direction)>],
    start: IVec2,
    end: IVec2,
    slot: impl Fn(IVec2) -> usize,
) -> Vec<Direction> {
    let mut steps = Vec::new();
    let mut cursor = end;
    while cursor != start {
        match came_from[slot(cursor)] {
            Some((prev, dir)) => {
                steps.push(dir);
                cursor = prev;
            }
            None => break,
        }
    }
    steps.reverse();
    steps
}

/// Walk `steps` from `start` and return the first brick the footprint meets.
pub fn find_first_brick(arena: &Arena, start: IVec2, steps: &[Direction]) -> Option<BrickTarget> {
    let mut anchor = start;
    for step in steps {
        anchor += step.step();
        let hit = Arena::cells_overlapping(&Rect::tank(anchor.as_dvec2()))
            .find(|cell| matches!(arena.tile(*cell), Tile::Brick(q) if q.is_alive()));
        if let Some(cell) = hit {
            return Some(BrickTarget { cell, stand: anchor });
        }
    }
    None
}

/// Plan a route from a physical box anchor to `target` (rounded).
///
/// Tries bricks-solid first. If that fails, retries with bricks permeable
/// and reports the first brick on the route as a sub-goal.
pub fn plan_path(arena: &Arena, start: IVec2, target: DVec2) -> PathPlan {
    let goal = target.round().as_ivec2();
    if start == goal {
        return PathPlan::default();
    }

    let steps = find_path_with(arena, start, goal, ObstaclePolicy::BricksSolid);
    if !steps.is_empty() {
        return PathPlan {
            steps,
            brick_blocked: false,
            brick: None,
        };
    }

    let steps = find_path_with(arena, start, goal, ObstaclePolicy::BricksPermeable);
    if steps.is_empty() {
        return PathPlan::default();
    }
    let brick = find_first_brick(arena, start, &steps);
    debug!(
        "path {:?} -> {:?} needs brick clearing ({} steps, brick {:?})",
        start,
        goal,
        steps.len(),
        brick.map(|b| b.cell)
    );
    PathPlan {
        steps,
        brick_blocked: true,
        brick,
    }
}

/// Sum of a step list as a displacement.
pub fn displacement(steps: &[Direction]) -> IVec2 {
    steps.iter().map(|d| d.step()).sum()
}
