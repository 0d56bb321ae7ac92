//! Enemy future-position prediction for leading shots.
//!
//! An enemy is extrapolated along its facing for a fixed horizon. The
//! prediction is only trusted for distant enemies that have held their
//! heading for a while and whose straight-line route is open.

use glam::DVec2;

use tankgrid_arena::{obstacle_between, Arena};
use tankgrid_core::components::EnemyTank;
use tankgrid_core::constants::*;
use tankgrid_core::state::PredictionView;
use tankgrid_core::types::{clamp_tank_position, Direction};

use crate::targeting::dominant_direction;

/// Where the enemy will be after the prediction horizon if it keeps going.
pub fn future_position(enemy: &EnemyTank) -> DVec2 {
    let travel = enemy.speed / CELL_SIZE * AI_PREDICTION_FRAMES as f64;
    clamp_tank_position(enemy.hull.position + enemy.hull.facing.unit() * travel)
}

/// Worth leading: far enough away and steady on its heading.
pub fn should_predict(enemy: &EnemyTank, me: DVec2, tick: u64) -> bool {
    let distance = enemy.hull.position.distance(me);
    if distance < AI_MIN_PREDICTION_DISTANCE || distance < AI_SHOOT_DISTANCE {
        return false;
    }
    tick.saturating_sub(enemy.hull.last_turn_tick) >= AI_PREDICTION_RECENCY_TICKS
}

/// Can the enemy actually drive straight to `future`? Samples the segment
/// twice per cell against solid terrain and rejects routes that stray from
/// the unclamped linear model (e.g. the clamp cut the path short).
pub fn path_to_future_clear(arena: &Arena, enemy: &EnemyTank, future: DVec2) -> bool {
    let start = enemy.hull.position;
    let delta = future - start;
    let steps = (delta.length() * 2.0).ceil() as u32;
    let full_travel = enemy.hull.facing.unit() * (enemy.speed / CELL_SIZE * AI_PREDICTION_FRAMES as f64);

    (0..=steps).all(|i| {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let sample = start + delta * t;
        if arena.blocks_tank_at(sample) {
            return false;
        }
        let expected = start + full_travel * t;
        let drift = (sample - expected).abs();
        drift.x <= AI_PREDICTION_DIVERGENCE && drift.y <= AI_PREDICTION_DIVERGENCE
    })
}

/// Is `future` dead ahead along `direction` with no wall between?
pub fn line_of_sight_to(arena: &Arena, me: DVec2, future: DVec2, direction: Direction) -> bool {
    let d = future - me;
    let lane = if d.x.abs() < AI_ALIGNMENT_TOLERANCE && d.y < 0.0 {
        Some(Direction::Up)
    } else if d.x.abs() < AI_ALIGNMENT_TOLERANCE && d.y > 0.0 {
        Some(Direction::Down)
    } else if d.y.abs() < AI_ALIGNMENT_TOLERANCE && d.x > 0.0 {
        Some(Direction::Right)
    } else if d.y.abs() < AI_ALIGNMENT_TOLERANCE && d.x < 0.0 {
        Some(Direction::Left)
    } else {
        None
    };
    lane == Some(direction) && !obstacle_between(arena, me, future)
}

/// A fully evaluated lead shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadShot {
    pub future: DVec2,
    pub direction: Direction,
    pub path_clear: bool,
    pub line_of_sight: bool,
}

impl LeadShot {
    pub fn is_viable(&self) -> bool {
        self.path_clear && self.line_of_sight
    }

    pub fn view(&self) -> PredictionView {
        PredictionView {
            active: true,
            future_position: Some(self.future),
            path_clear: self.path_clear,
            line_of_sight: self.line_of_sight,
        }
    }
}

/// Evaluate leading `enemy` from `me`. `None` when prediction does not
/// apply to this target at all.
pub fn evaluate(arena: &Arena, enemy: &EnemyTank, me: DVec2, tick: u64) -> Option<LeadShot> {
    if !should_predict(enemy, me, tick) || enemy.hull.position.distance(me) <= AI_PREDICTION_DISTANCE_THRESHOLD {
        return None;
    }
    let future = future_position(enemy);
    let direction = dominant_direction(future - me);
    Some(LeadShot {
        future,
        direction,
        path_clear: path_to_future_clear(arena, enemy, future),
        line_of_sight: line_of_sight_to(arena, me, future, direction),
    })
}
