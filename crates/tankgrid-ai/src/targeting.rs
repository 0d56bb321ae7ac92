//! Enemy target selection and firing geometry.
//!
//! Positions are tank top-left corners. Lanes are measured between corners,
//! so two 2x2 tanks are "in line" when their corners differ by less than the
//! lane half-width on the cross axis.

use glam::DVec2;

use tankgrid_arena::{obstacle_between, Arena};
use tankgrid_core::components::{Bullet, EnemyTank, Hull};
use tankgrid_core::constants::*;
use tankgrid_core::enums::Shooter;
use tankgrid_core::types::{Direction, Rect};

use crate::view::WorldView;

/// Center of the base, used for the path-to-base bonus.
const BASE_CENTER: DVec2 = DVec2::new(12.5, 24.5);
/// Shot traces advance this far per sample.
const TRACE_STEP: f64 = 0.1;

/// Is `to` in the lane `direction` points at from `from`?
fn in_lane(direction: Direction, from: DVec2, to: DVec2, lane: f64) -> bool {
    let d = to - from;
    match direction {
        Direction::Up => d.x.abs() < lane && d.y < 0.0,
        Direction::Right => d.y.abs() < lane && d.x > 0.0,
        Direction::Down => d.x.abs() < lane && d.y > 0.0,
        Direction::Left => d.y.abs() < lane && d.x < 0.0,
    }
}

/// Cardinal direction along the dominant axis of `delta`. Ties go
/// horizontal.
pub fn dominant_direction(delta: DVec2) -> Direction {
    if delta.x.abs() < delta.y.abs() {
        if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if delta.x > 0.0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

/// Adjacent, or close enough on a diagonal to count as close combat.
pub fn is_next_to(enemy: &EnemyTank, me: DVec2, immediate: f64, close: f64) -> bool {
    if !enemy.hull.alive {
        return false;
    }
    let d = (me - enemy.hull.position).abs();
    let adjacent = (d.x <= immediate && d.y <= 1.5) || (d.y <= immediate && d.x <= 1.5);
    adjacent || d.length() <= close
}

/// Is the enemy pointed at `me` within one cell of its lane?
pub fn enemy_facing(enemy: &EnemyTank, me: DVec2) -> bool {
    if !enemy.hull.alive {
        return false;
    }
    let d = me - enemy.hull.position;
    match enemy.hull.facing {
        Direction::Up => d.x.abs() <= 1.0 && d.y < 0.0,
        Direction::Right => d.y.abs() <= 1.0 && d.x > 0.0,
        Direction::Down => d.x.abs() <= 1.0 && d.y > 0.0,
        Direction::Left => d.y.abs() <= 1.0 && d.x < 0.0,
    }
}

/// Could the enemy hit `me` with a shot fired now?
pub fn enemy_can_shoot(arena: &Arena, enemy: &EnemyTank, me: DVec2) -> bool {
    enemy.hull.alive
        && in_lane(enemy.hull.facing, enemy.hull.position, me, 1.5)
        && !obstacle_between(arena, enemy.hull.position, me)
}

/// Is `target` ahead of the hull, in its lane, with no wall in between?
pub fn has_line_of_sight(arena: &Arena, hull: &Hull, target: DVec2) -> bool {
    in_lane(hull.facing, hull.position, target, 2.0) && !obstacle_between(arena, hull.position, target)
}

/// Line of sight plus a ready weapon and no pending hold.
pub fn can_shoot_from_here(view: &WorldView, hull: &Hull, target: DVec2, hold_ticks: u32) -> bool {
    has_line_of_sight(view.arena, hull, target) && view.weapon_ready() && hold_ticks == 0
}

/// Base-defence priority: how low the enemy is, whether it heads down, an
/// open column to the base, and how easy it is to engage from here.
pub fn strategic_threat(arena: &Arena, enemy: &EnemyTank, me: DVec2) -> f64 {
    if !enemy.hull.alive {
        return 0.0;
    }
    let p = enemy.hull.position;
    let mut threat = p.y * 3.0;
    if enemy.hull.facing == Direction::Down {
        threat += 10.0;
    }
    if (p.x - BASE_CENTER.x).abs() < 2.0 && p.y < BASE_CENTER.y && column_is_open(arena, p) {
        threat += 15.0;
    }
    threat + (30.0 - p.distance(me))
}

/// Can a tank at `from` drive straight down to the base row?
fn column_is_open(arena: &Arena, from: DVec2) -> bool {
    let mut y = from.y;
    while y < BASE_CENTER.y {
        let probe = DVec2::new(from.x, y);
        // The base itself is the destination, not an obstacle.
        if !Rect::tank(probe).overlaps(&arena.base.rect()) && arena.blocks_tank_at(probe) {
            return false;
        }
        y += 0.5;
    }
    true
}

/// First candidate with the strictly highest score.
fn max_by_score<'a>(
    candidates: impl IntoIterator<Item = &'a EnemyTank>,
    score: impl Fn(&EnemyTank) -> f64,
) -> Option<&'a EnemyTank> {
    let mut best: Option<(&'a EnemyTank, f64)> = None;
    for e in candidates {
        let s = score(e);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((e, s));
        }
    }
    best.map(|(e, _)| e)
}

/// Choose the enemy to engage.
///
/// Immediate threats (within 3 cells, facing us in sight, or able to shoot
/// us now) come first, closest wins. Then enemies we could hit right now,
/// preferring low and near ones. Otherwise the highest strategic threat.
pub fn priority_enemy<'a>(view: &WorldView<'a>, hull: &Hull, hold_ticks: u32) -> Option<&'a EnemyTank> {
    let me = hull.position;
    let alive: Vec<&'a EnemyTank> = view.alive_enemies().collect();

    let immediate = alive.iter().copied().filter(|e| {
        let p = e.hull.position;
        p.distance(me) <= IMMEDIATE_SHOOT_DISTANCE
            || (enemy_facing(e, me) && has_line_of_sight(view.arena, hull, p))
            || enemy_can_shoot(view.arena, e, me)
    });
    if let Some(target) = max_by_score(immediate, |e| -e.hull.position.distance(me)) {
        return Some(target);
    }

    let shootable = alive
        .iter()
        .copied()
        .filter(|e| can_shoot_from_here(view, hull, e.hull.position, hold_ticks));
    if let Some(target) = max_by_score(shootable, |e| {
        e.hull.position.y * 2.0 + (20.0 - e.hull.position.distance(me))
    }) {
        return Some(target);
    }

    max_by_score(alive, |e| strategic_threat(view.arena, e, me))
}

/// Aligned with the enemy on either axis within the alignment tolerance.
pub fn is_aligned(me: DVec2, enemy: DVec2) -> bool {
    let d = (me - enemy).abs();
    d.x < AI_ALIGNMENT_TOLERANCE || d.y < AI_ALIGNMENT_TOLERANCE
}

/// Which way to move to line up with an enemy: close the smaller gap.
pub fn alignment_direction(me: DVec2, enemy: DVec2) -> Direction {
    let d = me - enemy;
    if d.x.abs() > d.y.abs() {
        if d.y > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    } else if d.x > 0.0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Firing direction once aligned; `None` if not aligned on either axis.
pub fn aligned_shot_direction(me: DVec2, enemy: DVec2) -> Option<Direction> {
    let d = me - enemy;
    if d.x.abs() < AI_ALIGNMENT_TOLERANCE {
        Some(if d.y > 0.0 { Direction::Up } else { Direction::Down })
    } else if d.y.abs() < AI_ALIGNMENT_TOLERANCE {
        Some(if d.x > 0.0 { Direction::Left } else { Direction::Right })
    } else {
        None
    }
}

/// Would a shot fired from `position` toward `direction` reach the base
/// before any wall or the arena edge?
pub fn shot_hits_base(arena: &Arena, position: DVec2, direction: Direction) -> bool {
    if !arena.base.alive {
        return false;
    }
    let muzzle = Hull::new(position, direction);
    let mut probe = Bullet::fired_from(0, &muzzle, BULLET_SPEED, Shooter::Enemy);
    let base = arena.base.rect();
    let step = direction.unit() * TRACE_STEP;
    loop {
        probe.position += step;
        let rect = probe.rect();
        if rect.overlaps(&base) {
            return true;
        }
        if arena.blocks_sight(&rect) {
            return false;
        }
        let p = probe.position;
        if p.x < 0.0 || p.y < 0.0 || p.x >= GRID_SIZE as f64 || p.y >= GRID_SIZE as f64 {
            return false;
        }
    }
}

/// Is any alive enemy close, or lined up and facing us with a clear shot?
pub fn close_to_any_enemy(view: &WorldView, me: DVec2) -> bool {
    view.alive_enemies().any(|e| {
        if is_next_to(e, me, 2.0, AI_SHOOT_DISTANCE) {
            return true;
        }
        let d = (e.hull.position - me).abs();
        (d.x < 1.0 || d.y < 1.0) && enemy_facing(e, me) && !obstacle_between(view.arena, e.hull.position, me)
    })
}
