//! Bullet threat assessment.
//!
//! Forward-simulates the driven tank and every enemy bullet frame by frame
//! to estimate time-to-collision (TTC), scores the four headings plus
//! stopping, and picks out enemy bullets worth shooting down. All distances
//! are in cells and all times in ticks.

use glam::DVec2;

use tankgrid_arena::{obstacle_between, Arena};
use tankgrid_core::components::{Bullet, Hull};
use tankgrid_core::constants::*;
use tankgrid_core::enums::RiskLevel;
use tankgrid_core::types::{Direction, TANK_MAX_COORD};

use crate::view::WorldView;

/// Danger added for a bullet currently within this radius of a candidate cell.
const PROXIMITY_RADIUS: f64 = 3.0;
/// Crossings later than this many ticks are ignored by the heading search.
const CROSSING_HORIZON: f64 = 25.0;
/// Crossings sooner than this count as a perpendicular threat on their own.
const CROSSING_ALARM: f64 = 20.0;
/// Best option above this danger with a short TTC forces a stop.
const STOP_DANGER: f64 = 60.0;
/// Only bullets this close are candidates for shooting down.
const DESTROY_RANGE: f64 = AI_BULLET_DESTROY_DISTANCE * 1.5;
/// A bullet shot is only taken when impact is this close.
pub const DESTROY_TTC: f64 = 5.0;

/// A predicted meeting between a moving tank and a bullet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Frames until the separation drops under the collision threshold.
    pub ttc: f64,
    pub distance: f64,
}

fn tank_step() -> f64 {
    PLAYER_SPEED / CELL_SIZE
}

/// Is the bullet travelling across the tank's current movement axis?
/// A stationary tank has no movement axis.
pub fn is_perpendicular(bullet: &Bullet, hull: &Hull) -> bool {
    hull.moving && bullet.direction.crosses_axis(hull.facing)
}

/// Is the bullet coming at `target` inside a lane of half-width `lane`?
pub fn heading_toward(bullet: &Bullet, target: DVec2, lane: f64) -> bool {
    let d = bullet.position - target;
    match bullet.direction {
        Direction::Up => d.x.abs() < lane && d.y > 0.0,
        Direction::Down => d.x.abs() < lane && d.y < 0.0,
        Direction::Right => d.y.abs() < lane && d.x < 0.0,
        Direction::Left => d.y.abs() < lane && d.x > 0.0,
    }
}

/// Ticks for the bullet to cover the straight distance to `target`.
fn naive_ttc(bullet: &Bullet, target: DVec2) -> f64 {
    bullet.position.distance(target) / bullet.cells_per_tick()
}

/// Walk a tank moving along `direction` from `start` and the bullet forward
/// together; report the first frame they come within the collision threshold.
pub fn path_intersects_bullet(start: DVec2, direction: Direction, bullet: &Bullet) -> Option<Intercept> {
    (0..AI_BULLET_PREDICTION_FRAMES).find_map(|frame| {
        let frame = frame as f64;
        let tank = start + direction.unit() * tank_step() * frame;
        let distance = tank.distance(bullet.predict(frame));
        (distance < AI_BULLET_COLLISION_THRESHOLD).then_some(Intercept { ttc: frame, distance })
    })
}

/// Compare every frame of the tank's path against every frame of the bullet's
/// (at base bullet speed). Two paths "cross" when some pair of points falls
/// within the threshold on both axes; the TTC is the later of the two frames.
pub fn perpendicular_crossing(start: DVec2, direction: Direction, bullet: &Bullet) -> Option<f64> {
    let bullet_step = bullet.direction.unit() * (BULLET_SPEED / CELL_SIZE);
    for tank_frame in 0..AI_BULLET_PREDICTION_FRAMES {
        let tank = start + direction.unit() * tank_step() * tank_frame as f64;
        for bullet_frame in 0..AI_BULLET_PREDICTION_FRAMES {
            let d = (tank - (bullet.position + bullet_step * bullet_frame as f64)).abs();
            if d.x < AI_BULLET_COLLISION_THRESHOLD && d.y < AI_BULLET_COLLISION_THRESHOLD {
                return Some(tank_frame.max(bullet_frame) as f64);
            }
        }
    }
    None
}

/// A perpendicular bullet the current move will walk into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerpendicularThreat {
    pub bullet_id: u32,
    pub ttc: f64,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerpendicularScan {
    pub threat: Option<PerpendicularThreat>,
    /// Perpendicular bullets within the risk radius.
    pub nearby: usize,
}

impl PerpendicularScan {
    pub fn risk(&self) -> RiskLevel {
        match self.threat {
            Some(threat) => threat.risk,
            None if self.nearby > 0 => RiskLevel::Low,
            None => RiskLevel::None,
        }
    }
}

/// Look for perpendicular bullets in the way of the current move.
pub fn scan_perpendicular(view: &WorldView, hull: &Hull) -> PerpendicularScan {
    let mut scan = PerpendicularScan::default();
    if !hull.moving {
        return scan;
    }

    let mut closest: Option<(u32, f64)> = None;
    for bullet in view.enemy_bullets().filter(|b| is_perpendicular(b, hull)) {
        if let Some(hit) = path_intersects_bullet(hull.position, hull.facing, bullet) {
            if closest.map_or(true, |(_, ttc)| hit.ttc < ttc) {
                closest = Some((bullet.id, hit.ttc));
            }
        }
        if bullet.position.distance(hull.position) < PERPENDICULAR_BULLET_RISK_DISTANCE {
            scan.nearby += 1;
        }
    }

    if let Some((bullet_id, ttc)) = closest.filter(|(_, ttc)| *ttc < AI_MIN_TTC * 2.0) {
        let risk = if ttc < 10.0 { RiskLevel::High } else { RiskLevel::Medium };
        scan.threat = Some(PerpendicularThreat { bullet_id, ttc, risk });
        return scan;
    }

    scan.threat = view
        .enemy_bullets()
        .filter(|b| is_perpendicular(b, hull))
        .find_map(|bullet| {
            perpendicular_crossing(hull.position, hull.facing, bullet)
                .filter(|ttc| *ttc < CROSSING_ALARM)
                .map(|ttc| PerpendicularThreat {
                    bullet_id: bullet.id,
                    ttc,
                    risk: RiskLevel::Medium,
                })
        });
    scan
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Perpendicular,
    Direct,
}

/// A bullet the tank will meet if it keeps doing what it is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRisk {
    pub bullet_id: u32,
    pub ttc: f64,
    pub kind: CollisionKind,
}

/// Will the current move (or standing still) run into an enemy bullet?
pub fn current_move_collision(view: &WorldView, hull: &Hull, scan: &PerpendicularScan) -> Option<CollisionRisk> {
    if let Some(threat) = scan.threat {
        return Some(CollisionRisk {
            bullet_id: threat.bullet_id,
            ttc: threat.ttc,
            kind: CollisionKind::Perpendicular,
        });
    }

    if !hull.moving {
        return view
            .enemy_bullets()
            .filter(|b| b.position.distance(hull.position) < PROXIMITY_RADIUS)
            .find(|b| heading_toward(b, hull.position, 2.0))
            .map(|b| CollisionRisk {
                bullet_id: b.id,
                ttc: naive_ttc(b, hull.position),
                kind: CollisionKind::Direct,
            });
    }

    view.enemy_bullets().find_map(|b| {
        path_intersects_bullet(hull.position, hull.facing, b)
            .filter(|hit| hit.ttc < AI_MIN_TTC)
            .map(|hit| CollisionRisk {
                bullet_id: b.id,
                ttc: hit.ttc,
                kind: CollisionKind::Direct,
            })
    })
}

/// Result of the safest-heading search. `heading == None` means stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeHeading {
    pub heading: Option<Direction>,
    pub danger: f64,
    pub ttc: f64,
    pub perpendicular_danger: f64,
}

fn move_is_impossible(arena: &Arena, to: DVec2) -> bool {
    to.x < 0.0 || to.y < 0.0 || to.x > TANK_MAX_COORD || to.y > TANK_MAX_COORD || arena.blocks_tank_at(to)
}

fn score_stop(view: &WorldView, hull: &Hull) -> SafeHeading {
    let mut danger = 0.0;
    let mut perpendicular = 0.0;
    let mut ttc = f64::INFINITY;
    for bullet in view.enemy_bullets() {
        let distance = bullet.position.distance(hull.position);
        ttc = ttc.min(naive_ttc(bullet, hull.position));
        if heading_toward(bullet, hull.position, 2.0) {
            danger += (100.0 - distance * 20.0).max(0.0);
        }
        if is_perpendicular(bullet, hull) && distance < PERPENDICULAR_BULLET_RISK_DISTANCE {
            perpendicular += (80.0 - distance * 15.0).max(0.0);
        }
    }
    SafeHeading {
        heading: None,
        danger: danger + perpendicular * 1.2,
        ttc,
        perpendicular_danger: perpendicular,
    }
}

fn score_heading(view: &WorldView, hull: &Hull, direction: Direction) -> SafeHeading {
    let to = hull.position + direction.unit();
    if move_is_impossible(view.arena, to) {
        return SafeHeading {
            heading: Some(direction),
            danger: AI_IMPOSSIBLE_MOVE_DANGER,
            ttc: f64::INFINITY,
            perpendicular_danger: 0.0,
        };
    }

    let mut danger = 0.0;
    let mut perpendicular = 0.0;
    let mut ttc = f64::INFINITY;
    for bullet in view.enemy_bullets() {
        let crosses = is_perpendicular(bullet, hull);

        if let Some(hit) = path_intersects_bullet(hull.position, direction, bullet) {
            let d = (100.0 - hit.ttc * 3.0).max(0.0);
            danger += d;
            if crosses {
                perpendicular += d * 1.5;
            }
            ttc = ttc.min(hit.ttc);
        }

        if bullet.position.distance(to) < PROXIMITY_RADIUS {
            danger += 30.0;
            if crosses {
                perpendicular += 20.0;
            }
        }

        if crosses {
            if let Some(t) = perpendicular_crossing(to, direction, bullet).filter(|t| *t < CROSSING_HORIZON) {
                perpendicular += (70.0 - t * 2.0).max(0.0);
            }
        }
    }

    SafeHeading {
        heading: Some(direction),
        danger: danger + perpendicular * 1.2,
        ttc,
        perpendicular_danger: perpendicular,
    }
}

/// Score Up, Right, Down, Left and Stop against every enemy bullet and pick
/// the least dangerous. If even the best option is dangerous and close to
/// impact, stopping wins. `None` when there are no enemy bullets at all.
pub fn safest_direction(view: &WorldView, hull: &Hull) -> Option<SafeHeading> {
    if !view.has_enemy_bullets() {
        return None;
    }

    let mut options: Vec<SafeHeading> = Direction::ALL
        .into_iter()
        .map(|d| score_heading(view, hull, d))
        .collect();
    options.push(score_stop(view, hull));
    // Stable: ties keep Up, Right, Down, Left, Stop order.
    options.sort_by(|a, b| a.danger.total_cmp(&b.danger));

    let best = options[0];
    if best.danger > STOP_DANGER && best.ttc < AI_MIN_TTC {
        return Some(SafeHeading { heading: None, ..best });
    }
    Some(best)
}

/// An enemy bullet that can be shot down from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletShot {
    pub bullet_id: u32,
    /// Direction to face and fire.
    pub direction: Direction,
    pub score: f64,
    pub distance: f64,
    pub ttc: f64,
    pub heading_toward: bool,
    pub perpendicular: bool,
}

/// Direction from `from` to `to` when they share a lane of half-width
/// `AI_ALIGNMENT_TOLERANCE`.
fn lane_direction(from: DVec2, to: DVec2) -> Option<Direction> {
    let d = to - from;
    Direction::ALL.into_iter().find(|dir| match dir {
        Direction::Up => d.x.abs() < AI_ALIGNMENT_TOLERANCE && d.y < 0.0,
        Direction::Right => d.y.abs() < AI_ALIGNMENT_TOLERANCE && d.x > 0.0,
        Direction::Down => d.x.abs() < AI_ALIGNMENT_TOLERANCE && d.y > 0.0,
        Direction::Left => d.y.abs() < AI_ALIGNMENT_TOLERANCE && d.x < 0.0,
    })
}

/// Pick the best nearby enemy bullet to shoot down: close, incoming,
/// perpendicular, and about to arrive all raise the score.
pub fn bullet_to_destroy(view: &WorldView, hull: &Hull) -> Option<BulletShot> {
    let mut best: Option<BulletShot> = None;
    for bullet in view.enemy_bullets() {
        let distance = bullet.position.distance(hull.position);
        if distance > DESTROY_RANGE {
            continue;
        }
        let Some(direction) = lane_direction(hull.position, bullet.position) else {
            continue;
        };
        if obstacle_between(view.arena, hull.position, bullet.position) {
            continue;
        }

        let incoming = heading_toward(bullet, hull.position, 1.5);
        let perpendicular = is_perpendicular(bullet, hull);
        let ttc = naive_ttc(bullet, hull.position);

        let mut score = 100.0 - distance * 20.0;
        if incoming {
            score += 50.0;
        }
        if perpendicular {
            score += 30.0;
        }
        if ttc < 10.0 {
            score += (10.0 - ttc) * 10.0;
        }

        if best.map_or(true, |b| score > b.score) {
            best = Some(BulletShot {
                bullet_id: bullet.id,
                direction,
                score,
                distance,
                ttc,
                heading_toward: incoming,
                perpendicular,
            });
        }
    }
    best
}
