//! Enemy wander state machine.
//!
//! Enemies do not plan. Each tick they count down a decision timer, roll a
//! random redirect when it expires, turn away from the arena edge they face,
//! and fire on their own timer. Movement and collision against the world are
//! resolved by the simulation; this module only owns the decisions and the
//! reactions to a blocked or crowded move.

use rand::Rng;

use tankgrid_core::components::EnemyTank;
use tankgrid_core::constants::*;
use tankgrid_core::types::{Direction, TANK_MAX_COORD};

/// Output of one wander tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WanderUpdate {
    /// The fire timer ran out this tick.
    pub fire: bool,
    /// The enemy changed heading this tick.
    pub redirected: bool,
}

pub fn random_direction(rng: &mut impl Rng) -> Direction {
    Direction::from_index(rng.gen_range(0..4))
}

/// Decision timer for a freshly spawned enemy.
pub fn initial_decision_timer(rng: &mut impl Rng) -> i32 {
    rng.gen_range(30..80)
}

/// Is the enemy pressed against the edge it is facing?
pub fn facing_boundary(enemy: &EnemyTank) -> bool {
    let p = enemy.hull.position;
    match enemy.hull.facing {
        Direction::Left => p.x <= 0.0,
        Direction::Right => p.x >= TANK_MAX_COORD,
        Direction::Up => p.y <= 0.0,
        Direction::Down => p.y >= TANK_MAX_COORD,
    }
}

/// Face a random direction and reset the stuck counter. An axis change
/// snaps to the grid; `force_align` snaps regardless.
pub fn redirect(enemy: &mut EnemyTank, rng: &mut impl Rng, tick: u64, force_align: bool) -> bool {
    let to = random_direction(rng);
    let turned = enemy.hull.turn(to, tick);
    if force_align {
        enemy.hull.needs_alignment = true;
    }
    enemy.stuck_timer = 0;
    turned
}

/// Advance timers and take this tick's decisions. Frozen or dead enemies
/// must not be passed in.
pub fn evaluate(enemy: &mut EnemyTank, rng: &mut impl Rng, tick: u64) -> WanderUpdate {
    let mut update = WanderUpdate::default();

    enemy.decision_timer -= 1;
    enemy.stuck_timer += 1;

    if facing_boundary(enemy) {
        update.redirected |= redirect(enemy, rng, tick, true);
        enemy.decision_timer = ENEMY_BOUNDARY_DECISION_TICKS;
    }

    if enemy.decision_timer <= 0 {
        if rng.gen_bool(ENEMY_REDIRECT_CHANCE) {
            update.redirected |= redirect(enemy, rng, tick, false);
        }
        enemy.decision_timer = rng.gen_range(40..100);
    }

    enemy.fire_timer -= 1;
    if enemy.fire_timer <= 0 {
        update.fire = true;
        enemy.fire_timer = rng.gen_range(60..120);
    }

    enemy.hull.align();
    update
}

/// The enemy's next step overlaps another enemy. The move still happens, but
/// the enemy grows impatient and eventually turns away.
pub fn on_crowded(enemy: &mut EnemyTank, rng: &mut impl Rng, tick: u64) {
    enemy.decision_timer = (enemy.decision_timer - 10).max(5);
    if enemy.stuck_timer > ENEMY_STUCK_TICKS {
        redirect(enemy, rng, tick, true);
    }
}
