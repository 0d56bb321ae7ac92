//! Tank movement on the grid.
//!
//! A tank moves along its facing in sub-cell steps. The continuous position
//! drives rendering; collision always uses the physical box at the rounded
//! position. A move that would overlap terrain, the base, or another live
//! tank is refused and the tank snaps back onto the grid instead.

use glam::DVec2;

use tankgrid_arena::Arena;
use tankgrid_core::components::Hull;
use tankgrid_core::constants::{CELL_SIZE, PLAYER_SPEED};
use tankgrid_core::enums::PlayerSlot;
use tankgrid_core::types::{clamp_tank_position, Direction, Rect};

use crate::world::World;

/// Result of one attempted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// Terrain or the base was in the way; the tank slid onto the lane.
    Slid,
    /// Stopped and aligned.
    Blocked,
}

/// Next continuous position one step ahead.
pub fn step_target(hull: &Hull, speed: f64) -> DVec2 {
    clamp_tank_position(hull.position + hull.facing.unit() * (speed / CELL_SIZE))
}

fn overlaps_any(footprint: &Rect, blockers: &[Rect]) -> bool {
    blockers.iter().any(|b| b.overlaps(footprint))
}

/// Snap the cross axis to its lane so a tank clipping a wall corner slides
/// past it rather than sticking. `current` stays when the snap helps nothing.
pub fn slide_past_corner(arena: &Arena, blockers: &[Rect], current: DVec2, next: DVec2, direction: Direction) -> DVec2 {
    let snapped = if direction.is_horizontal() {
        DVec2::new(next.x, current.y.round())
    } else {
        DVec2::new(current.x.round(), next.y)
    };
    let snapped = clamp_tank_position(snapped);
    if snapped != current && !arena.blocks_tank_at(snapped) && !overlaps_any(&Rect::tank(snapped), blockers) {
        snapped
    } else {
        current
    }
}

/// Advance `hull` one step along its facing, refusing moves into terrain or
/// into any of the `blockers` (physical boxes of other live tanks).
pub fn step_hull(hull: &mut Hull, arena: &Arena, blockers: &[Rect], speed: f64) -> StepOutcome {
    let current = hull.position;
    let next = step_target(hull, speed);

    let outcome = if !arena.blocks_tank_at(next) {
        if overlaps_any(&Rect::tank(next), blockers) {
            hull.needs_alignment = true;
            hull.align();
            StepOutcome::Blocked
        } else {
            hull.position = next;
            StepOutcome::Moved
        }
    } else {
        let slid = slide_past_corner(arena, blockers, current, next, hull.facing);
        if slid != current {
            hull.position = slid;
            StepOutcome::Slid
        } else {
            hull.needs_alignment = true;
            hull.align();
            StepOutcome::Blocked
        }
    };
    hull.sync_physical();
    outcome
}

/// Physical boxes of every live tank except the player in `slot`.
fn blockers_for_player(world: &World, slot: PlayerSlot) -> Vec<Rect> {
    let partner = world.player(slot.other());
    partner
        .hull
        .alive
        .then(|| partner.hull.physical_box())
        .into_iter()
        .chain(world.enemies.iter().filter(|e| e.hull.alive).map(|e| e.hull.physical_box()))
        .collect()
}

/// Physical boxes of every live tank except enemy `index`.
pub fn blockers_for_enemy(world: &World, index: usize) -> (Vec<Rect>, Vec<Rect>) {
    let players = world
        .players
        .iter()
        .filter(|p| p.hull.alive)
        .map(|p| p.hull.physical_box())
        .collect();
    let enemies = world
        .enemies
        .iter()
        .enumerate()
        .filter(|(j, e)| *j != index && e.hull.alive)
        .map(|(_, e)| e.hull.physical_box())
        .collect();
    (players, enemies)
}

/// Turn toward and drive a player tank in `direction`; `None` stops it.
pub fn drive_player(world: &mut World, slot: PlayerSlot, direction: Option<Direction>, current_tick: u64) {
    let blockers = blockers_for_player(world, slot);
    let arena = &world.arena;
    let hull = &mut world.players[slot.index()].hull;

    match direction {
        Some(direction) => {
            hull.turn(direction, current_tick);
            hull.align();
            hull.moving = true;
            step_hull(hull, arena, &blockers, PLAYER_SPEED);
        }
        None => {
            hull.moving = false;
            hull.sync_physical();
        }
    }
}
