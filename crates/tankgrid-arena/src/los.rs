//! Line-of-sight sampling between tank positions.
//!
//! Uses stepped segment traversal: a fixed number of samples along the
//! segment, each tested as a unit box against the wall cells.

use glam::DVec2;

use tankgrid_core::constants::{LOS_SAMPLES, LOS_SHORT_RANGE, TANK_SIZE};
use tankgrid_core::types::Rect;

use crate::grid::Arena;

/// Side of the probe box used when sampling for steel along a brick shot.
const STEEL_PROBE_SIZE: f64 = 0.1;

/// Is there a brick or steel wall between two tank positions?
///
/// Both points are tank top-left corners; the segment runs between the tank
/// centres. Segments within `LOS_SHORT_RANGE` on both axes are always clear.
pub fn obstacle_between(arena: &Arena, from: DVec2, to: DVec2) -> bool {
    let half = DVec2::splat(TANK_SIZE / 2.0);
    let (a, b) = (from + half, to + half);
    let d = b - a;
    if d.x.abs() <= LOS_SHORT_RANGE && d.y.abs() <= LOS_SHORT_RANGE {
        return false;
    }

    let step = d / LOS_SAMPLES as f64;
    (0..=LOS_SAMPLES).any(|i| {
        let sample = a + step * i as f64;
        arena.blocks_sight(&Rect::square(sample - DVec2::splat(0.5), 1.0))
    })
}

/// Is there steel between a tank and a brick it wants to shoot? Other bricks
/// are ignored since the shot clears them on the way.
pub fn steel_between(arena: &Arena, from: DVec2, to: DVec2) -> bool {
    let step = (to - from) / LOS_SAMPLES as f64;
    (0..=LOS_SAMPLES).any(|i| {
        let sample = from + step * i as f64;
        arena.steel_overlaps(&Rect::square(sample, STEEL_PROBE_SIZE))
    })
}
