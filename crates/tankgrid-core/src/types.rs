//! Fundamental geometric and simulation types.
//!
//! All coordinates are in cell units with the origin at the top-left corner
//! of the battlefield; y grows downward.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::constants::{GRID_SIZE, TANK_SIZE};

/// One of the four cardinal facings. Discriminants match the legacy
/// numeric encoding (0 = Up, clockwise).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in clockwise order starting at Up.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Unit step in cell space.
    pub fn step(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }

    /// Unit vector for continuous motion.
    pub fn unit(self) -> DVec2 {
        self.step().as_dvec2()
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// True when turning from `self` to `other` crosses the horizontal/vertical boundary.
    pub fn crosses_axis(self, other: Direction) -> bool {
        self.is_vertical() != other.is_vertical()
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub fn clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Axis-aligned box, top-left anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, size: DVec2) -> Self {
        Self { min, size }
    }

    pub fn square(min: DVec2, side: f64) -> Self {
        Self::new(min, DVec2::splat(side))
    }

    /// The unit square covering a grid cell.
    pub fn cell(cell: IVec2) -> Self {
        Self::square(cell.as_dvec2(), 1.0)
    }

    /// The 2x2 footprint of a tank whose top-left corner is `position`.
    pub fn tank(position: DVec2) -> Self {
        Self::square(position, TANK_SIZE)
    }

    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Open-interval overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Grow the box by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.min - DVec2::splat(margin), self.size + DVec2::splat(2.0 * margin))
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Ticks since the current game started.
    pub tick: u64,
    /// Ticks since the current level was loaded.
    pub level_tick: u64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.level_tick += 1;
    }

    /// Elapsed game time in seconds at the fixed tick rate.
    pub fn elapsed_secs(&self) -> f64 {
        self.tick as f64 / crate::constants::TICK_RATE as f64
    }
}

/// Largest coordinate a tank's top-left corner may take on either axis.
pub const TANK_MAX_COORD: f64 = GRID_SIZE as f64 - TANK_SIZE;

/// Clamp a tank position into the battlefield.
pub fn clamp_tank_position(position: DVec2) -> DVec2 {
    position.clamp(DVec2::ZERO, DVec2::splat(TANK_MAX_COORD))
}

/// Physical (collision) box anchor for a continuous position.
pub fn physical_cell(position: DVec2) -> IVec2 {
    position.round().as_ivec2()
}
