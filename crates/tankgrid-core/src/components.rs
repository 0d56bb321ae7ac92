//! Entity records owned by the world.
//!
//! Records are plain data with a few geometric helpers. Game logic lives in
//! the simulation systems, not here.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{clamp_tank_position, physical_cell, Direction, Rect};

/// Movement state shared by every tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    /// Continuous top-left corner of the 2x2 footprint.
    pub position: DVec2,
    /// `round(position)`, refreshed after every successful move.
    pub physical: IVec2,
    pub facing: Direction,
    pub moving: bool,
    pub alive: bool,
    /// Set by an axis-changing turn; cleared by the grid snap.
    pub needs_alignment: bool,
    /// Tick of the most recent facing change.
    pub last_turn_tick: u64,
}

impl Hull {
    pub fn new(position: DVec2, facing: Direction) -> Self {
        let position = clamp_tank_position(position);
        Self {
            position,
            physical: physical_cell(position),
            facing,
            moving: false,
            alive: true,
            needs_alignment: false,
            last_turn_tick: 0,
        }
    }

    /// Collision footprint at the rounded position.
    pub fn physical_box(&self) -> Rect {
        Rect::tank(self.physical.as_dvec2())
    }

    pub fn visual_box(&self) -> Rect {
        Rect::tank(self.position)
    }

    /// Centre of the visual footprint.
    pub fn center(&self) -> DVec2 {
        self.position + DVec2::splat(TANK_SIZE / 2.0)
    }

    pub fn sync_physical(&mut self) {
        self.position = clamp_tank_position(self.position);
        self.physical = physical_cell(self.position);
    }

    /// Snap to the nearest grid point if an alignment is pending.
    /// Returns whether the position changed.
    pub fn align(&mut self) -> bool {
        if !self.needs_alignment {
            return false;
        }
        let before = self.position;
        self.position = self.position.round();
        self.sync_physical();
        self.needs_alignment = false;
        before != self.position
    }

    /// Face `to`. An axis change requests alignment and snaps immediately.
    /// Returns false when already facing `to`.
    pub fn turn(&mut self, to: Direction, tick: u64) -> bool {
        if self.facing == to {
            return false;
        }
        if self.facing.crosses_axis(to) {
            self.needs_alignment = true;
            self.align();
        }
        self.facing = to;
        self.last_turn_tick = tick;
        true
    }
}

/// Anything that drives a hull around the grid.
pub trait Movable {
    fn hull(&self) -> &Hull;
    fn hull_mut(&mut self) -> &mut Hull;

    fn position(&self) -> DVec2 {
        self.hull().position
    }

    fn facing(&self) -> Direction {
        self.hull().facing
    }

    fn is_alive(&self) -> bool {
        self.hull().alive
    }

    fn physical_box(&self) -> Rect {
        self.hull().physical_box()
    }
}

/// One of the two player-controlled tanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTank {
    pub hull: Hull,
    pub slot: PlayerSlot,
    /// Weapon tier in `[MIN_POWER_LEVEL, MAX_POWER_LEVEL]`.
    pub power_level: u8,
    pub lives: u32,
    pub respawn_timer: u32,
    pub invulnerable_timer: u32,
    pub bullet_cooldown: u32,
    pub can_shoot: bool,
    /// Out of lives; never respawns again this game.
    pub eliminated: bool,
    pub score: u32,
}

impl PlayerTank {
    pub fn new(slot: PlayerSlot, lives: u32) -> Self {
        Self {
            hull: Hull::new(Self::spawn_point(slot), Direction::Up),
            slot,
            power_level: MIN_POWER_LEVEL,
            lives,
            respawn_timer: 0,
            invulnerable_timer: INVULNERABLE_TICKS,
            bullet_cooldown: 0,
            can_shoot: true,
            eliminated: false,
            score: 0,
        }
    }

    pub fn spawn_point(slot: PlayerSlot) -> DVec2 {
        let (x, y) = match slot {
            PlayerSlot::Autopilot => AUTOPILOT_SPAWN,
            PlayerSlot::Human => HUMAN_SPAWN,
        };
        DVec2::new(x, y)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    pub fn bullet_speed(&self) -> f64 {
        bullet_speed_for_power(self.power_level)
    }

    pub fn bullet_cooldown_ticks(&self) -> u32 {
        bullet_cooldown_for_power(self.power_level)
    }

    pub fn max_bullets(&self) -> usize {
        max_bullets_for_power(self.power_level)
    }
}

impl Movable for PlayerTank {
    fn hull(&self) -> &Hull {
        &self.hull
    }

    fn hull_mut(&mut self) -> &mut Hull {
        &mut self.hull
    }
}

/// A wandering opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTank {
    pub hull: Hull,
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub carries_power_up: bool,
    /// Ticks until the next random redirect roll. May run negative.
    pub decision_timer: i32,
    /// Ticks until the next shot.
    pub fire_timer: i32,
    pub health: u8,
    /// Ticks since the last redirect.
    pub stuck_timer: u32,
    /// Pixels per tick.
    pub speed: f64,
}

impl Movable for EnemyTank {
    fn hull(&self) -> &Hull {
        &self.hull
    }

    fn hull_mut(&mut self) -> &mut Hull {
        &mut self.hull
    }
}

/// Borrowed view over either kind of tank.
#[derive(Debug, Clone, Copy)]
pub enum Combatant<'a> {
    Player(&'a PlayerTank),
    Enemy(&'a EnemyTank),
}

impl<'a> Combatant<'a> {
    pub fn hull(&self) -> &'a Hull {
        match *self {
            Combatant::Player(p) => &p.hull,
            Combatant::Enemy(e) => &e.hull,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.hull().position
    }

    pub fn facing(&self) -> Direction {
        self.hull().facing
    }

    pub fn is_alive(&self) -> bool {
        self.hull().alive
    }

    pub fn physical_box(&self) -> Rect {
        self.hull().physical_box()
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Combatant::Enemy(_))
    }
}

/// A projectile in flight. Bullets are created and destroyed, never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner of the bullet box.
    pub position: DVec2,
    pub direction: Direction,
    /// Pixels per tick.
    pub speed: f64,
    pub owner: Shooter,
}

impl Bullet {
    /// Spawn a bullet just inside the leading edge of a tank.
    pub fn fired_from(id: u32, hull: &Hull, speed: f64, owner: Shooter) -> Self {
        let mut position = hull.center() - DVec2::splat(BULLET_SIZE / 2.0);
        let p = hull.position;
        match hull.facing {
            Direction::Up => position.y = p.y - BULLET_SIZE + BULLET_OFFSET,
            Direction::Right => position.x = p.x + TANK_SIZE - BULLET_OFFSET,
            Direction::Down => position.y = p.y + TANK_SIZE - BULLET_OFFSET,
            Direction::Left => position.x = p.x - BULLET_SIZE + BULLET_OFFSET,
        }
        Self {
            id,
            position,
            direction: hull.facing,
            speed,
            owner,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.position, BULLET_SIZE)
    }

    /// Cells travelled per tick.
    pub fn cells_per_tick(&self) -> f64 {
        self.speed / CELL_SIZE
    }

    pub fn advance(&mut self) {
        self.position += self.direction.unit() * self.cells_per_tick();
    }

    /// Position after `frames` more ticks of straight travel.
    pub fn predict(&self, frames: f64) -> DVec2 {
        self.position + self.direction.unit() * self.cells_per_tick() * frames
    }

    pub fn is_out_of_bounds(&self) -> bool {
        let lo = BULLET_SIZE / 2.0;
        let hi = GRID_SIZE as f64 - BULLET_SIZE / 2.0;
        self.position.x < lo || self.position.x >= hi || self.position.y < lo || self.position.y >= hi
    }
}

/// Four-bit brick state: which quarter-cells remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quadrants(u8);

impl Quadrants {
    pub const TOP_LEFT: u8 = 1;
    pub const TOP_RIGHT: u8 = 2;
    pub const BOTTOM_LEFT: u8 = 4;
    pub const BOTTOM_RIGHT: u8 = 8;

    pub const FULL: Quadrants = Quadrants(0b1111);
    pub const EMPTY: Quadrants = Quadrants(0);

    const ALL_BITS: [u8; 4] = [
        Self::TOP_LEFT,
        Self::TOP_RIGHT,
        Self::BOTTOM_LEFT,
        Self::BOTTOM_RIGHT,
    ];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_alive(self) -> bool {
        self.0 != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Bits on the face a bullet travelling in `travel` enters through.
    pub fn entry_side(travel: Direction) -> u8 {
        match travel {
            Direction::Up => Self::BOTTOM_LEFT | Self::BOTTOM_RIGHT,
            Direction::Right => Self::TOP_LEFT | Self::BOTTOM_LEFT,
            Direction::Down => Self::TOP_LEFT | Self::TOP_RIGHT,
            Direction::Left => Self::TOP_RIGHT | Self::BOTTOM_RIGHT,
        }
    }

    /// Boxes of the remaining quarter-cells of the brick at `cell`.
    pub fn live_rects(self, cell: IVec2) -> impl Iterator<Item = Rect> {
        let origin = cell.as_dvec2();
        Self::ALL_BITS
            .into_iter()
            .filter(move |bit| self.0 & bit != 0)
            .map(move |bit| {
                let offset = match bit {
                    Self::TOP_LEFT => DVec2::new(0.0, 0.0),
                    Self::TOP_RIGHT => DVec2::new(0.5, 0.0),
                    Self::BOTTOM_LEFT => DVec2::new(0.0, 0.5),
                    _ => DVec2::new(0.5, 0.5),
                };
                Rect::square(origin + offset, 0.5)
            })
    }

    /// Erase the entry-side pair, or the far pair when the entry side is
    /// already gone. Returns the number of bits removed; `None` when both
    /// pairs were already clear.
    pub fn erase_from(&mut self, travel: Direction) -> Option<u32> {
        let near = Self::entry_side(travel);
        let far = Self::entry_side(travel.opposite());
        let target = if self.0 & near != 0 {
            near
        } else if self.0 & far != 0 {
            far
        } else {
            return None;
        };
        let removed = (self.0 & target).count_ones();
        self.0 &= !target;
        Some(removed)
    }

    /// Remove every remaining bit. Returns the number removed.
    pub fn clear(&mut self) -> u32 {
        let removed = self.count();
        self.0 = 0;
        removed
    }
}

/// The defended 2x2 structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub cell: IVec2,
    pub alive: bool,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            cell: IVec2::new(BASE_POSITION.0, BASE_POSITION.1),
            alive: true,
        }
    }
}

impl Base {
    pub fn rect(&self) -> Rect {
        Rect::square(self.cell.as_dvec2(), BASE_SIZE)
    }
}

/// The single collectible on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left cell of the 2x2 footprint.
    pub cell: IVec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::square(self.cell.as_dvec2(), POWER_UP_SIZE)
    }
}

/// Base fortification cycle started by the shovel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum Fortification {
    #[default]
    Idle,
    /// Ring is steel; counting down to the flicker.
    Fortifying { remaining: u32 },
    /// Ring flips material every period until `cycles_left` runs out.
    Alternating {
        material: WallMaterial,
        remaining: u32,
        cycles_left: u32,
    },
    /// Ring is rebuilt as full bricks on the next tick.
    Restoring,
}

impl Fortification {
    pub fn is_active(&self) -> bool {
        !matches!(self, Fortification::Idle)
    }
}
