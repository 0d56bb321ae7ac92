//! Arena: the static battlefield with obstacle and damage queries.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use tankgrid_core::components::{Base, Quadrants};
use tankgrid_core::constants::{FORTIFICATION_RING, GRID_SIZE};
use tankgrid_core::enums::WallMaterial;
use tankgrid_core::state::WallView;
use tankgrid_core::types::{Direction, Rect};

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// Destructible wall; the mask records the quarter-cells left.
    Brick(Quadrants),
    Steel,
    /// Impassable to tanks, transparent to bullets and sight.
    River,
    /// Cosmetic cover with no collision effect.
    Bush,
}

impl Tile {
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Brick(_) | Tile::Steel)
    }
}

/// Which tiles a tank footprint may not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstaclePolicy {
    /// Base, brick, steel and river are solid.
    BricksSolid,
    /// Base, steel and river are solid; bricks can be shot through.
    BricksPermeable,
}

/// Result of testing a bullet box against steel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteelImpact {
    pub hit: bool,
    /// Steel cells removed by a wall-breaker bullet.
    pub destroyed: u32,
}

/// Result of testing a bullet box against bricks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrickImpact {
    pub hit: bool,
    pub bits_removed: u32,
    /// Bricks whose last quarter-cell went in this impact.
    pub bricks_destroyed: u32,
}

/// The 26x26 battlefield. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    tiles: Vec<Tile>,
    pub base: Base,
}

impl Default for Arena {
    fn default() -> Self {
        Self::empty()
    }
}

impl Arena {
    pub fn empty() -> Self {
        Self {
            tiles: vec![Tile::Empty; (GRID_SIZE * GRID_SIZE) as usize],
            base: Base::default(),
        }
    }

    pub fn in_bounds(cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < GRID_SIZE && cell.y < GRID_SIZE
    }

    fn index(cell: IVec2) -> Option<usize> {
        Self::in_bounds(cell).then(|| (cell.y * GRID_SIZE + cell.x) as usize)
    }

    /// Tile at `cell`; anything off the grid reads as empty.
    pub fn tile(&self, cell: IVec2) -> Tile {
        Self::index(cell).map_or(Tile::Empty, |i| self.tiles[i])
    }

    /// Overwrite a cell. Off-grid writes are ignored.
    pub fn set_tile(&mut self, cell: IVec2, tile: Tile) {
        if let Some(i) = Self::index(cell) {
            self.tiles[i] = tile;
        }
    }

    /// Every non-empty cell.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, tile)| {
            let cell = IVec2::new(i as i32 % GRID_SIZE, i as i32 / GRID_SIZE);
            (*tile != Tile::Empty).then_some((cell, *tile))
        })
    }

    pub fn cells_of(&self, wanted: fn(Tile) -> bool) -> Vec<IVec2> {
        self.cells()
            .filter(|(_, tile)| wanted(*tile))
            .map(|(cell, _)| cell)
            .collect()
    }

    pub fn wall_views(&self) -> Vec<WallView> {
        self.cells()
            .filter_map(|(cell, tile)| match tile {
                Tile::Brick(q) => Some(WallView {
                    cell,
                    material: WallMaterial::Brick,
                    quadrants: q.bits(),
                }),
                Tile::Steel => Some(WallView {
                    cell,
                    material: WallMaterial::Steel,
                    quadrants: Quadrants::FULL.bits(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn brick_count(&self) -> usize {
        self.cells().filter(|(_, t)| matches!(t, Tile::Brick(_))).count()
    }

    /// Grid cells whose unit square overlaps `rect` (clipped to the grid).
    pub fn cells_overlapping(rect: &Rect) -> impl Iterator<Item = IVec2> {
        let min = rect.min.floor().as_ivec2().max(IVec2::ZERO);
        let max = (rect.max().ceil().as_ivec2() - IVec2::ONE).min(IVec2::splat(GRID_SIZE - 1));
        let rect = *rect;
        (min.y..=max.y)
            .flat_map(move |y| (min.x..=max.x).map(move |x| IVec2::new(x, y)))
            .filter(move |cell| Rect::cell(*cell).overlaps(&rect))
    }

    /// Would a tank footprint at `position` overlap a solid tile or the base?
    pub fn blocks_tank(&self, position: DVec2, policy: ObstaclePolicy) -> bool {
        let footprint = Rect::tank(position);
        if footprint.overlaps(&self.base.rect()) {
            return true;
        }
        Self::cells_overlapping(&footprint).any(|cell| match self.tile(cell) {
            Tile::Steel | Tile::River => true,
            Tile::Brick(q) => policy == ObstaclePolicy::BricksSolid && q.is_alive(),
            Tile::Empty | Tile::Bush => false,
        })
    }

    /// The normal movement test: every obstacle is solid.
    pub fn blocks_tank_at(&self, position: DVec2) -> bool {
        self.blocks_tank(position, ObstaclePolicy::BricksSolid)
    }

    /// Number of river and steel cells a footprint at `position` overlaps.
    pub fn hard_overlap_count(&self, position: DVec2) -> usize {
        Self::cells_overlapping(&Rect::tank(position))
            .filter(|cell| matches!(self.tile(*cell), Tile::Steel | Tile::River))
            .count()
    }

    /// Does any brick or steel cell overlap `rect`? Rivers never block sight.
    pub fn blocks_sight(&self, rect: &Rect) -> bool {
        Self::cells_overlapping(rect).any(|cell| self.tile(cell).is_wall())
    }

    /// Does any steel cell overlap `rect`?
    pub fn steel_overlaps(&self, rect: &Rect) -> bool {
        Self::cells_overlapping(rect).any(|cell| self.tile(cell) == Tile::Steel)
    }

    /// Resolve a bullet box against steel. A wall-breaker destroys every
    /// steel cell it overlaps; any other bullet stops at the first.
    pub fn strike_steel(&mut self, bullet: &Rect, wall_breaker: bool) -> SteelImpact {
        let mut impact = SteelImpact::default();
        let cells: Vec<IVec2> = Self::cells_overlapping(bullet)
            .filter(|cell| self.tile(*cell) == Tile::Steel)
            .collect();
        for cell in cells {
            impact.hit = true;
            if !wall_breaker {
                return impact;
            }
            self.set_tile(cell, Tile::Empty);
            impact.destroyed += 1;
        }
        impact
    }

    /// Resolve a bullet box against bricks. A brick is struck when the box
    /// overlaps one of its remaining quarter-cells. A wall-breaker clears the
    /// whole brick; otherwise the entry-side pair (or the far pair) is erased.
    /// Every struck brick is processed.
    pub fn strike_bricks(&mut self, bullet: &Rect, travel: Direction, wall_breaker: bool) -> BrickImpact {
        let mut impact = BrickImpact::default();
        let struck: Vec<(IVec2, Quadrants)> = Self::cells_overlapping(bullet)
            .filter_map(|cell| match self.tile(cell) {
                Tile::Brick(q) if q.live_rects(cell).any(|r| r.overlaps(bullet)) => Some((cell, q)),
                _ => None,
            })
            .collect();

        for (cell, mut q) in struck {
            impact.hit = true;
            let removed = if wall_breaker {
                q.clear()
            } else {
                match q.erase_from(travel) {
                    Some(n) => n,
                    None => continue,
                }
            };
            impact.bits_removed += removed;
            if q.is_alive() {
                self.set_tile(cell, Tile::Brick(q));
            } else {
                impact.bricks_destroyed += 1;
                self.set_tile(cell, Tile::Empty);
            }
        }
        impact
    }

    /// Rebuild the ring around the base in `material`. Bricks come back whole.
    pub fn set_fortification_ring(&mut self, material: WallMaterial) {
        let tile = match material {
            WallMaterial::Brick => Tile::Brick(Quadrants::FULL),
            WallMaterial::Steel => Tile::Steel,
        };
        for (x, y) in FORTIFICATION_RING {
            self.set_tile(IVec2::new(x, y), tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(tiles: &[((i32, i32), Tile)]) -> Arena {
        let mut arena = Arena::empty();
        for ((x, y), tile) in tiles {
            arena.set_tile(IVec2::new(*x, *y), *tile);
        }
        arena
    }

    #[test]
    fn test_cells_overlapping_tank_footprint() {
        let cells: Vec<IVec2> = Arena::cells_overlapping(&Rect::tank(DVec2::new(3.0, 4.0))).collect();
        assert_eq!(cells.len(), 4);

        let cells: Vec<IVec2> = Arena::cells_overlapping(&Rect::tank(DVec2::new(3.5, 4.0))).collect();
        assert_eq!(cells.len(), 6);

        let cells: Vec<IVec2> = Arena::cells_overlapping(&Rect::tank(DVec2::new(0.0, 24.0))).collect();
        assert!(cells.iter().all(|c| Arena::in_bounds(*c)));
    }

    #[test]
    fn test_blocks_tank_policies() {
        let arena = arena_with(&[((5, 5), Tile::Brick(Quadrants::FULL)), ((8, 5), Tile::River)]);
        let p = DVec2::new(4.0, 4.0);
        assert!(arena.blocks_tank(p, ObstaclePolicy::BricksSolid));
        assert!(!arena.blocks_tank(p, ObstaclePolicy::BricksPermeable));

        let r = DVec2::new(7.0, 5.0);
        assert!(arena.blocks_tank(r, ObstaclePolicy::BricksPermeable));
        // Touching edges only: (6,5) footprint ends at x=8.
        assert!(!arena.blocks_tank_at(DVec2::new(6.0, 6.0)));
    }

    #[test]
    fn test_partial_brick_still_solid_for_tanks() {
        let arena = arena_with(&[((5, 5), Tile::Brick(Quadrants::from_bits(Quadrants::TOP_LEFT)))]);
        assert!(arena.blocks_tank_at(DVec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_base_blocks_tanks() {
        let arena = Arena::empty();
        assert!(arena.blocks_tank_at(DVec2::new(11.0, 23.0)));
        assert!(!arena.blocks_tank_at(DVec2::new(10.0, 24.0)));
    }

    #[test]
    fn test_strike_steel_blocks_normal_bullet() {
        let mut arena = arena_with(&[((5, 5), Tile::Steel)]);
        let bullet = Rect::square(DVec2::new(5.3, 5.8), 0.3);
        let impact = arena.strike_steel(&bullet, false);
        assert!(impact.hit);
        assert_eq!(impact.destroyed, 0);
        assert_eq!(arena.tile(IVec2::new(5, 5)), Tile::Steel);
    }

    #[test]
    fn test_strike_steel_wall_breaker_clears_all_overlapped() {
        let mut arena = arena_with(&[((5, 5), Tile::Steel), ((6, 5), Tile::Steel)]);
        let bullet = Rect::square(DVec2::new(5.85, 5.2), 0.3);
        let impact = arena.strike_steel(&bullet, true);
        assert!(impact.hit);
        assert_eq!(impact.destroyed, 2);
        assert_eq!(arena.tile(IVec2::new(6, 5)), Tile::Empty);
    }

    #[test]
    fn test_strike_brick_erases_entry_side() {
        let mut arena = arena_with(&[((5, 5), Tile::Brick(Quadrants::FULL))]);
        // Travelling up into the bottom half.
        let bullet = Rect::square(DVec2::new(5.35, 5.8), 0.3);
        let impact = arena.strike_bricks(&bullet, Direction::Up, false);
        assert!(impact.hit);
        assert_eq!(impact.bits_removed, 2);
        assert_eq!(
            arena.tile(IVec2::new(5, 5)),
            Tile::Brick(Quadrants::from_bits(Quadrants::TOP_LEFT | Quadrants::TOP_RIGHT))
        );
    }

    #[test]
    fn test_strike_brick_misses_erased_quadrants() {
        let top = Quadrants::from_bits(Quadrants::TOP_LEFT | Quadrants::TOP_RIGHT);
        let mut arena = arena_with(&[((5, 5), Tile::Brick(top))]);
        // Bottom half is gone; a bullet there touches nothing.
        let bullet = Rect::square(DVec2::new(5.35, 5.65), 0.3);
        assert!(!arena.strike_bricks(&bullet, Direction::Up, false).hit);

        let bullet = Rect::square(DVec2::new(5.35, 5.3), 0.3);
        let impact = arena.strike_bricks(&bullet, Direction::Up, false);
        assert!(impact.hit);
        assert_eq!(impact.bricks_destroyed, 1);
        assert_eq!(arena.tile(IVec2::new(5, 5)), Tile::Empty);
    }

    #[test]
    fn test_wall_breaker_clears_every_overlapped_brick() {
        let mut arena = arena_with(&[
            ((5, 5), Tile::Brick(Quadrants::FULL)),
            ((6, 5), Tile::Brick(Quadrants::FULL)),
        ]);
        let bullet = Rect::square(DVec2::new(5.85, 5.2), 0.3);
        let impact = arena.strike_bricks(&bullet, Direction::Up, true);
        assert_eq!(impact.bricks_destroyed, 2);
        assert_eq!(impact.bits_removed, 8);
        assert_eq!(arena.brick_count(), 0);
    }

    #[test]
    fn test_fortification_ring_swap() {
        let mut arena = Arena::empty();
        arena.set_fortification_ring(WallMaterial::Steel);
        assert_eq!(arena.tile(IVec2::new(11, 23)), Tile::Steel);
        assert_eq!(arena.tile(IVec2::new(14, 25)), Tile::Steel);
        arena.set_fortification_ring(WallMaterial::Brick);
        assert_eq!(arena.tile(IVec2::new(12, 23)), Tile::Brick(Quadrants::FULL));
        assert_eq!(arena.brick_count(), 8);
    }

    #[test]
    fn test_hard_overlap_count() {
        let arena = arena_with(&[((5, 5), Tile::Steel), ((6, 5), Tile::River), ((5, 6), Tile::Bush)]);
        assert_eq!(arena.hard_overlap_count(DVec2::new(5.0, 5.0)), 2);
    }

    #[test]
    fn test_wall_views() {
        let arena = arena_with(&[((1, 1), Tile::Steel), ((2, 1), Tile::Brick(Quadrants::from_bits(3))), ((3, 1), Tile::River)]);
        let views = arena.wall_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].quadrants, 3);
    }
}
