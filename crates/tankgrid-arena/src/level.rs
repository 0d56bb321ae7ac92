//! Level definitions: per-level parameters plus the wall/river/bush layout.
//!
//! Levels are supplied either as JSON (`LevelDefinition`) or as a 26x26
//! ASCII layout. Malformed tiles degrade to empty cells with a warning;
//! only structural problems fail a load.

use std::path::{Path, PathBuf};

use glam::IVec2;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tankgrid_core::components::Quadrants;
use tankgrid_core::constants::GRID_SIZE;
use tankgrid_core::enums::TileKind;
use tankgrid_core::types::Rect;

use crate::grid::{Arena, Tile};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout has {found} rows, expected 26")]
    RowCount { found: usize },
    #[error("layout row {row} has {found} columns, expected 26")]
    RowWidth { row: usize, found: usize },
    #[error("invalid level parameters: {0}")]
    Parameters(String),
}

/// Enemy roster and pacing for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParameters {
    /// Enemies spawned over the whole level.
    pub enemy_count: u32,
    /// Enemies alive at once.
    pub max_concurrent: u32,
    /// Ticks between spawns.
    pub enemy_spawn_rate: u32,
    /// Initial fire timer of a fresh enemy.
    pub enemy_fire_rate: u32,
    /// Weights for archetypes Basic, Fast, Power, Armored.
    pub tank_probabilities: [f64; 4],
}

impl Default for LevelParameters {
    fn default() -> Self {
        Self {
            enemy_count: 20,
            max_concurrent: 4,
            enemy_spawn_rate: 150,
            enemy_fire_rate: 60,
            tank_probabilities: [0.5, 0.2, 0.2, 0.1],
        }
    }
}

impl LevelParameters {
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.enemy_count == 0 {
            return Err(LevelError::Parameters("enemy_count must be positive".into()));
        }
        if self.max_concurrent == 0 {
            return Err(LevelError::Parameters("max_concurrent must be positive".into()));
        }
        if self.tank_probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(LevelError::Parameters(
                "tank_probabilities must be finite and non-negative".into(),
            ));
        }
        if self.tank_probabilities.iter().sum::<f64>() <= 0.0 {
            return Err(LevelError::Parameters("tank_probabilities sum to zero".into()));
        }
        Ok(())
    }
}

/// One decoded tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: LevelParameters,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

impl LevelDefinition {
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let level: LevelDefinition = serde_json::from_str(json)?;
        level.parameters.validate()?;
        Ok(level)
    }

    /// Load a JSON level file.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Decode an ASCII layout: `.` empty, `#` brick, `@` steel, `~` river,
    /// `%` bush. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(name: &str, layout: &str, parameters: LevelParameters) -> Result<Self, LevelError> {
        parameters.validate()?;
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != GRID_SIZE as usize {
            return Err(LevelError::RowCount { found: rows.len() });
        }

        let mut tiles = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != GRID_SIZE as usize {
                return Err(LevelError::RowWidth { row: y, found: width });
            }
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '.' => continue,
                    '#' => TileKind::Brick,
                    '@' => TileKind::Steel,
                    '~' => TileKind::River,
                    '%' => TileKind::Bush,
                    other => {
                        warn!("level {name}: unknown tile {other:?} at ({x}, {y}), treating as empty");
                        continue;
                    }
                };
                tiles.push(TileSpec {
                    x: x as i32,
                    y: y as i32,
                    kind,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            parameters,
            tiles,
        })
    }

    /// Materialise the arena: fresh walls and a live base.
    pub fn build_arena(&self) -> Arena {
        let mut arena = Arena::empty();
        let base = arena.base.rect();
        for spec in &self.tiles {
            let cell = IVec2::new(spec.x, spec.y);
            if !Arena::in_bounds(cell) {
                warn!("level {}: tile {:?} outside the grid, skipped", self.name, cell);
                continue;
            }
            if Rect::cell(cell).overlaps(&base) {
                warn!("level {}: tile {:?} inside the base, skipped", self.name, cell);
                continue;
            }
            let tile = match spec.kind {
                TileKind::Empty => Tile::Empty,
                TileKind::Brick => Tile::Brick(Quadrants::FULL),
                TileKind::Steel => Tile::Steel,
                TileKind::River => Tile::River,
                TileKind::Bush => Tile::Bush,
            };
            arena.set_tile(cell, tile);
        }
        arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rows() -> Vec<String> {
        vec![".".repeat(GRID_SIZE as usize); GRID_SIZE as usize]
    }

    #[test]
    fn test_ascii_decode() {
        let mut rows = blank_rows();
        rows[3] = format!("#@~%{}", ".".repeat(22));
        let level = LevelDefinition::from_ascii("t", &rows.join("\n"), LevelParameters::default()).unwrap();
        assert_eq!(level.tiles.len(), 4);
        let arena = level.build_arena();
        assert_eq!(arena.tile(IVec2::new(0, 3)), Tile::Brick(Quadrants::FULL));
        assert_eq!(arena.tile(IVec2::new(1, 3)), Tile::Steel);
        assert_eq!(arena.tile(IVec2::new(2, 3)), Tile::River);
        assert_eq!(arena.tile(IVec2::new(3, 3)), Tile::Bush);
    }

    #[test]
    fn test_unknown_tile_degrades_to_empty() {
        let mut rows = blank_rows();
        rows[0] = format!("X#{}", ".".repeat(24));
        let level = LevelDefinition::from_ascii("t", &rows.join("\n"), LevelParameters::default()).unwrap();
        assert_eq!(level.tiles.len(), 1);
        assert_eq!(level.build_arena().tile(IVec2::new(0, 0)), Tile::Empty);
    }

    #[test]
    fn test_bad_shape_is_an_error() {
        let rows = blank_rows();
        let short = rows[..25].join("\n");
        assert!(matches!(
            LevelDefinition::from_ascii("t", &short, LevelParameters::default()),
            Err(LevelError::RowCount { found: 25 })
        ));

        let mut rows = blank_rows();
        rows[4].push('.');
        assert!(matches!(
            LevelDefinition::from_ascii("t", &rows.join("\n"), LevelParameters::default()),
            Err(LevelError::RowWidth { row: 4, found: 27 })
        ));
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{"name":"mini","tiles":[{"x":5,"y":6,"kind":"Steel"},{"x":40,"y":1,"kind":"Brick"}]}"#;
        let level = LevelDefinition::from_json_str(json).unwrap();
        assert_eq!(level.parameters, LevelParameters::default());
        let arena = level.build_arena();
        assert_eq!(arena.tile(IVec2::new(5, 6)), Tile::Steel);
        assert_eq!(arena.cells().count(), 1);
    }

    #[test]
    fn test_tiles_inside_base_are_dropped() {
        let level = LevelDefinition {
            name: "b".into(),
            parameters: LevelParameters::default(),
            tiles: vec![TileSpec {
                x: 12,
                y: 24,
                kind: TileKind::Brick,
            }],
        };
        assert_eq!(level.build_arena().cells().count(), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        let params = LevelParameters {
            tank_probabilities: [0.0; 4],
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(LevelError::Parameters(_))));
        let json = r#"{"parameters":{"enemy_count":0}}"#;
        assert!(LevelDefinition::from_json_str(json).is_err());
    }
}
