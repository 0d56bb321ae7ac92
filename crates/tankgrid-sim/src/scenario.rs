//! Built-in campaign: three stages shipped with the simulation.
//!
//! Layouts use the ASCII level format: `.` open ground, `#` brick, `@` steel,
//! `~` river, `%` bush. The base sits at (12, 24) inside a brick ring.

use log::warn;

use tankgrid_arena::{LevelDefinition, LevelParameters};

const STAGE_ONE: &str = "
..........................
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
..##..##..##..##..##..##..
..##..##..##..##..##..##..
..##..##..##@@##..##..##..
..##..##..##@@##..##..##..
..##..##..##..##..##..##..
..##..##..........##..##..
..##..##..........##..##..
..........######..........
....####..######..####....
##..####..........####..##
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
..##..##..######..##..##..
..##..##..######..##..##..
..##..##..##..##..##..##..
..##..##..........##..##..
..##..##..........##..##..
..........................
...........####...........
...........#..#...........
...........#..#...........
";

const STAGE_TWO: &str = "
..........................
..........................
........##########........
....@@..##########..@@....
....@@.....%%%%.....@@....
....@@.....%%%%.....@@....
%%..@@..............@@..%%
%%..@@..............@@..%%
..........................
............##............
~~~~~~~~....##....~~~~~~~~
~~~~~~~~....##....~~~~~~~~
............##............
............##............
..########..##..########..
..########......########..
..........................
..........................
....@@..............@@....
....@@..##......##..@@....
....@@..##......##..@@....
....@@..##......##..@@....
..........................
...........####...........
...........#..#...........
...........#..#...........
";

const STAGE_THREE: &str = "
..........................
..........................
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
....@@......@@......@@....
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
..........~~~~~~..........
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
....@@......@@......@@....
..........................
..##..##..##..##..##..##..
..##..##..##..##..##..##..
%%%%..................%%%%
%%%%..................%%%%
..##..##..##..##..##..##..
..##..##..##..##..##..##..
............##............
..........................
...........####...........
...........#..#...........
...........#..#...........
";

/// Stage name, layout and pacing.
fn stages() -> [(&'static str, &'static str, LevelParameters); 3] {
    [
        (
            "Stage 1",
            STAGE_ONE,
            LevelParameters {
                enemy_count: 20,
                max_concurrent: 4,
                enemy_spawn_rate: 150,
                enemy_fire_rate: 60,
                tank_probabilities: [0.7, 0.2, 0.1, 0.0],
            },
        ),
        (
            "Stage 2",
            STAGE_TWO,
            LevelParameters {
                enemy_count: 20,
                max_concurrent: 4,
                enemy_spawn_rate: 130,
                enemy_fire_rate: 50,
                tank_probabilities: [0.5, 0.2, 0.2, 0.1],
            },
        ),
        (
            "Stage 3",
            STAGE_THREE,
            LevelParameters {
                enemy_count: 20,
                max_concurrent: 5,
                enemy_spawn_rate: 110,
                enemy_fire_rate: 40,
                tank_probabilities: [0.3, 0.3, 0.2, 0.2],
            },
        ),
    ]
}

/// Decode the built-in stages. A stage that fails to decode is skipped
/// with a warning.
pub fn builtin_campaign() -> Vec<LevelDefinition> {
    stages()
        .into_iter()
        .filter_map(|(name, layout, parameters)| {
            LevelDefinition::from_ascii(name, layout, parameters)
                .map_err(|err| warn!("built-in stage '{name}' skipped: {err}"))
                .ok()
        })
        .collect()
}

/// A stage with no terrain at all.
pub fn open_field() -> LevelDefinition {
    LevelDefinition {
        name: "Open Field".to_string(),
        parameters: LevelParameters::default(),
        tiles: Vec::new(),
    }
}
