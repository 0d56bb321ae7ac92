//! Archetype-specific enemy profiles.
//!
//! Consolidates per-archetype parameters for the spawner, the wander FSM
//! and the ballistics rules.

use tankgrid_core::enums::EnemyArchetype;

/// Behavioral profile for an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Movement speed (speed units per tick; divide by cell size for cells).
    pub speed: f64,
    /// Hits needed to destroy.
    pub health: u8,
    /// Speed of this archetype's bullets.
    pub bullet_speed: f64,
    /// Score awarded to the player that destroys it.
    pub reward: u32,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyProfile {
    use tankgrid_core::constants::*;

    match archetype {
        EnemyArchetype::Basic => EnemyProfile {
            speed: ENEMY_SPEED,
            health: 1,
            bullet_speed: BULLET_SPEED,
            reward: 100,
        },
        EnemyArchetype::Fast => EnemyProfile {
            speed: FAST_ENEMY_SPEED,
            health: 1,
            bullet_speed: BULLET_SPEED,
            reward: 200,
        },
        EnemyArchetype::Power => EnemyProfile {
            speed: ENEMY_SPEED,
            health: 1,
            bullet_speed: FAST_BULLET_SPEED,
            reward: 300,
        },
        EnemyArchetype::Armored => EnemyProfile {
            speed: ENEMY_SPEED,
            health: ARMORED_ENEMY_HEALTH,
            bullet_speed: BULLET_SPEED,
            reward: 400,
        },
    }
}
