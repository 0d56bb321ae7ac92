//! One-shot notifications emitted by the simulation for the render and audio
//! collaborators. Each tick's events are drained into that tick's snapshot.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Cues for the particle/animation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VisualEvent {
    /// Small burst where a bullet stopped.
    BulletBurst { position: DVec2, cause: BulletEnd },
    /// Tank or base explosion centred on a footprint.
    Explosion { position: DVec2, size: ExplosionSize },
    /// A tank is about to appear at this anchor.
    SpawnAnimation { position: DVec2 },
}

/// Cues for the sound system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A player tank fired.
    ShotFired { slot: PlayerSlot },
    /// A bullet bounced off steel or the arena edge.
    WallHit,
    /// Brick quadrants or a steel wall were removed.
    WallDestroyed,
    /// A hit was absorbed by armour or the power-5 shield.
    ArmorHit,
    EnemyDestroyed { archetype: EnemyArchetype },
    PlayerDestroyed { slot: PlayerSlot },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpConsumed { kind: PowerUpKind, slot: PlayerSlot },
    BaseDestroyed,
    LevelStarted { index: usize },
    StageClear,
    GameOver,
}
