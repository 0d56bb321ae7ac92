//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Overall game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// Tick loop running.
    Active,
    /// Frozen by the player; commands are still processed.
    Paused,
    /// All enemies of the level destroyed; waiting to load the next one.
    StageClear,
    /// Base destroyed or every player out of lives.
    GameOver,
}

/// The two controllable tanks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    /// Driven by the decision pipeline.
    #[default]
    Autopilot,
    /// Driven by external key-state input.
    Human,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::Autopilot, PlayerSlot::Human];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn other(self) -> Self {
        match self {
            PlayerSlot::Autopilot => PlayerSlot::Human,
            PlayerSlot::Human => PlayerSlot::Autopilot,
        }
    }
}

/// Who fired a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shooter {
    Player(PlayerSlot),
    Enemy,
}

impl Shooter {
    pub fn is_enemy(self) -> bool {
        matches!(self, Shooter::Enemy)
    }

    pub fn is_player(self) -> bool {
        !self.is_enemy()
    }

    /// Enemy bullets and player bullets oppose each other; same-side bullets never clash.
    pub fn opposes(self, other: Shooter) -> bool {
        self.is_enemy() != other.is_enemy()
    }
}

/// Enemy tank variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Slow, single hit.
    #[default]
    Basic,
    /// Double movement speed.
    Fast,
    /// Fires fast bullets.
    Power,
    /// Takes four hits.
    Armored,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 4] = [
        EnemyArchetype::Basic,
        EnemyArchetype::Fast,
        EnemyArchetype::Power,
        EnemyArchetype::Armored,
    ];

    /// Map a 1-based type number (as used by level probability tables).
    pub fn from_type_number(n: usize) -> Self {
        match n {
            1 => EnemyArchetype::Basic,
            2 => EnemyArchetype::Fast,
            3 => EnemyArchetype::Power,
            _ => EnemyArchetype::Armored,
        }
    }
}

/// Power-up types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Temporary invulnerability.
    Helmet,
    /// Freezes every enemy.
    Clock,
    /// Fortifies the base ring with steel for a while.
    Shovel,
    /// Weapon tier-up.
    Star,
    /// Destroys every enemy on the field.
    Bomb,
    ExtraLife,
    /// Jumps straight to the top weapon tier.
    Gun,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::Helmet,
        PowerUpKind::Clock,
        PowerUpKind::Shovel,
        PowerUpKind::Star,
        PowerUpKind::Bomb,
        PowerUpKind::ExtraLife,
        PowerUpKind::Gun,
    ];

    /// Relative rarity in [0, 1]; common kinds are 1.0.
    pub fn rarity(self) -> f64 {
        match self {
            PowerUpKind::ExtraLife | PowerUpKind::Gun => 0.3,
            _ => 1.0,
        }
    }

    /// Integer draw weight, `ceil(rarity * 10)`.
    pub fn weight(self) -> u32 {
        (self.rarity() * 10.0).ceil() as u32
    }
}

/// Wall materials that can occupy a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallMaterial {
    Brick,
    Steel,
}

/// Tile kinds carried by a decoded level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Brick,
    Steel,
    River,
    Bush,
}

/// Why a bullet stopped existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletEnd {
    Base,
    Steel,
    Brick,
    Bullet,
    Tank,
    OutOfBounds,
}

/// Explosion sizes for the visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Big,
}

/// Coarse danger label reported by the autopilot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DangerLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// Risk label for bullet collision assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Which pipeline stage (and branch) drove the autopilot this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Idle,
    MaintainShot,
    CloseCombat,
    BulletDefense,
    Dodge,
    SaferRoute,
    ClearPath,
    SeekPowerUp,
    AlignBeforeAttack,
    PredictiveShot,
    Chase,
    HoldCourse,
    Exploring,
}

/// Bullet speed for a player at the given power level (pixels per tick).
pub fn bullet_speed_for_power(power_level: u8) -> f64 {
    if power_level >= FAST_BULLET_POWER {
        FAST_BULLET_SPEED
    } else {
        BULLET_SPEED
    }
}

/// Cooldown after firing at the given power level.
pub fn bullet_cooldown_for_power(power_level: u8) -> u32 {
    if power_level > FAST_BULLET_POWER {
        FAST_BULLET_COOLDOWN
    } else {
        BULLET_COOLDOWN
    }
}

/// In-flight bullet cap at the given power level.
pub fn max_bullets_for_power(power_level: u8) -> usize {
    if power_level >= MULTI_BULLET_POWER {
        MAX_BULLETS
    } else {
        1
    }
}
