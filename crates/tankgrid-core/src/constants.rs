//! Simulation constants and tuning parameters.
//!
//! Speeds are expressed in pixels per tick and divided by `CELL_SIZE` to get
//! cells per tick, matching the classic 8-pixel cell.

/// Simulation tick rate (Hz). One logical tick per rendered frame.
pub const TICK_RATE: u32 = 60;

// --- Battlefield ---

/// Cells per side of the square battlefield.
pub const GRID_SIZE: i32 = 26;

/// Pixels per cell; speed divisor.
pub const CELL_SIZE: f64 = 8.0;

/// Tank footprint side length (cells).
pub const TANK_SIZE: f64 = 2.0;

/// Base anchor cell and footprint.
pub const BASE_POSITION: (i32, i32) = (12, 24);
pub const BASE_SIZE: f64 = 2.0;

// --- Tanks ---

/// Player tank speed (pixels per tick).
pub const PLAYER_SPEED: f64 = 0.75;

/// Spawn anchor for the autopilot tank.
pub const AUTOPILOT_SPAWN: (f64, f64) = (16.0, 24.0);

/// Spawn anchor for the human tank.
pub const HUMAN_SPAWN: (f64, f64) = (8.0, 24.0);

/// Post-spawn grace period (ticks).
pub const INVULNERABLE_TICKS: u32 = 200;

/// Respawn delay after a player tank is destroyed.
pub const RESPAWN_DELAY_TICKS: u32 = 100;

/// Respawn delay at the start of every level.
pub const LEVEL_START_RESPAWN_TICKS: u32 = 52;

/// The spawn animation is announced when a countdown reads this value.
pub const SPAWN_ANIMATION_LEAD_TICKS: u32 = 52;

pub const DEFAULT_LIVES: u32 = 3;

pub const MIN_POWER_LEVEL: u8 = 1;
pub const MAX_POWER_LEVEL: u8 = 5;

// --- Bullets ---

pub const BULLET_SPEED: f64 = 2.0;
pub const FAST_BULLET_SPEED: f64 = 4.0;
pub const BULLET_SIZE: f64 = 0.3;

/// Cooldown after firing at power level <= 2.
pub const BULLET_COOLDOWN: u32 = 10;
/// Cooldown after firing at power level > 2.
pub const FAST_BULLET_COOLDOWN: u32 = 4;

/// How far inside the tank edge a new bullet appears.
pub const BULLET_OFFSET: f64 = 0.55;

/// In-flight bullet cap at power level >= 3.
pub const MAX_BULLETS: usize = 2;

/// Bullet-vs-bullet boxes are grown by this margin on every side.
pub const BULLET_CLASH_MARGIN: f64 = 0.1;

/// Power level from which bullets travel fast.
pub const FAST_BULLET_POWER: u8 = 2;
/// Power level from which two bullets may be in flight.
pub const MULTI_BULLET_POWER: u8 = 3;
/// Power level from which bullets destroy steel and whole bricks.
pub const WALL_BREAKER_POWER: u8 = 4;
/// Power level that absorbs one hit, dropping to `SHIELD_FALLBACK_POWER`.
pub const SHIELD_POWER: u8 = 5;
pub const SHIELD_FALLBACK_POWER: u8 = 3;

// --- Enemies ---

pub const ENEMY_SPEED: f64 = 0.5;
pub const FAST_ENEMY_SPEED: f64 = 1.0;
pub const ARMORED_ENEMY_HEALTH: u8 = 4;

/// Spawn anchors, cycled in order.
pub const ENEMY_SPAWN_POINTS: [(f64, f64); 3] = [(0.0, 0.0), (12.0, 0.0), (24.0, 0.0)];

/// Spawner countdown at level start.
pub const ENEMY_INITIAL_SPAWN_COOLDOWN: u32 = 120;

/// Every Nth spawned enemy carries a power-up.
pub const POWER_UP_CARRIER_INTERVAL: u32 = 6;

/// Chance that an expired decision timer redirects the enemy.
pub const ENEMY_REDIRECT_CHANCE: f64 = 0.15;
/// Decision timer after a boundary redirect.
pub const ENEMY_BOUNDARY_DECISION_TICKS: i32 = 10;
/// Ticks of overlap with another enemy before a forced redirect.
pub const ENEMY_STUCK_TICKS: u32 = 30;

// --- Power-ups ---

/// Spawn ranges (inclusive) for the power-up anchor.
pub const POWER_UP_X_RANGE: (i32, i32) = (2, 22);
pub const POWER_UP_Y_RANGE: (i32, i32) = (4, 20);
pub const POWER_UP_SIZE: f64 = 2.0;
pub const POWER_UP_SPAWN_ATTEMPTS: u32 = 20;

pub const HELMET_INVULNERABLE_TICKS: u32 = 600;
pub const CLOCK_FREEZE_TICKS: u32 = 600;
/// Highest level a star alone can reach.
pub const STAR_POWER_CAP: u8 = 4;

// --- Fortification (shovel) ---

pub const FORTIFY_TICKS: u32 = 1200;
pub const FORTIFY_ALTERNATE_TICKS: u32 = 30;
pub const FORTIFY_ALTERNATE_CYCLES: u32 = 6;

/// Cells that ring the base.
pub const FORTIFICATION_RING: [(i32, i32); 8] = [
    (11, 23),
    (12, 23),
    (13, 23),
    (14, 23),
    (11, 24),
    (11, 25),
    (14, 24),
    (14, 25),
];

// --- Autopilot ---

pub const AI_UPDATE_INTERVAL: u64 = 3;
pub const AI_SHOOT_DISTANCE: f64 = 8.0;
pub const AI_AVOID_DISTANCE: f64 = 4.0;
pub const AI_BULLET_DESTROY_DISTANCE: f64 = 3.0;
pub const AI_PATHFINDING_DEPTH: usize = 15;
/// BFS frontier cap.
pub const AI_PATH_FRONTIER_BUDGET: usize = AI_PATHFINDING_DEPTH * 10;
pub const AI_SHOOT_COOLDOWN: u32 = 4;
pub const AI_ALIGNMENT_TOLERANCE: f64 = 0.5;
pub const AI_BULLET_PREDICTION_FRAMES: u32 = 30;
pub const AI_BULLET_COLLISION_THRESHOLD: f64 = 1.0;
/// Minimum time-to-collision (ticks) considered safe.
pub const AI_MIN_TTC: f64 = 15.0;
/// Ticks within which a turn counts as "just turned" for the shot hold.
pub const AI_SHOT_HOLD_TICKS: u64 = 3;
/// Move commitment after a path-driven turn.
pub const AI_MOVE_COMMIT_TICKS: u32 = 10;
/// Ticks of the short-range power-up approach before re-pathing.
pub const AI_SIMPLE_APPROACH_TICKS: u32 = 30;
/// Exploration turns clockwise once every this many ticks.
pub const AI_EXPLORE_TURN_TICKS: u64 = 120;

/// Seconds of enemy motion extrapolated for predictive shots.
pub const AI_PREDICTION_TIME: f64 = 1.0;
pub const AI_PREDICTION_FRAMES: u32 = 60;
pub const AI_PREDICTION_DISTANCE_THRESHOLD: f64 = GRID_SIZE as f64 / 3.0;
pub const AI_MIN_PREDICTION_DISTANCE: f64 = 8.0;
/// Enemies that turned within this many ticks are not predicted.
pub const AI_PREDICTION_RECENCY_TICKS: u64 = 30;
/// Max divergence between sampled and linear-model paths.
pub const AI_PREDICTION_DIVERGENCE: f64 = 2.0;

pub const CLOSE_COMBAT_DISTANCE: f64 = 3.5;
pub const IMMEDIATE_SHOOT_DISTANCE: f64 = 3.0;
pub const PERPENDICULAR_BULLET_RISK_DISTANCE: f64 = 4.0;

/// Score assigned to moves into walls or off the board.
pub const AI_IMPOSSIBLE_MOVE_DANGER: f64 = 1000.0;

// --- Line of sight ---

/// Samples taken along a segment by `obstacle_between`.
pub const LOS_SAMPLES: usize = 20;
/// Segments shorter than this on both axes are always clear.
pub const LOS_SHORT_RANGE: f64 = 2.0;

// --- Levels ---

/// Ticks between stage clear and loading the next level.
pub const STAGE_CLEAR_DELAY_TICKS: u32 = 240;
