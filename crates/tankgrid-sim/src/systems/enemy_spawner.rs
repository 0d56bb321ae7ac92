//! Enemy spawning system: paces a level's roster onto the field.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankgrid_core::constants::*;
use tankgrid_core::enums::EnemyArchetype;
use tankgrid_core::events::VisualEvent;

use crate::world::World;

/// Spawn pacing for the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawner {
    /// Ticks until the next spawn attempt.
    pub cooldown: u32,
    /// Enemies spawned so far this level.
    pub spawned: u32,
    /// Index into `ENEMY_SPAWN_POINTS` for the next spawn.
    pub next_point: usize,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            cooldown: ENEMY_INITIAL_SPAWN_COOLDOWN,
            spawned: 0,
            next_point: 0,
        }
    }
}

impl Spawner {
    pub fn next_spawn_point(&self) -> DVec2 {
        let (x, y) = ENEMY_SPAWN_POINTS[self.next_point % ENEMY_SPAWN_POINTS.len()];
        DVec2::new(x, y)
    }

    /// Every sixth enemy carries a power-up, except on multiples of the
    /// level's roster size.
    pub fn is_carrier(spawned: u32, enemy_count: u32) -> bool {
        spawned % POWER_UP_CARRIER_INTERVAL == 0 && (enemy_count == 0 || spawned % enemy_count != 0)
    }
}

/// Weighted archetype roll over the level's probability table.
pub fn roll_archetype(rng: &mut ChaCha8Rng, weights: &[f64; 4]) -> EnemyArchetype {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return EnemyArchetype::Basic;
    }
    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return EnemyArchetype::from_type_number(i + 1);
        }
    }
    EnemyArchetype::Armored
}

/// Count down and spawn when the field has room.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, current_tick: u64) {
    let params = &world.level.parameters;
    if world.spawner.spawned >= params.enemy_count {
        return;
    }
    let has_room = world.alive_enemy_count() < params.max_concurrent as usize;
    let spawn_rate = params.enemy_spawn_rate;

    if world.spawner.cooldown == SPAWN_ANIMATION_LEAD_TICKS && has_room {
        let position = world.spawner.next_spawn_point();
        world.emit(VisualEvent::SpawnAnimation { position });
    }

    world.spawner.cooldown = world.spawner.cooldown.saturating_sub(1);
    if world.spawner.cooldown == 0 && has_room {
        crate::world_setup::spawn_enemy(world, rng, current_tick);
        world.spawner.cooldown = spawn_rate;
    }
}
