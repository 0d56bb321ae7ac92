//! Entity factories and level setup for the simulation world.

use log::{debug, info};
use rand_chacha::ChaCha8Rng;

use tankgrid_ai::fsm;
use tankgrid_ai::profiles::get_profile;
use tankgrid_arena::LevelDefinition;
use tankgrid_core::components::{EnemyTank, Hull, PlayerTank};
use tankgrid_core::constants::*;
use tankgrid_core::enums::EnemyArchetype;
use tankgrid_core::events::AudioEvent;
use tankgrid_core::input::InputIntent;
use tankgrid_core::types::Direction;

use crate::systems::enemy_spawner::{self, Spawner};
use crate::systems::fortification;
use crate::world::{LevelState, World};

/// Reset the world for a level. Walls, base, enemies, bullets, the power-up,
/// the freeze and the fortification cycle start over; players keep power,
/// lives and score and reappear after the level-start delay.
pub fn setup_level(world: &mut World, level: &LevelDefinition, index: usize) {
    world.arena = level.build_arena();
    world.enemies.clear();
    world.bullets.clear();
    world.power_up = None;
    world.frozen_ticks = 0;
    fortification::cancel(world);
    world.spawner = Spawner::default();
    world.level = LevelState {
        index,
        name: level.name.clone(),
        parameters: level.parameters.clone(),
    };
    world.inputs = [InputIntent::default(); 2];

    for player in world.players.iter_mut() {
        stage_player(player);
    }

    info!(
        "level {} '{}' started: {} enemies, {} bricks",
        index,
        level.name,
        level.parameters.enemy_count,
        world.arena.brick_count()
    );
    world.sound(AudioEvent::LevelStarted { index });
}

/// Park a player off the field until its level-start respawn.
fn stage_player(player: &mut PlayerTank) {
    player.hull = Hull::new(PlayerTank::spawn_point(player.slot), Direction::Up);
    player.hull.alive = false;
    player.can_shoot = false;
    player.bullet_cooldown = 0;
    player.respawn_timer = LEVEL_START_RESPAWN_TICKS;
}

/// Spawn the next enemy of the roster at the next spawn point.
pub fn spawn_enemy(world: &mut World, rng: &mut ChaCha8Rng, current_tick: u64) -> u32 {
    let facing = fsm::random_direction(rng);
    let archetype = enemy_spawner::roll_archetype(rng, &world.level.parameters.tank_probabilities);
    let decision_timer = fsm::initial_decision_timer(rng);

    let position = world.spawner.next_spawn_point();
    world.spawner.next_point = (world.spawner.next_point + 1) % ENEMY_SPAWN_POINTS.len();
    world.spawner.spawned += 1;
    let carries_power_up = Spawner::is_carrier(world.spawner.spawned, world.level.parameters.enemy_count);

    let id = world.next_enemy_id();
    let mut enemy = build_enemy(id, archetype, Hull::new(position, facing));
    enemy.hull.last_turn_tick = current_tick;
    enemy.decision_timer = decision_timer;
    enemy.fire_timer = world.level.parameters.enemy_fire_rate as i32;
    enemy.carries_power_up = carries_power_up;

    debug!(
        "enemy {} spawned: {:?} at ({}, {}), carrier={}",
        id, archetype, position.x, position.y, carries_power_up
    );
    world.enemies.push(enemy);
    id
}

/// An enemy with its archetype's stats and neutral timers.
pub fn build_enemy(id: u32, archetype: EnemyArchetype, hull: Hull) -> EnemyTank {
    let profile = get_profile(archetype);
    EnemyTank {
        hull,
        id,
        archetype,
        carries_power_up: false,
        decision_timer: 50,
        fire_timer: 60,
        health: profile.health,
        stuck_timer: 0,
        speed: profile.speed,
    }
}
