//! Enemy system: spawning, wander decisions, firing and movement.

use rand_chacha::ChaCha8Rng;

use tankgrid_ai::fsm;
use tankgrid_core::types::Rect;

use crate::systems::{ballistics, enemy_spawner, movement};
use crate::world::World;

/// Run the spawner, clear out last tick's wrecks, then let each live enemy
/// decide, fire and move. Nothing but the spawner runs during a freeze.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, current_tick: u64) {
    enemy_spawner::run(world, rng, current_tick);
    world.enemies.retain(|e| e.hull.alive);

    if world.frozen_ticks > 0 {
        for enemy in world.enemies.iter_mut() {
            enemy.hull.moving = false;
        }
        return;
    }

    for index in 0..world.enemies.len() {
        let update = fsm::evaluate(&mut world.enemies[index], rng, current_tick);
        if update.fire {
            ballistics::fire_enemy(world, index);
        }
        step(world, rng, index, current_tick);
    }
}

/// Move one enemy. Terrain or a player in the way forces a redirect; another
/// enemy in the way is driven through but wears down its patience.
fn step(world: &mut World, rng: &mut ChaCha8Rng, index: usize, current_tick: u64) {
    let (players, others) = movement::blockers_for_enemy(world, index);
    let enemy = &mut world.enemies[index];
    let next = movement::step_target(&enemy.hull, enemy.speed);
    let footprint = Rect::tank(next);

    if world.arena.blocks_tank_at(next) || players.iter().any(|p| p.overlaps(&footprint)) {
        enemy.hull.moving = false;
        fsm::redirect(enemy, rng, current_tick, true);
        return;
    }

    enemy.hull.position = next;
    enemy.hull.moving = true;
    enemy.hull.sync_physical();
    if others.iter().any(|o| o.overlaps(&footprint)) {
        fsm::on_crowded(enemy, rng, current_tick);
    }
}
