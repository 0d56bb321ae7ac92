//! Player system: respawns, firing and movement for both player tanks.
//!
//! The autopilot tank is updated first, then the human tank.

use log::info;

use tankgrid_ai::Autopilot;
use tankgrid_core::components::{Hull, PlayerTank};
use tankgrid_core::constants::*;
use tankgrid_core::enums::PlayerSlot;
use tankgrid_core::events::VisualEvent;
use tankgrid_core::types::Direction;

use crate::systems::{autopilot as autopilot_system, ballistics, movement};
use crate::world::World;

pub fn run(world: &mut World, autopilot: &mut Autopilot, current_tick: u64) {
    for slot in PlayerSlot::ALL {
        update(world, autopilot, slot, current_tick);
    }
}

fn update(world: &mut World, autopilot: &mut Autopilot, slot: PlayerSlot, current_tick: u64) {
    let player = world.player(slot);
    if player.eliminated {
        return;
    }
    if !player.hull.alive {
        count_down_respawn(world, slot, current_tick);
        return;
    }

    if slot == PlayerSlot::Autopilot && autopilot.enabled {
        autopilot_system::steer(world, autopilot, current_tick);
    }

    let intent = world.input(slot);
    if intent.fire {
        ballistics::fire_player(world, slot);
    }

    let player = world.player_mut(slot);
    player.invulnerable_timer = player.invulnerable_timer.saturating_sub(1);

    movement::drive_player(world, slot, intent.direction(), current_tick);
}

fn count_down_respawn(world: &mut World, slot: PlayerSlot, current_tick: u64) {
    let player = world.player(slot);
    if player.respawn_timer == SPAWN_ANIMATION_LEAD_TICKS && player.lives > 0 {
        let position = PlayerTank::spawn_point(slot);
        world.emit(VisualEvent::SpawnAnimation { position });
    }

    let player = world.player_mut(slot);
    player.respawn_timer = player.respawn_timer.saturating_sub(1);
    if player.respawn_timer == 0 {
        respawn(player, current_tick);
    }
}

/// Bring a dead player back at its spawn point, or retire it for good once
/// it has no lives left.
pub fn respawn(player: &mut PlayerTank, current_tick: u64) {
    if player.lives == 0 {
        player.eliminated = true;
        player.hull.alive = false;
        player.hull.moving = false;
        player.can_shoot = false;
        info!("player {:?} is out of lives", player.slot);
        return;
    }

    let mut hull = Hull::new(PlayerTank::spawn_point(player.slot), Direction::Up);
    hull.last_turn_tick = current_tick;
    player.hull = hull;
    player.can_shoot = true;
    player.bullet_cooldown = 0;
    player.invulnerable_timer = INVULNERABLE_TICKS;
    info!("player {:?} respawned, {} lives left", player.slot, player.lives);
}
