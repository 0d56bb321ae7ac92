//! Autopilot system: hands the autopilot tank to the decision pipeline.
//!
//! The pipeline only reads a `WorldView`; this system applies what it
//! decided (hull turns, the key-state table) and keeps the statistics.

use log::trace;

use tankgrid_ai::{Autopilot, WorldView};
use tankgrid_core::enums::PlayerSlot;

use crate::world::World;

/// Let the pipeline drive the autopilot tank for this tick.
pub fn steer(world: &mut World, autopilot: &mut Autopilot, current_tick: u64) {
    let decision = {
        let view = WorldView {
            arena: &world.arena,
            me: world.player(PlayerSlot::Autopilot),
            partner: Some(world.player(PlayerSlot::Human)),
            enemies: &world.enemies,
            bullets: &world.bullets,
            power_up: world.power_up.as_ref(),
            frozen_ticks: world.frozen_ticks,
            tick: current_tick,
        };
        autopilot.decide(&view)
    };
    let Some(decision) = decision else {
        return;
    };

    if decision.dodged {
        world.stats.bullets_dodged += 1;
        trace!("autopilot dodged at tick {}", current_tick);
    }
    world.player_mut(PlayerSlot::Autopilot).hull = decision.hull;
    world.inputs[PlayerSlot::Autopilot.index()] = decision.intent;
}
