//! Countdown system: world-level timers that tick once per frame.

use crate::systems::fortification;
use crate::world::World;

pub fn run(world: &mut World) {
    world.frozen_ticks = world.frozen_ticks.saturating_sub(1);
    fortification::advance(world);
}
