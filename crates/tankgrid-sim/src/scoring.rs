//! Score and autopilot statistics bookkeeping.

use tankgrid_ai::profiles::get_profile;
use tankgrid_core::enums::{EnemyArchetype, PlayerSlot};

use crate::world::World;

/// Credit `slot` with destroying an enemy of `archetype`.
pub fn record_kill(world: &mut World, slot: PlayerSlot, archetype: EnemyArchetype) {
    let reward = get_profile(archetype).reward;
    let player = world.player_mut(slot);
    player.score = player.score.saturating_add(reward);
    if slot == PlayerSlot::Autopilot {
        world.stats.enemies_killed += 1;
    }
}

/// Combined score of both players.
pub fn team_score(world: &World) -> u32 {
    world.players.iter().map(|p| p.score).sum()
}
