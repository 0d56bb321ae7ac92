//! Snapshot system: builds a complete GameStateSnapshot from the world.
//!
//! This system is read-only; it never modifies the world.

use tankgrid_arena::Tile;
use tankgrid_core::components::{Bullet, EnemyTank, PlayerTank};
use tankgrid_core::enums::GamePhase;
use tankgrid_core::events::{AudioEvent, VisualEvent};
use tankgrid_core::state::*;
use tankgrid_core::types::SimTime;

use crate::world::World;

/// Build the snapshot for this tick. `autopilot` carries the pipeline's
/// diagnostics; the world's running statistics are folded in here.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    autopilot: &AutopilotView,
    visual_events: Vec<VisualEvent>,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        level: build_level(world),
        players: world.players.iter().map(build_player).collect(),
        enemies: world.enemies.iter().filter(|e| e.hull.alive).map(build_enemy).collect(),
        bullets: world.bullets.iter().map(build_bullet).collect(),
        walls: world.arena.wall_views(),
        rivers: world.arena.cells_of(|t| t == Tile::River),
        bushes: world.arena.cells_of(|t| t == Tile::Bush),
        base: world.arena.base,
        power_up: world.power_up,
        fortification: world.fortification,
        frozen_ticks: world.frozen_ticks,
        autopilot: AutopilotView {
            stats: world.stats,
            ..autopilot.clone()
        },
        visual_events,
        audio_events,
    }
}

fn build_level(world: &World) -> LevelView {
    let total = world.level.parameters.enemy_count;
    LevelView {
        index: world.level.index,
        name: world.level.name.clone(),
        enemies_total: total,
        enemies_spawned: world.spawner.spawned,
        enemies_in_reserve: total.saturating_sub(world.spawner.spawned),
    }
}

fn build_player(player: &PlayerTank) -> PlayerView {
    PlayerView {
        slot: player.slot,
        position: player.hull.position,
        physical: player.hull.physical,
        facing: player.hull.facing,
        moving: player.hull.moving,
        alive: player.hull.alive,
        power_level: player.power_level,
        lives: player.lives,
        invulnerable: player.is_invulnerable(),
        score: player.score,
    }
}

fn build_enemy(enemy: &EnemyTank) -> EnemyView {
    EnemyView {
        id: enemy.id,
        archetype: enemy.archetype,
        position: enemy.hull.position,
        physical: enemy.hull.physical,
        facing: enemy.hull.facing,
        health: enemy.health,
        carries_power_up: enemy.carries_power_up,
    }
}

fn build_bullet(bullet: &Bullet) -> BulletView {
    BulletView {
        id: bullet.id,
        position: bullet.position,
        direction: bullet.direction,
        owner: bullet.owner,
    }
}
