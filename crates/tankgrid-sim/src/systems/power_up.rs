//! Power-up spawning, pickup and effects.

use glam::IVec2;
use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankgrid_arena::{Arena, Tile};
use tankgrid_core::components::PowerUp;
use tankgrid_core::constants::*;
use tankgrid_core::enums::{ExplosionSize, PlayerSlot, PowerUpKind};
use tankgrid_core::events::{AudioEvent, VisualEvent};

use crate::systems::fortification;
use crate::world::World;

/// Weighted draw over every kind.
pub fn roll_kind(rng: &mut ChaCha8Rng) -> PowerUpKind {
    let total: u32 = PowerUpKind::ALL.iter().map(|k| k.weight()).sum();
    let mut roll = rng.gen_range(0..total);
    for kind in PowerUpKind::ALL {
        if roll < kind.weight() {
            return kind;
        }
        roll -= kind.weight();
    }
    PowerUpKind::Helmet
}

fn roll_cell(rng: &mut ChaCha8Rng) -> IVec2 {
    IVec2::new(
        rng.gen_range(POWER_UP_X_RANGE.0..=POWER_UP_X_RANGE.1),
        rng.gen_range(POWER_UP_Y_RANGE.0..=POWER_UP_Y_RANGE.1),
    )
}

/// All four cells under a power-up anchored at `cell` are open ground.
fn footprint_clear(arena: &Arena, cell: IVec2) -> bool {
    [IVec2::ZERO, IVec2::X, IVec2::Y, IVec2::ONE]
        .into_iter()
        .all(|offset| arena.tile(cell + offset) == Tile::Empty)
}

/// Place a new power-up, replacing any on the field. A validated spawn
/// looks for open ground and settles for the last sample if none turns up.
pub fn spawn(world: &mut World, rng: &mut ChaCha8Rng, validated: bool) -> PowerUp {
    let kind = roll_kind(rng);
    let mut cell = roll_cell(rng);
    if validated {
        let mut attempts = 1;
        while !footprint_clear(&world.arena, cell) && attempts < POWER_UP_SPAWN_ATTEMPTS {
            cell = roll_cell(rng);
            attempts += 1;
        }
        if !footprint_clear(&world.arena, cell) {
            warn!(
                "no open ground for a power-up after {} attempts, placing at ({}, {})",
                POWER_UP_SPAWN_ATTEMPTS, cell.x, cell.y
            );
        }
    }

    let power_up = PowerUp { kind, cell };
    debug!("power-up {:?} spawned at ({}, {})", kind, cell.x, cell.y);
    world.power_up = Some(power_up);
    world.sound(AudioEvent::PowerUpSpawned { kind });
    power_up
}

/// Let a live player drive over the power-up. The autopilot tank is tested
/// first.
pub fn run(world: &mut World, current_tick: u64) {
    let Some(power_up) = world.power_up else {
        return;
    };
    let rect = power_up.rect();
    let taker = PlayerSlot::ALL.into_iter().find(|slot| {
        let hull = &world.player(*slot).hull;
        hull.alive && hull.visual_box().overlaps(&rect)
    });
    if let Some(slot) = taker {
        world.power_up = None;
        apply(world, slot, power_up.kind, current_tick);
    }
}

/// Apply a collected power-up to `slot`.
pub fn apply(world: &mut World, slot: PlayerSlot, kind: PowerUpKind, current_tick: u64) {
    debug!("power-up {:?} taken by {:?} at tick {}", kind, slot, current_tick);
    match kind {
        PowerUpKind::Helmet => {
            world.player_mut(slot).invulnerable_timer = HELMET_INVULNERABLE_TICKS;
        }
        PowerUpKind::Clock => {
            world.frozen_ticks = CLOCK_FREEZE_TICKS;
        }
        PowerUpKind::Shovel => {
            fortification::start(world);
        }
        PowerUpKind::Star => {
            let player = world.player_mut(slot);
            if player.power_level < STAR_POWER_CAP {
                player.power_level += 1;
            }
        }
        PowerUpKind::Gun => {
            world.player_mut(slot).power_level = MAX_POWER_LEVEL;
        }
        PowerUpKind::Bomb => {
            let mut destroyed = Vec::new();
            for enemy in world.enemies.iter_mut().filter(|e| e.hull.alive) {
                enemy.hull.alive = false;
                enemy.health = 0;
                destroyed.push((enemy.hull.position, enemy.archetype));
            }
            for (position, archetype) in destroyed {
                world.emit(VisualEvent::Explosion { position, size: ExplosionSize::Big });
                world.sound(AudioEvent::EnemyDestroyed { archetype });
            }
        }
        PowerUpKind::ExtraLife => {
            let player = world.player_mut(slot);
            player.lives = player.lives.saturating_add(1);
        }
    }
    world.sound(AudioEvent::PowerUpConsumed { kind, slot });
}
