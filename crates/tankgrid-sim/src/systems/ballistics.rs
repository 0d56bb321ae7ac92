//! Ballistics system: firing, bullet travel and impact resolution.
//!
//! Each bullet advances once per tick and is then tested, in order, against
//! the base, walls, opposing bullets, tanks and the arena edge. The first
//! hit terminates it. Every termination leaves exactly one burst, and a
//! player bullet that stops for any reason re-arms its shooter.

use glam::DVec2;
use log::info;
use rand_chacha::ChaCha8Rng;

use tankgrid_ai::profiles::get_profile;
use tankgrid_core::components::Bullet;
use tankgrid_core::constants::*;
use tankgrid_core::enums::{BulletEnd, ExplosionSize, PlayerSlot, Shooter};
use tankgrid_core::events::{AudioEvent, VisualEvent};
use tankgrid_core::types::Rect;

use crate::scoring;
use crate::systems::power_up;
use crate::world::World;

/// Fire from a player tank if its weapon is ready. Returns the bullet id.
pub fn fire_player(world: &mut World, slot: PlayerSlot) -> Option<u32> {
    let owner = Shooter::Player(slot);
    let in_flight = world.bullets.iter().filter(|b| b.owner == owner).count();
    let player = world.player(slot);
    if !player.hull.alive || !player.can_shoot || player.bullet_cooldown > 0 || in_flight >= player.max_bullets() {
        return None;
    }

    let id = world.next_bullet_id();
    let player = world.player_mut(slot);
    player.bullet_cooldown = player.bullet_cooldown_ticks();
    let bullet = Bullet::fired_from(id, &player.hull, player.bullet_speed(), owner);
    world.bullets.push(bullet);
    world.sound(AudioEvent::ShotFired { slot });
    Some(id)
}

/// Fire from enemy `index` at its archetype's bullet speed.
pub fn fire_enemy(world: &mut World, index: usize) -> Option<u32> {
    let enemy = world.enemies.get(index)?;
    if !enemy.hull.alive {
        return None;
    }
    let speed = get_profile(enemy.archetype).bullet_speed;
    let hull = enemy.hull.clone();
    let id = world.next_bullet_id();
    world.bullets.push(Bullet::fired_from(id, &hull, speed, Shooter::Enemy));
    Some(id)
}

/// Power level whose impact rules apply to `owner`'s bullets right now.
fn shooter_power(world: &World, owner: Shooter) -> u8 {
    match owner {
        Shooter::Player(slot) => world.player(slot).power_level,
        Shooter::Enemy => MIN_POWER_LEVEL,
    }
}

/// Stop a bullet: one burst, and restart a player shooter's cooldown at its
/// power level's value.
fn terminate(world: &mut World, owner: Shooter, position: DVec2, cause: BulletEnd) {
    world.emit(VisualEvent::BulletBurst { position, cause });
    if let Shooter::Player(slot) = owner {
        let player = world.player_mut(slot);
        player.bullet_cooldown = player.bullet_cooldown_ticks();
    }
}

/// Advance and resolve every bullet in flight.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng) {
    for player in world.players.iter_mut() {
        player.bullet_cooldown = player.bullet_cooldown.saturating_sub(1);
    }

    let mut bullets = std::mem::take(&mut world.bullets);
    let mut live = vec![true; bullets.len()];

    for i in 0..bullets.len() {
        if !live[i] {
            continue;
        }
        bullets[i].advance();
        let bullet = bullets[i].clone();
        if let Some(end) = resolve(world, rng, &bullet, &bullets, &mut live, i) {
            live[i] = false;
            let position = if end == BulletEnd::OutOfBounds {
                bullet.position.clamp(DVec2::ZERO, DVec2::splat(GRID_SIZE as f64 - BULLET_SIZE))
            } else {
                bullet.position
            };
            terminate(world, bullet.owner, position, end);
        }
    }

    let mut index = 0;
    bullets.retain(|_| {
        let keep = live[index];
        index += 1;
        keep
    });
    // Anything fired while resolving (nothing today) goes after the survivors.
    bullets.append(&mut world.bullets);
    world.bullets = bullets;
}

/// Test one advanced bullet. Returns why it stopped, if it did.
fn resolve(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    bullet: &Bullet,
    all: &[Bullet],
    live: &mut [bool],
    index: usize,
) -> Option<BulletEnd> {
    let rect = bullet.rect();

    // 1. Base
    if world.arena.base.alive && rect.overlaps(&world.arena.base.rect()) {
        world.arena.base.alive = false;
        let position = world.arena.base.cell.as_dvec2();
        world.emit(VisualEvent::Explosion { position, size: ExplosionSize::Big });
        world.sound(AudioEvent::BaseDestroyed);
        info!("base destroyed by {:?}", bullet.owner);
        return Some(BulletEnd::Base);
    }

    // 2. Walls. Steel and brick both resolve so a wall-breaker clears a
    //    mixed junction in one tick.
    if let Some(end) = strike_walls(world, bullet, &rect) {
        return Some(end);
    }

    // 3. Opposing bullets
    let clash_box = rect.inflate(BULLET_CLASH_MARGIN);
    let clash = all.iter().enumerate().find(|(j, other)| {
        *j != index && live[*j] && bullet.owner.opposes(other.owner) && clash_box.overlaps(&other.rect().inflate(BULLET_CLASH_MARGIN))
    });
    if let Some((j, other)) = clash {
        live[j] = false;
        if bullet.owner == Shooter::Player(PlayerSlot::Autopilot) || other.owner == Shooter::Player(PlayerSlot::Autopilot) {
            world.stats.bullets_destroyed += 1;
        }
        terminate(world, other.owner, other.position, BulletEnd::Bullet);
        return Some(BulletEnd::Bullet);
    }

    // 4. Tanks
    let hit_tank = match bullet.owner {
        Shooter::Player(slot) => hit_enemy(world, rng, slot, &rect),
        Shooter::Enemy => hit_player(world, &rect),
    };
    if hit_tank {
        return Some(BulletEnd::Tank);
    }

    // 5. Arena edge
    if bullet.is_out_of_bounds() {
        if bullet.owner.is_player() {
            world.sound(AudioEvent::WallHit);
        }
        return Some(BulletEnd::OutOfBounds);
    }
    None
}

fn strike_walls(world: &mut World, bullet: &Bullet, rect: &Rect) -> Option<BulletEnd> {
    let wall_breaker = shooter_power(world, bullet.owner) >= WALL_BREAKER_POWER;
    let steel = world.arena.strike_steel(rect, wall_breaker);
    let brick = world.arena.strike_bricks(rect, bullet.direction, wall_breaker);
    if !steel.hit && !brick.hit {
        return None;
    }

    world.stats.bricks_destroyed += brick.bricks_destroyed;
    if bullet.owner.is_player() {
        if brick.bits_removed > 0 || steel.destroyed > 0 {
            world.sound(AudioEvent::WallDestroyed);
        } else {
            world.sound(AudioEvent::WallHit);
        }
    }
    Some(if steel.hit { BulletEnd::Steel } else { BulletEnd::Brick })
}

/// A player bullet against live enemies. Returns whether one was struck.
fn hit_enemy(world: &mut World, rng: &mut ChaCha8Rng, slot: PlayerSlot, rect: &Rect) -> bool {
    let Some(index) = world
        .enemies
        .iter()
        .position(|e| e.hull.alive && e.hull.physical_box().overlaps(rect))
    else {
        return false;
    };

    if world.enemies[index].carries_power_up {
        world.enemies[index].carries_power_up = false;
        power_up::spawn(world, rng, false);
    }

    let enemy = &mut world.enemies[index];
    if enemy.health > 1 {
        enemy.health -= 1;
        world.sound(AudioEvent::ArmorHit);
        return true;
    }

    enemy.health = 0;
    enemy.hull.alive = false;
    let archetype = enemy.archetype;
    let position = enemy.hull.position;
    world.emit(VisualEvent::Explosion { position, size: ExplosionSize::Big });
    world.sound(AudioEvent::EnemyDestroyed { archetype });
    scoring::record_kill(world, slot, archetype);
    true
}

/// An enemy bullet against live players. Returns whether one was struck.
fn hit_player(world: &mut World, rect: &Rect) -> bool {
    let Some(slot) = PlayerSlot::ALL.into_iter().find(|slot| {
        let hull = &world.player(*slot).hull;
        hull.alive && hull.physical_box().overlaps(rect)
    }) else {
        return false;
    };

    let player = world.player_mut(slot);
    if player.is_invulnerable() {
        return true;
    }
    if player.power_level >= SHIELD_POWER {
        player.power_level = SHIELD_FALLBACK_POWER;
        world.sound(AudioEvent::ArmorHit);
        return true;
    }

    player.hull.alive = false;
    player.hull.moving = false;
    player.can_shoot = false;
    player.respawn_timer = RESPAWN_DELAY_TICKS;
    player.lives = player.lives.saturating_sub(1);
    player.power_level = MIN_POWER_LEVEL;
    let position = player.hull.position;
    world.emit(VisualEvent::Explosion { position, size: ExplosionSize::Big });
    world.sound(AudioEvent::PlayerDestroyed { slot });
    true
}
