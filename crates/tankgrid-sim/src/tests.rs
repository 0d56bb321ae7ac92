//! Tests for the simulation engine, ballistics, movement, power-ups and
//! level progression.

use glam::{DVec2, IVec2};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankgrid_arena::{LevelDefinition, LevelParameters, Tile};
use tankgrid_core::commands::PlayerCommand;
use tankgrid_core::components::{Bullet, Fortification, Hull, PowerUp, Quadrants};
use tankgrid_core::constants::*;
use tankgrid_core::enums::*;
use tankgrid_core::events::{AudioEvent, VisualEvent};
use tankgrid_core::input::InputIntent;
use tankgrid_core::types::Direction;

use crate::engine::{SimConfig, SimulationEngine};
use crate::scenario;
use crate::systems::enemy_spawner::{self, Spawner};
use crate::systems::{ballistics, enemies, fortification, movement, power_up};
use crate::world::World;
use crate::world_setup;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

/// Put `slot` alive at `(x, y)`, unshielded.
fn place_player(world: &mut World, slot: PlayerSlot, x: f64, y: f64, facing: Direction) {
    let player = world.player_mut(slot);
    player.hull = Hull::new(DVec2::new(x, y), facing);
    player.invulnerable_timer = 0;
}

fn add_bullet(world: &mut World, x: f64, y: f64, direction: Direction, owner: Shooter) -> u32 {
    let id = world.next_bullet_id();
    world.bullets.push(Bullet {
        id,
        position: DVec2::new(x, y),
        direction,
        speed: BULLET_SPEED,
        owner,
    });
    id
}

fn add_enemy(world: &mut World, archetype: EnemyArchetype, x: f64, y: f64, facing: Direction) -> usize {
    let id = world.next_enemy_id();
    world
        .enemies
        .push(world_setup::build_enemy(id, archetype, Hull::new(DVec2::new(x, y), facing)));
    world.enemies.len() - 1
}

fn bursts(world: &World) -> Vec<BulletEnd> {
    world
        .visual_events
        .iter()
        .filter_map(|e| match e {
            VisualEvent::BulletBurst { cause, .. } => Some(*cause),
            _ => None,
        })
        .collect()
}

fn count_audio(world: &World, wanted: &AudioEvent) -> usize {
    world.audio_events.iter().filter(|e| *e == wanted).count()
}

fn started_engine(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    engine
}

fn small_level(name: &str, enemy_count: u32) -> LevelDefinition {
    LevelDefinition {
        name: name.to_string(),
        parameters: LevelParameters {
            enemy_count,
            max_concurrent: 1,
            ..Default::default()
        },
        tiles: Vec::new(),
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    // Enemy headings and archetypes come off the RNG once spawning starts.
    let mut diverged = false;
    for _ in 0..1000 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce different games");
}

// ---- Engine lifecycle ----

#[test]
fn test_engine_idle_until_started() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Idle);
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_start_game_loads_first_level() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.level.index, 0);
    assert_eq!(snap.level.name, "Stage 1");
    assert_eq!(snap.level.enemies_in_reserve, 20);
    assert!(snap.audio_events.contains(&AudioEvent::LevelStarted { index: 0 }));
    assert!(snap.players.iter().all(|p| !p.alive));
    let spawn_cues = snap
        .visual_events
        .iter()
        .filter(|e| matches!(e, VisualEvent::SpawnAnimation { .. }))
        .count();
    assert_eq!(spawn_cues, 2, "both players announce their spawn");
    assert!(!snap.walls.is_empty());
}

#[test]
fn test_players_appear_after_level_start_delay() {
    let mut engine = started_engine(SimConfig {
        autopilot: false,
        ..Default::default()
    });
    for _ in 1..(LEVEL_START_RESPAWN_TICKS - 1) {
        engine.tick();
    }
    assert!(engine.world().players.iter().all(|p| !p.hull.alive));

    let snap = engine.tick();
    assert!(snap.players.iter().all(|p| p.alive && p.invulnerable));
    assert_eq!(snap.players[PlayerSlot::Human.index()].position, DVec2::new(8.0, 24.0));
    assert_eq!(snap.players[PlayerSlot::Autopilot.index()].position, DVec2::new(16.0, 24.0));
}

#[test]
fn test_pause_and_resume() {
    let mut engine = started_engine(SimConfig::default());
    let before = engine.time().tick;

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    assert_eq!(engine.time().tick, before);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, before + 1);
}

#[test]
fn test_pause_key_toggles_on_press_only() {
    let mut engine = started_engine(SimConfig::default());
    let held = InputIntent {
        pause: true,
        ..Default::default()
    };

    engine.queue_command(PlayerCommand::SetInput {
        slot: PlayerSlot::Human,
        intent: held,
    });
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Paused);

    // Still held: no second toggle.
    engine.queue_command(PlayerCommand::SetInput {
        slot: PlayerSlot::Human,
        intent: held,
    });
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_commands([
        PlayerCommand::SetInput {
            slot: PlayerSlot::Human,
            intent: InputIntent::default(),
        },
        PlayerCommand::SetInput {
            slot: PlayerSlot::Human,
            intent: held,
        },
    ]);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_load_level_wraps_campaign() {
    let mut engine = started_engine(SimConfig::default());
    assert_eq!(engine.campaign_len(), 3);
    engine.queue_command(PlayerCommand::LoadLevel { index: 4 });
    let snap = engine.tick();
    assert_eq!(snap.level.index, 1);
    assert_eq!(snap.level.name, "Stage 2");
}

#[test]
fn test_disabling_autopilot_shows_in_snapshot() {
    let mut engine = started_engine(SimConfig::default());
    engine.queue_command(PlayerCommand::SetAutopilot { enabled: false });
    let snap = engine.tick();
    assert!(!snap.autopilot.enabled);
    assert!(!engine.autopilot().enabled);
}

// ---- Level progression ----

#[test]
fn test_stage_clear_loads_next_level() {
    let config = SimConfig {
        autopilot: false,
        stage_clear_delay_ticks: 10,
        ..Default::default()
    };
    let campaign = vec![small_level("first", 1), small_level("second", 1)];
    let mut engine = SimulationEngine::with_campaign(config, campaign);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();

    engine.world_mut().spawner.spawned = 1;
    engine.world_mut().player_mut(PlayerSlot::Human).score = 500;
    engine.world_mut().player_mut(PlayerSlot::Human).power_level = 3;
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::StageClear);
    assert!(snap.audio_events.contains(&AudioEvent::StageClear));

    for _ in 0..9 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::StageClear);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.level.index, 1);
    assert_eq!(snap.level.name, "second");

    let human = engine.world().player(PlayerSlot::Human);
    assert_eq!(human.score, 500);
    assert_eq!(human.power_level, 3);
    assert!(!human.hull.alive);
    assert_eq!(human.respawn_timer, LEVEL_START_RESPAWN_TICKS);
}

#[test]
fn test_level_load_resets_field() {
    let mut engine = started_engine(SimConfig::default());
    {
        let world = engine.world_mut();
        add_bullet(world, 5.0, 5.0, Direction::Up, Shooter::Enemy);
        add_enemy(world, EnemyArchetype::Basic, 4.0, 4.0, Direction::Down);
        world.power_up = Some(PowerUp {
            kind: PowerUpKind::Star,
            cell: IVec2::new(4, 8),
        });
        world.frozen_ticks = 100;
        fortification::start(world);
    }
    engine.queue_command(PlayerCommand::LoadLevel { index: 0 });
    engine.tick();

    let world = engine.world();
    assert!(world.bullets.is_empty());
    assert!(world.enemies.is_empty());
    assert!(world.power_up.is_none());
    assert_eq!(world.frozen_ticks, 0);
    assert_eq!(world.fortification, Fortification::Idle);
    assert_eq!(world.arena.tile(IVec2::new(11, 23)), Tile::Brick(Quadrants::FULL));
}

#[test]
fn test_base_destroyed_ends_game() {
    let mut engine = started_engine(SimConfig::default());
    add_bullet(engine.world_mut(), 12.85, 24.1, Direction::Down, Shooter::Enemy);

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(!snap.base.alive);
    assert!(snap.audio_events.contains(&AudioEvent::BaseDestroyed));
    assert!(snap.audio_events.contains(&AudioEvent::GameOver));

    // Nothing advances once the game is over.
    let tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick);
}

#[test]
fn test_both_players_out_of_lives_ends_game() {
    let mut engine = started_engine(SimConfig {
        autopilot: false,
        ..Default::default()
    });
    for player in engine.world_mut().players.iter_mut() {
        player.lives = 0;
        player.respawn_timer = 1;
    }
    let snap = engine.tick();
    assert!(engine.world().players.iter().all(|p| p.eliminated));
    assert_eq!(snap.phase, GamePhase::GameOver);
}

#[test]
fn test_start_game_after_game_over_restarts() {
    let mut engine = started_engine(SimConfig::default());
    engine.world_mut().arena.base.alive = false;
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::GameOver);

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.base.alive);
    assert_eq!(snap.time.tick, 1);
    assert!(snap.autopilot.enabled);
}

// ---- Ballistics ----

#[test]
fn test_base_hit_once_and_bullet_removed() {
    let mut world = World::default();
    let mut rng = rng();
    add_bullet(&mut world, 12.85, 23.5, Direction::Down, Shooter::Enemy);

    ballistics::run(&mut world, &mut rng);
    assert!(!world.arena.base.alive);
    assert!(world.bullets.is_empty());
    assert_eq!(bursts(&world), vec![BulletEnd::Base]);
    assert_eq!(count_audio(&world, &AudioEvent::BaseDestroyed), 1);

    ballistics::run(&mut world, &mut rng);
    assert_eq!(count_audio(&world, &AudioEvent::BaseDestroyed), 1);
}

#[test]
fn test_shielded_player_drops_to_power_three() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 8.0, 10.0, Direction::Up);
    world.player_mut(PlayerSlot::Human).power_level = SHIELD_POWER;
    add_bullet(&mut world, 7.5, 10.8, Direction::Right, Shooter::Enemy);

    ballistics::run(&mut world, &mut rng());
    let human = world.player(PlayerSlot::Human);
    assert!(human.hull.alive);
    assert_eq!(human.power_level, SHIELD_FALLBACK_POWER);
    assert_eq!(human.lives, DEFAULT_LIVES);
    assert!(world.bullets.is_empty());
    assert_eq!(count_audio(&world, &AudioEvent::ArmorHit), 1);
}

#[test]
fn test_unshielded_player_loses_a_life() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 8.0, 10.0, Direction::Up);
    world.player_mut(PlayerSlot::Human).power_level = 3;
    add_bullet(&mut world, 7.5, 10.8, Direction::Right, Shooter::Enemy);

    ballistics::run(&mut world, &mut rng());
    let human = world.player(PlayerSlot::Human);
    assert!(!human.hull.alive);
    assert!(!human.can_shoot);
    assert_eq!(human.lives, DEFAULT_LIVES - 1);
    assert_eq!(human.power_level, MIN_POWER_LEVEL);
    assert_eq!(human.respawn_timer, RESPAWN_DELAY_TICKS);
    assert_eq!(bursts(&world), vec![BulletEnd::Tank]);
}

#[test]
fn test_invulnerable_player_absorbs_hit() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 8.0, 10.0, Direction::Up);
    world.player_mut(PlayerSlot::Human).invulnerable_timer = 50;
    add_bullet(&mut world, 7.5, 10.8, Direction::Right, Shooter::Enemy);

    ballistics::run(&mut world, &mut rng());
    assert!(world.player(PlayerSlot::Human).hull.alive);
    assert_eq!(world.player(PlayerSlot::Human).lives, DEFAULT_LIVES);
    assert!(world.bullets.is_empty());
}

#[test]
fn test_brick_hit_erases_entry_side_and_restarts_cooldown() {
    let mut world = World::default();
    world.arena.set_tile(IVec2::new(10, 10), Tile::Brick(Quadrants::FULL));
    world.player_mut(PlayerSlot::Human).bullet_cooldown = 5;
    add_bullet(&mut world, 9.6, 10.1, Direction::Right, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert_eq!(
        world.arena.tile(IVec2::new(10, 10)),
        Tile::Brick(Quadrants::from_bits(Quadrants::TOP_RIGHT | Quadrants::BOTTOM_RIGHT))
    );
    assert!(world.bullets.is_empty());
    assert_eq!(world.player(PlayerSlot::Human).bullet_cooldown, BULLET_COOLDOWN);
    assert_eq!(bursts(&world), vec![BulletEnd::Brick]);
    assert_eq!(count_audio(&world, &AudioEvent::WallDestroyed), 1);
}

#[test]
fn test_wall_breaker_clears_steel_and_brick_together() {
    let mut world = World::default();
    world.arena.set_tile(IVec2::new(10, 10), Tile::Steel);
    world.arena.set_tile(IVec2::new(10, 11), Tile::Brick(Quadrants::FULL));
    world.player_mut(PlayerSlot::Human).power_level = WALL_BREAKER_POWER;
    add_bullet(&mut world, 9.6, 10.85, Direction::Right, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert_eq!(world.arena.tile(IVec2::new(10, 10)), Tile::Empty);
    assert_eq!(world.arena.tile(IVec2::new(10, 11)), Tile::Empty);
    assert_eq!(world.stats.bricks_destroyed, 1);
    assert_eq!(bursts(&world), vec![BulletEnd::Steel]);
}

#[test]
fn test_steel_stops_ordinary_bullet() {
    let mut world = World::default();
    world.arena.set_tile(IVec2::new(10, 10), Tile::Steel);
    add_bullet(&mut world, 9.6, 10.1, Direction::Right, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert_eq!(world.arena.tile(IVec2::new(10, 10)), Tile::Steel);
    assert!(world.bullets.is_empty());
    assert_eq!(count_audio(&world, &AudioEvent::WallHit), 1);
}

#[test]
fn test_opposing_bullets_destroy_each_other() {
    let mut world = World::default();
    add_bullet(&mut world, 10.0, 10.0, Direction::Right, Shooter::Player(PlayerSlot::Autopilot));
    add_bullet(&mut world, 10.6, 10.0, Direction::Left, Shooter::Enemy);

    ballistics::run(&mut world, &mut rng());
    assert!(world.bullets.is_empty());
    assert_eq!(bursts(&world), vec![BulletEnd::Bullet, BulletEnd::Bullet]);
    assert_eq!(world.stats.bullets_destroyed, 1);
    assert_eq!(world.player(PlayerSlot::Autopilot).bullet_cooldown, BULLET_COOLDOWN);
}

#[test]
fn test_same_side_bullets_pass_through() {
    let mut world = World::default();
    add_bullet(&mut world, 10.0, 10.0, Direction::Right, Shooter::Player(PlayerSlot::Autopilot));
    add_bullet(&mut world, 10.6, 10.0, Direction::Left, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert_eq!(world.bullets.len(), 2);
    assert!(bursts(&world).is_empty());
}

#[test]
fn test_bullet_leaving_arena_bursts_at_edge() {
    let mut world = World::default();
    add_bullet(&mut world, 0.2, 5.0, Direction::Left, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert!(world.bullets.is_empty());
    match world.visual_events.as_slice() {
        [VisualEvent::BulletBurst { position, cause }] => {
            assert_eq!(*cause, BulletEnd::OutOfBounds);
            assert_eq!(position.x, 0.0);
        }
        other => panic!("expected one burst, got {other:?}"),
    }
}

#[test]
fn test_fast_gun_cooldown_restarts_after_bullet_leaves() {
    let mut world = World::default();
    world.player_mut(PlayerSlot::Human).power_level = MULTI_BULLET_POWER;
    add_bullet(&mut world, 0.2, 5.0, Direction::Left, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert!(world.bullets.is_empty());
    assert_eq!(bursts(&world), vec![BulletEnd::OutOfBounds]);
    assert_eq!(world.player(PlayerSlot::Human).bullet_cooldown, FAST_BULLET_COOLDOWN);

    // Not ready on the next tick either.
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Human).is_none());
}

#[test]
fn test_armored_enemy_absorbs_hits() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Armored, 10.0, 5.0, Direction::Down);
    add_bullet(&mut world, 9.6, 5.5, Direction::Right, Shooter::Player(PlayerSlot::Autopilot));

    ballistics::run(&mut world, &mut rng());
    let enemy = &world.enemies[index];
    assert!(enemy.hull.alive);
    assert_eq!(enemy.health, ARMORED_ENEMY_HEALTH - 1);
    assert_eq!(count_audio(&world, &AudioEvent::ArmorHit), 1);
    assert_eq!(world.player(PlayerSlot::Autopilot).score, 0);
}

#[test]
fn test_destroyed_enemy_scores_for_shooter() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Fast, 10.0, 5.0, Direction::Down);
    add_bullet(&mut world, 9.6, 5.5, Direction::Right, Shooter::Player(PlayerSlot::Autopilot));

    ballistics::run(&mut world, &mut rng());
    assert!(!world.enemies[index].hull.alive);
    assert_eq!(world.player(PlayerSlot::Autopilot).score, 200);
    assert_eq!(world.stats.enemies_killed, 1);
    assert!(world.audio_events.contains(&AudioEvent::EnemyDestroyed {
        archetype: EnemyArchetype::Fast
    }));
}

#[test]
fn test_carrier_drops_power_up_when_hit() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Armored, 10.0, 5.0, Direction::Down);
    world.enemies[index].carries_power_up = true;
    add_bullet(&mut world, 9.6, 5.5, Direction::Right, Shooter::Player(PlayerSlot::Human));

    ballistics::run(&mut world, &mut rng());
    assert!(world.power_up.is_some());
    assert!(!world.enemies[index].carries_power_up);
    assert!(world.enemies[index].hull.alive);
}

#[test]
fn test_player_fire_is_gated() {
    let mut world = World::default();
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Human).is_some());
    assert_eq!(world.player(PlayerSlot::Human).bullet_cooldown, BULLET_COOLDOWN);
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Human).is_none());

    // Cooled down, but one bullet is the cap at power 1.
    world.player_mut(PlayerSlot::Human).bullet_cooldown = 0;
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Human).is_none());

    world.player_mut(PlayerSlot::Human).power_level = MULTI_BULLET_POWER;
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Human).is_some());

    world.player_mut(PlayerSlot::Autopilot).can_shoot = false;
    assert!(ballistics::fire_player(&mut world, PlayerSlot::Autopilot).is_none());
    assert_eq!(
        count_audio(&world, &AudioEvent::ShotFired {
            slot: PlayerSlot::Human
        }),
        2
    );
}

#[test]
fn test_enemy_bullet_uses_archetype_speed() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Power, 10.0, 5.0, Direction::Down);
    ballistics::fire_enemy(&mut world, index);
    assert_eq!(world.bullets[0].speed, FAST_BULLET_SPEED);
    assert_eq!(world.bullets[0].owner, Shooter::Enemy);
    assert_eq!(world.bullets[0].direction, Direction::Down);
}

// ---- Movement ----

#[test]
fn test_player_drives_and_stops() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 10.0, 10.0, Direction::Right);
    movement::drive_player(&mut world, PlayerSlot::Human, Some(Direction::Right), 1);
    let hull = &world.player(PlayerSlot::Human).hull;
    assert_eq!(hull.position, DVec2::new(10.0 + PLAYER_SPEED / CELL_SIZE, 10.0));
    assert!(hull.moving);

    movement::drive_player(&mut world, PlayerSlot::Human, None, 2);
    assert!(!world.player(PlayerSlot::Human).hull.moving);
}

#[test]
fn test_axis_change_snaps_to_grid() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 10.4, 10.0, Direction::Right);
    movement::drive_player(&mut world, PlayerSlot::Human, Some(Direction::Up), 5);
    let hull = &world.player(PlayerSlot::Human).hull;
    assert_eq!(hull.position.x, 10.0);
    assert!(hull.position.y < 10.0);
    assert_eq!(hull.facing, Direction::Up);
    assert_eq!(hull.last_turn_tick, 5);
    assert!(!hull.needs_alignment);
}

#[test]
fn test_live_tank_blocks_dead_tank_does_not() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 10.0, 10.0, Direction::Right);
    let index = add_enemy(&mut world, EnemyArchetype::Basic, 12.0, 10.0, Direction::Left);

    movement::drive_player(&mut world, PlayerSlot::Human, Some(Direction::Right), 1);
    assert_eq!(world.player(PlayerSlot::Human).hull.position, DVec2::new(10.0, 10.0));

    world.enemies[index].hull.alive = false;
    movement::drive_player(&mut world, PlayerSlot::Human, Some(Direction::Right), 2);
    assert!(world.player(PlayerSlot::Human).hull.position.x > 10.0);
}

#[test]
fn test_enemy_redirects_when_player_in_the_way() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 12.0, 10.0, Direction::Up);
    let index = add_enemy(&mut world, EnemyArchetype::Basic, 10.0, 10.0, Direction::Right);
    world.enemies[index].stuck_timer = 20;

    enemies::run(&mut world, &mut rng(), 100);
    let enemy = &world.enemies[index];
    assert_eq!(enemy.hull.position, DVec2::new(10.0, 10.0));
    assert_eq!(enemy.stuck_timer, 0);
}

#[test]
fn test_frozen_enemies_stand_still() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Fast, 10.0, 10.0, Direction::Down);
    world.enemies[index].fire_timer = 1;
    world.frozen_ticks = 10;

    enemies::run(&mut world, &mut rng(), 100);
    assert_eq!(world.enemies[index].hull.position, DVec2::new(10.0, 10.0));
    assert!(world.bullets.is_empty());
}

#[test]
fn test_wrecked_enemies_are_cleared() {
    let mut world = World::default();
    let index = add_enemy(&mut world, EnemyArchetype::Basic, 10.0, 10.0, Direction::Down);
    world.enemies[index].hull.alive = false;
    enemies::run(&mut world, &mut rng(), 1);
    assert!(world.enemies.is_empty());
}

proptest! {
    #[test]
    fn prop_physical_box_stays_in_bounds(moves in proptest::collection::vec(0usize..5, 1..300)) {
        let mut world = World::default();
        world.arena = scenario::builtin_campaign()[0].build_arena();
        place_player(&mut world, PlayerSlot::Human, 8.0, 24.0, Direction::Up);

        for (tick, m) in moves.into_iter().enumerate() {
            let direction = (m < 4).then(|| Direction::from_index(m));
            movement::drive_player(&mut world, PlayerSlot::Human, direction, tick as u64);
            let hull = &world.player(PlayerSlot::Human).hull;
            let max = GRID_SIZE - 2;
            prop_assert!(hull.physical.x >= 0 && hull.physical.x <= max);
            prop_assert!(hull.physical.y >= 0 && hull.physical.y <= max);
            prop_assert_eq!(hull.physical, hull.position.round().as_ivec2());
            prop_assert!(!world.arena.blocks_tank_at(hull.physical.as_dvec2()));
        }
    }
}

// ---- Spawner ----

#[test]
fn test_spawner_paces_first_enemy() {
    let mut world = World::default();
    let mut rng = rng();

    for tick in 0..(ENEMY_INITIAL_SPAWN_COOLDOWN - 1) {
        enemy_spawner::run(&mut world, &mut rng, tick as u64);
    }
    assert!(world.enemies.is_empty());
    assert_eq!(
        world
            .visual_events
            .iter()
            .filter(|e| matches!(e, VisualEvent::SpawnAnimation { .. }))
            .count(),
        1
    );

    enemy_spawner::run(&mut world, &mut rng, 120);
    assert_eq!(world.enemies.len(), 1);
    assert_eq!(world.enemies[0].hull.position, DVec2::new(0.0, 0.0));
    assert_eq!(world.enemies[0].fire_timer, world.level.parameters.enemy_fire_rate as i32);
    assert_eq!(world.spawner.next_spawn_point(), DVec2::new(12.0, 0.0));
    assert_eq!(world.spawner.cooldown, world.level.parameters.enemy_spawn_rate);
}

#[test]
fn test_spawner_respects_concurrency_cap() {
    let mut world = World::default();
    world.level.parameters.max_concurrent = 1;
    world.spawner.cooldown = 1;
    let mut rng = rng();

    enemy_spawner::run(&mut world, &mut rng, 0);
    assert_eq!(world.enemies.len(), 1);
    world.spawner.cooldown = 1;
    enemy_spawner::run(&mut world, &mut rng, 1);
    assert_eq!(world.enemies.len(), 1);
}

#[test]
fn test_carrier_schedule() {
    assert!(Spawner::is_carrier(6, 20));
    assert!(Spawner::is_carrier(12, 20));
    assert!(!Spawner::is_carrier(5, 20));
    assert!(!Spawner::is_carrier(6, 6));
}

#[test]
fn test_archetype_roll_follows_weights() {
    let mut rng = rng();
    for _ in 0..50 {
        assert_eq!(
            enemy_spawner::roll_archetype(&mut rng, &[0.0, 0.0, 1.0, 0.0]),
            EnemyArchetype::Power
        );
    }
}

// ---- Power-ups ----

#[test]
fn test_star_caps_at_four_and_keeps_five() {
    let mut world = World::default();
    world.player_mut(PlayerSlot::Human).power_level = 3;
    power_up::apply(&mut world, PlayerSlot::Human, PowerUpKind::Star, 0);
    assert_eq!(world.player(PlayerSlot::Human).power_level, 4);
    power_up::apply(&mut world, PlayerSlot::Human, PowerUpKind::Star, 0);
    assert_eq!(world.player(PlayerSlot::Human).power_level, 4);

    world.player_mut(PlayerSlot::Human).power_level = 5;
    power_up::apply(&mut world, PlayerSlot::Human, PowerUpKind::Star, 0);
    assert_eq!(world.player(PlayerSlot::Human).power_level, 5);
}

#[test]
fn test_timed_and_instant_effects() {
    let mut world = World::default();
    power_up::apply(&mut world, PlayerSlot::Autopilot, PowerUpKind::Gun, 0);
    assert_eq!(world.player(PlayerSlot::Autopilot).power_level, MAX_POWER_LEVEL);

    power_up::apply(&mut world, PlayerSlot::Autopilot, PowerUpKind::Helmet, 0);
    assert_eq!(world.player(PlayerSlot::Autopilot).invulnerable_timer, HELMET_INVULNERABLE_TICKS);

    power_up::apply(&mut world, PlayerSlot::Autopilot, PowerUpKind::Clock, 0);
    assert_eq!(world.frozen_ticks, CLOCK_FREEZE_TICKS);

    power_up::apply(&mut world, PlayerSlot::Autopilot, PowerUpKind::ExtraLife, 0);
    assert_eq!(world.player(PlayerSlot::Autopilot).lives, DEFAULT_LIVES + 1);

    power_up::apply(&mut world, PlayerSlot::Autopilot, PowerUpKind::Shovel, 0);
    assert_eq!(world.fortification, Fortification::Fortifying { remaining: FORTIFY_TICKS });
}

#[test]
fn test_bomb_destroys_enemies_without_score() {
    let mut world = World::default();
    add_enemy(&mut world, EnemyArchetype::Basic, 2.0, 2.0, Direction::Down);
    add_enemy(&mut world, EnemyArchetype::Armored, 20.0, 2.0, Direction::Down);

    power_up::apply(&mut world, PlayerSlot::Human, PowerUpKind::Bomb, 0);
    assert_eq!(world.alive_enemy_count(), 0);
    assert_eq!(world.player(PlayerSlot::Human).score, 0);
    let explosions = world
        .visual_events
        .iter()
        .filter(|e| matches!(e, VisualEvent::Explosion { .. }))
        .count();
    assert_eq!(explosions, 2);
}

#[test]
fn test_pickup_prefers_autopilot_tank() {
    let mut world = World::default();
    place_player(&mut world, PlayerSlot::Human, 16.0, 20.5, Direction::Down);
    world.power_up = Some(PowerUp {
        kind: PowerUpKind::Helmet,
        cell: IVec2::new(16, 22),
    });
    // Both tanks touch the power-up.
    place_player(&mut world, PlayerSlot::Autopilot, 16.0, 23.0, Direction::Up);

    power_up::run(&mut world, 10);
    assert!(world.power_up.is_none());
    assert!(world.audio_events.contains(&AudioEvent::PowerUpConsumed {
        kind: PowerUpKind::Helmet,
        slot: PlayerSlot::Autopilot
    }));
}

#[test]
fn test_validated_spawn_lands_on_open_ground() {
    let mut world = World::default();
    let mut rng = rng();
    for _ in 0..20 {
        let spawned = power_up::spawn(&mut world, &mut rng, true);
        assert!((POWER_UP_X_RANGE.0..=POWER_UP_X_RANGE.1).contains(&spawned.cell.x));
        assert!((POWER_UP_Y_RANGE.0..=POWER_UP_Y_RANGE.1).contains(&spawned.cell.y));
        assert_eq!(world.power_up, Some(spawned));
    }
}

#[test]
fn test_validated_spawn_falls_back_when_no_room() {
    let mut world = World::default();
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            world.arena.set_tile(IVec2::new(x, y), Tile::Steel);
        }
    }
    power_up::spawn(&mut world, &mut rng(), true);
    assert!(world.power_up.is_some());
}

// ---- Fortification ----

#[test]
fn test_fortification_cycle_restores_full_bricks() {
    let mut world = World::default();
    world
        .arena
        .set_tile(IVec2::new(11, 23), Tile::Brick(Quadrants::from_bits(Quadrants::TOP_RIGHT)));
    world.arena.set_tile(IVec2::new(14, 24), Tile::Empty);

    fortification::start(&mut world);
    assert_eq!(world.arena.tile(IVec2::new(11, 23)), Tile::Steel);

    let mut saw_alternating = false;
    let mut ticks = 0;
    while world.fortification.is_active() && ticks < 5000 {
        fortification::advance(&mut world);
        saw_alternating |= matches!(world.fortification, Fortification::Alternating { .. });
        ticks += 1;
    }
    assert!(saw_alternating);
    assert_eq!(world.fortification, Fortification::Idle);
    assert!(ticks > FORTIFY_TICKS);
    for (x, y) in FORTIFICATION_RING {
        assert_eq!(world.arena.tile(IVec2::new(x, y)), Tile::Brick(Quadrants::FULL));
    }
}

#[test]
fn test_fortification_restart_cancels_running_cycle() {
    let mut world = World::default();
    fortification::start(&mut world);
    for _ in 0..(FORTIFY_TICKS + 10) {
        fortification::advance(&mut world);
    }
    assert!(matches!(world.fortification, Fortification::Alternating { .. }));

    fortification::start(&mut world);
    assert_eq!(world.fortification, Fortification::Fortifying { remaining: FORTIFY_TICKS });
    assert_eq!(world.arena.tile(IVec2::new(14, 25)), Tile::Steel);
}

// ---- Scenarios and config ----

#[test]
fn test_builtin_campaign_decodes() {
    let campaign = scenario::builtin_campaign();
    assert_eq!(campaign.len(), 3);
    for level in &campaign {
        let arena = level.build_arena();
        assert!(arena.base.alive);
        for slot in PlayerSlot::ALL {
            let spawn = tankgrid_core::components::PlayerTank::spawn_point(slot);
            assert!(!arena.blocks_tank_at(spawn), "{}: {:?} spawn blocked", level.name, slot);
        }
        for (x, y) in ENEMY_SPAWN_POINTS {
            assert!(!arena.blocks_tank_at(DVec2::new(x, y)), "{}: enemy spawn blocked", level.name);
        }
    }
}

#[test]
fn test_config_defaults_and_errors() {
    let config = SimConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert!(config.autopilot);
    assert_eq!(config.starting_lives, DEFAULT_LIVES);

    assert!(matches!(
        SimConfig::from_json_str(r#"{ "starting_lives": 0 }"#),
        Err(crate::ConfigError::Invalid(_))
    ));
    assert!(matches!(
        SimConfig::from_json_str("not json"),
        Err(crate::ConfigError::Json(_))
    ));
}

#[test]
fn test_autopilot_game_runs_clean() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 9,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame);
    engine.queue_command(PlayerCommand::SpawnPowerUp);

    for _ in 0..3000 {
        let snap = engine.tick();
        for player in &snap.players {
            assert!(player.physical.x >= 0 && player.physical.x <= GRID_SIZE - 2);
            assert!(player.physical.y >= 0 && player.physical.y <= GRID_SIZE - 2);
        }
        assert!(snap.bullets.iter().all(|b| b.position.x > -1.0 && b.position.x < GRID_SIZE as f64 + 1.0));
        if snap.phase == GamePhase::GameOver {
            break;
        }
    }
    assert!(engine.time().tick > 0);
}
