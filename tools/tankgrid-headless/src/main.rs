//! tankgrid-headless: run the simulation without a frontend.
//!
//! Usage:
//!   tankgrid-headless run --ticks 6000 --seed 7
//!   tankgrid-headless run --level stage.json --json > snapshots.jsonl
//!   tankgrid-headless check --level stage.json

use std::path::{Path, PathBuf};
use std::process;

use log::info;

use tankgrid_arena::LevelDefinition;
use tankgrid_core::commands::PlayerCommand;
use tankgrid_core::enums::GamePhase;
use tankgrid_core::state::GameStateSnapshot;
use tankgrid_sim::{SimConfig, SimulationEngine};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "tankgrid-headless: run tankgrid without a frontend\n\
         \n\
         Commands:\n\
         \n\
         run       Start a game and advance it for a number of ticks\n\
         \n\
           --config <path>    JSON engine config (seed, autopilot, lives)\n\
           --level <path>     Level JSON file (can specify multiple, in order)\n\
           --ticks <N>        Ticks to simulate (default: 3600)\n\
           --seed <N>         Override the config seed\n\
           --no-autopilot     Leave the autopilot tank idle\n\
           --json             Print one snapshot per line instead of a summary\n\
         \n\
         check     Load level files and report what they contain\n\
         \n\
           --level <path>     Level JSON file (can specify multiple)\n\
         \n\
         Examples:\n\
         \n\
           tankgrid-headless run --ticks 6000 --seed 7\n\
           tankgrid-headless check --level levels/stage4.json\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let raw = parse_value(args, flag)?;
    match raw.parse::<T>() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got '{raw}'");
            process::exit(1);
        }
    }
}

fn parse_level_paths(args: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for i in 0..args.len() {
        if args[i] == "--level" && i + 1 < args.len() {
            paths.push(PathBuf::from(&args[i + 1]));
        }
    }
    paths
}

fn load_levels(paths: &[PathBuf]) -> Vec<LevelDefinition> {
    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        match LevelDefinition::load(path) {
            Ok(level) => levels.push(level),
            Err(e) => {
                eprintln!("Error loading level {}: {e}", path.display());
                process::exit(1);
            }
        }
    }
    levels
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let mut config = match parse_value(args, "--config") {
        Some(path) => match SimConfig::load(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_number::<u64>(args, "--seed") {
        config.seed = seed;
    }
    if args.iter().any(|a| a == "--no-autopilot") {
        config.autopilot = false;
    }
    let ticks = parse_number::<u64>(args, "--ticks").unwrap_or(3600);
    let json = args.iter().any(|a| a == "--json");

    let level_paths = parse_level_paths(args);
    let mut engine = if level_paths.is_empty() {
        SimulationEngine::new(config)
    } else {
        SimulationEngine::with_campaign(config, load_levels(&level_paths))
    };

    info!(
        "running {} ticks over {} level(s), seed {}",
        ticks,
        engine.campaign_len(),
        engine.config().seed
    );
    engine.queue_command(PlayerCommand::StartGame);

    let mut last = engine.tick();
    for _ in 1..ticks {
        if json {
            print_json(&last);
        }
        if last.phase == GamePhase::GameOver {
            break;
        }
        last = engine.tick();
    }

    if json {
        print_json(&last);
    } else {
        print_summary(&last);
    }
}

fn print_json(snapshot: &GameStateSnapshot) {
    match serde_json::to_string(snapshot) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("Error serializing snapshot: {e}");
            process::exit(1);
        }
    }
}

fn print_summary(snapshot: &GameStateSnapshot) {
    println!("tick:          {}", snapshot.time.tick);
    println!("phase:         {:?}", snapshot.phase);
    println!(
        "level:         {} '{}' ({}/{} spawned, {} on field)",
        snapshot.level.index,
        snapshot.level.name,
        snapshot.level.enemies_spawned,
        snapshot.level.enemies_total,
        snapshot.enemies.len()
    );
    println!("base:          {}", if snapshot.base.alive { "standing" } else { "destroyed" });
    for player in &snapshot.players {
        println!(
            "{:<14} score {:>6}  lives {}  power {}{}",
            format!("{:?}:", player.slot),
            player.score,
            player.lives,
            player.power_level,
            if player.alive { "" } else { "  (down)" }
        );
    }
    let stats = &snapshot.autopilot.stats;
    println!(
        "autopilot:     {} kills, {} dodges, {} bullets shot down, {} bricks",
        stats.enemies_killed, stats.bullets_dodged, stats.bullets_destroyed, stats.bricks_destroyed
    );
    println!(
        "strategy:      {:?} / {} (danger {:?})",
        snapshot.autopilot.strategy, snapshot.autopilot.action, snapshot.autopilot.danger
    );
}

// --- Check command ---

fn cmd_check(args: &[String]) {
    let paths = parse_level_paths(args);
    if paths.is_empty() {
        eprintln!("Error: --level <path> is required");
        process::exit(1);
    }

    for (path, level) in paths.iter().zip(load_levels(&paths)) {
        let arena = level.build_arena();
        let p = &level.parameters;
        println!(
            "{}: '{}' {} enemies (max {} at once), spawn every {} ticks, fire every {} ticks, {} bricks",
            path.display(),
            level.name,
            p.enemy_count,
            p.max_concurrent,
            p.enemy_spawn_rate,
            p.enemy_fire_rate,
            arena.brick_count()
        );
    }
}
