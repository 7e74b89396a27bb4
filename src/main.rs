//! Tile walker: streams terrain around an observer moving in a straight line.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    World config JSON (default: built-in defaults)
//!   --steps <N>        Frames to simulate (default: 600)
//!   --speed <UNITS>    Distance moved per frame (default: 2.5)
//!   --heading <DEG>    Walk direction in degrees from +X toward +Z (default: 30)

use std::path::PathBuf;
use std::process::ExitCode;

use glam::Vec3;

use tileworld::core::logging;
use tileworld::{TileManager, WorldConfig};

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_path_arg(&args, "--config");
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(600);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(2.5);
    let heading = parse_f32_arg(&args, "--heading").unwrap_or(30.0);

    let config = match config_path {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };

    let mut observer = Vec3::ZERO;
    let mut manager = match TileManager::with_terrain(&config, observer) {
        Ok(manager) => manager,
        Err(e) => {
            log::error!("Failed to start tile cache: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let size = manager.tile_size();
    println!("=== Tileworld Walker ===");
    println!("Tiles:   {} x {} units, view radius {}", size.x, size.y, config.streaming.view_radius);
    println!("Pool:    {} tiles", manager.tile_pool().capacity());
    println!("Walk:    {} steps at {} units, heading {} deg", steps, speed, heading);
    println!();

    let (sin, cos) = heading.to_radians().sin_cos();
    let step = Vec3::new(cos, 0.0, sin) * speed;

    let mut sweeps = 0;
    let mut created = 0;
    let mut retired = 0;
    let mut skipped = 0;
    for frame in 0..steps {
        observer += step;
        if let Some(stats) = manager.update(observer) {
            sweeps += 1;
            created += stats.created;
            retired += stats.retired;
            skipped += stats.skipped;
            println!(
                "frame {:5}  cell {:>4},{:<4}  +{:<2} -{:<2} reused {:<2} live {}",
                frame,
                manager.observer_cell().x,
                manager.observer_cell().z,
                stats.created,
                stats.retired,
                stats.reused,
                manager.live_count()
            );
        }
    }

    println!();
    println!("Sweeps:  {}", sweeps);
    println!("Tiles:   {} created, {} retired, {} skipped", created, retired, skipped);
    for id in manager.scatter_pools().ids() {
        if let Some(pool) = manager.scatter_pools().pool(id) {
            println!("Scatter: {:<10} {}/{} in use", id.as_str(), pool.in_use_count(), pool.capacity());
        }
    }

    ExitCode::SUCCESS
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}
