//! Weedfield - headless mowing demo
//!
//! Usage: cargo run --release -- [--config sim.json] [--seed 42] [--frames 3600]

use std::path::PathBuf;

use weedfield::core::{logging, types::Vec2};
use weedfield::mower::Cutter;
use weedfield::sim::{SimConfig, Simulation};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 60 * 60;

fn main() {
    logging::init();
    log::info!("Weedfield starting...");

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_config_arg(&args) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_value_arg::<u64>(&args, "--seed") {
        config.field.seed = seed;
    }
    let frames = parse_value_arg::<u64>(&args, "--frames").unwrap_or(DEFAULT_FRAMES);

    let mut sim = match Simulation::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build field: {}", e);
            std::process::exit(1);
        }
    };

    let half = config.field.half_width();
    let created = sim.field().live_count();
    log::info!("Mowing {} weeds for {} frames", created, frames);

    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;
        let report = sim.step(spiral(t, half), FRAME_DT);

        if !report.bonuses.is_empty() {
            log::info!(
                "Frame {}: bonus x{}, cut radius {:.2}",
                frame,
                report.bonuses.len(),
                sim.mower().cut_radius()
            );
        }
        if frame % 600 == 0 {
            log::info!(
                "Frame {}: {} / {} weeds left, mower at {}",
                frame,
                sim.field().live_count(),
                created,
                sim.mower().position()
            );
        }
        if sim.field().live_count() == 0 {
            log::info!("Field cleared at frame {}", frame);
            break;
        }
    }

    let stats = sim.field().stats();
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize stats: {}", e),
    }
}

/// Outward spiral from the origin, folded back into the field.
fn spiral(t: f32, half_width: f32) -> Vec2 {
    let angle = t * 0.9;
    let reach = (0.6 * t).rem_euclid(half_width);
    Vec2::new(angle.cos(), angle.sin()) * reach
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--config" || args[i] == "-c" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

/// Parse `<flag> <value>` from command line
fn parse_value_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag {
            if let Some(value) = args.get(i + 1) {
                return value.parse().ok();
            }
        }
    }
    None
}
