//! gridrunner command line driver.
//!
//! Runs a level headless for a number of fixed steps with a set of held keys,
//! then prints the resulting draw list as JSON, or prints the normalized level
//! text.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --level levels/demo.txt --frames 120 --hold ArrowRight --dump
//! ```

use std::path::PathBuf;

use clap::Parser;
use gridrunner::engine::Engine;
use gridrunner::resources::engineconfig::EngineConfig;

/// gridrunner 2D platformer core
#[derive(Parser)]
#[command(version, about = "Headless 2D tile platformer simulation")]
struct Cli {
    /// Level text file. A missing or empty file loads a blank grid.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// INI configuration file. Defaults are kept when it cannot be read.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Key held during every step (repeatable), e.g. `--hold ArrowRight`.
    #[arg(long, value_name = "KEY")]
    hold: Vec<String>,

    /// Print the final draw list as JSON.
    #[arg(long)]
    dump: bool,

    /// Print the normalized level text and exit without simulating.
    #[arg(long)]
    export: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    save_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    if cli.config.is_some() {
        if let Err(e) = config.load_from_file() {
            log::warn!("{}, using defaults", e);
        }
    }

    if cli.save_config {
        match config.save_to_file() {
            Ok(()) => println!("Config written to {}", config.config_path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let step = config.fixed_step;
    let mut engine = Engine::new(config);
    if let Some(path) = &cli.level {
        engine.load_level_file(path);
    }

    // Early-exit: print the level and quit
    if cli.export {
        println!("{}", engine.export_level());
        return;
    }

    log::info!("Simulating {} steps holding {:?}", cli.frames, cli.hold);
    for _ in 0..cli.frames {
        engine.set_keys_pressed(cli.hold.iter().cloned());
        engine.update(step);
    }

    if let (Some(pos), Some(player)) = (engine.player_position(), engine.player()) {
        log::info!(
            "Player at ({:.1}, {:.1}), grounded={}, jumps={}",
            pos.x,
            pos.y,
            player.is_grounded,
            player.jumps
        );
    }

    if cli.dump {
        match serde_json::to_string_pretty(&engine.render()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing draw list: {e}");
                std::process::exit(1);
            }
        }
    }
}
