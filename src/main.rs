//! Dropshadow demo entry point.
//!
//! Runs a small scene with:
//! - **bevy_ecs** for the entity-component-system architecture
//! - a character pacing over a ground floor and jumping onto a platform
//! - a drop shadow projected onto the floor below it, shrinking while airborne
//!
//! Headless by default: runs a fixed number of ticks and logs a summary.
//! Built with the `render` feature it opens a **raylib** window instead.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 600 --mode floor
//! cargo run --features render
//! ```

use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use dropshadow::components::shadow::ShadowMode;
use dropshadow::game::{build_schedule, init_world, log_summary, spawn_scene};
use dropshadow::resources::scene::SceneDescription;
use dropshadow::resources::shadowsettings::ShadowSettings;

/// Character drop shadow demo
#[derive(Parser)]
#[command(version, about = "Character drop shadows projected onto the floor below.")]
struct Cli {
    /// INI file with the [shadow] and [simulation] settings.
    #[arg(long, value_name = "PATH", default_value = "./shadow.ini")]
    config: PathBuf,

    /// JSON scene description (floors and character). Built-in scene if omitted.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Number of fixed ticks to simulate headless. Overrides the config.
    #[arg(long)]
    frames: Option<u32>,

    /// Shadow mode: stuck, floor or none. Overrides the config.
    #[arg(long)]
    mode: Option<ShadowMode>,

    /// Log every shadow placement.
    #[arg(long)]
    debug: bool,

    /// Write the effective settings to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = ShadowSettings::with_path(&cli.config);
    if let Err(e) = settings.load_from_file() {
        warn!("{} ({:?}), using defaults", e, settings.config_path);
    }
    if let Some(frames) = cli.frames {
        settings.frames = frames;
    }
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }

    if cli.write_config {
        match settings.save_to_file() {
            Ok(()) => println!("Config written to {}", settings.config_path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let scene = match &cli.scene {
        Some(path) => match SceneDescription::load(path) {
            Ok(scene) => scene,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => SceneDescription::default(),
    };

    let dt = settings.fixed_dt();
    let frames = settings.frames;
    info!("Dropshadow demo: mode {}, {} Hz", settings.mode, settings.fixed_hz);

    let mut world = init_world(settings, cli.debug);
    let demo = spawn_scene(&mut world, &scene);
    let mut schedule = build_schedule();

    #[cfg(feature = "render")]
    {
        let _ = frames;
        dropshadow::systems::render::run_windowed(&mut world, &mut schedule, &demo, dt);
    }
    #[cfg(not(feature = "render"))]
    dropshadow::game::run_headless(&mut world, &mut schedule, frames, dt);

    log_summary(&world, &demo);
}
