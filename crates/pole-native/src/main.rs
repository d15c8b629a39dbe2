mod runner;
mod settings;
mod sim;

use anyhow::Context;
use clap::Parser;
use pole_core::constants::{APPLICATION_KEY, DEFAULT_DISPLAY_HZ, OVERLAY_KEY, OVERLAY_NAME};
use pole_core::{report, CalibrationState, ConfigStore, MarkerConfig, MonotonicClock, SessionState};
use settings::JsonSettingsStore;
use sim::{demo_script, SimulatedHost};
use std::path::PathBuf;

/// Keeps a floor marker pole visible inside a VR play area.
#[derive(Parser, Debug)]
#[command(name = "pole-overlay", version, about)]
struct Args {
    /// Settings file [default: settings.json next to the executable]
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stop after this many ticks; 0 runs until the runtime asks to quit
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Display refresh rate reported by the simulated headset
    #[arg(long, default_value_t = DEFAULT_DISPLAY_HZ)]
    refresh_hz: f32,

    /// Simulate a play area whose boundary calibration is invalid
    #[arg(long)]
    no_boundary: bool,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    log::info!("pole-overlay {} ({})", env!("CARGO_PKG_VERSION"), APPLICATION_KEY);
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut store = match args.settings {
        Some(path) => JsonSettingsStore::new(path),
        None => JsonSettingsStore::beside_executable()?,
    };
    log::info!("Settings file: {}", store.path().display());
    let config = store.load().unwrap_or_else(|e| {
        log::warn!("{}; continuing with default settings", e);
        MarkerConfig::default()
    });

    let mut host = SimulatedHost::init(args.refresh_hz, demo_script())
        .context("tracking runtime is not available")?;
    if args.no_boundary {
        host.set_calibration(CalibrationState::ErrorPlayAreaInvalid);
    }
    let overlay = host
        .create_overlay(OVERLAY_KEY, OVERLAY_NAME)
        .context("unable to create the pole overlay")?;

    let mut session = SessionState::new(config, overlay);
    session.configure_overlay(&mut host);
    let c = session.config();
    log::info!(
        "Pole at ({:.2}, {:.2}, {:.2}) textured with {}, {} Hz display",
        c.pos_x,
        c.pos_y,
        c.pos_z,
        c.texture_path,
        host.display_frequency()
    );

    let clock = MonotonicClock::default();
    let ticks = runner::run_loop(
        &mut session,
        &mut host,
        &mut store,
        &clock,
        args.ticks,
        std::thread::yield_now,
    );
    if !host.is_finished() {
        log::info!("Stopped before the input script completed");
    }
    log::info!("Shutting down after {} ticks", ticks);
    log::debug!("{:?}", host.overlay_state());

    report(host.destroy_overlay(session.overlay()));
    host.shutdown();
    Ok(())
}
