//! River Raid entry point
//!
//! Headless native driver: loads settings, lets the autopilot fly for a
//! while on a fixed timestep and reports what happened.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use river_raid::consts::{MAX_SUBSTEPS, SIM_DT};
use river_raid::settings::Difficulty;
use river_raid::sim::{GameEvent, GameState, TickInput, tick};
use river_raid::view::frame_view;
use river_raid::{ConfigError, Settings};

/// Simulated display refresh, deliberately off the sim rate
const FRAME_DT: f64 = 1.0 / 50.0;

#[derive(Parser, Debug)]
#[command(name = "river-raid")]
#[command(about = "Fly the river-raid autopilot headless and report the run")]
struct Args {
    /// Settings JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Terrain seed (widths use it, lengths use it plus one)
    #[arg(short, long)]
    seed: Option<i64>,

    /// Difficulty preset: easy, normal or hard
    #[arg(short, long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Simulated seconds to fly
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty `{s}`"))
}

fn load_settings(args: &Args) -> Result<Settings, ConfigError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(preset) = args.difficulty {
        settings.apply_preset(preset);
    }
    if let Some(seed) = args.seed {
        settings.terrain.width_seed = seed;
        settings.terrain.length_seed = seed.wrapping_add(1);
    }
    settings.validate()?;
    Ok(settings)
}

/// Fixed timestep loop fed by a variable frame clock
struct Driver {
    state: GameState,
    input: TickInput,
    accumulator: f64,
    crashes: u32,
    kills: u32,
}

impl Driver {
    fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            accumulator: 0.0,
            crashes: 0,
            kills: 0,
        }
    }

    fn update(&mut self, dt: f64) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::Crashed { cause } => {
                    self.crashes += 1;
                    log::info!("Crashed ({cause:?}) at {:.0}", self.state.traveled);
                }
                GameEvent::ObstacleDestroyed { kind, score } => {
                    self.kills += 1;
                    log::debug!("Destroyed {kind:?} (+{score})");
                }
                GameEvent::LapCompleted { lap } => log::info!("Lap {lap} reached"),
                GameEvent::FuelLow => log::debug!("Fuel low: {}", self.state.fuel),
                other => log::trace!("{other:?}"),
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let state = match load_settings(&args).and_then(GameState::new) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "River Raid (headless) starting: {} segments, {:.0} units of river",
        state.terrain.segments.len(),
        state.terrain.total_length
    );

    let frames = (args.seconds.max(0.0) / FRAME_DT).round() as u64;
    let mut driver = Driver::new(state);
    for _ in 0..frames {
        driver.update(FRAME_DT);
    }

    let view = frame_view(&driver.state);
    println!(
        "ticks={} lap={} traveled={:.0} score={} best={} fuel={} crashes={} kills={} on_screen={}",
        driver.state.time_ticks,
        view.hud.lap,
        driver.state.traveled,
        view.hud.score,
        view.hud.best_score,
        view.hud.fuel,
        driver.crashes,
        driver.kills,
        view.obstacles.len() + usize::from(!view.bridges.is_empty()),
    );
    ExitCode::SUCCESS
}
