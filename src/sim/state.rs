//! Game state and core simulation types
//!
//! `traveled` is the single source of truth for world position. The aircraft
//! sits at a fixed offset above the bottom of the screen, so its world depth
//! is always `traveled + depth_offset`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::scroll::Window;
use super::terrain::{ObjectKind, Terrain, generate};
use crate::consts::EXPLOSION_TICKS;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start/fire action
    Idle,
    /// Ticking
    Running,
    /// Run ended, waiting for restart
    Crashed,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Left the river
    Border,
    /// Flew into an intact bridge
    Bridge,
    /// Collided with a moving or static hazard
    Obstacle(ObjectKind),
    /// Ran out of fuel
    Fuel,
}

/// Discrete events for the audio/UI shell. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Crashed { cause: CrashCause },
    ObstacleDestroyed { kind: ObjectKind, score: u64 },
    Fired,
    FuelLow,
    Refueled,
    /// The next lap's river was appended ahead of the view
    LapCompleted { lap: u32 },
}

/// The player's aircraft. Only the lateral position ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub lateral: f64,
    /// Distance of the aircraft centre above the bottom of the screen
    pub depth_offset: f64,
    pub width: f64,
    pub height: f64,
}

impl Aircraft {
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// World depth of the aircraft centre
    #[inline]
    pub fn depth(&self, traveled: f64) -> f64 {
        traveled + self.depth_offset
    }

    /// World depth of the nose
    #[inline]
    pub fn nose_depth(&self, traveled: f64) -> f64 {
        self.depth(traveled) + self.height / 2.0
    }

    pub fn bounds(&self, traveled: f64) -> Aabb {
        Aabb::from_center(
            DVec2::new(self.lateral, self.depth(traveled)),
            DVec2::new(self.width, self.height),
        )
    }
}

/// A bullet flying away from the aircraft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub lateral: f64,
    pub depth: f64,
}

impl Bullet {
    pub fn bounds(&self, size: DVec2) -> Aabb {
        Aabb::from_center(DVec2::new(self.lateral, self.depth), size)
    }
}

/// Destruction effect left behind by a kill (not gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub kind: ObjectKind,
    pub lateral: f64,
    pub depth: f64,
    pub ttl_ticks: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub terrain: Terrain,
    /// Stretches of river appended after the first one this run
    pub lap: u32,
    pub phase: GamePhase,
    /// First crash cause of the run, latched until restart
    pub crash_cause: Option<CrashCause>,
    pub fuel: i32,
    pub speed: f64,
    pub score: u64,
    /// Best score this session
    pub best_score: u64,
    /// Cumulative scroll distance this run
    pub traveled: f64,
    pub aircraft: Aircraft,
    /// Nose depth at the last collision pass; bridges crossed since are fatal
    pub last_nose: f64,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    /// Ticks since the run started
    pub time_ticks: u64,
    /// Ticks until held fire shoots again
    pub fire_cooldown: u32,
    /// Aircraft overlapped a gas station last tick
    pub refueling: bool,
    /// Low-fuel warning already emitted for this dip
    pub fuel_warned: bool,
    /// Pending events for the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Validate settings, generate the river and park in `Idle`
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let terrain = generate(&settings.terrain, &settings.catalog)?;
        let aircraft = Aircraft {
            lateral: settings.screen_width() / 2.0,
            depth_offset: settings.aircraft.depth_offset,
            width: settings.aircraft.width,
            height: settings.aircraft.height,
        };
        let last_nose = aircraft.nose_depth(0.0);
        Ok(Self {
            fuel: settings.fuel.init,
            speed: settings.speed.init,
            terrain,
            lap: 0,
            phase: GamePhase::Idle,
            crash_cause: None,
            score: 0,
            best_score: 0,
            traveled: 0.0,
            aircraft,
            last_nose,
            bullets: Vec::new(),
            explosions: Vec::new(),
            time_ticks: 0,
            fire_cooldown: 0,
            refueling: false,
            fuel_warned: false,
            events: Vec::new(),
            settings,
        })
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn crashed(&self) -> bool {
        self.phase == GamePhase::Crashed
    }

    /// Leave `Idle` (or a crash) and begin a fresh run. No-op while running.
    pub fn start(&mut self) {
        if self.running() {
            return;
        }
        self.restart();
    }

    /// Full reset: lap-0 terrain with every obstacle intact, aircraft centred,
    /// fuel/speed/score back to their initial values, `traveled` zeroed.
    pub fn restart(&mut self) {
        if self.lap != 0 {
            self.lap = 0;
            match generate(&self.settings.terrain, &self.settings.catalog) {
                Ok(terrain) => self.terrain = terrain,
                Err(err) => log::warn!("Terrain regeneration failed ({err}), reusing river"),
            }
        }
        self.terrain.reset_objects();

        self.aircraft.lateral = self.settings.screen_width() / 2.0;
        self.fuel = self.settings.fuel.init;
        self.speed = self.settings.speed.init;
        self.score = 0;
        self.traveled = 0.0;
        self.bullets.clear();
        self.explosions.clear();
        self.time_ticks = 0;
        self.fire_cooldown = 0;
        self.refueling = false;
        self.fuel_warned = false;
        self.crash_cause = None;
        self.last_nose = self.aircraft.nose_depth(0.0);
        self.phase = GamePhase::Running;
        self.extend_river();

        log::info!("Run started");
        self.events.push(GameEvent::Started);
    }

    /// Append the next lap's river while the view reaches past the end.
    ///
    /// Each lap is generated from lap-offset seeds and starts at the width
    /// the previous one ended with, so the corridor never breaks.
    pub(crate) fn extend_river(&mut self) {
        while self.traveled + self.settings.viewport_height >= self.terrain.total_length {
            let lap = self.lap.saturating_add(1);
            let params = self.settings.terrain.for_lap(lap);
            let catalog = self.settings.catalog.for_lap(lap);
            if let Err(err) = self.terrain.extend(&params, &catalog) {
                log::warn!("Could not extend the river for lap {lap}: {err}");
                return;
            }
            self.lap = lap;
            log::info!("Lap {} reached at {:.0}, score {}", lap, self.traveled, self.score);
            self.events.push(GameEvent::LapCompleted { lap });
        }
    }

    /// Latch a crash. Only the first cause of a run is recorded; later calls
    /// return false and change nothing.
    pub fn crash(&mut self, cause: CrashCause) -> bool {
        if self.crash_cause.is_some() || !self.running() {
            return false;
        }
        self.crash_cause = Some(cause);
        self.phase = GamePhase::Crashed;
        self.best_score = self.best_score.max(self.score);
        log::info!(
            "Crashed ({:?}) at depth {:.0}, score {}",
            cause,
            self.aircraft_depth(),
            self.score
        );
        self.events.push(GameEvent::Crashed { cause });
        true
    }

    #[inline]
    pub fn aircraft_depth(&self) -> f64 {
        self.aircraft.depth(self.traveled)
    }

    /// Visible terrain window
    pub fn window(&self) -> Window {
        self.terrain.window(self.traveled, self.settings.viewport_height)
    }

    /// Set fuel, clamped to `[0, max]`
    pub fn set_fuel(&mut self, fuel: i32) {
        self.fuel = fuel.clamp(0, self.settings.fuel.max);
    }

    /// Set speed, clamped to the configured band. NaN is ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            return;
        }
        self.speed = speed.clamp(self.settings.speed.min, self.settings.speed.max);
    }

    /// Move the aircraft sideways; stays on screen, may leave the river
    pub fn steer(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let max_step = self.settings.aircraft.max_lateral_step;
        let half = self.aircraft.half_width();
        let lateral = self.aircraft.lateral + delta.clamp(-max_step, max_step);
        self.aircraft.lateral = lateral.clamp(half, self.settings.screen_width() - half);
    }

    /// Spawn a bullet at the aircraft's nose
    pub fn fire(&mut self) {
        self.bullets.push(Bullet {
            lateral: self.aircraft.lateral,
            depth: self.aircraft.nose_depth(self.traveled),
        });
        self.events.push(GameEvent::Fired);
    }

    pub(crate) fn spawn_explosion(&mut self, kind: ObjectKind, lateral: f64, depth: f64) {
        self.explosions.push(Explosion {
            kind,
            lateral,
            depth,
            ttl_ticks: EXPLOSION_TICKS,
        });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
