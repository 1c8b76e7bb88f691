//! Fixed timestep simulation tick
//!
//! Drives the game state machine: `Idle` waits for a start/fire action,
//! `Running` scrolls the river and resolves collisions, `Crashed` waits for
//! a restart. Fuel drains on a 1 Hz cadence and speed relaxes toward its
//! baseline at 10 Hz, both counted in ticks. The river is extended ahead of
//! the view, so `traveled` only ever grows during a run.

use super::collision;
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use super::terrain::ObjectKind;
use crate::consts::{FUEL_TICK_INTERVAL, SPEED_DECAY_INTERVAL};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lateral displacement requested this tick
    pub lateral: f64,
    /// Speed change requested this tick
    pub speed: f64,
    /// Fire once now
    pub fire: bool,
    /// Fire button held: auto-fire on the configured interval
    pub fire_held: bool,
    /// Start from idle, or restart after a crash
    pub start: bool,
    /// Restart immediately, whatever the phase
    pub restart: bool,
    /// Idle/demo mode - autopilot flies the aircraft
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    if input.restart {
        state.restart();
        return;
    }

    match state.phase {
        GamePhase::Idle => {
            if input.start || input.fire || input.idle_mode {
                state.start();
            }
            return;
        }
        GamePhase::Crashed => {
            if input.start || input.idle_mode {
                state.restart();
            }
            return;
        }
        GamePhase::Running => {}
    }

    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring tick with invalid dt {dt}");
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    // Player controls
    state.steer(input.lateral);
    if input.speed != 0.0 {
        state.set_speed(state.speed + input.speed);
    }
    state.fire_cooldown = state.fire_cooldown.saturating_sub(1);
    if input.fire || (input.fire_held && state.fire_cooldown == 0) {
        state.fire();
        state.fire_cooldown = state.settings.bullet.fire_interval_ticks;
    }

    // Scroll
    state.traveled += state.speed * dt;
    state.extend_river();

    collision::resolve(state, dt);
    if !state.running() {
        return;
    }

    // Fuel
    if state.time_ticks % FUEL_TICK_INTERVAL == 0 {
        state.set_fuel(state.fuel.saturating_sub(state.settings.fuel.drain));
    }
    if state.fuel <= state.settings.fuel.low {
        if !state.fuel_warned {
            state.fuel_warned = true;
            log::debug!("Fuel low: {}", state.fuel);
            state.events.push(GameEvent::FuelLow);
        }
    } else {
        state.fuel_warned = false;
    }
    if state.fuel <= 0 {
        state.crash(CrashCause::Fuel);
        return;
    }

    // Speed relaxes toward baseline
    if state.time_ticks % SPEED_DECAY_INTERVAL == 0 {
        let baseline = state.settings.speed.init;
        let step = state.settings.speed.decay_step;
        let speed = if state.speed > baseline {
            (state.speed - step).max(baseline)
        } else {
            (state.speed + step).min(baseline)
        };
        state.set_speed(speed);
    }

    // Destruction effects
    for explosion in &mut state.explosions {
        explosion.ttl_ticks = explosion.ttl_ticks.saturating_sub(1);
    }
    state.explosions.retain(|e| e.ttl_ticks > 0);
}

/// How far ahead the autopilot looks for hazards and fuel
const AUTOPILOT_LOOKAHEAD: f64 = 240.0;

/// Demo-mode steering: keep to the river centre, dodge hazards ahead, detour
/// for fuel when low, and keep shooting.
fn autopilot(state: &GameState, input: &mut TickInput) {
    let aircraft = &state.aircraft;
    let depth = state.aircraft_depth();
    let ahead = depth + AUTOPILOT_LOOKAHEAD;
    let banks = state.terrain.bank_at(depth);
    let banks_ahead = state.terrain.bank_at(ahead);

    // Follow the narrower of the two river sections
    let left = banks.left.max(banks_ahead.left) + aircraft.half_width();
    let right = banks.right.min(banks_ahead.right) - aircraft.half_width();
    let mut target = (left + right) / 2.0;

    let window = state.window();
    let want_fuel = state.fuel < state.settings.fuel.max / 2;
    let mut nearest_hazard: Option<(f64, f64)> = None;
    for id in window.object_ids(&state.terrain) {
        let Some(object) = state.terrain.object(id) else {
            continue;
        };
        if object.destroyed || object.depth < depth || object.depth > ahead {
            continue;
        }
        match object.kind {
            ObjectKind::GasStation if want_fuel => {
                target = object.lateral;
            }
            ObjectKind::Helicopter | ObjectKind::Airplane => {
                let closer = nearest_hazard.is_none_or(|(d, _)| object.depth < d);
                if closer {
                    nearest_hazard = Some((object.depth, object.lateral));
                }
            }
            _ => {}
        }
    }

    if let Some((_, lateral)) = nearest_hazard {
        let clearance = aircraft.width;
        if (lateral - target).abs() < clearance {
            // Sidestep toward whichever bank leaves more room
            target = if lateral - left > right - lateral {
                lateral - clearance
            } else {
                lateral + clearance
            };
        }
    }

    input.lateral = (target.clamp(left, right.max(left)) - aircraft.lateral)
        .clamp(-state.settings.aircraft.max_lateral_step, state.settings.aircraft.max_lateral_step);
    input.fire_held = true;
    input.speed = 0.0;
}
