//! Collision and combat resolution
//!
//! Everything here only looks at the visible window: obstacle motion,
//! bullet hits and aircraft contact tests never scan the whole river. The
//! bridge test follows the nose between passes instead, so it cannot be
//! stepped over.

use glam::DVec2;

use super::geometry::{Aabb, Banks};
use super::scroll::Window;
use super::state::{Aircraft, CrashCause, GameEvent, GameState};
use super::terrain::{Direction, Movement, ObjectId, ObjectKind, Terrain};

/// What the aircraft touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contact {
    /// First fatal contact, in test order: banks, bridge, obstacles
    pub crash: Option<CrashCause>,
    /// Fuel offered by overlapped gas stations
    pub refuel: i32,
}

/// Border test: the aircraft must fit between the banks
pub fn check_banks(banks: Banks, lateral: f64, half_width: f64) -> Option<CrashCause> {
    if banks.admits(lateral, half_width) {
        None
    } else {
        Some(CrashCause::Border)
    }
}

/// First intact bridge whose threshold the nose reached while moving from
/// `from_nose` (exclusive) to `to_nose` (inclusive).
///
/// Only the segments around that stretch are scanned, so a long step cannot
/// skip a bridge.
pub fn check_bridges(terrain: &Terrain, from_nose: f64, to_nose: f64) -> Option<ObjectId> {
    if to_nose <= from_nose || terrain.segments.is_empty() {
        return None;
    }
    let first = terrain.segment_index_at(from_nose).saturating_sub(1);
    let last = (terrain.segment_index_at(to_nose) + 2).min(terrain.segments.len());
    terrain.object_ids(first..last).find(|&id| {
        terrain.object(id).is_some_and(|o| {
            let threshold = o.threshold_depth();
            o.kind == ObjectKind::Bridge
                && !o.destroyed
                && threshold > from_nose
                && threshold <= to_nose
        })
    })
}

/// Bank, bridge and obstacle tests for the aircraft. `last_nose` is the nose
/// depth at the previous pass.
pub fn check_aircraft(
    terrain: &Terrain,
    window: &Window,
    aircraft: &Aircraft,
    traveled: f64,
    last_nose: f64,
) -> Contact {
    let banks = terrain.bank_at(aircraft.depth(traveled));
    if let Some(cause) = check_banks(banks, aircraft.lateral, aircraft.half_width()) {
        return Contact {
            crash: Some(cause),
            refuel: 0,
        };
    }

    if check_bridges(terrain, last_nose, aircraft.nose_depth(traveled)).is_some() {
        return Contact {
            crash: Some(CrashCause::Bridge),
            refuel: 0,
        };
    }

    let body = aircraft.bounds(traveled);
    let mut contact = Contact::default();
    for id in window.object_ids(terrain) {
        let Some(object) = terrain.object(id) else {
            continue;
        };
        if object.destroyed || !object.kind.is_solid() || object.kind == ObjectKind::Bridge {
            continue;
        }
        if !object.bounds().overlaps(&body) {
            continue;
        }
        if object.kind == ObjectKind::GasStation {
            contact.refuel = contact.refuel.saturating_add(object.refuel);
        } else {
            return Contact {
                crash: Some(CrashCause::Obstacle(object.kind)),
                refuel: 0,
            };
        }
    }
    contact
}

/// First intact hostile obstacle overlapping `bullet`
pub fn bullet_target(terrain: &Terrain, window: &Window, bullet: &Aabb) -> Option<ObjectId> {
    window.object_ids(terrain).find(|&id| {
        terrain
            .object(id)
            .is_some_and(|o| !o.destroyed && o.kind.is_hostile() && o.bounds().overlaps(bullet))
    })
}

/// Advance shuttles and one-way crossers that are on screen.
///
/// Shuttles flip direction at the banks; one-way objects destroy themselves
/// once fully past the far screen edge.
pub fn move_obstacles(terrain: &mut Terrain, window: &Window, dt: f64) {
    let ids: Vec<ObjectId> = window.object_ids(terrain).collect();
    let screen_width = terrain.screen_width;
    for id in ids {
        let Some(object) = terrain.object(id) else {
            continue;
        };
        if object.destroyed
            || object.movement == Movement::Still
            || !window.shows(object.depth, object.height / 2.0)
        {
            continue;
        }
        let banks = terrain.bank_at(object.depth);
        let Some(object) = terrain.object_mut(id) else {
            continue;
        };
        let Some(direction) = object.direction else {
            continue;
        };
        let half = object.width / 2.0;
        object.lateral += direction.sign() * object.speed * dt;

        match object.movement {
            Movement::Shuttle => {
                if object.lateral - half <= banks.left {
                    object.lateral = banks.left + half;
                    object.direction = Some(Direction::Ltr);
                } else if object.lateral + half >= banks.right {
                    object.lateral = banks.right - half;
                    object.direction = Some(Direction::Rtl);
                }
            }
            Movement::OneWay => {
                let gone = match direction {
                    Direction::Ltr => object.lateral - half >= screen_width,
                    Direction::Rtl => object.lateral + half <= 0.0,
                };
                if gone {
                    object.destroy();
                    log::debug!("{:?} left the screen at depth {:.0}", object.kind, object.depth);
                }
            }
            Movement::Still => {}
        }
    }
}

/// Move bullets, score hits, and drop bullets that hit or left the view
pub fn resolve_bullets(state: &mut GameState, window: &Window) {
    let size = DVec2::new(state.settings.bullet.width, state.settings.bullet.height);
    let step = state.settings.bullet.step;
    let bullets = std::mem::take(&mut state.bullets);
    let mut kept = Vec::with_capacity(bullets.len());

    for mut bullet in bullets {
        bullet.depth += step;
        if bullet.depth - size.y / 2.0 >= window.far_depth() {
            continue;
        }
        match bullet_target(&state.terrain, window, &bullet.bounds(size)) {
            Some(id) => award_kill(state, id),
            None => kept.push(bullet),
        }
    }
    state.bullets = kept;
}

/// Destroy an obstacle and credit its score. Already-destroyed obstacles
/// score nothing.
pub fn award_kill(state: &mut GameState, id: ObjectId) {
    let Some(object) = state.terrain.object_mut(id) else {
        return;
    };
    if !object.destroy() {
        return;
    }
    let (kind, score, lateral, depth) = (object.kind, object.score, object.lateral, object.depth);
    state.score += score;
    state.spawn_explosion(kind, lateral, depth);
    state.events.push(GameEvent::ObstacleDestroyed { kind, score });
    log::debug!("Destroyed {:?} (+{}), score {}", kind, score, state.score);
}

/// One resolver pass: obstacle motion, bullets, then aircraft contact
pub fn resolve(state: &mut GameState, dt: f64) {
    let window = state.window();
    move_obstacles(&mut state.terrain, &window, dt);
    resolve_bullets(state, &window);

    let contact = check_aircraft(
        &state.terrain,
        &window,
        &state.aircraft,
        state.traveled,
        state.last_nose,
    );
    state.last_nose = state.aircraft.nose_depth(state.traveled);
    if let Some(cause) = contact.crash {
        state.crash(cause);
        return;
    }

    let touching = contact.refuel > 0;
    if touching {
        state.set_fuel(state.fuel.saturating_add(contact.refuel));
        if !state.refueling {
            state.events.push(GameEvent::Refueled);
            log::debug!("Refueling, fuel {}", state.fuel);
        }
    }
    state.refueling = touching;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lerp;
    use crate::settings::Settings;
    use proptest::prelude::*;
    use crate::sim::state::{Bullet, GamePhase};
    use crate::sim::tick::{TickInput, tick};
    use crate::sim::terrain::{BridgeEntry, CatalogEntry, GameObject, ObjectCatalog, TerrainParams};

    /// One long flat segment, 100 wide on a 200 screen, no obstacles but the bridge
    fn running_state() -> GameState {
        let settings = Settings {
            viewport_height: 800.0,
            terrain: TerrainParams {
                screen_width: 200.0,
                min_width: 100.0,
                max_width: 100.0,
                min_length: 5000.0,
                max_length: 5000.0,
                segment_count: 1,
                ..TerrainParams::default()
            },
            catalog: ObjectCatalog {
                bridge: BridgeEntry { score: 500 },
                entries: Vec::new(),
            },
            ..Settings::default()
        };
        let mut state = GameState::new(settings).unwrap();
        state.start();
        state.drain_events();
        state
    }

    fn spawn(state: &mut GameState, kind: ObjectKind, movement: Movement, lateral: f64, depth: f64) -> ObjectId {
        let entry = CatalogEntry {
            kind,
            movement,
            min_count: 1,
            max_count: 1,
            width: 30.0,
            height: 30.0,
            speed: 60.0,
            score: 60,
            refuel: 2,
            seed: 1,
        };
        let object = GameObject::from_entry(&entry, depth, lateral, None);
        let objects = &mut state.terrain.segments[0].objects;
        objects.push(object);
        ObjectId {
            segment: 0,
            index: objects.len() - 1,
        }
    }

    fn remove_bridges(state: &mut GameState) {
        state.terrain.segments[0].objects.retain(|o| o.kind != ObjectKind::Bridge);
    }

    #[test]
    fn test_bank_scenario() {
        let banks = Banks { left: 70.0, right: 130.0 };
        assert_eq!(check_banks(banks, 100.0, 25.0), None);
        assert_eq!(check_banks(banks, 90.0, 25.0), Some(CrashCause::Border));
    }

    #[test]
    fn test_no_border_crash_inside_banks() {
        let mut state = running_state();
        remove_bridges(&mut state);
        // Banks are 50..150, half width 20: anything in [70, 130] is safe
        for lateral in [70.0, 85.0, 100.0, 129.0, 130.0] {
            state.aircraft.lateral = lateral;
            resolve(&mut state, 1.0 / 60.0);
            assert!(state.running(), "crashed at lateral {lateral}");
        }
        state.aircraft.lateral = 69.0;
        resolve(&mut state, 1.0 / 60.0);
        assert_eq!(state.crash_cause, Some(CrashCause::Border));
    }

    #[test]
    fn test_bridge_threshold_crash() {
        let mut state = running_state();
        let bridge = state.terrain.segments[0]
            .objects
            .iter()
            .find(|o| o.kind == ObjectKind::Bridge)
            .cloned()
            .unwrap();
        let nose_offset = state.aircraft.depth_offset + state.aircraft.height / 2.0;

        state.traveled = bridge.threshold_depth() - nose_offset - 1.0;
        resolve(&mut state, 0.0);
        assert!(state.running());

        state.traveled = bridge.threshold_depth() - nose_offset;
        resolve(&mut state, 0.0);
        assert_eq!(state.crash_cause, Some(CrashCause::Bridge));
    }

    #[test]
    fn test_long_step_cannot_skip_bridge() {
        let mut state = running_state();
        let bridge = window_bridge(&state);
        let far = state.terrain.object(bridge).unwrap().far_depth();
        // One 30 s step carries the nose far beyond the whole bridge
        tick(&mut state, &TickInput::default(), 30.0);
        assert!(state.aircraft.nose_depth(state.traveled) > far);
        assert_eq!(state.crash_cause, Some(CrashCause::Bridge));
    }

    #[test]
    fn test_bridge_behind_start_is_harmless() {
        let mut settings = running_state().settings;
        settings.terrain.min_length = 250.0;
        settings.terrain.max_length = 250.0;
        let mut state = GameState::new(settings).unwrap();
        state.start();
        let bridge = window_bridge(&state);
        let threshold = state.terrain.object(bridge).unwrap().threshold_depth();
        assert!(threshold < state.aircraft.nose_depth(0.0));

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        }
        assert!(state.running(), "crashed: {:?}", state.crash_cause);
        assert!(!state.terrain.object(bridge).unwrap().destroyed);
    }

    #[test]
    fn test_destroyed_bridge_is_harmless() {
        let mut state = running_state();
        for object in &mut state.terrain.segments[0].objects {
            object.destroy();
        }
        let threshold = state.terrain.segments[0].objects[0].threshold_depth();
        state.traveled = threshold - state.aircraft.depth_offset;
        resolve(&mut state, 0.0);
        assert!(state.running());
    }

    #[test]
    fn test_obstacle_crash_uses_kind() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let depth = state.aircraft_depth();
        spawn(&mut state, ObjectKind::Helicopter, Movement::Still, 100.0, depth + 10.0);
        resolve(&mut state, 0.0);
        assert_eq!(
            state.crash_cause,
            Some(CrashCause::Obstacle(ObjectKind::Helicopter))
        );
        assert_eq!(state.phase, GamePhase::Crashed);
    }

    #[test]
    fn test_trees_never_collide() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let depth = state.aircraft_depth();
        spawn(&mut state, ObjectKind::Tree, Movement::Still, 100.0, depth);
        resolve(&mut state, 0.0);
        assert!(state.running());
    }

    #[test]
    fn test_gas_station_refuels_and_stays() {
        let mut state = running_state();
        remove_bridges(&mut state);
        state.fuel = 10;
        let depth = state.aircraft_depth();
        let id = spawn(&mut state, ObjectKind::GasStation, Movement::Still, 100.0, depth);
        resolve(&mut state, 0.0);
        resolve(&mut state, 0.0);
        assert!(state.running());
        assert_eq!(state.fuel, 14);
        assert!(!state.terrain.object(id).unwrap().destroyed);
        let refuels = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Refueled)
            .count();
        assert_eq!(refuels, 1);

        // Clamped at max
        state.fuel = state.settings.fuel.max - 1;
        resolve(&mut state, 0.0);
        assert_eq!(state.fuel, state.settings.fuel.max);
    }

    #[test]
    fn test_bullet_kills_helicopter() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let id = spawn(&mut state, ObjectKind::Helicopter, Movement::Still, 100.0, 400.0);
        state.bullets.push(Bullet {
            lateral: 100.0,
            depth: 0.0,
        });

        let mut ticks = 0;
        while !state.bullets.is_empty() && ticks < 200 {
            resolve(&mut state, 0.0);
            ticks += 1;
        }
        let heli = state.terrain.object(id).unwrap().clone();
        assert!(heli.destroyed);
        assert_eq!(state.score, 60);
        assert!(state.bullets.is_empty());
        assert_eq!(state.explosions.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::ObstacleDestroyed {
            kind: ObjectKind::Helicopter,
            score: 60,
        }));
        // Hit same tick it reached the box: no further movement happened
        let size_half = state.settings.bullet.height / 2.0;
        let reach = heli.depth - heli.height / 2.0 - size_half;
        assert_eq!(ticks as f64, (reach / state.settings.bullet.step).floor() + 1.0);
    }

    #[test]
    fn test_destroyed_obstacle_scores_once() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let id = spawn(&mut state, ObjectKind::Airplane, Movement::Still, 100.0, 300.0);
        award_kill(&mut state, id);
        award_kill(&mut state, id);
        assert_eq!(state.score, 60);
    }

    #[test]
    fn test_bullets_pass_gas_stations() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let id = spawn(&mut state, ObjectKind::GasStation, Movement::Still, 100.0, 400.0);
        state.bullets.push(Bullet {
            lateral: 100.0,
            depth: 380.0,
        });
        for _ in 0..10 {
            resolve(&mut state, 0.0);
        }
        assert!(!state.terrain.object(id).unwrap().destroyed);
        assert_eq!(state.score, 0);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_bullets_leave_window() {
        let mut state = running_state();
        remove_bridges(&mut state);
        state.bullets.push(Bullet {
            lateral: 10.0,
            depth: 790.0,
        });
        resolve(&mut state, 0.0);
        resolve(&mut state, 0.0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shuttle_bounces_between_banks() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let id = spawn(&mut state, ObjectKind::Helicopter, Movement::Shuttle, 100.0, 600.0);
        state.terrain.object_mut(id).unwrap().direction = Some(Direction::Ltr);
        let window = state.window();
        let mut saw_rtl = false;
        for _ in 0..200 {
            move_obstacles(&mut state.terrain, &window, 1.0 / 60.0);
            let heli = state.terrain.object(id).unwrap();
            assert!(heli.lateral - 15.0 >= 50.0 - 1e-9);
            assert!(heli.lateral + 15.0 <= 150.0 + 1e-9);
            saw_rtl |= heli.direction == Some(Direction::Rtl);
        }
        assert!(saw_rtl);
    }

    #[test]
    fn test_one_way_self_destructs_off_screen() {
        let mut state = running_state();
        remove_bridges(&mut state);
        let id = spawn(&mut state, ObjectKind::Airplane, Movement::OneWay, 15.0, 600.0);
        state.terrain.object_mut(id).unwrap().direction = Some(Direction::Ltr);
        let window = state.window();
        // 60 units/s across a 200 screen plus its own width
        for _ in 0..(60 * 5) {
            move_obstacles(&mut state.terrain, &window, 1.0 / 60.0);
        }
        let plane = state.terrain.object(id).unwrap();
        assert!(plane.destroyed);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bullets_destroy_bridges() {
        let mut state = running_state();
        let bridge_id = window_bridge(&state);
        let threshold = state.terrain.object(bridge_id).unwrap().threshold_depth();
        state.traveled = threshold - 400.0;
        state.bullets.push(Bullet {
            lateral: 60.0,
            depth: threshold - 20.0,
        });
        for _ in 0..5 {
            resolve(&mut state, 0.0);
        }
        assert!(state.terrain.object(bridge_id).unwrap().destroyed);
        assert_eq!(state.score, 500);
        assert!(state.running());
    }

    proptest! {
        #[test]
        fn prop_no_border_crash_inside_banks(
            left in 0.0f64..300.0,
            width in 1.0f64..300.0,
            half in 0.0f64..50.0,
            t in 0.0f64..=1.0,
        ) {
            let banks = Banks { left, right: left + width };
            prop_assume!(width >= 2.0 * half);
            let (lo, hi) = (banks.left + half, banks.right - half);
            let lateral = lerp(lo, hi, t).clamp(lo, hi);
            prop_assert_eq!(check_banks(banks, lateral, half), None);
            prop_assert_eq!(
                check_banks(banks, banks.left + half - 0.5, half),
                Some(CrashCause::Border)
            );
        }
    }

    fn window_bridge(state: &GameState) -> ObjectId {
        let index = state.terrain.segments[0]
            .objects
            .iter()
            .position(|o| o.kind == ObjectKind::Bridge)
            .unwrap();
        ObjectId { segment: 0, index }
    }
}
