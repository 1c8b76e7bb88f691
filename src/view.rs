//! Read-only frame snapshot for a renderer
//!
//! Everything is already in screen space: x is lateral, y grows downward
//! from the top of the viewport. Destroyed obstacles are filtered out.

use glam::DVec2;
use serde::Serialize;

use crate::sim::{Banks, Direction, GamePhase, GameState, ObjectKind, SectionTint, Window};

/// A rectangle-sized thing to draw, centred at `pos`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: ObjectKind,
    pub pos: DVec2,
    pub size: DVec2,
    pub direction: Option<Direction>,
}

/// One bridge slice in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quad {
    pub corners: [DVec2; 4],
    pub tint: SectionTint,
}

/// A destruction effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Blast {
    pub kind: ObjectKind,
    pub pos: DVec2,
    /// Remaining life in [0, 1]
    pub life: f32,
}

/// Visible part of a river segment: a trapezoid between two screen rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiverStrip {
    pub bottom_y: f64,
    pub top_y: f64,
    pub bottom: Banks,
    pub top: Banks,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub fuel: i32,
    pub fuel_max: i32,
    pub speed: f64,
    pub score: u64,
    pub best_score: u64,
    pub lap: u32,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub aircraft: DVec2,
    pub aircraft_size: DVec2,
    /// Hidden once the aircraft has crashed
    pub aircraft_visible: bool,
    pub bullets: Vec<DVec2>,
    pub river: Vec<RiverStrip>,
    pub obstacles: Vec<Sprite>,
    pub bridges: Vec<Quad>,
    pub explosions: Vec<Blast>,
    pub hud: Hud,
}

fn to_screen(window: &Window, lateral: f64, depth: f64) -> DVec2 {
    DVec2::new(lateral, window.to_screen_y(depth))
}

/// Build the frame for the current state
pub fn frame_view(state: &GameState) -> FrameView {
    let window = state.window();
    let terrain = &state.terrain;

    let river = terrain.segments[window.segments.clone()]
        .iter()
        .map(|segment| {
            let near = segment.offset.max(window.traveled);
            let far = segment.end().min(window.far_depth());
            RiverStrip {
                bottom_y: window.to_screen_y(near),
                top_y: window.to_screen_y(far),
                bottom: Banks::centered(terrain.screen_width, segment.width_at(near)),
                top: Banks::centered(terrain.screen_width, segment.width_at(far)),
            }
        })
        .collect();

    let mut obstacles = Vec::new();
    let mut bridges = Vec::new();
    for id in window.object_ids(terrain) {
        let Some(object) = terrain.object(id) else {
            continue;
        };
        if object.destroyed || !window.shows(object.depth, object.height / 2.0) {
            continue;
        }
        if object.kind == ObjectKind::Bridge {
            bridges.extend(object.sections.iter().map(|section| Quad {
                corners: section.corners.map(|c| to_screen(&window, c.x, c.y)),
                tint: section.tint,
            }));
        } else {
            obstacles.push(Sprite {
                kind: object.kind,
                pos: to_screen(&window, object.lateral, object.depth),
                size: DVec2::new(object.width, object.height),
                direction: object.direction,
            });
        }
    }

    let life = crate::consts::EXPLOSION_TICKS as f32;
    FrameView {
        aircraft: to_screen(&window, state.aircraft.lateral, state.aircraft_depth()),
        aircraft_size: DVec2::new(state.aircraft.width, state.aircraft.height),
        aircraft_visible: state.phase != GamePhase::Crashed,
        bullets: state
            .bullets
            .iter()
            .map(|b| to_screen(&window, b.lateral, b.depth))
            .collect(),
        river,
        obstacles,
        bridges,
        explosions: state
            .explosions
            .iter()
            .map(|e| Blast {
                kind: e.kind,
                pos: to_screen(&window, e.lateral, e.depth),
                life: e.ttl_ticks as f32 / life,
            })
            .collect(),
        hud: Hud {
            fuel: state.fuel,
            fuel_max: state.settings.fuel.max,
            speed: state.speed,
            score: state.score,
            best_score: state.best_score,
            lap: state.lap,
            running: state.running(),
        },
    }
}
