//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded random sources only, one per terrain feature category
//! - Stable iteration order (segment order, then arena index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod geometry;
pub mod rng;
pub mod scroll;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Contact, check_aircraft, check_banks, resolve};
pub use geometry::{Aabb, Banks, BridgeSection, SectionTint};
pub use rng::{FeatureRng, RngKind, SineRandom};
pub use scroll::{Window, to_screen_y};
pub use state::{Aircraft, Bullet, CrashCause, Explosion, GameEvent, GamePhase, GameState};
pub use terrain::{
    BridgeEntry, CatalogEntry, Direction, GameObject, Movement, ObjectCatalog, ObjectId,
    ObjectKind, RiverSegment, Terrain, TerrainParams, generate,
};
pub use tick::{TickInput, tick};
