//! River terrain: segments, obstacles and the procedural generator
//!
//! Segments are laid end to end along the depth axis. Each one linearly
//! interpolates its width and owns the obstacles that spawn inside it.
//! Obstacles live in a per-segment arena addressed by [`ObjectId`], so the
//! shape of the river is immutable after generation while obstacle state
//! (destroyed flag, lateral position) can still change during play.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Banks, BridgeSection, bridge_sections};
use super::rng::{FeatureRng, RngKind};
use crate::consts::{BRIDGE_SECTIONS, BRIDGE_SPAN, CLEAR_START_DEPTH, SHARP_JUMP_HIGH, SHARP_JUMP_LOW};
use crate::error::ConfigError;
use crate::lerp;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Decoration on the shoulders, never collides
    Tree,
    /// One per segment, spans the river
    Bridge,
    Helicopter,
    Airplane,
    /// Refuels on contact, cannot be shot for points
    GasStation,
}

impl ObjectKind {
    /// Can be shot down for score
    pub fn is_hostile(self) -> bool {
        matches!(
            self,
            ObjectKind::Bridge | ObjectKind::Helicopter | ObjectKind::Airplane
        )
    }

    /// Takes part in aircraft collision tests
    pub fn is_solid(self) -> bool {
        self != ObjectKind::Tree
    }
}

/// How an obstacle moves once spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    #[default]
    Still,
    /// Bounces between the banks at a fixed depth
    Shuttle,
    /// Crosses the screen once, then self-destructs
    OneWay,
}

/// Lateral heading of a moving obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }

    /// +1 for left-to-right, -1 for right-to-left
    pub fn sign(self) -> f64 {
        match self {
            Direction::Ltr => 1.0,
            Direction::Rtl => -1.0,
        }
    }
}

/// Catalog entry describing one obstacle type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: ObjectKind,
    #[serde(default)]
    pub movement: Movement,
    pub min_count: u32,
    pub max_count: u32,
    pub width: f64,
    pub height: f64,
    /// Lateral speed (units per second) for moving obstacles
    #[serde(default)]
    pub speed: f64,
    /// Points for shooting it down
    #[serde(default)]
    pub score: u64,
    /// Fuel granted per tick of contact
    #[serde(default)]
    pub refuel: i32,
    /// Seed for this category's random source
    pub seed: i64,
}

/// Bridge tuning (bridges are always placed, one per segment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeEntry {
    pub score: u64,
}

/// Everything the generator can place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCatalog {
    pub bridge: BridgeEntry,
    pub entries: Vec<CatalogEntry>,
}

impl ObjectCatalog {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.entries {
            if entry.kind == ObjectKind::Bridge {
                return Err(ConfigError::BridgeInCatalog);
            }
            if entry.min_count > entry.max_count {
                return Err(ConfigError::InvalidCountRange {
                    kind: entry.kind,
                    min: entry.min_count,
                    max: entry.max_count,
                });
            }
            positive("catalog.width", entry.width)?;
            positive("catalog.height", entry.height)?;
            finite("catalog.speed", entry.speed)?;
        }
        Ok(())
    }

    /// Same catalog with every category reseeded for a later lap
    pub fn for_lap(&self, lap: u32) -> Self {
        let mut catalog = self.clone();
        for entry in &mut catalog.entries {
            entry.seed = entry.seed.wrapping_add(lap as i64);
        }
        catalog
    }
}

/// Shape parameters of the generated river
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub screen_width: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub segment_count: u32,
    pub width_seed: i64,
    pub length_seed: i64,
    pub rng: RngKind,
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("screen_width", self.screen_width)?;
        positive("min_width", self.min_width)?;
        positive("min_length", self.min_length)?;
        finite("max_width", self.max_width)?;
        finite("max_length", self.max_length)?;
        if self.min_width > self.max_width {
            return Err(ConfigError::InvalidWidthRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        if self.min_length > self.max_length {
            return Err(ConfigError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.segment_count == 0 {
            return Err(ConfigError::NoSegments);
        }
        if self.max_width > self.screen_width {
            return Err(ConfigError::RiverWiderThanScreen {
                max_width: self.max_width,
                screen_width: self.screen_width,
            });
        }
        Ok(())
    }

    /// Same shape parameters reseeded for a later lap
    pub fn for_lap(&self, lap: u32) -> Self {
        Self {
            width_seed: self.width_seed.wrapping_add(lap as i64),
            length_seed: self.length_seed.wrapping_add(lap as i64),
            ..self.clone()
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// A single obstacle instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    pub kind: ObjectKind,
    pub movement: Movement,
    /// Centre depth
    pub depth: f64,
    /// Centre lateral position
    pub lateral: f64,
    pub width: f64,
    pub height: f64,
    pub destroyed: bool,
    pub direction: Option<Direction>,
    pub speed: f64,
    pub score: u64,
    pub refuel: i32,
    /// Hit and render geometry, bridges only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<BridgeSection>,
    spawn_lateral: f64,
    spawn_direction: Option<Direction>,
}

impl GameObject {
    /// Instance of a catalog entry at the given position
    pub fn from_entry(entry: &CatalogEntry, depth: f64, lateral: f64, direction: Option<Direction>) -> Self {
        Self {
            kind: entry.kind,
            movement: entry.movement,
            depth,
            lateral,
            width: entry.width,
            height: entry.height,
            destroyed: false,
            direction,
            speed: entry.speed,
            score: entry.score,
            refuel: entry.refuel,
            sections: Vec::new(),
            spawn_lateral: lateral,
            spawn_direction: direction,
        }
    }

    fn bridge(entry: &BridgeEntry, sections: Vec<BridgeSection>) -> Self {
        let near = sections.first().map_or(0.0, |s| s.near_depth());
        let far = sections.last().map_or(0.0, |s| s.far_depth());
        let left = sections
            .iter()
            .flat_map(|s| s.corners.iter().map(|c| c.x))
            .fold(f64::INFINITY, f64::min);
        let right = sections
            .iter()
            .flat_map(|s| s.corners.iter().map(|c| c.x))
            .fold(f64::NEG_INFINITY, f64::max);
        let lateral = (left + right) / 2.0;
        Self {
            kind: ObjectKind::Bridge,
            movement: Movement::Still,
            depth: (near + far) / 2.0,
            lateral,
            width: right - left,
            height: far - near,
            destroyed: false,
            direction: None,
            speed: 0.0,
            score: entry.score,
            refuel: 0,
            sections,
            spawn_lateral: lateral,
            spawn_direction: None,
        }
    }

    /// Bounding box in world space
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(
            DVec2::new(self.lateral, self.depth),
            DVec2::new(self.width, self.height),
        )
    }

    /// Depth at which reaching the bridge is fatal (its near cross-section)
    pub fn threshold_depth(&self) -> f64 {
        self.sections
            .first()
            .map_or(self.depth - self.height / 2.0, |s| s.near_depth())
    }

    /// Far edge depth
    pub fn far_depth(&self) -> f64 {
        self.depth + self.height / 2.0
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// Back to the freshly generated state
    pub fn reset(&mut self) {
        self.destroyed = false;
        self.lateral = self.spawn_lateral;
        self.direction = self.spawn_direction;
    }
}

/// A span of river with linearly interpolated width
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiverSegment {
    /// Sum of the lengths of all earlier segments
    pub offset: f64,
    pub length: f64,
    pub start_width: f64,
    pub end_width: f64,
    pub objects: Vec<GameObject>,
}

impl RiverSegment {
    #[inline]
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }

    pub fn is_taper(&self) -> bool {
        self.start_width != self.end_width
    }

    /// Interpolated width; depths outside the segment clamp to its ends
    pub fn width_at(&self, depth: f64) -> f64 {
        let t = ((depth - self.offset) / self.length).clamp(0.0, 1.0);
        lerp(self.start_width, self.end_width, t)
    }
}

/// Index of an obstacle in the terrain arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    pub segment: usize,
    pub index: usize,
}

/// Generated river: contiguous segments plus their obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub screen_width: f64,
    pub segments: Vec<RiverSegment>,
    pub total_length: f64,
}

impl Terrain {
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.segments.get(id.segment)?.objects.get(id.index)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.segments.get_mut(id.segment)?.objects.get_mut(id.index)
    }

    /// Ids of every obstacle in the given segments
    pub fn object_ids(&self, segments: std::ops::Range<usize>) -> impl Iterator<Item = ObjectId> + '_ {
        let end = segments.end.min(self.segments.len());
        let start = segments.start.min(end);
        (start..end).flat_map(move |segment| {
            (0..self.segments[segment].objects.len()).map(move |index| ObjectId { segment, index })
        })
    }

    /// Restore every obstacle to its generated state
    pub fn reset_objects(&mut self) {
        for segment in &mut self.segments {
            for object in &mut segment.objects {
                object.reset();
            }
        }
    }

    pub fn object_count(&self) -> usize {
        self.segments.iter().map(|s| s.objects.len()).sum()
    }
}

/// Build a river from shape parameters and an obstacle catalog.
///
/// Width changes are either abrupt jumps or short ramps: after a taper the
/// river always runs flat for a segment, and a taper is always `min_length`
/// long.
pub fn generate(params: &TerrainParams, catalog: &ObjectCatalog) -> Result<Terrain, ConfigError> {
    let mut terrain = Terrain {
        screen_width: params.screen_width,
        segments: Vec::with_capacity(params.segment_count as usize),
        total_length: 0.0,
    };
    terrain.extend(params, catalog)?;
    Ok(terrain)
}

impl Terrain {
    /// Append `segment_count` freshly generated segments at the current end.
    ///
    /// The first new segment runs flat at the previous end width, so the
    /// banks never jump at the seam. Existing segments are left untouched.
    pub fn extend(&mut self, params: &TerrainParams, catalog: &ObjectCatalog) -> Result<(), ConfigError> {
        params.validate()?;
        catalog.validate()?;

        let mut width_rng = FeatureRng::new(params.rng, params.width_seed);
        let mut length_rng = FeatureRng::new(params.rng, params.length_seed);
        let mut object_rngs: Vec<FeatureRng> = catalog
            .entries
            .iter()
            .map(|entry| FeatureRng::new(params.rng, entry.seed))
            .collect();

        let (min_w, max_w) = (params.min_width, params.max_width);
        let first = self.segments.len();
        let mut offset = self.total_length;

        for i in 0..params.segment_count as usize {
            let mut length = length_rng.whole_span(params.min_length, params.max_length);

            let (start_width, end_width) = match self.segments.last() {
                None => {
                    let w = width_rng.whole_inclusive(min_w, max_w);
                    (w, w)
                }
                Some(prev) if i == 0 => {
                    // Keep the draw so a stretch lays out the same wherever it starts
                    width_rng.whole_inclusive(min_w, max_w);
                    (prev.end_width, prev.end_width)
                }
                Some(prev) if prev.is_taper() => (prev.end_width, prev.end_width),
                Some(prev) => {
                    let r = width_rng.next_unit();
                    if r > SHARP_JUMP_LOW && r < SHARP_JUMP_HIGH {
                        let w = width_rng.whole_inclusive(min_w, max_w);
                        (w, w)
                    } else {
                        length = params.min_length;
                        (prev.end_width, width_rng.whole_inclusive(min_w, max_w))
                    }
                }
            };

            let mut segment = RiverSegment {
                offset,
                length,
                start_width,
                end_width,
                objects: Vec::new(),
            };

            let bridge_start = offset + length / 2.0 - BRIDGE_SPAN / 2.0;
            let sections = bridge_sections(bridge_start, BRIDGE_SPAN, BRIDGE_SECTIONS, |d| {
                Banks::centered(params.screen_width, segment.width_at(d))
            });
            let bridge = GameObject::bridge(&catalog.bridge, sections);
            segment.objects.push(bridge);

            let clear_from = if i == 0 { offset + CLEAR_START_DEPTH } else { offset };
            for (entry, rng) in catalog.entries.iter().zip(object_rngs.iter_mut()) {
                let count = rng.count(entry.min_count, entry.max_count);
                if clear_from >= segment.end() {
                    continue;
                }
                for _ in 0..count {
                    let object = place(entry, rng, &segment, clear_from, params.screen_width);
                    segment.objects.push(object);
                }
            }

            offset += length;
            self.segments.push(segment);
        }
        self.total_length = offset;

        log::info!(
            "Generated river: {} segments from depth {}, length now {}, {} obstacles",
            self.segments.len() - first,
            self.segments[first..].first().map_or(0.0, |s| s.offset),
            self.total_length,
            self.segments[first..].iter().map(|s| s.objects.len()).sum::<usize>()
        );
        Ok(())
    }
}

/// Draw a position for one obstacle inside `segment`
fn place(
    entry: &CatalogEntry,
    rng: &mut FeatureRng,
    segment: &RiverSegment,
    from_depth: f64,
    screen_width: f64,
) -> GameObject {
    let depth = rng.uniform(from_depth, segment.end());
    let banks = Banks::centered(screen_width, segment.width_at(depth));
    let half = entry.width / 2.0;

    let within = |rng: &mut FeatureRng, lo: f64, hi: f64| {
        if hi - lo >= entry.width {
            rng.uniform(lo + half, hi - half)
        } else {
            (lo + hi) / 2.0
        }
    };

    let (lateral, direction) = match entry.movement {
        Movement::Still if entry.kind == ObjectKind::Tree => {
            let lateral = if rng.coin() {
                within(&mut *rng, 0.0, banks.left)
            } else {
                within(&mut *rng, banks.right, screen_width)
            };
            (lateral, None)
        }
        Movement::Still => (within(&mut *rng, banks.left, banks.right), None),
        Movement::Shuttle => {
            let lateral = if rng.coin() {
                banks.left + half
            } else {
                banks.right - half
            };
            let direction = if rng.coin() { Direction::Ltr } else { Direction::Rtl };
            (lateral, Some(direction))
        }
        Movement::OneWay => {
            if rng.coin() {
                (half, Some(Direction::Ltr))
            } else {
                (screen_width - half, Some(Direction::Rtl))
            }
        }
    };

    GameObject::from_entry(entry, depth, lateral, direction)
}
