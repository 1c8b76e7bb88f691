//! Scroll and coordinate mapping
//!
//! `traveled` is the only driver of world position. The visible window is
//! `[traveled, traveled + viewport_height)` in depth; screen y grows downward,
//! so deeper terrain sits higher on screen and the world scrolls down past
//! the stationary aircraft.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::geometry::Banks;
use super::terrain::{ObjectId, RiverSegment, Terrain};

/// The slice of terrain currently on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Segments whose span intersects the view
    pub segments: Range<usize>,
    /// Depth at the bottom edge of the screen
    pub traveled: f64,
    pub viewport_height: f64,
}

impl Window {
    /// Depth at the top edge of the screen
    #[inline]
    pub fn far_depth(&self) -> f64 {
        self.traveled + self.viewport_height
    }

    /// World depth to screen y
    #[inline]
    pub fn to_screen_y(&self, depth: f64) -> f64 {
        to_screen_y(depth, self.traveled, self.viewport_height)
    }

    /// Whether something centred at `depth` with half-height `half` is on screen
    pub fn shows(&self, depth: f64, half: f64) -> bool {
        depth + half > self.traveled && depth - half < self.far_depth()
    }

    /// Every obstacle owned by a visible segment
    pub fn object_ids<'a>(&self, terrain: &'a Terrain) -> impl Iterator<Item = ObjectId> + 'a {
        terrain.object_ids(self.segments.clone())
    }
}

/// `viewport_bottom - (depth - traveled)`
#[inline]
pub fn to_screen_y(depth: f64, traveled: f64, viewport_height: f64) -> f64 {
    viewport_height - (depth - traveled)
}

impl Terrain {
    /// Segments intersecting `[traveled, traveled + viewport_height)`.
    ///
    /// Two binary searches over the sorted offsets, so the cost does not
    /// grow with terrain length.
    pub fn window(&self, traveled: f64, viewport_height: f64) -> Window {
        let far = traveled + viewport_height;
        let start = self.segments.partition_point(|s| s.end() <= traveled);
        let end = self.segments.partition_point(|s| s.offset < far).max(start);
        Window {
            segments: start..end,
            traveled,
            viewport_height,
        }
    }

    /// Index of the segment owning `depth`, clamped to the first/last segment
    pub fn segment_index_at(&self, depth: f64) -> usize {
        let idx = self.segments.partition_point(|s| s.end() <= depth);
        idx.min(self.segments.len().saturating_sub(1))
    }

    pub fn segment_at(&self, depth: f64) -> Option<&RiverSegment> {
        self.segments.get(self.segment_index_at(depth))
    }

    /// River banks at `depth`, centred on the screen
    pub fn bank_at(&self, depth: f64) -> Banks {
        let width = self.segment_at(depth).map_or(0.0, |s| s.width_at(depth));
        Banks::centered(self.screen_width, width)
    }
}
