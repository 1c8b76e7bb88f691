//! Planar geometry in world space
//!
//! `x` is lateral position across the screen, `y` is depth along the river.
//! Depth grows away from the aircraft.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// River banks at a single depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Banks {
    pub left: f64,
    pub right: f64,
}

impl Banks {
    /// A river of `width` centred on a screen of `screen_width`
    pub fn centered(screen_width: f64, width: f64) -> Self {
        let left = (screen_width - width) / 2.0;
        Self {
            left,
            right: left + width,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Whether a body of half-width `half` centred at `lateral` fits between the banks
    pub fn admits(&self, lateral: f64, half: f64) -> bool {
        lateral >= self.left + half && lateral <= self.right - half
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Colour band of a bridge cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionTint {
    /// First and last section
    Girder,
    PierLight,
    PierDark,
}

/// One quad slice of a bridge, corners in world space ordered
/// near-left, near-right, far-right, far-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeSection {
    pub corners: [DVec2; 4],
    pub tint: SectionTint,
}

impl BridgeSection {
    /// Depth of the near edge
    pub fn near_depth(&self) -> f64 {
        self.corners[0].y
    }

    /// Depth of the far edge
    pub fn far_depth(&self) -> f64 {
        self.corners[2].y
    }
}

/// Slice a bridge spanning `[start, start + span)` into `sections` stacked quads
/// whose edges follow the banks returned by `banks_at`.
pub fn bridge_sections<F>(start: f64, span: f64, sections: usize, banks_at: F) -> Vec<BridgeSection>
where
    F: Fn(f64) -> Banks,
{
    let step = span / sections as f64;
    (0..sections)
        .map(|i| {
            let near = start + step * i as f64;
            let far = near + step;
            let (nb, fb) = (banks_at(near), banks_at(far));
            let tint = if i == 0 || i + 1 == sections {
                SectionTint::Girder
            } else if i % 2 == 1 {
                SectionTint::PierLight
            } else {
                SectionTint::PierDark
            };
            BridgeSection {
                corners: [
                    DVec2::new(nb.left, near),
                    DVec2::new(nb.right, near),
                    DVec2::new(fb.right, far),
                    DVec2::new(fb.left, far),
                ],
                tint,
            }
        })
        .collect()
}
