//! Deterministic random sources for terrain generation
//!
//! Every feature category (segment widths, segment lengths, each obstacle
//! type) owns its own instance, so tuning the density of one category never
//! shifts the sequence another category consumes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Largest f64 strictly below 1.0
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Which generator backs a [`FeatureRng`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngKind {
    /// Sine recurrence, reproduces historical layouts bit-for-bit
    #[default]
    Sine,
    /// PCG32, better distribution, different layouts
    Pcg,
}

/// The sine recurrence `x = sin(x) * 10000`, returning the fractional part.
///
/// Not uniform and not meant to be. A seed of 0 is a fixed point and yields
/// an all-zero sequence.
#[derive(Debug, Clone)]
pub struct SineRandom {
    x: f64,
}

impl SineRandom {
    pub fn new(seed: i64) -> Self {
        Self {
            x: (seed as f64).sin() * 10000.0,
        }
    }

    pub fn next_unit(&mut self) -> f64 {
        self.x = self.x.sin() * 10000.0;
        (self.x - self.x.floor()).min(BELOW_ONE)
    }
}

/// A seeded per-category source of values in [0, 1)
#[derive(Debug, Clone)]
pub enum FeatureRng {
    Sine(SineRandom),
    Pcg(Pcg32),
}

impl FeatureRng {
    pub fn new(kind: RngKind, seed: i64) -> Self {
        match kind {
            RngKind::Sine => FeatureRng::Sine(SineRandom::new(seed)),
            RngKind::Pcg => FeatureRng::Pcg(Pcg32::seed_from_u64(seed as u64)),
        }
    }

    /// Next value in [0, 1)
    pub fn next_unit(&mut self) -> f64 {
        match self {
            FeatureRng::Sine(rng) => rng.next_unit(),
            FeatureRng::Pcg(rng) => rng.random::<f64>(),
        }
    }

    /// Whole-unit value in [min, max], both ends reachable when whole.
    ///
    /// Fractional bounds shrink to the whole numbers inside them; a band with
    /// no whole number in it falls back to a real draw.
    pub fn whole_inclusive(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = (min.ceil(), max.floor());
        if lo > hi {
            return self.uniform(min, max);
        }
        ((self.next_unit() * (hi - lo + 1.0)).floor() + lo).min(hi)
    }

    /// Whole-unit value in [min, max), or exactly `min` when the range is empty
    pub fn whole_span(&mut self, min: f64, max: f64) -> f64 {
        min + ((max - min) * self.next_unit()).floor()
    }

    /// Count in [min, max]
    pub fn count(&mut self, min: u32, max: u32) -> u32 {
        let span = max.saturating_sub(min) as f64 + 1.0;
        min + (self.next_unit() * span).floor() as u32
    }

    /// Real value in [lo, hi), or `lo` when the range is empty
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (lo + (hi - lo) * self.next_unit()).clamp(lo, hi.max(lo))
    }

    /// Fair coin
    pub fn coin(&mut self) -> bool {
        self.next_unit() < 0.5
    }
}
