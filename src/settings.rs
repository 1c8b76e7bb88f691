//! Game settings and tuning
//!
//! Everything the simulation needs to know up front: river shape, obstacle
//! catalog, fuel, speed, aircraft and bullet parameters. Loadable from JSON;
//! missing fields fall back to the tuned defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{
    BridgeEntry, CatalogEntry, Movement, ObjectCatalog, ObjectKind, RngKind, TerrainParams,
};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Extra hostiles per segment on top of the catalog maximum
    pub fn extra_hostiles(&self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 0,
            Difficulty::Hard => 2,
        }
    }

    /// Fuel burned per drain tick
    pub fn fuel_drain(&self) -> i32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftSettings {
    pub width: f64,
    pub height: f64,
    /// Distance of the aircraft centre above the bottom of the screen
    pub depth_offset: f64,
    /// Largest lateral move accepted per tick
    pub max_lateral_step: f64,
}

impl Default for AircraftSettings {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            depth_offset: 120.0,
            max_lateral_step: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelSettings {
    pub init: i32,
    pub max: i32,
    /// At or below this the low-fuel warning fires
    pub low: i32,
    /// Units burned once per second
    pub drain: i32,
}

impl Default for FuelSettings {
    fn default() -> Self {
        Self {
            init: 100,
            max: 100,
            low: 20,
            drain: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Starting speed and the baseline decay pulls toward (depth units/second)
    pub init: f64,
    pub min: f64,
    pub max: f64,
    /// Step toward baseline ten times per second
    pub decay_step: f64,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            init: 120.0,
            min: 60.0,
            max: 320.0,
            decay_step: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    pub width: f64,
    pub height: f64,
    /// Depth advanced per tick
    pub step: f64,
    /// Ticks between shots while fire is held
    pub fire_interval_ticks: u32,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 12.0,
            step: 8.0,
            fire_interval_ticks: 6,
        }
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            min_width: 120.0,
            max_width: 320.0,
            min_length: 600.0,
            max_length: 1500.0,
            segment_count: 40,
            width_seed: 1234,
            length_seed: 5678,
            rng: RngKind::Sine,
        }
    }
}

impl Default for ObjectCatalog {
    fn default() -> Self {
        Self {
            bridge: BridgeEntry { score: 500 },
            entries: vec![
                CatalogEntry {
                    kind: ObjectKind::Tree,
                    movement: Movement::Still,
                    min_count: 2,
                    max_count: 6,
                    width: 30.0,
                    height: 30.0,
                    speed: 0.0,
                    score: 0,
                    refuel: 0,
                    seed: 11,
                },
                CatalogEntry {
                    kind: ObjectKind::Helicopter,
                    movement: Movement::Shuttle,
                    min_count: 0,
                    max_count: 2,
                    width: 40.0,
                    height: 24.0,
                    speed: 60.0,
                    score: 60,
                    refuel: 0,
                    seed: 22,
                },
                CatalogEntry {
                    kind: ObjectKind::GasStation,
                    movement: Movement::Still,
                    min_count: 0,
                    max_count: 1,
                    width: 30.0,
                    height: 50.0,
                    speed: 0.0,
                    score: 0,
                    refuel: 1,
                    seed: 33,
                },
                CatalogEntry {
                    kind: ObjectKind::Airplane,
                    movement: Movement::OneWay,
                    min_count: 0,
                    max_count: 1,
                    width: 44.0,
                    height: 20.0,
                    speed: 120.0,
                    score: 100,
                    refuel: 0,
                    seed: 44,
                },
            ],
        }
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub viewport_height: f64,
    pub terrain: TerrainParams,
    pub catalog: ObjectCatalog,
    pub aircraft: AircraftSettings,
    pub fuel: FuelSettings,
    pub speed: SpeedSettings,
    pub bullet: BulletSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            viewport_height: 800.0,
            terrain: TerrainParams::default(),
            catalog: ObjectCatalog::default(),
            aircraft: AircraftSettings::default(),
            fuel: FuelSettings::default(),
            speed: SpeedSettings::default(),
            bullet: BulletSettings::default(),
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset on top of the current tuning
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.fuel.drain = preset.fuel_drain();
        let extra = preset.extra_hostiles();
        for entry in &mut self.catalog.entries {
            if entry.kind.is_hostile() {
                entry.max_count = entry.max_count.saturating_add(extra);
            }
        }
    }

    #[inline]
    pub fn screen_width(&self) -> f64 {
        self.terrain.screen_width
    }

    /// Reject tuning the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.catalog.validate()?;

        for (field, value) in [
            ("viewport_height", self.viewport_height),
            ("aircraft.width", self.aircraft.width),
            ("aircraft.height", self.aircraft.height),
            ("aircraft.max_lateral_step", self.aircraft.max_lateral_step),
            ("bullet.width", self.bullet.width),
            ("bullet.height", self.bullet.height),
            ("bullet.step", self.bullet.step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !self.aircraft.depth_offset.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "aircraft.depth_offset",
            });
        }

        let speed = &self.speed;
        if !(speed.min.is_finite() && speed.init.is_finite() && speed.max.is_finite())
            || speed.min < 0.0
            || speed.min > speed.init
            || speed.init > speed.max
        {
            return Err(ConfigError::InvalidSpeedRange {
                min: speed.min,
                init: speed.init,
                max: speed.max,
            });
        }
        if !speed.decay_step.is_finite() || speed.decay_step < 0.0 {
            return Err(ConfigError::NonFinite {
                field: "speed.decay_step",
            });
        }

        let fuel = &self.fuel;
        if fuel.init <= 0 || fuel.init > fuel.max {
            return Err(ConfigError::InvalidFuelRange {
                init: fuel.init,
                max: fuel.max,
            });
        }
        if fuel.drain < 0 {
            return Err(ConfigError::NegativeFuelDrain { drain: fuel.drain });
        }
        if fuel.low < 0 || fuel.low > fuel.max {
            return Err(ConfigError::InvalidFuelLow {
                low: fuel.low,
                max: fuel.max,
            });
        }
        Ok(())
    }

    /// Parse and validate JSON settings
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Settings::default().validate().unwrap();
        for preset in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            Settings::from_preset(preset).validate().unwrap();
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "viewport_height": 600, "fuel": { "init": 50 } }"#)
            .unwrap();
        assert_eq!(settings.viewport_height, 600.0);
        assert_eq!(settings.fuel.init, 50);
        assert_eq!(settings.fuel.max, FuelSettings::default().max);
        assert_eq!(settings.terrain.segment_count, 40);
        assert_eq!(settings.catalog.entries.len(), 4);
    }

    #[test]
    fn test_json_roundtrip_preserves_catalog() {
        let settings = Settings::from_preset(Difficulty::Hard);
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.catalog.entries[1].kind, ObjectKind::Helicopter);
        assert_eq!(back.catalog.entries[1].movement, Movement::Shuttle);
        assert_eq!(back.catalog.entries[1].max_count, 4);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "terrain": { "min_width": 400, "max_width": 100 } }"#),
            Err(ConfigError::InvalidWidthRange { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "speed": { "min": 200, "init": 100 } }"#),
            Err(ConfigError::InvalidSpeedRange { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "fuel": { "init": 0 } }"#),
            Err(ConfigError::InvalidFuelRange { .. })
        ));
        assert!(matches!(Settings::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_fuel_tuning_is_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "fuel": { "drain": -3 } }"#),
            Err(ConfigError::NegativeFuelDrain { drain: -3 })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "fuel": { "low": -1 } }"#),
            Err(ConfigError::InvalidFuelLow { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "fuel": { "low": 500 } }"#),
            Err(ConfigError::InvalidFuelLow { low: 500, max: 100 })
        ));
        // Extreme but valid drain empties the tank without overflowing
        Settings::from_json(&format!(r#"{{ "fuel": {{ "drain": {} }} }}"#, i32::MAX)).unwrap();
    }

    #[test]
    fn test_preset_on_huge_counts_saturates() {
        let mut settings = Settings::default();
        settings.catalog.entries[1].max_count = u32::MAX;
        settings.apply_preset(Difficulty::Hard);
        assert_eq!(settings.catalog.entries[1].max_count, u32::MAX);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load("/nonexistent/river-raid/settings.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("insane"), None);
        assert_eq!(Difficulty::Easy.as_str(), "Easy");
    }
}
