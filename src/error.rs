//! Configuration errors
//!
//! The simulation itself never fails: crashes are game states. Only malformed
//! tuning is rejected, and it is rejected up front.

use thiserror::Error;

use crate::sim::ObjectKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("river width range is empty: min {min} > max {max}")]
    InvalidWidthRange { min: f64, max: f64 },

    #[error("segment length range is empty: min {min} > max {max}")]
    InvalidLengthRange { min: f64, max: f64 },

    #[error("terrain needs at least one segment")]
    NoSegments,

    #[error("river max width {max_width} exceeds screen width {screen_width}")]
    RiverWiderThanScreen { max_width: f64, screen_width: f64 },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("`{field}` must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{kind:?} count range is empty: min {min} > max {max}")]
    InvalidCountRange { kind: ObjectKind, min: u32, max: u32 },

    #[error("bridges are placed once per segment and cannot appear in the object catalog")]
    BridgeInCatalog,

    #[error("speed bounds are inconsistent: min {min}, init {init}, max {max}")]
    InvalidSpeedRange { min: f64, init: f64, max: f64 },

    #[error("fuel bounds are inconsistent: init {init}, max {max}")]
    InvalidFuelRange { init: i32, max: i32 },

    #[error("fuel drain must not be negative (got {drain})")]
    NegativeFuelDrain { drain: i32 },

    #[error("low-fuel level {low} must lie within [0, {max}]")]
    InvalidFuelLow { low: i32, max: i32 },

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
