//! River Raid - a vertically scrolling river-corridor flight game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, scrolling, collisions, game state)
//! - `settings`: Data-driven tuning, loadable from JSON
//! - `view`: Read-only frame snapshot for a renderer
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f64 = 1.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Fuel drains once per second
    pub const FUEL_TICK_INTERVAL: u64 = SIM_HZ as u64;
    /// Speed relaxes toward baseline ten times per second
    pub const SPEED_DECAY_INTERVAL: u64 = SIM_HZ as u64 / 10;

    /// Depth extent of every bridge
    pub const BRIDGE_SPAN: f64 = 100.0;
    /// Number of stacked cross-sections making up a bridge
    pub const BRIDGE_SECTIONS: usize = 10;
    /// Obstacle-free run-up at the start of the first segment
    pub const CLEAR_START_DEPTH: f64 = 200.0;

    /// Width draws inside this open band cause a sharp jump instead of a taper
    pub const SHARP_JUMP_LOW: f64 = 0.45;
    pub const SHARP_JUMP_HIGH: f64 = 0.55;

    /// Lifetime of a destruction effect
    pub const EXPLOSION_TICKS: u32 = 30;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(50.0, 80.0, 0.0), 50.0);
        assert_eq!(lerp(50.0, 80.0, 1.0), 80.0);
        assert_eq!(lerp(50.0, 80.0, 0.5), 65.0);
    }

    #[test]
    fn test_tick_intervals() {
        assert_eq!(consts::FUEL_TICK_INTERVAL, 60);
        assert_eq!(consts::SPEED_DECAY_INTERVAL, 6);
    }
}
