//! Condor - a rotating, climbing swing tower ride controller
//!
//! Core modules:
//! - `sim`: Deterministic ride simulation (timing curves, phase machine, vehicle sync)
//! - `ride`: Ride records, ride-type descriptors and the per-tick entry point
//! - `park`: Ride dispatch and the paint pass
//! - `paint`: Read-only sprite placement from the published pose
//! - `track`: Tile elements and tower geometry
//! - `settings`: Data-driven ride tuning

pub mod entity;
pub mod paint;
pub mod park;
pub mod ride;
pub mod settings;
pub mod sim;
pub mod track;

pub use park::Park;
pub use ride::{CondorConfig, Ride, RideId, RideType};
pub use settings::{CondorSettings, IntensityPreset, SettingsError};

/// Ride configuration constants
pub mod consts {
    /// Number of radial arms (one car each)
    pub const ARMS: usize = 4;
    /// Arm sprites per quarter turn
    pub const ARM_SPRITE_COUNT: u32 = 16;
    /// Spin sprites per car
    pub const CAR_SPRITE_COUNT: u32 = 8;
    /// Upper limit for either sprite count
    pub const MAX_SPRITE_COUNT: u32 = 256;
    /// Ticks spent spinning at the top of the tower
    pub const SPINNING_TOP_TIME: u32 = 120;
    /// Distance from the tower centre to each car (world units)
    pub const ARM_RADIUS: f32 = 48.0;
    /// World units per map tile
    pub const TILE_SIZE: i32 = 32;
}
