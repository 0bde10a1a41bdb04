//! Road Rush - A lane-based endless runner
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, motion, collisions, run and biome state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences snapshot
//! - `persistence`: Named scalar storage
//! - `profile`: Lifetime counters (high score, currency)
//! - `garage`: Cosmetic car catalog and unlocks
//! - `audio`: Sound effect / ambient track routing

pub mod audio;
pub mod garage;
pub mod persistence;
pub mod profile;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use profile::Profile;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one road frame per tick)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Track dimensions (points)
    pub const TRACK_WIDTH: f32 = 390.0;
    pub const TRACK_HEIGHT: f32 = 844.0;

    /// Lane layout
    pub const LANE_COUNT: usize = 6;

    /// Car defaults - car sits near the trailing edge
    pub const CAR_WIDTH: f32 = 50.0;
    pub const CAR_HEIGHT: f32 = 80.0;
    pub const CAR_Y: f32 = 100.0;

    /// Coins, cash and powerups share one footprint
    pub const COLLECTIBLE_SIZE: f32 = 30.0;

    /// Obstacle base footprint (scaled per kind)
    pub const OBSTACLE_BASE_LENGTH: f32 = 50.0;
    /// Fraction of the occupied lane span an obstacle actually covers
    pub const OBSTACLE_WIDTH_FILL: f32 = 0.8;

    /// Number of road segments cycling under the track
    pub const ROAD_SEGMENTS: usize = 2;
}

/// Axis-aligned overlap test for two centered rectangles
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let d = (a_pos - b_pos).abs();
    let half = (a_size + b_size) * 0.5;
    d.x < half.x && d.y < half.y
}
