//! SpaceHole Rogue - an ASCII space-exploration roguelike
//!
//! Core modules:
//! - `sim`: Deterministic simulation driver (life support, physics, NPCs, encounters)
//! - `world`: Seeded world generation (sector, star systems, surfaces, stations)
//! - `tile`: Tile grids and equipment shared by every map
//! - `renderer`: Read-only snapshot handed to a renderer between ticks
//! - `platform`: Discrete input commands
//! - `persistence`: Ship layout loading
//! - `settings`: Data-driven startup configuration

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tile;
pub mod world;

pub use settings::Settings;
pub use sim::Sim;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u64 = 60;

    /// Life-support schedule, in ticks. A step fires when `tick % interval == 0`.
    pub const GENERATOR_INTERVAL: u64 = 60;
    pub const RECYCLER_INTAKE_INTERVAL: u64 = 60;
    pub const RECYCLER_PROCESS_INTERVAL: u64 = 100;
    pub const BODY_DIGEST_INTERVAL: u64 = 300;
    pub const BODY_WATER_INTERVAL: u64 = 240;
    pub const HUNGER_INTERVAL: u64 = 480;
    pub const THIRST_INTERVAL: u64 = 300;
    pub const HYGIENE_INTERVAL: u64 = 720;
    pub const WARNING_INTERVAL: u64 = 900;

    /// Maximum matter the player's body can hold (food + water + waste)
    pub const MAX_BODY: i32 = 30;
    /// Upper bound of every need meter
    pub const MAX_NEED: i32 = 100;

    /// Star system plane
    pub const SYSTEM_WIDTH: i32 = 320;
    pub const SYSTEM_HEIGHT: i32 = 160;

    /// Sector map bounds (inclusive)
    pub const SECTOR_MIN_X: i32 = 2;
    pub const SECTOR_MAX_X: i32 = 58;
    pub const SECTOR_MIN_Y: i32 = 2;
    pub const SECTOR_MAX_Y: i32 = 28;

    /// Planetary landing surface
    pub const SURFACE_WIDTH: usize = 40;
    pub const SURFACE_HEIGHT: usize = 25;
    /// Prologue surface
    pub const PROLOGUE_WIDTH: usize = 50;
    pub const PROLOGUE_HEIGHT: usize = 30;

    /// Shuttle kinematics
    pub const SHUTTLE_ACCEL: f32 = 0.005;
    pub const SHUTTLE_MAX_SPEED: f32 = 0.25;
    pub const SHUTTLE_DRAG: f32 = 0.982;
    /// Velocity components below this snap to zero
    pub const VELOCITY_EPSILON: f32 = 0.001;

    /// Chebyshev range (tiles) for landing, docking
    pub const INTERACT_RANGE: i32 = 3;
    /// Chebyshev range (tiles) for hailing a ship
    pub const HAIL_RANGE: i32 = 12;

    /// Message log line width
    pub const LOG_WRAP_COLUMNS: usize = 55;
}

/// Chebyshev (king-move) distance between two tiles
#[inline]
pub fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}
