//! Campus Escape - run-mode simulation core
//!
//! Core modules:
//! - `sim`: Per-tick simulation (movement, aliens, spawning, key/door progression)
//! - `session`: Fixed-timestep driver owning a single run
//! - `settings`: Configuration constants, loadable from JSON
//! - `layout`: Default campus buildings
//! - `autopilot`: Scripted player used by the demo binary
//! - `persistence`: Named-collection store (scores live here, never touched by `sim`)
//! - `highscores`: Leaderboard of finished runs

pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod layout;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::{HighScores, RunRecord};
pub use session::{RunEvent, RunSession};
pub use settings::Settings;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Milliseconds in one second (seconds-to-ticks conversion)
    pub const SECOND_MS: u32 = 1000;
    /// Fixed simulation timestep (50 Hz)
    pub const TICK_MS: u32 = 20;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame the session will account for
    pub const MAX_FRAME_MS: u32 = 100;

    /// Play area
    pub const FRAME_WIDTH: i32 = 1000;
    pub const FRAME_HEIGHT: i32 = 640;

    /// Side length of player, door and alien boxes
    pub const ENTITY_DIM: i32 = 40;
    /// Pixels per tick along one axis
    pub const PLAYER_SPEED: i32 = 5;
    pub const STARTING_LIVES: u32 = 3;
    /// Spawn spacing and key pickup reach
    pub const MIN_DISTANCE: i32 = 60;

    /// Room timeout is `objects * ROOM_TIMEOUT_SECS_PER_OBJECT`
    pub const ROOM_TIMEOUT_SECS_PER_OBJECT: u32 = 5;
    pub const ALIEN_INTERVAL_SECS: u32 = 10;
    pub const KEY_DISPLAY_SECS: u32 = 1;
    pub const ALIEN_ACTION_TIMEOUT_MS: u32 = 1000;

    /// Power-ups
    pub const POWER_UP_INTERVAL_SECS: u32 = 12;
    pub const POWER_UP_LIFETIME_SECS: u32 = 6;
    pub const POWER_UP_DIM: i32 = 30;
    pub const EXTRA_TIME_SECS: u32 = 5;
    pub const HINT_SECS: u32 = 10;
    pub const PROTECTION_SECS: u32 = 20;

    /// Retry budgets for rejection loops
    pub const PLACEMENT_ATTEMPTS: u32 = 10_000;
    pub const WANDER_ATTEMPTS: u32 = 64;
}
