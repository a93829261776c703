//! Run-mode simulation
//!
//! All gameplay logic lives here. This module stays free of I/O:
//! - Fixed timestep only, every countdown is a tick count
//! - Randomness only through an injected `RandomSource`
//! - Aliens act in spawn order
//! - No rendering, input devices or storage

pub mod aliens;
pub mod geometry;
pub mod placement;
pub mod powerups;
pub mod random;
pub mod state;
pub mod tick;

pub use aliens::{Behavior, behavior_for, spawn_alien};
pub use geometry::{BoundingBox, distance, intersects};
pub use placement::Sampler;
pub use powerups::{Bag, PowerUp, PowerUpKind, collect_power_up, hint_target, use_hint, use_protection_vest};
pub use random::{RandomSource, Scripted, seeded};
pub use state::{
    Alien, AlienKind, Door, Key, Outcome, Player, Room, RoomAdvance, SimulationState, TimeBracket,
};
pub use tick::{GameEndListener, TickInput, pickup_key, step, toggle_pause};
