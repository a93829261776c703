//! Error types shared by the simulation, settings and persistence layers

use thiserror::Error;

/// Errors surfaced to whoever sets up or drives a run
#[derive(Debug, Error)]
pub enum SimError {
    /// A validated setter or constructor rejected its input
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The placement sampler gave up (room too dense for its distance constraint)
    #[error("no valid placement found after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    /// The requested box cannot fit inside the bounds at all
    #[error("box {width}x{height} does not fit in {bounds_width}x{bounds_height}")]
    BoxTooLarge {
        width: i32,
        height: i32,
        bounds_width: i32,
        bounds_height: i32,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
