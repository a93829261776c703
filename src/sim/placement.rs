//! Rejection-sampling placement
//!
//! Draws uniformly random top-left corners until one is at least
//! `min_distance` away from every existing object and overlaps none of them.
//! The first accepted draw wins; the attempt budget keeps an overcrowded room
//! from spinning forever.

use super::geometry::BoundingBox;
use super::random::RandomSource;
use super::state::SimulationState;
use crate::error::SimError;

/// Placement constraints for one room
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    pub bounds_width: i32,
    pub bounds_height: i32,
    pub min_distance: f64,
    pub max_attempts: u32,
}

impl Sampler {
    pub fn new(bounds_width: i32, bounds_height: i32, min_distance: f64, max_attempts: u32) -> Self {
        Self {
            bounds_width,
            bounds_height,
            min_distance,
            max_attempts,
        }
    }

    /// Sampler for the live play area of a run
    pub fn for_state(state: &SimulationState) -> Self {
        Self::new(
            state.width(),
            state.height(),
            f64::from(state.settings().min_distance),
            state.settings().placement_attempts,
        )
    }

    /// Place a `width x height` box away from `existing`
    pub fn place(
        &self,
        rng: &mut dyn RandomSource,
        width: i32,
        height: i32,
        existing: &[BoundingBox],
    ) -> Result<BoundingBox, SimError> {
        let max_x = self.bounds_width - width;
        let max_y = self.bounds_height - height;
        if max_x < 0 || max_y < 0 {
            return Err(SimError::BoxTooLarge {
                width,
                height,
                bounds_width: self.bounds_width,
                bounds_height: self.bounds_height,
            });
        }

        for _ in 0..self.max_attempts {
            let candidate = BoundingBox::new(rng.between(0, max_x), rng.between(0, max_y), width, height);
            let clear = existing
                .iter()
                .all(|obj| candidate.distance_to(obj) >= self.min_distance && !candidate.intersects(obj));
            if clear {
                return Ok(candidate);
            }
        }

        log::warn!(
            "Placement gave up after {} attempts ({} objects, min distance {})",
            self.max_attempts,
            existing.len(),
            self.min_distance
        );
        Err(SimError::PlacementExhausted {
            attempts: self.max_attempts,
        })
    }
}
