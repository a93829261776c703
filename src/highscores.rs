//! High score leaderboard
//!
//! Finished runs ranked best first: escapes beat losses, then more buildings
//! cleared, more lives left and finally fewer ticks. Stored as the `scores`
//! collection of a [`DataStore`], tracks top 10.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SimError;
use crate::persistence::DataStore;
use crate::sim::SimulationState;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Collection holding one record per finished run
pub const SCORES_COLLECTION: &str = "scores";

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub won: bool,
    /// Buildings left through the door
    pub rooms_cleared: usize,
    pub lives_left: u32,
    /// Simulated ticks the run took
    pub ticks: u64,
    /// Unix timestamp (ms) when recorded
    pub timestamp: u64,
}

impl RunRecord {
    /// Summarize a run; `None` until it has ended
    pub fn from_state(state: &SimulationState) -> Option<Self> {
        let outcome = state.outcome()?;
        let rooms_cleared = if outcome.won() {
            state.rooms().len()
        } else {
            state.current_room_index()
        };
        Some(Self {
            won: outcome.won(),
            rooms_cleared,
            lives_left: state.player().lives,
            ticks: state.frames(),
            timestamp: now_ms(),
        })
    }

    /// Leaderboard ordering, `Less` means `self` ranks higher
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .won
            .cmp(&self.won)
            .then(other.rooms_cleared.cmp(&self.rooms_cleared))
            .then(other.lives_left.cmp(&self.lives_left))
            .then(self.ticks.cmp(&other.ticks))
    }

    fn beats(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a run makes the leaderboard
    pub fn qualifies(&self, record: &RunRecord) -> bool {
        if record.rooms_cleared == 0 && !record.won {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|last| record.beats(last))
    }

    /// Rank a run would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, record: &RunRecord) -> Option<usize> {
        if !self.qualifies(record) {
            return None;
        }
        let rank = self.entries.iter().position(|e| record.beats(e));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies, returning its rank
    pub fn add(&mut self, record: RunRecord) -> Option<usize> {
        let rank = self.potential_rank(&record)?;
        self.entries.insert(rank - 1, record);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn best(&self) -> Option<&RunRecord> {
        self.entries.first()
    }

    /// Rebuild the leaderboard from every recorded run
    pub fn load(store: &impl DataStore) -> Result<Self, SimError> {
        let records: Vec<RunRecord> = store.get_collection(SCORES_COLLECTION)?;
        let total = records.len();
        let mut scores = Self::new();
        for record in records {
            scores.add(record);
        }
        log::info!("Loaded {} high scores from {} runs", scores.entries.len(), total);
        Ok(scores)
    }

    /// Persist a finished run and add it to the leaderboard
    pub fn record(&mut self, store: &mut impl DataStore, record: RunRecord) -> Result<Option<usize>, SimError> {
        store.add_to_collection(SCORES_COLLECTION, &record)?;
        let rank = self.add(record);
        if let Some(rank) = rank {
            log::info!("New high score at rank {}", rank);
        }
        Ok(rank)
    }
}
