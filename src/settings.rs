//! Run configuration
//!
//! Every tunable constant the simulation consumes. Durations are stored in
//! seconds/milliseconds and converted to ticks on demand, so changing `tick_ms`
//! rescales every countdown consistently.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Fixed tick duration in milliseconds
    pub tick_ms: u32,
    /// Milliseconds per second (seconds-to-ticks factor)
    pub second_ms: u32,
    /// Substep cap per frame
    pub max_substeps: u32,
    /// Frame time cap (ms) before substepping
    pub max_frame_ms: u32,

    // === Geometry ===
    pub frame_width: i32,
    pub frame_height: i32,
    pub entity_dim: i32,
    pub player_speed: i32,
    /// Spawn spacing and key pickup reach
    pub min_distance: i32,

    // === Player ===
    pub starting_lives: u32,

    // === Countdowns ===
    pub room_timeout_secs_per_object: u32,
    pub alien_interval_secs: u32,
    pub key_display_secs: u32,
    pub alien_action_timeout_ms: u32,

    // === Power-ups ===
    pub power_up_interval_secs: u32,
    pub power_up_lifetime_secs: u32,
    pub power_up_dim: i32,
    pub extra_time_secs: u32,
    pub hint_secs: u32,
    pub protection_secs: u32,

    // === Retry budgets ===
    pub placement_attempts: u32,
    pub wander_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            second_ms: SECOND_MS,
            max_substeps: MAX_SUBSTEPS,
            max_frame_ms: MAX_FRAME_MS,

            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            entity_dim: ENTITY_DIM,
            player_speed: PLAYER_SPEED,
            min_distance: MIN_DISTANCE,

            starting_lives: STARTING_LIVES,

            room_timeout_secs_per_object: ROOM_TIMEOUT_SECS_PER_OBJECT,
            alien_interval_secs: ALIEN_INTERVAL_SECS,
            key_display_secs: KEY_DISPLAY_SECS,
            alien_action_timeout_ms: ALIEN_ACTION_TIMEOUT_MS,

            power_up_interval_secs: POWER_UP_INTERVAL_SECS,
            power_up_lifetime_secs: POWER_UP_LIFETIME_SECS,
            power_up_dim: POWER_UP_DIM,
            extra_time_secs: EXTRA_TIME_SECS,
            hint_secs: HINT_SECS,
            protection_secs: PROTECTION_SECS,

            placement_attempts: PLACEMENT_ATTEMPTS,
            wander_attempts: WANDER_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Convert whole seconds to ticks
    #[inline]
    pub fn ticks_for_secs(&self, secs: u32) -> u32 {
        secs.saturating_mul(self.second_ms) / self.tick_ms.max(1)
    }

    /// Convert milliseconds to ticks
    #[inline]
    pub fn ticks_for_ms(&self, ms: u32) -> u32 {
        ms / self.tick_ms.max(1)
    }

    /// Room timeout budget: `objects * 5 seconds`, in ticks
    pub fn room_timeout_ticks(&self, object_count: usize) -> u32 {
        let secs = (object_count as u32).saturating_mul(self.room_timeout_secs_per_object);
        self.ticks_for_secs(secs)
    }

    pub fn alien_interval_ticks(&self) -> u32 {
        self.ticks_for_secs(self.alien_interval_secs)
    }

    pub fn key_display_ticks(&self) -> u32 {
        self.ticks_for_secs(self.key_display_secs)
    }

    pub fn alien_action_ticks(&self) -> u32 {
        self.ticks_for_ms(self.alien_action_timeout_ms)
    }

    pub fn power_up_interval_ticks(&self) -> u32 {
        self.ticks_for_secs(self.power_up_interval_secs)
    }

    pub fn power_up_lifetime_ticks(&self) -> u32 {
        self.ticks_for_secs(self.power_up_lifetime_secs)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_ms == 0 {
            return Err(SimError::InvalidArgument("tick_ms must be positive"));
        }
        if self.frame_width <= 0 || self.frame_height <= 0 {
            return Err(SimError::InvalidArgument("frame size must be positive"));
        }
        if self.entity_dim <= 0
            || self.entity_dim > self.frame_width
            || self.entity_dim > self.frame_height
        {
            return Err(SimError::InvalidArgument("entity_dim must fit inside the frame"));
        }
        if self.player_speed < 0 || self.min_distance < 0 {
            return Err(SimError::InvalidArgument("speed and distance must be non-negative"));
        }
        Ok(())
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring settings in {}: {}", path.display(), err),
            },
            Err(err) => log::info!("No settings at {} ({}), using defaults", path.display(), err),
        }
        Self::default()
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tick_conversions() {
        let settings = Settings::default();
        assert_eq!(settings.ticks_for_secs(1), 50);
        assert_eq!(settings.key_display_ticks(), 50);
        assert_eq!(settings.alien_interval_ticks(), 500);
        assert_eq!(settings.room_timeout_ticks(5), 5 * 5 * 50);
        assert_eq!(settings.alien_action_ticks(), 50);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "player_speed": 8, "tick_ms": 10 }"#).unwrap();
        assert_eq!(settings.player_speed, 8);
        assert_eq!(settings.tick_ms, 10);
        assert_eq!(settings.entity_dim, ENTITY_DIM);
        assert_eq!(settings.ticks_for_secs(1), 100);
    }

    #[test]
    fn test_invalid_json_settings_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "tick_ms": 0 }"#),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "frame_width": -5 }"#),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(Settings::from_json("not json"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
