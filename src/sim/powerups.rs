//! Collectible power-ups
//!
//! One spawns every few seconds at a random spot and vanishes if nobody
//! right-clicks it in time. Extra time and extra life apply immediately;
//! hints and protection vests go into the bag for later.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;
use super::placement::Sampler;
use super::random::RandomSource;
use super::state::SimulationState;
use crate::error::SimError;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraTime,
    ExtraLife,
    Hint,
    ProtectionVest,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::ExtraTime,
        PowerUpKind::ExtraLife,
        PowerUpKind::Hint,
        PowerUpKind::ProtectionVest,
    ];

    /// Whether collecting stores it instead of applying it
    pub fn is_stored(&self) -> bool {
        matches!(self, PowerUpKind::Hint | PowerUpKind::ProtectionVest)
    }
}

/// A power-up lying on the floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub bounds: BoundingBox,
    /// Ticks until it disappears
    pub ttl: u32,
}

/// Stored power-ups, carried across rooms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    pub hints: u32,
    pub vests: u32,
}

/// Per-tick power-up bookkeeping: spawn on interval, expire, decay effects
pub fn upkeep(state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    if state.time_for_next_power_up == 0 {
        spawn_power_up(state, rng)?;
        state.reset_time_for_next_power_up();
    }
    state.time_for_next_power_up = state.time_for_next_power_up.saturating_sub(1);

    for power_up in &mut state.power_ups {
        power_up.ttl = power_up.ttl.saturating_sub(1);
    }
    state.power_ups.retain(|p| p.ttl > 0);

    state.hint_effect = state.hint_effect.saturating_sub(1);
    state.protection_effect = state.protection_effect.saturating_sub(1);
    Ok(())
}

/// Drop a random power-up somewhere away from the furniture
pub fn spawn_power_up(state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    let kind = PowerUpKind::ALL[rng.below(PowerUpKind::ALL.len() as u32) as usize];
    let dim = state.settings.power_up_dim;
    let bounds = Sampler::for_state(state).place(
        rng,
        dim,
        dim,
        &state.current_room().objects,
    )?;

    log::debug!("Power-up {:?} at ({}, {})", kind, bounds.x(), bounds.y());
    state.power_ups.push(PowerUp {
        kind,
        bounds,
        ttl: state.settings.power_up_lifetime_ticks(),
    });
    Ok(())
}

/// Right-click at `(x, y)`: pick up the first power-up under the pointer.
/// No proximity requirement.
pub fn collect_power_up(state: &mut SimulationState, x: i32, y: i32) -> Option<PowerUpKind> {
    if state.completed || state.paused {
        return None;
    }

    let point = IVec2::new(x, y);
    let index = state
        .power_ups
        .iter()
        .position(|p| p.bounds.contains_point(point))?;
    let power_up = state.power_ups.remove(index);

    match power_up.kind {
        PowerUpKind::ExtraTime => {
            let secs = state.settings.extra_time_secs;
            state.extend_timeout(secs);
        }
        PowerUpKind::ExtraLife => state.player.lives += 1,
        PowerUpKind::Hint => state.bag.hints += 1,
        PowerUpKind::ProtectionVest => state.bag.vests += 1,
    }

    log::debug!("Collected {:?}", power_up.kind);
    Some(power_up.kind)
}

/// Spend a stored hint; the key's object is revealed while the effect lasts
pub fn use_hint(state: &mut SimulationState) -> bool {
    if state.completed || state.paused || state.bag.hints == 0 {
        return false;
    }
    state.bag.hints -= 1;
    state.hint_effect = state.settings.ticks_for_secs(state.settings.hint_secs);
    true
}

/// Spend a stored vest (guards against shooter fire while active)
pub fn use_protection_vest(state: &mut SimulationState) -> bool {
    if state.completed || state.paused || state.bag.vests == 0 {
        return false;
    }
    state.bag.vests -= 1;
    state.protection_effect = state.settings.ticks_for_secs(state.settings.protection_secs);
    true
}

/// Box to highlight while a hint is active
pub fn hint_target(state: &SimulationState) -> Option<BoundingBox> {
    (state.hint_effect > 0 && !state.key.found).then(|| state.key_object())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::random::{Scripted, seeded};
    use crate::sim::state::Room;

    fn state() -> SimulationState {
        let rooms = vec![Room::new(
            "lab",
            vec![BoundingBox::new(400, 300, 60, 40), BoundingBox::new(700, 100, 60, 40)],
            2,
        )];
        SimulationState::new(Settings::default(), rooms, &mut seeded(9)).unwrap()
    }

    fn drop_at(state: &mut SimulationState, kind: PowerUpKind, x: i32, y: i32) {
        state.power_ups.push(PowerUp {
            kind,
            bounds: BoundingBox::new(x, y, 30, 30),
            ttl: 10,
        });
    }

    #[test]
    fn test_extra_time_and_life_apply_immediately() {
        let mut state = state();
        let before = state.timeout_after();
        drop_at(&mut state, PowerUpKind::ExtraTime, 100, 100);
        drop_at(&mut state, PowerUpKind::ExtraLife, 200, 100);

        assert_eq!(collect_power_up(&mut state, 110, 110), Some(PowerUpKind::ExtraTime));
        assert_eq!(state.timeout_after(), before + 5 * 50);

        assert_eq!(collect_power_up(&mut state, 215, 115), Some(PowerUpKind::ExtraLife));
        assert_eq!(state.player().lives, 4);
        assert!(state.power_ups().is_empty());
    }

    #[test]
    fn test_miss_click_collects_nothing() {
        let mut state = state();
        drop_at(&mut state, PowerUpKind::Hint, 100, 100);
        assert_eq!(collect_power_up(&mut state, 10, 10), None);
        assert_eq!(state.power_ups().len(), 1);
    }

    #[test]
    fn test_stored_power_ups_are_spent_from_bag() {
        let mut state = state();
        assert!(!use_hint(&mut state));

        drop_at(&mut state, PowerUpKind::Hint, 100, 100);
        drop_at(&mut state, PowerUpKind::ProtectionVest, 200, 100);
        collect_power_up(&mut state, 100, 100);
        collect_power_up(&mut state, 200, 100);
        assert_eq!(state.bag(), Bag { hints: 1, vests: 1 });

        assert!(hint_target(&state).is_none());
        assert!(use_hint(&mut state));
        assert_eq!(state.hint_effect(), 10 * 50);
        assert_eq!(hint_target(&state), Some(state.key_object()));

        assert!(use_protection_vest(&mut state));
        assert_eq!(state.protection_effect(), 20 * 50);
        assert_eq!(state.bag(), Bag::default());
    }

    #[test]
    fn test_uncollected_power_up_expires() {
        let mut state = state();
        drop_at(&mut state, PowerUpKind::Hint, 100, 100);
        let mut rng = seeded(4);
        for _ in 0..9 {
            upkeep(&mut state, &mut rng).unwrap();
        }
        assert_eq!(state.power_ups().len(), 1);
        upkeep(&mut state, &mut rng).unwrap();
        assert!(state.power_ups().is_empty());
    }

    #[test]
    fn test_spawns_on_interval_with_full_lifetime() {
        let mut state = state();
        state.time_for_next_power_up = 0;
        // kind index 1 (extra life), then a corner far from the furniture
        let mut rng = Scripted::new([1, 10, 10]);
        upkeep(&mut state, &mut rng).unwrap();

        assert_eq!(state.power_ups().len(), 1);
        let spawned = &state.power_ups()[0];
        assert_eq!(spawned.kind, PowerUpKind::ExtraLife);
        assert_eq!(spawned.bounds.pos, IVec2::new(10, 10));
        // Lifetime already ticked once this frame
        assert_eq!(spawned.ttl, 6 * 50 - 1);
        assert_eq!(state.time_for_next_power_up(), 12 * 50 - 1);
    }

    #[test]
    fn test_effects_decay_and_floor_at_zero() {
        let mut state = state();
        state.hint_effect = 1;
        let mut rng = seeded(4);
        upkeep(&mut state, &mut rng).unwrap();
        upkeep(&mut state, &mut rng).unwrap();
        assert_eq!(state.hint_effect(), 0);
        assert_eq!(state.protection_effect(), 0);
    }

    #[test]
    fn test_spawn_stays_inside_shrunk_level() {
        let mut state = state();
        state.set_width(300).unwrap();
        state.set_height(200).unwrap();
        let mut rng = seeded(13);
        for _ in 0..40 {
            spawn_power_up(&mut state, &mut rng).unwrap();
        }
        assert!(state.power_ups().iter().all(|p| p.bounds.within(300, 200)));
    }
}
