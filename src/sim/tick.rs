//! Fixed timestep simulation tick
//!
//! [`step`] advances a run by exactly one frame. The remaining functions are the
//! discrete trigger points (clicks, pause) that callers run between ticks.

use glam::IVec2;

use super::aliens;
use super::powerups;
use super::random::RandomSource;
use super::state::{Outcome, RoomAdvance, SimulationState};
use crate::error::SimError;

/// Held directions for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Receives the single game-ended signal of a run
pub trait GameEndListener {
    fn game_ended(&mut self, outcome: Outcome);
}

impl<F: FnMut(Outcome)> GameEndListener for F {
    fn game_ended(&mut self, outcome: Outcome) {
        self(outcome)
    }
}

/// Advance the run by one fixed timestep.
///
/// Order: movement, alien behaviors, loss check, alien spawning, countdowns,
/// power-ups. A finished or paused run is left untouched. Errors only come from
/// an exhausted placement budget (room too crowded to spawn into); the state
/// keeps whatever was applied before the failure.
pub fn step(
    state: &mut SimulationState,
    input: &TickInput,
    rng: &mut dyn RandomSource,
    on_end: &mut dyn GameEndListener,
) -> Result<(), SimError> {
    if state.completed || state.paused {
        return Ok(());
    }

    if let RoomAdvance::Won = move_player(state, input, rng) {
        on_end.game_ended(Outcome::Win);
        return Ok(());
    }

    aliens::act(state, rng)?;

    let timed_out = state.timeout_after == 0 && !state.completed;
    if (timed_out || state.player.lives == 0) && state.finish(Outcome::Loss) {
        log::info!(
            "Run lost in room {} ({})",
            state.current_room,
            if timed_out { "timeout" } else { "no lives left" }
        );
        on_end.game_ended(Outcome::Loss);
    }
    state.timeout_after = state.timeout_after.saturating_sub(1);

    if !state.completed && state.time_for_next_alien == 0 {
        aliens::spawn_alien(state, rng)?;
        state.reset_time_for_next_alien();
    }
    state.time_for_next_alien = state.time_for_next_alien.saturating_sub(1);

    if !state.completed {
        powerups::upkeep(state, rng)?;
    }

    state.frames += 1;
    Ok(())
}

/// Per-axis step for this input; diagonals are scaled so speed stays constant
fn step_size(speed: i32, input: &TickInput) -> i32 {
    let diagonal = (input.up || input.down) && (input.left || input.right);
    if diagonal {
        let speed = f64::from(speed);
        (speed * speed / 2.0).sqrt() as i32
    } else {
        speed
    }
}

/// Move the player, resolve furniture collisions and handle the door.
///
/// Returns what happened at the door (`Ignored` when nothing did).
pub(crate) fn move_player(
    state: &mut SimulationState,
    input: &TickInput,
    rng: &mut dyn RandomSource,
) -> RoomAdvance {
    let by = step_size(state.settings.player_speed, input);
    let max_x = state.width - state.player.bounds.width;
    let max_y = state.height - state.player.bounds.height;

    let backup = state.player.bounds.pos;
    let pos = &mut state.player.bounds.pos;
    if input.up {
        pos.y = pos.y.saturating_sub(by).max(0);
    }
    if input.left {
        pos.x = pos.x.saturating_sub(by).max(0);
    }
    if input.down {
        pos.y = pos.y.saturating_add(by).min(max_y);
    }
    if input.right {
        pos.x = pos.x.saturating_add(by).min(max_x);
    }

    // Furniture is solid: undo the whole move on any contact
    let player = state.player.bounds;
    if state.current_room().objects.iter().any(|obj| player.intersects(obj)) {
        state.player.bounds.pos = backup;
    }

    let mut advance = RoomAdvance::Ignored;
    if state.player.bounds.intersects(&state.door.bounds) {
        if state.key.found && state.show_key_for == 0 {
            advance = state.advance_room(rng);
        } else {
            // Locked, or the key is still on display
            state.player.bounds.pos = backup;
        }
    }

    state.show_key_for = state.show_key_for.saturating_sub(1);
    advance
}

/// Left-click at `(x, y)`: look for the key under the clicked object.
///
/// Succeeds only when the click lands on the key's object and the player is
/// within reach of it. Returns whether the key was found by this click.
pub fn pickup_key(state: &mut SimulationState, x: i32, y: i32) -> bool {
    if state.completed || state.paused || state.key.found {
        return false;
    }

    let under = state.key_object();
    let reach = f64::from(state.settings.min_distance);
    let in_reach = state.player.bounds.distance_to(&under) <= reach;
    if !(under.contains_point(IVec2::new(x, y)) && in_reach) {
        return false;
    }

    state.key.found = true;
    state.show_key_for = state.settings.key_display_ticks();
    log::info!("Key found in room {}", state.current_room);
    true
}

/// Flip the pause flag; a finished run stays as it is. Returns the new flag.
pub fn toggle_pause(state: &mut SimulationState) -> bool {
    if !state.completed {
        state.paused = !state.paused;
    }
    state.paused
}
