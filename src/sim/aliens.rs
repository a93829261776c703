//! Alien spawning and per-variant behavior
//!
//! Behavior is looked up in a table keyed by [`AlienKind`]; each entry gets the
//! alien, the rest of the state and the random source for one tick.

use glam::IVec2;

use super::geometry::BoundingBox;
use super::placement::Sampler;
use super::random::RandomSource;
use super::state::{Alien, AlienKind, Key, SimulationState, TimeBracket};
use crate::error::SimError;

/// One tick of behavior for one alien
pub type Behavior = fn(&mut Alien, &mut SimulationState, &mut dyn RandomSource) -> Result<(), SimError>;

/// Behavior table
pub fn behavior_for(kind: AlienKind) -> Behavior {
    match kind {
        AlienKind::Blind => wander,
        AlienKind::TimeWasting => relocate_key,
        AlienKind::Shooter => hold_fire,
    }
}

/// Run every active alien's behavior, in spawn order.
///
/// On error the aliens processed so far keep their updates.
pub fn act(state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    let mut aliens = std::mem::take(&mut state.aliens);
    let result = aliens
        .iter_mut()
        .try_for_each(|alien| behavior_for(alien.kind)(alien, state, rng));
    state.aliens = aliens;
    result
}

/// Spawn one alien of a random kind away from the room's furniture
pub fn spawn_alien(state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    let kind = AlienKind::ALL[rng.below(AlienKind::ALL.len() as u32) as usize];
    let dim = state.settings.entity_dim;
    let mut alien = Alien::new(
        kind,
        BoundingBox::new(0, 0, dim, dim),
        state.settings.alien_action_ticks(),
    );

    match kind {
        AlienKind::TimeWasting => {
            alien.time_spawned = state.timeout_after;
            let budget = state.room_timeout_budget().max(1);
            let percent = (u64::from(alien.time_spawned) * 100 / u64::from(budget)) as u32;
            let bracket = TimeBracket::from_percent(percent);
            alien.bracket = Some(bracket);
            // Every bracket confuses the alien for now
            alien.confused = match bracket {
                TimeBracket::Early => true,
                TimeBracket::Middle => true,
                TimeBracket::Late => true,
            };
        }
        AlienKind::Blind => alien.direction = random_direction(rng),
        AlienKind::Shooter => {}
    }

    alien.bounds = Sampler::for_state(state).place(
        rng,
        dim,
        dim,
        &state.current_room().objects,
    )?;

    log::debug!(
        "Spawned {} alien at ({}, {}) in room {}",
        kind.as_str(),
        alien.bounds.x(),
        alien.bounds.y(),
        state.current_room
    );
    state.aliens.push(alien);
    Ok(())
}

/// Random non-zero step from {-1, 0, 1}^2
pub fn random_direction(rng: &mut dyn RandomSource) -> IVec2 {
    const DIRECTIONS: [IVec2; 8] = [
        IVec2::new(-1, -1),
        IVec2::new(0, -1),
        IVec2::new(1, -1),
        IVec2::new(-1, 0),
        IVec2::new(1, 0),
        IVec2::new(-1, 1),
        IVec2::new(0, 1),
        IVec2::new(1, 1),
    ];
    DIRECTIONS[rng.below(DIRECTIONS.len() as u32) as usize]
}

/// Blind alien: wander until a free step is found, catch the player on contact.
///
/// The search ignores the player so the alien can walk into it; the catch is
/// a single overlap check afterwards, against the pre-step position. An alien
/// with no free step within the budget stays where it started the tick.
fn wander(alien: &mut Alien, state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    let budget = state.settings.wander_attempts;
    let reset = state.settings.alien_action_ticks();
    let start = alien.bounds.pos;
    let mut tentative = start;
    let mut blocked = false;
    let mut attempts = 0;

    while !alien.bounds.intersects(&state.player.bounds) {
        if attempts == budget {
            log::warn!(
                "Blind alien at ({}, {}) is boxed in, staying put",
                start.x,
                start.y
            );
            alien.bounds.pos = start;
            tentative = start;
            break;
        }
        attempts += 1;

        alien.action_timeout = alien.action_timeout.saturating_sub(1);
        if alien.action_timeout == 0 || blocked {
            let previous = alien.direction;
            alien.direction = random_direction(rng);
            // Back off along the old heading
            alien.bounds.pos -= previous;
            alien.action_timeout = reset;
        }

        tentative = alien.bounds.pos + alien.direction * 2;
        blocked = step_blocked(state, alien.bounds.at(tentative));
        if !blocked {
            break;
        }
    }

    if alien.bounds.intersects(&state.player.bounds) {
        state.player.lives = state.player.lives.saturating_sub(1);
        state.player.bounds.pos = IVec2::ZERO;
        log::info!("Caught by a blind alien, {} lives left", state.player.lives);
    }

    alien.bounds.pos = tentative;
    Ok(())
}

/// Furniture, door and level edges block a step; the player does not
fn step_blocked(state: &SimulationState, next: BoundingBox) -> bool {
    state.current_room().objects.iter().any(|obj| next.intersects(obj))
        || next.intersects(&state.door.bounds)
        || !next.within(state.width, state.height)
}

/// Time-wasting alien: hide the key under a different object on each expiry
fn relocate_key(alien: &mut Alien, state: &mut SimulationState, rng: &mut dyn RandomSource) -> Result<(), SimError> {
    if state.key.found {
        return Ok(());
    }

    alien.action_timeout = alien.action_timeout.saturating_sub(1);
    if alien.action_timeout == 0 {
        let count = state.current_room().object_count();
        if count > 1 {
            // Uniform over the other objects
            let mut pick = rng.below(count as u32 - 1) as usize;
            if pick >= state.key.object {
                pick += 1;
            }
            state.key = Key::new(pick);
            log::debug!("Key moved to object {}", pick);
        }
        alien.action_timeout = state.settings.alien_action_ticks();
    }
    Ok(())
}

/// Shooter alien: no firing behavior yet
fn hold_fire(_alien: &mut Alien, _state: &mut SimulationState, _rng: &mut dyn RandomSource) -> Result<(), SimError> {
    Ok(())
}
