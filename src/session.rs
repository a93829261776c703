//! Run session
//!
//! Owns the one `SimulationState` of a run together with its random source
//! and game-end listener. Wall-clock time is accumulated and converted into
//! fixed ticks; discrete pointer/keyboard events are applied between ticks,
//! never during one.

use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::powerups;
use crate::sim::random::RandomSource;
use crate::sim::state::{Outcome, Room, SimulationState};
use crate::sim::tick::{self, GameEndListener, TickInput};

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// Left click: look for the key
    Click { x: i32, y: i32 },
    /// Right click: collect a power-up
    RightClick { x: i32, y: i32 },
    TogglePause,
    UseHint,
    UseProtectionVest,
}

/// A single run driven at a fixed timestep
pub struct RunSession<R, L> {
    state: SimulationState,
    rng: R,
    listener: L,
    input: TickInput,
    accumulator_ms: u32,
}

impl<R: RandomSource, L: GameEndListener> RunSession<R, L> {
    /// Validate the configuration and start the run in the first room
    pub fn new(settings: Settings, rooms: Vec<Room>, mut rng: R, listener: L) -> Result<Self, SimError> {
        let state = SimulationState::new(settings, rooms, &mut rng)?;
        Ok(Self {
            state,
            rng,
            listener,
            input: TickInput::default(),
            accumulator_ms: 0,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_completed()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// Held directions used by the following ticks
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Apply a discrete event between ticks. Returns whether it had an effect.
    pub fn handle(&mut self, event: RunEvent) -> bool {
        match event {
            RunEvent::Click { x, y } => tick::pickup_key(&mut self.state, x, y),
            RunEvent::RightClick { x, y } => powerups::collect_power_up(&mut self.state, x, y).is_some(),
            RunEvent::TogglePause => {
                let was = self.state.is_paused();
                tick::toggle_pause(&mut self.state) != was
            }
            RunEvent::UseHint => powerups::use_hint(&mut self.state),
            RunEvent::UseProtectionVest => powerups::use_protection_vest(&mut self.state),
        }
    }

    /// Account for `elapsed_ms` of wall-clock time and run the ticks it covers.
    ///
    /// Frame time is capped and at most `max_substeps` ticks run per call; the
    /// remainder carries over. Returns the number of ticks simulated.
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<u32, SimError> {
        let settings = *self.state.settings();
        let tick_ms = settings.tick_ms;
        self.accumulator_ms += elapsed_ms.min(settings.max_frame_ms);

        let mut substeps = 0;
        while self.accumulator_ms >= tick_ms && substeps < settings.max_substeps {
            if let Err(err) = tick::step(&mut self.state, &self.input, &mut self.rng, &mut self.listener) {
                log::error!("Tick {} failed: {}", self.state.frames(), err);
                return Err(err);
            }
            self.accumulator_ms -= tick_ms;
            substeps += 1;
        }
        Ok(substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::sim::random::seeded;
    use glam::IVec2;
    use std::sync::mpsc;

    fn session() -> RunSession<rand_pcg::Pcg32, impl FnMut(Outcome)> {
        let settings = Settings::default();
        RunSession::new(settings, layout::campus(&settings), seeded(31), |_outcome: Outcome| {}).unwrap()
    }

    #[test]
    fn test_advance_runs_whole_ticks_and_carries_remainder() {
        let mut session = session();
        assert_eq!(session.advance(50).unwrap(), 2);
        assert_eq!(session.state().frames(), 2);
        // 10 ms left over + 10 ms = one more tick
        assert_eq!(session.advance(10).unwrap(), 1);
        assert_eq!(session.state().frames(), 3);
    }

    #[test]
    fn test_substeps_are_capped() {
        let settings = Settings {
            max_substeps: 3,
            ..Settings::default()
        };
        let mut session = RunSession::new(
            settings,
            layout::campus(&settings),
            seeded(1),
            |_outcome: Outcome| {},
        )
        .unwrap();

        // Frame capped to 100 ms (5 ticks), only 3 may run now
        assert_eq!(session.advance(10_000).unwrap(), 3);
        assert_eq!(session.advance(0).unwrap(), 2);
        assert_eq!(session.advance(0).unwrap(), 0);
    }

    #[test]
    fn test_input_drives_player() {
        let mut session = session();
        session.set_input(TickInput {
            right: true,
            ..Default::default()
        });
        session.advance(40).unwrap();
        assert_eq!(session.state().player().bounds.pos, IVec2::new(10, 0));
    }

    #[test]
    fn test_pause_event_freezes_ticks() {
        let mut session = session();
        assert!(session.handle(RunEvent::TogglePause));
        session.advance(100).unwrap();
        assert_eq!(session.state().frames(), 0);
        assert!(session.handle(RunEvent::TogglePause));
        session.advance(20).unwrap();
        assert_eq!(session.state().frames(), 1);
    }

    #[test]
    fn test_game_end_delivered_over_channel() {
        let (tx, rx) = mpsc::channel();
        let settings = Settings {
            starting_lives: 0,
            ..Settings::default()
        };
        let mut session = RunSession::new(
            settings,
            layout::campus(&settings),
            seeded(4),
            move |outcome: Outcome| {
                let _ = tx.send(outcome);
            },
        )
        .unwrap();

        session.advance(100).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.outcome(), Some(Outcome::Loss));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Outcome::Loss]);
    }

    #[test]
    fn test_empty_bag_events_have_no_effect() {
        let mut session = session();
        assert!(!session.handle(RunEvent::UseHint));
        assert!(!session.handle(RunEvent::UseProtectionVest));
        assert!(!session.handle(RunEvent::RightClick { x: 5, y: 5 }));
        assert!(!session.handle(RunEvent::Click { x: 5, y: 5 }));
    }
}
