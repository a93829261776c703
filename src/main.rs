//! Campus Escape demo entry point
//!
//! Plays one headless run with the autopilot and records it on the leaderboard.
//!
//! Usage: `campus-escape [settings.json] [scores-dir] [rooms.json]`
//!
//! Without a scores directory the leaderboard only lives for this process.
//! Without a rooms file the default campus is played.
//! Set `CAMPUS_ESCAPE_SEED` to replay a run.

use campus_escape::autopilot::Autopilot;
use campus_escape::layout;
use campus_escape::persistence::{DataStore, JsonFileStore, MemoryStore};
use campus_escape::sim::{Outcome, Room, seeded};
use campus_escape::{HighScores, RunRecord, RunSession, Settings, SimError};

/// Hard stop for the demo loop, well past every room timeout combined
const MAX_TICKS: u64 = 1_000_000;

fn main() {
    env_logger::init();
    log::info!("Campus Escape (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args.next().map(Settings::load).unwrap_or_default();
    let scores_dir = args.next();
    let rooms_file = args.next();

    let result = rooms(&settings, rooms_file.as_deref()).and_then(|rooms| match scores_dir {
        Some(dir) => JsonFileStore::open(dir).and_then(|mut store| play(settings, rooms, &mut store)),
        None => play(settings, rooms, &mut MemoryStore::new()),
    });
    if let Err(err) = result {
        log::error!("Run aborted: {}", err);
        std::process::exit(1);
    }
}

/// Rooms from a JSON file, or the default campus
fn rooms(settings: &Settings, path: Option<&str>) -> Result<Vec<Room>, SimError> {
    match path {
        Some(path) => {
            let rooms = layout::rooms_from_json(&std::fs::read_to_string(path)?)?;
            log::info!("Loaded {} rooms from {}", rooms.len(), path);
            Ok(rooms)
        }
        None => Ok(layout::campus(settings)),
    }
}

fn play(settings: Settings, rooms: Vec<Room>, store: &mut impl DataStore) -> Result<(), SimError> {
    settings.validate()?;
    let seed = std::env::var("CAMPUS_ESCAPE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Seed {}", seed);

    let on_end = |outcome: Outcome| {
        log::info!("Game over: {}", if outcome.won() { "escaped" } else { "caught" });
    };
    let mut session = RunSession::new(settings, rooms, seeded(seed), on_end)?;
    let mut pilot = Autopilot::new();

    while !session.is_finished() && session.state().frames() < MAX_TICKS {
        let (input, event) = pilot.next(session.state());
        if let Some(event) = event {
            session.handle(event);
        }
        session.set_input(input);
        session.advance(settings.tick_ms)?;
    }

    let state = session.state();
    let Some(record) = RunRecord::from_state(state) else {
        log::warn!("Run did not finish within {} ticks", MAX_TICKS);
        return Ok(());
    };
    println!(
        "{} after {} ticks: {} of {} buildings cleared, {} lives left",
        if record.won { "Escaped" } else { "Caught" },
        record.ticks,
        record.rooms_cleared,
        state.rooms().len(),
        record.lives_left
    );

    let mut scores = HighScores::load(store)?;
    match scores.record(store, record)? {
        Some(rank) => println!("Leaderboard rank #{}", rank),
        None => println!("Not on the leaderboard"),
    }
    Ok(())
}
