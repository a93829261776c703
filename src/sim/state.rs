//! Run state and core simulation types
//!
//! A single [`SimulationState`] holds everything one run needs. Fields the tick
//! mutates directly are crate-visible; external callers go through the
//! validated setters, which uphold the invariants checked by [`SimulationState::rep_ok`].

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;
use super::powerups::{Bag, PowerUp};
use super::random::RandomSource;
use crate::error::SimError;
use crate::settings::Settings;

/// One building: ordered furniture plus the minimum it must keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub objects: Vec<BoundingBox>,
    pub min_objects: usize,
}

impl Room {
    pub fn new(name: impl Into<String>, objects: Vec<BoundingBox>, min_objects: usize) -> Self {
        Self {
            name: name.into(),
            objects,
            min_objects,
        }
    }

    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Enough objects for the minimum and at least one to hide the key under
    pub fn meets_minimum(&self) -> bool {
        !self.objects.is_empty() && self.objects.len() >= self.min_objects
    }
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub bounds: BoundingBox,
    pub lives: u32,
}

impl Player {
    pub fn new(dim: i32, lives: u32) -> Self {
        Self {
            bounds: BoundingBox::square(IVec2::ZERO, dim),
            lives,
        }
    }
}

/// Exit door, pinned to the bottom-right corner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub bounds: BoundingBox,
}

/// The hidden key: which object of the current room it sits under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Index into the current room's objects
    pub object: usize,
    pub found: bool,
}

impl Key {
    pub fn new(object: usize) -> Self {
        Self {
            object,
            found: false,
        }
    }
}

/// Closed set of alien variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienKind {
    /// Wanders randomly and catches the player on contact
    Blind,
    /// Moves the key to another object
    TimeWasting,
    /// Placeholder; has no firing behavior yet
    Shooter,
}

impl AlienKind {
    pub const ALL: [AlienKind; 3] = [AlienKind::Blind, AlienKind::TimeWasting, AlienKind::Shooter];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlienKind::Blind => "blind",
            AlienKind::TimeWasting => "time-wasting",
            AlienKind::Shooter => "shooter",
        }
    }
}

/// How much of the room budget was left when a time-wasting alien arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBracket {
    /// At least 70% left
    Early,
    /// 30% to 70% left
    Middle,
    /// Under 30% left
    Late,
}

impl TimeBracket {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 70 {
            TimeBracket::Early
        } else if percent >= 30 {
            TimeBracket::Middle
        } else {
            TimeBracket::Late
        }
    }
}

/// A roaming hazard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alien {
    pub kind: AlienKind,
    pub bounds: BoundingBox,
    /// Unit step per axis (blind only)
    pub direction: IVec2,
    /// Ticks until the next behavior decision
    pub action_timeout: u32,
    /// Time-wasting only
    pub confused: bool,
    /// `timeout_after` when spawned (time-wasting only)
    pub time_spawned: u32,
    pub bracket: Option<TimeBracket>,
}

impl Alien {
    pub fn new(kind: AlienKind, bounds: BoundingBox, action_timeout: u32) -> Self {
        Self {
            kind,
            bounds,
            direction: IVec2::ZERO,
            action_timeout,
            confused: false,
            time_spawned: 0,
            bracket: None,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    #[inline]
    pub fn won(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

/// Result of [`SimulationState::advance_room`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomAdvance {
    /// Moved into the room at this index
    Entered(usize),
    /// Left the final room; run completed with a win
    Won,
    /// Run was already over
    Ignored,
}

/// Complete run state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub(crate) settings: Settings,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) rooms: Vec<Room>,
    pub(crate) current_room: usize,
    pub(crate) aliens: Vec<Alien>,
    pub(crate) player: Player,
    pub(crate) door: Door,
    pub(crate) key: Key,
    /// Ticks the found key stays on display (door stays shut meanwhile)
    pub(crate) show_key_for: u32,
    /// Ticks left before the room times out
    pub(crate) timeout_after: u32,
    pub(crate) time_for_next_alien: u32,
    pub(crate) completed: bool,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) paused: bool,
    /// Ticks simulated so far
    pub(crate) frames: u64,

    // === Power-ups ===
    pub(crate) power_ups: Vec<PowerUp>,
    pub(crate) bag: Bag,
    pub(crate) time_for_next_power_up: u32,
    pub(crate) hint_effect: u32,
    pub(crate) protection_effect: u32,
}

impl SimulationState {
    /// Start a run in the first room with a freshly hidden key
    pub fn new(
        settings: Settings,
        rooms: Vec<Room>,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SimError> {
        settings.validate()?;
        validate_rooms(&rooms, 0)?;

        let dim = settings.entity_dim;
        let width = settings.frame_width;
        let height = settings.frame_height;
        let key = Key::new(sample_key_object(&rooms[0], rng));

        let mut state = Self {
            settings,
            width,
            height,
            rooms,
            current_room: 0,
            aliens: Vec::new(),
            player: Player::new(dim, settings.starting_lives),
            door: Door {
                bounds: BoundingBox::new(width - dim, height - dim, dim, dim),
            },
            key,
            show_key_for: 0,
            timeout_after: 0,
            time_for_next_alien: 0,
            completed: false,
            outcome: None,
            paused: false,
            frames: 0,
            power_ups: Vec::new(),
            bag: Bag::default(),
            time_for_next_power_up: 0,
            hint_effect: 0,
            protection_effect: 0,
        };
        state.reset_timeout_after();
        state.reset_time_for_next_alien();
        state.reset_time_for_next_power_up();

        log::info!(
            "Run started: {} rooms, first room '{}'",
            state.rooms.len(),
            state.rooms[0].name
        );
        Ok(state)
    }

    // === Getters ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn current_room_index(&self) -> usize {
        self.current_room
    }

    pub fn current_room(&self) -> &Room {
        &self.rooms[self.current_room]
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn door(&self) -> &Door {
        &self.door
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Box of the object the key is hidden under
    pub fn key_object(&self) -> BoundingBox {
        self.current_room().objects[self.key.object]
    }

    pub fn show_key_for(&self) -> u32 {
        self.show_key_for
    }

    pub fn timeout_after(&self) -> u32 {
        self.timeout_after
    }

    pub fn time_for_next_alien(&self) -> u32 {
        self.time_for_next_alien
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn bag(&self) -> Bag {
        self.bag
    }

    pub fn time_for_next_power_up(&self) -> u32 {
        self.time_for_next_power_up
    }

    pub fn hint_effect(&self) -> u32 {
        self.hint_effect
    }

    pub fn protection_effect(&self) -> u32 {
        self.protection_effect
    }

    /// Full timeout for the current room, in ticks
    pub fn room_timeout_budget(&self) -> u32 {
        self.settings
            .room_timeout_ticks(self.current_room().object_count())
    }

    // === Validated setters ===

    /// Update the play width; the door follows the right edge
    pub fn set_width(&mut self, width: i32) -> Result<(), SimError> {
        if width <= 0 || width < self.settings.entity_dim {
            return Err(SimError::InvalidArgument("width must fit an entity"));
        }
        self.width = width;
        self.door.bounds.pos.x = width - self.settings.entity_dim;
        Ok(())
    }

    /// Update the play height; the door follows the bottom edge
    pub fn set_height(&mut self, height: i32) -> Result<(), SimError> {
        if height <= 0 || height < self.settings.entity_dim {
            return Err(SimError::InvalidArgument("height must fit an entity"));
        }
        self.height = height;
        self.door.bounds.pos.y = height - self.settings.entity_dim;
        Ok(())
    }

    /// Replace the room list. The key is re-hidden if its object no longer exists.
    pub fn set_rooms(&mut self, rooms: Vec<Room>, rng: &mut dyn RandomSource) -> Result<(), SimError> {
        validate_rooms(&rooms, self.current_room)?;
        self.rooms = rooms;
        if self.key.object >= self.current_room().object_count() {
            self.key = Key::new(sample_key_object(self.current_room(), rng));
        }
        Ok(())
    }

    /// Jump to a room and hide a fresh key there
    pub fn set_current_room(&mut self, index: usize, rng: &mut dyn RandomSource) -> Result<(), SimError> {
        if index >= self.rooms.len() {
            return Err(SimError::InvalidArgument("room index out of range"));
        }
        self.current_room = index;
        self.key = Key::new(sample_key_object(self.current_room(), rng));
        Ok(())
    }

    pub fn set_aliens(&mut self, aliens: Vec<Alien>) {
        self.aliens = aliens;
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    pub fn set_door(&mut self, door: Door) {
        self.door = door;
    }

    /// Rebind the key; its object must exist in the current room
    pub fn set_key(&mut self, key: Key) -> Result<(), SimError> {
        if key.object >= self.current_room().object_count() {
            return Err(SimError::InvalidArgument("key object is not in the current room"));
        }
        self.key = key;
        Ok(())
    }

    pub fn set_show_key_for(&mut self, ticks: u32) {
        self.show_key_for = ticks;
    }

    pub fn set_timeout_after(&mut self, ticks: u32) {
        self.timeout_after = ticks;
    }

    pub fn set_time_for_next_alien(&mut self, ticks: u32) {
        self.time_for_next_alien = ticks;
    }

    // === Countdowns ===

    pub fn reset_timeout_after(&mut self) {
        self.timeout_after = self.room_timeout_budget();
    }

    /// Add whole seconds to the room timeout (extra-time power-up)
    pub fn extend_timeout(&mut self, secs: u32) {
        let extra = self.settings.ticks_for_secs(secs);
        self.timeout_after = self.timeout_after.saturating_add(extra);
    }

    pub fn reset_time_for_next_alien(&mut self) {
        self.time_for_next_alien = self.settings.alien_interval_ticks();
    }

    pub fn reset_time_for_next_power_up(&mut self) {
        self.time_for_next_power_up = self.settings.power_up_interval_ticks();
    }

    // === Progression ===

    /// Leave the current room through the door.
    ///
    /// From the final room this completes the run with a win and leaves the
    /// index untouched. Otherwise the next room starts clean: no aliens, no
    /// floor power-ups, a new key, a full timeout and the player at the origin.
    pub fn advance_room(&mut self, rng: &mut dyn RandomSource) -> RoomAdvance {
        if self.completed {
            return RoomAdvance::Ignored;
        }

        if self.current_room + 1 >= self.rooms.len() {
            self.finish(Outcome::Win);
            log::info!(
                "Escaped '{}' - all {} rooms cleared",
                self.current_room().name,
                self.rooms.len()
            );
            return RoomAdvance::Won;
        }

        self.current_room += 1;
        self.aliens.clear();
        self.power_ups.clear();
        self.key = Key::new(sample_key_object(self.current_room(), rng));
        self.reset_timeout_after();
        self.player.bounds.pos = IVec2::ZERO;

        log::info!(
            "Entered room {} '{}' ({} objects, {} ticks)",
            self.current_room,
            self.current_room().name,
            self.current_room().object_count(),
            self.timeout_after
        );
        RoomAdvance::Entered(self.current_room)
    }

    /// Fix the outcome; returns false if the run had already ended
    pub(crate) fn finish(&mut self, outcome: Outcome) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.outcome = Some(outcome);
        true
    }

    /// Check every invariant at once
    pub fn rep_ok(&self) -> bool {
        self.width > 0
            && self.height > 0
            && !self.rooms.is_empty()
            && self.current_room < self.rooms.len()
            && self.rooms.iter().all(Room::meets_minimum)
            && self.key.object < self.current_room().object_count()
    }
}

fn validate_rooms(rooms: &[Room], current_room: usize) -> Result<(), SimError> {
    if rooms.is_empty() {
        return Err(SimError::InvalidArgument("room list must not be empty"));
    }
    if current_room >= rooms.len() {
        return Err(SimError::InvalidArgument("current room index out of range"));
    }
    if !rooms.iter().all(Room::meets_minimum) {
        return Err(SimError::InvalidArgument("room has fewer objects than its minimum"));
    }
    Ok(())
}

fn sample_key_object(room: &Room, rng: &mut dyn RandomSource) -> usize {
    rng.below(room.object_count() as u32) as usize
}
