//! Campus buildings
//!
//! The default run visits five buildings in order. Furniture sits on a loose
//! grid that leaves the top row, the left column and the bottom row free, so the
//! origin spawn point and the door corner are always reachable.

use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::{BoundingBox, Room};

/// Building names and furniture counts, in visiting order
pub const BUILDINGS: [(&str, usize); 5] = [
    ("CASE", 5),
    ("SOS", 6),
    ("SCI", 7),
    ("ENG", 8),
    ("SNA", 9),
];

/// Grid columns/rows available for furniture
const GRID_COLUMNS: i32 = 4;
const GRID_ROWS: i32 = 3;

pub const OBJECT_WIDTH: i32 = 60;
pub const OBJECT_HEIGHT: i32 = 40;

/// Default campus for the given play area
pub fn campus(settings: &Settings) -> Vec<Room> {
    BUILDINGS
        .iter()
        .map(|&(name, count)| Room::new(name, furniture(settings, count), count))
        .collect()
}

/// `count` objects laid out on the grid (row-major, capped at the grid size)
pub fn furniture(settings: &Settings, count: usize) -> Vec<BoundingBox> {
    let cells = (GRID_COLUMNS * GRID_ROWS) as usize;
    (0..count.min(cells) as i32)
        .map(|k| {
            let column = k % GRID_COLUMNS;
            let row = k / GRID_COLUMNS;
            let x = settings.frame_width * (column + 1) / (GRID_COLUMNS + 1);
            let y = settings.frame_height * (row + 1) / (GRID_ROWS + 1) - OBJECT_HEIGHT / 2;
            BoundingBox::new(x, y, OBJECT_WIDTH, OBJECT_HEIGHT)
        })
        .collect()
}

/// Parse a custom room list from JSON
pub fn rooms_from_json(json: &str) -> Result<Vec<Room>, SimError> {
    let rooms: Vec<Room> = serde_json::from_str(json)?;
    if rooms.is_empty() {
        return Err(SimError::InvalidArgument("room list must not be empty"));
    }
    Ok(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_campus_rooms_meet_minimum() {
        let rooms = campus(&Settings::default());
        assert_eq!(rooms.len(), 5);
        assert_eq!(rooms[0].name, "CASE");
        for (room, (_, count)) in rooms.iter().zip(BUILDINGS) {
            assert_eq!(room.object_count(), count);
            assert!(room.meets_minimum());
        }
    }

    #[test]
    fn test_furniture_clear_of_spawn_and_door() {
        let settings = Settings::default();
        let dim = settings.entity_dim;
        let spawn = BoundingBox::square(IVec2::ZERO, dim);
        let door = BoundingBox::new(
            settings.frame_width - dim,
            settings.frame_height - dim,
            dim,
            dim,
        );
        for obj in furniture(&settings, 12) {
            assert!(obj.within(settings.frame_width, settings.frame_height));
            assert!(!obj.intersects(&spawn));
            assert!(!obj.intersects(&door));
            // Top lane and bottom lane stay open
            assert!(obj.y() >= dim);
            assert!(obj.bottom() <= settings.frame_height - dim);
        }
    }

    #[test]
    fn test_rooms_from_json() {
        let json = r#"[{
            "name": "LIB",
            "objects": [{ "pos": [300, 200], "width": 60, "height": 40 }],
            "min_objects": 1
        }]"#;
        let rooms = rooms_from_json(json).unwrap();
        assert_eq!(rooms[0].objects[0], BoundingBox::new(300, 200, 60, 40));
        assert!(rooms_from_json("[]").is_err());
    }
}
