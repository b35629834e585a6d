//! The generated value tree: `Building` → `Floor` → `Room`.
//!
//! Rooms live in a per-floor arena (`Floor::rooms`) and are referred to by
//! [`RoomId`], their index in that arena. Index 0 of every floor is the
//! floor's entry room: the outside connector on the ground floor, the
//! stair arriving from below on every other floor.

use serde::{Deserialize, Serialize};

use crate::constants::{HALLWAY, OUTSIDE, STAIRS};
use crate::error::Result;
use crate::geometry::{Point, Rect, Segment};

/// Stable handle to a room within one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a room is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    /// A catalog room type.
    Named(String),
    /// A stair shaft shared with the floor above or below.
    Stairs,
    /// A carved corridor or stair landing.
    Hallway,
    /// The ground-floor room holding the front door, with its catalog type.
    OutsideConnector(String),
}

impl RoomKind {
    /// Name used for adjacency lookups.
    pub fn type_name(&self) -> &str {
        match self {
            RoomKind::Named(name) | RoomKind::OutsideConnector(name) => name,
            RoomKind::Stairs => STAIRS,
            RoomKind::Hallway => HALLWAY,
        }
    }

    /// Catalog-backed rooms (the ones counted by `HouseSpec::num_rooms`).
    pub fn is_catalog_room(&self) -> bool {
        matches!(self, RoomKind::Named(_) | RoomKind::OutsideConnector(_))
    }

    pub fn is_stairs(&self) -> bool {
        matches!(self, RoomKind::Stairs)
    }

    pub fn is_hallway(&self) -> bool {
        matches!(self, RoomKind::Hallway)
    }
}

/// Names that cannot be used for catalog entries.
pub fn is_reserved_name(name: &str) -> bool {
    name == OUTSIDE || name == STAIRS || name == HALLWAY
}

/// A room polygon with its openings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    /// Counter-clockwise outline.
    pub polygon: Vec<Point>,
    /// Door segment endpoints, two points per door.
    pub doors: Vec<Point>,
    /// Window segment endpoints, two points per window.
    pub windows: Vec<Point>,
}

impl Room {
    pub fn new(id: RoomId, kind: RoomKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            polygon: rect.to_polygon(),
            doors: Vec::new(),
            windows: Vec::new(),
        }
    }

    /// Bounding rectangle of the outline.
    pub fn try_rect(&self) -> Result<Rect> {
        Rect::from_polygon(&self.polygon)
    }

    /// Bounding rectangle of an outline built by [`Room::new`].
    ///
    /// Those always have four corners; a damaged outline (say, from a
    /// hand-edited JSON file) reads as an empty rectangle in release builds
    /// and is reported by `validation::check_room_dimensions`.
    pub fn rect(&self) -> Rect {
        let rect = self.try_rect();
        debug_assert!(rect.is_ok(), "room {} outline has {} points", self.id, self.polygon.len());
        rect.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    pub fn door_count(&self) -> usize {
        self.doors.len() / 2
    }

    pub fn window_count(&self) -> usize {
        self.windows.len() / 2
    }
}

/// A door between two rooms, or between a room and the outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub segment: Segment,
    pub room: RoomId,
    /// `None` means the door leads outside.
    pub other: Option<RoomId>,
}

impl Door {
    pub fn connects(&self, room: RoomId) -> bool {
        self.room == room || self.other == Some(room)
    }
}

/// A window on an exterior wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub segment: Segment,
    pub room: RoomId,
}

/// One storey of the building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub level: usize,
    /// Room arena; index 0 is the entry room.
    pub rooms: Vec<Room>,
    /// Footprint outline (counter-clockwise).
    pub polygon: Vec<Point>,
    /// Area left for catalog rooms after stair shafts and landings.
    pub usable: Rect,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
}

impl Floor {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn entry(&self) -> Option<&Room> {
        self.rooms.first()
    }

    pub fn catalog_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.kind.is_catalog_room())
    }

    pub fn hallways(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.kind.is_hallway())
    }
}

/// A stair shaft linking `lower_room` on `lower_floor` with `upper_room`
/// on the floor above. Both rooms have the same rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairLink {
    pub lower_floor: usize,
    pub lower_room: RoomId,
    pub upper_room: RoomId,
    pub rect: Rect,
}

/// A generated multi-floor building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub footprint: Rect,
    pub floors: Vec<Floor>,
    pub stairs: Vec<StairLink>,
}

impl Building {
    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Catalog rooms across all floors.
    pub fn catalog_room_count(&self) -> usize {
        self.floors.iter().map(|f| f.catalog_rooms().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_type_names() {
        assert_eq!(RoomKind::Named("Kitchen".into()).type_name(), "Kitchen");
        assert_eq!(RoomKind::OutsideConnector("Hall".into()).type_name(), "Hall");
        assert_eq!(RoomKind::Stairs.type_name(), STAIRS);
        assert_eq!(RoomKind::Hallway.type_name(), HALLWAY);
    }

    #[test]
    fn test_catalog_room_classification() {
        assert!(RoomKind::Named("Bedroom".into()).is_catalog_room());
        assert!(RoomKind::OutsideConnector("Hall".into()).is_catalog_room());
        assert!(!RoomKind::Stairs.is_catalog_room());
        assert!(!RoomKind::Hallway.is_catalog_room());
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved_name("Outside"));
        assert!(is_reserved_name("Stairs"));
        assert!(is_reserved_name("Hallway"));
        assert!(!is_reserved_name("Kitchen"));
    }

    #[test]
    fn test_damaged_outline_is_an_error() {
        let mut room = Room::new(RoomId(2), RoomKind::Hallway, Rect::new(0.0, 0.0, 2.0, 1.0));
        room.polygon.truncate(2);
        assert!(matches!(
            room.try_rect(),
            Err(crate::error::GenerationError::DegenerateShape(2))
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outline has 2 points")]
    fn test_damaged_outline_asserts_in_debug() {
        let mut room = Room::new(RoomId(2), RoomKind::Hallway, Rect::new(0.0, 0.0, 2.0, 1.0));
        room.polygon.truncate(2);
        room.rect();
    }

    #[test]
    fn test_room_rect_from_polygon() {
        let rect = Rect::new(1.0, 1.0, 3.0, 2.0);
        let room = Room::new(RoomId(4), RoomKind::Stairs, rect);
        assert_eq!(room.rect(), rect);
        assert_eq!(room.door_count(), 0);
        assert_eq!(format!("{}", room.id), "#4");
    }

    #[test]
    fn test_door_connects() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let door = Door {
            segment: seg,
            room: RoomId(0),
            other: Some(RoomId(2)),
        };
        assert!(door.connects(RoomId(0)));
        assert!(door.connects(RoomId(2)));
        assert!(!door.connects(RoomId(1)));
        let front = Door {
            segment: seg,
            room: RoomId(0),
            other: None,
        };
        assert!(!front.connects(RoomId(1)));
    }
}
