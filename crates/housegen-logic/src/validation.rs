//! Structural checks for generated buildings.
//!
//! Pure functions over a finished [`Building`] returning every problem
//! found. Hallways are exempt from the overlap and aspect checks: they sit
//! on top of the walls they follow.

use std::collections::HashSet;

use crate::constants::{AREA_EPSILON, MAX_ASPECT_RATIO};
use crate::geometry::{quantize, Rect};
use crate::model::{Building, RoomId, RoomKind};
use crate::pathfinding::{NavGraph, NavNode};

/// A validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

impl ValidationError {
    fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

// ── A. Room geometry (per-room) ─────────────────────────────────────────

/// No room may have a damaged outline or zero or negative extent.
pub fn check_room_dimensions(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        for room in &floor.rooms {
            let r = match room.try_rect() {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ValidationError::error(
                        "room_geometry",
                        format!("Floor {} room {}: {}", floor.level, room.id, e),
                    ));
                    continue;
                }
            };
            if quantize(r.width) <= 0 || quantize(r.height) <= 0 {
                errors.push(ValidationError::error(
                    "room_geometry",
                    format!(
                        "Floor {} room {} has non-positive dimensions: {}×{}",
                        floor.level, room.id, r.width, r.height
                    ),
                ));
            }
        }
    }
    errors
}

/// Catalog rooms should not be slivers.
pub fn check_room_aspect_ratios(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        for room in floor.catalog_rooms() {
            let r = room.rect();
            if r.width <= 0.0 || r.height <= 0.0 {
                continue; // caught by dimension check
            }
            let ratio = r.width.max(r.height) / r.width.min(r.height);
            if ratio > MAX_ASPECT_RATIO {
                errors.push(ValidationError::warning(
                    "room_geometry",
                    format!(
                        "Floor {} room {} ({}) has extreme aspect ratio {:.1}:1",
                        floor.level,
                        room.id,
                        room.kind.type_name(),
                        ratio
                    ),
                ));
            }
        }
    }
    errors
}

/// Every room, hallways included, stays inside the footprint.
pub fn check_rooms_within_footprint(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        for room in &floor.rooms {
            let r = room.rect();
            if !building.footprint.contains_rect(&r) {
                errors.push(ValidationError::error(
                    "room_geometry",
                    format!(
                        "Floor {} room {} extends outside the footprint: ({:.2},{:.2})→({:.2},{:.2})",
                        floor.level,
                        room.id,
                        r.min_x(),
                        r.min_y(),
                        r.max_x(),
                        r.max_y()
                    ),
                ));
            }
        }
    }
    errors
}

// ── B. Room-to-room (pairwise) ──────────────────────────────────────────

/// No two non-hallway rooms on a floor overlap.
pub fn check_room_overlaps(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        let solid: Vec<(RoomId, Rect)> = floor
            .rooms
            .iter()
            .filter(|r| !r.kind.is_hallway())
            .map(|r| (r.id, r.rect()))
            .collect();
        for i in 0..solid.len() {
            for j in (i + 1)..solid.len() {
                if solid[i].1.overlaps(&solid[j].1) {
                    errors.push(ValidationError::error(
                        "room_overlap",
                        format!(
                            "Rooms {} and {} overlap on floor {}",
                            solid[i].0, solid[j].0, floor.level
                        ),
                    ));
                }
            }
        }
    }
    errors
}

/// Catalog rooms exactly tile each floor's usable rectangle.
pub fn check_floor_coverage(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        let mut covered = 0.0;
        for room in floor.catalog_rooms() {
            let r = room.rect();
            covered += r.area();
            if !floor.usable.contains_rect(&r) {
                errors.push(ValidationError::error(
                    "floor_coverage",
                    format!("Floor {} room {} leaves the usable area", floor.level, room.id),
                ));
            }
        }
        let target = floor.usable.area();
        if (covered - target).abs() > AREA_EPSILON * target.max(1.0) {
            errors.push(ValidationError::error(
                "floor_coverage",
                format!(
                    "Floor {}: rooms cover {:.3} m² of {:.3} m² usable",
                    floor.level, covered, target
                ),
            ));
        }
    }
    errors
}

// ── C. Entries, doors and stairs ────────────────────────────────────────

/// Room 0 is the front-door room on the ground floor and the arriving
/// stair everywhere else.
pub fn check_entry_rooms(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        let Some(entry) = floor.entry() else {
            errors.push(ValidationError::error(
                "entry",
                format!("Floor {} has no rooms", floor.level),
            ));
            continue;
        };
        let ok = if floor.level == 0 {
            matches!(entry.kind, RoomKind::OutsideConnector(_))
                && floor.doors.iter().any(|d| d.room == entry.id && d.other.is_none())
        } else {
            entry.kind.is_stairs()
        };
        if !ok {
            errors.push(ValidationError::error(
                "entry",
                format!(
                    "Floor {} entry {} is a {} without the expected access",
                    floor.level,
                    entry.id,
                    entry.kind.type_name()
                ),
            ));
        }
    }
    errors
}

/// Every room has at least one door (the front door counts).
pub fn check_rooms_have_doors(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        let connected: HashSet<RoomId> = floor
            .doors
            .iter()
            .flat_map(|d| std::iter::once(d.room).chain(d.other))
            .collect();
        for room in &floor.rooms {
            if !connected.contains(&room.id) {
                errors.push(ValidationError::error(
                    "door_validity",
                    format!(
                        "Floor {} room {} ({}) has no doors",
                        floor.level,
                        room.id,
                        room.kind.type_name()
                    ),
                ));
            }
        }
    }
    errors
}

/// Door records reference rooms that exist on their floor.
pub fn check_door_rooms_exist(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &building.floors {
        for (n, door) in floor.doors.iter().enumerate() {
            for id in std::iter::once(door.room).chain(door.other) {
                if floor.room(id).is_none() {
                    errors.push(ValidationError::error(
                        "door_validity",
                        format!("Floor {} door #{} references missing room {}", floor.level, n, id),
                    ));
                }
            }
        }
    }
    errors
}

/// Each stair link joins two stair rooms with the same rectangle.
pub fn check_stair_links(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if building.stairs.len() + 1 != building.floors.len() && !building.floors.is_empty() {
        errors.push(ValidationError::error(
            "stairs",
            format!(
                "{} floors but {} stair links",
                building.floors.len(),
                building.stairs.len()
            ),
        ));
    }
    for link in &building.stairs {
        let lower = building
            .floors
            .get(link.lower_floor)
            .and_then(|f| f.room(link.lower_room));
        let upper = building
            .floors
            .get(link.lower_floor + 1)
            .and_then(|f| f.room(link.upper_room));
        let (Some(lower), Some(upper)) = (lower, upper) else {
            errors.push(ValidationError::error(
                "stairs",
                format!("Stair link above floor {} points at missing rooms", link.lower_floor),
            ));
            continue;
        };
        let same = |r: Rect| {
            quantize(r.x) == quantize(link.rect.x)
                && quantize(r.y) == quantize(link.rect.y)
                && quantize(r.width) == quantize(link.rect.width)
                && quantize(r.height) == quantize(link.rect.height)
        };
        if !lower.kind.is_stairs() || !upper.kind.is_stairs() || !same(lower.rect()) || !same(upper.rect()) {
            errors.push(ValidationError::error(
                "stairs",
                format!("Stair shaft above floor {} is not shared verbatim", link.lower_floor),
            ));
        }
    }
    errors
}

// ── D. Connectivity (graph-level) ───────────────────────────────────────

/// Every room is reachable from the front door.
pub fn check_building_connectivity(building: &Building) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if building.floors.is_empty() {
        return errors;
    }
    let graph = NavGraph::from_building(building);
    let reached = graph.reachable_from(NavNode::new(0, RoomId(0)));
    let mut unreached: Vec<NavNode> = graph.nodes().filter(|n| !reached.contains(n)).collect();
    unreached.sort();
    if let Some(first) = unreached.first() {
        errors.push(ValidationError::error(
            "connectivity",
            format!(
                "{} of {} rooms unreachable from the front door (e.g. floor {} room {})",
                unreached.len(),
                graph.room_count(),
                first.floor,
                first.room
            ),
        ));
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every check and return combined results.
pub fn validate_building(building: &Building) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(building));
    all.extend(check_room_aspect_ratios(building));
    all.extend(check_rooms_within_footprint(building));
    all.extend(check_room_overlaps(building));
    all.extend(check_floor_coverage(building));
    all.extend(check_entry_rooms(building));
    all.extend(check_rooms_have_doors(building));
    all.extend(check_door_rooms_exist(building));
    all.extend(check_stair_links(building));
    all.extend(check_building_connectivity(building));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Segment};
    use crate::model::{Door, Floor, Room, StairLink};

    fn room(id: u32, kind: RoomKind, rect: Rect) -> Room {
        Room::new(RoomId(id), kind, rect)
    }

    fn door(a: u32, b: Option<u32>, x: f32, y: f32) -> Door {
        Door {
            segment: Segment::new(Point::new(x, y - 0.45), Point::new(x, y + 0.45)),
            room: RoomId(a),
            other: b.map(RoomId),
        }
    }

    fn floor(level: usize, usable: Rect, rooms: Vec<Room>, doors: Vec<Door>) -> Floor {
        Floor {
            level,
            rooms,
            polygon: Rect::new(0.0, 0.0, 8.0, 4.0).to_polygon(),
            usable,
            doors,
            windows: Vec::new(),
        }
    }

    /// Two floors on an 8×4 footprint with a 2 m shaft on the right.
    fn two_storey() -> Building {
        let footprint = Rect::new(0.0, 0.0, 8.0, 4.0);
        let usable = Rect::new(0.0, 0.0, 6.0, 4.0);
        let shaft = Rect::new(6.0, 0.0, 2.0, 4.0);
        let ground = floor(
            0,
            usable,
            vec![
                room(0, RoomKind::OutsideConnector("Hall".into()), Rect::new(0.0, 0.0, 3.0, 4.0)),
                room(1, RoomKind::Named("Den".into()), Rect::new(3.0, 0.0, 3.0, 4.0)),
                room(2, RoomKind::Stairs, shaft),
            ],
            vec![door(0, None, 0.0, 2.0), door(0, Some(1), 3.0, 2.0), door(1, Some(2), 6.0, 2.0)],
        );
        let upper = floor(
            1,
            usable,
            vec![
                room(0, RoomKind::Stairs, shaft),
                room(1, RoomKind::Named("Bedroom".into()), usable),
            ],
            vec![door(0, Some(1), 6.0, 2.0)],
        );
        Building {
            footprint,
            floors: vec![ground, upper],
            stairs: vec![StairLink {
                lower_floor: 0,
                lower_room: RoomId(2),
                upper_room: RoomId(0),
                rect: shaft,
            }],
        }
    }

    #[test]
    fn test_valid_building_passes() {
        let findings = validate_building(&two_storey());
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_overlap_detected_but_hallways_exempt() {
        let mut b = two_storey();
        b.floors[1]
            .rooms
            .push(room(2, RoomKind::Hallway, Rect::new(2.5, 0.0, 1.0, 4.0)));
        b.floors[1].doors.push(door(2, Some(1), 3.0, 2.0));
        assert!(check_room_overlaps(&b).is_empty());

        b.floors[0].rooms[1] = room(1, RoomKind::Named("Den".into()), Rect::new(2.0, 0.0, 4.0, 4.0));
        let errors = check_room_overlaps(&b);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "room_overlap");
    }

    #[test]
    fn test_coverage_gap_detected() {
        let mut b = two_storey();
        b.floors[1].rooms[1] = room(1, RoomKind::Named("Bedroom".into()), Rect::new(0.0, 0.0, 5.0, 4.0));
        let errors = check_floor_coverage(&b);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Floor 1"));
    }

    #[test]
    fn test_outside_footprint_detected() {
        let mut b = two_storey();
        b.floors[0].rooms[1] = room(1, RoomKind::Named("Den".into()), Rect::new(3.0, 0.0, 3.0, 5.0));
        assert_eq!(check_rooms_within_footprint(&b).len(), 1);
    }

    #[test]
    fn test_missing_front_door() {
        let mut b = two_storey();
        b.floors[0].doors.retain(|d| d.other.is_some());
        let errors = check_entry_rooms(&b);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "entry");
    }

    #[test]
    fn test_doorless_and_unreachable_rooms() {
        let mut b = two_storey();
        b.floors[1].doors.clear();
        assert_eq!(check_rooms_have_doors(&b).len(), 1 + 1);
        let errors = check_building_connectivity(&b);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("1 of 5"), "{}", errors[0].message);
    }

    #[test]
    fn test_stair_link_mismatch() {
        let mut b = two_storey();
        b.stairs[0].rect = Rect::new(6.0, 0.0, 2.0, 3.0);
        assert_eq!(check_stair_links(&b).len(), 1);
        b.stairs.clear();
        assert_eq!(check_stair_links(&b).len(), 1);
    }

    #[test]
    fn test_missing_door_target() {
        let mut b = two_storey();
        b.floors[0].doors.push(door(1, Some(9), 4.0, 2.0));
        assert_eq!(check_door_rooms_exist(&b).len(), 1);
    }

    #[test]
    fn test_damaged_outline_reported() {
        let mut b = two_storey();
        b.floors[1].rooms[1].polygon.truncate(2);
        let errors = check_room_dimensions(&b);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "room_geometry");
        assert!(errors[0].message.starts_with("Floor 1 room #1"));
    }

    #[test]
    fn test_sliver_is_only_a_warning() {
        let mut b = two_storey();
        b.floors[1].rooms[1] = room(1, RoomKind::Named("Bedroom".into()), Rect::new(0.0, 0.0, 6.0, 0.5));
        let findings = check_room_aspect_ratios(&b);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(!has_errors(&findings));
    }
}
