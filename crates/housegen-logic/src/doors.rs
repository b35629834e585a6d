//! Door and window placement for one floor.
//!
//! Doors form a spanning tree grown breadth-first from the entry room.
//! The tree only crosses door-wide walls where at least one of the two
//! rooms lists the other as a neighbour. Every tree edge gets a single
//! door centred on the shared wall. Rooms left out of the tree are the
//! hallway router's job, since a hallway may border anything.

use std::collections::{HashSet, VecDeque};

use crate::connectivity::{compatible_either_way, ConnGraph};
use crate::geometry::{fuzzy_eq, fuzzy_le, Point, Rect, Segment, Side};
use crate::model::{Door, Room, RoomId, Window};

/// Grow the door tree from `entry`.
pub fn place_doors(graph: &ConnGraph, entry: RoomId, door_size: f32) -> Vec<Door> {
    let mut doors = Vec::new();
    if !graph.contains_vertex(&entry) {
        return doors;
    }
    let mut reached: HashSet<RoomId> = HashSet::new();
    let mut queue: VecDeque<RoomId> = VecDeque::new();
    reached.insert(entry);
    queue.push_back(entry);

    while let Some(room) = queue.pop_front() {
        for (next, edge) in graph.edges_from(room) {
            if !edge.has_door || reached.contains(&next) {
                continue;
            }
            if !compatible_either_way(graph, room, next) {
                continue;
            }
            reached.insert(next);
            queue.push_back(next);
            doors.push(Door {
                segment: edge.overlap.centered(door_size),
                room,
                other: Some(next),
            });
        }
    }

    doors
}

/// Sides of `rect` lying on the footprint boundary, longest first.
pub fn exterior_sides(rect: &Rect, footprint: &Rect) -> Vec<Side> {
    let mut sides: Vec<Side> = Side::ALL
        .into_iter()
        .filter(|&s| rect.side_on_boundary(s, footprint))
        .collect();
    // Stable: equal lengths keep Top, Left, Bottom, Right order.
    sides.sort_by(|a, b| rect.side_length(*b).total_cmp(&rect.side_length(*a)));
    sides
}

/// Front door for the ground-floor entry, on its longest exterior wall.
pub fn front_door(room: &Room, footprint: &Rect, door_size: f32) -> Option<(Side, Door)> {
    let rect = room.rect();
    let side = *exterior_sides(&rect, footprint).first()?;
    let door = Door {
        segment: rect.side_segment(side).centered(door_size),
        room: room.id,
        other: None,
    };
    Some((side, door))
}

/// One window per catalog room, centred on its longest exterior wall.
///
/// `skip` names a wall already holding the front door; that room's window
/// goes on its next longest exterior wall, if any.
pub fn place_windows(
    rooms: &[Room],
    footprint: &Rect,
    window_size: f32,
    skip: Option<(RoomId, Side)>,
) -> Vec<Window> {
    let mut windows = Vec::new();
    for room in rooms.iter().filter(|r| r.kind.is_catalog_room()) {
        let rect = room.rect();
        let side = exterior_sides(&rect, footprint)
            .into_iter()
            .find(|&s| skip != Some((room.id, s)));
        let Some(side) = side else {
            continue;
        };
        let wall = rect.side_segment(side);
        windows.push(Window {
            segment: wall.centered(window_size.min(wall.length() / 2.0)),
            room: room.id,
        });
    }
    windows
}

/// Door of at most `door_size` centred on the part of `wall` between `lo`
/// and `hi` (coordinates along the wall's own axis).
pub fn door_on_span(wall: &Segment, lo: f32, hi: f32, door_size: f32) -> Segment {
    let (a, b) = if wall.is_horizontal() {
        (Point::new(lo, wall.a.y), Point::new(hi, wall.a.y))
    } else {
        (Point::new(wall.a.x, lo), Point::new(wall.a.x, hi))
    };
    let span = Segment::new(a, b);
    span.centered(door_size.min(span.length()))
}

/// True when the door lies on one of `room`'s walls.
pub fn door_on_room_wall(door: &Segment, room: &Rect) -> bool {
    Side::ALL.into_iter().any(|side| {
        let c = room.side_coord(side);
        let (lo, hi) = room.side_span(side);
        if side.is_horizontal() {
            fuzzy_eq(door.a.y, c)
                && fuzzy_eq(door.b.y, c)
                && fuzzy_le(lo, door.a.x.min(door.b.x))
                && fuzzy_le(door.a.x.max(door.b.x), hi)
        } else {
            fuzzy_eq(door.a.x, c)
                && fuzzy_eq(door.b.x, c)
                && fuzzy_le(lo, door.a.y.min(door.b.y))
                && fuzzy_le(door.a.y.max(door.b.y), hi)
        }
    })
}
