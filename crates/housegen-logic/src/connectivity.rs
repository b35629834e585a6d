//! Room adjacency on one floor, and which rooms lack a usable door.
//!
//! Every ordered pair of rooms is tested for a shared wall. A match becomes
//! a directed edge carrying the side, the overlap along it, whether the
//! source room's type may open onto the neighbour (`can_connect`) and
//! whether the overlap is wide enough for a door (`has_door`). Both
//! directions are stored separately since adjacency rules are not
//! required to be symmetric.
//!
//! Compatibility for the non-catalog kinds:
//! - a hallway is compatible with everything, in both directions;
//! - a stair is compatible with a catalog room when that room lists
//!   `Stairs`, and never with another stair.

use crate::config::RoomCatalog;
use crate::constants::AREA_EPSILON;
use crate::error::{GenerationError, Result};
use crate::geometry::{quantize, shared_wall, Rect, Segment, Side};
use crate::graph::IdentityGraph;
use crate::model::{Room, RoomId, RoomKind};

/// Per-room vertex data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomNode {
    pub rect: Rect,
    /// Set by [`find_disconnected`] once the room is known to be joinable.
    pub can_connect: bool,
}

/// A shared wall seen from one of its two rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnEdge {
    pub neighbour: RoomId,
    /// Side of the source room the wall lies on.
    pub side: Side,
    pub overlap: Segment,
    pub can_connect: bool,
    pub has_door: bool,
}

pub type ConnGraph = IdentityGraph<RoomId, RoomNode, ConnEdge>;

/// Whether a room of kind `from` may open onto a room of kind `to`.
fn kinds_compatible(catalog: &RoomCatalog, from: &RoomKind, to: &RoomKind) -> Result<bool> {
    if from.is_hallway() || to.is_hallway() {
        return Ok(true);
    }
    let lookup = |kind: &RoomKind| {
        let name = kind.type_name();
        catalog
            .get(name)
            .ok_or_else(|| GenerationError::UnknownRoomType(name.to_string()))
    };
    match (from.is_stairs(), to.is_stairs()) {
        (true, true) => Ok(false),
        (true, false) => Ok(lookup(to)?.can_border(from.type_name())),
        (false, _) => Ok(lookup(from)?.can_border(to.type_name())),
    }
}

/// Build the adjacency graph for one floor's rooms.
///
/// Vertices follow the room order, so `RoomId(i)` is `rooms[i]`.
pub fn build_conn_graph(rooms: &[Room], catalog: &RoomCatalog, door_size: f32) -> Result<ConnGraph> {
    let mut graph = ConnGraph::new();
    let rects: Vec<Rect> = rooms.iter().map(|r| r.rect()).collect();

    for (room, rect) in rooms.iter().zip(&rects) {
        graph.add_vertex(
            room.id,
            RoomNode {
                rect: *rect,
                can_connect: false,
            },
        );
    }

    for (i, a) in rooms.iter().enumerate() {
        for (j, b) in rooms.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some((side, overlap)) = shared_wall(&rects[i], &rects[j]) else {
                continue;
            };
            let edge = ConnEdge {
                neighbour: b.id,
                side,
                overlap,
                can_connect: kinds_compatible(catalog, &a.kind, &b.kind)?,
                has_door: quantize(overlap.length()) >= quantize(door_size),
            };
            graph.add_edge(a.id, b.id, edge);
        }
    }

    Ok(graph)
}

/// True when either direction of the `a`–`b` wall is compatible.
pub fn compatible_either_way(graph: &ConnGraph, a: RoomId, b: RoomId) -> bool {
    graph.edge(a, b).is_some_and(|e| e.can_connect) || graph.edge(b, a).is_some_and(|e| e.can_connect)
}

/// Rooms without any wall wide enough for a door, in room order.
///
/// Marks `can_connect` on vertices as a side effect: both ends of every
/// door-wide wall, and both ends of every compatible wall seen from a room
/// that has no door-wide wall. The entry is left out of the result unless
/// it would be the only member.
pub fn find_disconnected(graph: &mut ConnGraph, entry: RoomId) -> Vec<RoomId> {
    let order: Vec<RoomId> = graph.vertices().collect();
    let mut disconnected = Vec::new();

    for room in order {
        let edges: Vec<(RoomId, ConnEdge)> = graph.edges_from(room).map(|(to, e)| (to, *e)).collect();

        if let Some((to, _)) = edges.iter().find(|(_, e)| e.has_door) {
            mark(graph, room);
            mark(graph, *to);
            continue;
        }

        for (to, e) in &edges {
            let reverse = graph.edge(*to, room).is_some_and(|r| r.can_connect);
            if e.can_connect || reverse {
                mark(graph, room);
                mark(graph, *to);
            }
        }
        disconnected.push(room);
    }

    if disconnected.len() > 1 {
        disconnected.retain(|&r| r != entry);
    }
    if !disconnected.is_empty() {
        log::debug!("disconnected rooms: {:?}", disconnected);
    }
    disconnected
}

fn mark(graph: &mut ConnGraph, room: RoomId) {
    if let Some(node) = graph.vertex_mut(&room) {
        node.can_connect = true;
    }
}

/// Longest wall of `room` shared with any neighbour, if it has one.
pub fn longest_shared_wall(graph: &ConnGraph, room: RoomId) -> Option<(RoomId, ConnEdge)> {
    graph
        .edges_from(room)
        .filter(|(_, e)| e.overlap.length() > AREA_EPSILON)
        .max_by(|a, b| a.1.overlap.length().total_cmp(&b.1.overlap.length()))
        .map(|(to, e)| (to, *e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomSpec;
    use crate::geometry::fuzzy_eq;

    fn catalog() -> RoomCatalog {
        RoomCatalog::new(vec![
            RoomSpec::new("Hall", &["Outside", "Bedroom", "Stairs"], 10.0, 2, 0),
            RoomSpec::new("Bedroom", &["Hall"], 10.0, 4, 0),
            RoomSpec::new("Vault", &[], 4.0, 1, 0),
        ])
    }

    fn room(id: u32, kind: RoomKind, rect: Rect) -> Room {
        Room::new(RoomId(id), kind, rect)
    }

    fn named(name: &str) -> RoomKind {
        RoomKind::Named(name.to_string())
    }

    /// Hall | Bedroom on the bottom row, a narrow Vault on top of the hall.
    ///
    /// ```text
    ///   ┌───┐
    ///   │ V │
    ///   ├───┴───┬───────┐
    ///   │ Hall  │  Bed  │
    ///   └───────┴───────┘
    /// ```
    fn sample_rooms() -> Vec<Room> {
        vec![
            room(0, RoomKind::OutsideConnector("Hall".into()), Rect::new(0.0, 0.0, 4.0, 3.0)),
            room(1, named("Bedroom"), Rect::new(4.0, 0.0, 4.0, 3.0)),
            room(2, named("Vault"), Rect::new(0.0, 3.0, 0.5, 1.0)),
        ]
    }

    #[test]
    fn test_edges_mirror_each_other() {
        let rooms = sample_rooms();
        let graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        let mut checked = 0;
        graph.for_each_edge(|from, to, e| {
            let back = graph.edge(to, from).expect("reverse edge missing");
            assert_eq!(back.side, e.side.opposite());
            assert!(e.overlap.a.fuzzy_eq(back.overlap.a));
            assert!(e.overlap.b.fuzzy_eq(back.overlap.b));
            assert_eq!(e.neighbour, to);
            checked += 1;
        });
        assert_eq!(checked, 4);
    }

    #[test]
    fn test_door_fit_uses_overlap_length() {
        let rooms = sample_rooms();
        let graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        let wall = graph.edge(RoomId(0), RoomId(1)).unwrap();
        assert_eq!(wall.side, Side::Right);
        assert!(fuzzy_eq(wall.overlap.length(), 3.0));
        assert!(wall.has_door);
        // The vault only offers 0.5 m of wall
        assert!(!graph.edge(RoomId(0), RoomId(2)).unwrap().has_door);
    }

    #[test]
    fn test_compatibility_is_directional() {
        let rooms = sample_rooms();
        let graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        assert!(graph.edge(RoomId(0), RoomId(1)).unwrap().can_connect);
        assert!(graph.edge(RoomId(1), RoomId(0)).unwrap().can_connect);
        // Hall does not list Vault and Vault lists nothing
        assert!(!graph.edge(RoomId(0), RoomId(2)).unwrap().can_connect);
        assert!(!compatible_either_way(&graph, RoomId(0), RoomId(2)));
    }

    #[test]
    fn test_stairs_and_hallways() {
        let rooms = vec![
            room(0, RoomKind::Stairs, Rect::new(0.0, 0.0, 2.0, 4.0)),
            room(1, named("Hall"), Rect::new(2.0, 0.0, 3.0, 4.0)),
            room(2, named("Bedroom"), Rect::new(5.0, 0.0, 3.0, 2.0)),
            room(3, RoomKind::Hallway, Rect::new(5.0, 2.0, 3.0, 2.0)),
        ];
        let graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        // Hall lists Stairs, so the stair opens onto it too
        assert!(graph.edge(RoomId(0), RoomId(1)).unwrap().can_connect);
        assert!(graph.edge(RoomId(1), RoomId(0)).unwrap().can_connect);
        // Bedroom lists nothing but Hall, yet a hallway takes anyone
        assert!(graph.edge(RoomId(2), RoomId(3)).unwrap().can_connect);
        assert!(graph.edge(RoomId(3), RoomId(2)).unwrap().can_connect);
    }

    #[test]
    fn test_unknown_room_type() {
        let rooms = vec![
            room(0, named("Hall"), Rect::new(0.0, 0.0, 2.0, 2.0)),
            room(1, named("Ballroom"), Rect::new(2.0, 0.0, 2.0, 2.0)),
        ];
        let err = build_conn_graph(&rooms, &catalog(), 0.9).unwrap_err();
        assert!(matches!(err, GenerationError::UnknownRoomType(name) if name == "Ballroom"));
    }

    #[test]
    fn test_disconnected_excludes_entry_when_others_present() {
        // Entry touches the bedroom by 0.5 m only; vault touches nothing usable.
        let rooms = vec![
            room(0, RoomKind::OutsideConnector("Hall".into()), Rect::new(0.0, 0.0, 4.0, 3.0)),
            room(1, named("Bedroom"), Rect::new(4.0, 2.5, 4.0, 3.0)),
            room(2, named("Vault"), Rect::new(8.0, 5.0, 1.0, 0.5)),
        ];
        let mut graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        let disconnected = find_disconnected(&mut graph, RoomId(0));
        assert_eq!(disconnected, vec![RoomId(1), RoomId(2)]);
        // Hall and bedroom are compatible, so both are flagged joinable
        assert!(graph.vertex(&RoomId(0)).unwrap().can_connect);
        assert!(graph.vertex(&RoomId(1)).unwrap().can_connect);
        assert!(!graph.vertex(&RoomId(2)).unwrap().can_connect);
    }

    #[test]
    fn test_entry_alone_is_reported() {
        // Stair entry below the hall; hall and bedroom share a full wall.
        let rooms = vec![
            room(0, RoomKind::Stairs, Rect::new(0.0, 0.0, 2.0, 0.5)),
            room(1, named("Hall"), Rect::new(0.0, 0.5, 4.0, 3.0)),
            room(2, named("Bedroom"), Rect::new(4.0, 0.5, 4.0, 3.0)),
        ];
        let mut graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        // Narrow the stair-hall wall below door width.
        for e in [(0, 1), (1, 0)] {
            graph.edge_mut(RoomId(e.0), RoomId(e.1)).unwrap().has_door = false;
        }
        assert_eq!(find_disconnected(&mut graph, RoomId(0)), vec![RoomId(0)]);
    }

    #[test]
    fn test_fully_connected_floor() {
        let rooms = sample_rooms()[..2].to_vec();
        let mut graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        assert!(find_disconnected(&mut graph, RoomId(0)).is_empty());
    }

    #[test]
    fn test_longest_shared_wall() {
        let rooms = sample_rooms();
        let graph = build_conn_graph(&rooms, &catalog(), 0.9).unwrap();
        let (to, e) = longest_shared_wall(&graph, RoomId(0)).unwrap();
        assert_eq!(to, RoomId(1));
        assert!(fuzzy_eq(e.overlap.length(), 3.0));
    }
}
