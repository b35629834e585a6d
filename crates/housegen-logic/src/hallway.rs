//! Corridors for rooms the door tree could not reach.
//!
//! Internal walls form a graph: every shared-wall overlap contributes its
//! two endpoints as vertices (merged on the fuzzy grid) and one edge
//! between them. Corridors run along these walls.
//!
//! - When the entry is the only room without a door-wide wall, a corridor
//!   runs the full length of its longest internal wall.
//! - Otherwise, while some room is unreachable from the entry through
//!   doors, the one farthest from the entry is joined to the reachable
//!   part of the floor along the shortest wall path (A*).
//! - Only when no remaining room has a wall path is a door forced through
//!   one of its walls, to a compatible neighbour whenever it has one.
//!
//! A carved path is split into straight runs. Each run becomes a
//! `Hallway` room centred on the wall, `hallway_width` thick, with a door
//! to every room lining it. Consecutive runs open into each other.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::astar::{astar, SearchPath};
use crate::config::HouseSpec;
use crate::connectivity::{compatible_either_way, longest_shared_wall, ConnGraph};
use crate::constants::AREA_EPSILON;
use crate::doors::{door_on_span, exterior_sides};
use crate::error::{GenerationError, Result};
use crate::geometry::{fuzzy_eq, quantize, GridPoint, Point, Rect, Segment, Side};
use crate::graph::IdentityGraph;
use crate::model::{Door, Room, RoomId};

/// A wall piece between two rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallEdge {
    pub length_sq: f32,
    /// The rooms on either side, lower id first.
    pub rooms: (RoomId, RoomId),
}

impl WallEdge {
    pub fn touches(&self, room: RoomId) -> bool {
        self.rooms.0 == room || self.rooms.1 == room
    }
}

/// Graph of wall-overlap endpoints.
#[derive(Debug, Clone, Default)]
pub struct InternalGraph {
    graph: IdentityGraph<u32, Point, WallEdge>,
    index: HashMap<GridPoint, u32>,
    by_room: HashMap<RoomId, Vec<u32>>,
}

impl InternalGraph {
    pub fn from_conn_graph(conn: &ConnGraph) -> Self {
        let mut walls = InternalGraph::default();
        conn.for_each_edge(|from, to, e| {
            let a = walls.intern(e.overlap.a);
            let b = walls.intern(e.overlap.b);
            if a == b {
                return;
            }
            let edge = WallEdge {
                length_sq: e.overlap.a.distance_sq(e.overlap.b),
                rooms: (from.min(to), from.max(to)),
            };
            walls.graph.add_edge(a, b, edge);
            walls.graph.add_edge(b, a, edge);
            for room in [from, to] {
                let list = walls.by_room.entry(room).or_default();
                for v in [a, b] {
                    if !list.contains(&v) {
                        list.push(v);
                    }
                }
            }
        });
        walls
    }

    fn intern(&mut self, p: Point) -> u32 {
        let key = GridPoint::from(p);
        if let Some(&v) = self.index.get(&key) {
            return v;
        }
        let v = self.graph.vertex_count() as u32;
        self.graph.add_vertex(v, p);
        self.index.insert(key, v);
        v
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count() / 2
    }

    /// Position of vertex `v`. Vertices are only ever handed out by this
    /// graph, so `v` is always in range.
    pub fn point(&self, v: u32) -> Point {
        let p = self.graph.vertex(&v).copied();
        debug_assert!(p.is_some(), "wall vertex {} not in graph of {}", v, self.vertex_count());
        p.unwrap_or_default()
    }

    pub fn vertex_at(&self, p: Point) -> Option<u32> {
        self.index.get(&GridPoint::from(p)).copied()
    }

    pub fn edge(&self, a: u32, b: u32) -> Option<&WallEdge> {
        self.graph.edge(a, b)
    }

    pub fn edges_from(&self, v: u32) -> impl Iterator<Item = (u32, &WallEdge)> + '_ {
        self.graph.edges_from(v)
    }

    /// Overlap endpoints on `room`'s walls.
    pub fn room_vertices(&self, room: RoomId) -> &[u32] {
        self.by_room.get(&room).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Shortest wall path between two vertices.
    pub fn shortest_path(&self, from: u32, to: u32) -> Result<SearchPath<u32>> {
        let goal = self.point(to);
        astar(
            from,
            to,
            |v| {
                self.graph
                    .edges_from(v)
                    .map(|(next, e)| (next, e.length_sq.sqrt()))
                    .collect::<Vec<_>>()
            },
            |v| self.point(v).distance(goal),
        )
    }
}

/// Hallway rooms and the doors that join them to the floor.
///
/// Hallway `k` gets `RoomId(first_id + k)`. Hallway rectangles straddle
/// the wall they follow, so each one overlaps the rooms on both sides by
/// half its width; room outlines are not cut back. Consumers that need
/// disjoint floor areas must subtract hallway rectangles themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corridors {
    pub first_id: u32,
    pub rooms: Vec<Rect>,
    pub doors: Vec<Door>,
}

impl Corridors {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.doors.is_empty()
    }
}

struct Router<'a> {
    level: usize,
    rooms: &'a [Room],
    rects: Vec<Rect>,
    conn: &'a ConnGraph,
    walls: InternalGraph,
    footprint: Rect,
    hallway_width: f32,
    door_size: f32,
    /// Doors placed so far, existing ones first.
    doors: Vec<Door>,
    out: Corridors,
    /// Targets no wall path currently reaches.
    stuck: HashSet<RoomId>,
    /// Targets that already received a forced door.
    forced: HashSet<RoomId>,
}

/// Join every room on the floor to the entry (room 0).
///
/// `doors` are the doors already placed; only the new hallways and their
/// doors are returned.
pub fn route_hallways(
    level: usize,
    rooms: &[Room],
    conn: &ConnGraph,
    disconnected: &[RoomId],
    doors: &[Door],
    footprint: &Rect,
    house: &HouseSpec,
) -> Result<Corridors> {
    let mut router = Router::new(level, rooms, conn, doors, footprint, house);

    if disconnected == [RoomId(0)] && rooms.len() > 1 {
        router.along_entry_wall();
    }

    loop {
        let targets = router.targets();
        if targets.is_empty() {
            break;
        }
        if let Some(&target) = targets.iter().find(|t| !router.stuck.contains(*t)) {
            if router.connect(target) && router.reachable().contains(&target) {
                router.reset();
            } else {
                router.stuck.insert(target);
            }
            continue;
        }
        // No remaining target can be routed to; open a wall instead.
        let Some(&target) = targets.iter().find(|t| !router.forced.contains(*t)) else {
            return Err(GenerationError::Unreachable {
                floor: level,
                room: targets[0].0,
            });
        };
        let reachable = router.reachable();
        if router.force_door(target, &reachable)? {
            router.reset();
        } else {
            router.forced.insert(target);
        }
    }

    if !router.out.rooms.is_empty() {
        log::debug!("floor {}: carved {} hallway runs", level, router.out.rooms.len());
    }
    Ok(router.out)
}

impl<'a> Router<'a> {
    fn new(
        level: usize,
        rooms: &'a [Room],
        conn: &'a ConnGraph,
        doors: &[Door],
        footprint: &Rect,
        house: &HouseSpec,
    ) -> Self {
        Router {
            level,
            rooms,
            rects: rooms.iter().map(|r| r.rect()).collect(),
            conn,
            walls: InternalGraph::from_conn_graph(conn),
            footprint: *footprint,
            hallway_width: house.hallway_width,
            door_size: house.door_size,
            doors: doors.to_vec(),
            out: Corridors {
                first_id: rooms.len() as u32,
                ..Corridors::default()
            },
            stuck: HashSet::new(),
            forced: HashSet::new(),
        }
    }

    /// The reachable part grew: every target is worth another try.
    fn reset(&mut self) {
        self.stuck.clear();
        self.forced.clear();
    }

    fn entry_centre(&self) -> Point {
        self.rects.first().map(|r| r.center()).unwrap_or_default()
    }

    /// Rooms reachable from the entry through doors (hallways included).
    fn reachable(&self) -> HashSet<RoomId> {
        let mut adj: HashMap<RoomId, Vec<RoomId>> = HashMap::new();
        for d in &self.doors {
            if let Some(other) = d.other {
                adj.entry(d.room).or_default().push(other);
                adj.entry(other).or_default().push(d.room);
            }
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(RoomId(0));
        queue.push_back(RoomId(0));
        while let Some(room) = queue.pop_front() {
            for &next in adj.get(&room).map(|v| v.as_slice()).unwrap_or(&[]) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Unreached rooms, farthest from the entry first.
    fn targets(&self) -> Vec<RoomId> {
        let reachable = self.reachable();
        let centre = self.entry_centre();
        let mut targets: Vec<RoomId> = self
            .rooms
            .iter()
            .map(|r| r.id)
            .filter(|id| !reachable.contains(id))
            .collect();
        // Stable: ties keep room order.
        targets.sort_by(|a, b| {
            let da = self.rects[a.index()].center().distance_sq(centre);
            let db = self.rects[b.index()].center().distance_sq(centre);
            db.total_cmp(&da)
        });
        targets
    }

    /// Corridor along the full length of the entry's longest internal wall.
    fn along_entry_wall(&mut self) {
        let entry = RoomId(0);
        let rect = self.rects[0];
        let exterior = exterior_sides(&rect, &self.footprint);
        let side = Side::ALL
            .into_iter()
            .filter(|s| !exterior.contains(s))
            .max_by(|a, b| rect.side_length(*a).total_cmp(&rect.side_length(*b)));
        let Some(side) = side else {
            return;
        };

        let line = rect.side_coord(side);
        let along = |p: Point| if side.is_horizontal() { p.x } else { p.y };
        let mut on_wall: Vec<u32> = self
            .walls
            .room_vertices(entry)
            .iter()
            .copied()
            .filter(|&v| {
                let p = self.walls.point(v);
                fuzzy_eq(if side.is_horizontal() { p.y } else { p.x }, line)
            })
            .collect();
        on_wall.sort_by(|&a, &b| along(self.walls.point(a)).total_cmp(&along(self.walls.point(b))));

        // Split wherever consecutive points are not joined by a wall piece.
        let mut piece = Vec::new();
        for v in on_wall {
            if let Some(&last) = piece.last() {
                if self.walls.edge(last, v).is_none() {
                    self.carve(&piece);
                    piece.clear();
                }
            }
            piece.push(v);
        }
        self.carve(&piece);
        log::debug!("floor {}: entry joined along its {:?} wall", self.level, side);
    }

    /// Carve a wall path from the reachable part of the floor to `target`.
    /// False when no wall path exists.
    fn connect(&mut self, target: RoomId) -> bool {
        let reachable = self.reachable();
        let mut starts: Vec<u32> = Vec::new();
        for room in self.rooms.iter().filter(|r| reachable.contains(&r.id)) {
            for &v in self.walls.room_vertices(room.id) {
                if !starts.contains(&v) {
                    starts.push(v);
                }
            }
        }
        let goals = self.walls.room_vertices(target).to_vec();

        let mut pairs: Vec<(f32, u32, u32)> = Vec::new();
        for &s in &starts {
            for &g in &goals {
                if s != g {
                    pairs.push((self.walls.point(s).distance_sq(self.walls.point(g)), s, g));
                }
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, s, g) in pairs {
            let Ok(found) = self.walls.shortest_path(s, g) else {
                continue;
            };
            if found.edge_count() == 0 {
                continue;
            }
            let path = self.anchor(found.vertices, &reachable, target);
            log::debug!(
                "floor {}: hallway to {} over {} wall pieces",
                self.level,
                target,
                path.len() - 1
            );
            self.carve(&path);
            return true;
        }

        false
    }

    /// Make sure the path runs along a wall of a reachable room at its
    /// start and along a wall of `target` at its end.
    fn anchor(&self, mut path: Vec<u32>, reachable: &HashSet<RoomId>, target: RoomId) -> Vec<u32> {
        let edge_touches = |path: &[u32], pred: &dyn Fn(&WallEdge) -> bool| {
            path.windows(2)
                .any(|w| self.walls.edge(w[0], w[1]).is_some_and(|e| pred(e)))
        };
        let is_start_room = |e: &WallEdge| reachable.contains(&e.rooms.0) || reachable.contains(&e.rooms.1);
        let is_target = |e: &WallEdge| e.touches(target);

        if !edge_touches(&path, &is_start_room) {
            let first = path[0];
            if let Some((prev, _)) = self.walls.edges_from(first).find(|(_, e)| is_start_room(e)) {
                path.insert(0, prev);
            }
        }
        if !edge_touches(&path, &is_target) {
            let last = path[path.len() - 1];
            if let Some((next, _)) = self.walls.edges_from(last).find(|(_, e)| is_target(e)) {
                path.push(next);
            }
        }
        path
    }

    /// Turn a wall path into hallway rooms and doors.
    fn carve(&mut self, path: &[u32]) {
        if path.len() < 2 {
            return;
        }
        let points: Vec<Point> = path.iter().map(|&v| self.walls.point(v)).collect();

        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for k in 1..points.len() - 1 {
            let before = Segment::new(points[k - 1], points[k]).is_horizontal();
            let after = Segment::new(points[k], points[k + 1]).is_horizontal();
            if before != after {
                runs.push((start, k));
                start = k;
            }
        }
        runs.push((start, points.len() - 1));

        let mut previous: Option<(RoomId, Point, bool)> = None;
        for (from, to) in runs {
            let horizontal = Segment::new(points[from], points[to]).is_horizontal();
            let coords = points[from..=to].iter().map(|p| if horizontal { p.x } else { p.y });
            let lo = coords.clone().fold(f32::MAX, f32::min);
            let hi = coords.fold(f32::MIN, f32::max);
            let run = if horizontal {
                let y = points[from].y;
                Segment::new(Point::new(lo, y), Point::new(hi, y))
            } else {
                let x = points[from].x;
                Segment::new(Point::new(x, lo), Point::new(x, hi))
            };

            let id = self.add_hallway(&run, horizontal);
            self.door_rooms_along(id, &run, horizontal);

            if let Some((prev, corner, prev_horizontal)) = previous {
                let half = self.door_size.min(self.hallway_width) / 2.0;
                let segment = if prev_horizontal {
                    Segment::new(Point::new(corner.x - half, corner.y), Point::new(corner.x + half, corner.y))
                } else {
                    Segment::new(Point::new(corner.x, corner.y - half), Point::new(corner.x, corner.y + half))
                };
                self.push_door(Door {
                    segment,
                    room: prev,
                    other: Some(id),
                });
            }
            previous = Some((id, points[to], horizontal));
        }
    }

    /// A `hallway_width` strip centred on `run`, clipped to the footprint.
    /// It overlays the rooms on either side of the wall.
    fn add_hallway(&mut self, run: &Segment, horizontal: bool) -> RoomId {
        let half = self.hallway_width / 2.0;
        let rect = if horizontal {
            Rect::new(run.a.x, run.a.y - half, run.length(), self.hallway_width)
        } else {
            Rect::new(run.a.x - half, run.a.y, self.hallway_width, run.length())
        };
        let id = RoomId(self.out.first_id + self.out.rooms.len() as u32);
        self.out.rooms.push(rect.intersect(&self.footprint));
        id
    }

    /// Give every room lining `run` a door onto hallway `id`.
    fn door_rooms_along(&mut self, id: RoomId, run: &Segment, horizontal: bool) {
        let line = if horizontal { run.a.y } else { run.a.x };
        let (run_lo, run_hi) = if horizontal {
            (run.a.x, run.b.x)
        } else {
            (run.a.y, run.b.y)
        };
        let sides = if horizontal {
            [Side::Top, Side::Bottom]
        } else {
            [Side::Left, Side::Right]
        };

        for i in 0..self.rooms.len() {
            let rect = self.rects[i];
            let Some(side) = sides.into_iter().find(|&s| fuzzy_eq(rect.side_coord(s), line)) else {
                continue;
            };
            let (lo, hi) = rect.side_span(side);
            let lo = lo.max(run_lo);
            let hi = hi.min(run_hi);
            if quantize(hi) <= quantize(lo) {
                continue;
            }
            let segment = door_on_span(run, lo, hi, self.door_size);
            self.push_door(Door {
                segment,
                room: id,
                other: Some(self.rooms[i].id),
            });
        }
    }

    /// Last resort: open one of the target's walls.
    ///
    /// Compatible neighbours come first, reachable ones before the rest;
    /// a wall between rooms that do not list each other is only opened
    /// when the target has no compatible neighbour at all.
    ///
    /// Returns whether the door joined `target` to the reachable part.
    fn force_door(&mut self, target: RoomId, reachable: &HashSet<RoomId>) -> Result<bool> {
        let longest = |compatible: bool, towards_reachable: bool| {
            self.conn
                .edges_from(target)
                .filter(|(to, e)| {
                    e.overlap.length() > AREA_EPSILON
                        && compatible_either_way(self.conn, target, *to) == compatible
                        && (!towards_reachable || reachable.contains(to))
                })
                .max_by(|a, b| a.1.overlap.length().total_cmp(&b.1.overlap.length()))
                .map(|(to, e)| (to, *e))
        };
        let chosen = longest(true, true)
            .or_else(|| longest(true, false))
            .map(|pick| (pick, true))
            .or_else(|| {
                longest(false, true)
                    .or_else(|| longest_shared_wall(self.conn, target))
                    .map(|pick| (pick, false))
            });
        let Some(((neighbour, wall), compatible)) = chosen else {
            return Err(GenerationError::Unreachable {
                floor: self.level,
                room: target.0,
            });
        };

        if compatible {
            log::warn!(
                "floor {}: no hallway route to {}, forcing a door to {}",
                self.level,
                target,
                neighbour
            );
        } else {
            log::warn!(
                "floor {}: no hallway route to {} and no compatible neighbour, forcing a door to {} against the catalog",
                self.level,
                target,
                neighbour
            );
        }
        let length = wall.overlap.length();
        self.push_door(Door {
            segment: wall.overlap.centered(self.door_size.min(length)),
            room: target,
            other: Some(neighbour),
        });
        Ok(reachable.contains(&neighbour))
    }

    fn push_door(&mut self, door: Door) {
        self.doors.push(door);
        self.out.doors.push(door);
    }
}
