//! Walking routes through a finished building.
//!
//! `NavGraph` is an adjacency list built from every door on every floor
//! plus one link per stair shaft (the stair room on the lower floor and
//! its twin on the floor above). Paths are found breadth-first and cached.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::model::{Building, RoomId};

/// A room anywhere in the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavNode {
    pub floor: usize,
    pub room: RoomId,
}

impl NavNode {
    pub fn new(floor: usize, room: RoomId) -> Self {
        Self { floor, room }
    }
}

/// A passage between two rooms: a door, or a flight of stairs.
#[derive(Debug, Clone, Copy)]
pub struct NavEdge {
    pub a: NavNode,
    pub b: NavNode,
    /// Door midpoint, or the shaft centre for stairs.
    pub at: Point,
}

/// One step of a path: pass through `at`, arrive in `node`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub at: Point,
    pub node: NavNode,
}

/// Room adjacency for a whole building, with a bounded path cache.
pub struct NavGraph {
    adj: HashMap<NavNode, Vec<(NavNode, Point)>>,
    cache: HashMap<(NavNode, NavNode), Vec<Waypoint>>,
    cache_capacity: usize,
}

impl NavGraph {
    pub fn from_edges(edges: &[NavEdge]) -> Self {
        Self::from_edges_with_cache(edges, 256)
    }

    pub fn from_edges_with_cache(edges: &[NavEdge], cache_capacity: usize) -> Self {
        let mut adj: HashMap<NavNode, Vec<(NavNode, Point)>> = HashMap::new();
        for e in edges {
            adj.entry(e.a).or_default().push((e.b, e.at));
            adj.entry(e.b).or_default().push((e.a, e.at));
        }
        Self {
            adj,
            cache: HashMap::new(),
            cache_capacity,
        }
    }

    /// Every room of `building` is a node, even one without doors.
    pub fn from_building(building: &Building) -> Self {
        let mut graph = Self::from_edges(&building_edges(building));
        for floor in &building.floors {
            for room in &floor.rooms {
                graph.adj.entry(NavNode::new(floor.level, room.id)).or_default();
            }
        }
        graph
    }

    /// Route from `from` to `to`.
    ///
    /// Empty for `from == to`, `None` when unreachable.
    pub fn find_path(&mut self, from: NavNode, to: NavNode) -> Option<Vec<Waypoint>> {
        if from == to {
            return Some(vec![]);
        }

        let key = (from, to);
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached.clone());
        }

        let result = self.bfs(from, to);

        if let Some(ref path) = result {
            if self.cache.len() >= self.cache_capacity {
                if let Some(&evict) = self.cache.keys().next() {
                    self.cache.remove(&evict);
                }
            }
            self.cache.insert(key, path.clone());
        }

        result
    }

    /// Every room reachable from `start`, including `start`.
    pub fn reachable_from(&self, start: NavNode) -> HashSet<NavNode> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for &(next, _) in self.neighbours(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    pub fn neighbours(&self, node: NavNode) -> &[(NavNode, Point)] {
        self.adj.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_room(&self, node: NavNode) -> bool {
        self.adj.contains_key(&node)
    }

    pub fn room_count(&self) -> usize {
        self.adj.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NavNode> + '_ {
        self.adj.keys().copied()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn bfs(&self, from: NavNode, to: NavNode) -> Option<Vec<Waypoint>> {
        let mut parent: HashMap<NavNode, (NavNode, Point)> = HashMap::new();
        let mut queue = VecDeque::new();
        parent.insert(from, (from, Point::default()));
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &(next, at) in self.neighbours(current) {
                if parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, (current, at));
                if next == to {
                    return Some(unwind(&parent, from, to));
                }
                queue.push_back(next);
            }
        }

        None
    }
}

fn unwind(parent: &HashMap<NavNode, (NavNode, Point)>, from: NavNode, to: NavNode) -> Vec<Waypoint> {
    let mut path = Vec::new();
    let mut node = to;
    while node != from {
        let Some(&(prev, at)) = parent.get(&node) else {
            break;
        };
        path.push(Waypoint { at, node });
        node = prev;
    }
    path.reverse();
    path
}

/// Door and stair edges of a building.
pub fn building_edges(building: &Building) -> Vec<NavEdge> {
    let mut edges = Vec::new();
    for floor in &building.floors {
        for door in &floor.doors {
            if let Some(other) = door.other {
                edges.push(NavEdge {
                    a: NavNode::new(floor.level, door.room),
                    b: NavNode::new(floor.level, other),
                    at: door.segment.midpoint(),
                });
            }
        }
    }
    for link in &building.stairs {
        edges.push(NavEdge {
            a: NavNode::new(link.lower_floor, link.lower_room),
            b: NavNode::new(link.lower_floor + 1, link.upper_room),
            at: link.rect.center(),
        });
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(floor: usize, room: u32) -> NavNode {
        NavNode::new(floor, RoomId(room))
    }

    fn edge(a: NavNode, b: NavNode, x: f32, y: f32) -> NavEdge {
        NavEdge {
            a,
            b,
            at: Point::new(x, y),
        }
    }

    /// A --door--> B --door--> C, all on the ground floor.
    fn linear_graph() -> NavGraph {
        NavGraph::from_edges(&[
            edge(node(0, 1), node(0, 2), 10.0, 5.0),
            edge(node(0, 2), node(0, 3), 20.0, 5.0),
        ])
    }

    #[test]
    fn test_same_room() {
        let mut graph = linear_graph();
        assert_eq!(graph.find_path(node(0, 1), node(0, 1)), Some(vec![]));
    }

    #[test]
    fn test_adjacent_rooms() {
        let mut graph = linear_graph();
        let path = graph.find_path(node(0, 1), node(0, 2)).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].node, node(0, 2));
        assert!((path[0].at.x - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_multi_hop_both_directions() {
        let mut graph = linear_graph();
        let forward = graph.find_path(node(0, 1), node(0, 3)).unwrap();
        assert_eq!(forward.iter().map(|w| w.node).collect::<Vec<_>>(), vec![node(0, 2), node(0, 3)]);
        let back = graph.find_path(node(0, 3), node(0, 1)).unwrap();
        assert_eq!(back.iter().map(|w| w.node).collect::<Vec<_>>(), vec![node(0, 2), node(0, 1)]);
    }

    #[test]
    fn test_unreachable() {
        let mut graph = NavGraph::from_edges(&[edge(node(0, 1), node(0, 2), 1.0, 1.0)]);
        assert_eq!(graph.find_path(node(0, 1), node(0, 99)), None);
        assert_eq!(graph.cache_size(), 0, "failed searches are not cached");
    }

    #[test]
    fn test_cross_floor_via_stairs() {
        // Floor 0: rooms 0, 1 and stair 2. Floor 1: stair 0, room 1.
        let mut graph = NavGraph::from_edges(&[
            edge(node(0, 0), node(0, 1), 2.0, 1.0),
            edge(node(0, 1), node(0, 2), 4.0, 1.0),
            edge(node(0, 2), node(1, 0), 5.0, 1.0),
            edge(node(1, 0), node(1, 1), 4.0, 1.0),
        ]);
        let path = graph.find_path(node(0, 0), node(1, 1)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[2].node, node(1, 0));
        assert_eq!(path.last().unwrap().node, node(1, 1));
    }

    #[test]
    fn test_cache_hit_and_eviction() {
        let mut graph = NavGraph::from_edges_with_cache(
            &[
                edge(node(0, 1), node(0, 2), 1.0, 0.0),
                edge(node(0, 2), node(0, 3), 2.0, 0.0),
                edge(node(0, 3), node(0, 4), 3.0, 0.0),
            ],
            2,
        );
        let first = graph.find_path(node(0, 1), node(0, 3)).unwrap();
        assert_eq!(graph.cache_size(), 1);
        assert_eq!(graph.find_path(node(0, 1), node(0, 3)).unwrap(), first);
        assert_eq!(graph.cache_size(), 1);
        graph.find_path(node(0, 1), node(0, 2));
        graph.find_path(node(0, 1), node(0, 4));
        assert_eq!(graph.cache_size(), 2);
        graph.clear_cache();
        assert_eq!(graph.cache_size(), 0);
    }

    #[test]
    fn test_reachable_from() {
        let graph = NavGraph::from_edges(&[
            edge(node(0, 1), node(0, 2), 0.0, 0.0),
            edge(node(0, 2), node(0, 3), 0.0, 0.0),
            edge(node(0, 7), node(0, 8), 0.0, 0.0),
        ]);
        let reached = graph.reachable_from(node(0, 3));
        assert_eq!(reached.len(), 3);
        assert!(!reached.contains(&node(0, 7)));
        assert!(graph.has_room(node(0, 8)));
        assert_eq!(graph.neighbours(node(0, 2)).len(), 2);
    }

    #[test]
    fn test_branching_prefers_fewest_hops() {
        //     1
        //    / \
        //   2   3
        //  / \
        // 4   5
        let mut graph = NavGraph::from_edges(&[
            edge(node(0, 1), node(0, 2), 5.0, 5.0),
            edge(node(0, 1), node(0, 3), 15.0, 5.0),
            edge(node(0, 2), node(0, 4), 3.0, 10.0),
            edge(node(0, 2), node(0, 5), 7.0, 10.0),
        ]);
        let path = graph.find_path(node(0, 3), node(0, 5)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[2].node, node(0, 5));
    }
}
