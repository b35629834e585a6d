//! Directed graph keyed by vertex identity.
//!
//! Vertices are any `Copy + Eq + Hash` handle (a [`RoomId`](crate::model::RoomId),
//! a wall-point index). Each vertex carries data `VD`; each directed edge
//! `(from, to)` carries data `E`. Iteration follows insertion order so
//! generation stays deterministic for a fixed seed.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct VertexEntry<V, VD> {
    data: VD,
    /// Outgoing neighbours in insertion order.
    out: Vec<V>,
}

/// Identity-keyed directed graph with per-vertex edge lists.
#[derive(Debug, Clone)]
pub struct IdentityGraph<V, VD, E> {
    order: Vec<V>,
    vertices: HashMap<V, VertexEntry<V, VD>>,
    edges: HashMap<(V, V), E>,
}

impl<V: Copy + Eq + Hash, VD, E> Default for IdentityGraph<V, VD, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy + Eq + Hash, VD, E> IdentityGraph<V, VD, E> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            vertices: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Add a vertex. Returns false (and keeps the old data) if it exists.
    pub fn add_vertex(&mut self, v: V, data: VD) -> bool {
        if self.vertices.contains_key(&v) {
            return false;
        }
        self.order.push(v);
        self.vertices.insert(v, VertexEntry { data, out: Vec::new() });
        true
    }

    /// Add or replace the directed edge `from → to`.
    ///
    /// Both endpoints must already be vertices; returns false otherwise.
    pub fn add_edge(&mut self, from: V, to: V, data: E) -> bool {
        if !self.vertices.contains_key(&to) {
            return false;
        }
        let Some(entry) = self.vertices.get_mut(&from) else {
            return false;
        };
        if self.edges.insert((from, to), data).is_none() {
            entry.out.push(to);
        }
        true
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.vertices.contains_key(v)
    }

    pub fn vertex(&self, v: &V) -> Option<&VD> {
        self.vertices.get(v).map(|e| &e.data)
    }

    pub fn vertex_mut(&mut self, v: &V) -> Option<&mut VD> {
        self.vertices.get_mut(v).map(|e| &mut e.data)
    }

    pub fn edge(&self, from: V, to: V) -> Option<&E> {
        self.edges.get(&(from, to))
    }

    pub fn edge_mut(&mut self, from: V, to: V) -> Option<&mut E> {
        self.edges.get_mut(&(from, to))
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.order.iter().copied()
    }

    /// Outgoing neighbours of `v`, in insertion order.
    pub fn neighbours(&self, v: V) -> &[V] {
        self.vertices.get(&v).map(|e| e.out.as_slice()).unwrap_or(&[])
    }

    /// Outgoing `(to, edge)` pairs of `v`.
    pub fn edges_from(&self, v: V) -> impl Iterator<Item = (V, &E)> + '_ {
        self.neighbours(v)
            .iter()
            .filter_map(move |&to| self.edges.get(&(v, to)).map(|e| (to, e)))
    }

    pub fn for_each_vertex(&self, mut f: impl FnMut(V, &VD)) {
        for v in &self.order {
            if let Some(entry) = self.vertices.get(v) {
                f(*v, &entry.data);
            }
        }
    }

    /// Visit every edge, grouped by source vertex in insertion order.
    pub fn for_each_edge(&self, mut f: impl FnMut(V, V, &E)) {
        for &from in &self.order {
            for (to, e) in self.edges_from(from) {
                f(from, to, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> IdentityGraph<u32, &'static str, f32> {
        let mut g = IdentityGraph::new();
        g.add_vertex(1, "a");
        g.add_vertex(2, "b");
        g.add_vertex(3, "c");
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 2.0);
        g.add_edge(3, 1, 3.0);
        g.add_edge(1, 3, 4.0);
        g
    }

    #[test]
    fn test_counts_and_lookup() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertex(&2), Some(&"b"));
        assert_eq!(g.edge(3, 1), Some(&3.0));
        assert_eq!(g.edge(2, 1), None, "edges are directed");
    }

    #[test]
    fn test_duplicate_vertex_keeps_original() {
        let mut g = triangle();
        assert!(!g.add_vertex(1, "z"));
        assert_eq!(g.vertex(&1), Some(&"a"));
    }

    #[test]
    fn test_edge_to_missing_vertex_rejected() {
        let mut g = triangle();
        assert!(!g.add_edge(1, 99, 0.0));
        assert!(!g.add_edge(99, 1, 0.0));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_replacing_edge_does_not_duplicate_adjacency() {
        let mut g = triangle();
        g.add_edge(1, 2, 9.0);
        assert_eq!(g.neighbours(1), &[2, 3]);
        assert_eq!(g.edge(1, 2), Some(&9.0));
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let g = triangle();
        let order: Vec<u32> = g.vertices().collect();
        assert_eq!(order, vec![1, 2, 3]);

        let mut seen = Vec::new();
        g.for_each_edge(|a, b, w| seen.push((a, b, *w)));
        assert_eq!(
            seen,
            vec![(1, 2, 1.0), (1, 3, 4.0), (2, 3, 2.0), (3, 1, 3.0)]
        );

        let mut names = String::new();
        g.for_each_vertex(|_, d| names.push_str(d));
        assert_eq!(names, "abc");
    }

    #[test]
    fn test_vertex_mut_and_edge_mut() {
        let mut g = triangle();
        *g.vertex_mut(&3).unwrap() = "cc";
        *g.edge_mut(2, 3).unwrap() = 0.5;
        assert_eq!(g.vertex(&3), Some(&"cc"));
        assert_eq!(g.edges_from(2).collect::<Vec<_>>(), vec![(3, &0.5)]);
    }
}
