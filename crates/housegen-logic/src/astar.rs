//! Generic A* search.
//!
//! Works over any vertex handle with a neighbour callback, so the hallway
//! router can search the wall-point graph and tests can search toy graphs.
//! The frontier is an [`IndexedMinHeap`] ordered by `g + h`; a cheaper
//! route to a vertex already seen updates its cost and parent and
//! re-prioritises it.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{GenerationError, Result};
use crate::heap::IndexedMinHeap;

/// A found path, ordered start → goal.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath<V> {
    pub vertices: Vec<V>,
    pub cost: f32,
}

impl<V> SearchPath<V> {
    /// Number of edges traversed.
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Find the cheapest path from `start` to `goal`.
///
/// `neighbours(v)` yields `(next, step_cost)` pairs with non-negative
/// costs; `heuristic(v)` must never overestimate the remaining cost.
/// `start == goal` yields a single-vertex path of cost 0. Exhausting the
/// frontier yields [`GenerationError::NoPath`].
pub fn astar<V, N, I, H>(start: V, goal: V, mut neighbours: N, mut heuristic: H) -> Result<SearchPath<V>>
where
    V: Copy + Eq + Hash,
    N: FnMut(V) -> I,
    I: IntoIterator<Item = (V, f32)>,
    H: FnMut(V) -> f32,
{
    if start == goal {
        return Ok(SearchPath {
            vertices: vec![start],
            cost: 0.0,
        });
    }

    // vertex → (best known cost, parent)
    let mut visited: HashMap<V, (f32, Option<V>)> = HashMap::new();
    let mut frontier = IndexedMinHeap::new();
    visited.insert(start, (0.0, None));
    frontier.push(start, heuristic(start));

    while let Some((current, _)) = frontier.pop() {
        let g = visited.get(&current).map(|&(c, _)| c).unwrap_or(f32::INFINITY);
        if current == goal {
            return Ok(SearchPath {
                vertices: reconstruct(&visited, goal),
                cost: g,
            });
        }

        for (next, step) in neighbours(current) {
            let candidate = g + step;
            let improved = match visited.get(&next) {
                Some(&(known, _)) => candidate < known,
                None => true,
            };
            if improved {
                visited.insert(next, (candidate, Some(current)));
                // Inserts, or lowers the key if `next` is still queued.
                frontier.push(next, candidate + heuristic(next));
            }
        }
    }

    Err(GenerationError::NoPath)
}

fn reconstruct<V: Copy + Eq + Hash>(visited: &HashMap<V, (f32, Option<V>)>, goal: V) -> Vec<V> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&(_, Some(prev))) = visited.get(&node) {
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}
