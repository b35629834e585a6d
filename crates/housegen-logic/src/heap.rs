//! Binary min-heap with decrease-key.
//!
//! `std::collections::BinaryHeap` cannot lower the priority of an item it
//! already holds, which A* needs when it finds a cheaper route to a vertex
//! still on the frontier. This heap keeps an item→slot map next to the
//! array so an item can be located and sifted up in O(log n).

use std::collections::HashMap;
use std::hash::Hash;

/// Min-heap of `(item, priority)` pairs. Each item appears at most once.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap<T> {
    entries: Vec<(T, f32)>,
    slots: HashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> Default for IndexedMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> IndexedMinHeap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    pub fn priority_of(&self, item: &T) -> Option<f32> {
        self.slots.get(item).map(|&i| self.entries[i].1)
    }

    pub fn peek(&self) -> Option<(T, f32)> {
        self.entries.first().copied()
    }

    /// Insert `item`, or lower its priority if it is already queued.
    ///
    /// Returns false when the item was queued with a priority that is not
    /// higher than `priority` (nothing changes).
    pub fn push(&mut self, item: T, priority: f32) -> bool {
        if self.slots.contains_key(&item) {
            return self.decrease_key(item, priority);
        }
        let slot = self.entries.len();
        self.entries.push((item, priority));
        self.slots.insert(item, slot);
        self.sift_up(slot);
        true
    }

    /// Lower the priority of a queued item. Returns false if the item is
    /// absent or the new priority is not lower.
    pub fn decrease_key(&mut self, item: T, priority: f32) -> bool {
        let Some(&slot) = self.slots.get(&item) else {
            return false;
        };
        if priority >= self.entries[slot].1 {
            return false;
        }
        self.entries[slot].1 = priority;
        self.sift_up(slot);
        true
    }

    /// Remove and return the lowest-priority entry.
    pub fn pop(&mut self) -> Option<(T, f32)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let top = self.entries.pop()?;
        self.slots.remove(&top.0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].1 < self.entries[parent].1 {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < n && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < n && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.entries.swap(i, j);
        self.slots.insert(self.entries[i].0, i);
        self.slots.insert(self.entries[j].0, j);
    }
}
