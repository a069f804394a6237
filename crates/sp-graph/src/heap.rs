//! Indexed binary min-heap with decrease-key, keyed by `NodeIdx`.
//!
//! `std::collections::BinaryHeap` has no decrease-key, so a lazy Dijkstra
//! pushes a fresh entry per relaxation and the heap can grow to O(E).  This
//! heap keeps at most one entry per node, bounding it to O(V).
//!
//! Ordering is `(cost, NodeIdx)`: equal costs pop in ascending index order,
//! which makes the search deterministic for a fixed graph.

use std::cmp::Ordering;

use sp_core::NodeIdx;

const ABSENT: u32 = u32::MAX;

pub(crate) struct IndexedMinHeap {
    slots: Vec<(f64, NodeIdx)>,
    /// `position[n]` = slot of node `n` in `slots`, or `ABSENT`.
    position: Vec<u32>,
}

impl IndexedMinHeap {
    /// Empty heap able to hold nodes `0 .. node_count`.
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            position: vec![ABSENT; node_count],
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert `node` with `cost`, or lower its cost if already queued.
    /// A higher cost for a queued node is ignored.
    pub(crate) fn push_or_decrease(&mut self, node: NodeIdx, cost: f64) {
        match self.position[node.index()] {
            ABSENT => {
                let slot = self.slots.len();
                self.slots.push((cost, node));
                self.position[node.index()] = slot as u32;
                self.sift_up(slot);
            }
            slot => {
                let slot = slot as usize;
                if cost < self.slots[slot].0 {
                    self.slots[slot].0 = cost;
                    self.sift_up(slot);
                }
            }
        }
    }

    /// Remove and return the cheapest `(cost, node)`.
    pub(crate) fn pop(&mut self) -> Option<(f64, NodeIdx)> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.swap(0, last);
        let top = self.slots.pop()?;
        self.position[top.1.index()] = ABSENT;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    fn less(a: &(f64, NodeIdx), b: &(f64, NodeIdx)) -> bool {
        a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)) == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.slots.swap(i, j);
        self.position[self.slots[i].1.index()] = i as u32;
        self.position[self.slots[j].1.index()] = j as u32;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !Self::less(&self.slots[slot], &self.slots[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && Self::less(&self.slots[left], &self.slots[smallest]) {
                smallest = left;
            }
            if right < len && Self::less(&self.slots[right], &self.slots[smallest]) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
