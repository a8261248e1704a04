//! Array-backed binary min-heap used as the A* open set.
//!
//! There is no decrease-key: the search pushes a cell again when its score
//! improves and skips the stale entries it later pops.

use std::cmp::Ordering;

use stowpath_geometry::Fixed;

/// An entry of the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenNode {
    /// `g + h` for this entry.
    pub f: Fixed,
    /// Heuristic estimate from the cell to the goal.
    pub h: Fixed,
    /// Insertion sequence number.
    pub seq: u64,
    /// Flat grid index of the cell.
    pub index: usize,
}

impl Ord for OpenNode {
    /// Lower `f` first, then lower `h`, then earlier insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.h.cmp(&other.h))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A binary min-heap: `pop` returns the smallest element.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> MinHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        MinHeap { items: Vec::new() }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The smallest element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Inserts `item` in O(log n).
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the smallest element in O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        self.sift_down(0);
        top
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.items[pos] >= self.items[parent] {
                break;
            }
            self.items.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[pos] <= self.items[child] {
                break;
            }
            self.items.swap(pos, child);
            pos = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn node(f: i64, h: i64, seq: u64) -> OpenNode {
        OpenNode {
            f: Fixed::from_millis(f),
            h: Fixed::from_millis(h),
            seq,
            index: seq as usize,
        }
    }

    #[test]
    fn test_pop_empty() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn test_pops_in_ascending_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut heap = MinHeap::with_capacity(500);
        let mut values: Vec<i64> = (0..500).map(|_| rng.random_range(-1_000..1_000)).collect();
        for &v in &values {
            heap.push(v);
        }
        assert_eq!(heap.len(), 500);

        values.sort_unstable();
        let popped: Vec<i64> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(popped, values);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut heap = MinHeap::new();
        heap.push(5);
        heap.push(3);
        assert_eq!(heap.pop(), Some(3));
        heap.push(1);
        heap.push(4);
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), Some(4));
        assert_eq!(heap.pop(), Some(5));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_open_node_tie_breaking() {
        let mut heap = MinHeap::new();
        heap.push(node(10_000, 4_000, 0));
        heap.push(node(10_000, 2_000, 1));
        heap.push(node(10_000, 2_000, 2));
        heap.push(node(9_000, 9_000, 3));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|n| n.seq).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }
}
