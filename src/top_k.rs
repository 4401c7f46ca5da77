//! Bounded top-K score retention.
//!
//! The stream of completed lifetime scores is unbounded, but only the K
//! largest per player ever matter for ranking, so each player gets a min-heap
//! capped at K: the root is the smallest retained score and is evicted the
//! moment something strictly larger arrives. A running total rides along so
//! the leaderboard can re-sum on every tick in O(1).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::wad::Wad;

/// Min-heap of at most `capacity` scores with an O(1) total.
#[derive(Clone, Debug, Default)]
pub struct TopKHeap {
    heap: BinaryHeap<Reverse<Wad>>,
    capacity: usize,
    sum: Wad,
}

impl TopKHeap {
    /// `capacity` comes from game configuration (`high_score_top_k`).
    /// Zero is a valid degenerate configuration: every insert is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
            sum: Wad::ZERO,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Smallest retained score, if any.
    pub fn min(&self) -> Option<Wad> {
        self.heap.peek().map(|Reverse(score)| *score)
    }

    /// Sum of every retained score.
    pub fn sum(&self) -> Wad {
        self.sum
    }

    /// Offer a completed lifetime score.
    ///
    /// Below capacity the score is always kept. At capacity it replaces the
    /// current minimum only if strictly greater; an exact tie with the
    /// minimum is discarded, so earlier insertions win at the boundary.
    /// That tie-break is load-bearing for deterministic leaderboard output.
    pub fn insert(&mut self, score: Wad) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(score));
            self.sum += score;
            return;
        }
        if let Some(&Reverse(min)) = self.heap.peek() {
            if score > min {
                self.heap.pop();
                // `min` was added to the sum when it was pushed.
                self.sum = self.sum.unchecked_sub(min);
                self.heap.push(Reverse(score));
                self.sum += score;
            }
        }
    }

    /// Retained scores in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Wad> + '_ {
        self.heap.iter().map(|Reverse(score)| *score)
    }
}
