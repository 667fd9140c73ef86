//! Bounded top-N collection.
//!
//! [`TopKCollector`] keeps the N best hits seen so far in a binary heap
//! whose root is the worst retained hit. A new hit below capacity is pushed
//! and sifted up; at capacity it replaces the root only when it is strictly
//! better, then sifts down. Every offered hit counts toward the total
//! regardless of retention.

use std::cmp::Ordering;

use crate::search::Hit;
use crate::search::comparator::{CompositeComparator, FieldDoc};

/// Collects the top N hits under a comparator.
pub struct TopKCollector {
    capacity: usize,
    heap: Vec<Hit>,
    comparator: CompositeComparator,
    total_hits: u64,
}

impl TopKCollector {
    /// Create a collector retaining at most `capacity` hits.
    pub fn new(capacity: usize, comparator: CompositeComparator) -> Self {
        TopKCollector {
            capacity,
            heap: Vec::with_capacity(capacity),
            comparator,
            total_hits: 0,
        }
    }

    /// Offer one hit.
    ///
    /// Counts it toward the total and retains it if it ranks among the best
    /// `capacity` hits seen so far.
    pub fn collect(&mut self, hit: Hit) {
        self.total_hits += 1;
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(hit);
            self.sift_up(self.heap.len() - 1);
        } else if self.comparator.compare(&hit, &self.heap[0]) == Ordering::Less {
            self.heap[0] = hit;
            self.sift_down(0);
        }
    }

    /// Total number of hits offered, retained or not.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Number of hits currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check whether no hits are retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain the retained hits, best first.
    pub fn into_sorted_hits(mut self) -> Vec<Hit> {
        let mut hits = Vec::with_capacity(self.heap.len());
        while let Some(hit) = self.pop_worst() {
            hits.push(hit);
        }
        hits.reverse();
        hits
    }

    /// Drain the retained hits, best first, with their sort values
    /// materialized.
    pub fn into_field_docs(mut self) -> Vec<FieldDoc> {
        let mut hits = Vec::with_capacity(self.heap.len());
        while let Some(hit) = self.pop_worst() {
            hits.push(hit);
        }
        hits.reverse();
        hits.into_iter()
            .map(|hit| {
                let fields = self.comparator.values(&hit);
                FieldDoc { hit, fields }
            })
            .collect()
    }

    fn pop_worst(&mut self) -> Option<Hit> {
        let last = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, last);
        let hit = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        hit
    }

    fn sift_up(&mut self, mut at: usize) {
        while at > 0 {
            let parent = (at - 1) / 2;
            // The worse hit bubbles toward the root.
            if self.comparator.compare(&self.heap[at], &self.heap[parent]) == Ordering::Greater {
                self.heap.swap(at, parent);
                at = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut at: usize) {
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut worst = at;
            if left < self.heap.len()
                && self.comparator.compare(&self.heap[left], &self.heap[worst])
                    == Ordering::Greater
            {
                worst = left;
            }
            if right < self.heap.len()
                && self.comparator.compare(&self.heap[right], &self.heap[worst])
                    == Ordering::Greater
            {
                worst = right;
            }
            if worst == at {
                break;
            }
            self.heap.swap(at, worst);
            at = worst;
        }
    }
}
