use std::cmp::Ordering;
use std::collections::BinaryHeap;
use crate::core::types::EntityId;

/// One ranked hit as returned by a search backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: EntityId,
    pub score: f32,
    pub source: String,   // stored JSON document
}

/// Candidate ordered worst-first so the heap top is the next to evict.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: EntityId,
    score: f32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.score
            .total_cmp(&self.score)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Top-K collector: highest score first, ties by ascending id.
pub struct TopKCollector {
    heap: BinaryHeap<Candidate>,
    k: usize,
    total_collected: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
            k,
            total_collected: 0,
        }
    }

    pub fn collect(&mut self, id: EntityId, score: f32) {
        self.total_collected += 1;
        if self.k == 0 {
            return;
        }

        self.heap.push(Candidate { id, score });
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    pub fn total_collected(&self) -> usize {
        self.total_collected
    }

    /// Ranked `(id, score)` pairs, best first.
    pub fn into_ranked(self) -> Vec<(EntityId, f32)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.id, c.score))
            .collect()
    }
}
