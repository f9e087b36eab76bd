use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{IntersectionId, TravelTime};

/// Min-ordered frontier of (intersection, score) pairs.
///
/// There is no decrease-key: pushing a better score for a queued node adds a
/// second entry, and consumers must skip nodes they have already finalized.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<QueueEntry>,
    pushed: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: IntersectionId, score: TravelTime) {
        self.pushed += 1;
        self.heap.push(QueueEntry { node, score });
    }

    /// Remove and return the entry with the lowest score. Ties resolve to
    /// the smaller identifier.
    pub fn pop_min(&mut self) -> Option<(IntersectionId, TravelTime)> {
        self.heap.pop().map(|entry| (entry.node, entry.score))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries pushed over the frontier's lifetime.
    pub fn pushed(&self) -> usize {
        self.pushed
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: IntersectionId,
    score: TravelTime,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by score.
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_score_order() {
        let mut frontier = Frontier::new();
        frontier.push("C".to_string(), 9);
        frontier.push("A".to_string(), 4);
        frontier.push("B".to_string(), 1);
        frontier.push("D".to_string(), 4);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop_min()).collect();
        assert_eq!(
            order,
            vec![
                ("B".to_string(), 1),
                ("A".to_string(), 4),
                ("D".to_string(), 4),
                ("C".to_string(), 9),
            ]
        );
        assert!(frontier.is_empty());
    }

    #[test]
    fn stale_duplicates_are_kept() {
        let mut frontier = Frontier::new();
        frontier.push("A".to_string(), 10);
        frontier.push("A".to_string(), 3);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pushed(), 2);
        assert_eq!(frontier.pop_min(), Some(("A".to_string(), 3)));
        assert_eq!(frontier.pop_min(), Some(("A".to_string(), 10)));
        assert_eq!(frontier.pop_min(), None);
    }
}
