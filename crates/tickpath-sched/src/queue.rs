//! FIFO of pending request ids, one lane per priority tier.

use std::collections::VecDeque;

use crate::request::{PathRequestId, PathRequestPriority};

/// Pending requests in arrival order.
///
/// The head is the first id of the most urgent non-empty tier. Removal by
/// id is a linear scan; queues are expected to stay short.
#[derive(Clone, Debug, Default)]
pub struct PathRequestQueue {
    tiers: [VecDeque<PathRequestId>; PathRequestPriority::COUNT],
}

impl PathRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to its tier. Returns `false` if it was already queued.
    pub fn enqueue(&mut self, id: PathRequestId, priority: PathRequestPriority) -> bool {
        if self.contains(id) {
            return false;
        }
        self.tiers[priority.index()].push_back(id);
        true
    }

    /// Drop `id` wherever it is. Returns `true` if it was queued.
    pub fn remove(&mut self, id: PathRequestId) -> bool {
        for tier in &mut self.tiers {
            if let Some(i) = tier.iter().position(|&x| x == id) {
                tier.remove(i);
                return true;
            }
        }
        false
    }

    /// Peek at the head without removing it.
    pub fn get_request(&self) -> Option<PathRequestId> {
        PathRequestPriority::ALL
            .iter()
            .find_map(|p| self.tiers[p.index()].front().copied())
    }

    pub fn contains(&self, id: PathRequestId) -> bool {
        self.tiers.iter().any(|tier| tier.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(VecDeque::is_empty)
    }

    /// Queued ids in service order.
    pub fn iter(&self) -> impl Iterator<Item = PathRequestId> + '_ {
        PathRequestPriority::ALL
            .iter()
            .flat_map(|p| self.tiers[p.index()].iter().copied())
    }
}
