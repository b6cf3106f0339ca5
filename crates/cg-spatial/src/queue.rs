//! `ProposalQueue` — the ordering heart of the road-growth loop.
//!
//! # Why this exists
//!
//! Road growth explores proposals in ascending delay `t`: straight
//! continuations carry a smaller `t` than sharp branches, so trunk roads
//! race ahead before side streets fill in.  The growth loop also needs to
//! *inspect* pending proposals (endpoint snapping and angle crowding look
//! at queued geometry, not just accepted geometry), which rules out an
//! opaque binary heap.
//!
//! The queue is a plain insertion-ordered `Vec` with a linear min-scan on
//! dequeue.  Queue sizes stay in the low hundreds, ties break toward the
//! oldest entry, and iteration order is deterministic — all three matter
//! more here than O(log n) pops.

use cg_core::Segment;

/// Stable minimum-by-`t` queue of road proposals.
#[derive(Default)]
pub struct ProposalQueue {
    items: Vec<Segment>,
}

impl ProposalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal.  Insertion order is the tie-break for equal `t`.
    pub fn enqueue(&mut self, proposal: Segment) {
        self.items.push(proposal);
    }

    /// Remove and return the proposal with the smallest `t`.
    /// The earliest-enqueued entry wins ties.
    pub fn dequeue(&mut self) -> Option<Segment> {
        if self.items.is_empty() {
            return None;
        }
        let mut min_idx = 0;
        for (i, seg) in self.items.iter().enumerate().skip(1) {
            if seg.meta.t < self.items[min_idx].meta.t {
                min_idx = i;
            }
        }
        Some(self.items.remove(min_idx))
    }

    /// Pending proposals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
