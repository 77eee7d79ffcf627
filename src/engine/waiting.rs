use std::collections::{BTreeMap, VecDeque};

use crate::model::*;

/// Standard and priority FIFOs per requester tier, plus an index over both.
///
/// Queues hold ids; the index owns the bookings. Ids are issued under the
/// engine lock, so index order is insertion order.
pub(crate) struct WaitingQueues {
    standard: [VecDeque<BookingId>; 3],
    priority: [VecDeque<BookingId>; 3],
    index: BTreeMap<BookingId, Booking>,
}

impl WaitingQueues {
    pub(crate) fn new() -> Self {
        Self {
            standard: Default::default(),
            priority: Default::default(),
            index: BTreeMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn get(&self, id: BookingId) -> Option<&Booking> {
        self.index.get(&id)
    }

    /// Append to the tail of `tier`'s standard queue.
    pub(crate) fn enqueue(&mut self, tier: Tier, booking: Booking) {
        self.standard[tier.index()].push_back(booking.id());
        self.index.insert(booking.id(), booking);
    }

    /// Move `id` from `tier`'s standard queue to the tail of its priority
    /// queue. False if it was not in that standard queue.
    pub(crate) fn promote(&mut self, tier: Tier, id: BookingId) -> bool {
        let queue = &mut self.standard[tier.index()];
        let Some(pos) = queue.iter().position(|b| *b == id) else {
            return false;
        };
        queue.remove(pos);
        self.priority[tier.index()].push_back(id);
        if let Some(b) = self.index.get_mut(&id) {
            b.mark_priority();
        }
        true
    }

    pub(crate) fn pop_priority(&mut self, tier: Tier) -> Option<Booking> {
        Self::pop(&mut self.priority[tier.index()], &mut self.index)
    }

    pub(crate) fn pop_standard(&mut self, tier: Tier) -> Option<Booking> {
        Self::pop(&mut self.standard[tier.index()], &mut self.index)
    }

    fn pop(queue: &mut VecDeque<BookingId>, index: &mut BTreeMap<BookingId, Booking>) -> Option<Booking> {
        while let Some(id) = queue.pop_front() {
            if let Some(b) = index.remove(&id) {
                return Some(b);
            }
        }
        None
    }

    pub(crate) fn depth(&self, tier: Tier) -> QueueDepth {
        QueueDepth {
            standard: self.standard[tier.index()].len(),
            priority: self.priority[tier.index()].len(),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Booking> {
        self.index.values().cloned().collect()
    }
}
