use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use crate::directory::CollaboratorError;
use crate::model::*;
use crate::scheduler::TaskHandle;

use super::waiting::WaitingQueues;
use super::{Engine, EngineError, EngineState};

impl Engine {
    /// Book the best eligible room for a guest, or put them on the waiting list.
    ///
    /// Resource tiers are tried in policy order and the first successful
    /// reservation wins. A booking that gets nothing is queued at the tail of
    /// its tier's standard queue and a promotion timer is armed for it.
    pub fn check_in(&self, requester_id: &str) -> Result<Booking, EngineError> {
        if requester_id.is_empty() {
            return Err(EngineError::InvalidArgument("requester id must not be empty".into()));
        }
        let requester = self
            .directory
            .lookup(requester_id)?
            .ok_or_else(|| EngineError::InvalidArgument(format!("unknown requester: {requester_id}")))?;

        let mut st = self.state.lock();
        let reserved = self.reserve_for(&mut st, requester.tier)?;
        // The room is already held by its active booking; leave it reserved.
        if reserved.as_ref().is_some_and(|r| st.active.contains_key(&r.id)) {
            return Err(CollaboratorError::new("inventory", "reserved room already booked").into());
        }
        let mut booking = Booking::new(self.next_id.fetch_add(1, Ordering::Relaxed), requester.id);

        match reserved {
            Some(resource) => {
                booking.confirm(resource.id.clone());
                info!("checked in guest {}, into room {}", booking.requester_id(), resource.id);
                st.active.insert(resource.id, booking.clone());
                metrics::counter!(crate::observability::CHECK_INS_TOTAL, "outcome" => "confirmed").increment(1);
            }
            None => {
                st.waiting.enqueue(requester.tier, booking.clone());
                let handle = self.arm_promotion(booking.id());
                st.timers.insert(booking.id(), handle);
                info!(
                    "no {} room for guest {}, booking {} waiting",
                    requester.tier,
                    booking.requester_id(),
                    booking.id()
                );
                metrics::counter!(crate::observability::CHECK_INS_TOTAL, "outcome" => "waiting").increment(1);
            }
        }
        Self::record_gauges(&st);
        Ok(booking)
    }

    /// Release a room. The checked-out booking is returned with status
    /// `CheckedOut`; `None` if the room had no active booking.
    ///
    /// The room goes to the head of the priority queue of the tier with top
    /// claim on it, else to the first waiting booking across the eligible
    /// standard queues, else back to the inventory. Listeners hear about a
    /// handed-over room after the engine lock is released, before this returns.
    /// Concurrent check-outs may therefore deliver their confirmations in a
    /// different order from the one in which the rooms changed hands.
    pub fn check_out(&self, resource_id: &str) -> Result<Option<Booking>, EngineError> {
        if resource_id.is_empty() {
            return Err(EngineError::InvalidArgument("resource id must not be empty".into()));
        }

        let mut st = self.state.lock();
        if !st.active.contains_key(resource_id) {
            debug!("no booking for room {resource_id}");
            return Ok(None);
        }
        let resource = st.inventory.info(resource_id)?.ok_or_else(|| {
            CollaboratorError::new("inventory", format!("booked room {resource_id} has no record"))
        })?;

        let successor = self.next_waiting(&mut st.waiting, resource.tier);
        if successor.is_none() {
            st.inventory.free(resource_id)?;
        }

        let mut released = st.active.remove(resource_id);
        if let Some(b) = released.as_mut() {
            b.mark_checked_out();
            info!("checked out guest {}, from room {resource_id}", b.requester_id());
        }
        metrics::counter!(crate::observability::CHECK_OUTS_TOTAL).increment(1);

        let confirmed = successor.map(|mut next| {
            next.confirm(resource_id.to_string());
            if let Some(handle) = st.timers.remove(&next.id()) {
                self.scheduler.cancel(&handle);
            }
            info!(
                "checked in guest {} from waiting list, into room {resource_id}",
                next.requester_id()
            );
            st.active.insert(resource_id.to_string(), next.clone());
            next
        });
        Self::record_gauges(&st);
        drop(st);

        if let Some(booking) = confirmed {
            self.notify.notify(&booking);
        }
        Ok(released)
    }

    /// Move a still-waiting booking to its tier's priority queue. Fired by the
    /// promotion timer; a booking that already left the standard queue is
    /// left alone.
    pub(crate) fn promote(&self, booking_id: BookingId) {
        let mut st = self.state.lock();
        st.timers.remove(&booking_id);

        let Some(requester_id) = st.waiting.get(booking_id).map(|b| b.requester_id().to_string()) else {
            debug!("promotion of booking {booking_id} skipped: no longer waiting");
            return;
        };
        let tier = match self.directory.lookup(&requester_id) {
            Ok(Some(r)) => r.tier,
            Ok(None) => {
                warn!("promotion of booking {booking_id} skipped: guest {requester_id} unknown");
                return;
            }
            Err(e) => {
                warn!("promotion of booking {booking_id} skipped: {e}");
                return;
            }
        };

        if st.waiting.promote(tier, booking_id) {
            info!("booking {booking_id} of guest {requester_id} moved to priority waiting");
            metrics::counter!(crate::observability::PROMOTIONS_TOTAL).increment(1);
        } else {
            debug!("promotion of booking {booking_id} skipped: not in {tier} standard queue");
        }
    }

    fn reserve_for(&self, st: &mut EngineState, tier: Tier) -> Result<Option<Resource>, EngineError> {
        for &candidate in self.policy.eligible_resource_tiers(tier) {
            if !st.inventory.is_available(candidate)? {
                continue;
            }
            if let Some(resource) = st.inventory.reserve(candidate)? {
                return Ok(Some(resource));
            }
        }
        Ok(None)
    }

    fn next_waiting(&self, waiting: &mut WaitingQueues, resource_tier: Tier) -> Option<Booking> {
        let priority_tier = self.policy.priority_requester_tier(resource_tier);
        waiting.pop_priority(priority_tier).or_else(|| {
            self.policy
                .eligible_requester_tiers(resource_tier)
                .iter()
                .find_map(|&tier| waiting.pop_standard(tier))
        })
    }

    fn arm_promotion(&self, booking_id: BookingId) -> TaskHandle {
        let engine = self.weak_self.clone();
        self.scheduler.schedule(
            self.config.promotion_delay,
            Box::new(move || {
                if let Some(engine) = engine.upgrade() {
                    engine.promote(booking_id);
                }
            }),
        )
    }
}
