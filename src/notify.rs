use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;
use ulid::Ulid;

use crate::model::Booking;

pub type SubscriptionId = Ulid;

pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Receives bookings that left a waiting queue and were confirmed.
pub trait BookingListener: Send + Sync {
    fn booking_confirmed(&self, booking: &Booking) -> Result<(), ListenerError>;
}

impl<F> BookingListener for F
where
    F: Fn(&Booking) + Send + Sync,
{
    fn booking_confirmed(&self, booking: &Booking) -> Result<(), ListenerError> {
        self(booking);
        Ok(())
    }
}

/// Subscriber set for booking confirmations.
pub struct EventRegistry {
    listeners: DashMap<SubscriptionId, Arc<dyn BookingListener>>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
        }
    }

    pub fn subscribe(&self, listener: Arc<dyn BookingListener>) -> SubscriptionId {
        let id = Ulid::new();
        self.listeners.insert(id, listener);
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver to every listener on the calling thread. Listeners are
    /// snapshotted first, so they may subscribe or unsubscribe re-entrantly.
    /// Failures are logged and counted, never returned.
    pub fn notify(&self, booking: &Booking) {
        let snapshot: Vec<(SubscriptionId, Arc<dyn BookingListener>)> = self
            .listeners
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();

        for (id, listener) in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener.booking_confirmed(booking)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(_) => "listener panicked".to_string(),
            };
            tracing::warn!(
                "listener {id} failed on booking {}: {failure}",
                booking.id()
            );
            metrics::counter!(crate::observability::LISTENER_FAILURES_TOTAL).increment(1);
        }
    }
}
