mod error;
mod mutations;
mod queries;
mod waiting;

pub use error::EngineError;

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::directory::{RequesterDirectory, ResourceInventory};
use crate::model::*;
use crate::notify::{BookingListener, EventRegistry, SubscriptionId};
use crate::policy::EligibilityPolicy;
use crate::scheduler::{Scheduler, TaskHandle};

use waiting::WaitingQueues;

/// Everything check-in, check-out and promotion mutate. Guarded by one lock.
pub(super) struct EngineState {
    /// Lives inside the lock so every inventory call is serialized with the
    /// engine's own bookkeeping.
    pub(super) inventory: Box<dyn ResourceInventory>,
    /// resource id → the booking holding it
    pub(super) active: HashMap<String, Booking>,
    pub(super) waiting: WaitingQueues,
    /// Armed promotion timers, by booking.
    pub(super) timers: HashMap<BookingId, TaskHandle>,
}

pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) state: Mutex<EngineState>,
    pub(super) next_id: AtomicU64,
    pub(super) directory: Arc<dyn RequesterDirectory>,
    pub(super) policy: Arc<dyn EligibilityPolicy>,
    pub(super) scheduler: Arc<dyn Scheduler>,
    pub notify: Arc<EventRegistry>,
    /// Promotion tasks hold this, never a strong handle.
    pub(super) weak_self: Weak<Engine>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        directory: Arc<dyn RequesterDirectory>,
        inventory: Box<dyn ResourceInventory>,
        policy: Arc<dyn EligibilityPolicy>,
        scheduler: Arc<dyn Scheduler>,
        notify: Arc<EventRegistry>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            config,
            state: Mutex::new(EngineState {
                inventory,
                active: HashMap::new(),
                waiting: WaitingQueues::new(),
                timers: HashMap::new(),
            }),
            next_id: AtomicU64::new(1),
            directory,
            policy,
            scheduler,
            notify,
            weak_self: weak_self.clone(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a listener for bookings confirmed out of a waiting queue.
    pub fn subscribe(&self, listener: impl BookingListener + 'static) -> SubscriptionId {
        self.notify.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.notify.unsubscribe(id)
    }

    pub(super) fn record_gauges(st: &EngineState) {
        metrics::gauge!(crate::observability::ACTIVE_ASSIGNMENTS).set(st.active.len() as f64);
        metrics::gauge!(crate::observability::WAITING_BOOKINGS).set(st.waiting.len() as f64);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let st = self.state.get_mut();
        for (_, handle) in st.timers.drain() {
            self.scheduler.cancel(&handle);
        }
    }
}
