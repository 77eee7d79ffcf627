use crate::model::*;

use super::{Engine, EngineError};

impl Engine {
    /// Percentage of rooms under active assignment, `100 × active / total`.
    /// An empty inventory reports 0.
    pub fn occupancy_ratio(&self) -> Result<f64, EngineError> {
        let st = self.state.lock();
        let total = st.inventory.total_resources()?;
        if total == 0 {
            return Ok(0.0);
        }
        Ok((st.active.len() * 100) as f64 / total as f64)
    }

    /// Every waiting booking, standard and priority, in the order they joined
    /// the waiting list. A copy: later check-ins and check-outs don't show up.
    pub fn waiting_list(&self) -> Vec<Booking> {
        self.state.lock().waiting.snapshot()
    }

    /// Current state of a booking the engine still tracks (active or waiting).
    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        let st = self.state.lock();
        if let Some(b) = st.waiting.get(id) {
            return Some(b.clone());
        }
        st.active.values().find(|b| b.id() == id).cloned()
    }

    pub fn active_booking(&self, resource_id: &str) -> Option<Booking> {
        self.state.lock().active.get(resource_id).cloned()
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    pub fn queue_depth(&self, tier: Tier) -> QueueDepth {
        self.state.lock().waiting.depth(tier)
    }
}
