use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// Booking identity. Strictly increasing in creation order.
pub type BookingId = u64;

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Ms)
        .unwrap_or(0)
}

/// Rank shared by requesters (membership) and resources (room class).
/// Declaration order is rank order: `Standard < Gold < Platinum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Standard,
    Gold,
    Platinum,
}

impl Tier {
    /// Every tier, lowest first.
    pub const ALL: [Tier; 3] = [Tier::Standard, Tier::Gold, Tier::Platinum];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Standard => "standard",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        };
        f.write_str(s)
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Tier::Standard),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// In a standard waiting queue.
    Waiting,
    /// Waited past the promotion delay; served before standard waiters.
    PriorityWaiting,
    /// Holds a resource.
    Confirmed,
    /// Terminal. The resource was checked out.
    CheckedOut,
}

/// A requester's claim on a resource.
///
/// Identity is the id alone: two values with the same id compare equal even
/// if one is a stale copy with an older status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    requester_id: String,
    created: Ms,
    resource_id: Option<String>,
    status: BookingStatus,
}

impl Booking {
    pub(crate) fn new(id: BookingId, requester_id: String) -> Self {
        Self {
            id,
            requester_id,
            created: now_ms(),
            resource_id: None,
            status: BookingStatus::Waiting,
        }
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn requester_id(&self) -> &str {
        &self.requester_id
    }

    /// Creation time. Fixed at construction.
    pub fn created(&self) -> Ms {
        self.created
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        matches!(
            self.status,
            BookingStatus::Waiting | BookingStatus::PriorityWaiting
        )
    }

    pub(crate) fn confirm(&mut self, resource_id: String) {
        self.resource_id = Some(resource_id);
        self.status = BookingStatus::Confirmed;
    }

    pub(crate) fn mark_priority(&mut self) {
        self.status = BookingStatus::PriorityWaiting;
    }

    pub(crate) fn mark_checked_out(&mut self) {
        self.status = BookingStatus::CheckedOut;
    }
}

impl PartialEq for Booking {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Booking {}

impl Hash for Booking {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A room. `occupied` is maintained by the inventory that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub tier: Tier,
    pub occupied: bool,
}

impl Resource {
    pub fn new(id: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            tier,
            occupied: false,
        }
    }
}

/// A guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub tier: Tier,
    pub name: Option<String>,
}

impl Requester {
    pub fn new(id: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            tier,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Per-tier waiting queue lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueDepth {
    pub standard: usize,
    pub priority: usize,
}

impl QueueDepth {
    pub fn total(&self) -> usize {
        self.standard + self.priority
    }
}
