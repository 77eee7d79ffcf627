pub mod config;
pub mod directory;
pub mod engine;
pub mod model;
pub mod notify;
pub mod observability;
pub mod policy;
pub mod scheduler;

pub use config::EngineConfig;
pub use directory::{CollaboratorError, InMemoryDirectory, InMemoryInventory, RequesterDirectory, ResourceInventory};
pub use engine::{Engine, EngineError};
pub use model::{Booking, BookingId, BookingStatus, QueueDepth, Requester, Resource, Tier};
pub use notify::{BookingListener, EventRegistry, SubscriptionId};
pub use policy::{EligibilityPolicy, TierPriorityPolicy};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
