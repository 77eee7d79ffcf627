use std::collections::{HashMap, VecDeque};

use dashmap::DashMap;

use crate::model::{Requester, Resource, Tier};

/// A directory or inventory backend failed to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.collaborator, self.message)
    }
}

impl std::error::Error for CollaboratorError {}

/// Resolves requester ids. Shared across threads; read-only from the engine's side.
pub trait RequesterDirectory: Send + Sync {
    fn lookup(&self, id: &str) -> Result<Option<Requester>, CollaboratorError>;
}

/// Owns the room pool and per-tier availability.
///
/// The engine moves its inventory inside its own critical section, so every
/// call is already serialized and implementations need no locking of their own.
pub trait ResourceInventory: Send {
    /// Take one available resource of `tier` out of the pool.
    fn reserve(&mut self, tier: Tier) -> Result<Option<Resource>, CollaboratorError>;

    /// Return a resource to its tier's pool.
    fn free(&mut self, resource_id: &str) -> Result<(), CollaboratorError>;

    fn info(&self, resource_id: &str) -> Result<Option<Resource>, CollaboratorError>;

    fn is_available(&self, tier: Tier) -> Result<bool, CollaboratorError>;

    fn total_resources(&self) -> Result<usize, CollaboratorError>;
}

// ── In-memory implementations ────────────────────────────────

/// Room pool held in memory. Availability per tier is served in insertion
/// order; a freed room goes to the back of its tier's line.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    rooms: HashMap<String, Resource>,
    available: HashMap<Tier, VecDeque<String>>,
}

impl InMemoryInventory {
    /// Seed the pool. A repeated room id is ignored; the first entry wins.
    pub fn new(rooms: impl IntoIterator<Item = Resource>) -> Self {
        let mut inv = Self::default();
        for room in rooms {
            if inv.rooms.contains_key(&room.id) {
                continue;
            }
            if !room.occupied {
                inv.available
                    .entry(room.tier)
                    .or_default()
                    .push_back(room.id.clone());
            }
            inv.rooms.insert(room.id.clone(), room);
        }
        inv
    }

    pub fn available_count(&self, tier: Tier) -> usize {
        self.available.get(&tier).map_or(0, |q| q.len())
    }
}

impl ResourceInventory for InMemoryInventory {
    fn reserve(&mut self, tier: Tier) -> Result<Option<Resource>, CollaboratorError> {
        let Some(id) = self.available.get_mut(&tier).and_then(|q| q.pop_front()) else {
            return Ok(None);
        };
        let room = self
            .rooms
            .get_mut(&id)
            .ok_or_else(|| CollaboratorError::new("inventory", format!("pooled room {id} has no record")))?;
        room.occupied = true;
        Ok(Some(room.clone()))
    }

    fn free(&mut self, resource_id: &str) -> Result<(), CollaboratorError> {
        let room = self
            .rooms
            .get_mut(resource_id)
            .ok_or_else(|| CollaboratorError::new("inventory", format!("unknown room {resource_id}")))?;
        room.occupied = false;
        let pool = self.available.entry(room.tier).or_default();
        if !pool.iter().any(|r| r == resource_id) {
            pool.push_back(resource_id.to_string());
        }
        Ok(())
    }

    fn info(&self, resource_id: &str) -> Result<Option<Resource>, CollaboratorError> {
        Ok(self.rooms.get(resource_id).cloned())
    }

    fn is_available(&self, tier: Tier) -> Result<bool, CollaboratorError> {
        Ok(self.available_count(tier) > 0)
    }

    fn total_resources(&self) -> Result<usize, CollaboratorError> {
        Ok(self.rooms.len())
    }
}

/// Guest records held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    requesters: DashMap<String, Requester>,
}

impl InMemoryDirectory {
    pub fn new(requesters: impl IntoIterator<Item = Requester>) -> Self {
        let dir = Self::default();
        for r in requesters {
            dir.insert(r);
        }
        dir
    }

    pub fn insert(&self, requester: Requester) {
        self.requesters.insert(requester.id.clone(), requester);
    }

    pub fn len(&self) -> usize {
        self.requesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requesters.is_empty()
    }
}

impl RequesterDirectory for InMemoryDirectory {
    fn lookup(&self, id: &str) -> Result<Option<Requester>, CollaboratorError> {
        Ok(self.requesters.get(id).map(|e| e.value().clone()))
    }
}
