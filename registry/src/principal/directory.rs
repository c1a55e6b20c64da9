//! Live role sets of connected principals.
//!
//! A set is created when its principal connects (empty, or restored from
//! stored bytes) and dropped when it disconnects. Persisting it beforehand is
//! the caller's business.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::RoleSet;
use crate::codec::{CodecError, Marshaler};
use crate::registry::RoleRegistry;

/// Thread-safe map from principal to its role set.
#[derive(Debug)]
pub struct PrincipalDirectory {
    registry: Arc<RoleRegistry>,
    sessions: DashMap<Uuid, Arc<RoleSet>>,
}

impl PrincipalDirectory {
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self {
            registry,
            sessions: DashMap::new(),
        }
    }

    /// Role set of `principal`, creating an empty one if it has none yet.
    pub fn connect(&self, principal: Uuid) -> Arc<RoleSet> {
        self.sessions
            .entry(principal)
            .or_insert_with(|| {
                debug!(%principal, "Created empty role set");
                Arc::new(RoleSet::new(Arc::clone(&self.registry)))
            })
            .clone()
    }

    /// Restore `principal`'s role set from stored bytes, replacing any live one.
    ///
    /// Nothing is replaced if the bytes cannot be decoded.
    pub fn restore(
        &self,
        principal: Uuid,
        codec: &impl Marshaler,
        bytes: &[u8],
    ) -> Result<Arc<RoleSet>, CodecError> {
        let set = Arc::new(RoleSet::decode(Arc::clone(&self.registry), codec, bytes)?);
        self.sessions.insert(principal, Arc::clone(&set));
        info!(%principal, roles = set.len(), "Restored role set");
        Ok(set)
    }

    /// Live role set of `principal`, if connected.
    pub fn get(&self, principal: Uuid) -> Option<Arc<RoleSet>> {
        self.sessions.get(&principal).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop `principal`'s role set, handing it back for persistence.
    pub fn disconnect(&self, principal: Uuid) -> Option<Arc<RoleSet>> {
        let removed = self.sessions.remove(&principal).map(|(_, set)| set);
        if removed.is_some() {
            debug!(%principal, "Dropped role set");
        }
        removed
    }

    /// Number of connected principals.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
