//! Per-principal role set.
//!
//! Every public operation takes the set's lock once, prunes lapsed
//! memberships, then does its work. Pruning uses [`Members::remove`] directly
//! so the lock is never taken twice.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use rk_common::RoleDefinition;
use tracing::debug;

use super::expiry::{Clock, ExpiryEvaluator, SystemClock};
use crate::registry::RoleRegistry;

/// Members and expirations guarded by the set's lock.
#[derive(Debug, Default)]
struct Members {
    /// Distinct roles, ascending by tier.
    roles: Vec<RoleDefinition>,
    /// Roles absent from this map never expire.
    expirations: HashMap<RoleDefinition, DateTime<Utc>>,
}

impl Members {
    /// Keep the first occurrence of every role.
    fn remove_duplicates(&mut self) {
        let mut seen = HashSet::with_capacity(self.roles.len());
        self.roles.retain(|role| seen.insert(role.clone()));
    }

    fn sort(&mut self) {
        self.roles.sort_by_key(RoleDefinition::tier);
    }

    fn insert(&mut self, role: &RoleDefinition) -> bool {
        if self.roles.contains(role) {
            return false;
        }
        self.roles.push(role.clone());
        self.sort();
        true
    }

    fn remove(&mut self, role: &RoleDefinition) -> bool {
        self.expirations.remove(role);
        match self.roles.iter().position(|r| r == role) {
            Some(i) => {
                self.roles.remove(i);
                true
            }
            None => false,
        }
    }
}

/// Roles held by one principal, with optional per-role expiration.
///
/// Membership checks follow inheritance: holding a role counts as holding
/// every ancestor of it, resolved against the set's registry.
#[derive(Debug)]
pub struct RoleSet {
    registry: Arc<RoleRegistry>,
    expiry: ExpiryEvaluator,
    members: Mutex<Members>,
}

impl RoleSet {
    /// Create an empty set resolving inheritance against `registry`.
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self::with_expiry(registry, ExpiryEvaluator::default())
    }

    /// Create an empty set that reads time from `clock`.
    pub fn with_clock(registry: Arc<RoleRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self::with_expiry(registry, ExpiryEvaluator::new(clock))
    }

    fn with_expiry(registry: Arc<RoleRegistry>, expiry: ExpiryEvaluator) -> Self {
        Self {
            registry,
            expiry,
            members: Mutex::new(Members::default()),
        }
    }

    /// Build a set from a raw list that may contain repeats.
    ///
    /// The first occurrence of each role wins; the result is ordered by tier.
    /// Expirations already in the past are pruned by the first call.
    pub fn from_parts(
        registry: Arc<RoleRegistry>,
        roles: Vec<RoleDefinition>,
        expirations: HashMap<RoleDefinition, DateTime<Utc>>,
    ) -> Self {
        Self::from_parts_with_clock(registry, roles, expirations, Arc::new(SystemClock))
    }

    /// [`RoleSet::from_parts`] reading time from `clock`.
    pub fn from_parts_with_clock(
        registry: Arc<RoleRegistry>,
        roles: Vec<RoleDefinition>,
        expirations: HashMap<RoleDefinition, DateTime<Utc>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut members = Members { roles, expirations };
        members.remove_duplicates();
        members.sort();

        Self {
            registry,
            expiry: ExpiryEvaluator::new(clock),
            members: Mutex::new(members),
        }
    }

    /// Registry used for inheritance resolution.
    pub fn registry(&self) -> &Arc<RoleRegistry> {
        &self.registry
    }

    /// Add `role`. Adding a role that is already a member does nothing.
    pub fn add(&self, role: &RoleDefinition) {
        if self.lock().insert(role) {
            debug!(role = %role, "Role added");
        }
    }

    /// Remove `role`, dropping its expiration. Returns whether it was a member.
    pub fn remove(&self, role: &RoleDefinition) -> bool {
        let mut members = self.lock();
        let removed = members.remove(role);
        self.sweep(&mut members);
        removed
    }

    /// True if any of `roles` is held directly or through inheritance.
    pub fn contains(&self, roles: &[RoleDefinition]) -> bool {
        let closure = self.closure();
        roles.iter().any(|role| closure.contains(role))
    }

    /// True if every one of `roles` is held directly or through inheritance.
    pub fn contains_all(&self, roles: &[RoleDefinition]) -> bool {
        let closure = self.closure();
        roles.iter().all(|role| closure.contains(role))
    }

    /// Member with the greatest tier, or `None` for an empty set.
    pub fn highest(&self) -> Option<RoleDefinition> {
        self.lock().roles.last().cloned()
    }

    /// Copy of the current members, ascending by tier.
    pub fn all(&self) -> Vec<RoleDefinition> {
        self.lock().roles.clone()
    }

    /// Set or overwrite the expiration of `role`, member or not.
    pub fn expire(&self, role: &RoleDefinition, at: DateTime<Utc>) {
        self.lock().expirations.insert(role.clone(), at);
    }

    /// Configured expiration of `role`. `None` means it never expires.
    pub fn expiration(&self, role: &RoleDefinition) -> Option<DateTime<Utc>> {
        self.lock().expirations.get(role).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members paired with their expiration, ascending by tier.
    pub(crate) fn entries(&self) -> Vec<(RoleDefinition, Option<DateTime<Utc>>)> {
        let members = self.lock();
        members
            .roles
            .iter()
            .map(|role| (role.clone(), members.expirations.get(role).copied()))
            .collect()
    }

    /// Take the lock and prune lapsed members.
    fn lock(&self) -> MutexGuard<'_, Members> {
        let mut members = self.members.lock();
        self.sweep(&mut members);
        members
    }

    fn sweep(&self, members: &mut Members) {
        for role in self.expiry.expired(&members.roles, &members.expirations) {
            members.remove(&role);
            debug!(role = %role, "Role membership expired");
        }
    }

    /// Members plus every ancestor reachable through the registry.
    ///
    /// The registry lock is held per lookup only. A role already collected
    /// stops the walk, which also bounds chains that loop back on themselves.
    fn closure(&self) -> HashSet<RoleDefinition> {
        let members = self.lock();
        let mut closure = HashSet::with_capacity(members.roles.len());

        for role in &members.roles {
            let mut current = Some(role.clone());
            while let Some(role) = current {
                current = self.registry.inherits(&role);
                if !closure.insert(role) {
                    break;
                }
            }
        }

        closure
    }
}
