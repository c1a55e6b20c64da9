//! Lazy expiry evaluation for role memberships.
//!
//! Nothing runs in the background: a role set asks the evaluator which of its
//! members are past their expiration at the start of every operation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rk_common::RoleDefinition;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used by tests and replay tooling.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Decides which memberships have lapsed.
#[derive(Debug, Clone)]
pub struct ExpiryEvaluator {
    clock: Arc<dyn Clock>,
}

impl Default for ExpiryEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ExpiryEvaluator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Members whose expiration is strictly before now, in member order.
    ///
    /// Members without an expiration entry never expire.
    pub fn expired(
        &self,
        members: &[RoleDefinition],
        expirations: &HashMap<RoleDefinition, DateTime<Utc>>,
    ) -> Vec<RoleDefinition> {
        let now = self.clock.now();
        members
            .iter()
            .filter(|role| expirations.get(*role).is_some_and(|at| *at < now))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_expired_is_strictly_before_now() {
        let clock = Arc::new(ManualClock::new(start()));
        let evaluator = ExpiryEvaluator::new(clock.clone());

        let vip = RoleDefinition::new("vip", 1);
        let member = RoleDefinition::new("member", 0);
        let members = vec![member.clone(), vip.clone()];
        let expirations = HashMap::from([(vip.clone(), start())]);

        // Expiring exactly now is not yet expired.
        assert!(evaluator.expired(&members, &expirations).is_empty());

        clock.advance(Duration::seconds(1));
        assert_eq!(evaluator.expired(&members, &expirations), vec![vip]);
    }

    #[test]
    fn test_entries_for_non_members_are_ignored() {
        let evaluator = ExpiryEvaluator::new(Arc::new(ManualClock::new(start())));
        let ghost = RoleDefinition::new("ghost", 9);
        let expirations = HashMap::from([(ghost, start() - Duration::days(1))]);

        assert!(evaluator.expired(&[], &expirations).is_empty());
    }

    #[test]
    fn test_set_moves_clock_both_ways() {
        let clock = Arc::new(ManualClock::new(start()));
        let evaluator = ExpiryEvaluator::new(clock.clone());
        let vip = RoleDefinition::new("vip", 1);
        let deadline = start() + Duration::minutes(5);
        let expirations = HashMap::from([(vip.clone(), deadline)]);
        let members = [vip];

        clock.set(deadline + Duration::milliseconds(1));
        assert_eq!(evaluator.expired(&members, &expirations).len(), 1);

        clock.set(deadline);
        assert!(evaluator.expired(&members, &expirations).is_empty());
        assert_eq!(clock.now(), deadline);
    }
}
