//! Role registry.
//!
//! Process-wide catalog of role definitions. Loads build a complete catalog
//! off to the side and publish it with a single swap, so readers see either
//! the old catalog or the new one, never a partial one.

mod catalog;
pub mod error;
pub mod source;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use rk_common::RoleDefinition;
use tracing::{info, warn};

use catalog::Catalog;
pub use error::RegistryError;
pub use source::{DirectorySource, MemorySource, RoleSource, RoleUnit};

/// Catalog of role definitions, shared by reference with every consumer.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    catalog: RwLock<Arc<Catalog>>,
}

impl RoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with the definitions read from `source`.
    ///
    /// The load is all-or-nothing: on error the current catalog is untouched.
    /// Returns the number of definitions now registered.
    #[tracing::instrument(skip_all)]
    pub fn load(&self, source: &impl RoleSource) -> Result<usize, RegistryError> {
        let built = source.read_units().and_then(Catalog::build);
        let catalog = match built {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                warn!(origin = %e.origin(), error = %e, "Rejected role catalog");
                return Err(e);
            }
        };

        let count = catalog.len();
        *self.catalog.write() = catalog;

        info!(roles = count, "Role catalog loaded");
        Ok(count)
    }

    /// Load every definition file in `dir`.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, RegistryError> {
        self.load(&DirectorySource::new(dir.as_ref()))
    }

    /// Case-insensitive lookup. An unknown name is a normal outcome.
    pub fn by_name(&self, name: &str) -> Option<RoleDefinition> {
        self.read().get(name).cloned()
    }

    /// Copy of every definition, ascending by tier.
    pub fn all(&self) -> Vec<RoleDefinition> {
        self.read().roles().to_vec()
    }

    /// Resolve `role`'s parent by name against the current catalog.
    ///
    /// `None` means the role is the root of its branch (or its parent is no
    /// longer registered).
    pub fn inherits(&self, role: &RoleDefinition) -> Option<RoleDefinition> {
        role.inherits_name().and_then(|parent| self.by_name(parent))
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }
}

#[cfg(test)]
mod tests {
    use rk_common::RoleData;

    use super::*;

    fn role(name: &str, inherits: Option<&str>, tier: i32) -> RoleData {
        RoleData {
            name: name.into(),
            inherits: inherits.map(Into::into),
            colour: None,
            tier,
        }
    }

    fn staff() -> MemorySource {
        MemorySource::from_roles([
            role("owner", None, 3),
            role("admin", Some("owner"), 2),
            role("moderator", None, 1),
        ])
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = RoleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
        assert_eq!(registry.by_name("owner"), None);
    }

    #[test]
    fn test_load_orders_by_tier() {
        let registry = RoleRegistry::new();
        assert_eq!(registry.load(&staff()).unwrap(), 3);

        let names: Vec<_> = registry.all().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["moderator", "admin", "owner"]);
    }

    #[test]
    fn test_by_name_ignores_case() {
        let registry = RoleRegistry::new();
        registry.load(&staff()).unwrap();

        assert_eq!(registry.by_name("OWNER").map(|r| r.tier()), Some(3));
        assert_eq!(registry.by_name("Admin").map(|r| r.tier()), Some(2));
        assert_eq!(registry.by_name("guest"), None);
    }

    #[test]
    fn test_inherits_resolves_parent() {
        let registry = RoleRegistry::new();
        registry.load(&staff()).unwrap();

        let admin = registry.by_name("admin").unwrap();
        let owner = registry.by_name("owner").unwrap();
        assert_eq!(registry.inherits(&admin), Some(owner.clone()));
        assert_eq!(registry.inherits(&owner), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_catalog() {
        let registry = RoleRegistry::new();
        registry.load(&staff()).unwrap();
        let before = registry.all();

        let clash = MemorySource::from_roles([role("vip", None, 5), role("VIP", None, 6)]);
        assert!(registry.load(&clash).is_err());

        assert_eq!(registry.all(), before);
    }

    #[test]
    fn test_reload_replaces_catalog() {
        let registry = RoleRegistry::new();
        registry.load(&staff()).unwrap();

        registry
            .load(&MemorySource::from_roles([role("member", None, 0)]))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_name("owner"), None);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = RoleRegistry::new();
        registry.load(&staff()).unwrap();
        let snapshot = registry.all();

        registry
            .load(&MemorySource::from_roles([role("member", None, 0)]))
            .unwrap();

        assert_eq!(snapshot.len(), 3);
    }
}
