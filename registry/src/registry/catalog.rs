//! Validated, immutable role catalog.

use std::collections::{HashMap, HashSet};

use rk_common::RoleDefinition;

use super::{RegistryError, RoleUnit};

/// Tier-ordered role definitions plus a lowercase name index.
///
/// A catalog is never mutated after [`Catalog::build`]; the registry swaps
/// whole catalogs instead.
#[derive(Debug, Default)]
pub struct Catalog {
    roles: Vec<RoleDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate a batch of units and assemble a catalog from them.
    ///
    /// Checks, in order: names are non-empty and unique (case-insensitive),
    /// tiers are unique, every parent is part of the batch, and no parent
    /// chain loops.
    pub fn build(units: Vec<RoleUnit>) -> Result<Self, RegistryError> {
        let mut roles = Vec::with_capacity(units.len());
        let mut origins: HashMap<String, String> = HashMap::with_capacity(units.len());
        let mut tiers = HashSet::with_capacity(units.len());

        for RoleUnit { origin, data } in units {
            let role = RoleDefinition::from(data);
            if role.name().is_empty() {
                return Err(RegistryError::EmptyName { origin });
            }
            if origins.contains_key(&role.key()) {
                return Err(RegistryError::DuplicateName {
                    origin,
                    name: role.name().to_string(),
                });
            }
            if !tiers.insert(role.tier()) {
                return Err(RegistryError::DuplicateTier {
                    origin,
                    tier: role.tier(),
                });
            }
            origins.insert(role.key(), origin);
            roles.push(role);
        }

        roles.sort_by_key(RoleDefinition::tier);
        let index = roles
            .iter()
            .enumerate()
            .map(|(i, role)| (role.key(), i))
            .collect();

        let catalog = Self { roles, index };
        catalog.check_parents(&origins)?;
        Ok(catalog)
    }

    fn check_parents(&self, origins: &HashMap<String, String>) -> Result<(), RegistryError> {
        let origin_of = |role: &RoleDefinition| origins.get(&role.key()).cloned().unwrap_or_default();

        for role in &self.roles {
            if let Some(parent) = role.inherits_name() {
                if self.get(parent).is_none() {
                    return Err(RegistryError::UnknownParent {
                        origin: origin_of(role),
                        role: role.name().to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        // The re-entered role is on the loop; the start may only lead into it.
        for start in 0..self.roles.len() {
            let mut seen = HashSet::new();
            let mut current = Some(start);
            while let Some(i) = current {
                if !seen.insert(i) {
                    let looped = &self.roles[i];
                    return Err(RegistryError::InheritanceCycle {
                        origin: origin_of(looped),
                        role: looped.name().to_string(),
                    });
                }
                current = self.roles[i]
                    .inherits_name()
                    .and_then(|parent| self.index.get(&parent.to_lowercase()).copied());
            }
        }

        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&RoleDefinition> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.roles[i])
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }
}
