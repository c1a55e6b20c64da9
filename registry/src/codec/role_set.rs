//! Name-based schemas for persisting roles.
//!
//! Role sets are stored as lowercase role names plus their expirations.
//! Decoding resolves names against the current registry and silently drops
//! names it no longer knows, so a stored set survives roles being retired.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rk_common::RoleDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CodecError, Marshaler};
use crate::principal::RoleSet;
use crate::registry::RoleRegistry;

/// Serialized form of a [`RoleSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSetData {
    /// Lowercase member names, ascending by tier.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration per lowercase name, only for members that have one.
    #[serde(default)]
    pub expirations: BTreeMap<String, DateTime<Utc>>,
}

impl RoleSetData {
    /// Capture the current members of `set`.
    pub fn from_set(set: &RoleSet) -> Self {
        let mut data = Self::default();
        for (role, expiration) in set.entries() {
            let name = role.key();
            if let Some(at) = expiration {
                data.expirations.insert(name.clone(), at);
            }
            data.roles.push(name);
        }
        data
    }

    /// Add every known role to `set`, with its expiration if one was stored.
    ///
    /// Returns how many names were skipped because the registry does not
    /// know them.
    pub fn apply_to(&self, set: &RoleSet) -> usize {
        let mut skipped = 0;
        for name in &self.roles {
            let Some(role) = set.registry().by_name(name) else {
                debug!(role = %name, "Skipping unknown role in stored role set");
                skipped += 1;
                continue;
            };
            set.add(&role);
            if let Some(at) = self.expirations.get(name) {
                set.expire(&role, *at);
            }
        }
        skipped
    }
}

impl RoleSet {
    /// Encode the current members with `codec`.
    pub fn marshal(&self, codec: &impl Marshaler) -> Result<Vec<u8>, CodecError> {
        codec.marshal(&RoleSetData::from_set(self))
    }

    /// Decode `bytes` with `codec` and add the roles it names to this set.
    ///
    /// Malformed input is an error; unknown role names are not.
    pub fn unmarshal(&self, codec: &impl Marshaler, bytes: &[u8]) -> Result<(), CodecError> {
        let data: RoleSetData = codec.unmarshal(bytes)?;
        data.apply_to(self);
        Ok(())
    }

    /// Decode a fresh set bound to `registry`.
    pub fn decode(
        registry: Arc<RoleRegistry>,
        codec: &impl Marshaler,
        bytes: &[u8],
    ) -> Result<Self, CodecError> {
        let set = Self::new(registry);
        set.unmarshal(codec, bytes)?;
        Ok(set)
    }
}

/// Serialized form of a single role reference.
#[derive(Debug, Serialize, Deserialize)]
struct RoleRef {
    name: String,
}

/// Encode a reference to `role` by name.
pub fn marshal_role(codec: &impl Marshaler, role: &RoleDefinition) -> Result<Vec<u8>, CodecError> {
    codec.marshal(&RoleRef { name: role.key() })
}

/// Decode a role reference and resolve it against `registry`.
pub fn unmarshal_role(
    codec: &impl Marshaler,
    registry: &RoleRegistry,
    bytes: &[u8],
) -> Result<RoleDefinition, CodecError> {
    let RoleRef { name } = codec.unmarshal(bytes)?;
    registry.by_name(&name).ok_or(CodecError::UnknownRole(name))
}
