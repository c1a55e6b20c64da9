//! Role Catalog Error Types

use thiserror::Error;

/// Reasons a catalog load is rejected.
///
/// Every variant names the offending unit (`origin`), usually a file name.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The source or one of its units could not be read.
    #[error("error loading roles from {origin}: {source}")]
    Unreadable {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// A unit could not be decoded into a role definition.
    #[error("error loading role {origin}: {reason}")]
    Malformed { origin: String, reason: String },

    /// A unit declared an empty name.
    #[error("error loading role {origin}: name must not be empty")]
    EmptyName { origin: String },

    /// Two units share a name (case-insensitive).
    #[error("error loading role {origin}: role with name {name} already exists")]
    DuplicateName { origin: String, name: String },

    /// Two units share a tier.
    #[error("error loading role {origin}: role with tier {tier} already exists")]
    DuplicateTier { origin: String, tier: i32 },

    /// A unit inherits from a role that is not part of the same load.
    #[error("error loading role {origin}: {role} inherits unknown role {parent}")]
    UnknownParent {
        origin: String,
        role: String,
        parent: String,
    },

    /// Following the parent chain from a unit leads back to itself.
    #[error("error loading role {origin}: inheritance cycle through {role}")]
    InheritanceCycle { origin: String, role: String },
}

impl RegistryError {
    /// The unit the error refers to.
    pub fn origin(&self) -> &str {
        match self {
            Self::Unreadable { origin, .. }
            | Self::Malformed { origin, .. }
            | Self::EmptyName { origin }
            | Self::DuplicateName { origin, .. }
            | Self::DuplicateTier { origin, .. }
            | Self::UnknownParent { origin, .. }
            | Self::InheritanceCycle { origin, .. } => origin,
        }
    }
}
