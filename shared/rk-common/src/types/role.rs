//! Role Definition Types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix that resets formatting after a raw-coded colour.
const FORMAT_RESET: &str = "§r";

/// Prefix marking a raw terminal/format colour code.
const FORMAT_PREFIX: char = '§';

/// Immutable catalog entry describing one role.
///
/// Two definitions are equal when every field matches, so a role set keeps
/// comparing by value even after the registry it came from was reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleDefinition {
    name: String,
    inherits: Option<String>,
    colour: Option<String>,
    tier: i32,
}

impl RoleDefinition {
    /// Create a root role (no parent, no colour).
    pub fn new(name: impl Into<String>, tier: i32) -> Self {
        Self {
            name: name.into(),
            inherits: None,
            colour: None,
            tier,
        }
    }

    /// Set the name of the parent role.
    #[must_use]
    pub fn with_inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    /// Set the display colour.
    #[must_use]
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    /// Role name, as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parent role, if any. Resolved against a registry on demand.
    pub fn inherits_name(&self) -> Option<&str> {
        self.inherits.as_deref()
    }

    /// Display colour, either a raw format code or a named colour token.
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// Hierarchy rank. Higher means more privileged.
    pub const fn tier(&self) -> i32 {
        self.tier
    }

    /// Lowercased name, used as the registry key and in serialized role sets.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Wrap `text` in this role's colour.
    ///
    /// Raw codes (`§c`) are prefixed and followed by a reset; named tokens
    /// (`red`) become markup tags for the chat formatter.
    ///
    /// ```
    /// use rk_common::RoleDefinition;
    ///
    /// let owner = RoleDefinition::new("owner", 3).with_colour("§4");
    /// assert_eq!(owner.coloured("Steve"), "§4Steve§r");
    ///
    /// let admin = RoleDefinition::new("admin", 2).with_colour("red");
    /// assert_eq!(admin.coloured("Alex"), "<red>Alex</red>");
    /// ```
    pub fn coloured(&self, text: &str) -> String {
        match self.colour() {
            None => text.to_string(),
            Some(code) if code.starts_with(FORMAT_PREFIX) => format!("{code}{text}{FORMAT_RESET}"),
            Some(token) => format!("<{token}>{text}</{token}>"),
        }
    }
}

impl fmt::Display for RoleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One role definition unit as it appears in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleData {
    /// Role name (required).
    pub name: String,
    /// Parent role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    /// Raw format code or named colour token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    /// Hierarchy rank (required, unique per catalog).
    pub tier: i32,
}

impl From<RoleData> for RoleDefinition {
    fn from(data: RoleData) -> Self {
        Self {
            name: data.name.trim().to_string(),
            inherits: non_blank(data.inherits),
            colour: non_blank(data.colour),
            tier: data.tier,
        }
    }
}

/// Empty strings in source files mean "not set".
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
