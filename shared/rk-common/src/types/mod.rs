//! Role Types

pub mod role;

pub use role::{RoleData, RoleDefinition};
