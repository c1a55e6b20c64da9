//! Rolekit Common Library
//!
//! Shared role types used by the registry and by anything that persists or
//! displays role definitions.

pub mod types;

pub use types::*;
