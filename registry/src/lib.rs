//! Rolekit Registry
//!
//! Tiered role catalog with inheritance, plus per-principal role sets that
//! expire memberships lazily and persist through pluggable formats.

pub mod codec;
pub mod config;
pub mod principal;
pub mod registry;

pub use codec::{CodecError, CodecFormat, Marshaler};
pub use principal::{PrincipalDirectory, RoleSet};
pub use registry::{RegistryError, RoleRegistry};
pub use rk_common::{RoleData, RoleDefinition};
