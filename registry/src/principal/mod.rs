//! Per-principal role state.
//!
//! - [`RoleSet`]: roles one principal holds, with optional expirations
//! - [`ExpiryEvaluator`]: lazy pruning of lapsed memberships
//! - [`PrincipalDirectory`]: live sets of connected principals

pub mod directory;
pub mod expiry;
pub mod role_set;

pub use directory::PrincipalDirectory;
pub use expiry::{Clock, ExpiryEvaluator, ManualClock, SystemClock};
pub use role_set::RoleSet;
