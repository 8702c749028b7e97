//! Capability-based permissions
//!
//! The host game server owns permission checks. This module models what the
//! station commands need from it:
//! - `Capability`: the static set of permission flags, registered at startup
//! - `PermissionProvider`: host-side lookup of a player's capabilities
//! - `GrantTable`: an in-process provider loaded from a grants file

mod capability;
mod file;
mod grants;

pub use capability::{Capability, CapabilitySet, PERMISSION_PREFIX};
pub use file::{load_grants_file, parse_grants, split_quoted, GrantFileError};
pub use grants::{GrantTable, PermissionProvider, PlayerGrant};
