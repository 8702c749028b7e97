//! Chat command façade.
//!
//! - `command.rs`: command names, required capabilities, argument parsing
//! - `executor.rs`: permission check and dispatch into the station manager
//! - `render.rs`: chat reply text
//! - `error.rs`: command failures, rendered as a single reply

mod command;
mod error;
mod executor;
pub mod render;

pub use command::{CommandKind, StationCommand};
pub use error::CommandError;
pub use executor::{Caller, CommandExecutor};
