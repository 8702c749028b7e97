//! Command executor: permission check, parse, dispatch, render.
//!
//! Every command runs to completion before the next one starts; the host
//! serializes dispatch, so the executor holds the manager by value.

use super::command::{CommandKind, StationCommand};
use super::error::CommandError;
use super::render;
use crate::security::{Capability, CapabilitySet, PermissionProvider};
use crate::stations::{
    AddStreamRequest, OwnerInfo, RemoveError, RemoveScope, StationManager, StatusFilter,
};
use tracing::{debug, info};

/// The player issuing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
    pub display_name: String,
}

impl Caller {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Caller {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

pub struct CommandExecutor {
    manager: StationManager,
    permissions: Box<dyn PermissionProvider>,
    commands_processed: usize,
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("manager", &self.manager)
            .field("commands_processed", &self.commands_processed)
            .finish()
    }
}

impl CommandExecutor {
    pub fn new(manager: StationManager, permissions: Box<dyn PermissionProvider>) -> Self {
        CommandExecutor {
            manager,
            permissions,
            commands_processed: 0,
        }
    }

    pub fn manager(&self) -> &StationManager {
        &self.manager
    }

    pub fn commands_processed(&self) -> usize {
        self.commands_processed
    }

    /// Give the manager back, e.g. to close it
    pub fn into_manager(self) -> StationManager {
        self.manager
    }

    /// Handle one chat command and return the reply messages.
    ///
    /// Unknown commands and callers without any of the command's
    /// capabilities get no reply.
    pub fn handle(&mut self, caller: &Caller, name: &str, args: &[String]) -> Vec<String> {
        let Some(kind) = CommandKind::from_name(name) else {
            debug!(command = name, "Ignoring unknown command");
            return Vec::new();
        };
        let caps = self.permissions.capabilities(&caller.id);
        if !caps.has_any(kind.capabilities()) {
            debug!(caller = %caller.id, command = kind.name(), "Permission denied");
            return Vec::new();
        }

        let result = StationCommand::parse(kind, args)
            .and_then(|command| self.execute(caller, &caps, command));

        self.commands_processed += 1;
        match result {
            Ok(reply) => reply,
            Err(e) if e.is_silent() => Vec::new(),
            Err(e) => vec![e.to_string()],
        }
    }

    /// Execute a parsed command with the caller's capabilities
    pub fn execute(
        &mut self,
        caller: &Caller,
        caps: &CapabilitySet,
        command: StationCommand,
    ) -> Result<Vec<String>, CommandError> {
        if !caps.has_any(command.kind().capabilities()) {
            return Err(CommandError::PermissionDenied);
        }

        match command {
            StationCommand::AddStream { name, url } => {
                let record = self.manager.add_stream(
                    AddStreamRequest {
                        name,
                        url,
                        owner: OwnerInfo::new(caller.display_name.clone(), caller.id.clone()),
                        requested_verified: true,
                    },
                    caps,
                )?;
                Ok(vec![render::stream_added(&record)])
            }
            StationCommand::ApproveStream { id } => {
                let record = self
                    .manager
                    .approve_stream(id)
                    .ok_or_else(|| CommandError::IndexNotFound {
                        given: id.to_string(),
                    })?;
                info!(caller = %caller.id, id, "Approved via command");
                Ok(vec![render::stream_approved(&record)])
            }
            StationCommand::GetStreams { name, status } => {
                let data = self.manager.data();
                let own_only = !caps.has(Capability::Get);
                let records = match (name.as_deref(), own_only) {
                    (None, false) => data.by_status(status),
                    (None, true) => data.by_owner(status, &caller.id),
                    (Some(name), false) => data.by_name(status, name),
                    (Some(name), true) => data.by_name_and_owner(status, name, &caller.id),
                };
                Ok(render::listing(records))
            }
            StationCommand::GetStreamsByOwnerName { name, status } => Ok(render::listing(
                self.manager.data().by_owner_name(status, &name),
            )),
            StationCommand::GetStreamsByOwnerId { owner_id, status } => Ok(render::listing(
                self.manager.data().by_owner(status, &owner_id),
            )),
            StationCommand::RemoveStream { id } => {
                self.remove_for(caller, caps, id)?;
                Ok(vec![render::stream_removed(id)])
            }
            StationCommand::ClearStreams { status } => {
                let status = if caps.has(Capability::Clear) {
                    status
                } else {
                    StatusFilter::Pending
                };
                let removed = self.manager.clear_streams(status);
                info!(caller = %caller.id, removed, "Cleared via command");
                Ok(vec![render::streams_cleared(status)])
            }
            StationCommand::SetStreamLimit { limit } => {
                self.manager.set_stream_limit(limit);
                Ok(vec![render::limit_set(limit)])
            }
            StationCommand::GetStreamLimit => {
                Ok(vec![render::limit_get(self.manager.stream_limit())])
            }
        }
    }

    /// Try each removal scope the caller holds, broadest first
    fn remove_for(&mut self, caller: &Caller, caps: &CapabilitySet, id: u32) -> Result<(), CommandError> {
        let scopes = removal_scopes(caps, &caller.id);
        let mut refused = false;
        for scope in scopes {
            match self.manager.remove_stream_in_scope(id, scope) {
                Ok(_) => return Ok(()),
                Err(RemoveError::NotFound) => break,
                Err(RemoveError::NotOwner | RemoveError::StatusMismatch) => refused = true,
            }
        }

        let id = id.to_string();
        if refused {
            debug!(caller = %caller.id, stream = %id, "Removal outside caller scope");
            Err(CommandError::NotOwner { id })
        } else {
            Err(CommandError::NotFound { id })
        }
    }
}

/// Removal scopes granted by `caps`, broadest first
fn removal_scopes<'a>(caps: &CapabilitySet, caller_id: &'a str) -> Vec<RemoveScope<'a>> {
    let mut scopes = Vec::new();
    if caps.has(Capability::Remove) {
        scopes.push(RemoveScope::any());
    }
    if caps.has(Capability::RemovePending) {
        scopes.push(RemoveScope {
            owner_id: None,
            status: StatusFilter::Pending,
        });
    }
    if caps.has(Capability::RemoveOwner) {
        scopes.push(RemoveScope {
            owner_id: Some(caller_id),
            status: StatusFilter::Any,
        });
    }
    if caps.has(Capability::RemovePendingOwner) {
        scopes.push(RemoveScope {
            owner_id: Some(caller_id),
            status: StatusFilter::Pending,
        });
    }
    scopes
}
