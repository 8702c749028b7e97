//! Chat command names and parsed command values.
//!
//! Parsing turns positional chat arguments into a `StationCommand`. Argument
//! errors are reported with the per-command usage text.

use super::error::CommandError;
use crate::security::Capability;
use crate::stations::StatusFilter;

/// The chat commands the station manager answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AddStream,
    ApproveStream,
    GetStreams,
    GetStreamsByOwnerName,
    GetStreamsByOwnerId,
    RemoveStream,
    ClearStreams,
    SetStreamLimit,
    GetStreamLimit,
}

impl CommandKind {
    pub const ALL: [CommandKind; 9] = [
        CommandKind::AddStream,
        CommandKind::ApproveStream,
        CommandKind::GetStreams,
        CommandKind::GetStreamsByOwnerName,
        CommandKind::GetStreamsByOwnerId,
        CommandKind::RemoveStream,
        CommandKind::ClearStreams,
        CommandKind::SetStreamLimit,
        CommandKind::GetStreamLimit,
    ];

    /// Chat command name (without the leading slash)
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::AddStream => "addstream",
            CommandKind::ApproveStream => "approvestream",
            CommandKind::GetStreams => "getstreams",
            CommandKind::GetStreamsByOwnerName => "getstreamsowner",
            CommandKind::GetStreamsByOwnerId => "getstreamsownerid",
            CommandKind::RemoveStream => "removestream",
            CommandKind::ClearStreams => "clearstreams",
            CommandKind::SetStreamLimit => "setstreamlimit",
            CommandKind::GetStreamLimit => "getstreamlimit",
        }
    }

    /// Case-insensitive lookup; a leading `/` is ignored
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('/').unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// The caller needs at least one of these to be answered at all
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            CommandKind::AddStream => &[Capability::Add, Capability::AddPending],
            CommandKind::ApproveStream => &[Capability::Approve],
            CommandKind::GetStreams => &[Capability::Get, Capability::GetOwner],
            CommandKind::GetStreamsByOwnerName | CommandKind::GetStreamsByOwnerId => {
                &[Capability::Get]
            }
            CommandKind::RemoveStream => &[
                Capability::Remove,
                Capability::RemovePending,
                Capability::RemoveOwner,
                Capability::RemovePendingOwner,
            ],
            CommandKind::ClearStreams => &[Capability::Clear, Capability::ClearPending],
            CommandKind::SetStreamLimit => &[Capability::SetStreamLimit],
            CommandKind::GetStreamLimit => &[Capability::GetStreamLimit],
        }
    }

    pub fn usage(&self) -> Option<&'static str> {
        match self {
            CommandKind::AddStream => Some(
                "Usage: /addstream <name> <url> \ne.g: /addstream \"My Station\" \"example.com/stream\"",
            ),
            CommandKind::ApproveStream => {
                Some("Usage: /approvestream <id> \ne.g: /approvestream \"2\"")
            }
            CommandKind::GetStreamsByOwnerName => Some(
                "Usage: /getstreamsowner <name> <\"verified\" or \"pending\"> \ne.g: /getstreamsowner \"player123\" \"pending\"",
            ),
            CommandKind::GetStreamsByOwnerId => Some(
                "Usage: /getstreamsownerid <id> <\"verified\" or \"pending\"> \ne.g: /getstreamsownerid \"76561197960287930\" \"verified\"",
            ),
            CommandKind::RemoveStream => {
                Some("Usage: /removestream <id> \ne.g: /removestream \"2\"")
            }
            CommandKind::SetStreamLimit => {
                Some("Usage: /setstreamlimit <limit> \ne.g: /setstreamlimit 3")
            }
            CommandKind::GetStreams | CommandKind::ClearStreams | CommandKind::GetStreamLimit => {
                None
            }
        }
    }

    fn missing_argument(&self) -> CommandError {
        CommandError::MissingArgument {
            usage: self.usage().unwrap_or_default(),
        }
    }
}

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationCommand {
    AddStream { name: String, url: String },
    ApproveStream { id: u32 },
    /// `name: None` lists without a name filter
    GetStreams {
        name: Option<String>,
        status: StatusFilter,
    },
    GetStreamsByOwnerName { name: String, status: StatusFilter },
    GetStreamsByOwnerId { owner_id: String, status: StatusFilter },
    RemoveStream { id: u32 },
    ClearStreams { status: StatusFilter },
    SetStreamLimit { limit: u32 },
    GetStreamLimit,
}

impl StationCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            StationCommand::AddStream { .. } => CommandKind::AddStream,
            StationCommand::ApproveStream { .. } => CommandKind::ApproveStream,
            StationCommand::GetStreams { .. } => CommandKind::GetStreams,
            StationCommand::GetStreamsByOwnerName { .. } => CommandKind::GetStreamsByOwnerName,
            StationCommand::GetStreamsByOwnerId { .. } => CommandKind::GetStreamsByOwnerId,
            StationCommand::RemoveStream { .. } => CommandKind::RemoveStream,
            StationCommand::ClearStreams { .. } => CommandKind::ClearStreams,
            StationCommand::SetStreamLimit { .. } => CommandKind::SetStreamLimit,
            StationCommand::GetStreamLimit => CommandKind::GetStreamLimit,
        }
    }

    /// Parse positional arguments for `kind`
    pub fn parse(kind: CommandKind, args: &[String]) -> Result<StationCommand, CommandError> {
        match kind {
            CommandKind::AddStream => match args {
                [name, url] if !name.is_empty() && !url.is_empty() => {
                    Ok(StationCommand::AddStream {
                        name: name.clone(),
                        url: url.clone(),
                    })
                }
                _ => Err(kind.missing_argument()),
            },
            CommandKind::ApproveStream => {
                let given = required(kind, args)?;
                let id = parse_id(given).map_err(|bad| match bad {
                    BadId::NotANumber => CommandError::InvalidIndex {
                        given: given.to_string(),
                    },
                    BadId::OutOfRange => CommandError::IndexNotFound {
                        given: given.to_string(),
                    },
                })?;
                Ok(StationCommand::ApproveStream { id })
            }
            CommandKind::GetStreams => {
                let name = args.first().filter(|name| !name.is_empty()).cloned();
                let status = StatusFilter::from_token(arg(args, 1), StatusFilter::Verified);
                Ok(StationCommand::GetStreams { name, status })
            }
            CommandKind::GetStreamsByOwnerName => {
                let name = required(kind, args)?.to_string();
                let status = StatusFilter::from_token(arg(args, 1), StatusFilter::Any);
                Ok(StationCommand::GetStreamsByOwnerName { name, status })
            }
            CommandKind::GetStreamsByOwnerId => {
                let owner_id = required(kind, args)?.to_string();
                let status = StatusFilter::from_token(arg(args, 1), StatusFilter::Any);
                Ok(StationCommand::GetStreamsByOwnerId { owner_id, status })
            }
            CommandKind::RemoveStream => {
                let given = required(kind, args)?;
                let id = parse_id(given).map_err(|bad| match bad {
                    BadId::NotANumber => CommandError::InvalidId {
                        given: given.to_string(),
                    },
                    BadId::OutOfRange => CommandError::NotFound {
                        id: given.to_string(),
                    },
                })?;
                Ok(StationCommand::RemoveStream { id })
            }
            CommandKind::ClearStreams => Ok(StationCommand::ClearStreams {
                status: StatusFilter::from_token(arg(args, 0), StatusFilter::Any),
            }),
            CommandKind::SetStreamLimit => {
                let given = required(kind, args)?;
                let limit = given
                    .parse::<u32>()
                    .map_err(|_| CommandError::InvalidQuotaValue {
                        given: given.to_string(),
                    })?;
                Ok(StationCommand::SetStreamLimit { limit })
            }
            CommandKind::GetStreamLimit => Ok(StationCommand::GetStreamLimit),
        }
    }
}

fn arg(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str)
}

/// First argument, which must be present and non-empty
fn required(kind: CommandKind, args: &[String]) -> Result<&str, CommandError> {
    match arg(args, 0) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(kind.missing_argument()),
    }
}

enum BadId {
    NotANumber,
    /// A number, but no record could ever carry it
    OutOfRange,
}

fn parse_id(given: &str) -> Result<u32, BadId> {
    let value: i64 = given.parse().map_err(|_| BadId::NotANumber)?;
    u32::try_from(value).map_err(|_| BadId::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CommandKind::from_name("addstream"), Some(CommandKind::AddStream));
        assert_eq!(
            CommandKind::from_name("/GetStreamsOwnerId"),
            Some(CommandKind::GetStreamsByOwnerId)
        );
        assert_eq!(CommandKind::from_name("nope"), None);
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_parse_addstream() {
        assert_eq!(
            StationCommand::parse(CommandKind::AddStream, &args(&["Jazz", "example.com"])),
            Ok(StationCommand::AddStream {
                name: "Jazz".to_string(),
                url: "example.com".to_string()
            })
        );
        for bad in [vec![], args(&["Jazz"]), args(&["", "x"]), args(&["a", "b", "c"])] {
            assert!(matches!(
                StationCommand::parse(CommandKind::AddStream, &bad),
                Err(CommandError::MissingArgument { .. })
            ));
        }
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(
            StationCommand::parse(CommandKind::ApproveStream, &args(&["4"])),
            Ok(StationCommand::ApproveStream { id: 4 })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::ApproveStream, &args(&["four"])),
            Err(CommandError::InvalidIndex {
                given: "four".to_string()
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::RemoveStream, &args(&["-1"])),
            Err(CommandError::NotFound {
                id: "-1".to_string()
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::RemoveStream, &args(&["x1"])),
            Err(CommandError::InvalidId {
                given: "x1".to_string()
            })
        );
        assert!(matches!(
            StationCommand::parse(CommandKind::RemoveStream, &args(&[""])),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_status_defaults() {
        assert_eq!(
            StationCommand::parse(CommandKind::GetStreams, &[]),
            Ok(StationCommand::GetStreams {
                name: None,
                status: StatusFilter::Verified
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::GetStreams, &args(&["", "pending"])),
            Ok(StationCommand::GetStreams {
                name: None,
                status: StatusFilter::Pending
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::GetStreamsByOwnerName, &args(&["bob", "bogus"])),
            Ok(StationCommand::GetStreamsByOwnerName {
                name: "bob".to_string(),
                status: StatusFilter::Any
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::ClearStreams, &args(&["verified"])),
            Ok(StationCommand::ClearStreams {
                status: StatusFilter::Verified
            })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::ClearStreams, &[]),
            Ok(StationCommand::ClearStreams {
                status: StatusFilter::Any
            })
        );
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(
            StationCommand::parse(CommandKind::SetStreamLimit, &args(&["0"])),
            Ok(StationCommand::SetStreamLimit { limit: 0 })
        );
        assert_eq!(
            StationCommand::parse(CommandKind::SetStreamLimit, &args(&["-2"])),
            Err(CommandError::InvalidQuotaValue {
                given: "-2".to_string()
            })
        );
    }

    #[test]
    fn test_kind_round_trip() {
        let cmd = StationCommand::parse(CommandKind::GetStreamLimit, &[]).unwrap();
        assert_eq!(cmd.kind(), CommandKind::GetStreamLimit);
    }
}
