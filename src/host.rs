//! Console host: stands in for the game server's chat dispatch.
//!
//! Input lines look like `<player-id> /<command> [args...]`, with double
//! quotes grouping an argument. Blank lines and `#` comments are skipped.
//! Every reply message is written to the output followed by a newline.

use crate::commands::{Caller, CommandExecutor};
use crate::security::{split_quoted, GrantTable};
use crate::stations::StationManager;
use crate::storage::StorageError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("expected '<player-id> /<command> [args...]', got {line:?}")]
    Malformed { line: String },
}

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub player_id: String,
    pub command: String,
    pub args: Vec<String>,
}

/// Parse a console line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ConsoleLine>, HostError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = || HostError::Malformed {
        line: trimmed.to_string(),
    };
    let mut tokens = split_quoted(trimmed).into_iter();
    let player_id = tokens.next().filter(|id| !id.is_empty()).ok_or_else(malformed)?;
    let command = tokens
        .next()
        .and_then(|cmd| cmd.strip_prefix('/').map(str::to_string))
        .filter(|cmd| !cmd.is_empty())
        .ok_or_else(malformed)?;

    Ok(Some(ConsoleLine {
        player_id,
        command,
        args: tokens.collect(),
    }))
}

pub struct ConsoleHost {
    executor: CommandExecutor,
    grants: GrantTable,
}

impl ConsoleHost {
    pub fn new(manager: StationManager, grants: GrantTable) -> Self {
        ConsoleHost {
            executor: CommandExecutor::new(manager, Box::new(grants.clone())),
            grants,
        }
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Dispatch one console line and return the replies
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<String>, HostError> {
        let Some(parsed) = parse_line(line)? else {
            return Ok(Vec::new());
        };
        let caller = Caller::new(
            parsed.player_id.as_str(),
            self.grants.display_name(&parsed.player_id),
        );
        Ok(self.executor.handle(&caller, &parsed.command, &parsed.args))
    }

    /// Read lines until EOF, writing replies as they are produced
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line) {
                Ok(replies) => {
                    for reply in replies {
                        writer.write_all(reply.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                    }
                    writer.flush().await?;
                }
                Err(e) => warn!("{}", e),
            }
        }
        info!(
            commands = self.executor.commands_processed(),
            "Console input closed"
        );
        Ok(())
    }

    /// Final flush of the station data
    pub fn close(self) -> Result<(), StorageError> {
        self.executor.into_manager().close()
    }
}
