//! Station mutation errors

use super::record::MAX_NAME_LEN;

/// Why a stream submission was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddStreamError {
    /// Caller holds neither `add` nor `add-pending`
    #[error("not permitted to add streams")]
    PermissionDenied,
    #[error("You can only have a maximum of {limit} streams pending AND verified at any given time!")]
    QuotaExceeded { limit: u32 },
    #[error("Stream name must be <= {max} characters, got {length}", max = MAX_NAME_LEN)]
    NameTooLong { length: usize },
    #[error("Invalid stream URL, got {url}")]
    InvalidUrl { url: String },
}

/// Why a removal was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    #[error("stream not found")]
    NotFound,
    /// Record exists but belongs to someone else
    #[error("stream owned by another player")]
    NotOwner,
    /// Record exists but its status is outside the caller's scope
    #[error("stream status outside removal scope")]
    StatusMismatch,
}
