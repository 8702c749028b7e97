//! Stream record types and the persisted station aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum stream name length, in characters
pub const MAX_NAME_LEN: usize = 32;

/// Quota applied when no aggregate has been persisted yet
pub const DEFAULT_MAX_STREAMS_PER_PLAYER: u32 = 3;

/// Moderation state of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamStatus {
    Pending,
    Verified,
}

impl StreamStatus {
    /// Upper-case label used in chat listings
    pub fn label(&self) -> &'static str {
        match self {
            StreamStatus::Pending => "PENDING",
            StreamStatus::Verified => "VERIFIED",
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status selector for queries and clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    Pending,
    Verified,
    Any,
}

impl StatusFilter {
    pub fn matches(&self, status: StreamStatus) -> bool {
        match self {
            StatusFilter::Pending => status == StreamStatus::Pending,
            StatusFilter::Verified => status == StreamStatus::Verified,
            StatusFilter::Any => true,
        }
    }

    /// Parse the chat token (`verified` / `pending`), falling back to `default`
    /// for anything else, including an empty token.
    pub fn from_token(token: Option<&str>, default: StatusFilter) -> StatusFilter {
        match token {
            Some("verified") => StatusFilter::Verified,
            Some("pending") => StatusFilter::Pending,
            _ => default,
        }
    }
}

/// Snapshot of the submitting player, taken at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub display_name: String,
    pub owner_id: String,
}

impl OwnerInfo {
    pub fn new(display_name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        OwnerInfo {
            display_name: display_name.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// A submitted stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub status: StreamStatus,
    pub owner: OwnerInfo,
}

impl StreamRecord {
    pub fn is_verified(&self) -> bool {
        self.status == StreamStatus::Verified
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner.owner_id == owner_id
    }
}

/// Quota settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub max_streams_per_player: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        QuotaConfig {
            max_streams_per_player: DEFAULT_MAX_STREAMS_PER_PLAYER,
        }
    }
}
