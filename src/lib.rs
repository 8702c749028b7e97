//! BoomBox station manager: player-submitted audio streams with a
//! pending/verified moderation workflow, per-player quotas, and a
//! permission-gated chat command surface.

pub mod commands;
pub mod config;
pub mod host;
pub mod observability;
pub mod playback;
pub mod security;
pub mod simulator;
pub mod stations;
pub mod storage;

pub use commands::{Caller, CommandError, CommandExecutor, CommandKind, StationCommand};
pub use config::{ConfigError, StationsConfig};
pub use playback::{FilePlayback, LoggingPlayback, PlaybackSink, RecordingPlayback};
pub use security::{Capability, CapabilitySet, GrantTable, PermissionProvider};
pub use stations::{AddStreamError, StationData, StationManager, StreamRecord, StreamStatus};
pub use storage::{InMemoryObjectStore, LocalFsObjectStore, ObjectStore, StorageError};
