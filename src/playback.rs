//! Downstream playback subsystem binding.
//!
//! After a mutation the verified stations are pushed to the boombox audio
//! subsystem as one comma-joined `name,url,name,url,...` string. The call is
//! fire-and-forget: failures are logged by the sink and never retried.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Name of the host console command that receives the list
pub const SERVER_URL_LIST_COMMAND: &str = "BoomBox.ServerUrlList";

/// Receives the refreshed station list
pub trait PlaybackSink: Send + Sync {
    fn refresh_url_list(&self, url_list: &str);
}

/// Logs the list and does nothing else
#[derive(Debug, Clone, Default)]
pub struct LoggingPlayback;

impl PlaybackSink for LoggingPlayback {
    fn refresh_url_list(&self, url_list: &str) {
        info!(
            command = SERVER_URL_LIST_COMMAND,
            bytes = url_list.len(),
            "Refreshed server URL list"
        );
    }
}

/// Writes the list to a file that the audio subsystem reads
#[derive(Debug, Clone)]
pub struct FilePlayback {
    path: PathBuf,
}

impl FilePlayback {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePlayback { path: path.into() }
    }
}

impl PlaybackSink for FilePlayback {
    fn refresh_url_list(&self, url_list: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Failed to create {:?} for URL list: {}", parent, e);
                return;
            }
        }
        match std::fs::write(&self.path, url_list) {
            Ok(()) => info!(
                command = SERVER_URL_LIST_COMMAND,
                bytes = url_list.len(),
                "Wrote server URL list to {:?}",
                self.path
            ),
            Err(e) => error!("Failed to write URL list to {:?}: {}", self.path, e),
        }
    }
}

/// Keeps every list it receives (for tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayback {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.calls.lock().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl PlaybackSink for RecordingPlayback {
    fn refresh_url_list(&self, url_list: &str) {
        self.calls.lock().push(url_list.to_string());
    }
}
