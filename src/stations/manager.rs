//! Station manager - the mutation layer.
//!
//! Owns the in-memory `StationData` for the process lifetime. Every
//! successful mutation is followed by a full overwrite of the persisted
//! aggregate and, when the verified set may have changed, a republish to the
//! playback sink.
//!
//! # Invariants
//!
//! - Record IDs are unique at every point in time
//! - A failed `add_stream` leaves the aggregate untouched
//! - The persisted object equals the in-memory aggregate after each mutation
//!   (unless the object store itself failed, which is logged)

use super::error::{AddStreamError, RemoveError};
use super::record::{
    OwnerInfo, StatusFilter, StreamRecord, StreamStatus, DEFAULT_MAX_STREAMS_PER_PLAYER,
    MAX_NAME_LEN,
};
use super::store::StationData;
use super::url::normalize_stream_url;
use crate::playback::PlaybackSink;
use crate::security::{Capability, CapabilitySet};
use crate::storage::{ObjectStore, StorageError};
use std::io::ErrorKind;
use tracing::{debug, error, info, warn};

/// Default object key of the persisted aggregate
pub const DEFAULT_DATA_KEY: &str = "BoomBoxStations.json";

/// Options for opening a manager
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Object key the aggregate is stored under
    pub data_key: String,
    /// Quota of a freshly created aggregate
    pub default_limit: u32,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        ManagerOptions {
            data_key: DEFAULT_DATA_KEY.to_string(),
            default_limit: DEFAULT_MAX_STREAMS_PER_PLAYER,
        }
    }
}

/// A stream submission
#[derive(Debug, Clone)]
pub struct AddStreamRequest {
    pub name: String,
    pub url: String,
    pub owner: OwnerInfo,
    /// Ask for the stream to be verified at creation (needs `add`)
    pub requested_verified: bool,
}

/// Which records a caller may remove
#[derive(Debug, Clone, Copy)]
pub struct RemoveScope<'a> {
    /// Restrict to records owned by this player
    pub owner_id: Option<&'a str>,
    /// Restrict to records with this status
    pub status: StatusFilter,
}

impl RemoveScope<'_> {
    pub fn any() -> Self {
        RemoveScope {
            owner_id: None,
            status: StatusFilter::Any,
        }
    }
}

pub struct StationManager {
    data: StationData,
    store: Box<dyn ObjectStore>,
    playback: Box<dyn PlaybackSink>,
    options: ManagerOptions,
}

impl std::fmt::Debug for StationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationManager")
            .field("streams", &self.data.len())
            .field("data_key", &self.options.data_key)
            .finish()
    }
}

impl StationManager {
    /// Load the aggregate (falling back to an empty one, saved immediately)
    /// and push the current verified list downstream.
    pub fn open(
        store: Box<dyn ObjectStore>,
        playback: Box<dyn PlaybackSink>,
        options: ManagerOptions,
    ) -> Self {
        let (data, needs_save) = match Self::load(store.as_ref(), &options.data_key) {
            Ok(data) => {
                info!(
                    streams = data.len(),
                    limit = data.quota.max_streams_per_player,
                    "Loaded station data from '{}'",
                    options.data_key
                );
                (data, false)
            }
            Err(StorageError::NotFound(_)) => {
                info!("No station data at '{}', starting empty", options.data_key);
                (StationData::with_quota(options.default_limit), true)
            }
            Err(e) => {
                warn!("Discarding unreadable station data: {}", e);
                (StationData::with_quota(options.default_limit), true)
            }
        };

        let manager = StationManager {
            data,
            store,
            playback,
            options,
        };
        if needs_save {
            manager.persist();
        }
        manager.republish();
        manager
    }

    fn load(store: &dyn ObjectStore, key: &str) -> Result<StationData, StorageError> {
        let bytes = store.get(key).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(e),
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    /// Overwrite the persisted aggregate
    pub fn save(&self) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec_pretty(&self.data).map_err(|source| StorageError::Encode {
                key: self.options.data_key.clone(),
                source,
            })?;
        self.store.put(&self.options.data_key, &bytes)?;
        debug!(bytes = bytes.len(), "Saved station data");
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to save station data: {}", e);
        }
    }

    fn republish(&self) {
        debug!(stations = self.data.verified_count(), "Republishing verified streams");
        self.playback.refresh_url_list(&self.data.url_list());
    }

    /// Final flush. The manager is unusable afterwards.
    pub fn close(self) -> Result<(), StorageError> {
        self.save()?;
        info!(streams = self.data.len(), "Station manager closed");
        Ok(())
    }

    pub fn data(&self) -> &StationData {
        &self.data
    }

    pub fn stream_limit(&self) -> u32 {
        self.data.quota.max_streams_per_player
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Submit a stream. Checks run in order and the first failure wins:
    /// permission, quota, name length, URL.
    pub fn add_stream(
        &mut self,
        request: AddStreamRequest,
        caps: &CapabilitySet,
    ) -> Result<StreamRecord, AddStreamError> {
        let can_verify = caps.has(Capability::Add);
        if !can_verify && !caps.has(Capability::AddPending) {
            return Err(AddStreamError::PermissionDenied);
        }

        let limit = self.data.quota.max_streams_per_player;
        if !caps.has(Capability::AddUnlimited)
            && self.data.owned_count(&request.owner.owner_id) >= limit as usize
        {
            return Err(AddStreamError::QuotaExceeded { limit });
        }

        let length = request.name.chars().count();
        if length > MAX_NAME_LEN {
            return Err(AddStreamError::NameTooLong { length });
        }

        let url = normalize_stream_url(&request.url)
            .ok_or_else(|| AddStreamError::InvalidUrl { url: request.url.clone() })?;

        let status = if request.requested_verified && can_verify {
            StreamStatus::Verified
        } else {
            StreamStatus::Pending
        };

        let record = StreamRecord {
            id: self.data.next_id(),
            name: request.name,
            url,
            status,
            owner: request.owner,
        };
        self.data.push(record.clone());

        info!(
            id = record.id,
            owner = %record.owner.owner_id,
            status = %record.status,
            "Stream added"
        );

        self.persist();
        self.republish();
        Ok(record)
    }

    /// Remove by id regardless of owner or status
    pub fn remove_stream(&mut self, id: u32) -> Option<StreamRecord> {
        self.remove_stream_in_scope(id, RemoveScope::any()).ok()
    }

    /// Remove by id only if `owner_id` owns the record
    pub fn remove_owned_stream(
        &mut self,
        id: u32,
        owner_id: &str,
    ) -> Result<StreamRecord, RemoveError> {
        self.remove_stream_in_scope(
            id,
            RemoveScope {
                owner_id: Some(owner_id),
                status: StatusFilter::Any,
            },
        )
    }

    /// Remove by id, refusing records outside `scope`
    pub fn remove_stream_in_scope(
        &mut self,
        id: u32,
        scope: RemoveScope<'_>,
    ) -> Result<StreamRecord, RemoveError> {
        let record = self.data.by_id(id).ok_or(RemoveError::NotFound)?;
        if let Some(owner_id) = scope.owner_id {
            if !record.is_owned_by(owner_id) {
                return Err(RemoveError::NotOwner);
            }
        }
        if !scope.status.matches(record.status) {
            return Err(RemoveError::StatusMismatch);
        }

        let removed = self.data.remove(id).ok_or(RemoveError::NotFound)?;
        info!(id, owner = %removed.owner.owner_id, "Stream removed");

        self.persist();
        self.republish();
        Ok(removed)
    }

    /// Mark a stream verified. No re-validation of name or URL.
    pub fn approve_stream(&mut self, id: u32) -> Option<StreamRecord> {
        let record = self.data.set_status(id, StreamStatus::Verified)?.clone();
        info!(id, "Stream approved");

        self.persist();
        self.republish();
        Some(record)
    }

    /// Remove every record matching `status`; returns how many were removed
    pub fn clear_streams(&mut self, status: StatusFilter) -> usize {
        let removed = self.data.clear(status);
        info!(removed, filter = ?status, "Streams cleared");

        self.persist();
        self.republish();
        removed
    }

    /// Change the per-player stream limit
    pub fn set_stream_limit(&mut self, limit: u32) {
        self.data.quota.max_streams_per_player = limit;
        info!(limit, "Stream limit changed");
        self.persist();
    }

    /// Replace the aggregate with a fresh default
    pub fn reset(&mut self) {
        self.data = StationData::with_quota(self.options.default_limit);
        warn!("Station data reset");

        self.persist();
        self.republish();
    }
}
