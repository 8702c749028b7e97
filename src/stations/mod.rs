//! Station registry: records, the persisted aggregate, and the manager that
//! mutates it.

mod error;
mod manager;
mod record;
mod store;
mod url;

pub mod station_dst;

pub use error::{AddStreamError, RemoveError};
pub use manager::{
    AddStreamRequest, ManagerOptions, RemoveScope, StationManager, DEFAULT_DATA_KEY,
};
pub use record::{
    OwnerInfo, QuotaConfig, StatusFilter, StreamRecord, StreamStatus,
    DEFAULT_MAX_STREAMS_PER_PLAYER, MAX_NAME_LEN,
};
pub use station_dst::{
    run_station_batch, summarize_station_batch, StationDSTConfig, StationDSTHarness,
    StationDSTResult, StationOp,
};
pub use store::StationData;
pub use url::normalize_stream_url;
