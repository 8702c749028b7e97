//! Persistence for the station aggregate.

mod object_store;

pub use object_store::{InMemoryObjectStore, LocalFsObjectStore, ObjectStore, StorageError};
