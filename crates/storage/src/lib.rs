#![forbid(unsafe_code)]

//! Persistence boundary for the practice engine: repository traits over two
//! opaque blobs (the progress map and the session history log), an in-memory
//! store, and a JSON-file backend.

pub mod json_file;
pub mod repository;

pub use json_file::{JsonFileInitError, JsonFileStore};
pub use repository::{
    InMemoryStore, ProgressRecord, ProgressRepository, SessionHistoryRepository, SessionRecord,
    Storage, StorageError, WordStatRecord,
};
