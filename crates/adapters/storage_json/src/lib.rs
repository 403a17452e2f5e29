//! # lighthub-adapter-storage-json
//!
//! Persists the hub's runtime data (routes, schedules, option values) as a
//! single JSON document on disk.
//!
//! ## Responsibilities
//! - Implement the `DataStorage` port defined in `lighthub-app::ports::storage`
//! - Degrade to empty runtime data when the file is missing or unreadable
//! - Replace the file atomically on save (write to a sibling, then rename)
//!
//! ## Dependency rule
//! Depends on `lighthub-app` (for port traits) and `lighthub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod file;

pub use error::StorageError;
pub use file::JsonFileStorage;
