//! Storage backends for staffcard.
//!
//! A backend holds opaque text blobs addressed by key. The record store
//! serializes its whole collection into a single blob and is the only
//! component that talks to a backend.
//!
//! Two backends ship with the crate:
//!
//! - [`SqliteBackend`]: durable, file-based.
//! - [`MemoryBackend`]: process-local, with an optional size quota. Used by
//!   tests and for throwaway sessions.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// A key-addressed blob medium.
///
/// Implementations must make a `save` visible to every later `load` on the
/// same backend. They do not coordinate across processes; two writers to
/// the same key race and the last write wins.
pub trait Backend: Send + Sync + Debug {
    /// Short backend name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Read the blob stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    ///
    /// A failed save must leave the previous blob untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium rejects the write.
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Describe the blob stored under `key` without decoding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn describe(&self, key: &str) -> Result<Option<BlobInfo>> {
        Ok(self.load(key)?.map(|blob| BlobInfo {
            size_bytes: blob.len(),
            updated_at: None,
        }))
    }
}

/// Facts about a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobInfo {
    /// Size of the blob in bytes.
    pub size_bytes: usize,
    /// When the blob was last written, if the backend records it.
    pub updated_at: Option<DateTime<Utc>>,
}
