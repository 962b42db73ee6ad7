use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{Backend, BlobInfo};
use crate::error::{Error, Result};

/// In-memory blob backend.
///
/// Clones share the same underlying map, so two handles behave like two
/// views onto one storage area. An optional quota rejects any blob larger
/// than the given number of bytes, the way browser storage does once it is
/// full.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: Arc<Mutex<HashMap<String, (String, DateTime<Utc>)>>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    /// Create an empty backend with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that rejects blobs over `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Store a raw blob without going through a record store.
    ///
    /// Useful for simulating content written by another writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    pub fn put_raw(&self, key: &str, blob: &str) -> Result<()> {
        self.lock()?
            .insert(key.to_string(), (blob.to_string(), Utc::now()));
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, (String, DateTime<Utc>)>>> {
        self.blobs
            .lock()
            .map_err(|_| Error::internal("memory backend lock poisoned"))
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).map(|(blob, _)| blob.clone()))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            if blob.len() > quota {
                return Err(Error::persist(
                    self.name(),
                    format!("quota exceeded: {} bytes > {quota} bytes", blob.len()),
                ));
            }
        }
        self.put_raw(key, blob)
    }

    fn describe(&self, key: &str) -> Result<Option<BlobInfo>> {
        Ok(self.lock()?.get(key).map(|(blob, updated_at)| BlobInfo {
            size_bytes: blob.len(),
            updated_at: Some(*updated_at),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key() {
        let backend = MemoryBackend::new();
        assert!(backend.load("nothing").unwrap().is_none());
        assert!(backend.describe("nothing").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let backend = MemoryBackend::new();
        backend.save("k", "[]").unwrap();
        assert_eq!(backend.load("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_overwrites() {
        let backend = MemoryBackend::new();
        backend.save("k", "first").unwrap();
        backend.save("k", "second").unwrap();
        assert_eq!(backend.load("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_keys_are_independent() {
        let backend = MemoryBackend::new();
        backend.save("a", "1").unwrap();
        backend.save("b", "2").unwrap();
        assert_eq!(backend.load("a").unwrap().as_deref(), Some("1"));
        assert_eq!(backend.load("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_clones_share_storage() {
        let first = MemoryBackend::new();
        let second = first.clone();

        first.save("k", "from first").unwrap();
        assert_eq!(second.load("k").unwrap().as_deref(), Some("from first"));
    }

    #[test]
    fn test_quota_rejects_large_blob_and_keeps_previous() {
        let backend = MemoryBackend::with_quota(4);
        backend.save("k", "ok").unwrap();

        let err = backend.save("k", "too large").unwrap_err();
        assert!(err.is_persist_failure());
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(backend.load("k").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn test_put_raw_bypasses_quota() {
        let backend = MemoryBackend::with_quota(1);
        backend.put_raw("k", "not json at all").unwrap();
        assert_eq!(
            backend.load("k").unwrap().as_deref(),
            Some("not json at all")
        );
    }

    #[test]
    fn test_describe_reports_size() {
        let backend = MemoryBackend::new();
        backend.save("k", "12345").unwrap();

        let info = backend.describe("k").unwrap().unwrap();
        assert_eq!(info.size_bytes, 5);
        assert!(info.updated_at.is_some());
    }
}
