//! The record store.
//!
//! [`RecordStore`] owns the canonical list of employees. The list lives in
//! a [`Backend`] as one JSON array under a single key, and every write
//! replaces the whole array.
//!
//! Reads fail soft: an absent, unreadable or corrupt blob reads as an empty
//! list, and array entries that do not decode as a record are skipped
//! while the rest are kept. Writes do not: a write the backend rejects comes back as
//! [`Error::Persist`] and the previously stored list stays as it was.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::record::{generate_id, Employee, EmployeePatch, NewEmployee};
use crate::storage::{Backend, BlobInfo, MemoryBackend};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "ems_employees_v1";

/// How a read of the backing blob went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// A well-formed collection was stored (possibly empty).
    Present,
    /// Nothing is stored under the key.
    Absent,
    /// The array was read but some entries were not records; they were
    /// skipped and are dropped by the next write.
    Partial {
        /// Number of entries skipped.
        skipped: usize,
    },
    /// Something is stored but could not be read or decoded.
    Unreadable,
}

/// The collection as read from storage, with how the read went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Records in storage order. Empty when `state` is `Absent` or
    /// `Unreadable`.
    pub records: Vec<Employee>,
    /// Outcome of the read.
    pub state: SnapshotState,
}

impl Snapshot {
    fn with_state(state: SnapshotState) -> Self {
        Self {
            records: Vec::new(),
            state,
        }
    }

    /// Check whether storage could not be read in full.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.state,
            SnapshotState::Unreadable | SnapshotState::Partial { .. }
        )
    }
}

/// Persisted CRUD over the employee collection.
#[derive(Debug, Clone)]
pub struct RecordStore {
    backend: Arc<dyn Backend>,
    key: String,
}

impl RecordStore {
    /// Create a store over `backend` using [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Create a store over `backend` using a custom key.
    #[must_use]
    pub fn with_key(backend: Arc<dyn Backend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Create a store over a fresh [`MemoryBackend`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the backing medium.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read the collection and report how the read went.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let blob = match self.backend.load(&self.key) {
            Ok(Some(blob)) if !blob.trim().is_empty() => blob,
            Ok(_) => return Snapshot::with_state(SnapshotState::Absent),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read employee records");
                return Snapshot::with_state(SnapshotState::Unreadable);
            }
        };

        match serde_json::from_str::<Option<Vec<Value>>>(&blob) {
            Ok(Some(entries)) => self.decode_entries(entries),
            Ok(None) => Snapshot::with_state(SnapshotState::Absent),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored employee records are corrupt, reading as empty");
                Snapshot::with_state(SnapshotState::Unreadable)
            }
        }
    }

    fn decode_entries(&self, entries: Vec<Value>) -> Snapshot {
        let total = entries.len();
        let records: Vec<Employee> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(key = %self.key, index, error = %e, "Skipping unreadable employee record");
                    None
                }
            })
            .collect();

        let skipped = total - records.len();
        let state = if skipped == 0 {
            SnapshotState::Present
        } else {
            SnapshotState::Partial { skipped }
        };
        Snapshot { records, state }
    }

    /// All records in storage order, or an empty list if storage is absent
    /// or unreadable.
    #[must_use]
    pub fn get_all(&self) -> Vec<Employee> {
        self.snapshot().records
    }

    /// Number of stored records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.get_all().len()
    }

    /// Check whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.get_all().is_empty()
    }

    /// The first record with the given id, if any.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<Employee> {
        self.get_all().into_iter().find(|e| e.has_id(id))
    }

    /// Records whose name or position contains `term`, case-insensitively.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Employee> {
        self.get_all()
            .into_iter()
            .filter(|e| e.matches_term(term))
            .collect()
    }

    /// Create a record at the head of the list.
    ///
    /// Missing fields get their defaults and a missing id is generated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if the supplied id is already taken,
    /// or [`Error::Persist`] if the write did not take effect.
    pub fn add(&self, draft: NewEmployee) -> Result<Employee> {
        let mut records = self.get_all();

        if let Some(id) = draft.supplied_id() {
            if records.iter().any(|e| e.has_id(id)) {
                return Err(Error::DuplicateId { id: id.to_string() });
            }
        }

        let mut employee = draft.into_employee();
        while records.iter().any(|e| e.has_id(&employee.id)) {
            debug!(id = %employee.id, "Generated id already in use, regenerating");
            employee.id = generate_id();
        }

        records.insert(0, employee.clone());
        self.write(&records)?;

        info!(id = %employee.id, name = %employee.name, "Added employee");
        Ok(employee)
    }

    /// Merge `patch` onto the record with the given id.
    ///
    /// Returns `Ok(None)` without writing anything if no record matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the write did not take effect.
    pub fn update(&self, id: &str, patch: EmployeePatch) -> Result<Option<Employee>> {
        let mut records = self.get_all();
        let Some(employee) = records.iter_mut().find(|e| e.has_id(id)) else {
            debug!(id, "Update skipped, no such employee");
            return Ok(None);
        };

        patch.apply_to(employee);
        let updated = employee.clone();
        self.write(&records)?;

        info!(id, "Updated employee");
        Ok(Some(updated))
    }

    /// Remove every record with the given id and return the remaining list.
    ///
    /// The list is written back even when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the write did not take effect.
    pub fn remove(&self, id: &str) -> Result<Vec<Employee>> {
        let mut records = self.get_all();
        let before = records.len();
        records.retain(|e| !e.has_id(id));
        self.write(&records)?;

        let removed = before - records.len();
        if removed > 0 {
            info!(id, removed, "Removed employee");
        } else {
            debug!(id, "Remove matched nothing");
        }
        Ok(records)
    }

    /// Replace the whole collection with `records`, verbatim.
    ///
    /// No defaults are filled and nothing is validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the write did not take effect.
    pub fn init_from_list(&self, records: &[Employee]) -> Result<()> {
        self.write(records)?;
        info!(count = records.len(), "Initialized employee records");
        Ok(())
    }

    /// Facts about the stored blob, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn blob_info(&self) -> Result<Option<BlobInfo>> {
        self.backend.describe(&self.key)
    }

    fn write(&self, records: &[Employee]) -> Result<()> {
        let backend = self.backend.name();
        let result = serde_json::to_string(records)
            .map_err(|e| Error::persist(backend, format!("serialization failed: {e}")))
            .and_then(|blob| {
                self.backend.save(&self.key, &blob).map_err(|e| match e {
                    Error::Persist { .. } => e,
                    other => Error::persist(backend, other.to_string()),
                })
            });

        if let Err(e) = &result {
            error!(key = %self.key, backend, error = %e, "Failed to write employee records");
        }
        result
    }
}
