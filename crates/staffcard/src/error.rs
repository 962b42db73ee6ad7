//! Error types for staffcard.
//!
//! The store and seed layers degrade toward empty results wherever the
//! directory contract allows it. What remains here are the failures a
//! caller must be able to tell apart from "nothing to show".

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for staffcard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Writing the record collection to its backend failed.
    ///
    /// The previously persisted collection is left as it was.
    #[error("failed to persist records to {backend} backend: {message}")]
    Persist {
        /// Name of the backend that rejected the write.
        backend: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// A record with the same id already exists.
    #[error("an employee with id '{id}' already exists")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Seed Errors ===
    /// The seed request could not be sent or its body could not be read.
    #[error("seed request to {endpoint} failed: {message}")]
    SeedRequest {
        /// Endpoint that was queried.
        endpoint: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The seed endpoint answered with a non-success status.
    #[error("seed endpoint {endpoint} returned status {status}")]
    SeedStatus {
        /// Endpoint that was queried.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An operation timed out.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for staffcard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a persistence error for the named backend.
    #[must_use]
    pub fn persist(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Persist {
            backend,
            message: message.into(),
        }
    }

    /// Create a seed request error.
    #[must_use]
    pub fn seed_request(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SeedRequest {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Check if this error means a write did not take effect.
    #[must_use]
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }

    /// Check if this error came from the remote seed source.
    #[must_use]
    pub fn is_seed_failure(&self) -> bool {
        matches!(
            self,
            Self::SeedRequest { .. } | Self::SeedStatus { .. } | Self::Timeout { .. }
        )
    }
}
