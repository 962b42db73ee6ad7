//! `staffcard` - Employee directory and digital business card store
//!
//! This library keeps a persisted collection of employee records, seeds an
//! empty collection from a remote person generator, and renders each
//! employee as a shareable business card.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod card;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod record;
pub mod seed;
pub mod storage;
pub mod store;

pub use card::CardRenderer;
pub use config::Config;
pub use directory::{BootstrapOutcome, Directory};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Employee, EmployeePatch, NewEmployee};
pub use seed::{FakerSeedSource, SeedSource, StaticSeedSource};
pub use storage::{Backend, MemoryBackend, SqliteBackend};
pub use store::{RecordStore, Snapshot, SnapshotState};
