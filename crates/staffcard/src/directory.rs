//! The directory boundary consumed by user interfaces.
//!
//! [`Directory`] bundles the record store, an optional seed source and the
//! card renderer behind the operation set a UI needs. Reads never fail;
//! not-found is `None`; writes report persistence failures as errors.
//!
//! Bootstrap is the one asynchronous operation. The view that starts it
//! hands in a [`CancellationToken`] and cancels it when it goes away, so a
//! seed that arrives late is dropped instead of written.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::card::CardRenderer;
use crate::error::Result;
use crate::record::{Employee, EmployeePatch, NewEmployee};
use crate::seed::SeedSource;
use crate::store::RecordStore;

/// How a bootstrap attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The store already held this many records; nothing was fetched.
    AlreadyPopulated(usize),
    /// This many seed records were written.
    Seeded(usize),
    /// No source is configured or it produced nothing; the store stays empty.
    SourceEmpty,
    /// The requesting view went away before the seed could be applied.
    Abandoned,
}

impl BootstrapOutcome {
    /// Number of records written by this bootstrap.
    #[must_use]
    pub fn seeded_count(&self) -> usize {
        match self {
            Self::Seeded(n) => *n,
            _ => 0,
        }
    }
}

/// Employee directory operations.
#[derive(Debug, Clone)]
pub struct Directory {
    store: RecordStore,
    seed_source: Option<Arc<dyn SeedSource>>,
    cards: CardRenderer,
}

impl Directory {
    /// Create a directory over `store` with no seed source.
    #[must_use]
    pub fn new(store: RecordStore, cards: CardRenderer) -> Self {
        Self {
            store,
            seed_source: None,
            cards,
        }
    }

    /// Attach the source used to bootstrap an empty store.
    #[must_use]
    pub fn with_seed_source(mut self, source: Arc<dyn SeedSource>) -> Self {
        self.seed_source = Some(source);
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// All employees, most recently added first.
    #[must_use]
    pub fn list(&self) -> Vec<Employee> {
        self.store.get_all()
    }

    /// One employee by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Employee> {
        self.store.get_by_id(id)
    }

    /// Employees whose name or position contains `term`.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Employee> {
        self.store.search(term)
    }

    /// Create an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the write did not take effect.
    pub fn create(&self, fields: NewEmployee) -> Result<Employee> {
        self.store.add(fields)
    }

    /// Patch an employee; `Ok(None)` if there is no such id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not take effect.
    pub fn patch(&self, id: &str, fields: EmployeePatch) -> Result<Option<Employee>> {
        self.store.update(id, fields)
    }

    /// Delete an employee and return who is left.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not take effect.
    pub fn delete(&self, id: &str) -> Result<Vec<Employee>> {
        self.store.remove(id)
    }

    /// The employee's vCard, if the employee exists.
    #[must_use]
    pub fn card(&self, id: &str) -> Option<String> {
        self.get(id).map(|employee| self.cards.vcard(&employee))
    }

    /// The employee's public profile link, if the employee exists.
    #[must_use]
    pub fn profile_url(&self, id: &str) -> Option<String> {
        self.get(id).map(|employee| self.cards.profile_url(&employee.id))
    }

    /// Seed the store from the seed source if it holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed could not be written.
    pub async fn seed_if_empty(
        &self,
        count: usize,
        guard: &CancellationToken,
    ) -> Result<BootstrapOutcome> {
        let existing = self.store.count();
        if existing > 0 {
            debug!(existing, "Directory already populated, skipping seed");
            return Ok(BootstrapOutcome::AlreadyPopulated(existing));
        }
        self.seed(count, guard, false).await
    }

    /// Replace the store's contents with a fresh seed, populated or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed could not be written.
    pub async fn reseed(&self, count: usize, guard: &CancellationToken) -> Result<BootstrapOutcome> {
        self.seed(count, guard, true).await
    }

    async fn seed(
        &self,
        count: usize,
        guard: &CancellationToken,
        overwrite: bool,
    ) -> Result<BootstrapOutcome> {
        let Some(source) = &self.seed_source else {
            debug!("No seed source configured");
            return Ok(BootstrapOutcome::SourceEmpty);
        };

        let records = tokio::select! {
            biased;
            () = guard.cancelled() => {
                info!(source = source.name(), "Seed fetch abandoned");
                return Ok(BootstrapOutcome::Abandoned);
            }
            records = source.fetch_seed(count) => records,
        };

        if guard.is_cancelled() {
            info!(source = source.name(), "Seed arrived after its view closed, dropping it");
            return Ok(BootstrapOutcome::Abandoned);
        }

        if records.is_empty() {
            info!(source = source.name(), "Seed source returned no records");
            return Ok(BootstrapOutcome::SourceEmpty);
        }

        if !overwrite {
            // Someone may have written while the fetch was in flight.
            let existing = self.store.count();
            if existing > 0 {
                debug!(existing, "Directory populated during seed fetch, keeping it");
                return Ok(BootstrapOutcome::AlreadyPopulated(existing));
            }
        }

        self.store.init_from_list(&records)?;
        info!(source = source.name(), count = records.len(), "Seeded directory");
        Ok(BootstrapOutcome::Seeded(records.len()))
    }
}
