//! Remote seed sources for bootstrapping an empty directory.
//!
//! A [`SeedSource`] produces a batch of records once, when the store is
//! empty at startup. The HTTP implementation talks to a synthetic-person
//! generator; [`StaticSeedSource`] serves a fixed batch (tests, offline
//! imports).
//!
//! Seeding is best effort. [`SeedSource::fetch_seed`] never fails: any
//! error is logged and reads as "no seed data".

mod faker;
mod mapping;

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::record::Employee;

pub use faker::FakerSeedSource;
pub use mapping::{map_payload, map_person, POSITION_CATALOG};

/// A one-shot provider of bootstrap records.
#[async_trait]
pub trait SeedSource: Send + Sync + Debug {
    /// Short source name for logs.
    fn name(&self) -> &'static str;

    /// Fetch up to `count` records, reporting why if it fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or its answer
    /// cannot be decoded.
    async fn try_fetch_seed(&self, count: usize) -> Result<Vec<Employee>>;

    /// Fetch up to `count` records, or none if anything goes wrong.
    async fn fetch_seed(&self, count: usize) -> Vec<Employee> {
        match self.try_fetch_seed(count).await {
            Ok(records) => records,
            Err(e) => {
                warn!(source = self.name(), error = %e, "Seed fetch failed, continuing without seed data");
                Vec::new()
            }
        }
    }
}

/// A seed source that always returns the same records.
///
/// The count is ignored; the whole batch is returned as given.
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    records: Vec<Employee>,
}

impl StaticSeedSource {
    /// Serve `records` as the seed.
    #[must_use]
    pub fn new(records: Vec<Employee>) -> Self {
        Self { records }
    }

    /// Serve the records a generator payload maps to.
    #[must_use]
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        Self::new(map_payload(payload))
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn try_fetch_seed(&self, _count: usize) -> Result<Vec<Employee>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;

    #[derive(Debug)]
    struct BrokenSource;

    #[async_trait]
    impl SeedSource for BrokenSource {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn try_fetch_seed(&self, _count: usize) -> Result<Vec<Employee>> {
            Err(Error::seed_request("http://broken", "connection refused"))
        }
    }

    #[tokio::test]
    async fn test_fetch_seed_swallows_errors() {
        let source = BrokenSource;
        assert!(source.try_fetch_seed(5).await.is_err());
        assert!(source.fetch_seed(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_static_source_returns_batch() {
        let records = vec![Employee::new("1", "Ann"), Employee::new("2", "Bo")];
        let source = StaticSeedSource::new(records.clone());

        assert_eq!(source.fetch_seed(20).await, records);
        assert_eq!(source.name(), "static");
    }

    #[tokio::test]
    async fn test_static_source_from_payload() {
        let payload = json!({"data": [{"uuid": "u1", "firstname": "Ann"}]});
        let source = StaticSeedSource::from_payload(&payload);

        let records = source.fetch_seed(1).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "u1");
    }
}
