//! Cache backing-store trait

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entry::CacheEntry;
use crate::domain::DomainError;

/// Persistent key/value table behind the cache
///
/// Implementations must make `upsert` and the delete operations atomic per
/// key; concurrent writers to one key resolve as last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Short backend identifier used in stats and logs
    fn backend_name(&self) -> &'static str;

    /// Point lookup, expired rows included
    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Insert or replace the row for `entry.key`
    async fn upsert(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Delete by key, returns true if a row was removed
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// Delete the row for `key` only if it is expired at `now`
    ///
    /// A fresh row written after an expired read is left in place.
    async fn remove_if_expired(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Delete every row whose key starts with `prefix`
    async fn remove_prefix(&self, prefix: &str) -> Result<u64, DomainError>;

    /// Delete every row
    async fn remove_all(&self) -> Result<u64, DomainError>;

    /// Delete every row that is expired at `now`
    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Number of rows, expired rows included
    async fn count(&self) -> Result<usize, DomainError>;
}
