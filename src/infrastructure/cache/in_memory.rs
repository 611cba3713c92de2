//! In-memory cache table using moka

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};

use crate::domain::cache::{CacheEntry, CacheStore};
use crate::domain::DomainError;

/// Configuration for the in-memory cache table
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of rows before moka starts evicting
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache rows held in a moka map
///
/// moka only bounds capacity here; expiry is decided by each row's
/// `expires_at`, exactly as for the database table.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    rows: MokaCache<String, CacheEntry>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self {
            rows: MokaCache::builder()
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    /// Removes every row whose key and entry satisfy the predicate
    async fn remove_where<F>(&self, predicate: F) -> Result<u64, DomainError>
    where
        F: Fn(&str, &CacheEntry) -> bool + Send + 'static,
    {
        self.rows.run_pending_tasks().await;

        let rows = self.rows.clone();
        let keys: Vec<String> = tokio::task::spawn_blocking(move || {
            rows.iter()
                .filter(|(key, entry)| predicate(key.as_str(), entry))
                .map(|(key, _)| key.to_string())
                .collect()
        })
        .await
        .map_err(|e| DomainError::cache(format!("Failed to scan cache rows: {}", e)))?;

        let mut removed = 0;
        for key in keys {
            if self.rows.remove(&key).await.is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.rows.get(key).await)
    }

    async fn upsert(&self, entry: CacheEntry) -> Result<(), DomainError> {
        self.rows.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.rows.remove(key).await.is_some())
    }

    async fn remove_if_expired(&self, key: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = self
            .rows
            .entry(key.to_string())
            .and_compute_with(|row| {
                let op = match row {
                    Some(row) if row.value().is_expired_at(now) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        Ok(matches!(result, CompResult::Removed(_)))
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<u64, DomainError> {
        let prefix = prefix.to_string();
        self.remove_where(move |key, _| key.starts_with(&prefix))
            .await
    }

    async fn remove_all(&self) -> Result<u64, DomainError> {
        self.rows.run_pending_tasks().await;
        let removed = self.rows.entry_count();

        self.rows.invalidate_all();
        self.rows.run_pending_tasks().await;

        Ok(removed)
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.remove_where(move |_, entry| entry.is_expired_at(now))
            .await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.rows.run_pending_tasks().await;
        Ok(self.rows.entry_count() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn entry(key: &str, ttl: i64, now: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(key, json!({ "key": key }), ttl, now)
    }

    #[tokio::test]
    async fn test_upsert_and_fetch() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();

        store.upsert(entry("a", 60, now)).await.unwrap();

        let fetched = store.fetch("a").await.unwrap().unwrap();
        assert_eq!(fetched.value, json!({ "key": "a" }));
        assert!(store.fetch("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_value_and_expiry() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();

        store.upsert(entry("a", 60, now)).await.unwrap();
        store
            .upsert(CacheEntry::new("a", json!(2), 120, now))
            .await
            .unwrap();

        let fetched = store.fetch("a").await.unwrap().unwrap();
        assert_eq!(fetched.value, json!(2));
        assert_eq!(fetched.expires_at, now + Duration::seconds(120));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryCacheStore::new();
        store.upsert(entry("a", 60, Utc::now())).await.unwrap();

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_if_expired_spares_rewritten_row() {
        let store = InMemoryCacheStore::new();
        let read_at = Utc::now();

        store.upsert(entry("k", -10, read_at)).await.unwrap();
        store.upsert(entry("k", 60, read_at)).await.unwrap();

        assert!(!store.remove_if_expired("k", read_at).await.unwrap());
        assert!(store.fetch("k").await.unwrap().is_some());

        store.upsert(entry("k", -10, read_at)).await.unwrap();
        assert!(store.remove_if_expired("k", read_at).await.unwrap());
        assert!(store.fetch("k").await.unwrap().is_none());
        assert!(!store.remove_if_expired("missing", read_at).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_expired_keeps_live_rows() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();

        store.upsert(entry("old", -10, now)).await.unwrap();
        store.upsert(entry("zero", 0, now)).await.unwrap();
        store.upsert(entry("live", 60, now)).await.unwrap();

        let removed = store.remove_expired(now).await.unwrap();

        assert_eq!(removed, 2);
        assert!(store.fetch("live").await.unwrap().is_some());
        assert!(store.fetch("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_prefix() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();

        store.upsert(entry("resources_d1_1", 60, now)).await.unwrap();
        store.upsert(entry("resources_d1_2", 60, now)).await.unwrap();
        store.upsert(entry("resources_d2_1", 60, now)).await.unwrap();

        assert_eq!(store.remove_prefix("resources_d1_").await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_all() {
        let store = InMemoryCacheStore::new();
        let now = Utc::now();

        store.upsert(entry("a", 60, now)).await.unwrap();
        store.upsert(entry("b", 60, now)).await.unwrap();

        assert_eq!(store.remove_all().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
