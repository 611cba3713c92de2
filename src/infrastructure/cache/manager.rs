//! TTL cache manager over a persistent cache table
//!
//! Reads fail open and writes fail soft: a broken backing store degrades to
//! cache misses and unsuccessful writes, never to errors for the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::cache::{
    CacheEntry, CacheLookup, CacheOutcome, CachePolicy, CacheStore, DEFAULT_TTL_SECONDS,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_cleanup, record_cache_lookup, record_cache_write,
};

/// Snapshot for the admin surface
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CacheStats {
    pub backend: String,
    /// `None` when the backing store could not be counted
    pub entries: Option<usize>,
    pub default_ttl_secs: i64,
}

/// String-keyed cache with per-entry TTL
#[derive(Debug)]
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    default_ttl_secs: i64,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            default_ttl_secs: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn with_default_ttl(mut self, ttl_secs: i64) -> Self {
        self.default_ttl_secs = ttl_secs;
        self
    }

    pub fn default_ttl_secs(&self) -> i64 {
        self.default_ttl_secs
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Reads a key, reporting why a value is absent
    ///
    /// Expired rows are deleted on the way out. A stored value that no
    /// longer decodes into `T` counts as a miss.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let lookup = self.lookup_inner(key).await;
        record_cache_lookup(lookup.outcome_label());
        lookup
    }

    async fn lookup_inner<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let entry = match self.store.fetch(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return CacheLookup::Unavailable(e.to_string());
            }
        };

        let now = Utc::now();
        if entry.is_expired_at(now) {
            debug!(key = %key, expires_at = %entry.expires_at, "Cache entry expired");
            if let Err(e) = self.store.remove_if_expired(key, now).await {
                warn!(key = %key, error = %e, "Failed to delete expired cache entry");
            }
            return CacheLookup::Miss;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => CacheLookup::Hit(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached value has an unexpected shape");
                CacheLookup::Miss
            }
        }
    }

    /// Value for `key`, or `None` when absent, expired or unreadable
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).await.into_option()
    }

    /// Stores a value with the default TTL
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        self.set_with_ttl(key, value, self.default_ttl_secs).await
    }

    /// Stores a value that expires `ttl_secs` from now
    ///
    /// A TTL of zero or less writes an entry that reads as absent.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: i64,
    ) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize cache value");
                record_cache_write(false);
                return false;
            }
        };

        let entry = CacheEntry::new(key, value, ttl_secs, Utc::now());

        match self.store.upsert(entry).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs, "Cache entry stored");
                record_cache_write(true);
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache write failed");
                record_cache_write(false);
                false
            }
        }
    }

    /// Removes a key; removing an absent key succeeds
    pub async fn delete(&self, key: &str) -> bool {
        match self.store.remove(key).await {
            Ok(removed) => {
                debug!(key = %key, removed, "Cache entry deleted");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache delete failed");
                false
            }
        }
    }

    /// Removes every key starting with `prefix`
    pub async fn delete_prefix(&self, prefix: &str) -> bool {
        match self.store.remove_prefix(prefix).await {
            Ok(removed) => {
                debug!(prefix = %prefix, removed, "Cache prefix invalidated");
                true
            }
            Err(e) => {
                warn!(prefix = %prefix, error = %e, "Cache prefix delete failed");
                false
            }
        }
    }

    /// Removes every entry
    pub async fn clear(&self) -> bool {
        self.clear_count().await.is_some()
    }

    /// Removes every entry, returning how many were removed
    pub async fn clear_count(&self) -> Option<u64> {
        match self.store.remove_all().await {
            Ok(removed) => {
                info!(removed, "Cache cleared");
                Some(removed)
            }
            Err(e) => {
                warn!(error = %e, "Cache clear failed");
                None
            }
        }
    }

    /// Removes every expired entry, leaving live ones untouched
    pub async fn cleanup(&self) -> bool {
        self.cleanup_count().await.is_some()
    }

    /// Removes every expired entry, returning how many were removed
    pub async fn cleanup_count(&self) -> Option<u64> {
        match self.store.remove_expired(Utc::now()).await {
            Ok(removed) => {
                info!(removed, "Expired cache entries cleaned up");
                record_cache_cleanup(removed);
                Some(removed)
            }
            Err(e) => {
                warn!(error = %e, "Cache cleanup failed");
                None
            }
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = match self.store.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "Failed to count cache entries");
                None
            }
        };

        CacheStats {
            backend: self.store.backend_name().to_string(),
            entries,
            default_ttl_secs: self.default_ttl_secs,
        }
    }

    /// Cached computation: return a live entry, or compute and store
    ///
    /// With `bypass_read` the read is skipped but the result is still
    /// written. Errors from `compute` propagate and nothing is stored.
    pub async fn fetch_through<T, F, Fut>(
        &self,
        key: &str,
        policy: CachePolicy,
        compute: F,
    ) -> Result<(T, CacheOutcome), DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let outcome = if policy.bypass_read {
            CacheOutcome::Bypassed
        } else if let Some(cached) = self.get::<T>(key).await {
            debug!(key = %key, "Serving cached value");
            return Ok((cached, CacheOutcome::Hit));
        } else {
            CacheOutcome::Miss
        };

        let value = compute().await?;
        self.set_with_ttl(key, &value, policy.ttl_seconds).await;

        Ok((value, outcome))
    }

    /// Like `fetch_through`, but a `None` result is not stored
    pub async fn fetch_through_optional<T, F, Fut>(
        &self,
        key: &str,
        policy: CachePolicy,
        compute: F,
    ) -> Result<(Option<T>, CacheOutcome), DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, DomainError>>,
    {
        let outcome = if policy.bypass_read {
            CacheOutcome::Bypassed
        } else if let Some(cached) = self.get::<T>(key).await {
            return Ok((Some(cached), CacheOutcome::Hit));
        } else {
            CacheOutcome::Miss
        };

        let value = compute().await?;
        if let Some(value) = &value {
            self.set_with_ttl(key, value, policy.ttl_seconds).await;
        }

        Ok((value, outcome))
    }

    /// Runs `cleanup` every `interval` until the task is aborted
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        info!(interval_secs = interval.as_secs(), "Starting cache sweeper");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.cleanup().await;
            }
        })
    }
}
