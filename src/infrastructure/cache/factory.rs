//! Cache factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::cache::{CacheStore, DEFAULT_TTL_SECONDS};
use crate::domain::DomainError;

use super::in_memory::{InMemoryCacheConfig, InMemoryCacheStore};
use super::postgres::PostgresCacheStore;

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// moka map, lost on restart
    #[default]
    InMemory,
    /// `cache` table in PostgreSQL
    Postgres,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::InMemory => write!(f, "in_memory"),
            CacheBackend::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheBackend::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(CacheBackend::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Configuration for the cache factory
#[derive(Debug, Clone)]
pub struct CacheStoreConfig {
    pub backend: CacheBackend,
    /// TTL used by `set` when none is given
    pub default_ttl_secs: i64,
    /// Capacity bound for the in-memory backend
    pub max_capacity: u64,
}

impl Default for CacheStoreConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::InMemory,
            default_ttl_secs: DEFAULT_TTL_SECONDS,
            max_capacity: 10_000,
        }
    }
}

impl CacheStoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn postgres() -> Self {
        Self {
            backend: CacheBackend::Postgres,
            ..Default::default()
        }
    }

    pub fn with_default_ttl(mut self, ttl_secs: i64) -> Self {
        self.default_ttl_secs = ttl_secs;
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Factory for cache stores
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates the configured store; the postgres backend needs a pool
    pub fn create(
        config: &CacheStoreConfig,
        pool: Option<&PgPool>,
    ) -> Result<Arc<dyn CacheStore>, DomainError> {
        match config.backend {
            CacheBackend::InMemory => Ok(Self::create_in_memory(config.max_capacity)),
            CacheBackend::Postgres => {
                let pool = pool.ok_or_else(|| {
                    DomainError::configuration(
                        "A database connection is required for the postgres cache backend",
                    )
                })?;

                Ok(Arc::new(PostgresCacheStore::new(pool.clone())))
            }
        }
    }

    pub fn create_in_memory(max_capacity: u64) -> Arc<dyn CacheStore> {
        let config = InMemoryCacheConfig::default().with_max_capacity(max_capacity);
        Arc::new(InMemoryCacheStore::with_config(config))
    }
}
