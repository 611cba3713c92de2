//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::storage::{Record, Storage};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::PostgresStorage;

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// In-memory storage (development and tests)
    #[default]
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "in_memory"),
            StorageBackend::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Factory for record storage
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates storage for `R`; the postgres backend needs a pool
    pub fn create<R>(
        backend: StorageBackend,
        pool: Option<&PgPool>,
    ) -> Result<Arc<dyn Storage<R>>, DomainError>
    where
        R: Record + 'static,
    {
        match backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryStorage::<R>::new())),
            StorageBackend::Postgres => {
                let pool = pool.ok_or_else(|| {
                    DomainError::configuration(format!(
                        "A database connection is required to store {}",
                        R::COLLECTION
                    ))
                })?;

                Ok(Arc::new(PostgresStorage::<R>::new(pool.clone())))
            }
        }
    }

    /// Creates in-memory storage seeded with records
    pub fn create_seeded<R>(records: Vec<R>) -> Arc<dyn Storage<R>>
    where
        R: Record + 'static,
    {
        Arc::new(InMemoryStorage::with_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::fixtures::Note;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::InMemory);
        assert_eq!("in-memory".parse::<StorageBackend>().unwrap(), StorageBackend::InMemory);
        assert_eq!("postgresql".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("pg".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let storage = StorageFactory::create::<Note>(StorageBackend::InMemory, None).unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[test]
    fn test_postgres_requires_pool() {
        let result = StorageFactory::create::<Note>(StorageBackend::Postgres, None);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_create_seeded() {
        let storage = StorageFactory::create_seeded(vec![Note::new("1", "a"), Note::new("2", "b")]);
        assert_eq!(storage.count().await.unwrap(), 2);
    }
}
