//! PostgreSQL record storage with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::storage::{Record, Storage};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/disaster_response".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Opens a connection pool shared by record storage and the cache table
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Records stored as JSONB in an `(id, data, created_at)` table named
/// after the record's collection
pub struct PostgresStorage<R>
where
    R: Record,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<R>,
}

impl<R> Debug for PostgresStorage<R>
where
    R: Record,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<R> PostgresStorage<R>
where
    R: Record,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: R::COLLECTION.to_string(),
            _phantom: PhantomData,
        }
    }

    fn decode(data: serde_json::Value) -> Result<R, DomainError> {
        serde_json::from_value(data).map_err(|e| {
            DomainError::storage(format!("Failed to deserialize {} record: {}", R::COLLECTION, e))
        })
    }

    fn encode(record: &R) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(record).map_err(|e| {
            DomainError::storage(format!("Failed to serialize {} record: {}", R::COLLECTION, e))
        })
    }
}

#[async_trait]
impl<R> Storage<R> for PostgresStorage<R>
where
    R: Record + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<R>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get record: {}", e)))?;

        row.map(|row| Self::decode(row.get("data"))).transpose()
    }

    async fn list(&self) -> Result<Vec<R>, DomainError> {
        let query = format!(
            "SELECT data FROM {} ORDER BY created_at, id",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list records: {}", e)))?;

        rows.into_iter()
            .map(|row| Self::decode(row.get("data")))
            .collect()
    }

    async fn insert(&self, record: R) -> Result<R, DomainError> {
        let id = record.id().to_string();
        let data = Self::encode(&record)?;

        let query = format!(
            "INSERT INTO {} (id, data, created_at) VALUES ($1, $2, $3)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(&id)
            .bind(&data)
            .bind(record.created_at())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    DomainError::conflict(format!("Record with id '{}' already exists", id))
                } else {
                    DomainError::storage(format!("Failed to insert record: {}", e))
                }
            })?;

        Ok(record)
    }

    async fn replace(&self, record: R) -> Result<R, DomainError> {
        let id = record.id().to_string();
        let data = Self::encode(&record)?;

        let query = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE id = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update record: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Record with id '{}' not found",
                id
            )));
        }

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete record: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) FROM {}", self.table_name);

        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count records: {}", e)))?;

        Ok(count as usize)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.idle_timeout_secs, 600);
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://localhost/test")
            .with_max_connections(20)
            .with_min_connections(5)
            .with_connect_timeout(60);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.connect_timeout_secs, 60);
    }
}
