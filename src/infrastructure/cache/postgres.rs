//! PostgreSQL cache table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::domain::cache::{CacheEntry, CacheStore};
use crate::domain::DomainError;

/// Default cache table name
pub const CACHE_TABLE: &str = "cache";

/// Cache rows in a `(key, value, expires_at)` table
///
/// The table itself is created by the storage migrations.
#[derive(Debug, Clone)]
pub struct PostgresCacheStore {
    pool: PgPool,
    table_name: String,
}

impl PostgresCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_table(pool, CACHE_TABLE)
    }

    pub fn with_table(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl CacheStore for PostgresCacheStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let query = format!(
            "SELECT key, value, expires_at FROM {} WHERE key = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read cache row: {}", e)))?;

        Ok(row.map(|row| CacheEntry {
            key: row.get("key"),
            value: row.get("value"),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn upsert(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (key, value, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(&entry.key)
            .bind(&entry.value)
            .bind(entry.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write cache row: {}", e)))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE key = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete cache row: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_if_expired(&self, key: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let query = format!(
            "DELETE FROM {} WHERE key = $1 AND expires_at <= $2",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(key)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete cache row: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<u64, DomainError> {
        // Compared with left() rather than LIKE, since keys contain '_'
        let query = format!(
            "DELETE FROM {} WHERE left(key, char_length($1)) = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(prefix)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete cache prefix: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    async fn remove_all(&self) -> Result<u64, DomainError> {
        let query = format!("DELETE FROM {}", self.table_name);

        let result = sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear cache: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = format!("DELETE FROM {} WHERE expires_at <= $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete expired cache rows: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) FROM {}", self.table_name);

        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count cache rows: {}", e)))?;

        Ok(count as usize)
    }
}
