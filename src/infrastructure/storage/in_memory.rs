//! In-memory record storage

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Record, Storage};
use crate::domain::DomainError;

/// Thread-safe in-memory storage
///
/// Used for development and tests. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<R>
where
    R: Record,
{
    records: RwLock<HashMap<String, R>>,
}

impl<R> Default for InMemoryStorage<R>
where
    R: Record,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryStorage<R>
where
    R: Record,
{
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Creates storage pre-populated with records
    pub fn with_records(records: Vec<R>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();

        Self {
            records: RwLock::new(map),
        }
    }
}

#[async_trait]
impl<R> Storage<R> for InMemoryStorage<R>
where
    R: Record + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut list: Vec<R> = records.values().cloned().collect();
        list.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        Ok(list)
    }

    async fn insert(&self, record: R) -> Result<R, DomainError> {
        let id = record.id().to_string();
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if records.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Record with id '{}' already exists in {}",
                id,
                R::COLLECTION
            )));
        }

        records.insert(id, record.clone());
        Ok(record)
    }

    async fn replace(&self, record: R) -> Result<R, DomainError> {
        let id = record.id().to_string();
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if !records.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Record with id '{}' not found in {}",
                id,
                R::COLLECTION
            )));
        }

        records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(records.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::fixtures::Note;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_insert_and_get() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();
        let note = Note::new("1", "Flooding on 5th");

        storage.insert(note.clone()).await.unwrap();

        assert_eq!(storage.get("1").await.unwrap(), Some(note));
        assert_eq!(storage.get("2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();

        storage.insert(Note::new("1", "a")).await.unwrap();
        let result = storage.insert(Note::new("1", "b")).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_replace() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();
        storage.insert(Note::new("1", "a")).await.unwrap();

        storage.replace(Note::new("1", "updated")).await.unwrap();

        assert_eq!(storage.get("1").await.unwrap().unwrap().text, "updated");
    }

    #[tokio::test]
    async fn test_replace_not_found() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();

        let result = storage.replace(Note::new("1", "a")).await;

        assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();
        storage.insert(Note::new("1", "a")).await.unwrap();

        assert!(storage.delete("1").await.unwrap());
        assert!(!storage.delete("1").await.unwrap());
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_oldest_first() {
        let now = Utc::now();
        let mut newest = Note::new("a", "newest");
        newest.created_at = now;
        let mut oldest = Note::new("b", "oldest");
        oldest.created_at = now - Duration::hours(2);
        let mut middle = Note::new("c", "middle");
        middle.created_at = now - Duration::hours(1);

        let storage = InMemoryStorage::with_records(vec![newest, oldest, middle]);

        let texts: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(texts, vec!["oldest", "middle", "newest"]);
    }

    #[tokio::test]
    async fn test_find() {
        let storage = InMemoryStorage::with_records(vec![
            Note::new("1", "flood"),
            Note::new("2", "fire"),
            Note::new("3", "flood warning"),
        ]);

        let floods = storage
            .find(&|n: &Note| n.text.contains("flood"))
            .await
            .unwrap();

        assert_eq!(floods.len(), 2);
    }

    #[tokio::test]
    async fn test_ping() {
        let storage: InMemoryStorage<Note> = InMemoryStorage::new();
        assert!(storage.ping().await.is_ok());
    }
}
