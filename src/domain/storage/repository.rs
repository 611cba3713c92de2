//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::record::Record;

/// Generic record storage used by the CRUD layer
#[async_trait]
pub trait Storage<R>: Send + Sync + Debug
where
    R: Record + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<R>, DomainError>;

    /// All records, oldest first
    async fn list(&self) -> Result<Vec<R>, DomainError>;

    /// Inserts a new record, conflict if the id is taken
    async fn insert(&self, record: R) -> Result<R, DomainError>;

    /// Replaces an existing record, not found if the id is unknown
    async fn replace(&self, record: R) -> Result<R, DomainError>;

    /// Returns true if a record was removed
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }

    /// Records matching a predicate, oldest first
    async fn find(
        &self,
        predicate: &(dyn for<'a> Fn(&'a R) -> bool + Send + Sync),
    ) -> Result<Vec<R>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|record| predicate(record))
            .collect())
    }

    /// Lightweight connectivity probe for readiness checks
    async fn ping(&self) -> Result<(), DomainError> {
        self.count().await.map(|_| ())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock storage for testing, insertion-ordered
    #[derive(Debug)]
    pub struct MockStorage<R>
    where
        R: Record,
    {
        records: Mutex<Vec<R>>,
        error: Mutex<Option<String>>,
    }

    impl<R> Default for MockStorage<R>
    where
        R: Record,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<R> MockStorage<R>
    where
        R: Record,
    {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                error: Mutex::new(None),
            }
        }

        pub fn with_record(self, record: R) -> Self {
            self.records.lock().unwrap().push(record);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<R> Storage<R> for MockStorage<R>
    where
        R: Record + 'static,
    {
        async fn get(&self, id: &str) -> Result<Option<R>, DomainError> {
            self.check_error()?;
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id() == id)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<R>, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().clone())
        }

        async fn insert(&self, record: R) -> Result<R, DomainError> {
            self.check_error()?;
            let mut records = self.records.lock().unwrap();

            if records.iter().any(|r| r.id() == record.id()) {
                return Err(DomainError::conflict(format!(
                    "{} '{}' already exists",
                    R::COLLECTION,
                    record.id()
                )));
            }

            records.push(record.clone());
            Ok(record)
        }

        async fn replace(&self, record: R) -> Result<R, DomainError> {
            self.check_error()?;
            let mut records = self.records.lock().unwrap();

            match records.iter_mut().find(|r| r.id() == record.id()) {
                Some(slot) => {
                    *slot = record.clone();
                    Ok(record)
                }
                None => Err(DomainError::not_found(format!(
                    "{} '{}' not found",
                    R::COLLECTION,
                    record.id()
                ))),
            }
        }

        async fn delete(&self, id: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id() != id);
            Ok(records.len() != before)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::storage::record::fixtures::Note;

        #[tokio::test]
        async fn test_insert_conflict() {
            let storage = MockStorage::new().with_record(Note::new("n1", "a"));

            let result = storage.insert(Note::new("n1", "b")).await;
            assert!(matches!(result, Err(DomainError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_replace_unknown_is_not_found() {
            let storage: MockStorage<Note> = MockStorage::new();

            let result = storage.replace(Note::new("n1", "a")).await;
            assert!(matches!(result, Err(DomainError::NotFound { .. })));
        }

        #[tokio::test]
        async fn test_find_with_predicate() {
            let storage = MockStorage::new()
                .with_record(Note::new("n1", "flood"))
                .with_record(Note::new("n2", "fire"))
                .with_record(Note::new("n3", "flood warning"));

            let found = storage
                .find(&|n: &Note| n.text.contains("flood"))
                .await
                .unwrap();

            assert_eq!(found.len(), 2);
            assert_eq!(found[0].id, "n1");
            assert_eq!(found[1].id, "n3");
        }

        #[tokio::test]
        async fn test_find_through_trait_object_with_borrowed_needle() {
            let storage: std::sync::Arc<dyn Storage<Note>> = std::sync::Arc::new(
                MockStorage::new()
                    .with_record(Note::new("n1", "flood"))
                    .with_record(Note::new("n2", "fire")),
            );
            let needle = String::from("fire");
            let needle = needle.as_str();

            let found = storage
                .find(&|n: &Note| n.text == needle)
                .await
                .unwrap();

            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id, "n2");
        }

        #[tokio::test]
        async fn test_delete_and_count() {
            let storage = MockStorage::new()
                .with_record(Note::new("n1", "a"))
                .with_record(Note::new("n2", "b"));

            assert!(storage.delete("n1").await.unwrap());
            assert!(!storage.delete("n1").await.unwrap());
            assert_eq!(storage.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_with_error() {
            let storage: MockStorage<Note> = MockStorage::new().with_error("down");

            assert!(storage.list().await.is_err());
            assert!(storage.ping().await.is_err());
        }
    }
}
