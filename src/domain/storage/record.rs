//! Stored record trait

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A JSON-serializable record stored by string id
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Collection (table) the record lives in
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Listing order is by creation time
    fn created_at(&self) -> DateTime<Utc>;
}
